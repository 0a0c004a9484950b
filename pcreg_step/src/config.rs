use common::json::{from_json, merge_objects, to_json_pretty, JsonError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::error::Result;
use crate::landmarks::FemurLandmark;

const UNSET_SELECTOR: &str = "none";
const GUI_KEY: &str = "GUI";

/// Which entry of the incoming landmark set plays a femoral landmark's role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LandmarkSelector {
    /// Landmark is left out of the fit.
    #[default]
    Unset,
    Landmark(String),
}

impl LandmarkSelector {
    pub fn landmark<S: Into<String>>(name: S) -> Self {
        LandmarkSelector::Landmark(name.into())
    }

    pub fn as_landmark(&self) -> Option<&str> {
        match self {
            LandmarkSelector::Unset => None,
            LandmarkSelector::Landmark(name) => Some(name),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, LandmarkSelector::Unset)
    }
}

impl From<String> for LandmarkSelector {
    fn from(value: String) -> Self {
        if value == UNSET_SELECTOR {
            LandmarkSelector::Unset
        } else {
            LandmarkSelector::Landmark(value)
        }
    }
}

impl From<LandmarkSelector> for String {
    fn from(selector: LandmarkSelector) -> Self {
        match selector {
            LandmarkSelector::Unset => UNSET_SELECTOR.to_string(),
            LandmarkSelector::Landmark(name) => name,
        }
    }
}

/// Persisted step configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    pub identifier: String,
    /// Interactive run with a confirm/abort viewer when set, headless otherwise.
    #[serde(rename = "GUI")]
    pub gui: bool,
    #[serde(rename = "FHC")]
    pub fhc: LandmarkSelector,
    #[serde(rename = "MEC")]
    pub mec: LandmarkSelector,
    #[serde(rename = "LEC")]
    pub lec: LandmarkSelector,
    #[serde(rename = "FGT")]
    pub fgt: LandmarkSelector,
    /// Keys this version does not know about, written back untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            gui: true,
            fhc: LandmarkSelector::Unset,
            mec: LandmarkSelector::Unset,
            lec: LandmarkSelector::Unset,
            fgt: LandmarkSelector::Unset,
            extra: serde_json::Map::new(),
        }
    }
}

impl StepConfig {
    pub fn selector(&self, landmark: FemurLandmark) -> &LandmarkSelector {
        match landmark {
            FemurLandmark::FHC => &self.fhc,
            FemurLandmark::MEC => &self.mec,
            FemurLandmark::LEC => &self.lec,
            FemurLandmark::FGT => &self.fgt,
        }
    }

    pub fn set_selector(&mut self, landmark: FemurLandmark, selector: LandmarkSelector) {
        let slot = match landmark {
            FemurLandmark::FHC => &mut self.fhc,
            FemurLandmark::MEC => &mut self.mec,
            FemurLandmark::LEC => &mut self.lec,
            FemurLandmark::FGT => &mut self.fgt,
        };
        *slot = selector;
    }

    /// Enabled landmarks with their selected names, in declaration order.
    pub fn active_landmarks(&self) -> impl Iterator<Item = (FemurLandmark, &str)> + '_ {
        FemurLandmark::iter().filter_map(|landmark| {
            self.selector(landmark)
                .as_landmark()
                .map(|name| (landmark, name))
        })
    }

    pub fn active_count(&self) -> usize {
        self.active_landmarks().count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(to_json_pretty(self)?)
    }

    /// Applies a persisted JSON object on top of this configuration.
    ///
    /// Keys present in `json` win, keys it lacks keep their current value.
    /// Older files stored the GUI flag as `"True"`/`"False"`; those are
    /// turned into booleans before the typed conversion.
    pub fn merged_with_json(&self, json: &str) -> Result<StepConfig> {
        let mut value = serde_json::to_value(self).map_err(JsonError::Serialize)?;
        let patch: Value = from_json(json)?;

        merge_objects(&mut value, patch);
        normalize_legacy_gui(&mut value);

        Ok(serde_json::from_value(value).map_err(JsonError::Deserialize)?)
    }
}

fn normalize_legacy_gui(value: &mut Value) {
    let Some(gui) = value.get_mut(GUI_KEY) else {
        return;
    };

    let normalized = match gui.as_str() {
        Some("True") => true,
        Some("False") => false,
        _ => return,
    };

    debug!(gui = normalized, "normalized legacy string GUI flag");
    *gui = Value::Bool(normalized);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigState {
    #[default]
    Unconfigured,
    Configured,
}

impl ConfigState {
    pub fn from_valid(valid: bool) -> Self {
        if valid {
            ConfigState::Configured
        } else {
            ConfigState::Unconfigured
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, ConfigState::Configured)
    }
}

/// Decides whether a configuration lets the step run.
pub trait ConfigValidator {
    fn validate(&self, config: &StepConfig) -> bool;
}

/// Modal configuration editor provided by the host UI.
pub trait ConfigureDialog: ConfigValidator {
    /// Shows the dialog seeded with `config`. `None` means the user cancelled.
    fn exec(&mut self, config: &StepConfig) -> Option<StepConfig>;
}

/// Accepts a configuration whose identifier is non-empty and unique in the
/// workflow. `occurrences` reports how many steps use an identifier,
/// counting this one.
pub struct IdentifierValidator<F> {
    occurrences: F,
}

impl<F> IdentifierValidator<F>
where
    F: Fn(&str) -> usize,
{
    pub fn new(occurrences: F) -> Self {
        Self { occurrences }
    }
}

impl<F> ConfigValidator for IdentifierValidator<F>
where
    F: Fn(&str) -> usize,
{
    fn validate(&self, config: &StepConfig) -> bool {
        !config.identifier.is_empty() && (self.occurrences)(&config.identifier) <= 1
    }
}
