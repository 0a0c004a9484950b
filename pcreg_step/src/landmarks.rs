use glam::DVec3;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Femoral landmarks the fit can use, in the order correspondences are built.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum FemurLandmark {
    /// Femoral head centre
    FHC,
    /// Medial epicondyle
    MEC,
    /// Lateral epicondyle
    LEC,
    /// Greater trochanter
    FGT,
}

/// Named landmark positions delivered by an upstream step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: HashMap<String, DVec3>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, position: DVec3) -> Option<DVec3> {
        self.points.insert(name.into(), position)
    }

    pub fn get(&self, name: &str) -> Option<DVec3> {
        self.points.get(name).copied()
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut DVec3> {
        self.points.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.points.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DVec3)> {
        self.points.iter().map(|(name, point)| (name.as_str(), *point))
    }
}

impl<S, It> From<It> for LandmarkSet
where
    S: Into<String>,
    It: IntoIterator<Item = (S, DVec3)>,
{
    fn from(iter: It) -> Self {
        let mut set = LandmarkSet::default();
        for (name, position) in iter {
            set.insert(name, position);
        }
        set
    }
}
