use common::id_type;
use tracing::{debug, info, info_span};

use crate::config::StepConfig;
use crate::correction::{correct_epicondyles, Correction, EPICONDYLE_SHIFT};
use crate::error::{ConfigError, Result, StepError};
use crate::landmarks::LandmarkSet;
use crate::model::{FieldParameters, PrincipalComponents, ShapeModel};
use crate::solver::{
    AlignmentRequest, AlignmentSolver, Correspondence, FitWeights, ProgressSink, LANDMARK_SSE_TERM,
};
use crate::transform::RigidPcModesTransform;

id_type!(RunId);

/// Result of one registration run.
#[derive(Clone, Debug)]
pub struct RegistrationOutput<M> {
    pub run_id: RunId,
    pub model: M,
    pub rmse: f64,
    pub transform: RigidPcModesTransform,
}

/// Data delivered on the step's input ports.
#[derive(Debug)]
pub struct StepInputs<M, P> {
    pub(crate) landmarks: Option<LandmarkSet>,
    pub(crate) principal_components: Option<P>,
    pub(crate) model: Option<M>,
    /// MEC and LEC entries already moved in the current landmark set.
    corrected_epicondyles: Option<(String, String)>,
}

impl<M, P> Default for StepInputs<M, P> {
    fn default() -> Self {
        Self {
            landmarks: None,
            principal_components: None,
            model: None,
            corrected_epicondyles: None,
        }
    }
}

impl<M, P> StepInputs<M, P> {
    /// A new landmark set re-arms the epicondyle correction.
    pub fn set_landmarks(&mut self, landmarks: LandmarkSet) {
        self.landmarks = Some(landmarks);
        self.corrected_epicondyles = None;
    }

    pub fn set_principal_components(&mut self, principal_components: P) {
        self.principal_components = Some(principal_components);
    }

    pub fn set_model(&mut self, model: M) {
        self.model = Some(model);
    }

    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        self.landmarks.as_ref()
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    /// Port index of the first input that has not been delivered.
    pub fn missing_port(&self) -> Option<usize> {
        if self.landmarks.is_none() {
            Some(0)
        } else if self.principal_components.is_none() {
            Some(1)
        } else if self.model.is_none() {
            Some(2)
        } else {
            None
        }
    }
}

/// Checks every enabled selector against the landmark set and returns how
/// many landmarks take part in the fit.
pub fn validate_selectors(config: &StepConfig, landmarks: &LandmarkSet) -> Result<usize> {
    let mut active = 0;
    for (landmark, name) in config.active_landmarks() {
        if !landmarks.contains(name) {
            return Err(ConfigError::UnresolvedSelector {
                landmark,
                selector: name.to_string(),
            }
            .into());
        }
        active += 1;
    }

    if active == 0 {
        return Err(ConfigError::NoActiveLandmarks.into());
    }

    Ok(active)
}

/// Enabled landmarks and their positions, in FHC, MEC, LEC, FGT order.
pub fn correspondences(config: &StepConfig, landmarks: &LandmarkSet) -> Result<Vec<Correspondence>> {
    config
        .active_landmarks()
        .map(|(landmark, name)| {
            landmarks
                .get(name)
                .map(|position| Correspondence { landmark, position })
                .ok_or_else(|| {
                    StepError::from(ConfigError::UnresolvedSelector {
                        landmark,
                        selector: name.to_string(),
                    })
                })
        })
        .collect()
}

/// Root mean square landmark error from the solver's landmark SSE term.
pub fn landmark_rmse(sse: &[f64], active_landmarks: usize) -> Result<f64> {
    if active_landmarks == 0 {
        return Err(ConfigError::NoActiveLandmarks.into());
    }

    let landmark_sse = sse.get(LANDMARK_SSE_TERM).copied().ok_or_else(|| {
        StepError::Solver(anyhow::anyhow!(
            "solver returned {} error terms, the landmark term is at index {}",
            sse.len(),
            LANDMARK_SSE_TERM
        ))
    })?;

    Ok((landmark_sse / active_landmarks as f64).sqrt())
}

/// Seeds the model from the PC mean, corrects the epicondyles, and fits the
/// model to the enabled landmarks.
///
/// Configuration problems are reported before anything is mutated or the
/// solver is called.
pub fn register<S: AlignmentSolver>(
    solver: &S,
    config: &StepConfig,
    inputs: &mut StepInputs<S::Model, S::PrincipalComponents>,
    progress: Option<ProgressSink<'_>>,
) -> Result<RegistrationOutput<S::Model>> {
    let run_id = RunId::unique();
    let span = info_span!("registration", run = %run_id);
    let _enter = span.enter();

    if let Some(port) = inputs.missing_port() {
        return Err(StepError::MissingInput { port });
    }
    let (Some(landmarks), Some(principal_components), Some(model)) = (
        inputs.landmarks.as_mut(),
        inputs.principal_components.as_ref(),
        inputs.model.as_mut(),
    ) else {
        return Err(StepError::MissingInput { port: 0 });
    };

    let active = validate_selectors(config, landmarks)?;
    let field_params = FieldParameters::from_mean(principal_components.mean())?;
    model.set_field_parameters(&field_params);
    debug!(nodes = field_params.nodes(), "model seeded from PC mean");

    let selected = config.mec.as_landmark().zip(config.lec.as_landmark());
    let already_corrected = match (selected, inputs.corrected_epicondyles.as_ref()) {
        (Some((mec, lec)), Some((done_mec, done_lec))) => mec == done_mec && lec == done_lec,
        _ => false,
    };
    if !already_corrected
        && correct_epicondyles(landmarks, config, EPICONDYLE_SHIFT) == Correction::Applied
    {
        inputs.corrected_epicondyles =
            selected.map(|(mec, lec)| (mec.to_string(), lec.to_string()));
    }

    let correspondences = correspondences(config, landmarks)?;
    debug!(
        landmarks = ?correspondences.iter().map(|c| c.landmark).collect::<Vec<_>>(),
        "aligning model"
    );

    let alignment = solver
        .align(
            AlignmentRequest {
                model,
                principal_components,
                correspondences: &correspondences,
                weights: FitWeights::default(),
            },
            progress,
        )
        .map_err(StepError::Solver)?;

    let rmse = landmark_rmse(&alignment.sse, active)?;
    info!(rmse, active, "registration finished");

    Ok(RegistrationOutput {
        run_id,
        model: alignment.model,
        rmse,
        transform: RigidPcModesTransform::new(alignment.transform_params),
    })
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::config::LandmarkSelector;
    use crate::landmarks::FemurLandmark;

    #[test]
    fn rmse_divides_landmark_term_by_active_count() -> anyhow::Result<()> {
        for k in 1..=4 {
            let rmse = landmark_rmse(&[5.0, 7.0, 12.0], k)?;
            assert_eq!(rmse, (12.0 / k as f64).sqrt());
        }
        Ok(())
    }

    #[test]
    fn rmse_guards_zero_landmarks_and_short_sse() {
        assert!(matches!(
            landmark_rmse(&[0.0, 0.0, 1.0], 0),
            Err(StepError::Configuration(ConfigError::NoActiveLandmarks))
        ));
        assert!(matches!(
            landmark_rmse(&[0.0, 1.0], 2),
            Err(StepError::Solver(_))
        ));
    }

    #[test]
    fn unresolved_selector_reported_with_landmark() {
        let mut config = StepConfig::default();
        config.set_selector(FemurLandmark::FGT, LandmarkSelector::landmark("missing"));
        let landmarks = LandmarkSet::from([("present", DVec3::ZERO)]);

        let err = validate_selectors(&config, &landmarks).unwrap_err();
        assert!(matches!(
            err,
            StepError::Configuration(ConfigError::UnresolvedSelector {
                landmark: FemurLandmark::FGT,
                ..
            })
        ));
    }

    #[test]
    fn missing_port_reports_first_gap() {
        let mut inputs: StepInputs<(), ()> = StepInputs::default();
        assert_eq!(inputs.missing_port(), Some(0));

        inputs.set_landmarks(LandmarkSet::new());
        assert_eq!(inputs.missing_port(), Some(1));

        inputs.set_model(());
        assert_eq!(inputs.missing_port(), Some(1));

        inputs.set_principal_components(());
        assert_eq!(inputs.missing_port(), None);
    }
}
