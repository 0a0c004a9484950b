use std::sync::Arc;

use anyhow::anyhow;
use common::OutputStream;
use glam::DVec3;
use parking_lot::Mutex;

use crate::config::{ConfigValidator, ConfigureDialog, StepConfig};
use crate::landmarks::FemurLandmark;
use crate::model::{FieldParameters, PrincipalComponents, ShapeModel};
use crate::solver::{Alignment, AlignmentRequest, AlignmentSolver, FitWeights, ProgressSink};
use crate::step::{RegistrationSession, RegistrationViewer, ViewerOutcome};

#[derive(Clone, Debug, PartialEq)]
pub struct StubModel {
    pub name: String,
    pub field_params: Option<FieldParameters>,
}

impl StubModel {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_params: None,
        }
    }
}

impl ShapeModel for StubModel {
    fn set_field_parameters(&mut self, params: &FieldParameters) {
        self.field_params = Some(params.clone());
    }
}

#[derive(Clone, Debug)]
pub struct StubPcs {
    pub mean: Vec<f64>,
}

impl Default for StubPcs {
    fn default() -> Self {
        Self {
            mean: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        }
    }
}

impl PrincipalComponents for StubPcs {
    fn mean(&self) -> &[f64] {
        &self.mean
    }
}

/// What the solver was asked to do.
#[derive(Clone, Debug)]
pub struct SolverCall {
    pub landmarks: Vec<FemurLandmark>,
    pub positions: Vec<DVec3>,
    pub weights: FitWeights,
    pub seeded: Option<FieldParameters>,
}

/// Deterministic solver: records its inputs, replays scripted progress
/// updates, and returns a fixed fit.
#[derive(Clone)]
pub struct StubSolver {
    pub calls: Arc<Mutex<Vec<SolverCall>>>,
    pub landmark_sse: f64,
    pub updates: Vec<Vec<f64>>,
    pub transform_params: Vec<f64>,
    pub failure: Option<String>,
}

impl Default for StubSolver {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            landmark_sse: 18.0,
            updates: vec![],
            transform_params: vec![1.0, 2.0, 3.0, 0.1, 0.2, 0.3, -0.5],
            failure: None,
        }
    }
}

impl StubSolver {
    pub fn fitted_model() -> StubModel {
        StubModel::named("fitted")
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> Option<SolverCall> {
        self.calls.lock().last().cloned()
    }
}

impl AlignmentSolver for StubSolver {
    type Model = StubModel;
    type PrincipalComponents = StubPcs;

    fn align(
        &self,
        request: AlignmentRequest<'_, StubModel, StubPcs>,
        mut progress: Option<ProgressSink<'_>>,
    ) -> anyhow::Result<Alignment<StubModel>> {
        self.calls.lock().push(SolverCall {
            landmarks: request.correspondences.iter().map(|c| c.landmark).collect(),
            positions: request.correspondences.iter().map(|c| c.position).collect(),
            weights: request.weights,
            seeded: request.model.field_params.clone(),
        });

        if let Some(progress) = progress.as_deref_mut() {
            for update in &self.updates {
                progress(update.as_slice());
            }
        }

        if let Some(message) = &self.failure {
            return Err(anyhow!(message.clone()));
        }

        Ok(Alignment {
            model: Self::fitted_model(),
            sse: vec![3.0, 4.0, self.landmark_sse],
            transform_params: self.transform_params.clone(),
        })
    }
}

/// Runs `fits` registrations, streaming updates into `progress`, then accepts.
#[derive(Default)]
pub struct AcceptingViewer {
    pub fits: usize,
    pub progress: OutputStream<Vec<f64>>,
    pub seen_landmarks: Vec<Option<DVec3>>,
    pub errors: Vec<String>,
}

impl AcceptingViewer {
    pub fn with_fits(fits: usize) -> Self {
        Self {
            fits,
            ..Default::default()
        }
    }
}

impl RegistrationViewer<StubSolver> for AcceptingViewer {
    fn run(&mut self, session: &mut RegistrationSession<'_, StubSolver>) -> ViewerOutcome {
        let mec_name = session.config().mec.as_landmark().map(str::to_string);

        for _ in 0..self.fits {
            let progress = self.progress.clone();
            let mut sink = move |params: &[f64]| progress.write(params.to_vec());
            if let Err(err) = session.register(Some(&mut sink)) {
                self.errors.push(err.to_string());
            }

            let mec = mec_name
                .as_deref()
                .and_then(|name| session.landmarks().and_then(|set| set.get(name)));
            self.seen_landmarks.push(mec);
        }

        ViewerOutcome::Accept
    }
}

/// Optionally runs one fit, then aborts.
pub struct AbortingViewer {
    pub fit_first: bool,
}

impl RegistrationViewer<StubSolver> for AbortingViewer {
    fn run(&mut self, session: &mut RegistrationSession<'_, StubSolver>) -> ViewerOutcome {
        if self.fit_first {
            let staged = session.register(None).map(|output| output.rmse);
            assert!(staged.is_ok(), "staged fit should succeed");
            assert!(session.staged().is_some());
        }
        ViewerOutcome::Abort
    }
}

/// For headless runs; the viewer must never be shown.
pub struct HiddenViewer;

impl RegistrationViewer<StubSolver> for HiddenViewer {
    fn run(&mut self, _session: &mut RegistrationSession<'_, StubSolver>) -> ViewerOutcome {
        panic!("viewer shown during a headless run");
    }
}

/// Dialog returning a scripted edit, validating identifiers only.
pub struct ScriptedDialog {
    pub edit: Option<StepConfig>,
    pub shown_with: Option<StepConfig>,
}

impl ScriptedDialog {
    pub fn returning(edit: Option<StepConfig>) -> Self {
        Self {
            edit,
            shown_with: None,
        }
    }
}

impl ConfigValidator for ScriptedDialog {
    fn validate(&self, config: &StepConfig) -> bool {
        !config.identifier.is_empty()
    }
}

impl ConfigureDialog for ScriptedDialog {
    fn exec(&mut self, config: &StepConfig) -> Option<StepConfig> {
        self.shown_with = Some(config.clone());
        self.edit.clone()
    }
}
