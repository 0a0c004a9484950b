use tracing::{info, warn};

use crate::config::{ConfigState, ConfigValidator, ConfigureDialog, StepConfig};
use crate::error::{ConfigError, Result, StepError};
use crate::landmarks::LandmarkSet;
use crate::ports::{PortData, PortDescriptor, PortKind, PortOutput, STEP_PORTS};
use crate::registration::{register, RegistrationOutput, StepInputs};
use crate::solver::{AlignmentSolver, ProgressSink};

pub const STEP_NAME: &str = "Fieldwork PC-Reg Femur 2 Landmarks";
pub const STEP_CATEGORY: &str = "Registration";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerOutcome {
    /// Publish the last fit computed in the session.
    Accept,
    Abort,
}

/// Interactive front end that lets a user run fits and accept or abort.
pub trait RegistrationViewer<S: AlignmentSolver> {
    fn run(&mut self, session: &mut RegistrationSession<'_, S>) -> ViewerOutcome;
}

/// What an interactive viewer gets to work with while it is shown. Fits run
/// here are staged and only reach the output ports once the viewer accepts.
pub struct RegistrationSession<'a, S: AlignmentSolver> {
    solver: &'a S,
    config: &'a StepConfig,
    inputs: &'a mut StepInputs<S::Model, S::PrincipalComponents>,
    staged: Option<RegistrationOutput<S::Model>>,
}

impl<S: AlignmentSolver> RegistrationSession<'_, S> {
    pub fn config(&self) -> &StepConfig {
        self.config
    }

    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        self.inputs.landmarks()
    }

    /// Input model, seeded with the PC mean once a fit has run.
    pub fn model(&self) -> Option<&S::Model> {
        self.inputs.model()
    }

    /// Runs a fit, streaming solver updates to `progress`.
    pub fn register(
        &mut self,
        progress: Option<ProgressSink<'_>>,
    ) -> Result<&RegistrationOutput<S::Model>> {
        let output = register(self.solver, self.config, self.inputs, progress)?;
        Ok(self.staged.insert(output))
    }

    pub fn staged(&self) -> Option<&RegistrationOutput<S::Model>> {
        self.staged.as_ref()
    }
}

/// Workflow step fitting a PC femur model to landmarks.
pub struct PcRegFemurStep<S: AlignmentSolver> {
    solver: S,
    config: StepConfig,
    state: ConfigState,
    inputs: StepInputs<S::Model, S::PrincipalComponents>,
    output: Option<RegistrationOutput<S::Model>>,
    on_finished: Option<Box<dyn FnMut() + Send>>,
}

impl<S: AlignmentSolver> PcRegFemurStep<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            config: StepConfig::default(),
            state: ConfigState::Unconfigured,
            inputs: StepInputs::default(),
            output: None,
            on_finished: None,
        }
    }

    pub fn name(&self) -> &'static str {
        STEP_NAME
    }

    pub fn category(&self) -> &'static str {
        STEP_CATEGORY
    }

    pub fn ports(&self) -> &'static [PortDescriptor] {
        &STEP_PORTS
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn state(&self) -> ConfigState {
        self.state
    }

    pub fn is_configured(&self) -> bool {
        self.state.is_configured()
    }

    pub fn identifier(&self) -> &str {
        &self.config.identifier
    }

    pub fn set_identifier<Id: Into<String>>(&mut self, identifier: Id) {
        self.config.identifier = identifier.into();
    }

    /// Called once the step has published its result.
    pub fn on_finished<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_finished = Some(Box::new(callback));
    }

    /// Shows the configure dialog. An accepted edit replaces the current
    /// configuration; the step is configured when the dialog validates it.
    pub fn configure<D: ConfigureDialog>(&mut self, dialog: &mut D) -> ConfigState {
        if let Some(config) = dialog.exec(&self.config) {
            self.config = config;
        }

        self.state = ConfigState::from_valid(dialog.validate(&self.config));
        info!(state = ?self.state, identifier = %self.config.identifier, "step configured");
        self.state
    }

    pub fn serialize(&self) -> Result<String> {
        self.config.to_json()
    }

    /// Loads a persisted configuration on top of the current one. The current
    /// configuration is kept when `json` cannot be applied.
    pub fn deserialize<V: ConfigValidator>(&mut self, json: &str, validator: &V) -> Result<()> {
        self.config = self.config.merged_with_json(json)?;
        self.state = ConfigState::from_valid(validator.validate(&self.config));
        Ok(())
    }

    pub fn set_port_data(
        &mut self,
        index: usize,
        data: PortData<S::Model, S::PrincipalComponents>,
    ) -> Result<()> {
        let expected = PortKind::for_input(index);
        if data.kind() != expected {
            return Err(StepError::PortMismatch { index, expected });
        }

        match data {
            PortData::Landmarks(landmarks) => self.inputs.set_landmarks(landmarks),
            PortData::PrincipalComponents(pcs) => self.inputs.set_principal_components(pcs),
            PortData::Model(model) => self.inputs.set_model(model),
        }
        Ok(())
    }

    /// Published output for port `index`, `None` before the first result.
    pub fn get_port_data(&self, index: usize) -> Option<PortOutput<'_, S::Model>> {
        let output = self.output.as_ref()?;

        Some(match PortKind::for_output(index) {
            PortKind::FieldworkModel => PortOutput::Model(&output.model),
            PortKind::GeometricTransform => PortOutput::Transform(&output.transform),
            _ => PortOutput::Rmse(output.rmse),
        })
    }

    pub fn output(&self) -> Option<&RegistrationOutput<S::Model>> {
        self.output.as_ref()
    }

    /// Runs a fit and publishes it straight away.
    pub fn reg(&mut self, progress: Option<ProgressSink<'_>>) -> Result<&RegistrationOutput<S::Model>> {
        let output = register(&self.solver, &self.config, &mut self.inputs, progress)?;
        Ok(self.output.insert(output))
    }

    /// Runs the step. Headless configurations fit and publish directly;
    /// interactive ones hand a session to `viewer` and publish only what it
    /// accepts.
    pub fn execute<V: RegistrationViewer<S>>(&mut self, viewer: &mut V) -> Result<()> {
        if !self.state.is_configured() {
            return Err(ConfigError::Unconfigured.into());
        }
        if let Some(port) = self.inputs.missing_port() {
            return Err(StepError::MissingInput { port });
        }

        if self.config.gui {
            info!("launching registration viewer");
            let mut session = RegistrationSession {
                solver: &self.solver,
                config: &self.config,
                inputs: &mut self.inputs,
                staged: None,
            };

            match viewer.run(&mut session) {
                ViewerOutcome::Abort => {
                    warn!("registration aborted from viewer");
                    return Err(StepError::Aborted);
                }
                ViewerOutcome::Accept => {
                    let staged = session.staged.take().ok_or(StepError::NoResult)?;
                    self.output = Some(staged);
                }
            }
        } else {
            self.reg(None)?;
        }

        self.done_execution();
        Ok(())
    }

    fn done_execution(&mut self) {
        if let Some(callback) = self.on_finished.as_mut() {
            callback();
        }
    }
}
