pub mod config;
pub mod correction;
pub mod error;
pub mod landmarks;
pub mod model;
pub mod ports;
pub mod registration;
pub mod solver;
pub mod step;
pub mod transform;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::config::{
        ConfigState, ConfigValidator, ConfigureDialog, IdentifierValidator, LandmarkSelector,
        StepConfig,
    };
    pub use crate::error::{ConfigError, Result, StepError};
    pub use crate::landmarks::{FemurLandmark, LandmarkSet};
    pub use crate::model::{FieldParameters, PrincipalComponents, ShapeModel};
    pub use crate::ports::{PortData, PortDirection, PortKind, PortOutput, STEP_PORTS};
    pub use crate::registration::{RegistrationOutput, RunId};
    pub use crate::solver::{Alignment, AlignmentRequest, AlignmentSolver, Correspondence, FitWeights};
    pub use crate::step::{PcRegFemurStep, RegistrationSession, RegistrationViewer, ViewerOutcome};
    pub use crate::transform::RigidPcModesTransform;
}
