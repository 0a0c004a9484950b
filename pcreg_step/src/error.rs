use thiserror::Error;

use crate::landmarks::FemurLandmark;
use crate::ports::PortKind;

/// Problems with the step configuration that are caught before the solver runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no landmarks are enabled for the fit")]
    NoActiveLandmarks,
    #[error("landmark {landmark} selects '{selector}', which is not in the landmark set")]
    UnresolvedSelector {
        landmark: FemurLandmark,
        selector: String,
    },
    #[error("step is not configured")]
    Unconfigured,
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("femur landmark registration aborted")]
    Aborted,
    #[error("alignment solver failed")]
    Solver(#[source] anyhow::Error),
    #[error("input port {port} has no data")]
    MissingInput { port: usize },
    #[error("port {index} expects {expected}")]
    PortMismatch { index: usize, expected: PortKind },
    #[error("principal component mean of length {len} is not a 3-component node layout")]
    InvalidMean { len: usize },
    #[error("registration was accepted before any fit was computed")]
    NoResult,
    #[error("configuration JSON is invalid")]
    Json(#[from] common::json::JsonError),
}

pub type Result<T> = std::result::Result<T, StepError>;
