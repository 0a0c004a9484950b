use glam::DVec3;

use crate::landmarks::FemurLandmark;
use crate::model::{PrincipalComponents, ShapeModel};

/// Index of the landmark-fit term in the solver's error breakdown.
pub const LANDMARK_SSE_TERM: usize = 2;

/// Sink for intermediate parameter vectors reported while the solver iterates.
pub type ProgressSink<'a> = &'a mut dyn FnMut(&[f64]);

/// Regularization weights on deviation from the mean shape (`mw0`) and on the
/// higher modes (`mwn`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitWeights {
    pub mw0: f64,
    pub mwn: f64,
}

impl Default for FitWeights {
    fn default() -> Self {
        Self {
            mw0: 100.0,
            mwn: 100.0,
        }
    }
}

/// A femoral landmark and the target position the model should reach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correspondence {
    pub landmark: FemurLandmark,
    pub position: DVec3,
}

pub struct AlignmentRequest<'a, M, P> {
    pub model: &'a M,
    pub principal_components: &'a P,
    pub correspondences: &'a [Correspondence],
    pub weights: FitWeights,
}

#[derive(Clone, Debug)]
pub struct Alignment<M> {
    pub model: M,
    /// Per-stage sum of squared errors; [`LANDMARK_SSE_TERM`] is the landmark fit.
    pub sse: Vec<f64>,
    pub transform_params: Vec<f64>,
}

/// Fits a PC shape model to landmark correspondences with a rigid pose plus
/// shape-mode coefficients.
pub trait AlignmentSolver {
    type Model: ShapeModel;
    type PrincipalComponents: PrincipalComponents;

    /// Every intermediate parameter update is passed to `progress` when given.
    /// Failures are reported unchanged to the caller.
    fn align(
        &self,
        request: AlignmentRequest<'_, Self::Model, Self::PrincipalComponents>,
        progress: Option<ProgressSink<'_>>,
    ) -> anyhow::Result<Alignment<Self::Model>>;
}
