//! Epicondyle marker correction.
//!
//! Markers placed on the medial and lateral epicondyles sit on the skin
//! surface, outside the bone the model describes. Both are pulled toward each
//! other along the line joining them before fitting.

use tracing::{debug, warn};

use crate::config::StepConfig;
use crate::landmarks::LandmarkSet;

/// Distance each epicondyle landmark is moved, in model units.
pub const EPICONDYLE_SHIFT: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Correction {
    Applied,
    /// MEC or LEC is disabled in the configuration.
    SkippedDisabled,
    /// MEC and LEC coincide, so there is no direction to move along.
    SkippedDegenerate,
}

/// Moves the configured MEC and LEC landmarks `shift` toward each other.
///
/// Selectors must already be resolved against `landmarks`; a disabled MEC or
/// LEC leaves the set untouched.
pub fn correct_epicondyles(landmarks: &mut LandmarkSet, config: &StepConfig, shift: f64) -> Correction {
    let (Some(mec_name), Some(lec_name)) = (config.mec.as_landmark(), config.lec.as_landmark())
    else {
        debug!("epicondyle correction skipped, MEC or LEC disabled");
        return Correction::SkippedDisabled;
    };

    let (Some(mec), Some(lec)) = (landmarks.get(mec_name), landmarks.get(lec_name)) else {
        // unresolved selectors are rejected before correction is attempted
        debug!(mec_name, lec_name, "epicondyle correction skipped, landmark missing");
        return Correction::SkippedDisabled;
    };

    let Some(direction) = (mec - lec).try_normalize() else {
        warn!(mec_name, lec_name, "MEC and LEC coincide, epicondyle correction skipped");
        return Correction::SkippedDegenerate;
    };

    let offset = direction * shift;
    if let Some(mec) = landmarks.get_mut(mec_name) {
        *mec -= offset;
    }
    if let Some(lec) = landmarks.get_mut(lec_name) {
        *lec += offset;
    }

    debug!(shift, "epicondyle landmarks moved toward each other");
    Correction::Applied
}
