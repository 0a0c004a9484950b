use serde::{Deserialize, Serialize};

/// Number of leading parameters that describe the rigid pose.
pub const RIGID_PARAMS: usize = 6;

/// Rigid pose plus shape-mode coefficients, as produced by the alignment
/// solver.
///
/// Parameters are kept exactly as the solver returned them. The conventional
/// layout is translation x/y/z, rotation x/y/z, then one weight per
/// principal component mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidPcModesTransform {
    params: Vec<f64>,
}

impl RigidPcModesTransform {
    pub fn new(params: Vec<f64>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Translation followed by rotation, when the solver produced a full pose.
    pub fn rigid(&self) -> Option<[f64; RIGID_PARAMS]> {
        self.params
            .get(..RIGID_PARAMS)
            .and_then(|rigid| rigid.try_into().ok())
    }

    pub fn translation(&self) -> Option<glam::DVec3> {
        self.rigid()
            .map(|rigid| glam::DVec3::new(rigid[0], rigid[1], rigid[2]))
    }

    pub fn rotation(&self) -> Option<glam::DVec3> {
        self.rigid()
            .map(|rigid| glam::DVec3::new(rigid[3], rigid[4], rigid[5]))
    }

    pub fn mode_weights(&self) -> &[f64] {
        self.params.get(RIGID_PARAMS..).unwrap_or(&[])
    }
}

impl From<Vec<f64>> for RigidPcModesTransform {
    fn from(params: Vec<f64>) -> Self {
        Self::new(params)
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::RigidPcModesTransform;

    #[test]
    fn splits_pose_and_mode_weights() {
        let transform = RigidPcModesTransform::new(vec![1.0, 2.0, 3.0, 0.1, 0.2, 0.3, -1.5, 0.5]);

        assert_eq!(transform.translation(), Some(DVec3::new(1.0, 2.0, 3.0)));
        assert_eq!(transform.rotation(), Some(DVec3::new(0.1, 0.2, 0.3)));
        assert_eq!(transform.mode_weights(), &[-1.5, 0.5]);
        assert_eq!(transform.params().len(), 8);
    }

    #[test]
    fn short_parameter_vector_has_no_pose() {
        let transform = RigidPcModesTransform::new(vec![1.0, 2.0]);

        assert!(transform.rigid().is_none());
        assert!(transform.mode_weights().is_empty());
    }
}
