//! Axis-angle rigid pose of the calibration target in the camera frame.

use nalgebra::{Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::math::{Iso3, Mat3, Pt3, Vec3};

/// Rotation + translation of the target frame relative to the camera frame.
///
/// The rotation is stored as a scaled-axis (axis-angle) 3-vector: its
/// direction is the rotation axis and its norm the rotation angle in
/// radians, converted to a rotation matrix through the exponential map.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Pose {
    /// Axis-angle rotation vector.
    pub rvec: Vec3,
    /// Translation vector.
    pub tvec: Vec3,
}

impl Pose {
    pub fn new(rvec: Vec3, tvec: Vec3) -> Self {
        Self { rvec, tvec }
    }

    pub fn identity() -> Self {
        Self {
            rvec: Vec3::zeros(),
            tvec: Vec3::zeros(),
        }
    }

    /// Extract the axis-angle form from a rigid transform.
    pub fn from_isometry(iso: &Iso3) -> Self {
        Self {
            rvec: iso.rotation.scaled_axis(),
            tvec: iso.translation.vector,
        }
    }

    /// Rebuild the rigid transform through the exponential map.
    pub fn to_isometry(&self) -> Iso3 {
        Iso3::from_parts(
            Translation3::from(self.tvec),
            UnitQuaternion::from_scaled_axis(self.rvec),
        )
    }

    /// The 3x3 rotation matrix of this pose.
    pub fn rotation_matrix(&self) -> Mat3 {
        *UnitQuaternion::from_scaled_axis(self.rvec)
            .to_rotation_matrix()
            .matrix()
    }

    /// Transform a target-frame point into the camera frame.
    pub fn transform_point(&self, p: &Pt3) -> Pt3 {
        self.to_isometry().transform_point(p)
    }
}
