//! Persisted calibration document.
//!
//! The sole durable artifact of a calibration run. Field names are
//! stable: `camera_matrix`, `rotation_vectors`, `translation_vectors`,
//! `distortion_coefficients`.

use arcal_core::Real;
use serde::{Deserialize, Serialize};

use crate::calibrate::CalibrationResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationExport {
    /// 3x3 intrinsic matrix, row-major.
    pub camera_matrix: [[Real; 3]; 3],
    /// Per-view axis-angle rotation vectors, in sample order.
    pub rotation_vectors: Vec<[Real; 3]>,
    /// Per-view translation vectors, in sample order.
    pub translation_vectors: Vec<[Real; 3]>,
    /// Distortion coefficients in `[k1, k2, p1, p2, k3]` order.
    pub distortion_coefficients: Vec<Real>,
}

impl CalibrationExport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<&CalibrationResult> for CalibrationExport {
    fn from(result: &CalibrationResult) -> Self {
        let k = result.camera.intrinsics.k_matrix();
        let mut camera_matrix = [[0.0; 3]; 3];
        for r in 0..3 {
            for c in 0..3 {
                camera_matrix[r][c] = k[(r, c)];
            }
        }

        Self {
            camera_matrix,
            rotation_vectors: result
                .poses
                .iter()
                .map(|p| [p.rvec.x, p.rvec.y, p.rvec.z])
                .collect(),
            translation_vectors: result
                .poses
                .iter()
                .map(|p| [p.tvec.x, p.tvec.y, p.tvec.z])
                .collect(),
            distortion_coefficients: result.camera.distortion.coefficients().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcal_core::{Distortion, Intrinsics, PinholeCamera, Pose, Vec3};

    fn result() -> CalibrationResult {
        CalibrationResult {
            camera: PinholeCamera::new(
                Intrinsics::new(800.0, 780.0, 640.0, 360.0),
                Distortion::from_coefficients(&[-0.1, 0.01, 0.001, -0.001, 0.0]),
            ),
            poses: vec![Pose::new(
                Vec3::new(0.1, -0.2, 0.05),
                Vec3::new(0.0, 0.1, 1.0),
            )],
            rms_error: 0.25,
        }
    }

    #[test]
    fn document_layout() {
        let export = CalibrationExport::from(&result());

        assert_eq!(export.camera_matrix[0][0], 800.0);
        assert_eq!(export.camera_matrix[1][1], 780.0);
        assert_eq!(export.camera_matrix[0][2], 640.0);
        assert_eq!(export.camera_matrix[2][2], 1.0);
        assert_eq!(export.rotation_vectors, vec![[0.1, -0.2, 0.05]]);
        assert_eq!(export.translation_vectors, vec![[0.0, 0.1, 1.0]]);
        assert_eq!(
            export.distortion_coefficients,
            vec![-0.1, 0.01, 0.001, -0.001, 0.0]
        );
    }

    #[test]
    fn field_names_are_stable() {
        let export = CalibrationExport::from(&result());
        let json = export.to_json().unwrap();

        assert!(json.contains("\"camera_matrix\""));
        assert!(json.contains("\"rotation_vectors\""));
        assert!(json.contains("\"translation_vectors\""));
        assert!(json.contains("\"distortion_coefficients\""));

        let restored = CalibrationExport::from_json(&json).unwrap();
        assert_eq!(restored.camera_matrix, export.camera_matrix);
        assert_eq!(
            restored.distortion_coefficients,
            export.distortion_coefficients
        );
    }
}
