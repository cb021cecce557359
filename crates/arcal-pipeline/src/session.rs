//! Calibration session: accumulated samples plus the published result.
//!
//! The session replaces the ambient mutable state of a capture loop with
//! an explicit, passable object. Samples are appended only on explicit
//! confirmation and cleared only by explicit reset. The published
//! [`CalibrationResult`] follows a replace-on-write discipline: each
//! calibration run builds a brand-new result from the accumulated samples
//! and publishes it atomically on success; on failure the previous result
//! stays untouched and readable.

use arcal_core::{
    ChessboardTarget, CorrespondenceView, Distortion, Intrinsics, PinholeCamera, Pt2, Pt3,
};
use arcal_optim::SolveOptions;
use serde::{Deserialize, Serialize};

use crate::calibrate::{calibrate, check_view, CalibrateOptions, CalibrationResult};
use crate::detect::Detection;
use crate::error::CalibrationError;
use crate::pose::{estimate_pose, PoseEstimate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationSession {
    target: ChessboardTarget,
    initial_camera: PinholeCamera,
    samples: Vec<CorrespondenceView>,
    result: Option<CalibrationResult>,
}

impl CalibrationSession {
    /// Start a session for the given target and image dimensions.
    ///
    /// The current camera starts as the pre-calibration guess: unit focal
    /// lengths, principal point at the image center, zero distortion.
    pub fn new(target: ChessboardTarget, image_width: usize, image_height: usize) -> Self {
        Self {
            target,
            initial_camera: PinholeCamera::new(
                Intrinsics::initial_guess(image_width, image_height),
                Distortion::zero(),
            ),
            samples: Vec::new(),
            result: None,
        }
    }

    pub fn target(&self) -> &ChessboardTarget {
        &self.target
    }

    /// Append a correspondence sample.
    ///
    /// # Errors
    ///
    /// `MismatchedCorrespondence` if the lists differ in length,
    /// `TooFewPoints` below the 4-point floor. A failed call leaves the
    /// accumulated samples unchanged.
    pub fn add_sample(
        &mut self,
        world: Vec<Pt3>,
        image: Vec<Pt2>,
    ) -> Result<(), CalibrationError> {
        check_view(world.len(), image.len())?;
        self.samples.push(CorrespondenceView {
            points_3d: world,
            points_2d: image,
        });
        Ok(())
    }

    /// Append a detector result, paired with the target's canonical
    /// points. `NotFound` detections are reported as skippable errors.
    pub fn add_detection(&mut self, detection: Detection) -> Result<(), CalibrationError> {
        let image_points = detection.into_points()?;
        self.add_sample(self.target.object_points(), image_points)
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[CorrespondenceView] {
        &self.samples
    }

    /// Clear all accumulated samples. The published result, if any,
    /// remains current until the next successful calibration replaces it.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Run calibration over the accumulated samples and publish the
    /// result on success.
    pub fn calibrate(
        &mut self,
        opts: &CalibrateOptions,
    ) -> Result<&CalibrationResult, CalibrationError> {
        let result = calibrate(&self.samples, opts)?;
        log::info!(
            "published calibration over {} samples, rms {:.4} px",
            self.samples.len(),
            result.rms_error
        );
        Ok(self.result.insert(result))
    }

    /// The latest published calibration, if any.
    pub fn result(&self) -> Option<&CalibrationResult> {
        self.result.as_ref()
    }

    /// The current camera model: the latest published calibration, or the
    /// initial guess before the first success.
    pub fn camera(&self) -> &PinholeCamera {
        self.result
            .as_ref()
            .map(|r| &r.camera)
            .unwrap_or(&self.initial_camera)
    }

    /// Estimate the target pose in a single live view against the current
    /// camera model.
    pub fn estimate_pose(
        &self,
        image_points: &[Pt2],
        opts: &SolveOptions,
    ) -> Result<PoseEstimate, CalibrationError> {
        let world = self.target.object_points();
        estimate_pose(&world, image_points, self.camera(), opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcal_core::synthetic::{poses_yaw_y_z, project_views_all};

    fn target() -> ChessboardTarget {
        ChessboardTarget::new(4, 6, 0.03)
    }

    fn ground_truth_camera() -> PinholeCamera {
        PinholeCamera::new(
            Intrinsics::new(800.0, 780.0, 640.0, 360.0),
            Distortion::from_coefficients(&[-0.05, 0.005, 0.0, 0.0]),
        )
    }

    fn session_with_views(n: usize) -> CalibrationSession {
        let mut session = CalibrationSession::new(target(), 1280, 720);
        let board = target().object_points();
        let isos = poses_yaw_y_z(n, -0.15, 0.12, 0.5, 0.15);
        let views = project_views_all(&ground_truth_camera(), &board, &isos).unwrap();
        for view in views {
            session
                .add_sample(view.points_3d, view.points_2d)
                .unwrap();
        }
        session
    }

    #[test]
    fn starts_with_initial_guess_and_no_result() {
        let session = CalibrationSession::new(target(), 1280, 720);
        assert_eq!(session.sample_count(), 0);
        assert!(session.result().is_none());
        assert_eq!(session.camera().intrinsics.fx, 1.0);
        assert_eq!(session.camera().intrinsics.cx, 640.0);
    }

    #[test]
    fn add_sample_validates_pairing() {
        let mut session = CalibrationSession::new(target(), 1280, 720);
        let world = target().object_points();
        let image = vec![Pt2::new(0.0, 0.0); world.len() - 1];

        let err = session.add_sample(world, image).unwrap_err();
        assert!(matches!(
            err,
            CalibrationError::MismatchedCorrespondence { .. }
        ));
        assert_eq!(session.sample_count(), 0);
    }

    #[test]
    fn add_detection_pairs_with_target_points() {
        let mut session = CalibrationSession::new(target(), 1280, 720);
        let board = target().object_points();
        let iso = poses_yaw_y_z(1, 0.1, 0.0, 0.6, 0.0);
        let view = &project_views_all(&ground_truth_camera(), &board, &iso).unwrap()[0];

        session
            .add_detection(Detection::Found(view.points_2d.clone()))
            .unwrap();
        assert_eq!(session.sample_count(), 1);
        assert_eq!(session.samples()[0].points_3d, board);

        assert!(matches!(
            session.add_detection(Detection::NotFound),
            Err(CalibrationError::NotFound)
        ));
        assert_eq!(session.sample_count(), 1);
    }

    #[test]
    fn calibrate_publishes_and_failure_preserves_previous() {
        let mut session = session_with_views(3);
        let rms = session
            .calibrate(&CalibrateOptions::default())
            .unwrap()
            .rms_error;
        assert!(rms < 1e-4);

        let fx_published = session.camera().intrinsics.fx;
        assert!((fx_published - 800.0).abs() < 1.0);

        // Dropping to one sample makes the next run fail; the published
        // result must survive unchanged.
        session.reset();
        let board = target().object_points();
        let iso = poses_yaw_y_z(1, 0.1, 0.0, 0.6, 0.0);
        let view = &project_views_all(&ground_truth_camera(), &board, &iso).unwrap()[0];
        session
            .add_sample(view.points_3d.clone(), view.points_2d.clone())
            .unwrap();

        assert!(matches!(
            session.calibrate(&CalibrateOptions::default()),
            Err(CalibrationError::InsufficientSamples(1))
        ));
        assert_eq!(session.camera().intrinsics.fx, fx_published);
        assert!(session.result().is_some());
    }

    #[test]
    fn reset_clears_samples_only() {
        let mut session = session_with_views(3);
        session.calibrate(&CalibrateOptions::default()).unwrap();

        session.reset();
        assert_eq!(session.sample_count(), 0);
        assert!(session.result().is_some());
    }

    #[test]
    fn session_serde_roundtrip() {
        let mut session = session_with_views(2);
        session.calibrate(&CalibrateOptions::default()).unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: CalibrationSession = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.sample_count(), 2);
        assert!(restored.result().is_some());
        assert!(
            (restored.camera().intrinsics.fx - session.camera().intrinsics.fx).abs() < 1e-12
        );
    }
}
