//! Deterministic forward projection of 3D geometry.
//!
//! Used both to validate calibration (reprojection error) and to render
//! AR overlays. Points at or behind the camera plane are reported as
//! `None` slots, never clamped or silently dropped, so rendering can skip
//! exactly the affected vertices and edges.

use arcal_core::{PinholeCamera, Pose, Pt2, Pt3};

use crate::model::WireframeModel;

/// Project target/model-frame points into pixel coordinates.
///
/// Pure function of its inputs. The output has one slot per input point,
/// in input order; unprojectable points become `None`.
pub fn project_points(camera: &PinholeCamera, pose: &Pose, points: &[Pt3]) -> Vec<Option<Pt2>> {
    let iso = pose.to_isometry();
    points
        .iter()
        .map(|p| camera.project_point(&iso.transform_point(p)))
        .collect()
}

/// Project every face of a wireframe model as a closed polyline.
///
/// Each face maps to its vertices' projected positions, `None` where a
/// vertex is unprojectable.
pub fn project_model(
    camera: &PinholeCamera,
    pose: &Pose,
    model: &WireframeModel,
) -> Vec<Vec<Option<Pt2>>> {
    let projected = project_points(camera, pose, &model.vertices);
    model
        .faces
        .iter()
        .map(|face| face.iter().map(|&vi| projected[vi]).collect())
        .collect()
}

/// Drawable segments of a closed polyline, skipping every segment with an
/// unprojectable endpoint.
pub fn polyline_segments(face_points: &[Option<Pt2>]) -> Vec<(Pt2, Pt2)> {
    let n = face_points.len();
    if n < 2 {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        if let (Some(a), Some(b)) = (face_points[i], face_points[j]) {
            segments.push((a, b));
        }
    }
    segments
}
