//! Observation types for calibration data.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::math::{Pt2, Pt3};

/// A single view of the calibration target: 3D target-frame points paired
/// index-for-index with their detected 2D pixel positions.
///
/// Both sequences follow the same row-major target traversal order; the
/// pairing is by index, not by spatial matching, so length and ordering
/// are a hard invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrespondenceView {
    /// 3D points in the target frame (z = 0 for a planar target).
    pub points_3d: Vec<Pt3>,
    /// Corresponding detected pixel positions.
    pub points_2d: Vec<Pt2>,
}

impl CorrespondenceView {
    /// Construct a view, validating that the sequences pair up.
    ///
    /// # Errors
    ///
    /// Returns an error if the 3D and 2D point counts differ.
    pub fn new(points_3d: Vec<Pt3>, points_2d: Vec<Pt2>) -> Result<Self> {
        ensure!(
            points_3d.len() == points_2d.len(),
            "3D / 2D point counts must match: {} vs {}",
            points_3d.len(),
            points_2d.len()
        );
        Ok(Self {
            points_3d,
            points_2d,
        })
    }

    /// Number of point correspondences in this view.
    #[inline]
    pub fn len(&self) -> usize {
        self.points_3d.len()
    }

    /// Returns true if this view has no correspondences.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points_3d.is_empty()
    }

    /// The in-plane (x, y) coordinates of the target points.
    pub fn planar_points(&self) -> Vec<Pt2> {
        self.points_3d.iter().map(|p| Pt2::new(p.x, p.y)).collect()
    }

    /// Iterate over (3D point, 2D point) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Pt3, &Pt2)> {
        self.points_3d.iter().zip(self.points_2d.iter())
    }
}
