//! Planar chessboard calibration target.

use serde::{Deserialize, Serialize};

use crate::math::{Pt3, Real};

/// Inner-corner grid of a planar chessboard target.
///
/// The target defines its own coordinate frame on the z = 0 plane. The
/// canonical point order is row-major: the column index grows along +x,
/// the row index along **-y**. This matches the traversal order the
/// pattern detector reports, so the two lists pair by index.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ChessboardTarget {
    /// Number of inner-corner rows.
    pub rows: usize,
    /// Number of inner-corner columns.
    pub cols: usize,
    /// Side length of one square, in world units.
    pub square_size: Real,
}

impl ChessboardTarget {
    pub fn new(rows: usize, cols: usize, square_size: Real) -> Self {
        Self {
            rows,
            cols,
            square_size,
        }
    }

    /// Total number of inner corners.
    pub fn point_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Canonical target-frame coordinates of every inner corner,
    /// in row-major order.
    pub fn object_points(&self) -> Vec<Pt3> {
        let s = self.square_size;
        let mut points = Vec::with_capacity(self.point_count());
        for r in 0..self.rows {
            for c in 0..self.cols {
                points.push(Pt3::new(c as Real * s, -(r as Real) * s, 0.0));
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_and_sign_convention() {
        let target = ChessboardTarget::new(9, 6, 1.0);
        let pts = target.object_points();

        assert_eq!(pts.len(), 54);
        // Row-major: first row walks the columns along +x.
        assert_eq!(pts[0], Pt3::new(0.0, 0.0, 0.0));
        assert_eq!(pts[1], Pt3::new(1.0, 0.0, 0.0));
        assert_eq!(pts[5], Pt3::new(5.0, 0.0, 0.0));
        // Next row steps along -y.
        assert_eq!(pts[6], Pt3::new(0.0, -1.0, 0.0));
        assert_eq!(pts[53], Pt3::new(5.0, -8.0, 0.0));
    }

    #[test]
    fn square_size_scales_coordinates() {
        let target = ChessboardTarget::new(2, 2, 0.03);
        let pts = target.object_points();
        assert!((pts[1].x - 0.03).abs() < 1e-15);
        assert!((pts[2].y + 0.03).abs() < 1e-15);
    }

    #[test]
    fn all_points_on_plane() {
        let target = ChessboardTarget::new(4, 5, 0.5);
        assert!(target.object_points().iter().all(|p| p.z == 0.0));
    }
}
