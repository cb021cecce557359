use serde::{Deserialize, Serialize};

use crate::math::{Mat3, Pt2, Real, Vec2};

/// Pinhole intrinsic parameters with zero skew.
///
/// Maps normalized sensor-plane coordinates to pixel coordinates through
/// the upper-triangular camera matrix `K = [[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Intrinsics {
    /// Focal length in pixels along X.
    pub fx: Real,
    /// Focal length in pixels along Y.
    pub fy: Real,
    /// Principal point X coordinate in pixels.
    pub cx: Real,
    /// Principal point Y coordinate in pixels.
    pub cy: Real,
}

impl Intrinsics {
    pub fn new(fx: Real, fy: Real, cx: Real, cy: Real) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Intrinsics used before the first calibration run: unit focal
    /// lengths and the principal point at the image center.
    pub fn initial_guess(image_width: usize, image_height: usize) -> Self {
        Self {
            fx: 1.0,
            fy: 1.0,
            cx: image_width as Real / 2.0,
            cy: image_height as Real / 2.0,
        }
    }

    /// Return the 3x3 camera matrix K.
    pub fn k_matrix(&self) -> Mat3 {
        Mat3::new(
            self.fx, 0.0, self.cx, 0.0, self.fy, self.cy, 0.0, 0.0, 1.0,
        )
    }

    /// Convert normalized sensor-plane coordinates into pixel coordinates.
    pub fn normalized_to_pixel(&self, n: &Vec2) -> Pt2 {
        Pt2::new(self.fx * n.x + self.cx, self.fy * n.y + self.cy)
    }

    /// Convert pixel coordinates into normalized sensor-plane coordinates.
    pub fn pixel_to_normalized(&self, pixel: &Pt2) -> Vec2 {
        Vec2::new((pixel.x - self.cx) / self.fx, (pixel.y - self.cy) / self.fy)
    }
}
