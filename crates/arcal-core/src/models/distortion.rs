use serde::{Deserialize, Serialize};

use crate::math::{Real, Vec2};

/// Brown-Conrady radial + tangential lens distortion.
///
/// The coefficient vector layout is `[k1, k2, p1, p2, k3]`. This order is
/// part of the public contract: it is the order used by the exported
/// `distortion_coefficients` document and by the calibration parameter
/// vector.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Distortion {
    pub k1: Real,
    pub k2: Real,
    pub p1: Real,
    pub p2: Real,
    pub k3: Real,
}

impl Distortion {
    /// All coefficients zero (an ideal lens).
    pub fn zero() -> Self {
        Self::default()
    }

    /// Coefficients in the canonical `[k1, k2, p1, p2, k3]` order.
    pub fn coefficients(&self) -> [Real; 5] {
        [self.k1, self.k2, self.p1, self.p2, self.k3]
    }

    /// Build from a coefficient slice in `[k1, k2, p1, p2, k3]` order.
    /// Missing trailing coefficients default to zero.
    pub fn from_coefficients(coeffs: &[Real]) -> Self {
        let get = |i: usize| coeffs.get(i).copied().unwrap_or(0.0);
        Self {
            k1: get(0),
            k2: get(1),
            p1: get(2),
            p2: get(3),
            k3: get(4),
        }
    }

    /// Apply distortion to normalized sensor-plane coordinates.
    pub fn distort(&self, n: &Vec2) -> Vec2 {
        let (x, y) = (n.x, n.y);
        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;

        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;
        let x_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;

        Vec2::new(x * radial + x_tan, y * radial + y_tan)
    }

    /// Invert the distortion by fixed-point iteration.
    pub fn undistort(&self, distorted: &Vec2) -> Vec2 {
        let mut x = distorted.x;
        let mut y = distorted.y;

        for _ in 0..8 {
            let d = self.distort(&Vec2::new(x, y));
            x -= d.x - distorted.x;
            y -= d.y - distorted.y;
        }
        Vec2::new(x, y)
    }
}
