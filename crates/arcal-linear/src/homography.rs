//! Normalized DLT homography estimation.

use arcal_core::{Mat3, Pt2, Real};
use nalgebra::DMatrix;
use thiserror::Error;

use crate::math::{mat3_from_svd_row, normalize_points_2d};

#[derive(Debug, Error)]
pub enum HomographyError {
    #[error("need at least 4 point correspondences, got {0}")]
    NotEnoughPoints(usize),
    #[error("degenerate point configuration for homography estimation")]
    DegeneratePoints,
    #[error("svd failed")]
    SvdFailed,
}

/// Estimate H such that `image ~ H * plane` using a normalized DLT.
///
/// Both point sets are Hartley-normalized before building the design
/// matrix; the result is denormalized and scaled so `H[2,2] = 1`.
pub fn dlt_homography(plane: &[Pt2], image: &[Pt2]) -> Result<Mat3, HomographyError> {
    let n = plane.len();
    if n < 4 || image.len() != n {
        return Err(HomographyError::NotEnoughPoints(n));
    }

    let (plane_n, t_plane) =
        normalize_points_2d(plane).ok_or(HomographyError::DegeneratePoints)?;
    let (image_n, t_image) =
        normalize_points_2d(image).ok_or(HomographyError::DegeneratePoints)?;

    // At least 9 rows (zero-padded below 9) so the thin SVD carries the
    // full right-singular basis, nullspace vector included.
    let mut a = DMatrix::<Real>::zeros((2 * n).max(9), 9);

    for (i, (pw, pi)) in plane_n.iter().zip(image_n.iter()).enumerate() {
        let x = pw.x;
        let y = pw.y;
        let u = pi.x;
        let v = pi.y;

        let r0 = 2 * i;
        let r1 = 2 * i + 1;

        a[(r0, 0)] = -x;
        a[(r0, 1)] = -y;
        a[(r0, 2)] = -1.0;
        a[(r0, 6)] = u * x;
        a[(r0, 7)] = u * y;
        a[(r0, 8)] = u;

        a[(r1, 3)] = -x;
        a[(r1, 4)] = -y;
        a[(r1, 5)] = -1.0;
        a[(r1, 6)] = v * x;
        a[(r1, 7)] = v * y;
        a[(r1, 8)] = v;
    }

    // Solve A h = 0 via SVD (smallest singular value).
    let svd = a.svd(true, true);
    let v_t = svd.v_t.ok_or(HomographyError::SvdFailed)?;
    let h_norm = mat3_from_svd_row(&v_t, v_t.nrows() - 1);

    // Denormalize: H = T_image^{-1} * H_norm * T_plane.
    let t_image_inv = t_image.try_inverse().ok_or(HomographyError::SvdFailed)?;
    let mut h = t_image_inv * h_norm * t_plane;

    let scale = h[(2, 2)];
    if scale.abs() <= Real::EPSILON {
        return Err(HomographyError::DegeneratePoints);
    }
    h /= scale;

    Ok(h)
}
