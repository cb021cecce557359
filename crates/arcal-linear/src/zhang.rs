//! Zhang-style closed-form intrinsics from plane homographies.

use arcal_core::{Intrinsics, Mat3, Real};
use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZhangError {
    #[error("need at least 2 homographies for intrinsics estimation, got {0}")]
    NotEnoughViews(usize),
    #[error("degenerate view configuration for intrinsics estimation")]
    Degenerate,
    #[error("svd failed")]
    SvdFailed,
}

/// Build the 6-vector v_ij(H) of Zhang's method for columns i, j of H.
fn v_ij(hmtx: &Mat3, i: usize, j: usize) -> nalgebra::SVector<Real, 6> {
    let hi = hmtx.column(i);
    let hj = hmtx.column(j);

    nalgebra::SVector::<Real, 6>::from_row_slice(&[
        hi[0] * hj[0],
        hi[0] * hj[1] + hi[1] * hj[0],
        hi[1] * hj[1],
        hi[2] * hj[0] + hi[0] * hj[2],
        hi[2] * hj[1] + hi[1] * hj[2],
        hi[2] * hj[2],
    ])
}

/// Estimate camera intrinsics from a set of plane homographies using
/// Zhang's closed-form solution.
///
/// Each homography contributes the two orthogonality constraints on the
/// rotation columns it encodes. A zero-skew constraint row (`B12 = 0`) is
/// appended to the system, which makes two differently-oriented views the
/// hard floor; three or more give a better-conditioned solve.
pub fn intrinsics_from_homographies(hmtxs: &[Mat3]) -> Result<Intrinsics, ZhangError> {
    let m = hmtxs.len();
    if m < 2 {
        return Err(ZhangError::NotEnoughViews(m));
    }

    // At least 6 rows (zero-padded below 6) so the thin SVD carries the
    // full right-singular basis, nullspace vector included.
    let mut vmtx = DMatrix::<Real>::zeros((2 * m + 1).max(6), 6);
    let mut row_norm_sum = 0.0;

    for (k, hmtx) in hmtxs.iter().enumerate() {
        let v11 = v_ij(hmtx, 0, 0);
        let v22 = v_ij(hmtx, 1, 1);
        let v12 = v_ij(hmtx, 0, 1);
        let v_diff = v11 - v22;

        row_norm_sum += v12.norm() + v_diff.norm();

        vmtx.row_mut(2 * k).copy_from(&v12.transpose());
        vmtx.row_mut(2 * k + 1).copy_from(&v_diff.transpose());
    }

    // Zero-skew constraint B12 = 0, weighted like an average data row so
    // it neither dominates nor vanishes in the nullspace solve.
    let skew_weight = row_norm_sum / (2 * m) as Real;
    vmtx[(2 * m, 1)] = skew_weight;

    // Solve V b = 0 via SVD: singular vector of the smallest singular value.
    let svd = vmtx.svd(true, true);
    let v_t = svd.v_t.ok_or(ZhangError::SvdFailed)?;
    let b_row = v_t.row(v_t.nrows() - 1);

    // B is defined up to sign; it must be positive-definite, so fix B11 > 0.
    let sign = if b_row[0] < 0.0 { -1.0 } else { 1.0 };
    let b11 = sign * b_row[0];
    let b12 = sign * b_row[1];
    let b22 = sign * b_row[2];
    let b13 = sign * b_row[3];
    let b23 = sign * b_row[4];
    let b33 = sign * b_row[5];

    // From Zhang's paper:
    //
    // v0 = (B12 B13 - B11 B23) / (B11 B22 - B12^2)
    // λ  = B33 - (B13^2 + v0 (B12 B13 - B11 B23)) / B11
    // α  = sqrt(λ / B11)
    // β  = sqrt(λ B11 / (B11 B22 - B12^2))
    // γ  = -B12 α^2 β / λ
    // u0 = γ v0 / β - B13 α^2 / λ
    let denom = b11 * b22 - b12 * b12;
    let denom_norm = b11 * b11 + b22 * b22;
    if denom_norm <= 0.0 || denom.abs() / denom_norm <= 1e-9 {
        return Err(ZhangError::Degenerate);
    }

    let v0 = (b12 * b13 - b11 * b23) / denom;
    let lambda = b33 - (b13 * b13 + v0 * (b12 * b13 - b11 * b23)) / b11;

    if !(lambda / b11 > 0.0 && lambda * b11 / denom > 0.0) {
        return Err(ZhangError::Degenerate);
    }

    let alpha = (lambda / b11).sqrt();
    let beta = (lambda * b11 / denom).sqrt();
    let gamma = -b12 * alpha * alpha * beta / lambda;
    let u0 = gamma * v0 / beta - b13 * alpha * alpha / lambda;

    if !(alpha.is_finite() && beta.is_finite() && u0.is_finite() && v0.is_finite()) {
        return Err(ZhangError::Degenerate);
    }

    Ok(Intrinsics::new(alpha, beta, u0, v0))
}
