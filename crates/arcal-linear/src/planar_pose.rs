//! Pose recovery by plane-induced homography decomposition.
//!
//! Decomposes `H = K [r1 r2 t]` (target on its own Z = 0 plane) into a
//! rotation and translation mapping target coordinates into the camera
//! frame.

use arcal_core::{Iso3, Mat3, Real, Vec3};
use nalgebra::{Matrix3, Rotation3, Translation3, UnitQuaternion};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanarPoseError {
    #[error("intrinsics matrix is not invertible")]
    SingularIntrinsics,
    #[error("homography columns have vanishing norm")]
    DegenerateHomography,
    #[error("svd failed")]
    SvdFailed,
}

/// Estimate the pose of a planar target relative to the camera, given
/// intrinsics K and the plane-to-image homography H.
///
/// Returns an `Iso3` mapping target coordinates into camera coordinates.
/// The scale sign is chosen so the target lies in front of the camera
/// (`t.z > 0`), which the decomposition otherwise leaves ambiguous.
pub fn pose_from_homography(kmtx: &Mat3, hmtx: &Mat3) -> Result<Iso3, PlanarPoseError> {
    let k_inv = kmtx
        .try_inverse()
        .ok_or(PlanarPoseError::SingularIntrinsics)?;

    let k_inv_h1 = k_inv * hmtx.column(0);
    let k_inv_h2 = k_inv * hmtx.column(1);
    let k_inv_h3 = k_inv * hmtx.column(2).into_owned();

    // Scale λ: normalize the first two columns (averaged).
    let norm1 = k_inv_h1.norm();
    let norm2 = k_inv_h2.norm();
    if norm1 <= Real::EPSILON || norm2 <= Real::EPSILON {
        return Err(PlanarPoseError::DegenerateHomography);
    }
    let mut lambda = 1.0 / ((norm1 + norm2) * 0.5);

    // H is defined up to sign; pick the one that puts the target in front.
    if (lambda * k_inv_h3).z < 0.0 {
        lambda = -lambda;
    }

    let r1 = (lambda * k_inv_h1).into_owned();
    let r2 = (lambda * k_inv_h2).into_owned();
    let r3 = r1.cross(&r2);

    let mut r_mat = Matrix3::<Real>::zeros();
    r_mat.set_column(0, &r1);
    r_mat.set_column(1, &r2);
    r_mat.set_column(2, &r3);

    // Project onto SO(3) via SVD.
    let svd = r_mat.svd(true, true);
    let u = svd.u.ok_or(PlanarPoseError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(PlanarPoseError::SvdFailed)?;
    let mut r_orth = u * v_t;
    if r_orth.determinant() < 0.0 {
        let mut u_flipped = u;
        u_flipped.column_mut(2).neg_mut();
        r_orth = u_flipped * v_t;
    }

    let t_vec: Vec3 = lambda * k_inv_h3;
    let rot = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(r_orth));

    Ok(Iso3::from_parts(Translation3::from(t_vec), rot))
}
