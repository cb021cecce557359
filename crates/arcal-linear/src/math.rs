//! Shared math helpers for the linear solvers.
//!
//! Hartley normalization conditions the DLT systems; the SVD row
//! extraction recovers matrices from nullspace solutions; the collinearity
//! test guards pose estimation against underdetermined input.

use arcal_core::{from_homogeneous, to_homogeneous, Mat3, Pt2, Real};
use nalgebra::DMatrix;

/// Hartley normalization for 2D points.
///
/// Centers the points at the origin and scales them so the mean distance
/// from the origin is `√2`. Returns the normalized points and the 3x3
/// transform `T` with `p_norm = T * p_homogeneous`, or `None` if the
/// input is empty or all points coincide.
pub fn normalize_points_2d(points: &[Pt2]) -> Option<(Vec<Pt2>, Mat3)> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as Real;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in points {
        cx += p.x;
        cy += p.y;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0;
    for p in points {
        let dx = p.x - cx;
        let dy = p.y - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    if mean_dist <= Real::EPSILON {
        return None;
    }

    let scale = (2.0_f64).sqrt() / mean_dist;
    let t = Mat3::new(
        scale,
        0.0,
        -scale * cx,
        0.0,
        scale,
        -scale * cy,
        0.0,
        0.0,
        1.0,
    );

    let norm = points
        .iter()
        .map(|p| Pt2::new((p.x - cx) * scale, (p.y - cy) * scale))
        .collect();

    Some((norm, t))
}

/// Reshape a 9-element row of an SVD `V^T` matrix into a 3x3 matrix.
///
/// The row is typically the last one, i.e. the nullspace direction of a
/// DLT design matrix.
pub fn mat3_from_svd_row(v_t: &DMatrix<Real>, row_idx: usize) -> Mat3 {
    assert_eq!(v_t.ncols(), 9, "expected 9 columns for 3x3 extraction");
    let mut m = Mat3::zeros();
    for r in 0..3 {
        for c in 0..3 {
            m[(r, c)] = v_t[(row_idx, 3 * r + c)];
        }
    }
    m
}

/// Apply a homography to a 2D point.
pub fn apply_homography(h: &Mat3, p: &Pt2) -> Pt2 {
    from_homogeneous(&(h * to_homogeneous(p)))
}

/// Test whether a planar point set is collinear (or degenerate to a
/// single point).
///
/// Uses the eigenvalue ratio of the 2x2 scatter matrix: the set is
/// collinear when the smaller principal axis carries (numerically) no
/// spread.
pub fn points_collinear(points: &[Pt2]) -> bool {
    if points.len() < 3 {
        return true;
    }

    let n = points.len() as Real;
    let cx = points.iter().map(|p| p.x).sum::<Real>() / n;
    let cy = points.iter().map(|p| p.y).sum::<Real>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for p in points {
        let dx = p.x - cx;
        let dy = p.y - cy;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    // Eigenvalues of [[sxx, sxy], [sxy, syy]].
    let trace = sxx + syy;
    let det = sxx * syy - sxy * sxy;
    let disc = (trace * trace / 4.0 - det).max(0.0).sqrt();
    let major = trace / 2.0 + disc;
    let minor = trace / 2.0 - disc;

    major <= Real::EPSILON || minor <= 1e-12 * major
}
