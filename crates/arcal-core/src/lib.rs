//! Core math and geometry primitives for `arcal-rs`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Pt2`, `Pt3`, ...),
//! - the pinhole camera model (intrinsics + Brown-Conrady distortion),
//! - the axis-angle [`Pose`] representation,
//! - 2D-3D correspondence observations,
//! - the planar chessboard target model,
//! - synthetic view generation for tests and examples.
//!
//! Camera pipeline:
//! `pixel = K ∘ distortion ∘ perspective(P_cam)`

/// Linear algebra type aliases and helpers.
pub mod math;
/// Camera intrinsics, distortion and projection models.
pub mod models;
/// 2D-3D point correspondence observations.
pub mod observation;
/// Axis-angle rigid pose representation.
pub mod pose;
/// Synthetic poses and projected views.
pub mod synthetic;
/// Planar calibration target model.
pub mod target;

pub use math::*;
pub use models::*;
pub use observation::CorrespondenceView;
pub use pose::Pose;
pub use target::ChessboardTarget;
