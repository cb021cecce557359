//! Pattern-detector boundary.
//!
//! Corner search itself is an external collaborator; the pipeline only
//! consumes its output. A detector reports either the full ordered corner
//! list or nothing. The ordering contract is absolute: `Found` carries
//! `rows * cols` pixel positions in the same row-major traversal order as
//! [`arcal_core::ChessboardTarget::object_points`], and the two are paired
//! by index, never by spatial matching.

use arcal_core::Pt2;
use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// Inner-corner grid shape the detector searches for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn point_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// Outcome of a pattern search on one frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Detection {
    /// All corners located, row-major, sub-pixel refined.
    Found(Vec<Pt2>),
    /// No pattern in this frame; the frame is skipped.
    NotFound,
}

impl Detection {
    /// Unwrap the corner list, mapping `NotFound` to its error kind.
    pub fn into_points(self) -> Result<Vec<Pt2>, CalibrationError> {
        match self {
            Detection::Found(points) => Ok(points),
            Detection::NotFound => Err(CalibrationError::NotFound),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Detection::Found(_))
    }
}

/// External corner detector driving the pipeline.
///
/// `Frame` is whatever image representation the host supplies; the
/// pipeline never inspects it.
pub trait PatternDetector {
    type Frame;

    fn detect(&mut self, frame: &Self::Frame, shape: GridShape) -> Detection;
}
