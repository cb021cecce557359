//! Wireframe overlay model.

use anyhow::{ensure, Result};
use arcal_core::Pt3;
use serde::{Deserialize, Serialize};

/// 3D wireframe geometry for AR overlay: a vertex list plus faces, each
/// face an ordered list of vertex indices describing a closed polyline.
///
/// Supplied externally (model-file parsing is out of scope here) and
/// read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireframeModel {
    pub vertices: Vec<Pt3>,
    pub faces: Vec<Vec<usize>>,
}

impl WireframeModel {
    /// Construct a model, validating that every face index is in range
    /// and every face has at least two vertices.
    pub fn new(vertices: Vec<Pt3>, faces: Vec<Vec<usize>>) -> Result<Self> {
        for (fi, face) in faces.iter().enumerate() {
            ensure!(face.len() >= 2, "face {} has fewer than 2 vertices", fi);
            for &vi in face {
                ensure!(
                    vi < vertices.len(),
                    "face {} references vertex {} out of {}",
                    fi,
                    vi,
                    vertices.len()
                );
            }
        }
        Ok(Self { vertices, faces })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}
