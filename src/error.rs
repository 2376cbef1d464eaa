//! Error types for mesh construction and OBJ I/O.

use thiserror::Error;

use crate::data_structure::IndexType;

/// Errors that can occur while building, loading or saving a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
  /// The OBJ file could not be parsed.
  #[error("failed to load obj: {0}")]
  Load(#[from] tobj::LoadError),

  /// Writing the mesh failed.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A face references a vertex that does not exist.
  #[error("face {face} references vertex {index}, which is out of range")]
  InvalidVertexIndex { face: usize, index: IndexType },

  /// A face has fewer than 3 vertices or repeats a vertex.
  #[error("face {face} has fewer than 3 distinct vertices")]
  DegenerateFace { face: usize },

  /// The directed edge is already used by another face.
  #[error("edge {from} -> {to} is shared by more than one face")]
  NonManifoldEdge { from: IndexType, to: IndexType },

  /// The faces around this vertex do not form a single fan.
  #[error("vertex {vertex} is not manifold")]
  ComplexVertex { vertex: IndexType },
}

/// Result type for mesh operations.
pub type MeshResult<T> = std::result::Result<T, MeshError>;
