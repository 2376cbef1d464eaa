use crate::data_structure::Scalar;
use crate::mesh_operation::Operation;
use crate::normals::{
  compute_corner_normals, compute_face_normals, compute_vertex_normals,
};
use crate::DataStructure;

use clap::Args;

pub const DEFAULT_CREASE_ANGLE: Scalar = 60.0;

/// Angle weighted normal per vertex.
#[derive(Args, Debug, Default)]
pub struct VertexNormals {}

impl Operation for VertexNormals {
  fn apply<D: DataStructure>(&self, mesh: &mut D) {
    compute_vertex_normals(mesh);
  }
}

/// Flat normal per face.
#[derive(Args, Debug, Default)]
pub struct FaceNormals {}

impl Operation for FaceNormals {
  fn apply<D: DataStructure>(&self, mesh: &mut D) {
    compute_face_normals(mesh);
  }
}

/// Normal per face corner, keeping edges sharper than the crease angle hard.
#[derive(Args, Debug)]
pub struct CornerNormals {
  /// crease angle in degrees
  #[arg(long, default_value_t = DEFAULT_CREASE_ANGLE)]
  crease_angle: Scalar,
}

impl CornerNormals {
  pub fn new(crease_angle: Scalar) -> Self {
    CornerNormals { crease_angle }
  }

  pub fn crease_angle(&self) -> Scalar {
    self.crease_angle
  }
}

impl Default for CornerNormals {
  fn default() -> Self {
    CornerNormals::new(DEFAULT_CREASE_ANGLE)
  }
}

impl Operation for CornerNormals {
  fn apply<D: DataStructure>(&self, mesh: &mut D) {
    compute_corner_normals(mesh, self.crease_angle);
  }
}
