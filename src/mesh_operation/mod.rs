use crate::DataStructure;

pub trait Operation {
  fn apply<D: DataStructure>(&self, mesh: &mut D);
}

mod normals;

pub use normals::CornerNormals;
pub use normals::FaceNormals;
pub use normals::VertexNormals;
pub use normals::DEFAULT_CREASE_ANGLE;
