pub mod data_structure;
pub mod error;
pub mod mesh_operation;
pub mod normals;
pub mod utils;

pub use data_structure::DataStructure;
pub use data_structure::HalfEdge;
pub use data_structure::{Normal, Point, Scalar};

pub use error::{MeshError, MeshResult};

pub use mesh_operation::Operation;

pub use mesh_operation::CornerNormals;
pub use mesh_operation::FaceNormals;
pub use mesh_operation::VertexNormals;

pub use normals::{
  compute_corner_normal, compute_corner_normals, compute_face_normal,
  compute_face_normals, compute_vertex_normal, compute_vertex_normals,
};
