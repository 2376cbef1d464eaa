mod base;
pub use base::DataStructure;
pub use base::Face;
pub use base::IndexType;
pub use base::Normal;
pub use base::Point;
pub use base::Scalar;

mod half_edge;
pub use half_edge::FaceKey;
pub use half_edge::HalfEdge;
pub use half_edge::HalfEdgeKey;
pub use half_edge::VertexKey;
