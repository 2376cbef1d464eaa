use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::hash::Hash;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::base::Vector3;
use tracing::info;

use crate::error::MeshResult;

pub type IndexType = u32;
pub type Scalar = f32;
pub type Point = Vector3<Scalar>;
pub type Normal = Vector3<Scalar>;
pub type Face = Vec<IndexType>;

pub trait DataStructure: Sized {
  fn from_iters<IterVert, IterFace>(
    vertices: IterVert,
    faces: IterFace,
  ) -> MeshResult<Self>
  where
    IterVert: IntoIterator<Item = Point>,
    IterFace: IntoIterator<Item = Face>;

  fn from_obj(path: &Path) -> MeshResult<Self> {
    let options = tobj::LoadOptions {
      triangulate: false,
      ignore_points: true,
      ignore_lines: true,
      ..Default::default()
    };
    let (models, _) = tobj::load_obj(path, &options)?;

    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for m in &models {
      let mesh = &m.mesh;
      // indices are local to each model
      let offset = vertices.len() as IndexType;

      vertices.extend(
        mesh
          .positions
          .chunks_exact(3)
          .map(|vals| Point::new(vals[0], vals[1], vals[2])),
      );

      if mesh.face_arities.is_empty() {
        faces.extend(
          mesh
            .indices
            .chunks_exact(3)
            .map(|vals| vals.iter().map(|idx| idx + offset).collect::<Face>()),
        );
      } else {
        let mut indices = mesh.indices.iter();
        for arity in &mesh.face_arities {
          faces.push(
            indices
              .by_ref()
              .take(*arity as usize)
              .map(|idx| idx + offset)
              .collect::<Face>(),
          );
        }
      }
    }

    info!(
      path = %path.display(),
      vertices = vertices.len(),
      faces = faces.len(),
      "loaded obj"
    );

    Self::from_iters(vertices, faces)
  }

  fn num_vertices(&self) -> usize;

  fn num_half_edges(&self) -> usize;

  fn num_faces(&self) -> usize;

  type VertexKey: Copy + Debug + Eq + Hash;
  type HalfEdgeKey: Copy + Debug + Eq + Hash;
  type FaceKey: Copy + Debug + Eq + Hash;
  type IterVertexKeys: Iterator<Item = Self::VertexKey>;
  type IterHalfEdgeKeys: Iterator<Item = Self::HalfEdgeKey>;
  type IterFaceKeys: Iterator<Item = Self::FaceKey>;

  fn vertex_keys(&self) -> Self::IterVertexKeys;

  fn half_edge_keys(&self) -> Self::IterHalfEdgeKeys;

  fn face_keys(&self) -> Self::IterFaceKeys;

  fn set_position(&mut self, key: Self::VertexKey, position: &Point);

  fn get_position(&self, key: Self::VertexKey) -> Point;

  // outgoing, boundary one if the vertex is on the boundary
  fn vertex_half_edge(&self, key: Self::VertexKey) -> Option<Self::HalfEdgeKey>;

  fn face_half_edge(&self, key: Self::FaceKey) -> Self::HalfEdgeKey;

  fn to_vertex(&self, key: Self::HalfEdgeKey) -> Self::VertexKey;

  fn from_vertex(&self, key: Self::HalfEdgeKey) -> Self::VertexKey {
    self.to_vertex(self.opposite(key))
  }

  fn next(&self, key: Self::HalfEdgeKey) -> Self::HalfEdgeKey;

  fn prev(&self, key: Self::HalfEdgeKey) -> Self::HalfEdgeKey;

  fn opposite(&self, key: Self::HalfEdgeKey) -> Self::HalfEdgeKey;

  fn face(&self, key: Self::HalfEdgeKey) -> Option<Self::FaceKey>;

  fn is_boundary(&self, key: Self::HalfEdgeKey) -> bool {
    self.face(key).is_none()
  }

  /// Next outgoing half edge clockwise around `from_vertex(key)`.
  fn cw_rotated(&self, key: Self::HalfEdgeKey) -> Self::HalfEdgeKey {
    self.next(self.opposite(key))
  }

  /// Next outgoing half edge counter-clockwise around `from_vertex(key)`.
  fn ccw_rotated(&self, key: Self::HalfEdgeKey) -> Self::HalfEdgeKey {
    self.opposite(self.prev(key))
  }

  // normal attributes are created on first write, or up front by the
  // ensure hooks so they exist even with no elements to write

  fn vertex_normal(&self, key: Self::VertexKey) -> Option<Normal>;

  fn set_vertex_normal(&mut self, key: Self::VertexKey, normal: Normal);

  fn ensure_vertex_normals(&mut self);

  fn face_normal(&self, key: Self::FaceKey) -> Option<Normal>;

  fn set_face_normal(&mut self, key: Self::FaceKey, normal: Normal);

  fn ensure_face_normals(&mut self);

  fn corner_normal(&self, key: Self::HalfEdgeKey) -> Option<Normal>;

  fn set_corner_normal(&mut self, key: Self::HalfEdgeKey, normal: Normal);

  fn ensure_corner_normals(&mut self);

  fn has_vertex_normals(&self) -> bool;

  fn has_face_normals(&self) -> bool;

  fn has_corner_normals(&self) -> bool;

  fn to_vecs(&self) -> (Vec<Point>, Vec<Face>);

  fn write_obj<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
    let mut vertex_idxs = HashMap::with_capacity(self.num_vertices());

    for (idx, vertex) in self.vertex_keys().enumerate() {
      let position = self.get_position(vertex);
      writeln!(writer, "v {} {} {}", position[0], position[1], position[2])?;
      vertex_idxs.insert(vertex, idx + 1);
    }

    let write_normal = |writer: &mut W, normal: Option<Normal>| {
      let normal = normal.unwrap_or_else(Normal::zeros);
      writeln!(writer, "vn {} {} {}", normal[0], normal[1], normal[2])
    };

    // corner normals win over vertex normals, which win over face normals
    let corner_normals = self.has_corner_normals();
    let vertex_normals = !corner_normals && self.has_vertex_normals();
    let face_normals =
      !corner_normals && !vertex_normals && self.has_face_normals();

    if vertex_normals {
      for vertex in self.vertex_keys() {
        write_normal(&mut *writer, self.vertex_normal(vertex))?;
      }
    } else if face_normals {
      for face in self.face_keys() {
        write_normal(&mut *writer, self.face_normal(face))?;
      }
    }

    let mut corner_idx = 0;
    let mut corners = Vec::new();

    for (face_idx, face) in self.face_keys().enumerate() {
      corners.clear();

      let start = self.face_half_edge(face);
      let mut half_edge = start;
      loop {
        let vertex_idx = vertex_idxs[&self.to_vertex(half_edge)];

        let corner = if corner_normals {
          write_normal(&mut *writer, self.corner_normal(half_edge))?;
          corner_idx += 1;
          format!("{}//{}", vertex_idx, corner_idx)
        } else if vertex_normals {
          format!("{}//{}", vertex_idx, vertex_idx)
        } else if face_normals {
          format!("{}//{}", vertex_idx, face_idx + 1)
        } else {
          vertex_idx.to_string()
        };
        corners.push(corner);

        half_edge = self.next(half_edge);
        if half_edge == start {
          break;
        }
      }

      writeln!(writer, "f {}", corners.join(" "))?;
    }

    Ok(())
  }

  fn save_obj(&self, path: &Path) -> MeshResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    self.write_obj(&mut writer)?;

    writer.flush()?;

    info!(
      path = %path.display(),
      vertices = self.num_vertices(),
      faces = self.num_faces(),
      "saved obj"
    );

    Ok(())
  }
}
