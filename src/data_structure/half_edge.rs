use crate::data_structure::base::{Face, IndexType, Normal, Point};
use crate::data_structure::DataStructure;
use crate::error::{MeshError, MeshResult};

use std::collections::HashMap;
use std::iter::Map;
use std::ops::Range;

use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey(pub IndexType);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeKey(pub IndexType);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey(pub IndexType);

struct HalfEdgeRef {
  twin_idx: IndexType,
  next_idx: IndexType,
  prev_idx: IndexType,
  to_vertex_idx: IndexType,
  // None on the boundary
  face_idx: Option<IndexType>,
}

#[derive(Clone)]
struct VertexRef {
  half_edge_idx: Option<IndexType>,
  position: Point,
}

struct FaceRef {
  half_edge_idx: IndexType,
}

/// Index based half edge mesh over arbitrary polygons.
///
/// Half edges are allocated in twin pairs, so every edge has both sides even
/// on the boundary. Boundary half edges have no face and are linked into
/// loops, which keeps rotation around boundary vertices well defined.
pub struct HalfEdge {
  half_edge_refs: Vec<HalfEdgeRef>,
  vertex_refs: Vec<VertexRef>,
  face_refs: Vec<FaceRef>,
  vertex_normals: Option<Vec<Normal>>,
  face_normals: Option<Vec<Normal>>,
  corner_normals: Option<Vec<Normal>>,
}

impl HalfEdge {
  fn get(&self, idx: IndexType) -> &HalfEdgeRef {
    &self.half_edge_refs[idx as usize]
  }

  #[cfg(debug_assertions)]
  fn from_idx(&self, idx: IndexType) -> IndexType {
    self.get(self.get(idx).twin_idx).to_vertex_idx
  }

  #[cfg(debug_assertions)]
  fn verify_half_edge_valid(&self, half_edge_idx: IndexType) {
    let half_edge = self.get(half_edge_idx);
    debug_assert_eq!(self.get(half_edge.twin_idx).twin_idx, half_edge_idx);
    debug_assert_ne!(half_edge.twin_idx, half_edge_idx);
    debug_assert_eq!(self.get(half_edge.next_idx).prev_idx, half_edge_idx);
    debug_assert_eq!(self.get(half_edge.prev_idx).next_idx, half_edge_idx);
    debug_assert_eq!(
      self.from_idx(half_edge.next_idx),
      half_edge.to_vertex_idx
    );
    debug_assert_eq!(self.get(half_edge.next_idx).face_idx, half_edge.face_idx);
  }

  #[cfg(not(debug_assertions))]
  fn verify_half_edge_valid(&self, _: IndexType) {}

  /// Number of outgoing half edges reached by rotating around `vertex_idx`.
  fn ring_len(&self, vertex_idx: IndexType) -> usize {
    match self.vertex_refs[vertex_idx as usize].half_edge_idx {
      None => 0,
      Some(start) => {
        let bound = self.half_edge_refs.len();
        let mut half_edge_idx = start;
        let mut len = 0;
        loop {
          len += 1;
          half_edge_idx = self.get(self.get(half_edge_idx).twin_idx).next_idx;
          if half_edge_idx == start || len > bound {
            break;
          }
        }
        len
      }
    }
  }

  /// Vertex keys of `face` in half edge order.
  pub fn get_face_neighbors(&self, face: FaceKey) -> Face {
    let start = self.face_refs[face.0 as usize].half_edge_idx;
    let mut half_edge_idx = start;
    let mut neighbors = Vec::new();
    loop {
      neighbors.push(self.get(half_edge_idx).to_vertex_idx);
      half_edge_idx = self.get(half_edge_idx).next_idx;
      if half_edge_idx == start {
        break;
      }
    }
    neighbors
  }

  pub fn degree(&self, vertex: VertexKey) -> usize {
    self.ring_len(vertex.0)
  }

  fn vertex_normals_mut(&mut self) -> &mut Vec<Normal> {
    let len = self.vertex_refs.len();
    self.vertex_normals.get_or_insert_with(|| vec![Normal::zeros(); len])
  }

  fn face_normals_mut(&mut self) -> &mut Vec<Normal> {
    let len = self.face_refs.len();
    self.face_normals.get_or_insert_with(|| vec![Normal::zeros(); len])
  }

  fn corner_normals_mut(&mut self) -> &mut Vec<Normal> {
    let len = self.half_edge_refs.len();
    self.corner_normals.get_or_insert_with(|| vec![Normal::zeros(); len])
  }
}

impl DataStructure for HalfEdge {
  fn from_iters<IterVert, IterFace>(
    vertices: IterVert,
    faces: IterFace,
  ) -> MeshResult<Self>
  where
    IterVert: IntoIterator<Item = Point>,
    IterFace: IntoIterator<Item = Face>,
  {
    let mut vertex_refs: Vec<VertexRef> = vertices
      .into_iter()
      .map(|position| VertexRef {
        half_edge_idx: None,
        position,
      })
      .collect();
    let num_vertices = vertex_refs.len();

    let mut vertex_pair_to_half_edge_idx = HashMap::new();

    let mut half_edge_refs = Vec::<HalfEdgeRef>::new();
    let mut face_refs = Vec::new();
    let mut loop_idxs = Vec::new();

    for (face_num, face) in faces.into_iter().enumerate() {
      if face.len() < 3 {
        return Err(MeshError::DegenerateFace { face: face_num });
      }
      for (i, vertex_idx) in face.iter().enumerate() {
        if *vertex_idx as usize >= num_vertices {
          return Err(MeshError::InvalidVertexIndex {
            face: face_num,
            index: *vertex_idx,
          });
        }
        if face[i + 1..].contains(vertex_idx) {
          return Err(MeshError::DegenerateFace { face: face_num });
        }
      }

      let face_idx = face_refs.len() as IndexType;
      let next_vertex = face.iter().cycle().skip(1);

      loop_idxs.clear();

      for (vertex_idx, next_vertex_idx) in face.iter().zip(next_vertex) {
        let half_edge_idx = match vertex_pair_to_half_edge_idx
          .get(&(*vertex_idx, *next_vertex_idx))
        {
          Some(&idx) => {
            // only the boundary twin of an earlier face may be claimed
            if half_edge_refs[idx as usize].face_idx.is_some() {
              return Err(MeshError::NonManifoldEdge {
                from: *vertex_idx,
                to: *next_vertex_idx,
              });
            }
            idx
          }
          None => {
            let idx = half_edge_refs.len() as IndexType;
            half_edge_refs.push(HalfEdgeRef {
              twin_idx: idx + 1,
              next_idx: idx,
              prev_idx: idx,
              to_vertex_idx: *next_vertex_idx,
              face_idx: None,
            });
            half_edge_refs.push(HalfEdgeRef {
              twin_idx: idx,
              next_idx: idx + 1,
              prev_idx: idx + 1,
              to_vertex_idx: *vertex_idx,
              face_idx: None,
            });
            vertex_pair_to_half_edge_idx
              .insert((*vertex_idx, *next_vertex_idx), idx);
            vertex_pair_to_half_edge_idx
              .insert((*next_vertex_idx, *vertex_idx), idx + 1);
            idx
          }
        };

        half_edge_refs[half_edge_idx as usize].face_idx = Some(face_idx);
        loop_idxs.push(half_edge_idx);
      }

      let len = loop_idxs.len();
      for i in 0..len {
        let idx = loop_idxs[i] as usize;
        half_edge_refs[idx].next_idx = loop_idxs[(i + 1) % len];
        half_edge_refs[idx].prev_idx = loop_idxs[(i + len - 1) % len];
      }

      face_refs.push(FaceRef {
        half_edge_idx: loop_idxs[0],
      });
    }

    let from_vertex_idx = |half_edge_refs: &[HalfEdgeRef], idx: usize| {
      half_edge_refs[half_edge_refs[idx].twin_idx as usize].to_vertex_idx
    };

    // a manifold vertex has at most one gap in its fan
    let mut boundary_out = vec![None; num_vertices];
    for idx in 0..half_edge_refs.len() {
      let from = from_vertex_idx(&half_edge_refs, idx);

      if half_edge_refs[idx].face_idx.is_none() {
        if boundary_out[from as usize].replace(idx as IndexType).is_some() {
          return Err(MeshError::ComplexVertex { vertex: from });
        }
      }

      let vertex_ref = &mut vertex_refs[from as usize];
      if vertex_ref.half_edge_idx.is_none() {
        vertex_ref.half_edge_idx = Some(idx as IndexType);
      }
    }

    for idx in 0..half_edge_refs.len() {
      if half_edge_refs[idx].face_idx.is_some() {
        continue;
      }
      let to = half_edge_refs[idx].to_vertex_idx;
      let next_idx = boundary_out[to as usize]
        .ok_or(MeshError::ComplexVertex { vertex: to })?;
      half_edge_refs[idx].next_idx = next_idx;
      half_edge_refs[next_idx as usize].prev_idx = idx as IndexType;
    }

    let mut num_outgoing = vec![0; num_vertices];
    for idx in 0..half_edge_refs.len() {
      num_outgoing[from_vertex_idx(&half_edge_refs, idx) as usize] += 1;
    }

    for (vertex_ref, boundary_idx) in
      vertex_refs.iter_mut().zip(&boundary_out)
    {
      if boundary_idx.is_some() {
        vertex_ref.half_edge_idx = *boundary_idx;
      }
    }

    let out = HalfEdge {
      half_edge_refs,
      vertex_refs,
      face_refs,
      vertex_normals: None,
      face_normals: None,
      corner_normals: None,
    };

    // every outgoing half edge must be reachable by rotation
    for (vertex_idx, expected) in num_outgoing.iter().enumerate() {
      if out.ring_len(vertex_idx as IndexType) != *expected {
        return Err(MeshError::ComplexVertex {
          vertex: vertex_idx as IndexType,
        });
      }
    }

    for idx in 0..out.half_edge_refs.len() {
      out.verify_half_edge_valid(idx as IndexType);
    }

    debug!(
      vertices = out.vertex_refs.len(),
      half_edges = out.half_edge_refs.len(),
      faces = out.face_refs.len(),
      "built half edge mesh"
    );

    Ok(out)
  }

  fn num_vertices(&self) -> usize {
    self.vertex_refs.len()
  }

  fn num_half_edges(&self) -> usize {
    self.half_edge_refs.len()
  }

  fn num_faces(&self) -> usize {
    self.face_refs.len()
  }

  type VertexKey = VertexKey;
  type HalfEdgeKey = HalfEdgeKey;
  type FaceKey = FaceKey;
  type IterVertexKeys = Map<Range<IndexType>, fn(IndexType) -> VertexKey>;
  type IterHalfEdgeKeys = Map<Range<IndexType>, fn(IndexType) -> HalfEdgeKey>;
  type IterFaceKeys = Map<Range<IndexType>, fn(IndexType) -> FaceKey>;

  fn vertex_keys(&self) -> Self::IterVertexKeys {
    (0..(self.vertex_refs.len() as IndexType))
      .map(VertexKey as fn(IndexType) -> VertexKey)
  }

  fn half_edge_keys(&self) -> Self::IterHalfEdgeKeys {
    (0..(self.half_edge_refs.len() as IndexType))
      .map(HalfEdgeKey as fn(IndexType) -> HalfEdgeKey)
  }

  fn face_keys(&self) -> Self::IterFaceKeys {
    (0..(self.face_refs.len() as IndexType))
      .map(FaceKey as fn(IndexType) -> FaceKey)
  }

  fn set_position(&mut self, key: VertexKey, position: &Point) {
    self.vertex_refs[key.0 as usize].position = *position;
  }

  fn get_position(&self, key: VertexKey) -> Point {
    self.vertex_refs[key.0 as usize].position
  }

  fn vertex_half_edge(&self, key: VertexKey) -> Option<HalfEdgeKey> {
    self.vertex_refs[key.0 as usize].half_edge_idx.map(HalfEdgeKey)
  }

  fn face_half_edge(&self, key: FaceKey) -> HalfEdgeKey {
    HalfEdgeKey(self.face_refs[key.0 as usize].half_edge_idx)
  }

  fn to_vertex(&self, key: HalfEdgeKey) -> VertexKey {
    VertexKey(self.get(key.0).to_vertex_idx)
  }

  fn next(&self, key: HalfEdgeKey) -> HalfEdgeKey {
    HalfEdgeKey(self.get(key.0).next_idx)
  }

  fn prev(&self, key: HalfEdgeKey) -> HalfEdgeKey {
    HalfEdgeKey(self.get(key.0).prev_idx)
  }

  fn opposite(&self, key: HalfEdgeKey) -> HalfEdgeKey {
    HalfEdgeKey(self.get(key.0).twin_idx)
  }

  fn face(&self, key: HalfEdgeKey) -> Option<FaceKey> {
    self.get(key.0).face_idx.map(FaceKey)
  }

  fn vertex_normal(&self, key: VertexKey) -> Option<Normal> {
    self
      .vertex_normals
      .as_ref()
      .map(|normals| normals[key.0 as usize])
  }

  fn set_vertex_normal(&mut self, key: VertexKey, normal: Normal) {
    self.vertex_normals_mut()[key.0 as usize] = normal;
  }

  fn ensure_vertex_normals(&mut self) {
    self.vertex_normals_mut();
  }

  fn face_normal(&self, key: FaceKey) -> Option<Normal> {
    self
      .face_normals
      .as_ref()
      .map(|normals| normals[key.0 as usize])
  }

  fn set_face_normal(&mut self, key: FaceKey, normal: Normal) {
    self.face_normals_mut()[key.0 as usize] = normal;
  }

  fn ensure_face_normals(&mut self) {
    self.face_normals_mut();
  }

  fn corner_normal(&self, key: HalfEdgeKey) -> Option<Normal> {
    self
      .corner_normals
      .as_ref()
      .map(|normals| normals[key.0 as usize])
  }

  fn set_corner_normal(&mut self, key: HalfEdgeKey, normal: Normal) {
    self.corner_normals_mut()[key.0 as usize] = normal;
  }

  fn ensure_corner_normals(&mut self) {
    self.corner_normals_mut();
  }

  fn has_vertex_normals(&self) -> bool {
    self.vertex_normals.is_some()
  }

  fn has_face_normals(&self) -> bool {
    self.face_normals.is_some()
  }

  fn has_corner_normals(&self) -> bool {
    self.corner_normals.is_some()
  }

  fn to_vecs(&self) -> (Vec<Point>, Vec<Face>) {
    let vertices = self.vertex_refs.iter().map(|v| v.position).collect();

    let faces = self
      .face_keys()
      .map(|face| self.get_face_neighbors(face))
      .collect();

    (vertices, faces)
  }
}
