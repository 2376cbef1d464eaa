//! Vertex, face and corner normals.
//!
//! Degenerate geometry never produces NaN: zero length edges, zero area
//! corners and isolated vertices contribute nothing, and an element with no
//! usable contribution gets the zero vector.

use crate::data_structure::{DataStructure, Normal, Scalar};
use crate::utils::{corner_angle, get_normal, normalize, weighted_corner_normal};

use tracing::debug;

/// Crease angles (degrees) below this always give the flat face normal.
pub const FLAT_CREASE_ANGLE: Scalar = 0.01;

/// Crease angles (degrees) above this always give the smooth vertex normal.
pub const SMOOTH_CREASE_ANGLE: Scalar = 179.0;

const MIN_CREASE_ANGLE: Scalar = 0.001;

/// Angle weighted normal of `vertex`.
///
/// Each incident face contributes its unit corner normal scaled by the angle
/// it subtends at `vertex`. Isolated vertices get the zero vector.
pub fn compute_vertex_normal<D: DataStructure>(
  mesh: &D,
  vertex: D::VertexKey,
) -> Normal {
  let mut sum = Normal::zeros();

  if let Some(start) = mesh.vertex_half_edge(vertex) {
    let p0 = mesh.get_position(vertex);

    let mut half_edge = start;
    loop {
      if !mesh.is_boundary(half_edge) {
        let p1 = mesh.get_position(mesh.to_vertex(half_edge)) - p0;
        let p2 =
          mesh.get_position(mesh.from_vertex(mesh.prev(half_edge))) - p0;

        if let Some(n) = weighted_corner_normal(&p1, &p2) {
          sum += n;
        }
      }

      half_edge = mesh.cw_rotated(half_edge);
      if half_edge == start {
        break;
      }
    }
  }

  normalize(&sum)
}

/// Area weighted normal of `face`.
///
/// Triangles take the cross product of two edges directly. Larger polygons
/// sum the cross products of every 3 consecutive vertices (Newell's method),
/// which tolerates non-planar faces.
pub fn compute_face_normal<D: DataStructure>(
  mesh: &D,
  face: D::FaceKey,
) -> Normal {
  let start = mesh.face_half_edge(face);

  let mut half_edge = start;
  let mut p0 = mesh.get_position(mesh.to_vertex(half_edge));
  half_edge = mesh.next(half_edge);
  let mut p1 = mesh.get_position(mesh.to_vertex(half_edge));
  half_edge = mesh.next(half_edge);
  let mut p2 = mesh.get_position(mesh.to_vertex(half_edge));

  if mesh.next(half_edge) == start {
    return get_normal([p0, p1, p2]);
  }

  let mut sum = Normal::zeros();

  let end = half_edge;
  loop {
    sum += (p2 - p1).cross(&(p0 - p1));

    half_edge = mesh.next(half_edge);
    p0 = p1;
    p1 = p2;
    p2 = mesh.get_position(mesh.to_vertex(half_edge));

    if half_edge == end {
      break;
    }
  }

  normalize(&sum)
}

/// Normal for the corner of `half_edge`'s face at `to_vertex(half_edge)`.
///
/// Faces around the corner's vertex are averaged (angle weighted) when
/// their normal is within `crease_angle` degrees of this face's normal.
/// Every face is compared against this face only, not against the faces
/// accepted before it. Boundary half edges get the zero vector.
///
/// Crease angles above [`SMOOTH_CREASE_ANGLE`] skip the walk and return the
/// vertex normal of `from_vertex(half_edge)`, the half edge's origin.
pub fn compute_corner_normal<D: DataStructure>(
  mesh: &D,
  half_edge: D::HalfEdgeKey,
  crease_angle: Scalar,
) -> Normal {
  if crease_angle < FLAT_CREASE_ANGLE {
    return match mesh.face(half_edge) {
      Some(face) => compute_face_normal(mesh, face),
      None => Normal::zeros(),
    };
  } else if crease_angle > SMOOTH_CREASE_ANGLE {
    return compute_vertex_normal(mesh, mesh.from_vertex(half_edge));
  }

  let crease_angle = crease_angle.max(MIN_CREASE_ANGLE);
  let cos_crease_angle = crease_angle.to_radians().cos();

  if mesh.is_boundary(half_edge) {
    return Normal::zeros();
  }

  let p0 = mesh.get_position(mesh.to_vertex(half_edge));
  let corner_edges = |half_edge: D::HalfEdgeKey| {
    (
      mesh.get_position(mesh.to_vertex(mesh.next(half_edge))) - p0,
      mesh.get_position(mesh.from_vertex(half_edge)) - p0,
    )
  };

  let (p1, p2) = corner_edges(half_edge);
  let face_normal = normalize(&p1.cross(&p2));

  let mut sum = Normal::zeros();

  let start = half_edge;
  let mut half_edge = start;
  loop {
    if !mesh.is_boundary(half_edge) {
      let (p1, p2) = corner_edges(half_edge);

      let n = p1.cross(&p2);
      let denom = n.norm();
      if denom > Scalar::MIN_POSITIVE {
        let n = n / denom;

        if n.dot(&face_normal) >= cos_crease_angle {
          if let Some(angle) = corner_angle(&p1, &p2) {
            sum += n * angle;
          }
        }
      }
    }

    // next incoming half edge around the vertex
    half_edge = mesh.opposite(mesh.next(half_edge));
    if half_edge == start {
      break;
    }
  }

  normalize(&sum)
}

/// Store the normal of every vertex in the mesh's vertex normal attribute.
pub fn compute_vertex_normals<D: DataStructure>(mesh: &mut D) {
  mesh.ensure_vertex_normals();
  let mut degenerate = 0;

  for vertex in mesh.vertex_keys() {
    let normal = compute_vertex_normal(mesh, vertex);
    if normal == Normal::zeros() {
      degenerate += 1;
    }
    mesh.set_vertex_normal(vertex, normal);
  }

  debug!(
    vertices = mesh.num_vertices(),
    degenerate, "computed vertex normals"
  );
}

/// Store the normal of every face in the mesh's face normal attribute.
pub fn compute_face_normals<D: DataStructure>(mesh: &mut D) {
  mesh.ensure_face_normals();
  let mut degenerate = 0;

  for face in mesh.face_keys() {
    let normal = compute_face_normal(mesh, face);
    if normal == Normal::zeros() {
      degenerate += 1;
    }
    mesh.set_face_normal(face, normal);
  }

  debug!(faces = mesh.num_faces(), degenerate, "computed face normals");
}

/// Store the corner normal of every face corner in the mesh's corner normal
/// attribute. Boundary half edges are left untouched.
pub fn compute_corner_normals<D: DataStructure>(
  mesh: &mut D,
  crease_angle: Scalar,
) {
  mesh.ensure_corner_normals();
  let mut corners = 0;
  let mut degenerate = 0;

  for face in mesh.face_keys() {
    let start = mesh.face_half_edge(face);
    let mut half_edge = start;
    loop {
      let normal = compute_corner_normal(mesh, half_edge, crease_angle);
      corners += 1;
      if normal == Normal::zeros() {
        degenerate += 1;
      }
      mesh.set_corner_normal(half_edge, normal);

      half_edge = mesh.next(half_edge);
      if half_edge == start {
        break;
      }
    }
  }

  debug!(corners, degenerate, crease_angle, "computed corner normals");
}
