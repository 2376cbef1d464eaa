use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use tempfile::tempdir;

use mesh_normals::{
  compute_face_normal, CornerNormals, DataStructure, FaceNormals, HalfEdge,
  MeshError, Normal, Operation, VertexNormals,
};

const CUBE_OBJ: &str = "\
# unit cube, one quad per side
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v -0.5 0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v -0.5 0.5 0.5
v 0.5 0.5 0.5
f 1 3 4 2
f 5 6 8 7
f 1 2 6 5
f 3 7 8 4
f 1 5 7 3
f 2 4 8 6
";

const TWO_OBJECTS_OBJ: &str = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o second
v 0 0 5
v 0 1 5
v 1 0 5
f 4 5 6
";

fn load(dir: &Path, name: &str, contents: &str) -> HalfEdge {
  let path = dir.join(name);
  fs::write(&path, contents).unwrap();
  HalfEdge::from_obj(&path).unwrap()
}

fn written(mesh: &HalfEdge) -> String {
  let mut out = Vec::new();
  mesh.write_obj(&mut out).unwrap();
  String::from_utf8(out).unwrap()
}

fn count_prefix(obj: &str, prefix: &str) -> usize {
  obj.lines().filter(|line| line.starts_with(prefix)).count()
}

#[test]
fn loads_polygon_faces() {
  let dir = tempdir().unwrap();
  let mesh = load(dir.path(), "cube.obj", CUBE_OBJ);

  assert_eq!(mesh.num_vertices(), 8);
  assert_eq!(mesh.num_faces(), 6);
  assert_eq!(mesh.num_half_edges(), 24);
  assert!(mesh.half_edge_keys().all(|h| !mesh.is_boundary(h)));

  let (_, faces) = mesh.to_vecs();
  assert!(faces.iter().all(|face| face.len() == 4));

  let top = mesh.face_keys().nth(1).unwrap();
  assert_relative_eq!(
    compute_face_normal(&mesh, top),
    Normal::z(),
    epsilon = 1e-6
  );
}

#[test]
fn loads_every_object() {
  let dir = tempdir().unwrap();
  let mesh = load(dir.path(), "two.obj", TWO_OBJECTS_OBJ);

  assert_eq!(mesh.num_vertices(), 6);
  assert_eq!(mesh.num_faces(), 2);

  let normals: Vec<Normal> = mesh
    .face_keys()
    .map(|face| compute_face_normal(&mesh, face))
    .collect();
  assert_relative_eq!(normals[0], Normal::z(), epsilon = 1e-6);
  assert_relative_eq!(normals[1], -Normal::z(), epsilon = 1e-6);
}

#[test]
fn missing_file_is_load_error() {
  let dir = tempdir().unwrap();
  let result = HalfEdge::from_obj(&dir.path().join("missing.obj"));
  assert!(matches!(result, Err(MeshError::Load(_))));
}

#[test]
fn writes_plain_faces_without_normals() {
  let dir = tempdir().unwrap();
  let mesh = load(dir.path(), "cube.obj", CUBE_OBJ);
  let obj = written(&mesh);

  assert_eq!(count_prefix(&obj, "v "), 8);
  assert_eq!(count_prefix(&obj, "vn "), 0);
  assert_eq!(count_prefix(&obj, "f "), 6);
  assert!(!obj.contains("//"));
}

#[test]
fn writes_vertex_normals() {
  let dir = tempdir().unwrap();
  let mut mesh = load(dir.path(), "cube.obj", CUBE_OBJ);
  VertexNormals::default().apply(&mut mesh);
  let obj = written(&mesh);

  assert_eq!(count_prefix(&obj, "vn "), 8);
  for line in obj.lines().filter(|line| line.starts_with("f ")) {
    for corner in line.split_whitespace().skip(1) {
      let mut idxs = corner.split("//");
      assert_eq!(idxs.next(), idxs.next());
    }
  }
}

#[test]
fn writes_face_normals() {
  let dir = tempdir().unwrap();
  let mut mesh = load(dir.path(), "cube.obj", CUBE_OBJ);
  FaceNormals::default().apply(&mut mesh);
  let obj = written(&mesh);

  assert_eq!(count_prefix(&obj, "vn "), 6);
  let last = obj.lines().filter(|line| line.starts_with("f ")).last().unwrap();
  assert!(last
    .split_whitespace()
    .skip(1)
    .all(|corner| corner.ends_with("//6")));
}

#[test]
fn corner_normals_take_precedence() {
  let dir = tempdir().unwrap();
  let mut mesh = load(dir.path(), "cube.obj", CUBE_OBJ);
  VertexNormals::default().apply(&mut mesh);
  CornerNormals::new(45.0).apply(&mut mesh);
  let obj = written(&mesh);

  assert_eq!(count_prefix(&obj, "vn "), 24);
  assert_eq!(count_prefix(&obj, "f "), 6);
  // flat shading: each face repeats one axis aligned normal
  for line in obj.lines().filter(|line| line.starts_with("vn ")) {
    let components: Vec<f32> = line
      .split_whitespace()
      .skip(1)
      .map(|c| c.parse().unwrap())
      .collect();
    let n = Normal::new(components[0], components[1], components[2]);
    assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-5);
    assert_relative_eq!(n.abs().max(), 1.0, epsilon = 1e-5);
  }
}

#[test]
fn save_then_load_round_trip() {
  let dir = tempdir().unwrap();
  let mut mesh = load(dir.path(), "cube.obj", CUBE_OBJ);
  CornerNormals::new(100.0).apply(&mut mesh);

  let path = dir.path().join("out.obj");
  mesh.save_obj(&path).unwrap();

  let reloaded = HalfEdge::from_obj(&path).unwrap();
  assert_eq!(reloaded.num_vertices(), 8);
  assert_eq!(reloaded.num_faces(), 6);
  // vertices come back in first use order, faces in file order
  for vertex in reloaded.vertex_keys() {
    let position = reloaded.get_position(vertex);
    assert!(mesh
      .vertex_keys()
      .any(|other| (mesh.get_position(other) - position).norm() < 1e-6));
  }
  for (a, b) in mesh.face_keys().zip(reloaded.face_keys()) {
    assert_relative_eq!(
      compute_face_normal(&mesh, a),
      compute_face_normal(&reloaded, b),
      epsilon = 1e-6
    );
  }
}
