use crate::data_structure::{Normal, Point, Scalar};

/// Normalize `v`, returning the zero vector when its norm is at or below the
/// smallest positive `Scalar`.
pub fn normalize(v: &Point) -> Normal {
  v.try_normalize(Scalar::MIN_POSITIVE)
    .unwrap_or_else(Normal::zeros)
}

pub fn get_normal(vertices: [Point; 3]) -> Normal {
  normalize(&(vertices[2] - vertices[1]).cross(&(vertices[0] - vertices[1])))
}

/// Angle between `p1` and `p2`, or `None` if either is too short for the
/// cosine to be computed.
pub fn corner_angle(p1: &Point, p2: &Point) -> Option<Scalar> {
  let denom = (p1.dot(p1) * p2.dot(p2)).sqrt();
  if denom > Scalar::MIN_POSITIVE {
    // acos is undefined outside [-1, 1]
    let cosine = (p1.dot(p2) / denom).max(-1.0).min(1.0);
    Some(cosine.acos())
  } else {
    None
  }
}

/// Unit normal of the corner spanned by `p1` and `p2`, scaled by the corner
/// angle. `None` for zero-area corners.
pub fn weighted_corner_normal(p1: &Point, p2: &Point) -> Option<Normal> {
  let angle = corner_angle(p1, p2)?;

  let n = p1.cross(p2);
  let denom = n.norm();
  if denom > Scalar::MIN_POSITIVE {
    Some(n * (angle / denom))
  } else {
    None
  }
}
