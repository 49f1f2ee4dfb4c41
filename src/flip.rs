//! Diagonal flip of two triangles forming a quadrilateral.

use thiserror::Error;

use crate::{simplex::OrientedTriangleId, topology::Topology};

#[derive(Debug, Error)]
pub enum FlipDiagonalError {
  #[error("triangles do not share an edge")]
  NotAdjacent,
}

/// Replaces two adjacent, consistently wound triangles with the two
/// triangles over the other diagonal of their quadrilateral.
///
/// The caller's ownership of the old pair is consumed; the returned pair is
/// retained for the caller. The outer segments are reused as they are, the
/// old diagonal disappears with the old pair.
pub fn flip_diagonal(
  topo: &mut Topology,
  pair: (OrientedTriangleId, OrientedTriangleId),
) -> Result<(OrientedTriangleId, OrientedTriangleId), FlipDiagonalError> {
  let (t0, t1) = pair;
  let vts0 = topo.triangle_vertices(t0);
  let vts1 = topo.triangle_vertices(t1);
  let shared: Vec<_> = vts0.iter().copied().filter(|v| vts1.contains(v)).collect();
  if shared.len() != 2 {
    return Err(FlipDiagonalError::NotAdjacent);
  }

  // t0 visits d0 -> s_a -> s_b, t1 crosses the diagonal the other way
  let d0_idx = (0..3).find(|&i| !shared.contains(&vts0[i])).unwrap();
  let d0 = vts0[d0_idx];
  let s_a = vts0[(d0_idx + 1) % 3];
  let s_b = vts0[(d0_idx + 2) % 3];
  let d1 = vts1.into_iter().find(|v| !shared.contains(v)).unwrap();

  // build the new pair first so the shared entities stay alive throughout
  let new0 = topo.triangle_from_vertices([d1, s_b, d0]);
  let new1 = topo.triangle_from_vertices([d0, s_a, d1]);
  topo.erase_triangle(t0);
  topo.erase_triangle(t1);
  Ok((new0, new1))
}

#[cfg(test)]
mod test {
  use super::{flip_diagonal, FlipDiagonalError};
  use crate::topology::Topology;

  #[test]
  fn flips_the_diagonal_of_a_square() {
    let mut topo = Topology::new();
    let [v0, v1, v2, v3] = [topo.vertex(), topo.vertex(), topo.vertex(), topo.vertex()];
    let t0 = topo.triangle_from_vertices([v0, v1, v3]);
    let t1 = topo.triangle_from_vertices([v1, v2, v3]);
    assert_eq!(topo.n_edges(), 5);
    assert!(topo.find_edge([v1, v3]).is_some());

    let (new0, new1) = flip_diagonal(&mut topo, (t0, t1)).unwrap();
    assert_eq!(topo.n_triangles(), 2);
    assert_eq!(topo.n_edges(), 5);
    assert!(topo.find_edge([v1, v3]).is_none());
    assert!(topo.find_edge([v0, v2]).is_some());
    assert_eq!(topo.triangle_vertices(new0), [v2, v3, v0]);
    assert_eq!(topo.triangle_vertices(new1), [v0, v1, v2]);
    assert!(topo.sanity_check());

    topo.erase_triangle(new0);
    topo.erase_triangle(new1);
    assert_eq!(topo.n_edges(), 0);
  }

  #[test]
  fn rejects_disjoint_triangles() {
    let mut topo = Topology::new();
    let [a, b, c] = [topo.vertex(), topo.vertex(), topo.vertex()];
    let [d, e, f] = [topo.vertex(), topo.vertex(), topo.vertex()];
    let t0 = topo.triangle_from_vertices([a, b, c]);
    let t1 = topo.triangle_from_vertices([d, e, f]);
    assert!(matches!(
      flip_diagonal(&mut topo, (t0, t1)),
      Err(FlipDiagonalError::NotAdjacent)
    ));
  }
}
