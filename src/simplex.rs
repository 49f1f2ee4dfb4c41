//! Record types for the simplicial entities stored in the topology.
//!
//! Each dimension has a footprint record holding the composition of
//! lower-dimensional entities and an oriented record pairing a footprint
//! with a [`Sign`]. Records are plain data; canonicalization and lifetime
//! bookkeeping live in the topology.

use crate::{repository::Handle, sign::Sign};

pub type VertexId = Handle<Vertex>;
pub type EdgeId = Handle<Edge>;
pub type OrientedEdgeId = Handle<OrientedEdge>;
pub type TriangleId = Handle<Triangle>;
pub type OrientedTriangleId = Handle<OrientedTriangle>;
pub type TetrahedronId = Handle<Tetrahedron>;
pub type OrientedTetrahedronId = Handle<OrientedTetrahedron>;

/// A 0-simplex. Carries no data; its identity is its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex;

/// The footprint of a 1-simplex: an ordered pair of vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
  composition: [VertexId; 2],
}
impl Edge {
  pub(crate) fn new(composition: [VertexId; 2]) -> Self {
    Self { composition }
  }
  pub fn composition(&self) -> [VertexId; 2] {
    self.composition
  }
}

/// The footprint of a 2-simplex: three oriented edges forming a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangle {
  composition: [OrientedEdgeId; 3],
}
impl Triangle {
  pub(crate) fn new(composition: [OrientedEdgeId; 3]) -> Self {
    Self { composition }
  }
  pub fn composition(&self) -> [OrientedEdgeId; 3] {
    self.composition
  }
}

/// The footprint of a 3-simplex: four oriented triangles forming a closed
/// surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tetrahedron {
  composition: [OrientedTriangleId; 4],
}
impl Tetrahedron {
  pub(crate) fn new(composition: [OrientedTriangleId; 4]) -> Self {
    Self { composition }
  }
  pub fn composition(&self) -> [OrientedTriangleId; 4] {
    self.composition
  }
}

/// An orientation of a footprint. At most two records exist per footprint,
/// one per sign; they are the flips of each other.
pub trait Oriented {
  type Footprint;

  fn new(footprint: Handle<Self::Footprint>, sign: Sign) -> Self;
  fn footprint(&self) -> Handle<Self::Footprint>;
  fn sign(&self) -> Sign;
}

macro_rules! oriented_record {
  ($(#[$attr:meta])* $name:ident, $footprint:ident) => {
    $(#[$attr])*
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct $name {
      footprint: Handle<$footprint>,
      sign: Sign,
    }
    impl Oriented for $name {
      type Footprint = $footprint;

      fn new(footprint: Handle<$footprint>, sign: Sign) -> Self {
        Self { footprint, sign }
      }
      fn footprint(&self) -> Handle<$footprint> {
        self.footprint
      }
      fn sign(&self) -> Sign {
        self.sign
      }
    }
  };
}

oriented_record!(
  /// A segment: an [`Edge`] footprint traversed in one of its two senses.
  OrientedEdge,
  Edge
);
oriented_record!(
  /// A [`Triangle`] footprint with a winding sense.
  OrientedTriangle,
  Triangle
);
oriented_record!(
  /// A [`Tetrahedron`] footprint with a handedness.
  OrientedTetrahedron,
  Tetrahedron
);
