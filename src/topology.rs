//! The topology: one context object owning every simplicial entity.
//!
//! Entities are canonical. Requesting a segment, triangle or tetrahedron
//! whose composition is equivalent to an existing one hands back the
//! existing handle, with the orientation sign telling the two senses of a
//! footprint apart. Construction retains the returned handle for the
//! caller; the matching `erase_*` call releases it and cascades cleanup
//! down to entities nobody uses anymore.

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
  factory::CellFactory,
  repository::Repository,
  sign::Sign,
  simplex::{
    Edge, EdgeId, Oriented, OrientedEdge, OrientedEdgeId, OrientedTetrahedron,
    OrientedTetrahedronId, OrientedTriangle, OrientedTriangleId, Tetrahedron, TetrahedronId,
    Triangle, TriangleId, Vertex, VertexId,
  },
};

pub struct Topology {
  vertices: Repository<Vertex>,
  edges: CellFactory<[VertexId; 2], OrientedEdge>,
  triangles: CellFactory<[EdgeId; 3], OrientedTriangle>,
  tetrahedra: CellFactory<[TriangleId; 4], OrientedTetrahedron>,
}

impl Topology {
  pub fn new() -> Self {
    Self {
      vertices: Repository::new(),
      edges: CellFactory::new(),
      triangles: CellFactory::new(),
      tetrahedra: CellFactory::new(),
    }
  }

  // Construction. Every constructor retains the returned handle for the
  // caller, who gives it back with the matching `erase_*`.

  pub fn vertex(&mut self) -> VertexId {
    let vertex = self.vertices.emplace(Vertex);
    self.vertices.retain(vertex);
    vertex
  }

  /// The canonical segment traversing the two vertices in the given order.
  pub fn segment(&mut self, composition: [VertexId; 2]) -> OrientedEdgeId {
    let mut key = composition;
    key.sort();
    let footprint = match self.edges.find_footprint(&key) {
      Some(footprint) => footprint,
      None => {
        let footprint = self.edges.register_footprint(key, Edge::new(composition));
        for vertex in composition {
          self.vertices.retain(vertex);
        }
        trace!(?footprint, ?composition, "registered edge");
        footprint
      }
    };
    let sign = Sign::from_bool(composition == self.edges.footprints.get(footprint).composition());
    let (id, created) = self.edges.oriented(footprint, sign);
    if created {
      self.edges.footprints.retain(footprint);
    }
    self.edges.oriented.retain(id);
    id
  }

  /// The canonical triangle with the given edge cycle. Two compositions are
  /// the same triangle iff one is a cyclic rotation of the other; any other
  /// composition over the same edge footprints is its flip.
  pub fn triangle(&mut self, composition: [OrientedEdgeId; 3]) -> OrientedTriangleId {
    let mut key = composition.map(|edge| self.edges.oriented.get(edge).footprint());
    key.sort();
    let footprint = match self.triangles.find_footprint(&key) {
      Some(footprint) => footprint,
      None => {
        let footprint = self.triangles.register_footprint(key, Triangle::new(composition));
        for edge in composition {
          self.edges.oriented.retain(edge);
        }
        trace!(?footprint, ?composition, "registered triangle");
        footprint
      }
    };
    let stored = self.triangles.footprints.get(footprint).composition();
    let sign = Sign::from_bool(rotate_min_first(composition) == rotate_min_first(stored));
    let (id, created) = self.triangles.oriented(footprint, sign);
    if created {
      self.triangles.footprints.retain(footprint);
    }
    self.triangles.oriented.retain(id);
    id
  }

  /// The canonical tetrahedron enclosed by the given oriented triangles.
  /// A composition whose oriented faces coincide with the stored ones (as
  /// sets) is the same handedness; any other composition over the same
  /// triangle footprints is its flip.
  pub fn tetrahedron(&mut self, composition: [OrientedTriangleId; 4]) -> OrientedTetrahedronId {
    let mut key = composition.map(|triangle| self.triangles.oriented.get(triangle).footprint());
    key.sort();
    let footprint = match self.tetrahedra.find_footprint(&key) {
      Some(footprint) => footprint,
      None => {
        let footprint = self
          .tetrahedra
          .register_footprint(key, Tetrahedron::new(composition));
        for triangle in composition {
          self.triangles.oriented.retain(triangle);
        }
        trace!(?footprint, ?composition, "registered tetrahedron");
        footprint
      }
    };
    let stored = self.tetrahedra.footprints.get(footprint).composition();
    let sign = Sign::from_bool(sorted(composition) == sorted(stored));
    let (id, created) = self.tetrahedra.oriented(footprint, sign);
    if created {
      self.tetrahedra.footprints.retain(footprint);
    }
    self.tetrahedra.oriented.retain(id);
    id
  }

  /// Builds the triangle with vertex cycle `[a, b, c]` out of the segments
  /// `(a,b)`, `(b,c)`, `(c,a)`.
  pub fn triangle_from_vertices(&mut self, vertices: [VertexId; 3]) -> OrientedTriangleId {
    let [a, b, c] = vertices;
    let edges = [
      self.segment([a, b]),
      self.segment([b, c]),
      self.segment([c, a]),
    ];
    let triangle = self.triangle(edges);
    for edge in edges {
      self.erase_segment(edge);
    }
    triangle
  }

  /// Builds the tetrahedron on vertices `[a, b, c, d]`, with the four faces
  /// wound so that their orientations are pairwise compatible.
  pub fn tetrahedron_from_vertices(&mut self, vertices: [VertexId; 4]) -> OrientedTetrahedronId {
    let [a, b, c, d] = vertices;
    let faces = [
      self.triangle_from_vertices([a, b, d]),
      self.triangle_from_vertices([b, c, d]),
      self.triangle_from_vertices([c, a, d]),
      self.triangle_from_vertices([a, c, b]),
    ];
    let tetrahedron = self.tetrahedron(faces);
    for face in faces {
      self.erase_triangle(face);
    }
    tetrahedron
  }

  // Inspection.

  pub fn segment_footprint(&self, id: OrientedEdgeId) -> EdgeId {
    self.edges.oriented.get(id).footprint()
  }
  pub fn triangle_footprint(&self, id: OrientedTriangleId) -> TriangleId {
    self.triangles.oriented.get(id).footprint()
  }
  pub fn tetrahedron_footprint(&self, id: OrientedTetrahedronId) -> TetrahedronId {
    self.tetrahedra.oriented.get(id).footprint()
  }

  /// The segment's vertices in traversal order.
  pub fn segment_vertices(&self, id: OrientedEdgeId) -> [VertexId; 2] {
    let record = self.edges.oriented.get(id);
    let [a, b] = self.edges.footprints.get(record.footprint()).composition();
    match record.sign() {
      Sign::Pos => [a, b],
      Sign::Neg => [b, a],
    }
  }

  /// The triangle's edge cycle: the footprint's composition, reversed iff
  /// the sign is negative.
  pub fn triangle_edges(&self, id: OrientedTriangleId) -> [OrientedEdgeId; 3] {
    let record = self.triangles.oriented.get(id);
    let mut composition = self.triangles.footprints.get(record.footprint()).composition();
    if record.sign().is_neg() {
      composition.reverse();
    }
    composition
  }

  /// The triangle's vertex cycle in winding order.
  pub fn triangle_vertices(&self, id: OrientedTriangleId) -> [VertexId; 3] {
    self.triangle_edges(id).map(|edge| self.tail(edge))
  }

  /// The tetrahedron's oriented faces: the footprint's composition,
  /// reversed iff the sign is negative.
  pub fn tetrahedron_triangles(&self, id: OrientedTetrahedronId) -> [OrientedTriangleId; 4] {
    let record = self.tetrahedra.oriented.get(id);
    let mut composition = self.tetrahedra.footprints.get(record.footprint()).composition();
    if record.sign().is_neg() {
      composition.reverse();
    }
    composition
  }

  /// The tetrahedron's distinct vertices, in order of first appearance on
  /// its faces.
  pub fn tetrahedron_vertices(&self, id: OrientedTetrahedronId) -> Vec<VertexId> {
    self
      .tetrahedron_triangles(id)
      .into_iter()
      .flat_map(|triangle| self.triangle_vertices(triangle))
      .unique()
      .collect()
  }

  /// The vertex a segment leaves from.
  pub fn tail(&self, id: OrientedEdgeId) -> VertexId {
    self.segment_vertices(id)[0]
  }
  /// The vertex a segment arrives at.
  pub fn head(&self, id: OrientedEdgeId) -> VertexId {
    self.segment_vertices(id)[1]
  }
  /// Whether `b` continues where `a` ends.
  pub fn head_tail_connected(&self, a: OrientedEdgeId, b: OrientedEdgeId) -> bool {
    self.head(a) == self.tail(b)
  }

  /// Looks up the canonical edge footprint on two vertices, if registered.
  pub fn find_edge(&self, vertices: [VertexId; 2]) -> Option<EdgeId> {
    let mut key = vertices;
    key.sort();
    self.edges.find_footprint(&key)
  }

  // Validity. Construction itself is loose and accepts any composition;
  // these predicates tell the geometrically meaningful ones apart.

  pub fn is_valid_segment(&self, composition: [VertexId; 2]) -> bool {
    composition[0] != composition[1]
  }

  /// A triangle composition is valid iff its edges chain into a closed
  /// cycle: every vertex is the head of exactly one edge and the tail of
  /// exactly one other.
  pub fn is_valid_triangle(&self, composition: [OrientedEdgeId; 3]) -> bool {
    let mut net: IndexMap<VertexId, i32> = IndexMap::new();
    for &edge in &composition {
      *net.entry(self.tail(edge)).or_default() -= 1;
      *net.entry(self.head(edge)).or_default() += 1;
    }
    net.len() == 3 && net.values().all(|&n| n == 0)
  }

  /// A tetrahedron composition is valid iff its faces close up: every edge
  /// footprint is traversed by exactly two faces, in opposite senses.
  pub fn is_valid_tetrahedron(&self, composition: [OrientedTriangleId; 4]) -> bool {
    let mut net: IndexMap<EdgeId, i32> = IndexMap::new();
    for &triangle in &composition {
      let face_sign = self.triangles.oriented.get(triangle).sign();
      for edge in self.triangle_edges(triangle) {
        let record = self.edges.oriented.get(edge);
        *net.entry(record.footprint()).or_default() += (face_sign * record.sign()).as_i32();
      }
    }
    net.len() == 6 && net.values().all(|&n| n == 0)
  }

  // Directors: the segments spanning a cell from its first vertex. The
  // returned handles are retained for the caller.

  pub fn segment_directors(&mut self, id: OrientedEdgeId) -> [OrientedEdgeId; 1] {
    self.edges.oriented.retain(id);
    [id]
  }

  pub fn triangle_directors(&mut self, id: OrientedTriangleId) -> [OrientedEdgeId; 2] {
    let [a, b, c] = self.triangle_vertices(id);
    [self.segment([a, b]), self.segment([a, c])]
  }

  pub fn tetrahedron_directors(&mut self, id: OrientedTetrahedronId) -> [OrientedEdgeId; 3] {
    let [a, b, c, d]: [VertexId; 4] = self.tetrahedron_vertices(id).try_into().unwrap();
    [
      self.segment([a, b]),
      self.segment([a, c]),
      self.segment([a, d]),
    ]
  }

  // Lifetime. `erase_*` gives up the caller's ownership and then cascades:
  // an oriented record with no owners left is destroyed, its footprint is
  // released, and a footprint with no orientations left is destroyed in
  // turn, releasing its own composition one dimension down.

  pub fn erase_vertex(&mut self, vertex: VertexId) {
    if self.vertices.release(vertex) == 0 {
      self.vertices.erase(vertex);
    }
  }

  pub fn erase_segment(&mut self, id: OrientedEdgeId) {
    self.edges.oriented.release(id);
    self.cleanup_segment(id);
  }

  pub fn erase_triangle(&mut self, id: OrientedTriangleId) {
    self.triangles.oriented.release(id);
    self.cleanup_triangle(id);
  }

  pub fn erase_tetrahedron(&mut self, id: OrientedTetrahedronId) {
    self.tetrahedra.oriented.release(id);
    self.cleanup_tetrahedron(id);
  }

  fn cleanup_segment(&mut self, id: OrientedEdgeId) {
    if self.edges.oriented.owners(id) > 0 {
      return;
    }
    let footprint = self.edges.erase_oriented(id).footprint();
    if self.edges.footprints.release(footprint) > 0 {
      return;
    }
    let composition = self.edges.footprints.get(footprint).composition();
    let mut key = composition;
    key.sort();
    self.edges.erase_footprint(footprint, &key);
    debug!(?footprint, "erased orphaned edge");
    for vertex in composition {
      self.erase_vertex(vertex);
    }
  }

  fn cleanup_triangle(&mut self, id: OrientedTriangleId) {
    if self.triangles.oriented.owners(id) > 0 {
      return;
    }
    let footprint = self.triangles.erase_oriented(id).footprint();
    if self.triangles.footprints.release(footprint) > 0 {
      return;
    }
    let composition = self.triangles.footprints.get(footprint).composition();
    let mut key = composition.map(|edge| self.edges.oriented.get(edge).footprint());
    key.sort();
    self.triangles.erase_footprint(footprint, &key);
    debug!(?footprint, "erased orphaned triangle");
    for edge in composition {
      self.erase_segment(edge);
    }
  }

  fn cleanup_tetrahedron(&mut self, id: OrientedTetrahedronId) {
    if self.tetrahedra.oriented.owners(id) > 0 {
      return;
    }
    let footprint = self.tetrahedra.erase_oriented(id).footprint();
    if self.tetrahedra.footprints.release(footprint) > 0 {
      return;
    }
    let composition = self.tetrahedra.footprints.get(footprint).composition();
    let mut key = composition.map(|triangle| self.triangles.oriented.get(triangle).footprint());
    key.sort();
    self.tetrahedra.erase_footprint(footprint, &key);
    debug!(?footprint, "erased orphaned tetrahedron");
    for triangle in composition {
      self.erase_triangle(triangle);
    }
  }

  // Generic lifetime entry points for code parameterized over the cell
  // dimension.

  pub fn retain<C: Cell>(&mut self, cell: C) {
    cell.retain(self);
  }
  pub fn erase<C: Cell>(&mut self, cell: C) {
    cell.release(self);
    cell.cleanup(self);
  }

  // Bookkeeping.

  pub fn n_vertices(&self) -> usize {
    self.vertices.len()
  }
  pub fn n_edges(&self) -> usize {
    self.edges.footprints.len()
  }
  pub fn n_segments(&self) -> usize {
    self.edges.oriented.len()
  }
  pub fn n_triangles(&self) -> usize {
    self.triangles.footprints.len()
  }
  pub fn n_oriented_triangles(&self) -> usize {
    self.triangles.oriented.len()
  }
  pub fn n_tetrahedra(&self) -> usize {
    self.tetrahedra.footprints.len()
  }
  pub fn n_oriented_tetrahedra(&self) -> usize {
    self.tetrahedra.oriented.len()
  }
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
      && self.edges.footprints.is_empty()
      && self.edges.oriented.is_empty()
      && self.triangles.footprints.is_empty()
      && self.triangles.oriented.is_empty()
      && self.tetrahedra.footprints.is_empty()
      && self.tetrahedra.oriented.is_empty()
  }

  /// Checks the cross references of every live oriented record.
  pub fn sanity_check(&self) -> bool {
    self
      .edges
      .oriented
      .iter()
      .all(|(id, _)| id.sanity_check(self))
      && self
        .triangles
        .oriented
        .iter()
        .all(|(id, _)| id.sanity_check(self))
      && self
        .tetrahedra
        .oriented
        .iter()
        .all(|(id, _)| id.sanity_check(self))
  }
}

impl Default for Topology {
  fn default() -> Self {
    Self::new()
  }
}

/// The cyclic-rotation representative: the rotation putting the smallest id
/// first. Cyclic rotations of an edge cycle describe the same winding.
fn rotate_min_first(mut cycle: [OrientedEdgeId; 3]) -> [OrientedEdgeId; 3] {
  let min = cycle
    .iter()
    .enumerate()
    .min_by_key(|(_, id)| **id)
    .map(|(i, _)| i)
    .unwrap();
  cycle.rotate_left(min);
  cycle
}

fn sorted<T: Ord, const N: usize>(mut a: [T; N]) -> [T; N] {
  a.sort();
  a
}

mod private {
  pub trait Sealed {}
}

/// Dimension-generic view of an oriented cell id.
///
/// Every operation takes the owning [`Topology`] explicitly; the handles
/// themselves stay plain copyable ids.
pub trait Cell: private::Sealed + Copy + Ord + std::hash::Hash + std::fmt::Debug {
  fn sign(self, topo: &Topology) -> Sign;
  /// How many orientations of this cell's footprint are alive (1 or 2).
  fn incidence(self, topo: &Topology) -> u32;
  /// Whether the opposite orientation of this cell's footprint is alive.
  fn exists_flipped(self, topo: &Topology) -> bool;
  /// The opposite orientation of this cell's footprint, created on first
  /// request and retained for the caller.
  fn flip(self, topo: &mut Topology) -> Self;
  fn vertices(self, topo: &Topology) -> Vec<VertexId>;
  /// How many owners the cell itself currently has.
  fn owners(self, topo: &Topology) -> u32;
  fn retain(self, topo: &mut Topology);
  fn release(self, topo: &mut Topology) -> u32;
  /// Destroys the cell if nobody owns it anymore, cascading downward.
  fn cleanup(self, topo: &mut Topology);
  /// Checks the cell's cross references and that it spans the right number
  /// of distinct vertices.
  fn sanity_check(self, topo: &Topology) -> bool;
}

macro_rules! impl_cell {
  ($id:ty, $field:ident, $cleanup:ident, $vertices:ident, $nvertices:expr) => {
    impl private::Sealed for $id {}
    impl Cell for $id {
      fn sign(self, topo: &Topology) -> Sign {
        topo.$field.oriented.get(self).sign()
      }
      fn incidence(self, topo: &Topology) -> u32 {
        let footprint = topo.$field.oriented.get(self).footprint();
        topo.$field.footprints.owners(footprint)
      }
      fn exists_flipped(self, topo: &Topology) -> bool {
        debug_assert!(matches!(self.incidence(topo), 1 | 2));
        let record = topo.$field.oriented.get(self);
        topo
          .$field
          .find_oriented(record.footprint(), record.sign().other())
          .is_some()
      }
      fn flip(self, topo: &mut Topology) -> Self {
        let (footprint, sign) = {
          let record = topo.$field.oriented.get(self);
          (record.footprint(), record.sign().other())
        };
        let (id, created) = topo.$field.oriented(footprint, sign);
        if created {
          topo.$field.footprints.retain(footprint);
        }
        topo.$field.oriented.retain(id);
        id
      }
      fn vertices(self, topo: &Topology) -> Vec<VertexId> {
        topo.$vertices(self).into_iter().collect()
      }
      fn owners(self, topo: &Topology) -> u32 {
        topo.$field.oriented.owners(self)
      }
      fn retain(self, topo: &mut Topology) {
        topo.$field.oriented.retain(self);
      }
      fn release(self, topo: &mut Topology) -> u32 {
        topo.$field.oriented.release(self)
      }
      fn cleanup(self, topo: &mut Topology) {
        topo.$cleanup(self);
      }
      fn sanity_check(self, topo: &Topology) -> bool {
        if !topo.$field.oriented.contains(self) {
          return false;
        }
        let record = topo.$field.oriented.get(self);
        if !topo.$field.footprints.contains(record.footprint())
          || topo.$field.find_oriented(record.footprint(), record.sign()) != Some(self)
        {
          return false;
        }
        let vertices = self.vertices(topo);
        vertices.len() == $nvertices && vertices.iter().all_unique()
      }
    }
  };
}

impl_cell!(OrientedEdgeId, edges, cleanup_segment, segment_vertices, 2);
impl_cell!(
  OrientedTriangleId,
  triangles,
  cleanup_triangle,
  triangle_vertices,
  3
);
impl_cell!(
  OrientedTetrahedronId,
  tetrahedra,
  cleanup_tetrahedron,
  tetrahedron_vertices,
  4
);
