//! A mesh: a set of top-dimensional cells living in a shared [`Topology`].
//!
//! The mesh owns its cells. Inserting a cell takes over the caller's
//! ownership; erasing one hands it back to the topology, cascading cleanup
//! of whatever the cell was the last user of.

use indexmap::IndexSet;
use thiserror::Error;
use tracing::debug;

use crate::{
  simplex::{OrientedEdgeId, OrientedTetrahedronId, OrientedTriangleId},
  topology::{Cell, Topology},
};

#[derive(Debug, Error)]
pub enum MeshError {
  #[error("cell is already in the mesh")]
  DuplicateCell,
  #[error("cell is not in the mesh")]
  UnknownCell,
}

/// A cell kind a mesh can be built of, with faces one dimension down.
pub trait MeshCell: Cell {
  type Face: Cell;

  /// The faces of this cell's footprint.
  fn faces(self, topo: &Topology) -> Vec<Self::Face>;
}

impl MeshCell for OrientedTriangleId {
  type Face = OrientedEdgeId;

  fn faces(self, topo: &Topology) -> Vec<OrientedEdgeId> {
    topo.triangle_edges(self).to_vec()
  }
}

impl MeshCell for OrientedTetrahedronId {
  type Face = OrientedTriangleId;

  fn faces(self, topo: &Topology) -> Vec<OrientedTriangleId> {
    topo.tetrahedron_triangles(self).to_vec()
  }
}

pub struct Mesh<C: MeshCell> {
  cells: IndexSet<C>,
}

impl<C: MeshCell> Mesh<C> {
  pub fn new() -> Self {
    Self {
      cells: IndexSet::new(),
    }
  }

  pub fn n_cells(&self) -> usize {
    self.cells.len()
  }
  pub fn cells(&self) -> impl Iterator<Item = C> + '_ {
    self.cells.iter().copied()
  }
  pub fn contains(&self, cell: C) -> bool {
    self.cells.contains(&cell)
  }

  /// Adds a cell, taking over the caller's ownership of it. On a duplicate
  /// nothing changes hands.
  pub fn insert(&mut self, cell: C) -> Result<(), MeshError> {
    match self.cells.insert(cell) {
      true => Ok(()),
      false => Err(MeshError::DuplicateCell),
    }
  }

  /// Removes a cell and gives its ownership back to the topology, erasing
  /// whatever nobody else uses.
  pub fn erase(&mut self, topo: &mut Topology, cell: C) -> Result<(), MeshError> {
    if !self.cells.shift_remove(&cell) {
      return Err(MeshError::UnknownCell);
    }
    debug!(?cell, "erased mesh cell");
    topo.erase(cell);
    Ok(())
  }

  /// The boundary faces: those whose footprint is used by exactly one cell,
  /// i.e. whose flip does not exist.
  pub fn boundary(&self, topo: &Topology) -> Vec<C::Face> {
    self
      .cells()
      .flat_map(|cell| cell.faces(topo))
      .filter(|face| !face.exists_flipped(topo))
      .collect()
  }

  pub fn boundary_size(&self, topo: &Topology) -> usize {
    self.boundary(topo).len()
  }
}

impl<C: MeshCell> Default for Mesh<C> {
  fn default() -> Self {
    Self::new()
  }
}
