//! Canonicalization machinery shared by the edge, triangle and tetrahedron
//! dimensions of the topology.

use indexmap::IndexMap;

use crate::{
  repository::{Handle, Repository},
  sign::Sign,
  simplex::Oriented,
};

use std::hash::Hash;

/// Stores the footprints and oriented records of one dimension and the two
/// lookup maps that make them canonical: `compositions` keys footprints by a
/// dimension-specific representative of their composition, `orientations`
/// keys oriented records by footprint and sign.
pub struct CellFactory<K, O: Oriented> {
  pub footprints: Repository<O::Footprint>,
  pub oriented: Repository<O>,
  compositions: IndexMap<K, Handle<O::Footprint>>,
  orientations: IndexMap<(Handle<O::Footprint>, Sign), Handle<O>>,
}

impl<K: Hash + Eq, O: Oriented> CellFactory<K, O> {
  pub fn new() -> Self {
    Self {
      footprints: Repository::new(),
      oriented: Repository::new(),
      compositions: IndexMap::new(),
      orientations: IndexMap::new(),
    }
  }

  pub fn find_footprint(&self, key: &K) -> Option<Handle<O::Footprint>> {
    self.compositions.get(key).copied()
  }

  /// Registers a fresh footprint under its representative key. The caller
  /// guarantees no footprint is registered for the key yet.
  pub fn register_footprint(&mut self, key: K, record: O::Footprint) -> Handle<O::Footprint> {
    let footprint = self.footprints.emplace(record);
    let previous = self.compositions.insert(key, footprint);
    debug_assert!(previous.is_none());
    footprint
  }

  pub fn find_oriented(&self, footprint: Handle<O::Footprint>, sign: Sign) -> Option<Handle<O>> {
    self.orientations.get(&(footprint, sign)).copied()
  }

  /// Returns the unique oriented record for a footprint and sign, creating
  /// it on first request. The second component tells whether this call
  /// created the record.
  pub fn oriented(&mut self, footprint: Handle<O::Footprint>, sign: Sign) -> (Handle<O>, bool) {
    if let Some(id) = self.find_oriented(footprint, sign) {
      return (id, false);
    }
    let id = self.oriented.emplace(O::new(footprint, sign));
    self.orientations.insert((footprint, sign), id);
    (id, true)
  }

  /// Erases an oriented record together with its orientation map entry.
  pub fn erase_oriented(&mut self, id: Handle<O>) -> O {
    let record = self.oriented.erase(id);
    let removed = self
      .orientations
      .swap_remove(&(record.footprint(), record.sign()));
    debug_assert_eq!(removed, Some(id));
    record
  }

  /// Erases a footprint together with its composition map entry. The caller
  /// passes the representative key the footprint was registered under.
  pub fn erase_footprint(&mut self, id: Handle<O::Footprint>, key: &K) -> O::Footprint {
    let removed = self.compositions.swap_remove(key);
    debug_assert_eq!(removed, Some(id));
    self.footprints.erase(id)
  }
}

impl<K: Hash + Eq, O: Oriented> Default for CellFactory<K, O> {
  fn default() -> Self {
    Self::new()
  }
}
