use crate::arena::Arena;

use std::{
  cmp::Ordering,
  fmt,
  hash::{Hash, Hasher},
  marker::PhantomData,
};

/// A typed index into a [`Repository`].
///
/// Handles are plain copyable ids: equality, hashing and the total order all
/// derive from the stable arena index, so handles work directly as map and
/// set keys for external data structures. A handle does not keep its record
/// alive; ownership is tracked by the repository's explicit owner counts.
pub struct Handle<T>(u32, PhantomData<fn() -> T>);

impl<T> Handle<T> {
  pub(crate) fn new(idx: u32) -> Self {
    Self(idx, PhantomData)
  }
  pub fn index(self) -> u32 {
    self.0
  }
}

// manual impls: the derives would wrongly require `T` to satisfy the bounds
impl<T> Clone for Handle<T> {
  fn clone(&self) -> Self {
    *self
  }
}
impl<T> Copy for Handle<T> {}
impl<T> PartialEq for Handle<T> {
  fn eq(&self, other: &Self) -> bool {
    self.0 == other.0
  }
}
impl<T> Eq for Handle<T> {}
impl<T> PartialOrd for Handle<T> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}
impl<T> Ord for Handle<T> {
  fn cmp(&self, other: &Self) -> Ordering {
    self.0.cmp(&other.0)
  }
}
impl<T> Hash for Handle<T> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.0.hash(state);
  }
}
impl<T> fmt::Debug for Handle<T> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

struct Entry<T> {
  record: T,
  owners: u32,
}

/// Central store for records of one kind, with explicit ownership counts.
///
/// The repository exclusively owns storage; everyone else refers to records
/// through [`Handle`]s and claims ownership with `retain`/`release`. The
/// count never triggers destruction on its own: `erase` is always an
/// explicit call, legal only once the count has dropped back to zero.
pub struct Repository<T> {
  arena: Arena<Entry<T>>,
}

impl<T> Repository<T> {
  pub fn new() -> Self {
    Self {
      arena: Arena::new(),
    }
  }

  /// Constructs a record in place and registers it. The owner count starts
  /// at zero; whoever stores the handle claims ownership with `retain`.
  pub fn emplace(&mut self, record: T) -> Handle<T> {
    Handle::new(self.arena.insert(Entry { record, owners: 0 }))
  }

  fn entry(&self, handle: Handle<T>) -> &Entry<T> {
    self.arena.get(handle.index()).expect("dangling handle")
  }
  fn entry_mut(&mut self, handle: Handle<T>) -> &mut Entry<T> {
    self.arena.get_mut(handle.index()).expect("dangling handle")
  }

  pub fn get(&self, handle: Handle<T>) -> &T {
    &self.entry(handle).record
  }
  pub fn contains(&self, handle: Handle<T>) -> bool {
    self.arena.get(handle.index()).is_some()
  }

  pub fn owners(&self, handle: Handle<T>) -> u32 {
    self.entry(handle).owners
  }
  pub fn retain(&mut self, handle: Handle<T>) {
    self.entry_mut(handle).owners += 1;
  }
  /// Gives up one ownership and returns the remaining count.
  pub fn release(&mut self, handle: Handle<T>) -> u32 {
    let entry = self.entry_mut(handle);
    assert!(entry.owners > 0, "owner count underflow");
    entry.owners -= 1;
    entry.owners
  }

  /// Frees the record's slot. Legal only once nobody owns the record.
  pub fn erase(&mut self, handle: Handle<T>) -> T {
    let entry = self.arena.remove(handle.index());
    assert!(entry.owners == 0, "erasure of an owned record");
    entry.record
  }

  pub fn len(&self) -> usize {
    self.arena.len()
  }
  pub fn is_empty(&self) -> bool {
    self.arena.is_empty()
  }

  /// Iterates live records in index order, skipping erased slots.
  pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
    self
      .arena
      .iter()
      .map(|(idx, entry)| (Handle::new(idx), &entry.record))
  }
}

impl<T> Default for Repository<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod test {
  use super::Repository;

  #[test]
  fn ownership_bookkeeping() {
    let mut repo = Repository::new();
    let h = repo.emplace("record");
    assert_eq!(repo.owners(h), 0);
    repo.retain(h);
    repo.retain(h);
    assert_eq!(repo.owners(h), 2);
    assert_eq!(repo.release(h), 1);
    assert_eq!(repo.release(h), 0);
  }

  #[test]
  fn erase_frees_the_slot() {
    let mut repo = Repository::new();
    let a = repo.emplace(1);
    let b = repo.emplace(2);
    assert_eq!(repo.erase(a), 1);
    assert!(!repo.contains(a));
    assert!(repo.contains(b));
    assert_eq!(repo.len(), 1);
    // the freed slot is reused, handing out an equal handle
    let c = repo.emplace(3);
    assert_eq!(c, a);
    assert_eq!(*repo.get(c), 3);
  }

  #[test]
  fn handles_are_ordered_by_index() {
    let mut repo = Repository::new();
    let a = repo.emplace("a");
    let b = repo.emplace("b");
    assert!(a < b);
    assert_eq!(a, a);
  }

  #[test]
  fn iteration_skips_erased() {
    let mut repo = Repository::new();
    let handles: Vec<_> = (0..4).map(|i| repo.emplace(i)).collect();
    repo.erase(handles[2]);
    let live: Vec<_> = repo.iter().map(|(_, &record)| record).collect();
    assert_eq!(live, vec![0, 1, 3]);
  }

  #[test]
  #[should_panic]
  fn release_underflow_panics() {
    let mut repo = Repository::new();
    let h = repo.emplace(());
    repo.release(h);
  }

  #[test]
  #[should_panic]
  fn erase_of_owned_record_panics() {
    let mut repo = Repository::new();
    let h = repo.emplace(());
    repo.retain(h);
    repo.erase(h);
  }
}
