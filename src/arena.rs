use std::collections::VecDeque;

/// Default number of slots per segment, balancing allocation frequency
/// against committed-but-unused memory.
pub const DEFAULT_SEGMENT_SIZE: usize = 100;

/// A growable pool of fixed-layout slots stored in linked segments.
///
/// Segments never move once allocated: growth appends a fresh boxed segment
/// instead of reallocating, so a slot index stays valid for the whole
/// lifetime of its record. Removed slots go on a free list and are reused by
/// later insertions; there is no compaction.
pub struct Arena<T> {
  segments: Vec<Box<[Slot<T>]>>,
  segment_size: usize,
  /// Slots handed back by `remove`, spare for reuse.
  free: VecDeque<u32>,
  /// First slot that has never been occupied.
  fresh: u32,
  len: usize,
}

enum Slot<T> {
  Vacant,
  Occupied(T),
}

impl<T> Slot<T> {
  fn occupied(&self) -> Option<&T> {
    match self {
      Slot::Occupied(record) => Some(record),
      Slot::Vacant => None,
    }
  }
  fn occupied_mut(&mut self) -> Option<&mut T> {
    match self {
      Slot::Occupied(record) => Some(record),
      Slot::Vacant => None,
    }
  }
}

impl<T> Arena<T> {
  pub fn new() -> Self {
    Self::with_segment_size(DEFAULT_SEGMENT_SIZE)
  }
  pub fn with_segment_size(segment_size: usize) -> Self {
    assert!(segment_size > 0);
    Self {
      segments: Vec::new(),
      segment_size,
      free: VecDeque::new(),
      fresh: 0,
      len: 0,
    }
  }

  pub fn len(&self) -> usize {
    self.len
  }
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }
  pub fn capacity(&self) -> usize {
    self.segments.len() * self.segment_size
  }
  pub fn segment_size(&self) -> usize {
    self.segment_size
  }

  fn slot(&self, idx: u32) -> Option<&Slot<T>> {
    let idx = idx as usize;
    self
      .segments
      .get(idx / self.segment_size)
      .map(|segment| &segment[idx % self.segment_size])
  }
  fn slot_mut(&mut self, idx: u32) -> Option<&mut Slot<T>> {
    let idx = idx as usize;
    self
      .segments
      .get_mut(idx / self.segment_size)
      .map(|segment| &mut segment[idx % self.segment_size])
  }

  /// Picks the slot for the next insertion: a free-list slot if one is
  /// spare, otherwise the next never-used slot, growing the arena by one
  /// segment when it is full.
  fn slot_for_placement(&mut self) -> u32 {
    if let Some(idx) = self.free.pop_front() {
      return idx;
    }
    if self.fresh as usize == self.capacity() {
      let segment: Box<[Slot<T>]> = (0..self.segment_size).map(|_| Slot::Vacant).collect();
      self.segments.push(segment);
    }
    let idx = self.fresh;
    self.fresh += 1;
    idx
  }

  pub fn insert(&mut self, record: T) -> u32 {
    let idx = self.slot_for_placement();
    *self.slot_mut(idx).unwrap() = Slot::Occupied(record);
    self.len += 1;
    idx
  }

  pub fn get(&self, idx: u32) -> Option<&T> {
    self.slot(idx).and_then(Slot::occupied)
  }
  pub fn get_mut(&mut self, idx: u32) -> Option<&mut T> {
    self.slot_mut(idx).and_then(Slot::occupied_mut)
  }

  /// Marks the slot vacant and reusable. Panics on a vacant or
  /// out-of-bounds index.
  pub fn remove(&mut self, idx: u32) -> T {
    let slot = self.slot_mut(idx).expect("arena index out of bounds");
    match std::mem::replace(slot, Slot::Vacant) {
      Slot::Occupied(record) => {
        self.free.push_back(idx);
        self.len -= 1;
        record
      }
      Slot::Vacant => panic!("removal of vacant arena slot"),
    }
  }

  /// Iterates occupied slots in index order, skipping vacancies and
  /// crossing segment boundaries transparently.
  pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
    self
      .segments
      .iter()
      .flat_map(|segment| segment.iter())
      .enumerate()
      .filter_map(|(idx, slot)| slot.occupied().map(|record| (idx as u32, record)))
  }
}

impl<T> Default for Arena<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod test {
  use super::Arena;

  #[test]
  fn insert_and_get() {
    let mut arena = Arena::with_segment_size(4);
    let a = arena.insert("a");
    let b = arena.insert("b");
    assert_eq!(arena.get(a), Some(&"a"));
    assert_eq!(arena.get(b), Some(&"b"));
    assert_eq!(arena.len(), 2);
  }

  #[test]
  fn growth_is_stable() {
    let mut arena = Arena::with_segment_size(2);
    let idxs: Vec<_> = (0..7).map(|i| arena.insert(i)).collect();
    assert_eq!(arena.capacity(), 8);
    for (i, &idx) in idxs.iter().enumerate() {
      assert_eq!(arena.get(idx), Some(&i));
    }
  }

  #[test]
  fn slot_reuse() {
    let mut arena = Arena::with_segment_size(4);
    let a = arena.insert(0);
    let b = arena.insert(1);
    arena.insert(2);
    assert_eq!(arena.remove(a), 0);
    assert_eq!(arena.remove(b), 1);
    // freed slots are reused before fresh ones, oldest first
    assert_eq!(arena.insert(3), a);
    assert_eq!(arena.insert(4), b);
    assert_eq!(arena.capacity(), 4);
  }

  #[test]
  fn vacant_get_is_none() {
    let mut arena = Arena::with_segment_size(4);
    let a = arena.insert(0);
    arena.remove(a);
    assert_eq!(arena.get(a), None);
    assert_eq!(arena.get(100), None);
  }

  #[test]
  fn iteration_skips_holes() {
    let mut arena = Arena::with_segment_size(2);
    let idxs: Vec<_> = (0..5).map(|i| arena.insert(i)).collect();
    arena.remove(idxs[1]);
    arena.remove(idxs[3]);
    let collected: Vec<_> = arena.iter().map(|(_, &record)| record).collect();
    assert_eq!(collected, vec![0, 2, 4]);
    // restartable
    assert_eq!(arena.iter().count(), 3);
  }

  #[test]
  #[should_panic]
  fn double_remove_panics() {
    let mut arena = Arena::with_segment_size(4);
    let a = arena.insert(0);
    arena.remove(a);
    arena.remove(a);
  }
}
