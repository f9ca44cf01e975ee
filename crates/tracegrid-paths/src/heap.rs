//! Indexed binary min-heap.
//!
//! Entries are stored in a dense array laid out as a complete binary tree.
//! A side table maps each entry's identity to its current array slot, so an
//! arbitrary entry can be re-prioritised or removed in `O(log n)` instead of
//! only the root. The array and the slot table are updated together on every
//! swap and are never observed out of sync.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// A value stored in the heap together with its priority and identity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeapEntry<T, I> {
    pub value: T,
    pub priority: f64,
    pub id: I,
}

impl<T, I> HeapEntry<T, I> {
    /// Create a new entry.
    pub fn new(value: T, priority: f64, id: I) -> Self {
        Self {
            value,
            priority,
            id,
        }
    }
}

/// Entry ordering used by the heap. `Less` sorts toward the root.
pub type Comparator<T, I> = fn(&HeapEntry<T, I>, &HeapEntry<T, I>) -> Ordering;

/// Ascending order by priority. `NaN` sorts after every number.
pub fn by_priority<T, I>(a: &HeapEntry<T, I>, b: &HeapEntry<T, I>) -> Ordering {
    a.priority.total_cmp(&b.priority)
}

/// A binary heap with identity-indexed updates.
///
/// At most one entry per identity is live at any time.
#[derive(Debug, Clone)]
pub struct IndexedHeap<T, I> {
    entries: Vec<HeapEntry<T, I>>,
    slots: HashMap<I, usize>,
    compare: Comparator<T, I>,
}

impl<T, I: Eq + Hash + Clone> Default for IndexedHeap<T, I> {
    fn default() -> Self {
        Self::new(by_priority)
    }
}

impl<T, I: Eq + Hash + Clone> IndexedHeap<T, I> {
    /// Create an empty heap ordered by `compare`.
    pub fn new(compare: Comparator<T, I>) -> Self {
        Self {
            entries: Vec::new(),
            slots: HashMap::new(),
            compare,
        }
    }

    /// Create an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize, compare: Comparator<T, I>) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            compare,
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry with identity `id` is in the heap.
    #[inline]
    pub fn contains(&self, id: &I) -> bool {
        self.slots.contains_key(id)
    }

    /// The live entry with identity `id`, if any.
    pub fn get(&self, id: &I) -> Option<&HeapEntry<T, I>> {
        self.slots.get(id).map(|&i| &self.entries[i])
    }

    /// The root entry, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&HeapEntry<T, I>> {
        self.entries.first()
    }

    /// Insert an entry.
    ///
    /// If an entry with the same identity is already live it is replaced in
    /// place, as with [`update_node`](Self::update_node).
    pub fn insert(&mut self, entry: HeapEntry<T, I>) {
        if self.contains(&entry.id) {
            self.update_node(entry);
            return;
        }
        let idx = self.entries.len();
        self.slots.insert(entry.id.clone(), idx);
        self.entries.push(entry);
        self.sift_up(idx);
    }

    /// Remove and return the root entry.
    pub fn extract_top(&mut self) -> Option<HeapEntry<T, I>> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap_slots(0, last);
        let top = self.entries.pop()?;
        self.slots.remove(&top.id);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// Change the priority of the entry with identity `id`.
    ///
    /// Returns `false` (and does nothing) if no such entry is live.
    pub fn update_priority(&mut self, id: &I, priority: f64) -> bool {
        let Some(&idx) = self.slots.get(id) else {
            return false;
        };
        self.entries[idx].priority = priority;
        self.restore(idx);
        true
    }

    /// Replace the value and priority of the live entry sharing
    /// `entry.id`.
    ///
    /// Returns `false` (and does nothing) if no such entry is live.
    pub fn update_node(&mut self, entry: HeapEntry<T, I>) -> bool {
        let Some(&idx) = self.slots.get(&entry.id) else {
            return false;
        };
        self.entries[idx] = entry;
        self.restore(idx);
        true
    }

    /// Remove the entry with identity `id` and return it.
    pub fn remove(&mut self, id: &I) -> Option<HeapEntry<T, I>> {
        let idx = *self.slots.get(id)?;
        let last = self.entries.len() - 1;
        self.swap_slots(idx, last);
        let removed = self.entries.pop()?;
        self.slots.remove(&removed.id);
        if idx < self.entries.len() {
            self.restore(idx);
        }
        Some(removed)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
    }

    /// Entries in heap-array order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = &HeapEntry<T, I>> + '_ {
        self.entries.iter()
    }

    /// Drain the heap into a vector in ascending comparator order.
    pub fn into_sorted_vec(mut self) -> Vec<HeapEntry<T, I>> {
        let mut out = Vec::with_capacity(self.entries.len());
        while let Some(e) = self.extract_top() {
            out.push(e);
        }
        out
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Re-establish the heap property around `idx` after its entry changed.
    /// At most one of the two sifts moves the entry.
    fn restore(&mut self, idx: usize) {
        if self.sift_up(idx) == idx {
            self.sift_down(idx);
        }
    }

    /// Move the entry at `idx` toward the root. Returns its final slot.
    fn sift_up(&mut self, mut idx: usize) -> usize {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if (self.compare)(&self.entries[idx], &self.entries[parent]) != Ordering::Less {
                break;
            }
            self.swap_slots(idx, parent);
            idx = parent;
        }
        idx
    }

    /// Move the entry at `idx` toward the leaves.
    fn sift_down(&mut self, mut idx: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len
                && (self.compare)(&self.entries[left], &self.entries[smallest]) == Ordering::Less
            {
                smallest = left;
            }
            if right < len
                && (self.compare)(&self.entries[right], &self.entries[smallest]) == Ordering::Less
            {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap_slots(idx, smallest);
            idx = smallest;
        }
    }

    /// Swap two array slots and keep the identity index in step.
    fn swap_slots(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        if let Some(slot) = self.slots.get_mut(&self.entries[a].id) {
            *slot = a;
        }
        if let Some(slot) = self.slots.get_mut(&self.entries[b].id) {
            *slot = b;
        }
    }

    /// Check the heap property and slot table against each other.
    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        if self.slots.len() != self.entries.len() {
            return false;
        }
        for (i, e) in self.entries.iter().enumerate() {
            if self.slots.get(&e.id) != Some(&i) {
                return false;
            }
            if i > 0 {
                let parent = (i - 1) / 2;
                if (self.compare)(e, &self.entries[parent]) == Ordering::Less {
                    return false;
                }
            }
        }
        true
    }
}

impl<T: Clone, I: Eq + Hash + Clone> IndexedHeap<T, I> {
    /// All entries in ascending comparator order, leaving the heap untouched.
    pub fn to_sorted_vec(&self) -> Vec<HeapEntry<T, I>> {
        self.clone().into_sorted_vec()
    }
}
