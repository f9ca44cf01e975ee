//! Priority queue used as the search open set.

use std::hash::Hash;

use crate::heap::{Comparator, HeapEntry, IndexedHeap, by_priority};

/// A min-priority queue keyed by identity, backed by an [`IndexedHeap`].
///
/// The search engine keys entries by grid position so that a node already
/// waiting in the open set can be re-prioritised instead of duplicated.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T, I> {
    heap: IndexedHeap<T, I>,
}

impl<T, I: Eq + Hash + Clone> Default for PriorityQueue<T, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, I: Eq + Hash + Clone> PriorityQueue<T, I> {
    /// An empty queue ordered by ascending priority.
    pub fn new() -> Self {
        Self::with_comparator(by_priority)
    }

    /// An empty queue with a caller-supplied ordering.
    pub fn with_comparator(compare: Comparator<T, I>) -> Self {
        Self {
            heap: IndexedHeap::new(compare),
        }
    }

    /// Number of queued entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Queue `value` under `id` with the given priority.
    pub fn enqueue(&mut self, value: T, priority: f64, id: I) {
        self.heap.insert(HeapEntry::new(value, priority, id));
    }

    /// Queue several entries at once.
    pub fn enqueue_many(&mut self, entries: impl IntoIterator<Item = HeapEntry<T, I>>) {
        for e in entries {
            self.heap.insert(e);
        }
    }

    /// Remove and return the lowest-priority entry.
    pub fn dequeue(&mut self) -> Option<HeapEntry<T, I>> {
        self.heap.extract_top()
    }

    /// The lowest-priority entry, without removing it.
    pub fn peek(&self) -> Option<&HeapEntry<T, I>> {
        self.heap.peek()
    }

    /// Whether an entry with identity `id` is queued.
    pub fn contains(&self, id: &I) -> bool {
        self.heap.contains(id)
    }

    /// The queued entry with identity `id`, if any.
    pub fn get(&self, id: &I) -> Option<&HeapEntry<T, I>> {
        self.heap.get(id)
    }

    /// Change the priority of a queued entry. Returns `false` if absent.
    pub fn update_priority(&mut self, id: &I, priority: f64) -> bool {
        self.heap.update_priority(id, priority)
    }

    /// Replace a queued entry's value and priority. Returns `false` if absent.
    pub fn update_node(&mut self, entry: HeapEntry<T, I>) -> bool {
        self.heap.update_node(entry)
    }
}

impl<T: Clone, I: Eq + Hash + Clone> PriorityQueue<T, I> {
    /// Every queued entry in ascending priority order. The live queue is not
    /// modified.
    pub fn to_sorted_vec(&self) -> Vec<HeapEntry<T, I>> {
        self.heap.to_sorted_vec()
    }
}
