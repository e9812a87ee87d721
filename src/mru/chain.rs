//! Recency Chain Module
//!
//! Arena-backed doubly-linked list ordering entries by recency.

use std::iter::FusedIterator;

// == Handle ==
/// Stable reference to an entry stored in a [`RecencyChain`].
///
/// Handles carry the generation of the slot they were issued for, so a handle
/// kept after its entry was unlinked never aliases a later entry that reuses
/// the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    generation: u64,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency Chain ==
/// Tracks entries by recency of use.
///
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Links are slot indices into an arena, freed slots are recycled through a
/// free list. The chain has no notion of keys; callers that need lookup by
/// key keep their own index of handles.
#[derive(Debug)]
pub struct RecencyChain<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for RecencyChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyChain<T> {
    // == Constructor ==
    /// Creates a new empty chain.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Stores `value` as the new head (most recently used).
    pub fn push_front(&mut self, value: T) -> Handle {
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                debug_assert!(slot.value.is_none(), "free list holds a live slot");
                slot.value = Some(value);
                index
            }
            None => {
                self.slots.push(Slot {
                    value: Some(value),
                    generation: 0,
                    prev: None,
                    next: None,
                });
                self.slots.len() - 1
            }
        };

        self.link_front(index);
        self.len += 1;

        Handle {
            index,
            generation: self.slots[index].generation,
        }
    }

    // == Unlink ==
    /// Removes an entry from the chain and hands its value back.
    ///
    /// Returns None if the handle is stale.
    pub fn unlink(&mut self, handle: Handle) -> Option<T> {
        let index = self.resolve(handle)?;
        self.detach(index);

        let slot = &mut self.slots[index];
        let value = slot.value.take();
        slot.generation += 1;
        self.free.push(index);
        self.len -= 1;
        value
    }

    // == Move To Front ==
    /// Marks an entry as most recently used.
    ///
    /// Returns false if the handle is stale.
    pub fn move_to_front(&mut self, handle: Handle) -> bool {
        let Some(index) = self.resolve(handle) else {
            return false;
        };
        if self.head != Some(index) {
            self.detach(index);
            self.link_front(index);
        }
        true
    }

    // == Peek ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_back(&self) -> Option<(Handle, &T)> {
        self.tail.map(|index| self.entry_at(index))
    }

    /// Returns the most recently used entry.
    pub fn peek_front(&self) -> Option<(Handle, &T)> {
        self.head.map(|index| self.entry_at(index))
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<T> {
        let (handle, _) = self.peek_back()?;
        self.unlink(handle)
    }

    // == Access ==
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let index = self.resolve(handle)?;
        self.slots[index].value.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let index = self.resolve(handle)?;
        self.slots[index].value.as_mut()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.resolve(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    // == Drain ==
    /// Removes every entry, returning the values in slot order.
    ///
    /// All outstanding handles become stale.
    pub fn drain(&mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len);
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Some(value) = slot.value.take() {
                slot.generation += 1;
                values.push(value);
            }
            slot.prev = None;
            slot.next = None;
            self.free.push(index);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
        values
    }

    // == Internals ==
    fn resolve(&self, handle: Handle) -> Option<usize> {
        let slot = self.slots.get(handle.index)?;
        (slot.generation == handle.generation && slot.value.is_some()).then_some(handle.index)
    }

    fn entry_at(&self, index: usize) -> (Handle, &T) {
        let slot = &self.slots[index];
        let handle = Handle {
            index,
            generation: slot.generation,
        };
        match slot.value.as_ref() {
            Some(value) => (handle, value),
            None => unreachable!("linked slot {index} has no value"),
        }
    }

    fn link_front(&mut self, index: usize) {
        let old_head = self.head;
        {
            let slot = &mut self.slots[index];
            slot.prev = None;
            slot.next = old_head;
        }
        match old_head {
            Some(head) => self.slots[head].prev = Some(index),
            None => self.tail = Some(index),
        }
        self.head = Some(index);
    }

    fn detach(&mut self, index: usize) {
        let (prev, next) = {
            let slot = &mut self.slots[index];
            (slot.prev.take(), slot.next.take())
        };
        match prev {
            Some(prev) => self.slots[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.slots[next].prev = prev,
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over a [`RecencyChain`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    chain: &'a RecencyChain<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front?;
        let chain: &'a RecencyChain<T> = self.chain;
        self.front = chain.slots[index].next;
        self.remaining -= 1;
        Some(chain.entry_at(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back?;
        let chain: &'a RecencyChain<T> = self.chain;
        self.back = chain.slots[index].prev;
        self.remaining -= 1;
        Some(chain.entry_at(index))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn values<T: Clone>(chain: &RecencyChain<T>) -> Vec<T> {
        chain.iter().map(|(_, v)| v.clone()).collect()
    }

    #[test]
    fn test_chain_new() {
        let chain: RecencyChain<&str> = RecencyChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(chain.peek_back().is_none());
        assert!(chain.peek_front().is_none());
    }

    #[test]
    fn test_chain_push_front_order() {
        let mut chain = RecencyChain::new();
        chain.push_front("a");
        chain.push_front("b");
        chain.push_front("c");

        assert_eq!(chain.len(), 3);
        assert_eq!(values(&chain), vec!["c", "b", "a"]);
        assert_eq!(chain.peek_back().map(|(_, v)| *v), Some("a"));
        assert_eq!(chain.peek_front().map(|(_, v)| *v), Some("c"));
    }

    #[test]
    fn test_chain_move_to_front() {
        let mut chain = RecencyChain::new();
        let a = chain.push_front("a");
        chain.push_front("b");
        let c = chain.push_front("c");

        assert!(chain.move_to_front(a));
        assert_eq!(values(&chain), vec!["a", "c", "b"]);

        // Moving the head is a no-op
        assert!(chain.move_to_front(a));
        assert_eq!(values(&chain), vec!["a", "c", "b"]);

        assert!(chain.move_to_front(c));
        assert_eq!(values(&chain), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_chain_unlink_middle_head_tail() {
        let mut chain = RecencyChain::new();
        let a = chain.push_front("a");
        let b = chain.push_front("b");
        let c = chain.push_front("c");
        let d = chain.push_front("d");

        assert_eq!(chain.unlink(b), Some("b"));
        assert_eq!(values(&chain), vec!["d", "c", "a"]);

        assert_eq!(chain.unlink(d), Some("d"));
        assert_eq!(values(&chain), vec!["c", "a"]);

        assert_eq!(chain.unlink(a), Some("a"));
        assert_eq!(values(&chain), vec!["c"]);

        assert_eq!(chain.unlink(c), Some("c"));
        assert!(chain.is_empty());
        assert!(chain.peek_back().is_none());
    }

    #[test]
    fn test_chain_pop_back() {
        let mut chain = RecencyChain::new();
        chain.push_front(1);
        chain.push_front(2);
        chain.push_front(3);

        assert_eq!(chain.pop_back(), Some(1));
        assert_eq!(chain.pop_back(), Some(2));
        assert_eq!(chain.pop_back(), Some(3));
        assert_eq!(chain.pop_back(), None);
    }

    #[test]
    fn test_chain_stale_handle() {
        let mut chain = RecencyChain::new();
        let a = chain.push_front("a");
        assert_eq!(chain.unlink(a), Some("a"));

        // Slot gets reused by the next push
        let b = chain.push_front("b");
        assert!(!chain.contains(a));
        assert!(chain.contains(b));
        assert_eq!(chain.get(a), None);
        assert!(!chain.move_to_front(a));
        assert_eq!(chain.unlink(a), None);
        assert_eq!(chain.get(b), Some(&"b"));
    }

    #[test]
    fn test_chain_get_mut() {
        let mut chain = RecencyChain::new();
        let a = chain.push_front(String::from("a"));
        chain.get_mut(a).unwrap().push('!');
        assert_eq!(chain.get(a).map(String::as_str), Some("a!"));
    }

    #[test]
    fn test_chain_iter_reverse() {
        let mut chain = RecencyChain::new();
        chain.push_front(1);
        chain.push_front(2);
        chain.push_front(3);

        let back_to_front: Vec<i32> = chain.iter().rev().map(|(_, v)| *v).collect();
        assert_eq!(back_to_front, vec![1, 2, 3]);
        assert_eq!(chain.iter().len(), 3);
    }

    #[test]
    fn test_chain_drain() {
        let mut chain = RecencyChain::new();
        let a = chain.push_front(1);
        chain.push_front(2);

        let mut drained = chain.drain();
        drained.sort();
        assert_eq!(drained, vec![1, 2]);
        assert!(chain.is_empty());
        assert!(!chain.contains(a));

        // Chain is usable after drain
        chain.push_front(3);
        assert_eq!(values(&chain), vec![3]);
    }
}
