//! Dual Order List Module
//!
//! Indexable list that also keeps its items in recency order.

use std::ops::Index;

use tracing::{debug, trace};

use crate::error::{MruError, Result};
use crate::mru::{DestroyItemFn, Handle, OnDestroy, RecencyChain};

// == Dual Order List ==
/// List with two independent orderings over the same items.
///
/// The primary order is positional and behaves like a `Vec`. The secondary
/// order is recency: adding, inserting or replacing an item puts it at the
/// front, and [`touch`](Self::touch) / [`touch_at`](Self::touch_at) move an
/// item there without changing its position. [`mru_view`](Self::mru_view)
/// reads the recency order.
///
/// With a capacity bound set, the least recently used items are evicted.
/// Finding an evicted item's position is a linear scan of the primary order.
#[derive(Debug)]
pub struct DualOrderList<T> {
    chain: RecencyChain<T>,
    primary: Vec<Handle>,
    max_capacity: Option<usize>,
    on_destroy: OnDestroy<DestroyItemFn<T>>,
}

impl<T> Default for DualOrderList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DualOrderList<T> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            chain: RecencyChain::new(),
            primary: Vec::new(),
            max_capacity: None,
            on_destroy: OnDestroy::default(),
        }
    }

    pub fn with_max_capacity(max_capacity: usize) -> Result<Self> {
        let mut list = Self::new();
        list.set_max_capacity(Some(max_capacity))?;
        Ok(list)
    }

    /// Installs the callback receiving evicted and cleared items.
    pub fn with_destroy_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        self.on_destroy = OnDestroy::new(Box::new(callback));
        self
    }

    // == Primary Mutation ==
    /// Appends `item`, which also becomes the most recently used.
    pub fn add(&mut self, item: T) {
        let handle = self.chain.push_front(item);
        self.primary.push(handle);
        self.enforce_capacity();
    }

    /// Inserts `item` at `index` (`0..=len`) and makes it most recently used.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        if index > self.primary.len() {
            return Err(self.out_of_range(index));
        }
        let handle = self.chain.push_front(item);
        self.primary.insert(index, handle);
        self.enforce_capacity();
        Ok(())
    }

    /// Replaces the item at `index`, returning the previous one.
    ///
    /// The new item becomes the most recently used. The previous item goes
    /// back to the caller, not to the destroy callback, same as
    /// [`remove_at`](Self::remove_at).
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        let handle = self.handle_at(index)?;
        let old = match self.chain.get_mut(handle) {
            Some(slot) => std::mem::replace(slot, item),
            None => unreachable!("listed handle is not live"),
        };
        self.chain.move_to_front(handle);
        Ok(old)
    }

    /// Removes and returns the item at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let handle = self.handle_at(index)?;
        self.primary.remove(index);
        match self.chain.unlink(handle) {
            Some(item) => Ok(item),
            None => unreachable!("listed handle is not live"),
        }
    }

    /// Destroys every item.
    pub fn clear(&mut self) {
        self.primary.clear();
        for item in self.chain.drain() {
            self.on_destroy.item(item);
        }
    }

    // == Recency ==
    /// Makes the item at `index` the most recently used.
    pub fn touch_at(&mut self, index: usize) -> Result<()> {
        let handle = self.handle_at(index)?;
        self.chain.move_to_front(handle);
        Ok(())
    }

    /// Read-only view of the recency order.
    pub fn mru_view(&self) -> MruView<'_, T> {
        MruView { chain: &self.chain }
    }

    // == Primary Access ==
    pub fn get(&self, index: usize) -> Option<&T> {
        let handle = *self.primary.get(index)?;
        self.chain.get(handle)
    }

    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Items in primary (positional) order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.primary
            .iter()
            .filter_map(move |handle| self.chain.get(*handle))
    }

    // == Capacity ==
    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    pub fn set_max_capacity(&mut self, max_capacity: Option<usize>) -> Result<()> {
        if let Some(max_capacity) = max_capacity {
            MruError::check_capacity(max_capacity)?;
        }
        self.max_capacity = max_capacity;
        trace!(?max_capacity, len = self.len(), "Capacity changed");
        self.enforce_capacity();
        Ok(())
    }

    // == Internals ==
    fn handle_at(&self, index: usize) -> Result<Handle> {
        self.primary
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    fn out_of_range(&self, index: usize) -> MruError {
        MruError::IndexOutOfRange {
            index,
            len: self.primary.len(),
        }
    }

    fn enforce_capacity(&mut self) {
        let Some(max_capacity) = self.max_capacity else {
            return;
        };
        while self.primary.len() > max_capacity {
            let Some((handle, _)) = self.chain.peek_back() else {
                break;
            };
            if let Some(position) = self.primary.iter().position(|h| *h == handle) {
                self.primary.remove(position);
            }
            if let Some(item) = self.chain.unlink(handle) {
                debug!(len = self.primary.len(), "Evicted least recently used item");
                self.on_destroy.item(item);
            }
        }
        debug_assert_eq!(self.primary.len(), self.chain.len());
    }
}

impl<T: PartialEq> DualOrderList<T> {
    // == Equality Lookup ==
    /// Position of the first item equal to `item` in primary order.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.primary
            .iter()
            .position(|handle| self.chain.get(*handle) == Some(item))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Makes the first item equal to `item` the most recently used.
    ///
    /// Returns false if no such item exists.
    pub fn touch(&mut self, item: &T) -> bool {
        match self.index_of(item) {
            Some(index) => self.chain.move_to_front(self.primary[index]),
            None => false,
        }
    }

    /// Destroys the first item equal to `item`; false if none matched.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(index) = self.index_of(item) else {
            return false;
        };
        match self.remove_at(index) {
            Ok(removed) => {
                self.on_destroy.item(removed);
                true
            }
            Err(_) => false,
        }
    }
}

impl<T> Index<usize> for DualOrderList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            ),
        }
    }
}

impl<T> Extend<T> for DualOrderList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T> FromIterator<T> for DualOrderList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

// == MRU View ==
/// Recency-order view over a [`DualOrderList`], most recent first.
#[derive(Debug)]
pub struct MruView<'a, T> {
    chain: &'a RecencyChain<T>,
}

impl<T> Clone for MruView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MruView<'_, T> {}

impl<'a, T> MruView<'a, T> {
    /// Most recently used item.
    pub fn first(&self) -> Option<&'a T> {
        self.chain.peek_front().map(|(_, item)| item)
    }

    /// Least recently used item.
    pub fn last(&self) -> Option<&'a T> {
        self.chain.peek_back().map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a T> + ExactSizeIterator + 'a {
        self.chain.iter().map(|(_, item)| item)
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for MruView<'a, T> {
    type Item = &'a T;
    type IntoIter = std::iter::Map<
        crate::mru::chain::Iter<'a, T>,
        fn((Handle, &'a T)) -> &'a T,
    >;

    fn into_iter(self) -> Self::IntoIter {
        let item: fn((Handle, &'a T)) -> &'a T = |(_, item)| item;
        self.chain.iter().map(item)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn primary(list: &DualOrderList<&'static str>) -> Vec<&'static str> {
        list.iter().copied().collect()
    }

    fn recency(list: &DualOrderList<&'static str>) -> Vec<&'static str> {
        list.mru_view().to_vec()
    }

    #[test]
    fn test_list_add_orders() {
        let mut list = DualOrderList::new();
        list.add("a");
        list.add("b");
        list.add("c");

        assert_eq!(primary(&list), vec!["a", "b", "c"]);
        assert_eq!(recency(&list), vec!["c", "b", "a"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list[1], "b");
    }

    #[test]
    fn test_list_insert_at_index() {
        let mut list: DualOrderList<&str> = ["a", "c"].into_iter().collect();

        list.insert(1, "b").unwrap();
        list.insert(3, "d").unwrap();

        assert_eq!(primary(&list), vec!["a", "b", "c", "d"]);
        assert_eq!(recency(&list), vec!["d", "b", "c", "a"]);

        let result = list.insert(9, "x");
        assert_eq!(result, Err(MruError::IndexOutOfRange { index: 9, len: 4 }));
    }

    #[test]
    fn test_list_touch_keeps_primary_order() {
        let mut list: DualOrderList<&str> = ["a", "b", "c"].into_iter().collect();

        assert!(list.touch(&"a"));
        assert_eq!(primary(&list), vec!["a", "b", "c"]);
        assert_eq!(recency(&list), vec!["a", "c", "b"]);

        list.touch_at(1).unwrap();
        assert_eq!(primary(&list), vec!["a", "b", "c"]);
        assert_eq!(recency(&list), vec!["b", "a", "c"]);

        assert!(!list.touch(&"missing"));
        assert!(list.touch_at(3).is_err());
    }

    #[test]
    fn test_list_set_replaces_and_touches() {
        let mut list: DualOrderList<&str> = ["a", "b", "c"].into_iter().collect();

        let old = list.set(0, "z").unwrap();

        assert_eq!(old, "a");
        assert_eq!(primary(&list), vec!["z", "b", "c"]);
        assert_eq!(recency(&list), vec!["z", "c", "b"]);
        assert!(list.set(5, "y").is_err());
    }

    #[test]
    fn test_list_remove_at_keeps_recency_of_others() {
        let mut list: DualOrderList<&str> = ["a", "b", "c"].into_iter().collect();

        assert_eq!(list.remove_at(1), Ok("b"));
        assert_eq!(primary(&list), vec!["a", "c"]);
        assert_eq!(recency(&list), vec!["c", "a"]);
        assert_eq!(
            list.remove_at(2),
            Err(MruError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_list_lookup_primary() {
        let list: DualOrderList<&str> = ["a", "b", "a"].into_iter().collect();

        assert_eq!(list.index_of(&"a"), Some(0));
        assert_eq!(list.index_of(&"b"), Some(1));
        assert_eq!(list.index_of(&"x"), None);
        assert!(list.contains(&"b"));
        assert_eq!(list.get(7), None);
    }

    #[test]
    fn test_list_mru_view() {
        let mut list: DualOrderList<&str> = ["a", "b", "c"].into_iter().collect();
        list.touch(&"b");

        let view = list.mru_view();
        assert_eq!(view.first(), Some(&"b"));
        assert_eq!(view.last(), Some(&"a"));
        assert_eq!(view.len(), 3);
        let collected: Vec<&&str> = view.into_iter().collect();
        assert_eq!(collected, vec![&"b", &"c", &"a"]);
        assert_eq!(view.iter().rev().copied().collect::<Vec<_>>(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_list_capacity_evicts_recency_tail() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let mut list: DualOrderList<&str> = DualOrderList::with_max_capacity(3)
            .unwrap()
            .with_destroy_callback(move |item| sink.lock().unwrap().push(item));

        list.add("a");
        list.add("b");
        list.add("c");
        list.touch(&"a");
        list.add("d");

        assert_eq!(primary(&list), vec!["a", "c", "d"]);
        assert_eq!(recency(&list), vec!["d", "a", "c"]);
        assert_eq!(*evicted.lock().unwrap(), vec!["b"]);

        list.set_max_capacity(Some(1)).unwrap();
        assert_eq!(primary(&list), vec!["d"]);
        assert_eq!(*evicted.lock().unwrap(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_list_remove_and_clear_destroy() {
        let destroyed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&destroyed);
        let mut list: DualOrderList<&str> = DualOrderList::new()
            .with_destroy_callback(move |item| sink.lock().unwrap().push(item));
        list.extend(["a", "b", "c"]);

        assert!(list.remove(&"b"));
        assert!(!list.remove(&"b"));
        assert_eq!(*destroyed.lock().unwrap(), vec!["b"]);

        list.clear();
        assert!(list.is_empty());
        assert!(list.mru_view().is_empty());
        let mut all = destroyed.lock().unwrap().clone();
        all.sort();
        assert_eq!(all, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_list_set_returns_old_item_without_destroying() {
        let destroyed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&destroyed);
        let mut list: DualOrderList<&str> = DualOrderList::new()
            .with_destroy_callback(move |item| sink.lock().unwrap().push(item));
        list.extend(["a", "b"]);

        assert_eq!(list.set(0, "z"), Ok("a"));
        assert_eq!(list.remove_at(1), Ok("b"));
        assert!(destroyed.lock().unwrap().is_empty());

        // Destroying paths still fire for the replacement
        list.clear();
        assert_eq!(*destroyed.lock().unwrap(), vec!["z"]);
    }

    #[test]
    fn test_list_zero_capacity_rejected() {
        assert!(matches!(
            DualOrderList::<u8>::with_max_capacity(0),
            Err(MruError::InvalidCapacity(0))
        ));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_list_index_out_of_bounds_panics() {
        let list: DualOrderList<u8> = DualOrderList::new();
        let _item: u8 = list[0];
    }
}
