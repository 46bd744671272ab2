use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::slice;

/// Sentinel for an empty free list.
const NIL: u32 = u32::MAX;

/// A stable identifier for an element in a [`SlotMap`].
///
/// Handles stay valid until the element they name is removed. Once removed,
/// the handle value is recycled: a later insert may hand it out again for a
/// different element.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Handle(u32);

#[derive(Clone, Copy)]
enum Slot {
    Occupied { dense: u32 },
    Free { next: u32 },
}

/// An arena that hands out recyclable handles for its elements.
///
/// Values live in a dense array, so removal swaps the last element into the
/// hole and finishes in O(1). A sparse slot array translates handles to
/// dense positions and keeps handles stable across those swaps; freed slots
/// are threaded into an intrusive free list and reused by later inserts.
///
/// Iteration visits elements in ascending handle order, not insertion
/// order.
///
/// # Examples
///
/// ```rust
/// use rh_hash::SlotMap;
///
/// let mut map = SlotMap::new();
/// let a = map.insert("alpha");
/// let b = map.insert("beta");
///
/// assert_eq!(map.get(a), Some(&"alpha"));
/// assert_eq!(map.remove(b), Some("beta"));
/// assert_eq!(map.get(b), None);
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct SlotMap<T> {
    slots: Vec<Slot>,
    free_head: u32,
    dense: Vec<T>,
    dense_slots: Vec<u32>,
}

impl<T> SlotMap<T> {
    /// Creates a new empty map.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: NIL,
            dense: Vec::new(),
            dense_slots: Vec::new(),
        }
    }

    /// Creates a new empty map with space for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: NIL,
            dense: Vec::with_capacity(capacity),
            dense_slots: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of elements in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns the number of elements the map can hold without reallocating
    /// its value storage.
    pub fn capacity(&self) -> usize {
        self.dense.capacity()
    }

    /// Reserves space for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
        self.dense.reserve(additional);
        self.dense_slots.reserve(additional);
    }

    /// Removes all elements from the map.
    ///
    /// Every previously issued handle is invalidated, and all handle values
    /// become available for reuse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::SlotMap;
    ///
    /// let mut map = SlotMap::new();
    /// let handle = map.insert(1);
    ///
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.get(handle), None);
    /// ```
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NIL;
        self.dense.clear();
        self.dense_slots.clear();
    }

    /// Inserts a value and returns the handle that names it.
    ///
    /// The handle of a previously removed element may be reused.
    ///
    /// # Panics
    ///
    /// Panics if the map already holds `u32::MAX` elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::SlotMap;
    ///
    /// let mut map = SlotMap::new();
    /// let handle = map.insert(42);
    /// assert_eq!(map.get(handle), Some(&42));
    /// ```
    pub fn insert(&mut self, value: T) -> Handle {
        let dense = self.dense.len() as u32;
        let index = if self.free_head != NIL {
            let index = self.free_head as usize;
            self.free_head = match self.slots[index] {
                Slot::Free { next } => next,
                Slot::Occupied { .. } => unreachable!(),
            };
            self.slots[index] = Slot::Occupied { dense };
            index
        } else {
            let index = self.slots.len();
            assert!(index < NIL as usize, "slot map holds too many elements");
            self.slots.push(Slot::Occupied { dense });
            index
        };
        self.dense.push(value);
        self.dense_slots.push(index as u32);
        Handle(index as u32)
    }

    /// Removes and returns the element named by `handle`, or `None` if the
    /// handle is not live.
    ///
    /// The hole in the dense storage is filled by the last element, so the
    /// call is O(1) regardless of where the element sits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::SlotMap;
    ///
    /// let mut map = SlotMap::new();
    /// let handle = map.insert("value");
    ///
    /// assert_eq!(map.remove(handle), Some("value"));
    /// assert_eq!(map.remove(handle), None);
    /// ```
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let index = handle.0 as usize;
        let dense = match self.slots.get(index) {
            Some(&Slot::Occupied { dense }) => dense as usize,
            _ => return None,
        };
        self.slots[index] = Slot::Free {
            next: self.free_head,
        };
        self.free_head = handle.0;

        let value = self.dense.swap_remove(dense);
        self.dense_slots.swap_remove(dense);
        // Point the slot of the element that filled the hole at its new
        // dense position.
        if let Some(&moved) = self.dense_slots.get(dense) {
            self.slots[moved as usize] = Slot::Occupied {
                dense: dense as u32,
            };
        }
        Some(value)
    }

    /// Returns a reference to the element named by `handle`, or `None` if
    /// the handle is not live.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.0 as usize) {
            Some(&Slot::Occupied { dense }) => Some(&self.dense[dense as usize]),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element named by `handle`, or
    /// `None` if the handle is not live.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slots.get(handle.0 as usize) {
            Some(&Slot::Occupied { dense }) => Some(&mut self.dense[dense as usize]),
            _ => None,
        }
    }

    /// Returns `true` if `handle` names a live element.
    pub fn contains(&self, handle: Handle) -> bool {
        matches!(
            self.slots.get(handle.0 as usize),
            Some(Slot::Occupied { .. })
        )
    }

    /// Returns an iterator over `(Handle, &T)` pairs in ascending handle
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::SlotMap;
    ///
    /// let mut map = SlotMap::new();
    /// let a = map.insert(1);
    /// let b = map.insert(2);
    ///
    /// let pairs: Vec<_> = map.iter().collect();
    /// assert_eq!(pairs, vec![(a, &1), (b, &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter().enumerate(),
            dense: &self.dense,
            remaining: self.dense.len(),
        }
    }

    /// Returns an iterator over `(Handle, &mut T)` pairs in ascending
    /// handle order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            slots: self.slots.iter().enumerate(),
            dense: self.dense.as_mut_ptr(),
            remaining: self.dense.len(),
            marker: PhantomData,
        }
    }

    /// Returns an iterator over the live handles in ascending order.
    pub fn handles(&self) -> Handles<'_, T> {
        Handles { inner: self.iter() }
    }

    /// Returns an iterator over the values in ascending handle order.
    pub fn values(&self) -> Values<'_, T> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values in
    /// ascending handle order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, T> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }
}

impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for SlotMap<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> IntoIterator for SlotMap<T> {
    type IntoIter = IntoIter<T>;
    type Item = (Handle, T);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            map: self,
            next_slot: 0,
        }
    }
}

impl<'a, T> IntoIterator for &'a SlotMap<T> {
    type IntoIter = Iter<'a, T>;
    type Item = (Handle, &'a T);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SlotMap<T> {
    type IntoIter = IterMut<'a, T>;
    type Item = (Handle, &'a mut T);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An iterator over the `(Handle, &T)` pairs of a [`SlotMap`] in ascending
/// handle order.
pub struct Iter<'a, T> {
    slots: core::iter::Enumerate<slice::Iter<'a, Slot>>,
    dense: &'a [T],
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, slot) = self.slots.next()?;
            if let Slot::Occupied { dense } = *slot {
                self.remaining -= 1;
                return Some((Handle(index as u32), &self.dense[dense as usize]));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A mutable iterator over the `(Handle, &mut T)` pairs of a [`SlotMap`]
/// in ascending handle order.
pub struct IterMut<'a, T> {
    slots: core::iter::Enumerate<slice::Iter<'a, Slot>>,
    dense: *mut T,
    remaining: usize,
    marker: PhantomData<&'a mut T>,
}

// SAFETY: The iterator owns an exclusive borrow of the map and only hands
// out references derived from it.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (Handle, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, slot) = self.slots.next()?;
            if let Slot::Occupied { dense } = *slot {
                self.remaining -= 1;
                // SAFETY: Each dense position is named by exactly one
                // occupied slot, so every yielded reference is distinct.
                let value = unsafe { &mut *self.dense.add(dense as usize) };
                return Some((Handle(index as u32), value));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// An iterator over the live handles of a [`SlotMap`] in ascending order.
pub struct Handles<'a, T> {
    inner: Iter<'a, T>,
}

impl<T> Iterator for Handles<'_, T> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(handle, _)| handle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Handles<'_, T> {}

/// An iterator over the values of a [`SlotMap`] in ascending handle order.
pub struct Values<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Values<'_, T> {}

/// A mutable iterator over the values of a [`SlotMap`] in ascending handle
/// order.
pub struct ValuesMut<'a, T> {
    inner: IterMut<'a, T>,
}

impl<'a, T> Iterator for ValuesMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for ValuesMut<'_, T> {}

/// A consuming iterator over the `(Handle, T)` pairs of a [`SlotMap`] in
/// ascending handle order.
pub struct IntoIter<T> {
    map: SlotMap<T>,
    next_slot: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (Handle, T);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_slot < self.map.slots.len() {
            let handle = Handle(self.next_slot as u32);
            self.next_slot += 1;
            if let Some(value) = self.map.remove(handle) {
                return Some((handle, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.len(), Some(self.map.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
