use core::fmt::Debug;
use core::mem::MaybeUninit;
use core::ops::Bound;
use core::ops::RangeBounds;
use core::ptr;
use core::slice;

/// The error type for operations on a full [`ArrayDeque`].
///
/// Insertion methods hand the rejected element back inside the error so the
/// caller can recover it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CapacityError<T = ()>(T);

impl<T> CapacityError<T> {
    /// Consumes the error and returns the element that did not fit.
    pub fn into_element(self) -> T {
        self.0
    }
}

impl<T> Debug for CapacityError<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CapacityError: {self}")
    }
}

impl<T> core::fmt::Display for CapacityError<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("insufficient capacity")
    }
}

impl<T> core::error::Error for CapacityError<T> {}

/// A double-ended queue with a fixed compile-time capacity and inline
/// storage.
///
/// `ArrayDeque<T, N>` stores up to `N` elements in a ring buffer embedded
/// directly in the struct, so it never allocates and never grows. Pushing
/// into a full deque returns a [`CapacityError`] carrying the rejected
/// element instead of resizing.
///
/// Positional `insert` and `remove` shift whichever side of the buffer
/// holds fewer elements, so an edit near either end moves at most half the
/// deque.
///
/// # Examples
///
/// ```rust
/// use rh_hash::ArrayDeque;
///
/// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
/// deque.push_back(1).unwrap();
/// deque.push_back(2).unwrap();
/// deque.push_front(0).unwrap();
///
/// assert_eq!(deque.pop_front(), Some(0));
/// assert_eq!(deque.pop_back(), Some(2));
/// assert_eq!(deque.len(), 1);
/// ```
pub struct ArrayDeque<T, const N: usize> {
    buf: [MaybeUninit<T>; N],
    head: usize,
    len: usize,
}

impl<T, const N: usize> ArrayDeque<T, N> {
    /// Creates a new empty deque.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let deque: ArrayDeque<i32, 8> = ArrayDeque::new();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.capacity(), 8);
    /// ```
    pub fn new() -> Self {
        Self {
            buf: [const { MaybeUninit::uninit() }; N],
            head: 0,
            len: 0,
        }
    }

    /// Returns the fixed capacity of the deque.
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Returns the number of elements in the deque.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the deque contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the deque holds `N` elements.
    ///
    /// A full deque rejects further insertions until an element is removed.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Removes all elements from the deque.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// deque.push_back(1).unwrap();
    /// deque.push_back(2).unwrap();
    ///
    /// deque.clear();
    /// assert!(deque.is_empty());
    /// ```
    pub fn clear(&mut self) {
        let (a, b) = self.as_mut_slices();
        let a: *mut [T] = a;
        let b: *mut [T] = b;
        // The deque must already be empty when the destructors run; a
        // panicking drop unwinds through here with `len` still honest.
        self.head = 0;
        self.len = 0;
        // SAFETY: Both slices cover initialized elements that the deque no
        // longer tracks, and they are disjoint.
        unsafe {
            ptr::drop_in_place(a);
            ptr::drop_in_place(b);
        }
    }

    /// Returns a reference to the front element, or `None` if the deque is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// assert_eq!(deque.front(), None);
    ///
    /// deque.push_back(1).unwrap();
    /// deque.push_back(2).unwrap();
    /// assert_eq!(deque.front(), Some(&1));
    /// ```
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a mutable reference to the front element, or `None` if the
    /// deque is empty.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns a reference to the back element, or `None` if the deque is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// deque.push_back(1).unwrap();
    /// deque.push_back(2).unwrap();
    /// assert_eq!(deque.back(), Some(&2));
    /// ```
    pub fn back(&self) -> Option<&T> {
        let index = self.len.checked_sub(1)?;
        self.get(index)
    }

    /// Returns a mutable reference to the back element, or `None` if the
    /// deque is empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let index = self.len.checked_sub(1)?;
        self.get_mut(index)
    }

    /// Returns a reference to the element at the given position, counting
    /// from the front.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// deque.push_back(10).unwrap();
    /// deque.push_back(20).unwrap();
    ///
    /// assert_eq!(deque.get(1), Some(&20));
    /// assert_eq!(deque.get(2), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: `index` is below `len`, so the slot holds an initialized
        // element.
        Some(unsafe { self.buf[Self::wrap_add(self.head, index)].assume_init_ref() })
    }

    /// Returns a mutable reference to the element at the given position,
    /// counting from the front.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: `index` is below `len`, so the slot holds an initialized
        // element.
        Some(unsafe { self.buf[Self::wrap_add(self.head, index)].assume_init_mut() })
    }

    /// Prepends an element to the deque.
    ///
    /// Returns the element inside a [`CapacityError`] if the deque is full.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 2> = ArrayDeque::new();
    /// deque.push_front(1).unwrap();
    /// deque.push_front(2).unwrap();
    ///
    /// let err = deque.push_front(3).unwrap_err();
    /// assert_eq!(err.into_element(), 3);
    /// assert_eq!(deque.front(), Some(&2));
    /// ```
    pub fn push_front(&mut self, value: T) -> Result<(), CapacityError<T>> {
        if self.len == N {
            return Err(CapacityError(value));
        }
        self.head = Self::wrap_sub(self.head, 1);
        self.buf[self.head].write(value);
        self.len += 1;
        Ok(())
    }

    /// Appends an element to the deque.
    ///
    /// Returns the element inside a [`CapacityError`] if the deque is full.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 2> = ArrayDeque::new();
    /// assert!(deque.push_back(1).is_ok());
    /// assert!(deque.push_back(2).is_ok());
    /// assert!(deque.push_back(3).is_err());
    /// assert_eq!(deque.back(), Some(&2));
    /// ```
    pub fn push_back(&mut self, value: T) -> Result<(), CapacityError<T>> {
        if self.len == N {
            return Err(CapacityError(value));
        }
        self.buf[Self::wrap_add(self.head, self.len)].write(value);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the front element, or `None` if the deque is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// deque.push_back(1).unwrap();
    /// deque.push_back(2).unwrap();
    ///
    /// assert_eq!(deque.pop_front(), Some(1));
    /// assert_eq!(deque.pop_front(), Some(2));
    /// assert_eq!(deque.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: The deque is non-empty, so the head slot holds an
        // initialized element, and it is untracked once `len` shrinks.
        let value = unsafe { self.buf[self.head].assume_init_read() };
        self.head = Self::wrap_add(self.head, 1);
        self.len -= 1;
        Some(value)
    }

    /// Removes and returns the back element, or `None` if the deque is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// deque.push_back(1).unwrap();
    /// deque.push_back(2).unwrap();
    ///
    /// assert_eq!(deque.pop_back(), Some(2));
    /// assert_eq!(deque.pop_back(), Some(1));
    /// assert_eq!(deque.pop_back(), None);
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: The slot at the old back position holds an initialized
        // element, and it is untracked now that `len` shrank.
        Some(unsafe { self.buf[Self::wrap_add(self.head, self.len)].assume_init_read() })
    }

    /// Inserts an element at position `index`, shifting whichever side of
    /// the deque holds fewer elements.
    ///
    /// Returns the element inside a [`CapacityError`] if the deque is full.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than the deque's length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// deque.push_back(1).unwrap();
    /// deque.push_back(3).unwrap();
    ///
    /// deque.insert(1, 2).unwrap();
    /// assert_eq!(deque.pop_front(), Some(1));
    /// assert_eq!(deque.pop_front(), Some(2));
    /// assert_eq!(deque.pop_front(), Some(3));
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), CapacityError<T>> {
        assert!(
            index <= self.len,
            "insertion index (is {index}) should be <= len (is {})",
            self.len
        );
        if self.len == N {
            return Err(CapacityError(value));
        }
        if index < self.len - index {
            // Fewer elements in front of the insertion point. Move the head
            // back one slot and slide the front segment into it.
            let new_head = Self::wrap_sub(self.head, 1);
            for k in 0..index {
                let src = Self::wrap_add(self.head, k);
                let dst = Self::wrap_add(new_head, k);
                // SAFETY: `src` holds an initialized element and `dst` was
                // vacated by the previous step (or is the freed head slot).
                let v = unsafe { self.buf[src].assume_init_read() };
                self.buf[dst].write(v);
            }
            self.buf[Self::wrap_add(new_head, index)].write(value);
            self.head = new_head;
        } else {
            // Slide the back segment one slot toward the tail, walking from
            // the end so no element is overwritten before it moves.
            for k in (index..self.len).rev() {
                let src = Self::wrap_add(self.head, k);
                let dst = Self::wrap_add(self.head, k + 1);
                // SAFETY: `src` holds an initialized element and `dst` was
                // vacated by the previous step (or is the unused tail slot).
                let v = unsafe { self.buf[src].assume_init_read() };
                self.buf[dst].write(v);
            }
            self.buf[Self::wrap_add(self.head, index)].write(value);
        }
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the element at position `index`, shifting
    /// whichever side of the deque holds fewer elements. Returns `None` if
    /// `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// deque.push_back(1).unwrap();
    /// deque.push_back(2).unwrap();
    /// deque.push_back(3).unwrap();
    ///
    /// assert_eq!(deque.remove(1), Some(2));
    /// assert_eq!(deque.remove(5), None);
    /// assert_eq!(deque.len(), 2);
    /// ```
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: `index` is below `len`, so the slot holds an initialized
        // element. The hole is filled or untracked before returning.
        let value = unsafe { self.buf[Self::wrap_add(self.head, index)].assume_init_read() };
        if index < self.len - index - 1 {
            // Fewer elements in front of the hole. Slide the front segment
            // toward the tail, walking from the hole backwards.
            for k in (0..index).rev() {
                let src = Self::wrap_add(self.head, k);
                let dst = Self::wrap_add(self.head, k + 1);
                // SAFETY: `src` holds an initialized element and `dst` is
                // the hole left by the previous step.
                let v = unsafe { self.buf[src].assume_init_read() };
                self.buf[dst].write(v);
            }
            self.head = Self::wrap_add(self.head, 1);
        } else {
            // Slide the back segment one slot toward the front.
            for k in (index + 1)..self.len {
                let src = Self::wrap_add(self.head, k);
                let dst = Self::wrap_add(self.head, k - 1);
                // SAFETY: `src` holds an initialized element and `dst` is
                // the hole left by the previous step.
                let v = unsafe { self.buf[src].assume_init_read() };
                self.buf[dst].write(v);
            }
        }
        self.len -= 1;
        Some(value)
    }

    /// Splits the deque into two at the given index.
    ///
    /// Returns a new deque containing the elements in the range
    /// `[at, len)`. After the call, the original deque holds the elements
    /// in `[0, at)`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is greater than the deque's length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// for i in 0..4 {
    ///     deque.push_back(i).unwrap();
    /// }
    ///
    /// let tail = deque.split_off(1);
    /// assert_eq!(deque.len(), 1);
    /// assert_eq!(tail.len(), 3);
    /// assert_eq!(tail.front(), Some(&1));
    /// ```
    pub fn split_off(&mut self, at: usize) -> Self {
        assert!(
            at <= self.len,
            "split index (is {at}) should be <= len (is {})",
            self.len
        );
        let mut other = Self::new();
        let moved = self.len - at;
        for k in 0..moved {
            let src = Self::wrap_add(self.head, at + k);
            // SAFETY: `src` holds an initialized element that the source
            // deque stops tracking once `len` is cut below.
            let v = unsafe { self.buf[src].assume_init_read() };
            other.buf[k].write(v);
        }
        self.len = at;
        other.len = moved;
        other
    }

    /// Moves all elements from `other` to the back of `self`, leaving
    /// `other` empty.
    ///
    /// The transfer is all-or-nothing: if the combined length would exceed
    /// the capacity, an error is returned and both deques are unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut a: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// let mut b: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// a.push_back(1).unwrap();
    /// b.push_back(2).unwrap();
    /// b.push_back(3).unwrap();
    ///
    /// a.append(&mut b).unwrap();
    /// assert_eq!(a.len(), 3);
    /// assert!(b.is_empty());
    /// ```
    pub fn append(&mut self, other: &mut Self) -> Result<(), CapacityError> {
        if self.len + other.len > N {
            return Err(CapacityError(()));
        }
        for k in 0..other.len {
            let src = Self::wrap_add(other.head, k);
            let dst = Self::wrap_add(self.head, self.len + k);
            // SAFETY: `src` holds an initialized element that `other` stops
            // tracking once its `len` is zeroed below, and `dst` is an
            // unused slot of `self`.
            let v = unsafe { other.buf[src].assume_init_read() };
            self.buf[dst].write(v);
        }
        self.len += other.len;
        other.len = 0;
        other.head = 0;
        Ok(())
    }

    /// Removes the elements in the given range and returns an iterator over
    /// them, front to back.
    ///
    /// Elements in the range that the iterator does not yield are still
    /// removed when it is dropped. The elements after the range keep their
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or its end is past the deque's
    /// length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 8> = ArrayDeque::new();
    /// for i in 0..6 {
    ///     deque.push_back(i).unwrap();
    /// }
    ///
    /// let removed: Vec<i32> = deque.drain(1..4).collect();
    /// assert_eq!(removed, vec![1, 2, 3]);
    /// assert_eq!(deque.len(), 3);
    /// assert_eq!(deque.get(1), Some(&4));
    /// ```
    pub fn drain<R>(&mut self, range: R) -> Drain<'_, T, N>
    where
        R: RangeBounds<usize>,
    {
        let len = self.len;
        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&n) => n + 1,
            Bound::Excluded(&n) => n,
            Bound::Unbounded => len,
        };
        assert!(
            start <= end,
            "drain start (is {start}) should be <= end (is {end})"
        );
        assert!(end <= len, "drain end (is {end}) should be <= len (is {len})");
        // Pretend the deque ends at the range start. If the iterator leaks,
        // the range and the tail leak with it instead of being double-used.
        self.len = start;
        Drain {
            deque: self,
            pos: start,
            end,
            tail_len: len - end,
        }
    }

    /// Returns an iterator over the elements, front to back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// deque.push_back(1).unwrap();
    /// deque.push_back(2).unwrap();
    ///
    /// let sum: i32 = deque.iter().sum();
    /// assert_eq!(sum, 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        let (a, b) = self.as_slices();
        Iter {
            inner: a.iter().chain(b.iter()),
        }
    }

    /// Returns an iterator over mutable references to the elements, front
    /// to back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::ArrayDeque;
    ///
    /// let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
    /// deque.push_back(1).unwrap();
    /// deque.push_back(2).unwrap();
    ///
    /// for value in deque.iter_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(deque.front(), Some(&10));
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (a, b) = self.as_mut_slices();
        IterMut {
            inner: a.iter_mut().chain(b.iter_mut()),
        }
    }

    /// The occupied region as one or two contiguous slices, front segment
    /// first.
    fn as_slices(&self) -> (&[T], &[T]) {
        let ptr = self.buf.as_ptr().cast::<T>();
        if self.head + self.len <= N {
            // SAFETY: The elements at `head..head + len` are initialized
            // and the region does not wrap.
            unsafe { (slice::from_raw_parts(ptr.add(self.head), self.len), &[]) }
        } else {
            let first = N - self.head;
            // SAFETY: The occupied region wraps: `head..N` and
            // `0..len - first` both hold initialized elements.
            unsafe {
                (
                    slice::from_raw_parts(ptr.add(self.head), first),
                    slice::from_raw_parts(ptr, self.len - first),
                )
            }
        }
    }

    fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let ptr = self.buf.as_mut_ptr().cast::<T>();
        if self.head + self.len <= N {
            // SAFETY: The elements at `head..head + len` are initialized
            // and the region does not wrap.
            unsafe {
                (
                    slice::from_raw_parts_mut(ptr.add(self.head), self.len),
                    &mut [],
                )
            }
        } else {
            let first = N - self.head;
            // SAFETY: The two regions hold initialized elements and are
            // disjoint, so handing out both mutably is sound.
            unsafe {
                (
                    slice::from_raw_parts_mut(ptr.add(self.head), first),
                    slice::from_raw_parts_mut(ptr, self.len - first),
                )
            }
        }
    }

    /// Callers keep `index` below `N` and `delta` at most `N`, so one
    /// conditional subtract is enough even when `N` is not a power of two.
    #[inline(always)]
    fn wrap_add(index: usize, delta: usize) -> usize {
        let sum = index + delta;
        if sum >= N { sum - N } else { sum }
    }

    #[inline(always)]
    fn wrap_sub(index: usize, delta: usize) -> usize {
        if index >= delta {
            index - delta
        } else {
            index + N - delta
        }
    }
}

impl<T, const N: usize> Default for ArrayDeque<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for ArrayDeque<T, N> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, const N: usize> Debug for ArrayDeque<T, N>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, const N: usize> PartialEq for ArrayDeque<T, N>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, const N: usize> Eq for ArrayDeque<T, N> where T: Eq {}

impl<T, const N: usize> Clone for ArrayDeque<T, N>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let mut new = Self::new();
        for value in self.iter() {
            if new.push_back(value.clone()).is_err() {
                unreachable!();
            }
        }
        new
    }
}

impl<T, const N: usize> IntoIterator for ArrayDeque<T, N> {
    type IntoIter = IntoIter<T, N>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { deque: self }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a ArrayDeque<T, N> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut ArrayDeque<T, N> {
    type IntoIter = IterMut<'a, T>;
    type Item = &'a mut T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An iterator over the elements of an [`ArrayDeque`].
pub struct Iter<'a, T> {
    inner: core::iter::Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A mutable iterator over the elements of an [`ArrayDeque`].
pub struct IterMut<'a, T> {
    inner: core::iter::Chain<slice::IterMut<'a, T>, slice::IterMut<'a, T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// A consuming iterator over the elements of an [`ArrayDeque`], front to
/// back.
pub struct IntoIter<T, const N: usize> {
    deque: ArrayDeque<T, N>,
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.deque.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len, Some(self.deque.len))
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

/// A draining iterator over a range of an [`ArrayDeque`].
///
/// Dropping the iterator removes and drops the unread part of the range,
/// then closes the gap.
pub struct Drain<'a, T, const N: usize> {
    deque: &'a mut ArrayDeque<T, N>,
    pos: usize,
    end: usize,
    tail_len: usize,
}

impl<T, const N: usize> Iterator for Drain<'_, T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == self.end {
            return None;
        }
        let phys = ArrayDeque::<T, N>::wrap_add(self.deque.head, self.pos);
        self.pos += 1;
        // SAFETY: Positions up to `end` held initialized elements when the
        // drain started, and each is read exactly once.
        Some(unsafe { self.deque.buf[phys].assume_init_read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.pos;
        (remaining, Some(remaining))
    }
}

impl<T, const N: usize> ExactSizeIterator for Drain<'_, T, N> {}

impl<T, const N: usize> Drop for Drain<'_, T, N> {
    fn drop(&mut self) {
        // Drop whatever the caller did not consume.
        while self.pos < self.end {
            let phys = ArrayDeque::<T, N>::wrap_add(self.deque.head, self.pos);
            self.pos += 1;
            // SAFETY: Positions `pos..end` hold initialized elements that
            // were never yielded.
            unsafe { self.deque.buf[phys].assume_init_drop() };
        }
        // Slide the elements after the range into the gap. The deque's
        // length was cut to the range start when the drain was created.
        let start = self.deque.len;
        for k in 0..self.tail_len {
            let src = ArrayDeque::<T, N>::wrap_add(self.deque.head, self.end + k);
            let dst = ArrayDeque::<T, N>::wrap_add(self.deque.head, start + k);
            // SAFETY: `src` holds an initialized element past the drained
            // range, and `dst` is inside the vacated gap.
            let v = unsafe { self.deque.buf[src].assume_init_read() };
            self.deque.buf[dst].write(v);
        }
        self.deque.len = start + self.tail_len;
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use super::*;

    /// Bumps the shared counter when dropped.
    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn tracked_pair() -> (Rc<Cell<usize>>, impl Fn() -> Tracked) {
        let drops = Rc::new(Cell::new(0));
        let handle = Rc::clone(&drops);
        (drops, move || Tracked(Rc::clone(&handle)))
    }

    #[test]
    fn new_is_empty() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        assert_eq!(deque.len(), 0);
        assert_eq!(deque.capacity(), 4);
        assert!(deque.is_empty());
        assert!(!deque.is_full());
        assert_eq!(deque.front(), None);
        assert_eq!(deque.back(), None);
        assert_eq!(deque.pop_front(), None);
        assert_eq!(deque.pop_back(), None);
    }

    #[test]
    fn push_back_until_full() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        for i in 0..4 {
            assert!(deque.push_back(i).is_ok());
        }
        assert!(deque.is_full());

        let err = deque.push_back(99).unwrap_err();
        assert_eq!(err.into_element(), 99);
        assert_eq!(deque.len(), 4);
        assert_eq!(deque.front(), Some(&0));
        assert_eq!(deque.back(), Some(&3));
    }

    #[test]
    fn push_front_until_full() {
        let mut deque: ArrayDeque<i32, 3> = ArrayDeque::new();
        for i in 0..3 {
            assert!(deque.push_front(i).is_ok());
        }
        assert!(deque.is_full());

        let err = deque.push_front(99).unwrap_err();
        assert_eq!(err.into_element(), 99);

        assert_eq!(deque.pop_front(), Some(2));
        assert_eq!(deque.pop_front(), Some(1));
        assert_eq!(deque.pop_front(), Some(0));
    }

    #[test]
    fn push_pop_both_ends() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        deque.push_back(1).unwrap();
        deque.push_front(0).unwrap();
        deque.push_back(2).unwrap();

        assert_eq!(deque.pop_back(), Some(2));
        assert_eq!(deque.pop_front(), Some(0));
        assert_eq!(deque.pop_back(), Some(1));
        assert!(deque.is_empty());
    }

    #[test]
    fn wraparound_keeps_fifo_order() {
        let mut deque: ArrayDeque<usize, 4> = ArrayDeque::new();
        let mut next_in = 0;
        let mut next_out = 0;

        // The head walks the whole buffer many times over.
        for _ in 0..100 {
            while !deque.is_full() {
                deque.push_back(next_in).unwrap();
                next_in += 1;
            }
            for _ in 0..2 {
                assert_eq!(deque.pop_front(), Some(next_out));
                next_out += 1;
            }
        }
        assert_eq!(deque.len(), 2);
    }

    #[test]
    fn get_and_mutate() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        deque.push_back(10).unwrap();
        deque.push_back(20).unwrap();
        deque.push_back(30).unwrap();

        assert_eq!(deque.get(0), Some(&10));
        assert_eq!(deque.get(2), Some(&30));
        assert_eq!(deque.get(3), None);

        *deque.get_mut(1).unwrap() = 21;
        *deque.front_mut().unwrap() = 11;
        *deque.back_mut().unwrap() = 31;

        assert_eq!(deque.get(0), Some(&11));
        assert_eq!(deque.get(1), Some(&21));
        assert_eq!(deque.get(2), Some(&31));
    }

    #[test]
    fn insert_at_every_position() {
        // Repeat with a shifted head so both shift directions run against
        // a wrapped buffer.
        for rotation in 0..5 {
            for at in 0..=3 {
                let mut deque: ArrayDeque<i32, 8> = ArrayDeque::new();
                for _ in 0..rotation {
                    deque.push_back(-1).unwrap();
                    deque.pop_front();
                }
                for i in 0..3 {
                    deque.push_back(i).unwrap();
                }

                deque.insert(at, 99).unwrap();

                let mut expected: Vec<i32> = (0..3).collect();
                expected.insert(at, 99);
                let got: Vec<i32> = deque.iter().copied().collect();
                assert_eq!(got, expected, "rotation {rotation}, insert at {at}");
            }
        }
    }

    #[test]
    fn insert_into_full_deque_fails() {
        let mut deque: ArrayDeque<i32, 2> = ArrayDeque::new();
        deque.push_back(1).unwrap();
        deque.push_back(2).unwrap();

        let err = deque.insert(1, 99).unwrap_err();
        assert_eq!(err.into_element(), 99);
        assert_eq!(deque.len(), 2);
    }

    #[test]
    #[should_panic(expected = "insertion index")]
    fn insert_past_len_panics() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        deque.push_back(1).unwrap();
        let _ = deque.insert(2, 99);
    }

    #[test]
    fn remove_at_every_position() {
        for rotation in 0..5 {
            for at in 0..4 {
                let mut deque: ArrayDeque<i32, 8> = ArrayDeque::new();
                for _ in 0..rotation {
                    deque.push_back(-1).unwrap();
                    deque.pop_front();
                }
                for i in 0..4 {
                    deque.push_back(i).unwrap();
                }

                assert_eq!(deque.remove(at), Some(at as i32));

                let mut expected: Vec<i32> = (0..4).collect();
                expected.remove(at);
                let got: Vec<i32> = deque.iter().copied().collect();
                assert_eq!(got, expected, "rotation {rotation}, remove at {at}");
            }
        }
    }

    #[test]
    fn remove_out_of_bounds_is_none() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        deque.push_back(1).unwrap();
        assert_eq!(deque.remove(1), None);
        assert_eq!(deque.len(), 1);
    }

    #[test]
    fn split_off_moves_tail() {
        let mut deque: ArrayDeque<i32, 6> = ArrayDeque::new();
        // Wrap the buffer first.
        for _ in 0..4 {
            deque.push_back(-1).unwrap();
            deque.pop_front();
        }
        for i in 0..5 {
            deque.push_back(i).unwrap();
        }

        let tail = deque.split_off(2);
        assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(tail.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);

        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        deque.push_back(7).unwrap();
        let all = deque.split_off(0);
        assert!(deque.is_empty());
        assert_eq!(all.len(), 1);

        let none = deque.split_off(0);
        assert!(none.is_empty());
    }

    #[test]
    #[should_panic(expected = "split index")]
    fn split_off_past_len_panics() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        let _ = deque.split_off(1);
    }

    #[test]
    fn append_moves_everything_or_nothing() {
        let mut a: ArrayDeque<i32, 4> = ArrayDeque::new();
        let mut b: ArrayDeque<i32, 4> = ArrayDeque::new();
        a.push_back(0).unwrap();
        b.push_back(1).unwrap();
        b.push_back(2).unwrap();

        a.append(&mut b).unwrap();
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(b.is_empty());

        // Overfull transfer leaves both sides untouched.
        let mut c: ArrayDeque<i32, 4> = ArrayDeque::new();
        c.push_back(10).unwrap();
        c.push_back(11).unwrap();
        assert!(a.append(&mut c).is_err());
        assert_eq!(a.len(), 3);
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), vec![10, 11]);
    }

    #[test]
    fn drain_range_removes_and_yields() {
        let mut deque: ArrayDeque<i32, 8> = ArrayDeque::new();
        // Wrap the buffer first.
        for _ in 0..6 {
            deque.push_back(-1).unwrap();
            deque.pop_front();
        }
        for i in 0..6 {
            deque.push_back(i).unwrap();
        }

        let removed: Vec<i32> = deque.drain(1..4).collect();
        assert_eq!(removed, vec![1, 2, 3]);
        assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![0, 4, 5]);

        let rest: Vec<i32> = deque.drain(..).collect();
        assert_eq!(rest, vec![0, 4, 5]);
        assert!(deque.is_empty());
    }

    #[test]
    fn dropped_drain_still_removes_range() {
        let (drops, tracked) = tracked_pair();
        let mut deque: ArrayDeque<Tracked, 8> = ArrayDeque::new();
        for _ in 0..5 {
            deque.push_back(tracked()).unwrap();
        }

        {
            let mut drain = deque.drain(1..4);
            let first = drain.next();
            assert_eq!(drops.get(), 0);
            drop(first);
            assert_eq!(drops.get(), 1);
        }
        // The two unread elements of the range were dropped with the drain.
        assert_eq!(drops.get(), 3);
        assert_eq!(deque.len(), 2);

        deque.clear();
        assert_eq!(drops.get(), 5);
    }

    #[test]
    #[should_panic(expected = "drain end")]
    fn drain_past_len_panics() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        deque.push_back(1).unwrap();
        let _ = deque.drain(0..2);
    }

    #[test]
    fn clear_and_drop_release_elements() {
        let (drops, tracked) = tracked_pair();
        {
            let mut deque: ArrayDeque<Tracked, 4> = ArrayDeque::new();
            deque.push_back(tracked()).unwrap();
            deque.push_back(tracked()).unwrap();
            deque.clear();
            assert_eq!(drops.get(), 2);
            assert!(deque.is_empty());

            deque.push_back(tracked()).unwrap();
            deque.push_back(tracked()).unwrap();
        }
        // The remaining two went down with the deque itself.
        assert_eq!(drops.get(), 4);
    }

    #[test]
    fn into_iter_yields_front_to_back() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        deque.push_back(1).unwrap();
        deque.push_back(2).unwrap();
        deque.push_front(0).unwrap();

        let values: Vec<i32> = deque.into_iter().collect();
        assert_eq!(values, vec![0, 1, 2]);
    }

    #[test]
    fn partially_consumed_into_iter_drops_rest() {
        let (drops, tracked) = tracked_pair();
        let mut deque: ArrayDeque<Tracked, 4> = ArrayDeque::new();
        for _ in 0..3 {
            deque.push_back(tracked()).unwrap();
        }

        let mut iter = deque.into_iter();
        drop(iter.next());
        assert_eq!(drops.get(), 1);
        drop(iter);
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn iter_over_wrapped_buffer() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        for i in 0..4 {
            deque.push_back(i).unwrap();
        }
        deque.pop_front();
        deque.pop_front();
        deque.push_back(4).unwrap();
        deque.push_back(5).unwrap();

        assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        assert_eq!(deque.iter().len(), 4);

        for value in deque.iter_mut() {
            *value *= 10;
        }
        assert_eq!(
            deque.iter().copied().collect::<Vec<_>>(),
            vec![20, 30, 40, 50]
        );
    }

    #[test]
    fn equality_ignores_buffer_position() {
        let mut a: ArrayDeque<i32, 4> = ArrayDeque::new();
        let mut b: ArrayDeque<i32, 4> = ArrayDeque::new();

        for i in 0..3 {
            a.push_back(i).unwrap();
        }
        // Same logical content, different head position.
        for _ in 0..3 {
            b.push_back(-1).unwrap();
            b.pop_front();
        }
        for i in 0..3 {
            b.push_back(i).unwrap();
        }
        assert_eq!(a, b);

        b.pop_back();
        assert_ne!(a, b);
    }

    #[test]
    fn clone_is_independent() {
        let mut deque: ArrayDeque<i32, 4> = ArrayDeque::new();
        deque.push_back(1).unwrap();
        deque.push_back(2).unwrap();

        let mut copy = deque.clone();
        assert_eq!(deque, copy);

        copy.push_back(3).unwrap();
        assert_ne!(deque, copy);
        assert_eq!(deque.len(), 2);
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut deque: ArrayDeque<i32, 0> = ArrayDeque::new();
        assert!(deque.is_empty());
        assert!(deque.is_full());
        assert!(deque.push_back(1).is_err());
        assert!(deque.push_front(1).is_err());
        assert_eq!(deque.pop_front(), None);
    }

    #[test]
    fn debug_renders_contents() {
        let mut deque: ArrayDeque<i32, 2> = ArrayDeque::new();
        deque.push_back(1).unwrap();
        deque.push_back(2).unwrap();
        assert_eq!(format!("{deque:?}"), "[1, 2]");

        let full = deque.push_back(9).unwrap_err();
        assert_eq!(format!("{full:?}"), "CapacityError: insufficient capacity");
    }

    #[test]
    fn tracks_vec_deque_model() {
        use alloc::collections::VecDeque;
        use rand::TryRngCore;
        use rand::rngs::OsRng;

        let mut rng = OsRng;
        let mut deque: ArrayDeque<u32, 8> = ArrayDeque::new();
        let mut model: VecDeque<u32> = VecDeque::new();

        for _ in 0..2000 {
            let roll = rng.try_next_u64().unwrap();
            let value = (roll >> 32) as u32;
            match roll % 6 {
                0 => match deque.push_front(value) {
                    Ok(()) => model.push_front(value),
                    Err(CapacityError(rejected)) => {
                        assert_eq!(rejected, value);
                        assert_eq!(model.len(), 8);
                    }
                },
                1 => match deque.push_back(value) {
                    Ok(()) => model.push_back(value),
                    Err(CapacityError(rejected)) => {
                        assert_eq!(rejected, value);
                        assert_eq!(model.len(), 8);
                    }
                },
                2 => assert_eq!(deque.pop_front(), model.pop_front()),
                3 => assert_eq!(deque.pop_back(), model.pop_back()),
                4 => {
                    let index = (roll >> 8) as usize % (deque.len() + 1);
                    match deque.insert(index, value) {
                        Ok(()) => model.insert(index, value),
                        Err(CapacityError(rejected)) => {
                            assert_eq!(rejected, value);
                            assert_eq!(model.len(), 8);
                        }
                    }
                }
                _ => {
                    if deque.is_empty() {
                        assert_eq!(deque.remove(0), None);
                    } else {
                        let index = (roll >> 8) as usize % deque.len();
                        assert_eq!(deque.remove(index), model.remove(index));
                    }
                }
            }
            assert_eq!(deque.len(), model.len());
            assert_eq!(deque.front(), model.front());
            assert_eq!(deque.back(), model.back());
            assert!(deque.iter().eq(model.iter()));
        }
    }
}
