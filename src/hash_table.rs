use alloc::boxed::Box;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;

/// Number of low hash bits folded into the metadata word as a fingerprint.
const FINGERPRINT_BITS: u32 = 8;

const FINGERPRINT_MASK: u32 = (1 << FINGERPRINT_BITS) - 1;

/// One probe step. Probe distance lives in the high bits of the metadata
/// word so that distance-then-fingerprint compares as a single integer.
const DISTANCE_UNIT: u32 = 1 << FINGERPRINT_BITS;

/// Largest probe distance a bucket may record. Probe cursors may go one
/// past this while deciding a miss, which still fits the word.
const MAX_PROBE_DISTANCE: u32 = (1 << (32 - FINGERPRINT_BITS)) - 2;

/// Metadata words at or above this value cannot take another probe step.
const META_LIMIT: u32 = MAX_PROBE_DISTANCE << FINGERPRINT_BITS;

/// Probe run lengths are bounded by the entry count, so tables smaller than
/// this can never exhaust the distance field and skip the overflow scan.
const PROBE_RISK_LEN: usize = (MAX_PROBE_DISTANCE - 2) as usize;

/// Entry indices are stored as `u32`, which caps the number of live entries.
const MAX_ENTRIES: usize = u32::MAX as usize;

/// Smallest bucket table handed out for explicit capacity requests.
const MIN_BUCKETS: usize = 4;

/// Bucket count used when the first insert grows an unallocated table.
const FIRST_BUCKETS: usize = 8;

/// Maximum number of entries a bucket table of the given size may hold
/// before a resize is forced.
#[inline(always)]
fn load_limit(bucket_count: usize) -> usize {
    ((bucket_count as u128 * 4) / 5) as usize
}

/// Initial metadata word for a hash: distance one, plus the fingerprint
/// taken from the low hash bits. Zero is reserved for empty buckets, so a
/// freshly homed entry always compares above them.
#[inline(always)]
fn probe_meta(hash: u64) -> u32 {
    DISTANCE_UNIT | (hash as u32 & FINGERPRINT_MASK)
}

/// One slot of the bucket table.
///
/// `meta` packs `(probe_distance << 8) | fingerprint`; an all-zero word
/// marks the bucket empty. `index` points into the dense entry store and is
/// only meaningful while `meta` is non-zero.
#[derive(Clone, Copy)]
struct Bucket {
    meta: u32,
    index: u32,
}

impl Bucket {
    const EMPTY: Bucket = Bucket { meta: 0, index: 0 };
}

/// The error type for [`try_reserve`] methods.
///
/// [`try_reserve`]: HashTable::try_reserve
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TryReserveError {
    /// The computed capacity exceeded the collection's maximum: either an
    /// arithmetic overflow while sizing, or more entries than the dense
    /// index width can address.
    CapacityOverflow,
    /// The allocator returned an error. The layout of the allocation that
    /// failed is carried for diagnostics.
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },
}

impl core::fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TryReserveError::CapacityOverflow => f.write_str(
                "memory allocation failed because the computed capacity exceeded \
                 the collection's maximum",
            ),
            TryReserveError::AllocError { .. } => f.write_str(
                "memory allocation failed because the memory allocator returned an error",
            ),
        }
    }
}

impl core::error::Error for TryReserveError {}

#[cold]
#[inline(never)]
fn infallible_failure(err: TryReserveError) -> ! {
    match err {
        TryReserveError::CapacityOverflow => panic!("capacity overflow"),
        TryReserveError::AllocError { layout } => alloc::alloc::handle_alloc_error(layout),
    }
}

/// Allocates a zeroed bucket table. All-zero bytes are a valid `Bucket`
/// bit pattern (an empty one), so no further initialization is needed.
fn alloc_buckets(bucket_count: usize) -> Result<Box<[Bucket]>, TryReserveError> {
    debug_assert!(bucket_count > 0);
    let layout = Layout::array::<Bucket>(bucket_count)
        .map_err(|_| TryReserveError::CapacityOverflow)?;
    // SAFETY: We have ensured that `bucket_count` is non-zero, so the layout
    // has a non-zero size.
    let ptr = unsafe { alloc::alloc::alloc_zeroed(layout) };
    if ptr.is_null() {
        return Err(TryReserveError::AllocError { layout });
    }
    let slice = core::ptr::slice_from_raw_parts_mut(ptr.cast::<Bucket>(), bucket_count);
    // SAFETY: The allocation succeeded with the exact layout of
    // `[Bucket; bucket_count]`, which is the layout `Box<[Bucket]>` frees
    // with, and the zeroed memory is fully initialized as empty buckets.
    Ok(unsafe { Box::from_raw(slice) })
}

/// Smallest power-of-two bucket count whose load limit covers `target`
/// entries.
fn bucket_count_for(target: usize) -> Result<usize, TryReserveError> {
    let mut count = target
        .checked_mul(5)
        .and_then(|scaled| (scaled / 4).checked_next_power_of_two())
        .ok_or(TryReserveError::CapacityOverflow)?
        .max(MIN_BUCKETS);
    while load_limit(count) < target {
        count = count
            .checked_mul(2)
            .ok_or(TryReserveError::CapacityOverflow)?;
    }
    Ok(count)
}

enum RebuildError {
    /// A probe run in the new table exhausted the distance field; the caller
    /// retries with a larger table.
    Saturated,
    Fail(TryReserveError),
}

/// Result of walking a probe sequence.
enum Probe {
    /// The bucket at this position matched hash metadata and equality.
    Occupied(usize),
    /// The walk hit a bucket whose resident compares below the probe word
    /// (or an empty bucket); an insert would displace from here.
    Vacant { pos: usize, meta: u32 },
}

/// Low-level performance statistics for a [`HashTable`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, Copy)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Maximum load capacity before resize
    pub capacity: usize,
    /// Number of buckets allocated
    pub bucket_count: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest probe distance of any resident entry
    pub max_probe_distance: usize,
    /// Mean probe distance over all resident entries
    pub mean_probe_distance: f64,
    /// Total memory in bytes used by the table
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!("Buckets: {}", self.bucket_count);
        println!(
            "Probe Distance: max {} mean {:.2}",
            self.max_probe_distance, self.mean_probe_distance
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// A hash table using Robin Hood hashing with backward-shift deletion.
///
/// `HashTable<V>` stores values of type `V` and provides fast insertion,
/// lookup, and removal operations. Unlike standard hash maps, this
/// implementation requires you to provide the hash value, an equality
/// predicate, and (for operations that may move entries) a hash function
/// for each call.
///
/// The table keeps two allocations: a power-of-two array of 8-byte bucket
/// words, and a dense array of values with no holes. Buckets pack the probe
/// distance and an 8-bit hash fingerprint into a single word, so a probe
/// walks metadata only and touches a value just to confirm equality.
/// Removal shifts the remainder of the probe run back one slot instead of
/// leaving tombstones, and the dense store fills the gap with its last
/// value, so neither array ever fragments.
///
/// ## Performance Characteristics
///
/// - **Memory**: 10 bytes per entry of bucket overhead at the default load
///   factor, plus the size of `V`.
/// - **Iteration**: walks the dense value array directly, independent of
///   the bucket table size.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use rh_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_capacity(100);
/// let hash = hash_id(123);
///
/// // Insert a person
/// match table.entry(hash, |p: &Person| p.id == 123, |p| hash_id(p.id)) {
///     rh_hash::hash_table::Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     rh_hash::hash_table::Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Box<[Bucket]>,
    entries: Vec<V>,
    // Bucket count is `1 << (64 - shift)`; 64 marks an unallocated table.
    shift: u32,
    limit: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("len", &self.entries.len())
            .field("capacity", &self.limit)
            .field(
                "buckets",
                &self
                    .buckets
                    .iter()
                    .map(|b| {
                        if b.meta == 0 {
                            ".".to_string()
                        } else {
                            format!(
                                "d{}|{:02x}->{}",
                                b.meta >> FINGERPRINT_BITS,
                                b.meta & FINGERPRINT_MASK,
                                b.index
                            )
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates a new, empty hash table.
    ///
    /// No memory is allocated until the first insert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use rh_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            buckets: Box::default(),
            entries: Vec::new(),
            shift: 64,
            limit: 0,
        }
    }

    /// Creates a new hash table with the specified capacity.
    ///
    /// The actual capacity may be larger than requested because the bucket
    /// table is sized in powers of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use rh_hash::hash_table::HashTable;
    /// #
    /// // Create a table that can hold at least 100 items without resizing
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let mut table = Self::new();
        if capacity > 0 {
            if let Err(err) = table.grow_empty(capacity) {
                infallible_failure(err);
            }
            table.entries = Vec::with_capacity(capacity);
        }
        table
    }

    /// Returns the number of elements in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// assert_eq!(table.len(), 0);
    ///
    /// table
    ///     .entry(hash_u64(1), |&n: &u64| n == 1, |&n| hash_u64(n))
    ///     .or_insert(1);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table contains no elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use rh_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<i32> = HashTable::with_capacity(10);
    /// assert!(table.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current capacity of the table.
    ///
    /// The capacity is the number of elements the table can hold before the
    /// bucket table resizes, which is below the bucket count by the target
    /// load factor of 80%.
    pub fn capacity(&self) -> usize {
        self.limit
    }

    /// Removes all elements from the table.
    ///
    /// This operation preserves the table's allocated capacity. All values
    /// are properly dropped if they implement `Drop`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_u64(1), |&n: &u64| n == 1, |&n| hash_u64(n))
    ///     .or_insert(1);
    /// table
    ///     .entry(hash_u64(2), |&n: &u64| n == 2, |&n| hash_u64(n))
    ///     .or_insert(2);
    /// assert_eq!(table.len(), 2);
    ///
    /// table.clear();
    /// assert_eq!(table.len(), 0);
    /// assert!(table.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.fill(Bucket::EMPTY);
    }

    /// Returns a reference to the value matching the given hash and
    /// equality predicate, or `None` if no such value is present.
    ///
    /// The probe stops at the first bucket whose resident sits closer to
    /// its home than the probe has walked, so misses are detected without
    /// scanning a whole collision run.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_u64(42), |&n: &u64| n == 42, |&n| hash_u64(n))
    ///     .or_insert(42);
    ///
    /// assert_eq!(table.find(hash_u64(42), |&n| n == 42), Some(&42));
    /// assert_eq!(table.find(hash_u64(99), |&n| n == 99), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.find_index(hash, eq)?;
        // SAFETY: `find_index` only returns indices of live dense entries.
        Some(unsafe { self.entries.get_unchecked(index) })
    }

    /// Returns a mutable reference to the value matching the given hash and
    /// equality predicate, or `None` if no such value is present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_u64(1), |&n: &u64| n == 1, |&n| hash_u64(n))
    ///     .or_insert(10);
    ///
    /// if let Some(value) = table.find_mut(hash_u64(1), |&n| n == 10) {
    ///     *value = 20;
    /// }
    /// assert_eq!(table.find(hash_u64(1), |&n| n == 20), Some(&20));
    /// ```
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_index(hash, eq)?;
        // SAFETY: `find_index` only returns indices of live dense entries.
        Some(unsafe { self.entries.get_unchecked_mut(index) })
    }

    /// Gets an entry for in-place manipulation, resizing the table first if
    /// it is at its load limit.
    ///
    /// This method returns an [`Entry`] that allows for efficient insertion
    /// or modification of values without a second probe.
    ///
    /// # Arguments
    ///
    /// * `hash` - The hash value for the entry
    /// * `eq` - A predicate function that returns `true` for matching values
    /// * `hasher` - A function that computes the hash of a stored value,
    ///   used to re-home existing entries if the call triggers a resize
    ///
    /// # Panics
    ///
    /// Panics if a resize is needed and the new allocation fails, if the
    /// table already holds the maximum number of entries, or if no table
    /// size can keep probe runs within the recordable distance (which
    /// requires on the order of 16 million values with identical hashes).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_str("hello");
    ///
    /// // Insert or update pattern
    /// match table.entry(hash, |s: &String| s == "hello", |s| hash_str(s)) {
    ///     rh_hash::hash_table::Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     rh_hash::hash_table::Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    ///
    /// // Or use the convenience method
    /// table
    ///     .entry(hash, |s: &String| s == "hello", |s| hash_str(s))
    ///     .or_insert("hello".to_string());
    /// ```
    #[inline(always)]
    pub fn entry(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Entry<'_, V> {
        if self.entries.len() >= self.limit {
            self.grow(&hasher);
        }
        let mut found = self.probe(hash, &eq);
        // Placing at this position may carry displaced residents past the
        // distance the metadata word can record. A larger table spreads the
        // run out; the probe is replayed against the rebuilt table.
        while let Probe::Vacant { pos, meta } = found {
            if self.entries.len() < PROBE_RISK_LEN
                || !self.placement_would_saturate(pos, meta)
            {
                break;
            }
            self.force_grow(&hasher);
            found = self.probe(hash, &eq);
        }
        match found {
            Probe::Occupied(pos) => Entry::Occupied(OccupiedEntry { table: self, pos }),
            Probe::Vacant { pos, meta } => Entry::Vacant(VacantEntry {
                table: self,
                pos,
                meta,
            }),
        }
    }

    /// Removes and returns a value from the table.
    ///
    /// The value is identified by its hash and an equality predicate. If
    /// the value is found, it is removed from the table and returned.
    /// Otherwise, `None` is returned.
    ///
    /// Removal shifts the rest of the probe run back one slot, so lookups
    /// never pay for past deletions. Filling the dense gap moves the last
    /// stored value, which is why a `hasher` is required.
    ///
    /// # Arguments
    ///
    /// * `hash` - The hash value of the entry to remove
    /// * `eq` - A predicate function that returns `true` for the value to
    ///   remove
    /// * `hasher` - A function that computes the hash of a stored value,
    ///   used to re-home the entry that backfills the dense store
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_u64(42), |&n: &u64| n == 42, |&n| hash_u64(n))
    ///     .or_insert(42);
    ///
    /// let removed = table.remove(hash_u64(42), |&n| n == 42, |&n| hash_u64(n));
    /// assert_eq!(removed, Some(42));
    /// assert!(table.is_empty());
    ///
    /// // Removing non-existent value returns None
    /// let not_found = table.remove(hash_u64(99), |&n| n == 99, |&n| hash_u64(n));
    /// assert_eq!(not_found, None);
    /// ```
    pub fn remove(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Option<V> {
        if self.entries.is_empty() {
            return None;
        }

        match self.probe(hash, &eq) {
            Probe::Occupied(pos) => Some(self.remove_at(pos, &hasher)),
            Probe::Vacant { .. } => None,
        }
    }

    /// Retains only the values specified by the predicate.
    ///
    /// In other words, removes all values `v` for which `f(&mut v)` returns
    /// `false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// for n in 0..8u64 {
    ///     table
    ///         .entry(hash_u64(n), |&v: &u64| v == n, |&v| hash_u64(v))
    ///         .or_insert(n);
    /// }
    ///
    /// table.retain(|&mut v| v % 2 == 0, |&v| hash_u64(v));
    /// assert_eq!(table.len(), 4);
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&mut V) -> bool, hasher: impl Fn(&V) -> u64) {
        // Walk back to front so a swap-remove only moves entries that have
        // already been visited.
        let mut i = self.entries.len();
        while i > 0 {
            i -= 1;
            if !f(&mut self.entries[i]) {
                let hash = hasher(&self.entries[i]);
                let pos = self.locate_bucket(hash, i as u32);
                self.remove_at(pos, &hasher);
            }
        }
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// The collection may reserve more space to speculatively avoid
    /// frequent reallocations. After calling `reserve`, capacity will be
    /// greater than or equal to `self.len() + additional`. Does nothing if
    /// capacity is already sufficient.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the maximum entry count, and
    /// aborts on allocation failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table: HashTable<u64> = HashTable::with_capacity(10);
    /// table.reserve(50, |&n| hash_u64(n));
    /// assert!(table.capacity() >= 50);
    /// ```
    pub fn reserve(&mut self, additional: usize, hasher: impl Fn(&V) -> u64) {
        if let Err(err) = self.try_reserve(additional, hasher) {
            infallible_failure(err);
        }
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// Unlike [`reserve`], allocation failure and the entry-count ceiling
    /// are reported as a [`TryReserveError`] instead of aborting, and the
    /// table is left unchanged on error. A caller that pre-reserves through
    /// this method can then insert up to the reserved capacity without any
    /// fatal allocation path.
    ///
    /// [`reserve`]: HashTable::reserve
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.try_reserve(100, |&n| hash_u64(n)).expect("out of memory");
    /// assert!(table.capacity() >= 100);
    ///
    /// let too_much = table.try_reserve(usize::MAX, |&n| hash_u64(n));
    /// assert!(too_much.is_err());
    /// ```
    pub fn try_reserve(
        &mut self,
        additional: usize,
        hasher: impl Fn(&V) -> u64,
    ) -> Result<(), TryReserveError> {
        let target = self
            .entries
            .len()
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        if target > MAX_ENTRIES {
            return Err(TryReserveError::CapacityOverflow);
        }
        if self.entries.try_reserve(additional).is_err() {
            return Err(match Layout::array::<V>(target) {
                Ok(layout) => TryReserveError::AllocError { layout },
                Err(_) => TryReserveError::CapacityOverflow,
            });
        }
        if target > self.limit {
            self.grow_for(target, &hasher)?;
        }
        Ok(())
    }

    /// Shrinks the capacity of the hash table as much as possible.
    ///
    /// This method will shrink the table's capacity to just fit the current
    /// number of elements, potentially freeing up significant amounts of
    /// memory.
    ///
    /// If the table is empty, it will be completely deallocated and reset
    /// to a zero-capacity state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table: HashTable<u64> = HashTable::with_capacity(1000);
    /// assert!(table.capacity() >= 1000);
    ///
    /// table
    ///     .entry(hash_u64(5), |&v: &u64| v == 5, |&v| hash_u64(v))
    ///     .or_insert(5);
    /// table
    ///     .entry(hash_u64(10), |&v: &u64| v == 10, |&v| hash_u64(v))
    ///     .or_insert(10);
    ///
    /// table.shrink_to_fit(|&v| hash_u64(v));
    /// assert!(table.capacity() < 1000);
    /// assert!(table.capacity() >= 2);
    /// ```
    pub fn shrink_to_fit(&mut self, hasher: impl Fn(&V) -> u64) {
        self.entries.shrink_to_fit();
        if self.entries.is_empty() {
            self.buckets = Box::default();
            self.shift = 64;
            self.limit = 0;
            return;
        }

        let mut bucket_count = match bucket_count_for(self.entries.len()) {
            Ok(count) => count,
            Err(err) => infallible_failure(err),
        };
        while bucket_count < self.buckets.len() {
            match self.rebuild(bucket_count, &hasher) {
                Ok(()) => return,
                // A probe run did not fit the smaller table; try the next
                // size up, giving up once no smaller table works.
                Err(RebuildError::Saturated) => bucket_count *= 2,
                Err(RebuildError::Fail(err)) => infallible_failure(err),
            }
        }
    }

    /// Returns an iterator over the values in the table.
    ///
    /// Values are yielded in the dense store's order: insertion order,
    /// except that removals may move the most recently stored value into
    /// the vacated position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_str("key1"), |s: &String| s == "key1", |s| hash_str(s))
    ///     .or_insert("key1".to_string());
    ///
    /// for value in table.iter() {
    ///     println!("Value: {}", value);
    /// }
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Returns an iterator over mutable references to the values in the
    /// table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_u64(1), |&(k, _): &(u64, i32)| k == 1, |&(k, _)| {
    ///         hash_u64(k)
    ///     })
    ///     .or_insert((1, 10));
    ///
    /// for (_, v) in table.iter_mut() {
    ///     *v += 1;
    /// }
    /// assert_eq!(table.find(hash_u64(1), |&(k, _)| k == 1), Some(&(1, 11)));
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            inner: self.entries.iter_mut(),
        }
    }

    /// Returns an iterator that removes and yields all values from the
    /// table.
    ///
    /// After calling `drain()`, the table will be empty but retains its
    /// allocated capacity. Dropping the iterator drops any values not yet
    /// yielded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_str("key1"), |s: &String| s == "key1", |s| hash_str(s))
    ///     .or_insert("key1".to_string());
    ///
    /// let values: Vec<String> = table.drain().collect();
    /// assert!(table.is_empty());
    /// assert_eq!(values.len(), 1);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        self.buckets.fill(Bucket::EMPTY);
        Drain {
            inner: self.entries.drain(..),
        }
    }

    /// Computes a histogram of probe distances for the current table state.
    ///
    /// Index `i` holds the number of resident entries at probe distance
    /// `i + 1`; an entry in its home bucket has distance one. The sum over
    /// all bins equals `len()`.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for bucket in self.buckets.iter() {
            if bucket.meta != 0 {
                let distance = (bucket.meta >> FINGERPRINT_BITS) as usize;
                if hist.len() < distance {
                    hist.resize(distance, 0);
                }
                hist[distance - 1] += 1;
            }
        }
        hist
    }

    /// Returns detailed performance and utilization statistics for
    /// debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let mut max_probe_distance = 0usize;
        let mut total_distance = 0usize;
        for bucket in self.buckets.iter() {
            if bucket.meta != 0 {
                let distance = (bucket.meta >> FINGERPRINT_BITS) as usize;
                max_probe_distance = max_probe_distance.max(distance);
                total_distance += distance;
            }
        }

        DebugStats {
            populated: self.entries.len(),
            capacity: self.limit,
            bucket_count: self.buckets.len(),
            load_factor: if self.limit == 0 {
                0.0
            } else {
                self.entries.len() as f64 / self.limit as f64
            },
            max_probe_distance,
            mean_probe_distance: if self.entries.is_empty() {
                0.0
            } else {
                total_distance as f64 / self.entries.len() as f64
            },
            total_bytes: self.buckets.len() * core::mem::size_of::<Bucket>()
                + self.entries.capacity() * core::mem::size_of::<V>(),
        }
    }

    #[inline(always)]
    fn home_index(&self, hash: u64) -> usize {
        debug_assert!(self.shift < 64);
        (hash >> self.shift) as usize
    }

    /// Walks the probe sequence for `hash` until it either matches a
    /// resident value or proves absence.
    ///
    /// The cursor's metadata word starts at distance one and gains one
    /// probe step per bucket. A resident word strictly below the cursor
    /// means the resident is closer to its home than we are to ours; had
    /// the probed value been inserted, it would have displaced that
    /// resident, so the walk can stop. Empty buckets are zero and stop the
    /// walk the same way.
    #[inline]
    fn probe(&self, hash: u64, eq: &impl Fn(&V) -> bool) -> Probe {
        debug_assert!(!self.buckets.is_empty());
        let mask = self.buckets.len() - 1;
        let mut pos = self.home_index(hash);
        let mut meta = probe_meta(hash);
        loop {
            // SAFETY: We have ensured `pos` starts below the bucket count
            // and is re-masked after every step.
            let bucket = unsafe { *self.buckets.get_unchecked(pos) };
            if bucket.meta == meta {
                // SAFETY: Non-empty buckets always hold an index below
                // `entries.len()`.
                if eq(unsafe { self.entries.get_unchecked(bucket.index as usize) }) {
                    return Probe::Occupied(pos);
                }
            } else if meta > bucket.meta {
                return Probe::Vacant { pos, meta };
            }
            meta += DISTANCE_UNIT;
            pos = (pos + 1) & mask;
        }
    }

    #[inline]
    fn find_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        match self.probe(hash, &eq) {
            Probe::Occupied(pos) => {
                // SAFETY: `probe` only returns in-bounds positions.
                Some(unsafe { self.buckets.get_unchecked(pos) }.index as usize)
            }
            Probe::Vacant { .. } => None,
        }
    }

    /// Places a `(meta, index)` pair starting at `pos`, displacing any
    /// resident that sits closer to its home than the carried word.
    ///
    /// Each displaced resident becomes the new carry and continues down the
    /// run with its distance incremented, until an empty bucket absorbs the
    /// final carry. The table always has empty buckets (the load limit is
    /// below the bucket count), so the loop terminates.
    fn place(&mut self, mut pos: usize, mut meta: u32, mut index: u32) {
        let mask = self.buckets.len() - 1;
        loop {
            // SAFETY: We have ensured `pos` starts below the bucket count
            // and is re-masked after every step.
            let bucket = unsafe { self.buckets.get_unchecked_mut(pos) };
            if bucket.meta == 0 {
                *bucket = Bucket { meta, index };
                return;
            }
            if meta > bucket.meta {
                core::mem::swap(&mut meta, &mut bucket.meta);
                core::mem::swap(&mut index, &mut bucket.index);
            }
            debug_assert!(meta < META_LIMIT);
            meta += DISTANCE_UNIT;
            pos = (pos + 1) & mask;
        }
    }

    /// Dry-runs [`place`] to check whether any carried word would exhaust
    /// the distance field. Only consulted once the entry count is large
    /// enough for that to be possible at all.
    ///
    /// [`place`]: HashTable::place
    #[cold]
    #[inline(never)]
    fn placement_would_saturate(&self, mut pos: usize, mut meta: u32) -> bool {
        let mask = self.buckets.len() - 1;
        loop {
            // SAFETY: We have ensured `pos` starts below the bucket count
            // and is re-masked after every step.
            let bucket = unsafe { *self.buckets.get_unchecked(pos) };
            if bucket.meta == 0 {
                return false;
            }
            if meta > bucket.meta {
                meta = bucket.meta;
            }
            if meta >= META_LIMIT {
                return true;
            }
            meta += DISTANCE_UNIT;
            pos = (pos + 1) & mask;
        }
    }

    /// Removes the entry whose bucket is at `pos` and returns its value.
    ///
    /// The rest of the probe run shifts back one slot so that no tombstone
    /// is left behind, then the dense store swap-removes the value and the
    /// single bucket pointing at the relocated last entry is re-targeted.
    fn remove_at(&mut self, pos: usize, hasher: &impl Fn(&V) -> u64) -> V {
        let mask = self.buckets.len() - 1;
        // SAFETY: The caller passes positions returned by `probe` or
        // `locate_bucket`, which are in bounds.
        let index = unsafe { self.buckets.get_unchecked(pos) }.index as usize;

        // Pull successors back one slot with their distance decremented,
        // stopping at the first bucket that is empty or already home.
        let mut hole = pos;
        loop {
            let next = (hole + 1) & mask;
            // SAFETY: Masked index.
            let bucket = unsafe { *self.buckets.get_unchecked(next) };
            if bucket.meta < 2 * DISTANCE_UNIT {
                break;
            }
            // SAFETY: Masked index.
            unsafe {
                *self.buckets.get_unchecked_mut(hole) = Bucket {
                    meta: bucket.meta - DISTANCE_UNIT,
                    index: bucket.index,
                };
            }
            hole = next;
        }
        // SAFETY: Masked index.
        unsafe {
            *self.buckets.get_unchecked_mut(hole) = Bucket::EMPTY;
        }

        let removed = self.entries.swap_remove(index);
        let moved = self.entries.len();
        if index < moved {
            // The former last entry backfilled `index`; exactly one bucket
            // still points at its old position.
            // SAFETY: We have ensured `index < moved == entries.len()`.
            let moved_hash = hasher(unsafe { self.entries.get_unchecked(index) });
            let moved_pos = self.locate_bucket(moved_hash, moved as u32);
            // SAFETY: `locate_bucket` only returns in-bounds positions.
            unsafe {
                self.buckets.get_unchecked_mut(moved_pos).index = index as u32;
            }
        }
        removed
    }

    /// Finds the bucket holding the given dense index by walking the probe
    /// run from the entry's home bucket. The entry must be resident.
    fn locate_bucket(&self, hash: u64, index: u32) -> usize {
        let mask = self.buckets.len() - 1;
        let mut pos = self.home_index(hash);
        loop {
            // SAFETY: We have ensured `pos` starts below the bucket count
            // and is re-masked after every step.
            let bucket = unsafe { *self.buckets.get_unchecked(pos) };
            debug_assert!(bucket.meta != 0, "probe run ended before the entry's bucket");
            if bucket.meta != 0 && bucket.index == index {
                return pos;
            }
            pos = (pos + 1) & mask;
        }
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self, hasher: &impl Fn(&V) -> u64) {
        let target = match self.entries.len().checked_add(1) {
            Some(target) => target,
            None => infallible_failure(TryReserveError::CapacityOverflow),
        };
        if let Err(err) = self.grow_for(target, hasher) {
            infallible_failure(err);
        }
    }

    /// Grows past the current size after a pending placement was found to
    /// exhaust the distance field.
    #[cold]
    #[inline(never)]
    fn force_grow(&mut self, hasher: &impl Fn(&V) -> u64) {
        let target = match self.limit.checked_add(1) {
            Some(target) => target,
            None => infallible_failure(TryReserveError::CapacityOverflow),
        };
        if let Err(err) = self.grow_for(target, hasher) {
            infallible_failure(err);
        }
    }

    fn grow_for(
        &mut self,
        target: usize,
        hasher: &impl Fn(&V) -> u64,
    ) -> Result<(), TryReserveError> {
        if target > MAX_ENTRIES {
            return Err(TryReserveError::CapacityOverflow);
        }
        if target <= self.limit {
            return Ok(());
        }

        let mut bucket_count = bucket_count_for(target)?;
        if self.buckets.is_empty() {
            bucket_count = bucket_count.max(FIRST_BUCKETS);
        }
        debug_assert!(bucket_count > self.buckets.len());
        loop {
            match self.rebuild(bucket_count, hasher) {
                Ok(()) => return Ok(()),
                Err(RebuildError::Saturated) => {
                    bucket_count = bucket_count
                        .checked_mul(2)
                        .ok_or(TryReserveError::CapacityOverflow)?;
                }
                Err(RebuildError::Fail(err)) => return Err(err),
            }
        }
    }

    /// Sizes the bucket table for `target` entries without rehashing. Only
    /// valid while the table holds no entries.
    fn grow_empty(&mut self, target: usize) -> Result<(), TryReserveError> {
        debug_assert!(self.entries.is_empty());
        if target > MAX_ENTRIES {
            return Err(TryReserveError::CapacityOverflow);
        }
        let bucket_count = bucket_count_for(target)?;
        self.buckets = alloc_buckets(bucket_count)?;
        self.shift = 64 - bucket_count.trailing_zeros();
        self.limit = load_limit(bucket_count).min(MAX_ENTRIES);
        Ok(())
    }

    /// Rebuilds the bucket table at the given size by re-inserting every
    /// dense entry in order. Dense indices are untouched, so the entry
    /// store needs no work. `self` is only modified after the whole new
    /// table has been built, making a failed rebuild observable-free.
    fn rebuild(
        &mut self,
        bucket_count: usize,
        hasher: &impl Fn(&V) -> u64,
    ) -> Result<(), RebuildError> {
        debug_assert!(bucket_count.is_power_of_two());
        debug_assert!(load_limit(bucket_count) >= self.entries.len());

        let mut buckets = alloc_buckets(bucket_count).map_err(RebuildError::Fail)?;
        let shift = 64 - bucket_count.trailing_zeros();
        let mask = bucket_count - 1;

        for (index, value) in self.entries.iter().enumerate() {
            let hash = hasher(value);
            let mut pos = (hash >> shift) as usize;
            let mut meta = probe_meta(hash);
            let mut index = index as u32;
            loop {
                // SAFETY: We have ensured `pos` starts below `bucket_count`
                // and is re-masked after every step.
                let bucket = unsafe { buckets.get_unchecked_mut(pos) };
                if bucket.meta == 0 {
                    *bucket = Bucket { meta, index };
                    break;
                }
                if meta > bucket.meta {
                    core::mem::swap(&mut meta, &mut bucket.meta);
                    core::mem::swap(&mut index, &mut bucket.index);
                }
                if meta >= META_LIMIT {
                    return Err(RebuildError::Saturated);
                }
                meta += DISTANCE_UNIT;
                pos = (pos + 1) & mask;
            }
        }

        self.buckets = buckets;
        self.shift = shift;
        self.limit = load_limit(bucket_count).min(MAX_ENTRIES);
        Ok(())
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut HashTable<V> {
    type IntoIter = IterMut<'a, V>;
    type Item = &'a mut V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the table, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - the value is not present in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - the value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    ///
    /// If the entry is occupied, returns a mutable reference to the
    /// existing value. This method provides a convenient way to implement
    /// "insert or get" semantics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_str("key");
    ///
    /// // Insert if not present
    /// let value = table
    ///     .entry(hash, |s: &String| s == "key", |s| hash_str(s))
    ///     .or_insert("key".to_string());
    /// assert_eq!(value, "key");
    ///
    /// // Get existing value
    /// let existing = table
    ///     .entry(hash, |s: &String| s == "key", |s| hash_str(s))
    ///     .or_insert("other".to_string());
    /// assert_eq!(existing, "key");
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    ///
    /// If the entry is occupied, returns a mutable reference to the
    /// existing value without calling the closure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_str("key");
    ///
    /// // Insert with computed value
    /// let value = table
    ///     .entry(hash, |s: &String| s == "key", |s| hash_str(s))
    ///     .or_insert_with(|| "key".to_string());
    /// assert_eq!(value, "key");
    ///
    /// // Get existing value (closure is not called)
    /// let existing = table
    ///     .entry(hash, |s: &String| s == "key", |s| hash_str(s))
    ///     .or_insert_with(|| panic!("Should not be called"));
    /// assert_eq!(existing, "key");
    /// ```
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the table.
    ///
    /// If the entry is occupied, applies the provided closure to the
    /// existing value and returns a mutable reference to it. If the entry
    /// is vacant, returns `None` without inserting anything.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_u64(42);
    ///
    /// // Entry doesn't exist, so and_modify returns None
    /// let result = table
    ///     .entry(hash, |&n: &u64| n == 42, |&n| hash_u64(n))
    ///     .and_modify(|v| *v += 1);
    /// assert_eq!(result, None);
    ///
    /// // Insert a value
    /// table
    ///     .entry(hash, |&n: &u64| n == 42, |&n| hash_u64(n))
    ///     .or_insert(42);
    ///
    /// // Now modify the existing value
    /// let result = table
    ///     .entry(hash, |&n: &u64| n == 42, |&n| hash_u64(n))
    ///     .and_modify(|v| *v += 1);
    /// assert_eq!(result, Some(&mut 43));
    /// ```
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts the default value if the entry is vacant and returns a
    /// mutable reference.
    ///
    /// This method requires that `V` implements the `Default` trait.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::hash_table::HashTable;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table: HashTable<Vec<i32>> = HashTable::with_capacity(10);
    /// let hash = hash_str("key");
    ///
    /// // Insert default value (empty Vec)
    /// let vec_ref = table
    ///     .entry(hash, |v: &Vec<i32>| v.is_empty(), |_| hash_str("key"))
    ///     .or_default();
    /// vec_ref.push(1);
    /// vec_ref.push(2);
    ///
    /// assert_eq!(
    ///     table.find(hash, |v: &Vec<i32>| !v.is_empty()),
    ///     Some(&vec![1, 2])
    /// );
    /// ```
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the hash table.
///
/// This struct is created by the [`entry`] method on [`HashTable`] when the
/// probed value is not present. It records where the probe stopped, so the
/// insert continues from that bucket without walking the run again.
///
/// [`entry`]: HashTable::entry
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    pos: usize,
    meta: u32,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the vacant entry and returns a mutable
    /// reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::hash_table::Entry;
    /// # use rh_hash::hash_table::HashTable;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_str("key");
    ///
    /// match table.entry(hash, |s: &String| s == "key", |s| hash_str(s)) {
    ///     Entry::Vacant(entry) => {
    ///         let value_ref = entry.insert("value".to_string());
    ///         assert_eq!(value_ref, "value");
    ///     }
    ///     Entry::Occupied(_) => unreachable!("Entry should be vacant"),
    /// }
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        // `entry` already grew the table until this placement fits.
        debug_assert!(
            table.entries.len() < PROBE_RISK_LEN
                || !table.placement_would_saturate(self.pos, self.meta)
        );
        debug_assert!(table.entries.len() < MAX_ENTRIES);

        let index = table.entries.len() as u32;
        table.entries.push(value);
        table.place(self.pos, self.meta, index);
        // SAFETY: The value was just pushed at `index`.
        unsafe { table.entries.get_unchecked_mut(index as usize) }
    }
}

/// A view into an occupied entry in the hash table.
///
/// This struct is created by the [`entry`] method on [`HashTable`] when the
/// probed value is present. It provides methods to access, modify, or
/// remove the existing value.
///
/// [`entry`]: HashTable::entry
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    pos: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    #[inline(always)]
    fn index(&self) -> usize {
        // SAFETY: `pos` was returned by `probe` for this borrow of the
        // table, so it is in bounds and its bucket is occupied.
        unsafe { self.table.buckets.get_unchecked(self.pos) }.index as usize
    }

    /// Gets a reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::hash_table::Entry;
    /// # use rh_hash::hash_table::HashTable;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_u64(42);
    /// table
    ///     .entry(hash, |&n: &u64| n == 42, |&n| hash_u64(n))
    ///     .or_insert(42);
    ///
    /// match table.entry(hash, |&n: &u64| n == 42, |&n| hash_u64(n)) {
    ///     Entry::Occupied(entry) => assert_eq!(entry.get(), &42),
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// ```
    pub fn get(&self) -> &V {
        let index = self.index();
        // SAFETY: Occupied buckets always hold an index below
        // `entries.len()`.
        unsafe { self.table.entries.get_unchecked(index) }
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// For a reference that outlives the entry, use [`into_mut`].
    ///
    /// [`into_mut`]: OccupiedEntry::into_mut
    pub fn get_mut(&mut self) -> &mut V {
        let index = self.index();
        // SAFETY: Occupied buckets always hold an index below
        // `entries.len()`.
        unsafe { self.table.entries.get_unchecked_mut(index) }
    }

    /// Converts the entry into a mutable reference to the value with the
    /// lifetime of the table borrow.
    pub fn into_mut(self) -> &'a mut V {
        let index = self.index();
        // SAFETY: Occupied buckets always hold an index below
        // `entries.len()`.
        unsafe { self.table.entries.get_unchecked_mut(index) }
    }

    /// Removes the entry from the table and returns the value.
    ///
    /// # Arguments
    ///
    /// * `hasher` - A function that computes the hash of a stored value,
    ///   used to re-home the entry that backfills the dense store
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::hash_table::Entry;
    /// # use rh_hash::hash_table::HashTable;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_u64(42);
    /// table
    ///     .entry(hash, |&n: &u64| n == 42, |&n| hash_u64(n))
    ///     .or_insert(42);
    ///
    /// match table.entry(hash, |&n: &u64| n == 42, |&n| hash_u64(n)) {
    ///     Entry::Occupied(entry) => {
    ///         assert_eq!(entry.remove(|&n| hash_u64(n)), 42);
    ///     }
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(self, hasher: impl Fn(&V) -> u64) -> V {
        self.table.remove_at(self.pos, &hasher)
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A mutable iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter_mut`] method on [`HashTable`].
///
/// [`iter_mut`]: HashTable::iter_mut
pub struct IterMut<'a, V> {
    inner: core::slice::IterMut<'a, V>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. It
/// yields owned values; any values not yielded by the time it is dropped
/// are dropped with it.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    inner: alloc::vec::Drain<'a, V>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

/// A consuming iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    inner: alloc::vec::IntoIter<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
