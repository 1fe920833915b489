use std::alloc::{handle_alloc_error, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::alloc::{Allocator, Global};
use crate::cursor::{Cursor, CursorMut, RawCursor};
use crate::error::Error;
use crate::iter::{IntoIter, Iter, IterMut};
use crate::utils::index::Ring;

/// Smallest capacity a buffer can be created with.
pub const MIN_CAPACITY: usize = 2;

/// Capacity used by [`RingBuffer::default`].
pub const DEFAULT_CAPACITY: usize = 100;

/// A fixed-capacity double-ended ring buffer that overwrites when full.
///
/// Logical element `i` lives in slot `(head + i) % capacity`; `tail` is the
/// slot one past the newest element. A full buffer has `tail == head`, which
/// is what lets a push at one end land exactly on the element it evicts at
/// the other.
///
/// The buffer is not synchronized. Sharing one across threads needs an
/// external lock, as with any `&mut`-based collection.
pub struct RingBuffer<T, A: Allocator = Global> {
    ptr: NonNull<T>,
    capacity: usize,
    head: usize,
    tail: usize,
    len: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

// SAFETY: the buffer owns its elements and its allocator.
unsafe impl<T: Send, A: Allocator + Send> Send for RingBuffer<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RingBuffer<T, A> {}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer on the heap.
    ///
    /// Fails with [`Error::CapacityTooSmall`] when `capacity < 2`.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Self::new_in(capacity, Global)
    }
}

impl<T, A: Allocator> RingBuffer<T, A> {
    /// Creates an empty buffer whose storage comes from `alloc`.
    pub fn new_in(capacity: usize, alloc: A) -> Result<Self, Error> {
        if capacity < MIN_CAPACITY {
            return Err(Error::CapacityTooSmall(capacity));
        }
        Self::allocate_in(capacity, alloc)
    }

    /// Like `new_in`, but also accepts the zero capacity of a moved-from buffer.
    fn allocate_in(capacity: usize, alloc: A) -> Result<Self, Error> {
        let ptr = Self::allocate_storage(&alloc, capacity)?;
        Ok(Self {
            ptr,
            capacity,
            head: 0,
            tail: 0,
            len: 0,
            alloc,
            _marker: PhantomData,
        })
    }

    fn allocate_storage(alloc: &A, capacity: usize) -> Result<NonNull<T>, Error> {
        if capacity == 0 {
            return Ok(NonNull::dangling());
        }
        let layout = Layout::array::<T>(capacity).map_err(|_| Error::CapacityOverflow(capacity))?;
        let ptr = alloc.allocate(layout)?;
        log::trace!(
            "allocated storage for {capacity} elements ({} bytes)",
            layout.size()
        );
        Ok(ptr.cast())
    }

    #[inline]
    fn layout(&self) -> Layout {
        // SAFETY: this exact layout was validated by `allocate_storage`.
        unsafe {
            Layout::from_size_align_unchecked(
                mem::size_of::<T>() * self.capacity,
                mem::align_of::<T>(),
            )
        }
    }

    #[inline]
    pub(crate) fn ring(&self) -> Ring {
        Ring::new(self.capacity, self.head, self.len)
    }

    #[inline]
    fn slot(&self, slot: usize) -> *mut T {
        debug_assert!(slot <= self.capacity);
        // SAFETY: `slot <= capacity` stays within (or one past) the block.
        unsafe { self.ptr.as_ptr().add(slot) }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of elements.
    #[doc(alias = "size")]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Slot of the oldest element.
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Slot one past the newest element.
    #[inline]
    pub fn tail(&self) -> usize {
        self.tail
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Start of the backing storage. Slots outside the logical range are
    /// not initialized.
    #[doc(alias = "data")]
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Appends `value`, evicting and returning the front element when full.
    pub fn push_back(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }
        let ring = self.ring();
        if self.len < self.capacity {
            // SAFETY: `tail` is a vacant slot while the buffer is not full.
            unsafe { self.slot(self.tail).write(value) };
            self.tail = ring.increment(self.tail);
            self.len += 1;
            None
        } else {
            // Full: `tail == head`, so this write replaces the front element.
            debug_assert_eq!(self.head, self.tail);
            // SAFETY: `tail` holds the live front element.
            let evicted = unsafe { ptr::replace(self.slot(self.tail), value) };
            self.tail = ring.increment(self.tail);
            self.head = self.tail;
            Some(evicted)
        }
    }

    /// Prepends `value`, evicting and returning the back element when full.
    pub fn push_front(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }
        let ring = self.ring();
        let head = ring.decrement(self.head);
        if self.len < self.capacity {
            // SAFETY: the slot before `head` is vacant while the buffer is not full.
            unsafe { self.slot(head).write(value) };
            self.head = head;
            self.len += 1;
            None
        } else {
            // Full: `head == tail`, so the slot before `head` is the back element.
            debug_assert_eq!(self.head, self.tail);
            // SAFETY: that slot holds the live back element.
            let evicted = unsafe { ptr::replace(self.slot(head), value) };
            self.head = head;
            self.tail = head;
            Some(evicted)
        }
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: `head` holds a live element; it is vacated below.
        let value = unsafe { self.slot(self.head).read() };
        self.head = self.ring().increment(self.head);
        self.len -= 1;
        Some(value)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.tail = self.ring().decrement(self.tail);
        self.len -= 1;
        // SAFETY: the slot before the old `tail` held a live element.
        Some(unsafe { self.slot(self.tail).read() })
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.len.checked_sub(1).and_then(|last| self.get_mut(last))
    }

    /// Element at logical `index`, counted from the front.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: `index < len` maps to a live slot.
        Some(unsafe { &*self.slot(self.ring().physical(index)) })
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: as in `get`.
        Some(unsafe { &mut *self.slot(self.ring().physical(index)) })
    }

    /// Element at logical `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`. Debug builds assert it.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index {index} out of range for length {}", self.len);
        &*self.slot(self.ring().physical(index))
    }

    #[inline]
    fn segment_lengths(&self) -> (usize, usize) {
        let first = self.len.min(self.capacity - self.head);
        (first, self.len - first)
    }

    /// The run from `head` to `tail` or to the end of storage, whichever comes first.
    #[inline]
    pub fn segment_one(&self) -> &[T] {
        let (first, _) = self.segment_lengths();
        // SAFETY: `[head, head + first)` are live slots.
        unsafe { slice::from_raw_parts(self.slot(self.head), first) }
    }

    /// The run wrapped around to the start of storage, empty unless the
    /// content wraps.
    #[inline]
    pub fn segment_two(&self) -> &[T] {
        let (_, second) = self.segment_lengths();
        // SAFETY: `[0, second)` are live slots.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), second) }
    }

    #[inline]
    pub fn segment_one_mut(&mut self) -> &mut [T] {
        self.as_mut_slices().0
    }

    #[inline]
    pub fn segment_two_mut(&mut self) -> &mut [T] {
        self.as_mut_slices().1
    }

    /// Both segments, oldest elements first.
    #[inline]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        (self.segment_one(), self.segment_two())
    }

    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (first, second) = self.segment_lengths();
        // SAFETY: both runs are live and disjoint; the second one ends at
        // `tail <= head` whenever it is non-empty.
        unsafe {
            (
                slice::from_raw_parts_mut(self.slot(self.head), first),
                slice::from_raw_parts_mut(self.ptr.as_ptr(), second),
            )
        }
    }

    /// Whether the content starts at slot 0.
    #[inline]
    pub fn is_linearized(&self) -> bool {
        self.head == 0
    }

    /// Rotates the storage so the content starts at slot 0, and returns it as
    /// one slice. O(capacity); logical order is unchanged.
    pub fn linearize(&mut self) -> &mut [T] {
        if !self.is_linearized() {
            log::trace!(
                "linearizing ring buffer: rotating {} slots left by {}",
                self.capacity,
                self.head
            );
            // SAFETY: the block holds `capacity` slots; rotating them as
            // `MaybeUninit` never reads an element.
            let storage = unsafe {
                slice::from_raw_parts_mut(self.ptr.as_ptr().cast::<MaybeUninit<T>>(), self.capacity)
            };
            storage.rotate_left(self.head);
            self.head = 0;
            self.tail = if self.is_full() { 0 } else { self.len };
        }
        // SAFETY: `[0, len)` are now the live slots.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Drops the `n` oldest elements, or all of them when `n >= len()`.
    pub fn discard_front(&mut self, n: usize) {
        let n = n.min(self.len);
        if n == 0 {
            return;
        }
        let first = n.min(self.capacity - self.head);
        let front = ptr::slice_from_raw_parts_mut(self.slot(self.head), first);
        let wrapped = ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), n - first);
        self.head = self.ring().physical(n);
        self.len -= n;
        // SAFETY: both runs were live and are no longer reachable.
        unsafe {
            ptr::drop_in_place(front);
            ptr::drop_in_place(wrapped);
        }
    }

    /// Drops every element and resets `head` and `tail` to slot 0.
    pub fn clear(&mut self) {
        let (first, second) = self.segment_lengths();
        let front = ptr::slice_from_raw_parts_mut(self.slot(self.head), first);
        let wrapped = ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), second);
        self.head = 0;
        self.tail = 0;
        self.len = 0;
        // SAFETY: both runs were live and are no longer reachable.
        unsafe {
            ptr::drop_in_place(front);
            ptr::drop_in_place(wrapped);
        }
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.ptr, self.ring())
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.ptr, self.ring())
    }

    /// Cursor at the oldest element.
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::from_raw(RawCursor::begin(self.ptr, self.ring()))
    }

    /// Cursor one past the newest element.
    #[inline]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::from_raw(RawCursor::end(self.ptr, self.ring()))
    }

    #[inline]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::from_raw(RawCursor::begin(self.ptr, self.ring()))
    }

    #[inline]
    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::from_raw(RawCursor::end(self.ptr, self.ring()))
    }

    /// Copies the buffer into fresh storage from `alloc`, keeping the
    /// physical layout (`head`, `tail`, segments) identical.
    pub fn clone_in<B: Allocator>(&self, alloc: B) -> Result<RingBuffer<T, B>, Error>
    where
        T: Clone,
    {
        let mut out = RingBuffer::allocate_in(self.capacity, alloc)?;
        out.head = self.head;
        out.tail = self.head;
        for value in self.iter() {
            out.push_back(value.clone());
        }
        debug_assert_eq!(out.tail, self.tail);
        Ok(out)
    }

    /// Fallible [`Clone`], with a copy of this buffer's allocator.
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        T: Clone,
        A: Clone,
    {
        self.clone_in(self.alloc.clone())
    }

    /// Moves the content of `source` into `self`, replacing what `self` held.
    ///
    /// When the two allocators compare equal the storage itself changes hands,
    /// along with the allocator. Otherwise `self` allocates `source.capacity()`
    /// slots from its own allocator and the elements are moved over, which
    /// linearizes them. Either way `source` is left empty with zero capacity.
    ///
    /// On allocation failure neither buffer is modified.
    pub fn assign_from(&mut self, source: &mut Self) -> Result<(), Error> {
        if self.alloc.is_equal(&source.alloc) {
            mem::swap(self, source);
            source.release();
            return Ok(());
        }

        log::debug!(
            "move-assigning {} elements across unequal allocators",
            source.len
        );
        let storage = Self::allocate_storage(&self.alloc, source.capacity)?;
        let (len, capacity) = (source.len, source.capacity);
        {
            let (first, second) = source.as_slices();
            // SAFETY: fresh storage cannot overlap the source, and holds
            // `capacity >= first.len() + second.len()` slots.
            unsafe {
                ptr::copy_nonoverlapping(first.as_ptr(), storage.as_ptr(), first.len());
                ptr::copy_nonoverlapping(
                    second.as_ptr(),
                    storage.as_ptr().add(first.len()),
                    second.len(),
                );
            }
        }
        // The elements now belong to `storage`.
        source.len = 0;
        source.release();

        self.release();
        self.ptr = storage;
        self.capacity = capacity;
        self.head = 0;
        self.len = len;
        self.tail = if len == capacity { 0 } else { len };
        Ok(())
    }

    /// Moves the buffer out, leaving `self` empty with zero capacity.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            head: 0,
            tail: 0,
            len: 0,
            alloc: self.alloc.clone(),
            _marker: PhantomData,
        };
        mem::replace(self, empty)
    }

    /// Drops the elements and returns the storage, leaving zero capacity.
    fn release(&mut self) {
        self.clear();
        if self.capacity > 0 {
            // SAFETY: the storage came from this allocator with this layout.
            unsafe { self.alloc.deallocate(self.ptr.cast(), self.layout()) };
        }
        self.ptr = NonNull::dangling();
        self.capacity = 0;
    }
}

/// Unwraps construction results the way std collections treat allocation failure.
fn or_abort<T>(result: Result<T, Error>) -> T {
    match result {
        Ok(value) => value,
        Err(Error::Alloc(err)) => handle_alloc_error(err.layout()),
        Err(err) => panic!("{err}"),
    }
}

impl<T, A: Allocator> Drop for RingBuffer<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> Default for RingBuffer<T> {
    /// An empty heap buffer of [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        or_abort(Self::new(DEFAULT_CAPACITY))
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for RingBuffer<T, A> {
    /// Aborts through [`handle_alloc_error`] if the allocator is exhausted;
    /// use [`RingBuffer::try_clone`] to observe the failure instead.
    fn clone(&self) -> Self {
        or_abort(self.try_clone())
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for RingBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: Allocator> Index<usize> for RingBuffer<T, A> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len;
        self.get(index)
            .unwrap_or_else(|| panic!("index out of bounds: the len is {len} but the index is {index}"))
    }
}

impl<T, A: Allocator> IndexMut<usize> for RingBuffer<T, A> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        self.get_mut(index)
            .unwrap_or_else(|| panic!("index out of bounds: the len is {len} but the index is {index}"))
    }
}

impl<T, U, A: Allocator, B: Allocator> PartialEq<RingBuffer<U, B>> for RingBuffer<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &RingBuffer<U, B>) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq, A: Allocator> Eq for RingBuffer<T, A> {}

impl<T, U, A: Allocator> PartialEq<[U]> for RingBuffer<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.len == other.len() && self.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<T, U, A: Allocator, const N: usize> PartialEq<[U; N]> for RingBuffer<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        *self == other[..]
    }
}

impl<T, U, A: Allocator> PartialEq<Vec<U>> for RingBuffer<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        *self == other[..]
    }
}

impl<T, A: Allocator> Extend<T> for RingBuffer<T, A> {
    /// Pushes every item to the back; only the last `capacity()` survive.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for RingBuffer<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, A: Allocator> IntoIterator for RingBuffer<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a RingBuffer<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut RingBuffer<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
