//! Random-access cursors over a [`RingBuffer`](crate::RingBuffer).
//!
//! A cursor is a position in the logical sequence, from the oldest element
//! (`begin`) to one past the newest (`end`). Stepping follows the physical
//! storage one slot at a time and wraps at the end of the backing block.
//! Offsetting (`+`, `-`, `+=`, `-=`), distance (`&b - &a`) and ordering are
//! all O(1) through the linear mapping in [`crate::utils::index`].
//!
//! Cursors borrow the buffer, so any push, pop, clear or linearize needs the
//! borrow to end first.
//!
//! Stepping before `begin`, past `end`, or offsetting out of `[begin, end]`
//! trips a debug assertion. Release builds clamp to the nearest valid
//! position instead.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::ptr::NonNull;

use crate::utils::index::Ring;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Shared {}
    impl Sealed for super::Exclusive {}
}

/// How a cursor or iterator reaches the elements it visits.
///
/// Implemented by [`Shared`] (`&T`) and [`Exclusive`] (`&mut T`) only.
pub trait Access: sealed::Sealed {
    type Ref<'a, T: 'a>;

    #[doc(hidden)]
    unsafe fn make_ref<'a, T: 'a>(ptr: NonNull<T>) -> Self::Ref<'a, T>;
}

/// Read-only access.
#[derive(Debug)]
pub enum Shared {}

/// Read-write access.
#[derive(Debug)]
pub enum Exclusive {}

impl Access for Shared {
    type Ref<'a, T: 'a> = &'a T;

    #[inline]
    unsafe fn make_ref<'a, T: 'a>(ptr: NonNull<T>) -> &'a T {
        &*ptr.as_ptr()
    }
}

impl Access for Exclusive {
    type Ref<'a, T: 'a> = &'a mut T;

    #[inline]
    unsafe fn make_ref<'a, T: 'a>(ptr: NonNull<T>) -> &'a mut T {
        &mut *ptr.as_ptr()
    }
}

/// Position bookkeeping without a borrow attached.
///
/// `slot` is either a live slot, or `ring.end()`.
pub(crate) struct RawCursor<T> {
    base: NonNull<T>,
    ring: Ring,
    slot: usize,
}

impl<T> Clone for RawCursor<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RawCursor<T> {}

impl<T> PartialEq for RawCursor<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        debug_assert!(self.base == other.base, "cursors belong to different buffers");
        self.slot == other.slot
    }
}

impl<T> RawCursor<T> {
    #[inline]
    pub(crate) fn begin(base: NonNull<T>, ring: Ring) -> Self {
        Self {
            base,
            ring,
            slot: ring.begin(),
        }
    }

    #[inline]
    pub(crate) fn end(base: NonNull<T>, ring: Ring) -> Self {
        Self {
            base,
            ring,
            slot: ring.end(),
        }
    }

    /// Logical offset from the oldest element.
    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.ring.linearize(self.slot)
    }

    #[inline]
    pub(crate) fn is_begin(&self) -> bool {
        self.slot == self.ring.begin()
    }

    #[inline]
    pub(crate) fn is_end(&self) -> bool {
        self.slot == self.ring.end()
    }

    pub(crate) fn step_forward(&mut self) {
        debug_assert!(!self.is_end(), "cursor advanced past the end of the buffer");
        if self.is_end() {
            return;
        }
        let next = self.ring.increment(self.slot);
        // Only a full ring wraps back onto `head`, and there that means `end`.
        self.slot = if next == self.ring.head {
            self.ring.end()
        } else {
            next
        };
    }

    pub(crate) fn step_back(&mut self) {
        debug_assert!(!self.is_begin(), "cursor moved before the beginning of the buffer");
        if self.is_begin() {
            return;
        }
        let slot = if self.slot == self.ring.capacity {
            self.ring.head
        } else {
            self.slot
        };
        self.slot = self.ring.decrement(slot);
    }

    /// Jumps to logical offset `offset`, which must lie in `[0, len]`.
    #[inline]
    pub(crate) fn seek_to(&mut self, offset: usize) {
        debug_assert!(
            offset <= self.ring.len,
            "cursor offset {offset} is out of range for length {}",
            self.ring.len
        );
        self.slot = self.ring.unlinearize(offset.min(self.ring.len));
    }

    #[inline]
    pub(crate) fn seek(&mut self, delta: isize) {
        let len = self.ring.len;
        let target = self.offset().checked_add_signed(delta).filter(|&t| t <= len);
        debug_assert!(
            target.is_some(),
            "cursor moved by {delta} from offset {} leaves [0, {len}]",
            self.offset()
        );
        let target = target.unwrap_or(if delta < 0 { 0 } else { len });
        self.slot = self.ring.unlinearize(target);
    }

    #[inline]
    pub(crate) fn distance_from(&self, origin: &Self) -> isize {
        debug_assert!(self.base == origin.base, "cursors belong to different buffers");
        (self.offset() as isize).wrapping_sub(origin.offset() as isize)
    }

    /// Address of the element under the cursor, `None` at the end.
    #[inline]
    pub(crate) fn element(&self) -> Option<NonNull<T>> {
        if self.offset() < self.ring.len {
            // SAFETY: live slots are in bounds of the storage block.
            Some(unsafe { NonNull::new_unchecked(self.base.as_ptr().add(self.slot)) })
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn element_at(&self, delta: isize) -> Option<NonNull<T>> {
        let offset = self
            .offset()
            .checked_add_signed(delta)
            .filter(|&o| o < self.ring.len)?;
        let slot = self.ring.physical(offset);
        // SAFETY: as above.
        Some(unsafe { NonNull::new_unchecked(self.base.as_ptr().add(slot)) })
    }
}

/// A random-access position in a buffer.
///
/// `Cursor<'a, T>` reads, [`CursorMut<'a, T>`] also writes. Both share one
/// implementation of the position arithmetic.
///
/// ```
/// use ring_deque::RingBuffer;
///
/// let mut buf = RingBuffer::new(3)?;
/// for i in 1..=4 {
///     buf.push_back(i);
/// }
/// let begin = buf.begin();
/// let end = buf.end();
/// assert_eq!(&end - &begin, 3);
/// assert_eq!((begin + 1).get(), Some(&3));
/// assert_eq!(begin.at(2), Some(&4));
/// assert!(begin < end);
/// # Ok::<(), ring_deque::Error>(())
/// ```
pub struct Cursor<'a, T: 'a, M: Access = Shared> {
    raw: RawCursor<T>,
    _marker: PhantomData<M::Ref<'a, T>>,
}

/// A cursor that can write through to the buffer.
pub type CursorMut<'a, T> = Cursor<'a, T, Exclusive>;

// SAFETY: a cursor behaves like the reference it hands out.
unsafe impl<'a, T: 'a, M: Access> Send for Cursor<'a, T, M> where M::Ref<'a, T>: Send {}
unsafe impl<'a, T: 'a, M: Access> Sync for Cursor<'a, T, M> where M::Ref<'a, T>: Sync {}

impl<'a, T: 'a, M: Access> Cursor<'a, T, M> {
    #[inline]
    pub(crate) fn from_raw(raw: RawCursor<T>) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Logical index of the position, `len()` at the end.
    #[inline]
    pub fn position(&self) -> usize {
        self.raw.offset()
    }

    #[inline]
    pub fn is_begin(&self) -> bool {
        self.raw.is_begin()
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.raw.is_end()
    }

    /// The element under the cursor, `None` at the end.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        // SAFETY: the buffer is borrowed for `'a` and the slot is live.
        self.raw.element().map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// The element `delta` positions away, like `*(cursor + delta)`.
    #[inline]
    pub fn at(&self, delta: isize) -> Option<&T> {
        // SAFETY: as in `get`.
        self.raw.element_at(delta).map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    #[inline]
    pub fn move_next(&mut self) {
        self.raw.step_forward();
    }

    #[inline]
    pub fn move_prev(&mut self) {
        self.raw.step_back();
    }

    /// Signed number of elements from `origin` to `self`.
    #[inline]
    pub fn offset_from(&self, origin: &Self) -> isize {
        self.raw.distance_from(&origin.raw)
    }
}

impl<'a, T: 'a> Cursor<'a, T, Shared> {
    /// Like [`Cursor::get`], but tied to the buffer borrow instead of the cursor.
    #[inline]
    pub fn get_ref(&self) -> Option<&'a T> {
        // SAFETY: the buffer is borrowed immutably for `'a`.
        self.raw.element().map(|ptr| unsafe { Shared::make_ref(ptr) })
    }
}

impl<'a, T: 'a> Cursor<'a, T, Exclusive> {
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the cursor holds the only borrow of the buffer.
        self.raw.element().map(|ptr| unsafe { &mut *ptr.as_ptr() })
    }

    #[inline]
    pub fn at_mut(&mut self, delta: isize) -> Option<&mut T> {
        // SAFETY: as in `get_mut`.
        self.raw.element_at(delta).map(|ptr| unsafe { &mut *ptr.as_ptr() })
    }

    /// Consumes the cursor, keeping the element borrowed for `'a`.
    #[inline]
    pub fn into_mut(self) -> Option<&'a mut T> {
        // SAFETY: the exclusive borrow moves into the returned reference.
        self.raw.element().map(|ptr| unsafe { Exclusive::make_ref(ptr) })
    }

    /// A read-only view of the same position.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::from_raw(self.raw)
    }
}

impl<'a, T: 'a> Clone for Cursor<'a, T, Shared> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: 'a> Copy for Cursor<'a, T, Shared> {}

impl<'a, T: 'a, M: Access> PartialEq for Cursor<'a, T, M> {
    /// Two positions in one buffer are equal when they name the same slot.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<'a, T: 'a, M: Access> Eq for Cursor<'a, T, M> {}

impl<'a, T: 'a, M: Access> PartialOrd for Cursor<'a, T, M> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, T: 'a, M: Access> Ord for Cursor<'a, T, M> {
    /// Oldest-to-newest order.
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.offset().cmp(&other.raw.offset())
    }
}

impl<'a, T: 'a, M: Access> AddAssign<isize> for Cursor<'a, T, M> {
    #[inline]
    fn add_assign(&mut self, delta: isize) {
        self.raw.seek(delta);
    }
}

impl<'a, T: 'a, M: Access> SubAssign<isize> for Cursor<'a, T, M> {
    #[inline]
    fn sub_assign(&mut self, delta: isize) {
        self.raw.seek(delta.saturating_neg());
    }
}

impl<'a, T: 'a, M: Access> Add<isize> for Cursor<'a, T, M> {
    type Output = Self;

    #[inline]
    fn add(mut self, delta: isize) -> Self {
        self += delta;
        self
    }
}

impl<'a, T: 'a, M: Access> Add<Cursor<'a, T, M>> for isize {
    type Output = Cursor<'a, T, M>;

    #[inline]
    fn add(self, cursor: Cursor<'a, T, M>) -> Cursor<'a, T, M> {
        cursor + self
    }
}

impl<'a, T: 'a, M: Access> Sub<isize> for Cursor<'a, T, M> {
    type Output = Self;

    #[inline]
    fn sub(mut self, delta: isize) -> Self {
        self -= delta;
        self
    }
}

impl<'a, 'x, 'y, T: 'a, M: Access> Sub<&'y Cursor<'a, T, M>> for &'x Cursor<'a, T, M> {
    type Output = isize;

    #[inline]
    fn sub(self, origin: &'y Cursor<'a, T, M>) -> isize {
        self.offset_from(origin)
    }
}

impl<'a, T: 'a, M: Access> fmt::Debug for Cursor<'a, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position())
            .field("len", &self.raw.ring.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::RingBuffer;

    /// Capacity 3, content `[2, 3]` starting at slot 1.
    fn wrapped() -> RingBuffer<i32> {
        let mut buf = RingBuffer::new(3).unwrap();
        buf.push_back(1);
        buf.push_back(2);
        buf.push_back(3);
        buf.pop_front();
        buf
    }

    /// Capacity 4, full, content `[3, 4, 5, 6]` starting at slot 2.
    fn full_and_wrapped() -> RingBuffer<i32> {
        let mut buf = RingBuffer::new(4).unwrap();
        for i in 1..=6 {
            buf.push_back(i);
        }
        assert_eq!(buf.head(), 2);
        buf
    }

    #[test]
    fn offset_arithmetic() {
        let buf = wrapped();
        let a = buf.begin();
        let b = buf.end();

        assert_eq!((a + 1).get(), Some(&3));
        assert_eq!((1isize + a).get(), Some(&3));
        assert_eq!((b - 1).get(), Some(&3));
        assert_eq!(&b - &a, 2);
        assert_eq!(&a - &b, -2);
    }

    #[test]
    fn relational_operators() {
        let buf = wrapped();
        let a = buf.begin();
        let b = buf.end();

        assert!(a < b);
        assert!(!(a > b));
        assert!(a <= b);
        assert!(!(a >= b));
        assert!(a <= a);
        assert!(a >= a);
    }

    #[test]
    fn ordering_follows_logical_order_across_the_wrap() {
        let buf = full_and_wrapped();
        let cursors: Vec<_> = (0..=4).map(|n| buf.begin() + n).collect();
        for pair in cursors.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(&pair[1] - &pair[0], 1);
        }
        assert_eq!(cursors[4], buf.end());
    }

    #[test]
    fn compound_assignment() {
        let buf = wrapped();
        let mut a = buf.begin();
        let mut b = buf.end();

        a += 1;
        assert_eq!(a.get(), Some(&3));

        b -= 1;
        assert_eq!(b.get(), Some(&3));
        assert_eq!(a, b);
    }

    #[test]
    fn offset_dereference() {
        let mut buf = wrapped();
        {
            let a = buf.begin();
            assert_eq!(a.at(0), Some(&2));
            assert_eq!(a.at(1), Some(&3));
            assert_eq!(a.at(2), None);
            assert_eq!(a.at(-1), None);
        }
        {
            let mut a = buf.begin_mut();
            *a.at_mut(0).unwrap() = 4;
            assert_eq!(a.at(0), Some(&4));
            *a.at_mut(1).unwrap() = 5;
            assert_eq!(a.at(1), Some(&5));
        }
        assert_eq!(buf, [4, 5]);
    }

    #[test]
    fn random_access_laws() {
        let buf = full_and_wrapped();
        let it = buf.begin();
        for n in 0..4isize {
            assert_eq!((it + n).get(), it.at(n));
            assert_eq!(&(it + n) - &it, n);
            assert!(it < it + (n + 1));
        }
        let end = buf.end();
        for n in 1..=4isize {
            assert_eq!((end - n).get(), buf.get(4 - n as usize));
        }
    }

    #[test]
    fn stepping_visits_every_element_in_order() {
        for buf in [wrapped(), full_and_wrapped()] {
            let mut seen = Vec::new();
            let mut it = buf.begin();
            while it != buf.end() {
                seen.push(*it.get().unwrap());
                it.move_next();
            }
            assert_eq!(seen.len(), buf.len());
            assert_eq!(seen, buf.iter().copied().collect::<Vec<_>>());

            let mut back = Vec::new();
            let mut it = buf.end();
            while it != buf.begin() {
                it.move_prev();
                back.push(*it.get().unwrap());
            }
            back.reverse();
            assert_eq!(back, seen);
        }
    }

    #[test]
    fn empty_buffer_begin_is_end() {
        let buf = RingBuffer::<i32>::new(3).unwrap();
        assert_eq!(buf.begin(), buf.end());
        assert!(buf.begin().is_end());
        assert_eq!(buf.begin().get(), None);
        assert_eq!(&buf.end() - &buf.begin(), 0);
    }

    #[test]
    fn position_reports_logical_index() {
        let buf = full_and_wrapped();
        assert_eq!(buf.begin().position(), 0);
        assert_eq!((buf.begin() + 3).position(), 3);
        assert_eq!(buf.end().position(), 4);
    }

    #[test]
    fn exclusive_cursor_writes_through() {
        let mut buf = full_and_wrapped();
        let mut it = buf.begin_mut();
        while let Some(value) = it.get_mut() {
            *value *= 10;
            it.move_next();
        }
        assert_eq!(buf, [30, 40, 50, 60]);

        let last = (buf.end_mut() - 1).into_mut().unwrap();
        *last = 0;
        assert_eq!(buf.back(), Some(&0));
    }

    #[test]
    fn shared_reference_outlives_the_cursor() {
        let buf = wrapped();
        let first = {
            let cursor = buf.begin();
            cursor.get_ref()
        };
        assert_eq!(first, Some(&2));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "past the end")]
    fn incrementing_end_panics_in_debug() {
        let buf = wrapped();
        let mut end = buf.end();
        end.move_next();
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "before the beginning")]
    fn decrementing_begin_panics_in_debug() {
        let buf = wrapped();
        let mut begin = buf.begin();
        begin.move_prev();
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "leaves [0, 2]")]
    fn offset_before_begin_panics_in_debug() {
        let buf = wrapped();
        let _ = buf.begin() - 1;
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "leaves [0, 2]")]
    fn offset_past_end_panics_in_debug() {
        let buf = wrapped();
        let _ = buf.begin() + 3;
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn release_builds_clamp_out_of_range_offsets() {
        let buf = wrapped();
        assert_eq!(buf.begin() - 1, buf.begin());
        assert_eq!(buf.begin() + 3, buf.end());
        let mut end = buf.end();
        end.move_next();
        assert_eq!(end, buf.end());
    }
}
