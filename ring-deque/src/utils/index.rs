//! Index arithmetic shared by the buffer, its cursors and its iterators.
//!
//! Positions come in two flavours:
//!
//! * a *slot*, the physical index of a cell in the backing storage. Slots live
//!   in `[0, capacity)`, plus `capacity` itself which is only ever used as the
//!   end position of a full buffer (a full buffer has `tail == head`, so the
//!   tail slot cannot double as "one past the newest element").
//! * an *offset*, the logical position counted from the oldest element, in
//!   `[0, len]`.
//!
//! `linearize` and `unlinearize` translate between the two in O(1). Nothing
//! outside this module reasons about the wrap discontinuity.

/// A snapshot of the index state of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ring {
    pub(crate) capacity: usize,
    pub(crate) head: usize,
    pub(crate) len: usize,
}

impl Ring {
    #[inline]
    pub(crate) const fn new(capacity: usize, head: usize, len: usize) -> Self {
        Self {
            capacity,
            head,
            len,
        }
    }

    #[inline]
    pub(crate) const fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Slot holding logical element `offset`.
    ///
    /// The offset is reduced modulo the capacity before `head` is added, so the
    /// sum cannot overflow even for offsets close to `usize::MAX`.
    #[inline]
    pub(crate) fn physical(&self, offset: usize) -> usize {
        debug_assert!(self.capacity > 0);
        debug_assert!(self.head < self.capacity);

        let offset = if offset < self.capacity {
            offset
        } else {
            offset % self.capacity
        };
        let room = self.capacity - self.head;
        if offset < room {
            self.head + offset
        } else {
            offset - room
        }
    }

    #[inline]
    pub(crate) fn increment(&self, slot: usize) -> usize {
        debug_assert!(slot < self.capacity);
        if slot + 1 == self.capacity {
            0
        } else {
            slot + 1
        }
    }

    #[inline]
    pub(crate) fn decrement(&self, slot: usize) -> usize {
        debug_assert!(slot < self.capacity);
        if slot == 0 {
            self.capacity - 1
        } else {
            slot - 1
        }
    }

    /// Slot of the oldest element, or `end()` when empty.
    #[inline]
    pub(crate) fn begin(&self) -> usize {
        self.unlinearize(0)
    }

    /// Slot one past the newest element.
    #[inline]
    pub(crate) fn end(&self) -> usize {
        if self.is_full() {
            self.capacity
        } else {
            self.physical(self.len)
        }
    }

    /// Maps a slot to its offset from `head`.
    ///
    /// Slots at or after `head` map to `slot - head`, slots before it belong to
    /// the wrapped part and map past the end of storage. Stale slots map into
    /// `[len, capacity)`, which callers use to reject them.
    #[inline]
    pub(crate) fn linearize(&self, slot: usize) -> usize {
        if slot == self.capacity {
            return self.len;
        }
        if slot >= self.head {
            slot - self.head
        } else {
            slot + (self.capacity - self.head)
        }
    }

    /// Inverse of [`Ring::linearize`] for offsets in `[0, len]`.
    #[inline]
    pub(crate) fn unlinearize(&self, offset: usize) -> usize {
        debug_assert!(offset <= self.len);
        if offset >= self.len {
            self.end()
        } else {
            self.physical(offset)
        }
    }
}
