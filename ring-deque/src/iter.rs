use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::alloc::{Allocator, Global};
use crate::cursor::{Access, Exclusive, RawCursor, Shared};
use crate::ring_buffer::RingBuffer;
use crate::utils::index::Ring;

/// Borrowing iterator, oldest to newest.
///
/// Walks the same position arithmetic as [`Cursor`](crate::Cursor): a front
/// and a back position closing in on each other. `nth` and `nth_back` jump in
/// O(1). Reverse iteration is `.rev()`.
pub struct Iter<'a, T: 'a, M: Access = Shared> {
    front: RawCursor<T>,
    back: RawCursor<T>,
    _marker: PhantomData<M::Ref<'a, T>>,
}

pub type IterMut<'a, T> = Iter<'a, T, Exclusive>;

// SAFETY: an iterator behaves like the references it hands out.
unsafe impl<'a, T: 'a, M: Access> Send for Iter<'a, T, M> where M::Ref<'a, T>: Send {}
unsafe impl<'a, T: 'a, M: Access> Sync for Iter<'a, T, M> where M::Ref<'a, T>: Sync {}

impl<'a, T: 'a, M: Access> Iter<'a, T, M> {
    #[inline]
    pub(crate) fn new(base: NonNull<T>, ring: Ring) -> Self {
        Self {
            front: RawCursor::begin(base, ring),
            back: RawCursor::end(base, ring),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.back.offset() - self.front.offset()
    }
}

impl<'a, T: 'a, M: Access> Iterator for Iter<'a, T, M> {
    type Item = M::Ref<'a, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let ptr = self.front.element()?;
        self.front.step_forward();
        // SAFETY: every slot between `front` and `back` is yielded once.
        Some(unsafe { M::make_ref(ptr) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }

    #[inline]
    fn count(self) -> usize {
        self.remaining()
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.remaining() {
            self.front = self.back;
            return None;
        }
        self.front.seek_to(self.front.offset() + n);
        self.next()
    }

    #[inline]
    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<'a, T: 'a, M: Access> DoubleEndedIterator for Iter<'a, T, M> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back.step_back();
        // SAFETY: as in `next`.
        self.back.element().map(|ptr| unsafe { M::make_ref(ptr) })
    }

    #[inline]
    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.remaining() {
            self.back = self.front;
            return None;
        }
        self.back.seek_to(self.back.offset() - n);
        self.next_back()
    }
}

impl<'a, T: 'a, M: Access> ExactSizeIterator for Iter<'a, T, M> {}

impl<'a, T: 'a, M: Access> FusedIterator for Iter<'a, T, M> {}

impl<'a, T: 'a> Clone for Iter<'a, T, Shared> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, M: Access> fmt::Debug for Iter<'a, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining())
            .finish()
    }
}

/// Owning iterator, popping from either end.
pub struct IntoIter<T, A: Allocator = Global> {
    buf: RingBuffer<T, A>,
}

impl<T, A: Allocator> IntoIter<T, A> {
    #[inline]
    pub(crate) fn new(buf: RingBuffer<T, A>) -> Self {
        Self { buf }
    }

    /// The elements not yielded yet.
    pub fn as_buffer(&self) -> &RingBuffer<T, A> {
        &self.buf
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.buf.len(), Some(self.buf.len()))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.buf.pop_back()
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.buf).finish()
    }
}
