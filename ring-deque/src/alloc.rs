//! Storage backends a [`RingBuffer`](crate::RingBuffer) can be parameterized over.

use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;

use thiserror::Error;

/// The allocator ran out of memory, or cannot serve the requested layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("memory allocation of {} bytes failed", .layout.size())]
pub struct AllocError {
    layout: Layout,
}

impl AllocError {
    #[inline]
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Layout of the request that failed.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

/// A source of raw memory blocks.
///
/// A buffer allocates exactly once at construction and deallocates exactly
/// once when it is dropped, always with the layout it allocated with.
///
/// # Safety
///
/// Blocks returned by `allocate` must be valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and must stay valid
/// until they are passed back to `deallocate` on this allocator or on one
/// that compares equal through [`Allocator::is_equal`].
pub unsafe trait Allocator {
    /// Allocates a block fitting `layout`.
    ///
    /// Zero-sized layouts must succeed and may return a dangling, well-aligned
    /// pointer.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Releases a block previously returned by `allocate`.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this allocator (or an equal one)
    /// with the same `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Whether memory allocated by `self` can be released through `other` and
    /// vice versa.
    ///
    /// Move-assignment uses this to decide between stealing storage and
    /// reallocating it.
    fn is_equal(&self, other: &Self) -> bool;
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }

    #[inline]
    fn is_equal(&self, other: &Self) -> bool {
        (**self).is_equal(*other)
    }
}

/// A well-aligned dangling pointer for zero-sized requests.
#[inline]
pub(crate) fn dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: alignments are never zero.
    unsafe { NonNull::new_unchecked(layout.align() as *mut u8) }
}

/// The process heap, via [`std::alloc`].
///
/// Stateless: every instance is interchangeable with every other.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

impl fmt::Debug for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Global")
    }
}

unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }
        // SAFETY: the layout has a non-zero size.
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::new(layout))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            std::alloc::dealloc(ptr.as_ptr(), layout)
        }
    }

    #[inline]
    fn is_equal(&self, _other: &Self) -> bool {
        true
    }
}
