//! A bounded bump allocator.
//!
//! `StackArena` hands out increasing offsets from one fixed block. Memory is
//! only reclaimed when the most recent allocation is released first, which
//! suits buffers created and dropped in LIFO order. Everything else is
//! reclaimed when the arena itself is dropped.
//!
//! ```
//! use ring_deque::{RingBuffer, StackArena};
//!
//! let arena = StackArena::new(256)?;
//! {
//!     let mut buf = RingBuffer::<u32, _>::new_in(4, &arena)?;
//!     buf.push_back(1);
//!     assert_eq!(arena.usage(), 16);
//! }
//! assert_eq!(arena.usage(), 0);
//! # Ok::<(), ring_deque::Error>(())
//! ```

use std::alloc::Layout;
use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;

use crate::alloc::{AllocError, Allocator, Global};
use crate::config::ArenaConfig;
use crate::error::Error;

pub struct StackArena {
    block: NonNull<u8>,
    layout: Layout,
    top: Cell<usize>,
}

// SAFETY: the arena owns its block. `Cell` keeps it `!Sync`.
unsafe impl Send for StackArena {}

impl StackArena {
    /// Reserves `capacity` bytes with the default alignment.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Self::with_config(ArenaConfig::default().capacity(capacity))
    }

    pub fn with_config(config: ArenaConfig) -> Result<Self, Error> {
        if !config.alignment.is_power_of_two() {
            return Err(Error::InvalidAlignment(config.alignment));
        }
        let layout = Layout::from_size_align(config.capacity, config.alignment)
            .map_err(|_| Error::CapacityOverflow(config.capacity))?;
        let block = Global.allocate(layout)?;
        log::trace!(
            "stack arena reserved {} bytes aligned to {}",
            layout.size(),
            layout.align()
        );

        Ok(Self {
            block,
            layout,
            top: Cell::new(0),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    /// Bytes currently handed out, including alignment padding.
    #[inline]
    pub fn usage(&self) -> usize {
        self.top.get()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.usage()
    }

    #[inline]
    fn round_up(&self, bytes: usize) -> Option<usize> {
        let mask = self.alignment() - 1;
        bytes.checked_add(mask).map(|bytes| bytes & !mask)
    }

    #[inline]
    fn contains(&self, ptr: NonNull<u8>) -> bool {
        let offset = (ptr.as_ptr() as usize).wrapping_sub(self.block.as_ptr() as usize);
        offset <= self.capacity()
    }
}

unsafe impl Allocator for StackArena {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.align() > self.alignment() {
            log::debug!(
                "stack arena cannot align to {} (arena alignment is {})",
                layout.align(),
                self.alignment()
            );
            return Err(AllocError::new(layout));
        }

        let top = self.top.get();
        let needed = self.round_up(layout.size()).ok_or(AllocError::new(layout))?;
        if needed > self.capacity() - top {
            log::debug!(
                "stack arena exhausted: requested {} bytes, {} of {} in use",
                layout.size(),
                top,
                self.capacity()
            );
            return Err(AllocError::new(layout));
        }

        self.top.set(top + needed);
        // SAFETY: `top + needed <= capacity`, so the result stays inside the block.
        Ok(unsafe { NonNull::new_unchecked(self.block.as_ptr().add(top)) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        debug_assert!(self.contains(ptr), "pointer does not belong to this arena");

        let Some(size) = self.round_up(layout.size()) else {
            return;
        };
        let offset = ptr.as_ptr() as usize - self.block.as_ptr() as usize;
        // Only the newest block can be given back.
        if offset + size == self.top.get() {
            self.top.set(offset);
        }
    }

    #[inline]
    fn is_equal(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl PartialEq for StackArena {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for StackArena {}

impl fmt::Debug for StackArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackArena")
            .field("capacity", &self.capacity())
            .field("alignment", &self.alignment())
            .field("usage", &self.usage())
            .finish()
    }
}

impl Drop for StackArena {
    fn drop(&mut self) {
        // SAFETY: the block came from `Global` with this layout.
        unsafe { Global.deallocate(self.block, self.layout) }
    }
}
