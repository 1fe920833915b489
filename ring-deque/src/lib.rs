//! A bounded double-ended ring buffer.
//!
//! [`RingBuffer`] holds at most `capacity` elements in one fixed block of
//! storage. Pushing into a full buffer overwrites the element at the opposite
//! end, so the buffer always keeps the most recent `capacity` values:
//!
//! ```rust
//! use ring_deque::RingBuffer;
//!
//! # fn main() -> Result<(), ring_deque::Error> {
//! let mut buf = RingBuffer::new(3)?;
//! for i in 1..=5 {
//!     buf.push_back(i);
//! }
//! assert_eq!(buf, [3, 4, 5]);
//! assert_eq!(buf.push_front(0), Some(5));
//! assert_eq!(buf, [0, 3, 4]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Layout
//!
//! ```text
//!  slot:   0     1     2     3     4
//!        | 6   | 7   | 3   | 4   | 5   |
//!                      ^ head
//!                      ^ tail (full)
//!
//!        |segment two|  segment one    |
//! ```
//!
//! * Logical element `i` lives in slot `(head + i) % capacity`.
//! * The content is one contiguous run ([`RingBuffer::segment_one`]) or two
//!   ([`RingBuffer::segment_two`] holds the wrapped part).
//!   [`RingBuffer::linearize`] rotates it back into one.
//! * [`Cursor`] and [`Iter`] address positions by logical offset, with an
//!   end position one past the newest element.
//!
//! ### Storage
//!
//! Storage comes from an [`Allocator`]. [`Global`] is the process heap;
//! [`StackArena`] hands out memory from one fixed block and fails once it is
//! exhausted, which [`RingBuffer::new_in`] reports as [`Error::Alloc`].

pub mod alloc;
pub mod arena;
pub mod config;
pub mod cursor;
pub mod error;
pub mod iter;
pub mod ring_buffer;

mod buf;
mod macros;
mod utils;

pub use crate::alloc::{AllocError, Allocator, Global};
pub use crate::arena::StackArena;
pub use crate::config::ArenaConfig;
pub use crate::cursor::{Access, Cursor, CursorMut, Exclusive, Shared};
pub use crate::error::Error;
pub use crate::iter::{IntoIter, Iter, IterMut};
pub use crate::ring_buffer::{RingBuffer, DEFAULT_CAPACITY, MIN_CAPACITY};
