use thiserror::Error;

use crate::alloc::AllocError;
use crate::ring_buffer::MIN_CAPACITY;

/// Errors surfaced by buffer construction, copying and move-assignment.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("ring buffer capacity must be at least {min}, got {0}", min = MIN_CAPACITY)]
    CapacityTooSmall(usize),

    #[error("ring buffer capacity {0} does not fit in the address space")]
    CapacityOverflow(usize),

    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error("arena alignment must be a power of two, got {0}")]
    InvalidAlignment(usize),
}
