/// Default size of a [`StackArena`](crate::StackArena) block, in bytes.
pub const DEFAULT_ARENA_CAPACITY: usize = 4096;

/// Default arena alignment. Matches the strictest fundamental alignment on
/// mainstream 64-bit targets.
pub const DEFAULT_ALIGNMENT: usize = 16;

/// Configuration of a [`StackArena`](crate::StackArena).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    /// Size of the backing block in bytes.
    pub capacity: usize,
    /// Every allocation is rounded up to, and aligned on, this many bytes.
    /// Must be a power of two.
    pub alignment: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_ARENA_CAPACITY,
            alignment: DEFAULT_ALIGNMENT,
        }
    }
}

impl ArenaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }
}
