//! Byte buffers read through [`bytes::Buf`].
//!
//! A `RingBuffer<u8>` works as a bounded byte log: writers `extend` it, and
//! readers consume the oldest bytes chunk by chunk without linearizing.

use std::io::IoSlice;

use bytes::Buf;

use crate::alloc::Allocator;
use crate::ring_buffer::RingBuffer;

impl<A: Allocator> Buf for RingBuffer<u8, A> {
    #[inline]
    fn remaining(&self) -> usize {
        self.len()
    }

    #[inline]
    fn chunk(&self) -> &[u8] {
        self.segment_one()
    }

    fn chunks_vectored<'a>(&'a self, dst: &mut [IoSlice<'a>]) -> usize {
        let mut filled = 0;
        for (slot, segment) in dst.iter_mut().zip([self.segment_one(), self.segment_two()]) {
            if segment.is_empty() {
                break;
            }
            *slot = IoSlice::new(segment);
            filled += 1;
        }
        filled
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.len(),
            "cannot advance past `remaining`: {} <= {}",
            cnt,
            self.len()
        );
        self.discard_front(cnt);
    }
}
