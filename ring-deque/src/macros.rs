/// Builds a [`RingBuffer`](crate::RingBuffer) of the given capacity from a
/// list of values, pushed to the back in order.
///
/// Evaluates to `Result<RingBuffer<_>, Error>`, failing the same way
/// [`RingBuffer::new`](crate::RingBuffer::new) does.
///
/// ```rust
/// # fn main() -> Result<(), ring_deque::Error> {
/// let buf = ring_deque::ring_buffer![3; 1, 2, 3, 4]?;
/// assert_eq!(buf, [2, 3, 4]);
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! ring_buffer {
    ($capacity:expr) => {
        $crate::RingBuffer::new($capacity)
    };
    ($capacity:expr; $($value:expr),* $(,)?) => {{
        $crate::RingBuffer::new($capacity).map(|mut buf| {
            $(buf.push_back($value);)*
            buf
        })
    }};
}
