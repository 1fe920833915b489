use std::collections::VecDeque;
use std::hint::black_box;

use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use ring_deque::RingBuffer;

const CAPACITY: usize = 1024;
const N: usize = 100_000;

fn ring_deque() -> RingBuffer<usize> {
    RingBuffer::new(CAPACITY).unwrap()
}

fn vec_deque() -> VecDeque<usize> {
    VecDeque::with_capacity(CAPACITY)
}

#[library_benchmark]
#[bench::first(args = (), setup = ring_deque)]
fn bench_ring_deque(mut buf: RingBuffer<usize>) {
    for i in 0..N {
        black_box(buf.push_back(i));
    }
    black_box(buf);
}

#[library_benchmark]
#[bench::first(args = (), setup = vec_deque)]
fn bench_vec_deque(mut buf: VecDeque<usize>) {
    for i in 0..N {
        if buf.len() == CAPACITY {
            black_box(buf.pop_front());
        }
        buf.push_back(i);
    }
    black_box(buf);
}

#[library_benchmark]
fn bench_rtrb() {
    let (mut tx, mut rx) = rtrb::RingBuffer::new(CAPACITY);
    for i in 0..N {
        if tx.is_full() {
            black_box(rx.pop().ok());
        }
        tx.push(i).unwrap();
    }
    black_box((tx, rx));
}

library_benchmark_group!(name = bench_group; benchmarks = bench_ring_deque, bench_vec_deque, bench_rtrb);
main!(library_benchmark_groups = bench_group);
