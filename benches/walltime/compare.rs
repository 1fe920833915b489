use std::collections::VecDeque;
use std::hint::black_box;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use ring_deque::RingBuffer;
use ring_deque::StackArena;

const CAPACITY: usize = 1024;

fn ring_deque_harness(n: usize) {
    let mut buf = RingBuffer::new(CAPACITY).unwrap();
    for i in 0..n {
        black_box(buf.push_back(i));
    }
    black_box(buf.iter().sum::<usize>());
}

fn ring_deque_arena_harness(arena: &StackArena, n: usize) {
    let mut buf = RingBuffer::new_in(CAPACITY, arena).unwrap();
    for i in 0..n {
        black_box(buf.push_back(i));
    }
    black_box(buf.iter().sum::<usize>());
}

fn vec_deque_harness(n: usize) {
    let mut buf = VecDeque::with_capacity(CAPACITY);
    for i in 0..n {
        // Emulate overwrite-on-full.
        if buf.len() == CAPACITY {
            black_box(buf.pop_front());
        }
        buf.push_back(i);
    }
    black_box(buf.iter().sum::<usize>());
}

fn rtrb_harness(n: usize) {
    let (mut tx, mut rx) = rtrb::RingBuffer::new(CAPACITY);
    for i in 0..n {
        if tx.is_full() {
            black_box(rx.pop().ok());
        }
        tx.push(i).unwrap();
    }
    let mut sum = 0usize;
    while let Ok(v) = rx.pop() {
        sum += v;
    }
    black_box(sum);
}

fn push_overwrite_comparison(c: &mut Criterion) {
    let arena = StackArena::new(CAPACITY * std::mem::size_of::<usize>()).unwrap();
    let mut bgroup = c.benchmark_group("push_overwrite");

    for n in [1_000, 100_000, 1_000_000] {
        bgroup.bench_with_input(BenchmarkId::new("ring_deque", n), &n, |b, &n| {
            b.iter(|| ring_deque_harness(n))
        });
        bgroup.bench_with_input(BenchmarkId::new("ring_deque_arena", n), &n, |b, &n| {
            b.iter(|| ring_deque_arena_harness(&arena, n))
        });
        bgroup.bench_with_input(BenchmarkId::new("vec_deque", n), &n, |b, &n| {
            b.iter(|| vec_deque_harness(n))
        });
        bgroup.bench_with_input(BenchmarkId::new("rtrb", n), &n, |b, &n| {
            b.iter(|| rtrb_harness(n))
        });
    }

    bgroup.finish();
}

fn random_access(c: &mut Criterion) {
    let mut buf = RingBuffer::new(CAPACITY).unwrap();
    buf.extend(0..CAPACITY + CAPACITY / 2);
    let deque: VecDeque<usize> = buf.iter().copied().collect();

    let mut bgroup = c.benchmark_group("random_access");
    bgroup.bench_function("ring_deque/index", |b| {
        b.iter(|| (0..CAPACITY).step_by(7).map(|i| buf[i]).sum::<usize>())
    });
    bgroup.bench_function("ring_deque/cursor", |b| {
        let begin = buf.begin();
        b.iter(|| {
            (0..CAPACITY as isize)
                .step_by(7)
                .filter_map(|i| begin.at(i).copied())
                .sum::<usize>()
        })
    });
    bgroup.bench_function("vec_deque/index", |b| {
        b.iter(|| (0..CAPACITY).step_by(7).map(|i| deque[i]).sum::<usize>())
    });
    bgroup.bench_function("ring_deque/linearize", |b| {
        b.iter(|| {
            buf.push_back(black_box(0));
            black_box(buf.linearize().len())
        })
    });
    bgroup.finish();
}

criterion_group!(benches, push_overwrite_comparison, random_access);
criterion_main!(benches);
