use ring_deque::{ArenaConfig, Error, RingBuffer, StackArena};

fn main() -> anyhow::Result<()> {
    let arena = StackArena::with_config(ArenaConfig::new().capacity(256).alignment(8))?;

    let mut samples = RingBuffer::<u64, _>::new_in(8, &arena)?;
    let mut events = RingBuffer::<u16, _>::new_in(16, &arena)?;
    println!("arena usage after two buffers: {}/{}", arena.usage(), arena.capacity());

    for i in 0..20u64 {
        samples.push_back(i * i);
        events.push_front(i as u16);
    }
    println!("latest samples: {samples:?}");
    println!("events, newest first: {events:?}");

    // 8 + 16 slots used 96 bytes; the next buffer does not fit.
    match RingBuffer::<u64, _>::new_in(32, &arena) {
        Err(Error::Alloc(err)) => println!("third buffer rejected: {err}"),
        Ok(_) => anyhow::bail!("arena should have been exhausted"),
        Err(err) => return Err(err.into()),
    }

    let mut heap = RingBuffer::new(8)?;
    heap.assign_from(&mut samples.clone_in(ring_deque::Global)?)?;
    println!("copied to the heap: {heap:?}");

    drop(events);
    println!("arena usage after dropping events: {}", arena.usage());

    Ok(())
}
