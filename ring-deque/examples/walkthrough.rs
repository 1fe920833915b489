use std::fmt::Display;

use ring_deque::RingBuffer;

fn print<T: Display>(buf: &RingBuffer<T>) {
    let elems: Vec<String> = buf.iter().map(ToString::to_string).collect();
    println!("{}", elems.join(" "));
    println!(
        "--- head={} tail={} size={}",
        buf.head(),
        buf.tail(),
        buf.len()
    );
}

fn main() -> anyhow::Result<()> {
    let buf = RingBuffer::<i32>::new(5)?;
    println!("is_empty: {}", buf.is_empty());
    assert_eq!(buf.begin(), buf.end());

    let mut buf = RingBuffer::new(5)?;
    for i in 1..=8 {
        println!("# push_back");
        if let Some(evicted) = buf.push_back(i) {
            println!("(overwrote {evicted})");
        }
        print(&buf);
    }
    for _ in 0..3 {
        println!("# pop_front");
        buf.pop_front();
        print(&buf);
    }

    println!();

    let mut buf = RingBuffer::new(5)?;
    for i in 1..=8 {
        println!("# push_front");
        buf.push_front(i);
        print(&buf);
    }
    for _ in 0..3 {
        println!("# pop_back");
        buf.pop_back();
        print(&buf);
    }

    Ok(())
}
