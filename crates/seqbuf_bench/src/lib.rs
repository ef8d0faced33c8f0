//! Benchmark utilities.

#![warn(missing_docs)]

use rand::Rng;
use seqbuf_core::Sequence;

/// Generate random data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate CRLF-terminated lines of random lowercase text.
pub fn random_lines(count: usize, max_len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut text = Vec::new();
    for _ in 0..count {
        let len = rng.gen_range(0..=max_len);
        text.extend((0..len).map(|_| rng.gen_range(b'a'..=b'z')));
        text.extend_from_slice(b"\r\n");
    }
    text
}

/// Cut `data` into segments of exactly `segment_size` bytes (the last may
/// be shorter).
pub fn segmented(data: &[u8], segment_size: usize) -> Sequence<u8> {
    Sequence::from_segments(data.chunks(segment_size.max(1)).map(<[u8]>::to_vec))
}

/// Cut `data` into segments of random length between 1 and `max_segment`.
pub fn randomly_segmented(data: &[u8], max_segment: usize) -> Sequence<u8> {
    let mut rng = rand::thread_rng();
    let mut parts = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        let len = rng.gen_range(1..=max_segment.max(1)).min(rest.len());
        let (head, tail) = rest.split_at(len);
        parts.push(head.to_vec());
        rest = tail;
    }
    Sequence::from_segments(parts)
}
