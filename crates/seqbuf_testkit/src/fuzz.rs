//! Fuzz targets for seqbuf.
//!
//! These can be driven by cargo-fuzz or any other fuzzer that hands out
//! byte slices. Each target must never panic.

use seqbuf_core::{BufferWriter, Reader, SegmentWriter, Sequence, WriterConfig};

use crate::generators::split_at;

/// Derives a segment layout from the fuzz input itself.
///
/// The first byte picks the number of cuts and the following bytes pick
/// their offsets; the rest is the payload.
fn layout(data: &[u8]) -> (Vec<u8>, Vec<usize>) {
    let Some((&count, rest)) = data.split_first() else {
        return (Vec::new(), Vec::new());
    };
    let count = usize::from(count % 8).min(rest.len());
    let (cuts, payload) = rest.split_at(count);
    let cuts = cuts
        .iter()
        .map(|&cut| usize::from(cut) % (payload.len() + 1))
        .collect();
    (payload.to_vec(), cuts)
}

/// Fuzz target for the reader.
///
/// Runs every read the reader offers over a chained layout and checks the
/// results against the contiguous layout of the same bytes.
pub fn fuzz_reader(data: &[u8]) {
    let (payload, cuts) = layout(data);
    let chained = Sequence::from_segments(split_at(&payload, &cuts));
    let contiguous = Sequence::from_slice(&payload);

    let mut a = Reader::new(&chained);
    let mut b = Reader::new(&contiguous);
    loop {
        assert_eq!(a.try_read_u16_be(), b.try_read_u16_be());
        assert_eq!(
            a.try_read_to(b"\r\n", true).map(|s| s.to_vec()),
            b.try_read_to(b"\r\n", true).map(|s| s.to_vec())
        );
        assert_eq!(a.advance_past(b' '), b.advance_past(b' '));
        assert_eq!(a.try_read_u32_le(), b.try_read_u32_le());
        assert_eq!(a.consumed(), b.consumed());
        if a.try_read().is_none() {
            assert!(b.try_read().is_none());
            break;
        }
        b.try_read();
    }
    assert!(a.end() && b.end());
}

/// Fuzz target for slicing.
///
/// Uses the leading bytes as offsets and checks that slicing a chained
/// sequence never panics and agrees with slicing the bytes directly.
pub fn fuzz_slicing(data: &[u8]) {
    let (payload, cuts) = layout(data);
    let seq = Sequence::from_segments(split_at(&payload, &cuts));
    let len = payload.len();

    for window in data.windows(2) {
        let offset = usize::from(window[0]);
        let length = usize::from(window[1]);
        match seq.slice_range(isize::from(window[0]), isize::from(window[1])) {
            Ok(slice) => assert_eq!(slice.to_vec(), payload[offset..offset + length]),
            Err(_) => assert!(offset + length > len),
        }
    }
}

/// Fuzz target for the segmented writer.
///
/// Writes the payload in chunks sized by its own bytes and checks the
/// produced sequence holds exactly what was written.
pub fn fuzz_segment_writer(data: &[u8]) {
    let config = WriterConfig::new().segment_size(16).max_segment_size(256);
    let Ok(mut writer) = SegmentWriter::<u8>::with_config(config) else {
        return;
    };
    let mut rest = data;
    while let Some(&size) = rest.first() {
        let chunk = usize::from(size).clamp(1, rest.len());
        let Ok(buffer) = writer.get_buffer(chunk) else {
            return;
        };
        buffer[..chunk].copy_from_slice(&rest[..chunk]);
        if writer.advance(chunk).is_err() {
            return;
        }
        rest = &rest[chunk..];
    }
    assert_eq!(writer.into_sequence().to_vec(), data);
}
