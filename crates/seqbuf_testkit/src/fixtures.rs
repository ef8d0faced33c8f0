//! Test fixtures and reader helpers.
//!
//! Provides the canonical multi-segment layouts used across the test suite
//! and small drivers that run a [`Reader`] to completion.

use seqbuf_core::{Reader, Sequence};

/// `"He"`, `"llo"`, `"\r\nWorld"` as three segments.
pub fn hello_world() -> Sequence<u8> {
    Sequence::from_segments([b"He".to_vec(), b"llo".to_vec(), b"\r\nWorld".to_vec()])
}

/// The big-endian `u32` value 5 split as `[0, 0]` then `[0, 5]`.
pub fn split_u32_five() -> Sequence<u8> {
    Sequence::from_segments([vec![0x00, 0x00], vec![0x00, 0x05]])
}

/// Every byte of `data` in its own segment.
pub fn one_byte_segments(data: &[u8]) -> Sequence<u8> {
    Sequence::from_segments(data.iter().map(|&byte| vec![byte]))
}

/// Reads delimited records until the delimiter no longer occurs.
///
/// Returns the records and the unread tail.
pub fn read_records(sequence: &Sequence<u8>, delimiter: &[u8]) -> (Vec<Vec<u8>>, Vec<u8>) {
    let mut reader = Reader::new(sequence);
    let mut records = Vec::new();
    while let Some(record) = reader.try_read_to(delimiter, true) {
        records.push(record.to_vec());
        if delimiter.is_empty() {
            break;
        }
    }
    (records, reader.unread_sequence().to_vec())
}

/// Splits `data` on `delimiter` with a plain slice search.
///
/// Used as the reference answer for [`read_records`].
pub fn naive_records(data: &[u8], delimiter: &[u8]) -> (Vec<Vec<u8>>, Vec<u8>) {
    let mut records = Vec::new();
    let mut rest = data;
    if delimiter.is_empty() {
        return (vec![Vec::new()], data.to_vec());
    }
    while let Some(index) = rest
        .windows(delimiter.len())
        .position(|window| window == delimiter)
    {
        records.push(rest[..index].to_vec());
        rest = &rest[index + delimiter.len()..];
    }
    (records, rest.to_vec())
}

/// Reads big-endian `u32`s until fewer than four bytes remain.
///
/// Returns the values and the number of bytes left unread.
pub fn read_u32s(sequence: &Sequence<u8>) -> (Vec<u32>, usize) {
    let mut reader = Reader::new(sequence);
    let mut values = Vec::new();
    while let Some(value) = reader.try_read_u32_be() {
        values.push(value);
    }
    (values, reader.remaining())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world_layout() {
        let seq = hello_world();
        assert_eq!(seq.segment_count(), 3);
        assert_eq!(seq.len(), 12);
    }

    #[test]
    fn records_match_naive_split() {
        let seq = hello_world();
        let expected = naive_records(b"Hello\r\nWorld", b"\r\n");
        assert_eq!(read_records(&seq, b"\r\n"), expected);
        assert_eq!(expected.0, vec![b"Hello".to_vec()]);
        assert_eq!(expected.1, b"World".to_vec());
    }

    #[test]
    fn one_byte_segments_round_trip() {
        let seq = one_byte_segments(b"abc");
        assert_eq!(seq.segment_count(), 3);
        assert_eq!(seq.to_vec(), b"abc");
    }

    #[test]
    fn read_u32s_reports_tail() {
        let seq = one_byte_segments(&[0, 0, 0, 1, 0, 0, 0, 2, 9]);
        assert_eq!(read_u32s(&seq), (vec![1, 2], 1));
    }
}
