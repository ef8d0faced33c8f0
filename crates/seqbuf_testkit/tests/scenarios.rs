//! End-to-end scenarios across sequences, readers and writers.

use seqbuf_core::{
    ArrayWriter, BufferWriter, ByteWriterExt, ChainBuilder, Reader, SegmentWriter, Sequence,
    SequenceError, WriterConfig,
};
use seqbuf_testkit::prelude::*;

#[test]
fn line_split_across_three_segments() {
    let seq = hello_world();
    let mut reader = Reader::new(&seq);

    let line = reader.try_read_to(b"\r\n", true).unwrap();
    assert_eq!(line, *b"Hello");
    assert!(!line.is_single_segment());
    assert_eq!(reader.consumed(), 7);

    let rest = reader.unread_sequence();
    assert_eq!(rest.first(), b"World");
    assert_eq!(rest, *b"World");
}

#[test]
fn big_endian_value_split_across_segments() {
    let seq = split_u32_five();
    let mut reader = Reader::new(&seq);

    assert_eq!(reader.try_read_big_endian(4).unwrap(), Some(5));
    assert_eq!(reader.consumed(), 4);
    assert!(reader.end());
}

#[test]
fn over_commit_is_a_protocol_violation() {
    let mut writer = ArrayWriter::<u8>::new();
    writer.get_buffer(5).unwrap();
    let err = writer.advance(10).unwrap_err();
    assert_eq!(
        err,
        SequenceError::ProtocolViolation {
            advanced: 10,
            granted: 5
        }
    );
    assert_eq!(writer.written_count(), 0);

    let mut writer = SegmentWriter::<u8>::new();
    writer.get_buffer(5).unwrap();
    assert!(matches!(
        writer.advance(10),
        Err(SequenceError::ProtocolViolation { .. })
    ));
    assert_eq!(writer.written_count(), 0);
}

#[test]
fn negative_offset_is_invalid() {
    let seq = hello_world();
    assert!(matches!(
        seq.get_position(seq.start(), -1),
        Err(SequenceError::InvalidArgument { .. })
    ));
    assert!(matches!(
        seq.slice_range(-1, 2),
        Err(SequenceError::InvalidArgument { .. })
    ));
}

#[test]
fn writer_output_parses_back() {
    let config = WriterConfig::new().segment_size(3);
    let mut writer = SegmentWriter::<u8>::with_config(config).unwrap();
    writer.write_u32_be(0xDEAD_BEEF).unwrap();
    writer.write_u16_be(7).unwrap();
    writer.write_u8(0xFF).unwrap();
    writer.write_u64_be(u64::MAX - 1).unwrap();

    let seq = writer.into_sequence();
    assert!(seq.segment_count() > 1);

    let mut reader = Reader::new(&seq);
    assert_eq!(reader.try_read_u32_be(), Some(0xDEAD_BEEF));
    assert_eq!(reader.try_read_u16_be(), Some(7));
    assert_eq!(reader.try_read_u8(), Some(0xFF));
    assert_eq!(reader.try_read_u64_be(), Some(u64::MAX - 1));
    assert!(reader.end());
}

#[test]
fn streaming_parse_retries_after_more_data() {
    // Data arrives in three pieces; each attempt sees everything so far.
    let pieces: [&[u8]; 3] = [b"GET /", b"index\r", b"\nHost"];
    let mut attempts = Vec::new();

    for arrived in 1..=pieces.len() {
        let mut builder = ChainBuilder::<u8>::with_capacity(arrived);
        for piece in &pieces[..arrived] {
            builder.append(piece.to_vec());
        }
        let seq = Sequence::from_whole_chain(&builder.build());
        let mut reader = Reader::new(&seq);
        let line = reader.try_read_to(b"\r\n", true);
        if line.is_none() {
            assert_eq!(reader.consumed(), 0);
        }
        attempts.push(line.map(|l| l.to_vec()));
    }

    assert_eq!(attempts, vec![None, None, Some(b"GET /index".to_vec())]);
}

#[test]
fn one_byte_segments_read_like_contiguous_memory() {
    let data = b"key: value\r\n\r\n";
    let seq = one_byte_segments(data);
    let mut reader = Reader::new(&seq);

    let key = reader.try_read_to(b": ", true).unwrap();
    assert_eq!(key, *b"key");
    let value = reader.try_read_to(b"\r\n", true).unwrap();
    assert_eq!(value, *b"value");
    assert!(reader.is_next(b"\r\n", true));
    assert!(reader.end());
}

#[test]
fn foreign_positions_are_rejected() {
    let a = hello_world();
    let b = hello_world();
    assert!(matches!(
        a.slice(b.start(), a.end()),
        Err(SequenceError::InvalidArgument { .. })
    ));
    assert!(a.compare(a.start(), b.end()).is_err());
}
