//! Property tests: every operation gives the same answer regardless of how
//! the payload is cut into segments.

use proptest::prelude::*;
use seqbuf_core::{BufferWriterExt, Reader, SegmentWriter, Sequence, WriterConfig};
use seqbuf_testkit::prelude::*;
use std::cmp::Ordering;

fn signed(value: usize) -> isize {
    isize::try_from(value).unwrap()
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn chained_matches_payload(segmented in segmented_strategy()) {
        let seq = segmented.chained();
        prop_assert_eq!(seq.len(), segmented.data.len());
        prop_assert_eq!(seq.is_empty(), segmented.data.is_empty());
        prop_assert_eq!(seq.to_vec(), segmented.data.clone());
        prop_assert_eq!(seq.iter().copied().collect::<Vec<_>>(), segmented.data.clone());
        prop_assert_eq!(seq.segments().collect::<Vec<_>>().concat(), segmented.data.clone());
        prop_assert_eq!(&seq, &segmented.contiguous());
        prop_assert_eq!(&Sequence::from_vec(seq.to_vec()), &seq);
    }

    #[test]
    fn slice_length_equals_distance((segmented, a, b) in segmented_with_range()) {
        for seq in [segmented.chained(), segmented.contiguous()] {
            let start = seq.get_position(seq.start(), signed(a)).unwrap();
            let end = seq.get_position(seq.start(), signed(b)).unwrap();
            let slice = seq.slice(start, end).unwrap();

            prop_assert_eq!(slice.len(), seq.distance(start, end).unwrap());
            prop_assert_eq!(slice.len(), b - a);
            prop_assert_eq!(slice.to_vec(), segmented.data[a..b].to_vec());
            prop_assert_eq!(seq.offset_of(start).unwrap(), a);
            prop_assert_eq!(seq.compare(start, end).unwrap(), a.cmp(&b));

            let ranged = seq.slice_range(signed(a), signed(b - a)).unwrap();
            prop_assert_eq!(&ranged, &slice);
        }
    }

    #[test]
    fn slice_positions_stay_valid_in_parent((segmented, a, b) in segmented_with_range()) {
        let seq = segmented.chained();
        let slice = seq.slice_range(signed(a), signed(b - a)).unwrap();

        // Positions taken from the slice name the same elements in the parent.
        prop_assert_eq!(seq.offset_of(slice.start()).unwrap(), a);
        prop_assert_eq!(seq.offset_of(slice.end()).unwrap(), b);
        prop_assert_eq!(seq.compare(slice.start(), slice.end()).unwrap(), a.cmp(&b));
        let tail = seq.slice_from(slice.end()).unwrap();
        prop_assert_eq!(tail.to_vec(), segmented.data[b..].to_vec());
    }

    #[test]
    fn segment_count_matches_enumeration((segmented, a, b) in segmented_with_range()) {
        let seq = segmented.chained();
        let slice = seq.slice_range(signed(a), signed(b - a)).unwrap();
        let mut reader = Reader::new(&seq);
        reader.advance(signed(a)).unwrap();
        let mut record_reader = Reader::new(&seq);
        let record = record_reader.try_read_to(b"\r\n", false);

        for view in [seq.clone(), slice].into_iter().chain(record).chain([reader.unread_sequence()]) {
            let parts: Vec<&[u8]> = view.segments().collect();
            prop_assert_eq!(parts.len(), view.segment_count());
            prop_assert_eq!(view.is_single_segment(), view.segment_count() == 1);
            if !view.is_empty() {
                prop_assert!(!parts[0].is_empty());
                prop_assert!(!parts[parts.len() - 1].is_empty());
                prop_assert_eq!(view.first(), parts[0]);
            }
        }
    }

    #[test]
    fn past_the_end_offsets_fail((segmented, a, _b) in segmented_with_range()) {
        let seq = segmented.chained();
        let overshoot = segmented.data.len() - a + 1;
        let start = seq.get_position(seq.start(), signed(a)).unwrap();
        prop_assert!(seq.get_position(start, signed(overshoot)).is_err());
        prop_assert!(seq.get_position(start, -1).is_err());
    }

    #[test]
    fn records_are_layout_independent(segmented in segmented_text_strategy()) {
        let expected = naive_records(&segmented.data, b"\r\n");
        prop_assert_eq!(read_records(&segmented.chained(), b"\r\n"), expected.clone());
        prop_assert_eq!(read_records(&segmented.contiguous(), b"\r\n"), expected);
    }

    #[test]
    fn integers_are_layout_independent(segmented in segmented_strategy()) {
        prop_assert_eq!(read_u32s(&segmented.chained()), read_u32s(&segmented.contiguous()));

        for width in [1, 2, 4, 8] {
            let chained = segmented.chained();
            let contiguous = segmented.contiguous();
            let mut a = Reader::new(&chained);
            let mut b = Reader::new(&contiguous);
            loop {
                let left = a.try_read_big_endian(width).unwrap();
                prop_assert_eq!(left, b.try_read_big_endian(width).unwrap());
                prop_assert_eq!(a.try_read_little_endian(width).unwrap(), b.try_read_little_endian(width).unwrap());
                if left.is_none() {
                    break;
                }
            }
            prop_assert!(a.remaining() < width);
        }
    }

    #[test]
    fn reader_exhausts_exactly(segmented in segmented_strategy()) {
        let seq = segmented.chained();
        let mut reader = Reader::new(&seq);
        let mut seen = Vec::new();
        while let Some(byte) = reader.try_read() {
            prop_assert_eq!(reader.consumed() + reader.remaining(), seq.len());
            seen.push(byte);
        }
        prop_assert!(reader.end());
        prop_assert_eq!(seen, segmented.data);
        prop_assert!(reader.unread_sequence().is_empty());
        prop_assert!(reader.advance(1).is_err());
        prop_assert_eq!(reader.consumed(), seq.len());
    }

    #[test]
    fn failed_reads_leave_reader_untouched((segmented, a, _b) in segmented_with_range()) {
        let seq = segmented.chained();
        let mut reader = Reader::new(&seq);
        reader.advance(signed(a)).unwrap();

        let position = reader.position();
        let consumed = reader.consumed();
        if reader.remaining() < 8 {
            prop_assert!(reader.try_read_u64_be().is_none());
        }
        if !segmented.data[a..].windows(3).any(|w| w == b"\xff\xfe\xfd") {
            prop_assert!(reader.try_read_to(b"\xff\xfe\xfd", true).is_none());
            prop_assert!(!reader.try_advance_to(b"\xff\xfe\xfd", false));
        }
        prop_assert!(reader.advance(signed(reader.remaining() + 1)).is_err());

        prop_assert_eq!(reader.consumed(), consumed);
        prop_assert_eq!(seq.compare(reader.position(), position).unwrap(), Ordering::Equal);
        prop_assert_eq!(reader.unread_sequence().to_vec(), segmented.data[a..].to_vec());
    }

    #[test]
    fn streaming_retry_sees_the_same_record((segmented, a, _b) in segmented_with_range()) {
        // A reader over a prefix either finds what the full reader finds, or
        // nothing; it never invents a different record.
        let full = segmented.chained();
        let prefix = full.slice_range(0, signed(a)).unwrap();

        let from_prefix = Reader::new(&prefix).try_read_to(b"\r\n", true).map(|s| s.to_vec());
        let from_full = Reader::new(&full).try_read_to(b"\r\n", true).map(|s| s.to_vec());
        if from_prefix.is_some() {
            prop_assert_eq!(from_prefix, from_full);
        }
    }

    #[test]
    fn segment_writer_preserves_bytes(data in payload_strategy(), segment_size in 1usize..32) {
        let config = WriterConfig::new().segment_size(segment_size);
        let mut writer = SegmentWriter::<u8>::with_config(config).unwrap();
        writer.write(&data).unwrap();
        prop_assert_eq!(writer.written_count(), data.len());

        let seq: Sequence<u8> = writer.into_sequence();
        prop_assert_eq!(seq.to_vec(), data.clone());
        for segment in seq.segments() {
            prop_assert!(segment.len() <= segment_size);
        }
    }

    #[test]
    fn fuzz_targets_hold(data in prop::collection::vec(any::<u8>(), 0..128)) {
        fuzz_reader(&data);
        fuzz_slicing(&data);
        fuzz_segment_writer(&data);
    }
}
