//! Inspect command implementation.

use serde::Serialize;
use std::path::Path;

use seqbuf_core::{Sequence, WriterConfig};

use super::{load, OutputFormat};
use crate::error::CliResult;

/// Layout of a file once loaded into segments.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Input path.
    pub path: String,
    /// Total number of bytes.
    pub length: usize,
    /// Number of segments.
    pub segment_count: usize,
    /// Whether the data fits in one segment.
    pub single_segment: bool,
    /// Per-segment details (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentInfo>>,
}

/// One segment of the loaded file.
#[derive(Debug, Serialize)]
pub struct SegmentInfo {
    /// Zero-based segment number.
    pub index: usize,
    /// Offset of the segment's first byte in the file.
    pub offset: usize,
    /// Number of bytes in the segment.
    pub length: usize,
    /// Up to 16 leading bytes, hex encoded.
    pub head: String,
}

/// Describes how `sequence` is laid out.
pub fn inspect(path: &Path, sequence: &Sequence<u8>, show_segments: bool) -> InspectResult {
    let segments = show_segments.then(|| {
        let mut offset = 0;
        sequence
            .segments()
            .enumerate()
            .map(|(index, segment)| {
                let info = SegmentInfo {
                    index,
                    offset,
                    length: segment.len(),
                    head: hex_prefix(segment, 16),
                };
                offset += segment.len();
                info
            })
            .collect()
    });

    InspectResult {
        path: path.display().to_string(),
        length: sequence.len(),
        segment_count: sequence.segment_count(),
        single_segment: sequence.is_single_segment(),
        segments,
    }
}

/// Runs the inspect command.
pub fn run(
    path: &Path,
    config: WriterConfig,
    show_segments: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let sequence = load(path, config)?;
    let result = inspect(path, &sequence, show_segments);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn hex_prefix(bytes: &[u8], limit: usize) -> String {
    let mut text: String = bytes
        .iter()
        .take(limit)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    if bytes.len() > limit {
        text.push_str("..");
    }
    text
}

fn print_text_output(result: &InspectResult) {
    println!("Input: {}", result.path);
    println!();
    println!("Layout:");
    println!("  Length:         {} bytes", result.length);
    println!("  Segments:       {}", result.segment_count);
    println!("  Single segment: {}", result.single_segment);

    if let Some(segments) = &result.segments {
        println!();
        println!("Segments:");
        for segment in segments {
            println!(
                "  #{:<4} offset {:>8}  len {:>6}  {}",
                segment.index, segment.offset, segment.length, segment.head
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn inspect_reports_layout() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xab; 10]).unwrap();

        let sequence = load(file.path(), WriterConfig::new().segment_size(4)).unwrap();
        let result = inspect(file.path(), &sequence, true);

        assert_eq!(result.length, 10);
        assert_eq!(result.segment_count, 3);
        assert!(!result.single_segment);

        let segments = result.segments.unwrap();
        let offsets: Vec<_> = segments.iter().map(|s| (s.offset, s.length)).collect();
        assert_eq!(offsets, vec![(0, 4), (4, 4), (8, 2)]);
        assert_eq!(segments[2].head, "abab");
    }

    #[test]
    fn inspect_without_segments_skips_details() {
        let sequence = Sequence::from_vec(b"abc".to_vec());
        let result = inspect(Path::new("mem"), &sequence, false);
        assert!(result.segments.is_none());
        assert!(result.single_segment);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("segments").is_none());
        assert_eq!(json["length"], 3);
    }

    #[test]
    fn hex_prefix_truncates() {
        assert_eq!(hex_prefix(&[1, 2, 3], 2), "0102..");
        assert_eq!(hex_prefix(&[0xff], 16), "ff");
        assert_eq!(hex_prefix(&[], 16), "");
    }
}
