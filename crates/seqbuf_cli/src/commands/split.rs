//! Split command implementation.
//!
//! Splits a file into delimited records with a [`Reader`], so records that
//! straddle segment boundaries come out whole.

use serde::Serialize;
use std::path::Path;

use seqbuf_core::{Reader, Sequence, WriterConfig};

use super::{load, OutputFormat};
use crate::error::CliResult;

/// Records found in a file.
#[derive(Debug, Serialize)]
pub struct SplitResult {
    /// Input path.
    pub path: String,
    /// Number of records found.
    pub record_count: usize,
    /// Bytes after the last delimiter.
    pub trailing_bytes: usize,
    /// The records, up to the requested limit.
    pub records: Vec<RecordInfo>,
}

/// One delimited record.
#[derive(Debug, Serialize)]
pub struct RecordInfo {
    /// Offset of the record's first byte in the file.
    pub offset: usize,
    /// Record length, delimiter excluded.
    pub length: usize,
    /// Number of segments the record spans.
    pub segments: usize,
    /// The record as text, with invalid UTF-8 replaced.
    pub text: String,
}

/// Splits `sequence` on `delimiter`, keeping at most `limit` records.
///
/// Every record is still counted past the limit.
pub fn split(
    path: &Path,
    sequence: &Sequence<u8>,
    delimiter: &[u8],
    limit: Option<usize>,
) -> SplitResult {
    let mut reader = Reader::new(sequence);
    let mut records = Vec::new();
    let mut record_count = 0;

    loop {
        let offset = reader.consumed();
        let Some(record) = reader.try_read_to(delimiter, true) else {
            break;
        };
        record_count += 1;
        if limit.map_or(true, |limit| records.len() < limit) {
            records.push(RecordInfo {
                offset,
                length: record.len(),
                segments: record.segment_count(),
                text: String::from_utf8_lossy(&record.to_vec()).into_owned(),
            });
        }
    }
    tracing::debug!(records = record_count, trailing = reader.remaining(), "split input");

    SplitResult {
        path: path.display().to_string(),
        record_count,
        trailing_bytes: reader.remaining(),
        records,
    }
}

/// Runs the split command.
pub fn run(
    path: &Path,
    config: WriterConfig,
    delimiter: &[u8],
    limit: Option<usize>,
    format: OutputFormat,
) -> CliResult<()> {
    let sequence = load(path, config)?;
    let result = split(path, &sequence, delimiter, limit);

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

fn print_text_output(result: &SplitResult) {
    println!("Input: {}", result.path);
    println!(
        "Records: {} ({} trailing bytes)",
        result.record_count, result.trailing_bytes
    );
    println!();
    for record in &result.records {
        println!(
            "{:>8}  {:>6}  {:>3}  {:?}",
            record.offset, record.length, record.segments, record.text
        );
    }
    if result.records.len() < result.record_count {
        println!("... {} more", result.record_count - result.records.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_text(text: &[u8], segment_size: usize) -> (NamedTempFile, Sequence<u8>) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text).unwrap();
        let config = WriterConfig::new().segment_size(segment_size);
        let sequence = load(file.path(), config).unwrap();
        (file, sequence)
    }

    #[test]
    fn split_crlf_records_across_segments() {
        let (file, sequence) = load_text(b"Hello\r\nWorld\r\ntail", 3);
        let result = split(file.path(), &sequence, b"\r\n", None);

        assert_eq!(result.record_count, 2);
        assert_eq!(result.trailing_bytes, 4);
        let texts: Vec<_> = result.records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "World"]);
        assert_eq!(result.records[1].offset, 7);
        assert!(result.records[0].segments > 1);
    }

    #[test]
    fn record_ending_at_segment_end_spans_one_segment() {
        let (file, sequence) = load_text(b"abc\r\ndef", 3);
        let result = split(file.path(), &sequence, b"\r\n", None);

        assert_eq!(result.record_count, 1);
        assert_eq!(result.records[0].text, "abc");
        assert_eq!(result.records[0].segments, 1);
        assert_eq!(result.trailing_bytes, 3);
    }

    #[test]
    fn split_respects_limit() {
        let (file, sequence) = load_text(b"a,b,c,d,", 2);
        let result = split(file.path(), &sequence, b",", Some(2));

        assert_eq!(result.record_count, 4);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.trailing_bytes, 0);
    }

    #[test]
    fn split_without_delimiter_leaves_everything_trailing() {
        let (file, sequence) = load_text(b"no delimiter here", 4);
        let result = split(file.path(), &sequence, b"\n", None);
        assert_eq!(result.record_count, 0);
        assert_eq!(result.trailing_bytes, 17);
        assert!(result.records.is_empty());
    }

    #[test]
    fn split_result_serializes() {
        let sequence = Sequence::from_vec(b"x\ny\n".to_vec());
        let result = split(Path::new("mem"), &sequence, b"\n", None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["record_count"], 2);
        assert_eq!(json["records"][1]["text"], "y");
    }
}
