//! CLI command implementations.

pub mod inspect;
pub mod split;

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use clap::ValueEnum;
use seqbuf_core::{BufferWriter, SegmentWriter, Sequence, WriterConfig};

use crate::error::{CliError, CliResult};

/// Output format shared by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Reads a file into a chained sequence, one writer block at a time.
///
/// Each block holds at most `config.segment_size` bytes, so the file is laid
/// out across segments the same way a network reader would see it.
pub fn load(path: &Path, config: WriterConfig) -> CliResult<Sequence<u8>> {
    let mut file = File::open(path)?;
    let mut writer = SegmentWriter::<u8>::with_config(config)?;
    loop {
        let buffer = writer.get_buffer(0)?;
        let read = match file.read(buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        writer.advance(read)?;
    }
    tracing::debug!(
        path = %path.display(),
        bytes = writer.written_count(),
        segments = writer.segment_count(),
        "loaded input"
    );
    Ok(writer.into_sequence())
}

/// Parses a delimiter given on the command line.
///
/// Understands the escapes `\r`, `\n`, `\t`, `\0`, `\\` and `\xNN`.
pub fn parse_delimiter(text: &str) -> CliResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut chars = text.bytes();
    while let Some(byte) = chars.next() {
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }
        let escaped = match chars.next() {
            Some(b'r') => b'\r',
            Some(b'n') => b'\n',
            Some(b't') => b'\t',
            Some(b'0') => 0,
            Some(b'\\') => b'\\',
            Some(b'x') => {
                let hex = [chars.next(), chars.next()];
                let [Some(high), Some(low)] = hex else {
                    return Err(CliError::InvalidArgument(format!(
                        "truncated \\x escape in delimiter {text:?}"
                    )));
                };
                let digits = [high, low];
                let digits = std::str::from_utf8(&digits).map_err(|_| {
                    CliError::InvalidArgument(format!("bad \\x escape in delimiter {text:?}"))
                })?;
                u8::from_str_radix(digits, 16).map_err(|_| {
                    CliError::InvalidArgument(format!("bad \\x escape in delimiter {text:?}"))
                })?
            }
            Some(other) => {
                return Err(CliError::InvalidArgument(format!(
                    "unknown escape \\{} in delimiter {text:?}",
                    char::from(other)
                )))
            }
            None => {
                return Err(CliError::InvalidArgument(format!(
                    "dangling backslash in delimiter {text:?}"
                )))
            }
        };
        bytes.push(escaped);
    }
    if bytes.is_empty() {
        return Err(CliError::InvalidArgument("delimiter must not be empty".into()));
    }
    Ok(bytes)
}
