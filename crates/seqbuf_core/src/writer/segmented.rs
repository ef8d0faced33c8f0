//! Block-list writer producing chained sequences.

use super::BufferWriter;
use crate::config::WriterConfig;
use crate::error::{SequenceError, SequenceResult};
use crate::segment::ChainBuilder;
use crate::sequence::Sequence;

/// A [`BufferWriter`] that fills fixed-size blocks and links them into a
/// segment chain.
///
/// A size hint that does not fit in the current block seals it and opens a
/// new one of `segment_size` elements, or larger when the hint demands it
/// (up to `max_segment_size`). Values written through a single buffer never
/// straddle blocks; values written through [`BufferWriterExt::write`]
/// generally do.
///
/// [`BufferWriterExt::write`]: crate::BufferWriterExt::write
///
/// # Example
///
/// ```rust
/// use seqbuf_core::{BufferWriterExt, SegmentWriter, WriterConfig};
///
/// let config = WriterConfig::new().segment_size(4);
/// let mut writer = SegmentWriter::<u8>::with_config(config).unwrap();
/// writer.write(b"Hello\r\nWorld").unwrap();
///
/// let seq = writer.into_sequence();
/// assert_eq!(seq.len(), 12);
/// assert_eq!(seq.segment_count(), 3);
/// ```
#[derive(Debug)]
pub struct SegmentWriter<T> {
    config: WriterConfig,
    sealed: ChainBuilder<T>,
    current: Vec<T>,
    written: usize,
    granted: Option<usize>,
    total_written: usize,
}

impl<T: Default + Clone> Default for SegmentWriter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Clone> SegmentWriter<T> {
    /// Creates a writer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(WriterConfig::default())
    }

    /// Creates a writer with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the configuration is invalid.
    pub fn with_config(config: WriterConfig) -> SequenceResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: WriterConfig) -> Self {
        Self {
            config,
            sealed: ChainBuilder::new(),
            current: Vec::new(),
            written: 0,
            granted: None,
            total_written: 0,
        }
    }

    /// Number of elements committed so far.
    #[must_use]
    pub const fn written_count(&self) -> usize {
        self.total_written
    }

    /// Number of non-empty blocks, including the one being filled.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.sealed.segment_count() + usize::from(self.written > 0)
    }

    /// Seals the current block and hands every block over as a chained
    /// sequence.
    #[must_use]
    pub fn into_sequence(mut self) -> Sequence<T> {
        self.seal();
        Sequence::from_whole_chain(&self.sealed.build())
    }

    fn seal(&mut self) {
        if self.written == 0 {
            return;
        }
        let mut block = std::mem::take(&mut self.current);
        block.truncate(self.written);
        self.sealed.append(block);
        self.written = 0;
    }

    fn open_block(&mut self, needed: usize) {
        self.seal();
        let size = needed.max(self.config.segment_size);
        tracing::debug!(
            size,
            sealed = self.sealed.segment_count(),
            "opening writer segment"
        );
        self.current = vec![T::default(); size];
    }
}

impl<T: Default + Clone> BufferWriter<T> for SegmentWriter<T> {
    fn get_buffer(&mut self, size_hint: usize) -> SequenceResult<&mut [T]> {
        if size_hint > self.config.max_segment_size {
            return Err(SequenceError::invalid_argument(format!(
                "size hint {size_hint} exceeds max segment size {}",
                self.config.max_segment_size
            )));
        }
        let needed = size_hint.max(1);
        if self.current.len() - self.written < needed {
            self.open_block(needed);
        }
        let grant = if size_hint == 0 {
            self.current.len() - self.written
        } else {
            size_hint
        };
        self.granted = Some(grant);
        Ok(&mut self.current[self.written..self.written + grant])
    }

    fn advance(&mut self, count: usize) -> SequenceResult<()> {
        let granted = self.granted.unwrap_or(0);
        if count > granted {
            tracing::error!(advanced = count, granted, "writer advanced past its granted buffer");
            return Err(SequenceError::ProtocolViolation {
                advanced: count,
                granted,
            });
        }
        self.written += count;
        self.total_written += count;
        self.granted = None;
        Ok(())
    }
}
