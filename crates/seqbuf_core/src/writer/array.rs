//! Growable single-block writer.

use super::BufferWriter;
use crate::config::WriterConfig;
use crate::error::{SequenceError, SequenceResult};
use crate::sequence::Sequence;

/// A [`BufferWriter`] backed by one growable buffer.
///
/// Written elements stay contiguous, so the resulting sequence is always
/// single-segment. A non-zero size hint is granted exactly; a zero hint
/// grants all spare capacity. Hints above `max_segment_size` are rejected;
/// the buffer itself keeps growing past it.
///
/// # Example
///
/// ```rust
/// use seqbuf_core::{ArrayWriter, BufferWriter};
///
/// let mut writer = ArrayWriter::<u8>::new();
/// let buffer = writer.get_buffer(5).unwrap();
/// assert!(buffer.len() >= 5);
/// buffer[..5].copy_from_slice(b"hello");
/// writer.advance(5).unwrap();
/// assert_eq!(writer.written(), b"hello");
/// ```
#[derive(Debug)]
pub struct ArrayWriter<T> {
    buffer: Vec<T>,
    written: usize,
    /// Length of the buffer handed out by the last `get_buffer`, until advanced.
    granted: Option<usize>,
    config: WriterConfig,
}

impl<T: Default + Clone> Default for ArrayWriter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Clone> ArrayWriter<T> {
    /// Creates a writer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            written: 0,
            granted: None,
            config: WriterConfig::default(),
        }
    }

    /// Creates a writer with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the configuration is invalid.
    pub fn with_config(config: WriterConfig) -> SequenceResult<Self> {
        config.validate()?;
        Ok(Self {
            buffer: Vec::new(),
            written: 0,
            granted: None,
            config,
        })
    }

    /// The elements committed so far.
    #[must_use]
    pub fn written(&self) -> &[T] {
        &self.buffer[..self.written]
    }

    /// Number of elements committed so far.
    #[must_use]
    pub const fn written_count(&self) -> usize {
        self.written
    }

    /// Capacity available without growing.
    #[must_use]
    pub fn free_capacity(&self) -> usize {
        self.buffer.len() - self.written
    }

    /// Forgets everything written, keeping the allocation.
    pub fn clear(&mut self) {
        self.written = 0;
        self.granted = None;
    }

    /// Hands the written elements over as a single-block sequence.
    #[must_use]
    pub fn into_sequence(mut self) -> Sequence<T> {
        self.buffer.truncate(self.written);
        Sequence::from_vec(self.buffer)
    }

    fn grow(&mut self, needed: usize) {
        let target = (self.written + needed)
            .max(self.buffer.len() * 2)
            .max(self.config.initial_capacity);
        self.buffer.resize(target, T::default());
    }
}

impl<T: Default + Clone> BufferWriter<T> for ArrayWriter<T> {
    fn get_buffer(&mut self, size_hint: usize) -> SequenceResult<&mut [T]> {
        if size_hint > self.config.max_segment_size {
            return Err(SequenceError::invalid_argument(format!(
                "size hint {size_hint} exceeds max segment size {}",
                self.config.max_segment_size
            )));
        }
        let needed = size_hint.max(1);
        if self.free_capacity() < needed {
            self.grow(needed);
        }
        // A zero hint gets all spare capacity; otherwise grant what was asked.
        let grant = if size_hint == 0 {
            self.free_capacity()
        } else {
            size_hint
        };
        self.granted = Some(grant);
        Ok(&mut self.buffer[self.written..self.written + grant])
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
        self.granted = None;
        Ok(())
    }
}
