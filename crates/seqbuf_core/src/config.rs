//! Writer configuration.

use crate::error::{SequenceError, SequenceResult};

/// Configuration for the in-crate writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// First allocation made by an [`ArrayWriter`](crate::ArrayWriter).
    pub initial_capacity: usize,

    /// Size of each block opened by a [`SegmentWriter`](crate::SegmentWriter).
    pub segment_size: usize,

    /// Largest single block a writer will open to satisfy a size hint.
    pub max_segment_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            segment_size: 4 * 1024,        // 4 KB
            max_segment_size: 1024 * 1024, // 1 MB
        }
    }
}

impl WriterConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first allocation size of an array writer.
    #[must_use]
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the block size of a segment writer.
    #[must_use]
    pub const fn segment_size(mut self, size: usize) -> Self {
        self.segment_size = size;
        self
    }

    /// Sets the largest block a writer may open.
    #[must_use]
    pub const fn max_segment_size(mut self, size: usize) -> Self {
        self.max_segment_size = size;
        self
    }

    /// Checks that the sizes are usable.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `segment_size` is zero or larger than
    /// `max_segment_size`.
    pub fn validate(&self) -> SequenceResult<()> {
        if self.segment_size == 0 {
            return Err(SequenceError::configuration("segment_size must be non-zero"));
        }
        if self.segment_size > self.max_segment_size {
            return Err(SequenceError::configuration(format!(
                "segment_size {} exceeds max_segment_size {}",
                self.segment_size, self.max_segment_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = WriterConfig::default();
        assert_eq!(config.initial_capacity, 256);
        assert_eq!(config.segment_size, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = WriterConfig::new()
            .initial_capacity(16)
            .segment_size(64)
            .max_segment_size(128);

        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.segment_size, 64);
        assert_eq!(config.max_segment_size, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_sizes() {
        assert!(matches!(
            WriterConfig::new().segment_size(0).validate(),
            Err(SequenceError::Configuration { .. })
        ));
        assert!(matches!(
            WriterConfig::new().segment_size(64).max_segment_size(32).validate(),
            Err(SequenceError::Configuration { .. })
        ));
    }
}
