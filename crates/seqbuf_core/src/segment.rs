//! Segment chains.
//!
//! A chain is an append-only arena of [`Segment`]s. Each segment links to the
//! next one by arena index and records the running length of the chain up to
//! and including itself, so the length of any view over the chain is O(1)
//! once both ends are known.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{SequenceError, SequenceResult};
use crate::position::{Position, PositionKind};

static NEXT_CHAIN_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`SegmentChain`], carried by every chained [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(u64);

impl ChainId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CHAIN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// One contiguous memory block linked into a chain.
///
/// Segments are immutable once linked. The memory is shared, never copied,
/// by every sequence built over the chain.
pub struct Segment<T> {
    memory: Arc<[T]>,
    next: Option<usize>,
    running_length: usize,
}

impl<T> Segment<T> {
    /// The elements of this segment.
    #[must_use]
    pub fn memory(&self) -> &[T] {
        &self.memory
    }

    /// Number of elements in this segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns `true` if the segment holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Arena index of the following segment, if any.
    #[must_use]
    pub const fn next(&self) -> Option<usize> {
        self.next
    }

    /// Sum of the lengths of all segments from the chain start through this one.
    #[must_use]
    pub const fn running_length(&self) -> usize {
        self.running_length
    }

    /// Chain-wide index of this segment's first element.
    #[must_use]
    pub fn running_index(&self) -> usize {
        self.running_length - self.memory.len()
    }
}

impl<T> fmt::Debug for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("len", &self.len())
            .field("next", &self.next)
            .field("running_length", &self.running_length)
            .finish()
    }
}

/// An immutable, linked run of segments.
///
/// Build one with [`ChainBuilder`], then view it through
/// [`Sequence::from_chain`](crate::Sequence::from_chain).
pub struct SegmentChain<T> {
    id: ChainId,
    segments: Vec<Segment<T>>,
}

impl<T> SegmentChain<T> {
    /// Identity carried by positions into this chain.
    #[must_use]
    pub const fn id(&self) -> ChainId {
        self.id
    }

    /// Number of segments in the chain.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the chain has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total number of elements across all segments.
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.segments.last().map_or(0, Segment::running_length)
    }

    /// Returns the segment at `index`.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&Segment<T>> {
        self.segments.get(index)
    }

    /// Position of the first element of the chain.
    #[must_use]
    pub fn start(&self) -> Option<Position> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Position::chained(self.id, 0, 0))
    }

    /// Position just past the last element of the chain.
    #[must_use]
    pub fn end(&self) -> Option<Position> {
        let last = self.segments.len().checked_sub(1)?;
        Some(Position::chained(self.id, last, self.segments[last].len()))
    }

    /// Builds a position at `offset` within segment `segment`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the segment does not exist or the offset
    /// lies past its end.
    pub fn position(&self, segment: usize, offset: usize) -> SequenceResult<Position> {
        let seg = self.segments.get(segment).ok_or_else(|| {
            SequenceError::invalid_argument(format!(
                "segment {segment} does not exist in a chain of {}",
                self.segments.len()
            ))
        })?;
        if offset > seg.len() {
            return Err(SequenceError::invalid_argument(format!(
                "offset {offset} exceeds segment length {}",
                seg.len()
            )));
        }
        Ok(Position::chained(self.id, segment, offset))
    }

    pub(crate) fn segment_at(&self, index: usize) -> &Segment<T> {
        &self.segments[index]
    }

    /// Splits a chained position of this chain into `(segment, offset)`.
    ///
    /// Fails if the position belongs to another chain, names a missing
    /// segment, or points past the end of its segment.
    pub(crate) fn locate(&self, position: Position) -> Option<(usize, usize)> {
        match position.kind {
            PositionKind::Chained {
                chain,
                segment,
                offset,
            } if chain == self.id => {
                let seg = self.segments.get(segment)?;
                (offset <= seg.len()).then_some((segment, offset))
            }
            _ => None,
        }
    }

    /// Returns `true` if following `next` links from `from` reaches `to`.
    pub(crate) fn is_reachable(&self, from: usize, to: usize) -> bool {
        let mut current = Some(from);
        while let Some(index) = current {
            if index == to {
                return true;
            }
            current = self.segments.get(index).and_then(Segment::next);
        }
        false
    }
}

impl<T> fmt::Debug for SegmentChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentChain")
            .field("id", &self.id)
            .field("segments", &self.segments)
            .finish()
    }
}

/// Assembles a [`SegmentChain`] by appending memory blocks in order.
///
/// # Example
///
/// ```rust
/// use seqbuf_core::{ChainBuilder, Sequence};
///
/// let mut builder = ChainBuilder::<u8>::new();
/// builder.append(b"He".to_vec());
/// builder.append(b"llo".to_vec());
/// let chain = builder.build();
///
/// let seq = Sequence::from_whole_chain(&chain);
/// assert_eq!(seq.len(), 5);
/// assert_eq!(seq.to_vec(), b"Hello");
/// ```
pub struct ChainBuilder<T> {
    segments: Vec<Segment<T>>,
}

impl<T> fmt::Debug for ChainBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("segments", &self.segments)
            .finish()
    }
}

impl<T> Default for ChainBuilder<T> {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
        }
    }
}

impl<T> ChainBuilder<T> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with room for `segments` segments.
    #[must_use]
    pub fn with_capacity(segments: usize) -> Self {
        Self {
            segments: Vec::with_capacity(segments),
        }
    }

    /// Appends a block and links it after the current tail.
    ///
    /// Returns the arena index of the new segment.
    pub fn append(&mut self, memory: impl Into<Arc<[T]>>) -> usize {
        let memory = memory.into();
        let index = self.segments.len();
        let running_length = self
            .segments
            .last()
            .map_or(0, Segment::running_length)
            + memory.len();

        if let Some(tail) = self.segments.last_mut() {
            tail.next = Some(index);
        }
        self.segments.push(Segment {
            memory,
            next: None,
            running_length,
        });
        index
    }

    /// Number of segments appended so far.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Freezes the builder into a shareable chain.
    #[must_use]
    pub fn build(self) -> Arc<SegmentChain<T>> {
        let chain = SegmentChain {
            id: ChainId::next(),
            segments: self.segments,
        };
        tracing::debug!(
            chain = chain.id.as_u64(),
            segments = chain.segment_count(),
            length = chain.total_length(),
            "assembled segment chain"
        );
        Arc::new(chain)
    }
}
