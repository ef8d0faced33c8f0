//! Opaque positions into a sequence.

use crate::segment::ChainId;

/// An opaque cursor into a [`Sequence`](crate::Sequence).
///
/// A position is only meaningful relative to the sequence that produced it
/// (or to another slice of the same underlying memory). For a single-block
/// sequence it is a plain element offset; for a chained sequence it is a
/// `(segment, offset)` pair tagged with the identity of the chain.
///
/// Positions implement `Eq` and `Hash` but not `Ord`: two
/// positions can only be ordered by the owning sequence, see
/// [`Sequence::compare`](crate::Sequence::compare). Two positions that denote
/// the same element through different segments (the end of one segment and
/// the start of the next) are not `==`.
///
/// Using a position with a sequence over different memory is a caller bug.
/// Chained positions carry the chain identity, so such misuse is reported as
/// [`SequenceError::InvalidArgument`](crate::SequenceError::InvalidArgument)
/// whenever it can be detected; for contiguous sequences only out-of-bounds
/// offsets are detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) kind: PositionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PositionKind {
    /// Offset into a single contiguous block.
    Contiguous(usize),
    /// Offset within one segment of a chain.
    Chained {
        chain: ChainId,
        segment: usize,
        offset: usize,
    },
}

impl Position {
    pub(crate) const fn contiguous(offset: usize) -> Self {
        Self {
            kind: PositionKind::Contiguous(offset),
        }
    }

    pub(crate) const fn chained(chain: ChainId, segment: usize, offset: usize) -> Self {
        Self {
            kind: PositionKind::Chained {
                chain,
                segment,
                offset,
            },
        }
    }

    /// Returns `true` if this position points into a segment chain.
    #[must_use]
    pub const fn is_chained(&self) -> bool {
        matches!(self.kind, PositionKind::Chained { .. })
    }

    /// Moves `count` elements forward without leaving the current block.
    ///
    /// Callers must know the block holds at least `count` more elements.
    pub(crate) const fn offset_within_segment(self, count: usize) -> Self {
        match self.kind {
            PositionKind::Contiguous(offset) => Self::contiguous(offset + count),
            PositionKind::Chained {
                chain,
                segment,
                offset,
            } => Self::chained(chain, segment, offset + count),
        }
    }
}
