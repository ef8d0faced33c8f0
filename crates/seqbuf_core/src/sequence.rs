//! Immutable, possibly discontiguous sequences.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{SequenceError, SequenceResult};
use crate::iter::{Iter, Segments};
use crate::position::{Position, PositionKind};
use crate::segment::{ChainBuilder, SegmentChain};

/// A read-only view over one contiguous block or a chain of segments.
///
/// Sequences never copy the memory they view: cloning and slicing share the
/// same blocks through reference counting. There is no way to mutate the
/// elements through a sequence.
///
/// Integer offsets cost a walk over the segments they cross. Once the ends
/// of a slice are known as [`Position`]s, slicing and measuring are O(1).
///
/// # Example
///
/// ```rust
/// use seqbuf_core::Sequence;
///
/// let seq = Sequence::from_segments([b"He".to_vec(), b"llo".to_vec()]);
/// assert_eq!(seq.len(), 5);
/// assert!(!seq.is_single_segment());
///
/// let tail = seq.slice_range(1, 3).unwrap();
/// assert_eq!(tail.to_vec(), b"ell");
/// ```
pub struct Sequence<T> {
    repr: Repr<T>,
}

enum Repr<T> {
    Contiguous {
        memory: Arc<[T]>,
        start: usize,
        end: usize,
    },
    Chained {
        chain: Arc<SegmentChain<T>>,
        start: Anchor,
        end: Anchor,
    },
}

/// A `(segment, offset)` pair already validated against a chain.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    segment: usize,
    offset: usize,
}

/// A position checked against this sequence.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    /// Block offset, or chain-wide element index.
    index: usize,
    anchor: Anchor,
}

impl<T> Sequence<T> {
    /// Creates an empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Creates a single-block sequence that takes ownership of `memory`.
    #[must_use]
    pub fn from_vec(memory: Vec<T>) -> Self {
        Self::from_arc(memory.into())
    }

    /// Creates a single-block sequence sharing `memory`.
    #[must_use]
    pub fn from_arc(memory: Arc<[T]>) -> Self {
        let end = memory.len();
        Self {
            repr: Repr::Contiguous {
                memory,
                start: 0,
                end,
            },
        }
    }

    /// Creates a sequence over `chain` bounded by `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if either position does not belong to the
    /// chain, or if `end` cannot be reached from `start` by following the
    /// segment links.
    pub fn from_chain(
        chain: &Arc<SegmentChain<T>>,
        start: Position,
        end: Position,
    ) -> SequenceResult<Self> {
        let (start_segment, start_offset) = chain.locate(start).ok_or_else(|| {
            SequenceError::configuration("start position does not belong to this chain")
        })?;
        let (end_segment, end_offset) = chain.locate(end).ok_or_else(|| {
            SequenceError::configuration("end position does not belong to this chain")
        })?;

        let reachable = chain.is_reachable(start_segment, end_segment)
            && (start_segment != end_segment || start_offset <= end_offset);
        if !reachable {
            return Err(SequenceError::configuration(format!(
                "end ({end_segment}, {end_offset}) is not reachable from start ({start_segment}, {start_offset})"
            )));
        }

        let start = Anchor {
            segment: start_segment,
            offset: start_offset,
        };
        let end = normalize_end(
            chain,
            start,
            Anchor {
                segment: end_segment,
                offset: end_offset,
            },
        );
        let start = normalize_start(chain, start, end);
        Ok(Self {
            repr: Repr::Chained {
                chain: Arc::clone(chain),
                start,
                end,
            },
        })
    }

    /// Creates a sequence spanning every segment of `chain`.
    #[must_use]
    pub fn from_whole_chain(chain: &Arc<SegmentChain<T>>) -> Self {
        let Some(last) = chain.segment_count().checked_sub(1) else {
            return Self::empty();
        };
        let start = Anchor {
            segment: 0,
            offset: 0,
        };
        let end = normalize_end(
            chain,
            start,
            Anchor {
                segment: last,
                offset: chain.segment_at(last).len(),
            },
        );
        let start = normalize_start(chain, start, end);
        Self {
            repr: Repr::Chained {
                chain: Arc::clone(chain),
                start,
                end,
            },
        }
    }

    /// Links `segments` into a new chain and views all of it.
    ///
    /// An empty iterator yields an empty sequence.
    pub fn from_segments<I, M>(segments: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Arc<[T]>>,
    {
        let mut builder = ChainBuilder::new();
        for memory in segments {
            builder.append(memory);
        }
        Self::from_whole_chain(&builder.build())
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end_index() - self.start_index()
    }

    /// Returns `true` if the sequence holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if every element lives in one block.
    ///
    /// When this holds, [`first`](Self::first) is the whole sequence.
    #[must_use]
    pub fn is_single_segment(&self) -> bool {
        match &self.repr {
            Repr::Contiguous { .. } => true,
            Repr::Chained { start, end, .. } => start.segment == end.segment,
        }
    }

    /// Number of segment views that [`segments`](Self::segments) yields.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        match &self.repr {
            Repr::Contiguous { .. } => 1,
            Repr::Chained { start, end, .. } => end.segment - start.segment + 1,
        }
    }

    /// Position of the first element.
    #[must_use]
    pub fn start(&self) -> Position {
        match &self.repr {
            Repr::Contiguous { start, .. } => Position::contiguous(*start),
            Repr::Chained { chain, start, .. } => {
                Position::chained(chain.id(), start.segment, start.offset)
            }
        }
    }

    /// Position just past the last element.
    #[must_use]
    pub fn end(&self) -> Position {
        match &self.repr {
            Repr::Contiguous { end, .. } => Position::contiguous(*end),
            Repr::Chained { chain, end, .. } => {
                Position::chained(chain.id(), end.segment, end.offset)
            }
        }
    }

    /// The view of the first segment only; empty if the sequence is empty.
    #[must_use]
    pub fn first(&self) -> &[T] {
        match &self.repr {
            Repr::Contiguous { memory, start, end } => &memory[*start..*end],
            Repr::Chained { chain, start, end } => {
                let memory = chain.segment_at(start.segment).memory();
                let upper = if start.segment == end.segment {
                    end.offset
                } else {
                    memory.len()
                };
                &memory[start.offset..upper]
            }
        }
    }

    /// Returns the sub-sequence between two positions of this sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either position does not belong to this
    /// sequence or if `start` lies after `end`.
    pub fn slice(&self, start: Position, end: Position) -> SequenceResult<Self> {
        let from = self.resolve(start)?;
        let to = self.resolve(end)?;
        if from.index > to.index {
            return Err(SequenceError::invalid_argument(format!(
                "slice start {} lies after slice end {}",
                from.index - self.start_index(),
                to.index - self.start_index()
            )));
        }
        Ok(self.slice_resolved(from, to))
    }

    /// Returns the sub-sequence from `start` to the end of this sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `start` does not belong to this sequence.
    pub fn slice_from(&self, start: Position) -> SequenceResult<Self> {
        self.slice(start, self.end())
    }

    /// Returns `length` elements starting `offset` elements in.
    ///
    /// Costs a walk over the segments crossed to locate both ends.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative offset or length and
    /// `OutOfRange` if the range extends past the end.
    pub fn slice_range(&self, offset: isize, length: isize) -> SequenceResult<Self> {
        let start = self.get_position(self.start(), offset)?;
        let end = self.get_position(start, length)?;
        self.slice(start, end)
    }

    /// Walks `offset` elements forward from `from`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `offset` is negative or `from` does not
    /// belong to this sequence, and `OutOfRange` if the walk would pass the
    /// end of the sequence.
    pub fn get_position(&self, from: Position, offset: isize) -> SequenceResult<Position> {
        let count = usize::try_from(offset).map_err(|_| {
            SequenceError::invalid_argument(format!("offset must not be negative, got {offset}"))
        })?;
        let from = self.resolve(from)?;
        let available = self.end_index() - from.index;
        if count > available {
            return Err(SequenceError::OutOfRange {
                requested: count,
                available,
            });
        }
        Ok(self.walk(from.anchor, count))
    }

    /// Number of elements between the start of this sequence and `position`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `position` does not belong to this sequence.
    pub fn offset_of(&self, position: Position) -> SequenceResult<usize> {
        Ok(self.resolve(position)?.index - self.start_index())
    }

    /// Number of elements from `from` up to `to`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either position does not belong to this
    /// sequence or if `from` lies after `to`.
    pub fn distance(&self, from: Position, to: Position) -> SequenceResult<usize> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        to.index.checked_sub(from.index).ok_or_else(|| {
            SequenceError::invalid_argument("distance start lies after distance end")
        })
    }

    /// Orders two positions of this sequence.
    ///
    /// Positions that name the same element through different segments
    /// compare `Equal`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either position does not belong to this
    /// sequence.
    pub fn compare(&self, a: Position, b: Position) -> SequenceResult<Ordering> {
        Ok(self.resolve(a)?.index.cmp(&self.resolve(b)?.index))
    }

    /// Returns the rest of the segment at `position` and moves `position` to
    /// the start of the following segment.
    ///
    /// `position` becomes `None` once the last segment has been returned, and
    /// a `None` position yields `Ok(None)`. Starting from
    /// `Some(self.start())` and looping until `Ok(None)` visits every segment
    /// exactly once, in order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `position` does not belong to this
    /// sequence; `position` is left untouched in that case.
    pub fn try_get_next_segment(
        &self,
        position: &mut Option<Position>,
    ) -> SequenceResult<Option<&[T]>> {
        let Some(current) = *position else {
            return Ok(None);
        };
        let resolved = self.resolve(current)?;

        match &self.repr {
            Repr::Contiguous { memory, end, .. } => {
                *position = None;
                Ok(Some(&memory[resolved.index..*end]))
            }
            Repr::Chained { chain, end, .. } => {
                let Anchor { segment, offset } = resolved.anchor;
                let memory = chain.segment_at(segment).memory();
                if segment == end.segment {
                    *position = None;
                    return Ok(Some(&memory[offset..end.offset]));
                }
                *position = chain
                    .segment_at(segment)
                    .next()
                    .map(|next| Position::chained(chain.id(), next, 0));
                Ok(Some(&memory[offset..]))
            }
        }
    }

    /// Lazily enumerates the segment views from the start.
    ///
    /// The iterator cannot be restarted; call `segments()` again instead.
    #[must_use]
    pub fn segments(&self) -> Segments<'_, T> {
        Segments::new(self)
    }

    /// Iterates over every element in order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        self.segments().flatten()
    }

    fn start_index(&self) -> usize {
        match &self.repr {
            Repr::Contiguous { start, .. } => *start,
            Repr::Chained { chain, start, .. } => chain_index(chain, *start),
        }
    }

    fn end_index(&self) -> usize {
        match &self.repr {
            Repr::Contiguous { end, .. } => *end,
            Repr::Chained { chain, end, .. } => chain_index(chain, *end),
        }
    }

    fn resolve(&self, position: Position) -> SequenceResult<Resolved> {
        let (lo, hi) = (self.start_index(), self.end_index());
        let resolved = match (&self.repr, position.kind) {
            (Repr::Contiguous { .. }, PositionKind::Contiguous(offset)) => (lo..=hi)
                .contains(&offset)
                .then_some(Resolved {
                    index: offset,
                    anchor: Anchor {
                        segment: 0,
                        offset,
                    },
                }),
            (Repr::Chained { chain, start, end }, PositionKind::Chained { .. }) => {
                chain.locate(position).and_then(|(segment, offset)| {
                    let index = chain.segment_at(segment).running_index() + offset;
                    // A boundary may be named through an empty segment outside the
                    // view; any other out-of-view segment is foreign.
                    let in_view = (start.segment..=end.segment).contains(&segment)
                        || index == lo
                        || index == hi;
                    if !((lo..=hi).contains(&index) && in_view) {
                        return None;
                    }
                    // Out-of-view aliases stand for the view's own boundary.
                    let anchor = if segment < start.segment {
                        *start
                    } else if segment > end.segment {
                        *end
                    } else {
                        Anchor { segment, offset }
                    };
                    Some(Resolved { index, anchor })
                })
            }
            _ => None,
        };

        resolved.ok_or_else(|| {
            tracing::warn!(?position, "rejected position that does not belong to this sequence");
            SequenceError::invalid_argument("position does not belong to this sequence")
        })
    }

    fn slice_resolved(&self, from: Resolved, to: Resolved) -> Self {
        let repr = match &self.repr {
            Repr::Contiguous { memory, .. } => Repr::Contiguous {
                memory: Arc::clone(memory),
                start: from.index,
                end: to.index,
            },
            Repr::Chained { chain, .. } => {
                let end = normalize_end(chain, from.anchor, to.anchor);
                let start = if from.index == to.index {
                    end
                } else {
                    normalize_start(chain, from.anchor, end)
                };
                Repr::Chained {
                    chain: Arc::clone(chain),
                    start,
                    end,
                }
            }
        };
        Self { repr }
    }

    fn walk(&self, from: Anchor, count: usize) -> Position {
        match &self.repr {
            Repr::Contiguous { .. } => Position::contiguous(from.offset + count),
            Repr::Chained { chain, .. } => {
                let (mut segment, mut offset, mut left) = (from.segment, from.offset, count);
                loop {
                    let current = chain.segment_at(segment);
                    let available = current.len() - offset;
                    if left <= available {
                        return Position::chained(chain.id(), segment, offset + left);
                    }
                    left -= available;
                    match current.next() {
                        Some(next) => {
                            segment = next;
                            offset = 0;
                        }
                        // Bounds were checked by the caller.
                        None => return Position::chained(chain.id(), segment, current.len()),
                    }
                }
            }
        }
    }
}

impl<T: Clone> Sequence<T> {
    /// Creates a single-block sequence by copying `data`.
    #[must_use]
    pub fn from_slice(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Copies every element into one newly allocated buffer.
    ///
    /// Always O(n) and always allocates.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        for segment in self.segments() {
            out.extend_from_slice(segment);
        }
        out
    }

    /// Copies every element into the front of `destination`.
    ///
    /// Returns the number of elements copied.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `destination` is shorter than the sequence.
    pub fn copy_to(&self, destination: &mut [T]) -> SequenceResult<usize> {
        let len = self.len();
        if destination.len() < len {
            return Err(SequenceError::OutOfRange {
                requested: len,
                available: destination.len(),
            });
        }
        let mut written = 0;
        for segment in self.segments() {
            destination[written..written + segment.len()].clone_from_slice(segment);
            written += segment.len();
        }
        Ok(written)
    }
}

fn chain_index<T>(chain: &SegmentChain<T>, anchor: Anchor) -> usize {
    chain.segment_at(anchor.segment).running_index() + anchor.offset
}

/// Moves a start anchor sitting at the end of a segment onto the next one.
fn normalize_start<T>(chain: &SegmentChain<T>, mut start: Anchor, end: Anchor) -> Anchor {
    while start.segment < end.segment {
        let segment = chain.segment_at(start.segment);
        if start.offset < segment.len() {
            break;
        }
        match segment.next() {
            Some(next) => {
                start = Anchor {
                    segment: next,
                    offset: 0,
                }
            }
            None => break,
        }
    }
    start
}

/// Moves an end anchor sitting at the start of a segment back onto the
/// previous one. Arena order is link order, so the previous segment is
/// `segment - 1`.
fn normalize_end<T>(chain: &SegmentChain<T>, start: Anchor, mut end: Anchor) -> Anchor {
    while end.segment > start.segment && end.offset == 0 {
        let previous = end.segment - 1;
        end = Anchor {
            segment: previous,
            offset: chain.segment_at(previous).len(),
        };
    }
    end
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Contiguous { memory, start, end } => Repr::Contiguous {
                memory: Arc::clone(memory),
                start: *start,
                end: *end,
            },
            Repr::Chained { chain, start, end } => Repr::Chained {
                chain: Arc::clone(chain),
                start: *start,
                end: *end,
            },
        };
        Self { repr }
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(memory: Vec<T>) -> Self {
        Self::from_vec(memory)
    }
}

impl<T> From<Arc<[T]>> for Sequence<T> {
    fn from(memory: Arc<[T]>) -> Self {
        Self::from_arc(memory)
    }
}

impl<T: Clone> From<&[T]> for Sequence<T> {
    fn from(data: &[T]) -> Self {
        Self::from_slice(data)
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Sequence<T> {}

impl<T: PartialEq> PartialEq<[T]> for Sequence<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for Sequence<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self == other.as_slice()
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Sequence<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self == other.as_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("len", &self.len())
            .field("segments", &self.segment_count())
            .field("elements", &ElementsDebug(self))
            .finish()
    }
}

struct ElementsDebug<'a, T>(&'a Sequence<T>);

impl<T: fmt::Debug> fmt::Debug for ElementsDebug<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
