//! Forward-only reader over a sequence.
//!
//! The reader keeps a view of the segment it is positioned in. Reads that fit
//! in that view take the fast path and touch nothing else; reads that
//! straddle a boundary copy just the bytes they need into a small local
//! buffer. A failed `try_*` call never moves the reader, so a streaming
//! caller can retry the same read once more data has been appended upstream.

use std::fmt;

use smallvec::{smallvec, SmallVec};

use crate::error::{SequenceError, SequenceResult};
use crate::position::Position;
use crate::sequence::Sequence;

/// Delimiters up to this length are compared without touching the heap.
const INLINE_DELIMITER_LEN: usize = 16;

/// A single-owner, forward-only cursor over a [`Sequence`].
///
/// A reader borrows the sequence it walks and therefore cannot outlive it.
/// It is not `Clone`: exactly one flow of control owns the
/// cursor, and it should not be kept beyond the call scope that created it.
///
/// # Example
///
/// ```rust
/// use seqbuf_core::{Reader, Sequence};
///
/// let seq = Sequence::from_segments([b"He".to_vec(), b"llo".to_vec(), b"\r\nWorld".to_vec()]);
/// let mut reader = Reader::new(&seq);
///
/// let line = reader.try_read_to(b"\r\n", true).unwrap();
/// assert_eq!(line.to_vec(), b"Hello");
/// assert_eq!(reader.unread_sequence().to_vec(), b"World");
/// ```
pub struct Reader<'a, T> {
    sequence: &'a Sequence<T>,
    /// Position of the first element of `current`.
    current_position: Position,
    /// Start of the segment after `current`; `None` once the last one is loaded.
    next_position: Option<Position>,
    current: &'a [T],
    index: usize,
    consumed: usize,
    length: usize,
}

impl<'a, T> Reader<'a, T> {
    /// Creates a reader positioned at the start of `sequence`.
    #[must_use]
    pub fn new(sequence: &'a Sequence<T>) -> Self {
        let start = sequence.start();
        let mut reader = Self {
            sequence,
            current_position: start,
            next_position: Some(start),
            current: &[],
            index: 0,
            consumed: 0,
            length: sequence.len(),
        };
        reader.load_next_segment();
        reader
    }

    /// The sequence being read.
    #[must_use]
    pub const fn sequence(&self) -> &'a Sequence<T> {
        self.sequence
    }

    /// Returns `true` once every element has been consumed.
    #[must_use]
    pub const fn end(&self) -> bool {
        self.consumed == self.length
    }

    /// Total number of elements in the underlying sequence.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Number of elements consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// Number of elements left to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.length - self.consumed
    }

    /// The unread part of the current segment; empty only at the end.
    #[must_use]
    pub fn current_segment_view(&self) -> &'a [T] {
        let current: &'a [T] = self.current;
        &current[self.index..]
    }

    /// The position of the next unread element in the original sequence.
    #[must_use]
    pub fn position(&self) -> Position {
        self.current_position.offset_within_segment(self.index)
    }

    /// Everything not yet consumed, as a sub-sequence.
    #[must_use]
    pub fn unread_sequence(&self) -> Sequence<T> {
        self.sequence
            .slice_from(self.position())
            .unwrap_or_default()
    }

    /// Moves `count` elements forward, crossing segments as needed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative count and `InsufficientData`
    /// if fewer than `count` elements remain. The reader does not move on
    /// failure.
    pub fn advance(&mut self, count: isize) -> SequenceResult<()> {
        let count = usize::try_from(count).map_err(|_| {
            SequenceError::invalid_argument(format!("advance count must not be negative, got {count}"))
        })?;
        if count > self.remaining() {
            return Err(SequenceError::InsufficientData {
                requested: count,
                available: self.remaining(),
            });
        }
        self.advance_unchecked(count);
        Ok(())
    }

    /// Consumes everything that is left.
    pub fn advance_to_end(&mut self) {
        self.advance_unchecked(self.remaining());
    }

    fn advance_unchecked(&mut self, mut count: usize) {
        self.consumed += count;
        loop {
            let available = self.current.len() - self.index;
            if count < available {
                self.index += count;
                return;
            }
            count -= available;
            self.index = self.current.len();
            if !self.load_next_segment() {
                return;
            }
        }
    }

    /// Loads the next segment that has unread elements.
    ///
    /// Returns `false` when the chain is exhausted; the reader then stays on
    /// its last segment with nothing left to read.
    fn load_next_segment(&mut self) -> bool {
        let sequence = self.sequence;
        while let Some(position) = self.next_position {
            match sequence.try_get_next_segment(&mut self.next_position) {
                Ok(Some(segment)) => {
                    self.current_position = position;
                    self.current = segment;
                    self.index = 0;
                    if !segment.is_empty() {
                        tracing::trace!(consumed = self.consumed, len = segment.len(), "entered segment");
                        return true;
                    }
                }
                _ => self.next_position = None,
            }
        }
        false
    }

    /// Unread segment views, starting with the current one.
    fn unread_segments(&self) -> impl Iterator<Item = &'a [T]> + 'a {
        let sequence = self.sequence;
        let mut next = self.next_position;
        std::iter::once(self.current_segment_view()).chain(std::iter::from_fn(move || {
            sequence.try_get_next_segment(&mut next).ok().flatten()
        }))
    }

    fn snapshot(&self) -> Self {
        Self {
            sequence: self.sequence,
            current_position: self.current_position,
            next_position: self.next_position,
            current: self.current,
            index: self.index,
            consumed: self.consumed,
            length: self.length,
        }
    }

    /// Returns a reader positioned at the first unread element for which
    /// `find` reports a match within a segment view, or `None` at the end.
    fn seek<F>(&self, mut find: F) -> Option<Self>
    where
        F: FnMut(&[T]) -> Option<usize>,
    {
        let mut probe = self.snapshot();
        loop {
            let view = probe.current_segment_view();
            if view.is_empty() {
                return None;
            }
            match find(view) {
                Some(index) => {
                    probe.advance_unchecked(index);
                    return Some(probe);
                }
                None => probe.advance_unchecked(view.len()),
            }
        }
    }

    /// Slices out everything between this reader and `probe`, then adopts
    /// the probe's position.
    fn take_until(&mut self, probe: Self) -> Option<Sequence<T>> {
        let found = self.sequence.slice(self.position(), probe.position()).ok()?;
        *self = probe;
        Some(found)
    }
}

impl<'a, T: Copy> Reader<'a, T> {
    /// Returns the next element without consuming it.
    #[must_use]
    pub fn try_peek(&self) -> Option<T> {
        self.current.get(self.index).copied()
    }

    /// Returns the element `offset` places ahead without consuming anything.
    #[must_use]
    pub fn try_peek_at(&self, offset: usize) -> Option<T> {
        if let Some(item) = self.current_segment_view().get(offset) {
            return Some(*item);
        }
        let mut skip = offset;
        for segment in self.unread_segments() {
            if let Some(item) = segment.get(skip) {
                return Some(*item);
            }
            skip -= segment.len();
        }
        None
    }

    /// Consumes and returns the next element.
    pub fn try_read(&mut self) -> Option<T> {
        let item = self.try_peek()?;
        self.advance_unchecked(1);
        Some(item)
    }

    /// Fills `destination` with the next elements without consuming them.
    ///
    /// Returns `false`, leaving `destination` unspecified, if not enough
    /// elements remain.
    pub fn try_copy_to(&self, destination: &mut [T]) -> bool {
        let view = self.current_segment_view();
        if let Some(head) = view.get(..destination.len()) {
            destination.copy_from_slice(head);
            return true;
        }
        self.copy_across_segments(destination)
    }

    fn copy_across_segments(&self, destination: &mut [T]) -> bool {
        if destination.len() > self.remaining() {
            return false;
        }
        let mut filled = 0;
        for segment in self.unread_segments() {
            if filled == destination.len() {
                break;
            }
            let take = segment.len().min(destination.len() - filled);
            destination[filled..filled + take].copy_from_slice(&segment[..take]);
            filled += take;
        }
        filled == destination.len()
    }
}

impl<'a, T: Copy + PartialEq> Reader<'a, T> {
    /// Checks whether the unread elements start with `values`, consuming them
    /// if they do and `advance_past` is set.
    pub fn is_next(&mut self, values: &[T], advance_past: bool) -> bool {
        let matched = self.starts_with(values);
        if matched && advance_past {
            self.advance_unchecked(values.len());
        }
        matched
    }

    fn starts_with(&self, values: &[T]) -> bool {
        let view = self.current_segment_view();
        if view.len() >= values.len() {
            return view.starts_with(values);
        }
        let Some(&first) = values.first() else {
            return true;
        };
        if values.len() > self.remaining() {
            return false;
        }
        // The candidate straddles a boundary: compare a delimiter-sized copy.
        let mut window: SmallVec<[T; INLINE_DELIMITER_LEN]> = smallvec![first; values.len()];
        self.copy_across_segments(&mut window) && window.as_slice() == values
    }

    /// Reads up to the first occurrence of `delimiter`.
    ///
    /// On a match, returns the elements before the delimiter and leaves the
    /// reader either just past the delimiter (`advance_past_delimiter`) or
    /// right before it. The delimiter may straddle any number of segment
    /// boundaries. An empty delimiter matches immediately.
    ///
    /// Returns `None` and leaves the reader untouched if the delimiter does
    /// not occur in the unread elements.
    pub fn try_read_to(
        &mut self,
        delimiter: &[T],
        advance_past_delimiter: bool,
    ) -> Option<Sequence<T>> {
        let probe = self.find_delimiter(delimiter)?;
        let found = self.take_until(probe)?;
        if advance_past_delimiter {
            self.advance_unchecked(delimiter.len());
        }
        Some(found)
    }

    /// Reads up to the first element that equals any of `delimiters`.
    ///
    /// Behaves like [`try_read_to`](Self::try_read_to) with single-element
    /// delimiters; the reader is untouched when none of them occurs.
    pub fn try_read_to_any(
        &mut self,
        delimiters: &[T],
        advance_past_delimiter: bool,
    ) -> Option<Sequence<T>> {
        let probe = self.seek(|view| view.iter().position(|item| delimiters.contains(item)))?;
        let found = self.take_until(probe)?;
        if advance_past_delimiter {
            self.advance_unchecked(1);
        }
        Some(found)
    }

    /// Skips to the first occurrence of `delimiter` without slicing.
    ///
    /// Returns `false` and leaves the reader untouched if it does not occur.
    pub fn try_advance_to(&mut self, delimiter: &[T], advance_past_delimiter: bool) -> bool {
        let Some(probe) = self.find_delimiter(delimiter) else {
            return false;
        };
        *self = probe;
        if advance_past_delimiter {
            self.advance_unchecked(delimiter.len());
        }
        true
    }

    /// Skips every consecutive element equal to `value`.
    ///
    /// Returns how many were skipped.
    pub fn advance_past(&mut self, value: T) -> usize {
        self.advance_past_any(&[value])
    }

    /// Skips every consecutive element equal to any of `values`.
    ///
    /// Returns how many were skipped.
    pub fn advance_past_any(&mut self, values: &[T]) -> usize {
        let start = self.consumed;
        let stop = self
            .seek(|view| view.iter().position(|item| !values.contains(item)));
        match stop {
            Some(probe) => *self = probe,
            None => self.advance_to_end(),
        }
        self.consumed - start
    }

    /// Returns a reader positioned at the start of the first match.
    fn find_delimiter(&self, delimiter: &[T]) -> Option<Self> {
        let Some(&first) = delimiter.first() else {
            return Some(self.snapshot());
        };
        let mut probe = self.snapshot();
        loop {
            let candidate = probe.seek(|view| view.iter().position(|item| *item == first))?;
            probe = candidate;
            if probe.starts_with(delimiter) {
                return Some(probe);
            }
            probe.advance_unchecked(1);
        }
    }
}

impl Reader<'_, u8> {
    fn try_read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let mut bytes = [0u8; N];
        if let Some(head) = self.current_segment_view().get(..N) {
            bytes.copy_from_slice(head);
        } else {
            if !self.copy_across_segments(&mut bytes) {
                return None;
            }
            tracing::trace!(width = N, consumed = self.consumed, "read straddles a segment boundary");
        }
        self.advance_unchecked(N);
        Some(bytes)
    }

    /// Reads one byte.
    pub fn try_read_u8(&mut self) -> Option<u8> {
        self.try_read()
    }

    /// Reads one byte as a signed integer.
    pub fn try_read_i8(&mut self) -> Option<i8> {
        self.try_read_array::<1>().map(i8::from_be_bytes)
    }

    /// Reads a big-endian `u16`.
    pub fn try_read_u16_be(&mut self) -> Option<u16> {
        self.try_read_array().map(u16::from_be_bytes)
    }

    /// Reads a big-endian `i16`.
    pub fn try_read_i16_be(&mut self) -> Option<i16> {
        self.try_read_array().map(i16::from_be_bytes)
    }

    /// Reads a big-endian `u32`.
    pub fn try_read_u32_be(&mut self) -> Option<u32> {
        self.try_read_array().map(u32::from_be_bytes)
    }

    /// Reads a big-endian `i32`.
    pub fn try_read_i32_be(&mut self) -> Option<i32> {
        self.try_read_array().map(i32::from_be_bytes)
    }

    /// Reads a big-endian `u64`.
    pub fn try_read_u64_be(&mut self) -> Option<u64> {
        self.try_read_array().map(u64::from_be_bytes)
    }

    /// Reads a big-endian `i64`.
    pub fn try_read_i64_be(&mut self) -> Option<i64> {
        self.try_read_array().map(i64::from_be_bytes)
    }

    /// Reads a little-endian `u16`.
    pub fn try_read_u16_le(&mut self) -> Option<u16> {
        self.try_read_array().map(u16::from_le_bytes)
    }

    /// Reads a little-endian `i16`.
    pub fn try_read_i16_le(&mut self) -> Option<i16> {
        self.try_read_array().map(i16::from_le_bytes)
    }

    /// Reads a little-endian `u32`.
    pub fn try_read_u32_le(&mut self) -> Option<u32> {
        self.try_read_array().map(u32::from_le_bytes)
    }

    /// Reads a little-endian `i32`.
    pub fn try_read_i32_le(&mut self) -> Option<i32> {
        self.try_read_array().map(i32::from_le_bytes)
    }

    /// Reads a little-endian `u64`.
    pub fn try_read_u64_le(&mut self) -> Option<u64> {
        self.try_read_array().map(u64::from_le_bytes)
    }

    /// Reads a little-endian `i64`.
    pub fn try_read_i64_le(&mut self) -> Option<i64> {
        self.try_read_array().map(i64::from_le_bytes)
    }

    /// Reads an unsigned big-endian integer `width` bytes wide.
    ///
    /// Returns `Ok(None)` without moving if fewer than `width` bytes remain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `width` is not 1, 2, 4 or 8.
    pub fn try_read_big_endian(&mut self, width: usize) -> SequenceResult<Option<u64>> {
        match width {
            1 => Ok(self.try_read_u8().map(u64::from)),
            2 => Ok(self.try_read_u16_be().map(u64::from)),
            4 => Ok(self.try_read_u32_be().map(u64::from)),
            8 => Ok(self.try_read_u64_be()),
            _ => Err(unsupported_width(width)),
        }
    }

    /// Reads an unsigned little-endian integer `width` bytes wide.
    ///
    /// Returns `Ok(None)` without moving if fewer than `width` bytes remain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `width` is not 1, 2, 4 or 8.
    pub fn try_read_little_endian(&mut self, width: usize) -> SequenceResult<Option<u64>> {
        match width {
            1 => Ok(self.try_read_u8().map(u64::from)),
            2 => Ok(self.try_read_u16_le().map(u64::from)),
            4 => Ok(self.try_read_u32_le().map(u64::from)),
            8 => Ok(self.try_read_u64_le()),
            _ => Err(unsupported_width(width)),
        }
    }
}

fn unsupported_width(width: usize) -> SequenceError {
    SequenceError::invalid_argument(format!("integer width must be 1, 2, 4 or 8, got {width}"))
}

impl<T> fmt::Debug for Reader<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("consumed", &self.consumed)
            .field("length", &self.length)
            .field("position", &self.position())
            .finish()
    }
}
