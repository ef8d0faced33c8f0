//! Segment and element iterators over a sequence.

use std::iter::{Flatten, FusedIterator};

use crate::position::Position;
use crate::sequence::Sequence;

/// Element iterator returned by [`Sequence::iter`].
pub type Iter<'a, T> = Flatten<Segments<'a, T>>;

/// Lazy, finite enumeration of the segment views of a [`Sequence`].
///
/// Built on [`Sequence::try_get_next_segment`]; each segment is yielded
/// exactly once, in chain order.
#[derive(Debug)]
pub struct Segments<'a, T> {
    sequence: &'a Sequence<T>,
    next: Option<Position>,
}

impl<'a, T> Segments<'a, T> {
    pub(crate) fn new(sequence: &'a Sequence<T>) -> Self {
        Self {
            sequence,
            next: Some(sequence.start()),
        }
    }
}

impl<'a, T> Iterator for Segments<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        // Positions handed out by the sequence itself always resolve.
        self.sequence
            .try_get_next_segment(&mut self.next)
            .ok()
            .flatten()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next.is_none() {
            (0, Some(0))
        } else {
            (1, Some(self.sequence.segment_count()))
        }
    }
}

impl<T> FusedIterator for Segments<'_, T> {}
