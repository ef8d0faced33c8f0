//! The producer-side writer contract.
//!
//! A producer hands out capacity with [`BufferWriter::get_buffer`] and learns
//! how much of it was filled through [`BufferWriter::advance`]. Nothing else
//! may touch the granted buffer between those two calls. Backends (growable
//! buffers, pooled block lists, socket send buffers) only need to honor this
//! two-call protocol.
//!
//! Two reference producers live here: [`ArrayWriter`] fills one growable
//! block, [`SegmentWriter`] fills fixed-size blocks and hands them over as a
//! chained [`Sequence`](crate::Sequence).

mod array;
mod segmented;

pub use array::ArrayWriter;
pub use segmented::SegmentWriter;

use crate::error::{SequenceError, SequenceResult};

/// A producer of writable buffers.
///
/// # Invariants
///
/// - `get_buffer(n)` returns at least `n` elements; callers must not assume
///   the length equals `n`
/// - `get_buffer(0)` returns a non-empty buffer
/// - `advance(count)` with `count` above the most recently granted length
///   fails with [`SequenceError::ProtocolViolation`]
///
/// Implementations are single-producer: a shared writer must have its
/// `get_buffer`/`advance` pairs serialized by the caller.
pub trait BufferWriter<T> {
    /// Returns a buffer with room for at least `size_hint` elements.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the writer cannot provide a buffer that
    /// large.
    fn get_buffer(&mut self, size_hint: usize) -> SequenceResult<&mut [T]>;

    /// Commits the first `count` elements of the most recent buffer.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolViolation` if `count` exceeds the granted capacity.
    fn advance(&mut self, count: usize) -> SequenceResult<()>;
}

/// Convenience writes built on the two-call protocol.
pub trait BufferWriterExt<T: Copy>: BufferWriter<T> {
    /// Copies all of `data` into the writer, spanning as many buffers as
    /// needed.
    ///
    /// # Errors
    ///
    /// Propagates writer errors, and returns `Configuration` if the writer
    /// hands out an empty buffer.
    fn write(&mut self, mut data: &[T]) -> SequenceResult<()> {
        while !data.is_empty() {
            let buffer = self.get_buffer(0)?;
            if buffer.is_empty() {
                return Err(SequenceError::configuration(
                    "writer returned an empty buffer for a zero size hint",
                ));
            }
            let count = buffer.len().min(data.len());
            buffer[..count].copy_from_slice(&data[..count]);
            self.advance(count)?;
            data = &data[count..];
        }
        Ok(())
    }
}

impl<T: Copy, W: BufferWriter<T> + ?Sized> BufferWriterExt<T> for W {}

/// Fixed-width integer writes for byte writers.
///
/// Each value is written into a single buffer, so readers see it either in
/// one segment or, after slicing, split wherever the consumer chooses.
pub trait ByteWriterExt: BufferWriter<u8> {
    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    fn write_u8(&mut self, value: u8) -> SequenceResult<()> {
        self.write_array([value])
    }

    /// Writes a big-endian `u16`.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    fn write_u16_be(&mut self, value: u16) -> SequenceResult<()> {
        self.write_array(value.to_be_bytes())
    }

    /// Writes a big-endian `u32`.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    fn write_u32_be(&mut self, value: u32) -> SequenceResult<()> {
        self.write_array(value.to_be_bytes())
    }

    /// Writes a big-endian `u64`.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    fn write_u64_be(&mut self, value: u64) -> SequenceResult<()> {
        self.write_array(value.to_be_bytes())
    }

    /// Writes a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    fn write_u32_le(&mut self, value: u32) -> SequenceResult<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes `bytes` into one contiguous buffer.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    fn write_array<const N: usize>(&mut self, bytes: [u8; N]) -> SequenceResult<()> {
        let buffer = self.get_buffer(N)?;
        let granted = buffer.len();
        let Some(head) = buffer.get_mut(..N) else {
            return Err(SequenceError::configuration(format!(
                "writer granted {granted} bytes for a size hint of {N}"
            )));
        };
        head.copy_from_slice(&bytes);
        self.advance(N)
    }
}

impl<W: BufferWriter<u8> + ?Sized> ByteWriterExt for W {}
