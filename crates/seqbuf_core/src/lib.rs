//! # seqbuf core
//!
//! Zero-copy sequences over memory that may be split across several
//! non-contiguous blocks, a forward-only reader for parsing them, and the
//! two-call writer contract producers fill them through.
//!
//! ## Building blocks
//!
//! - [`Sequence`] - immutable view over one block or a chain of segments
//! - [`Position`] - opaque cursor, valid only for the sequence that made it
//! - [`SegmentChain`] / [`ChainBuilder`] - arena of linked segments
//! - [`Reader`] - single-owner cursor with fast and boundary-straddling paths
//! - [`BufferWriter`] - request capacity, then commit what was written
//!
//! Everything here is synchronous and CPU-bound. Waiting for more data is
//! the caller's business: a failed `try_*` read leaves the reader untouched
//! so it can simply be retried once more data has been appended.
//!
//! ## Example
//!
//! ```rust
//! use seqbuf_core::{Reader, Sequence};
//!
//! let seq = Sequence::from_segments([vec![0x00u8, 0x00], vec![0x00, 0x05]]);
//! let mut reader = Reader::new(&seq);
//! assert_eq!(reader.try_read_big_endian(4).unwrap(), Some(5));
//! assert!(reader.end());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod iter;
mod position;
mod reader;
mod segment;
mod sequence;
mod writer;

pub use config::WriterConfig;
pub use error::{SequenceError, SequenceResult};
pub use iter::{Iter, Segments};
pub use position::Position;
pub use reader::Reader;
pub use segment::{ChainBuilder, ChainId, Segment, SegmentChain};
pub use sequence::Sequence;
pub use writer::{ArrayWriter, BufferWriter, BufferWriterExt, ByteWriterExt, SegmentWriter};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
