//! # seqbuf testkit
//!
//! Test utilities for seqbuf.
//!
//! This crate provides:
//! - Fixtures for the canonical multi-segment layouts
//! - Reader drivers and naive reference implementations
//! - Property-based generators that cut one payload into arbitrary segments
//! - Fuzz targets comparing chained and contiguous layouts
//!
//! ## Usage
//!
//! ```rust
//! use seqbuf_testkit::prelude::*;
//!
//! let seq = hello_world();
//! let (records, tail) = read_records(&seq, b"\r\n");
//! assert_eq!(records, vec![b"Hello".to_vec()]);
//! assert_eq!(tail, b"World");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod fuzz;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
