//! Property-based test generators using proptest.
//!
//! The central idea is a [`Segmented`] payload: one logical byte string
//! together with an arbitrary cut into segments. Every operation on a
//! sequence must give the same answer for the contiguous and the chained
//! layout of the same payload.

use proptest::prelude::*;
use seqbuf_core::Sequence;

/// A payload and the segment layout it is split into.
#[derive(Debug, Clone)]
pub struct Segmented {
    /// The logical bytes.
    pub data: Vec<u8>,
    /// The same bytes cut into segments, possibly with empty ones.
    pub parts: Vec<Vec<u8>>,
}

impl Segmented {
    /// Cuts `data` at the given offsets.
    pub fn new(data: Vec<u8>, cuts: &[usize]) -> Self {
        let parts = split_at(&data, cuts);
        Self { data, parts }
    }

    /// The payload as a single-block sequence.
    pub fn contiguous(&self) -> Sequence<u8> {
        Sequence::from_slice(&self.data)
    }

    /// The payload as a chained sequence following `parts`.
    pub fn chained(&self) -> Sequence<u8> {
        Sequence::from_segments(self.parts.iter().cloned())
    }
}

/// Splits `data` at every offset in `cuts`.
///
/// Cuts are sorted and clamped to the data length; repeated cuts produce
/// empty segments.
pub fn split_at(data: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = cuts.iter().map(|&cut| cut.min(data.len())).collect();
    cuts.sort_unstable();

    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        parts.push(data[start..cut].to_vec());
        start = cut;
    }
    parts.push(data[start..].to_vec());
    parts
}

/// Strategy for arbitrary payloads.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

/// Strategy for CRLF-delimited text, with or without a trailing delimiter.
pub fn crlf_text_strategy() -> impl Strategy<Value = Vec<u8>> {
    (
        prop::collection::vec(
            prop::string::string_regex("[a-z \r]{0,12}").expect("Invalid regex"),
            0..6,
        ),
        any::<bool>(),
    )
        .prop_map(|(lines, trailing)| {
            let mut text = lines.join("\r\n");
            if trailing {
                text.push_str("\r\n");
            }
            text.into_bytes()
        })
}

/// Cuts a payload from `payload` at up to eight random offsets.
pub fn segmented_from(
    payload: impl Strategy<Value = Vec<u8>>,
) -> impl Strategy<Value = Segmented> {
    payload
        .prop_flat_map(|data| {
            let len = data.len();
            (Just(data), prop::collection::vec(0..=len, 0..8))
        })
        .prop_map(|(data, cuts)| Segmented::new(data, &cuts))
}

/// Strategy for arbitrary payloads with arbitrary segment layouts.
pub fn segmented_strategy() -> impl Strategy<Value = Segmented> {
    segmented_from(payload_strategy())
}

/// Strategy for CRLF text with arbitrary segment layouts.
pub fn segmented_text_strategy() -> impl Strategy<Value = Segmented> {
    segmented_from(crlf_text_strategy())
}

/// Strategy for a segmented payload plus two ordered offsets into it.
pub fn segmented_with_range() -> impl Strategy<Value = (Segmented, usize, usize)> {
    segmented_strategy().prop_flat_map(|segmented| {
        let len = segmented.data.len();
        (Just(segmented), 0..=len).prop_flat_map(move |(segmented, a)| {
            (Just(segmented), Just(a), a..=len)
        })
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
