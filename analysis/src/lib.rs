//! This library turns the analysis of a song into the data behind a bar-style visualization.
//!
//! The chromagram and tempo are computed upstream (by whatever audio-analysis tool the caller
//! prefers), this crate only deals with what comes after:
//! - [`bars`] collapses a chromagram into a fixed number of normalized bar heights,
//! - [`tempo`] picks a tempo category (and its color palette) from a BPM estimate,
//! - [`visualization`] bundles everything into the document the static viewer reads.
//!
//! Nothing in here does any I/O.

#![deny(clippy::missing_inline_in_public_items)]

pub mod bars;
pub mod errors;
pub mod tempo;
pub mod visualization;

pub use bars::{BarCount, DEFAULT_NUM_BARS, extract_bars};
pub use tempo::TempoCategory;
pub use visualization::Visualization;

/// The Type of individual features
pub type Feature = f64;
