//! Trail Metrics - Summaries and Elevation Profiles for GPX Track Logs
//!
//! This library turns the raw text of a track log into the numbers a trip record needs:
//! total distance, total elevation gain, a start-location label and a downsampled
//! elevation profile for charting.
//!
//! # Architecture
//!
//! - **[`parse_track`]**: Single streaming pass from GPX text to an ordered [`Track`]
//! - **[`geodesic::distance_km`]**: Haversine great-circle distance, shared by every consumer
//! - **[`compute_metrics`]**: One pass over a track producing [`Metrics`]
//! - **[`sample_profile`]**: Strided (distance, elevation) series producing a [`Profile`]
//!
//! Both the aggregator and the sampler walk the same track with the same distance
//! function, so a stored summary and a displayed chart always agree on distance.
//!
//! # Performance Characteristics
//!
//! - **Parse**: O(N) in document size, no DOM is built
//! - **Metrics / Profile**: O(N) in track points, no allocation besides the output
//! - **State**: none; every operation is a pure function and safe to call from many threads

pub mod geodesic;
mod metrics;
mod parser;
mod profile;
mod track;
pub mod utils;

// Public API exports
pub use metrics::{Metrics, compute_metrics};
pub use parser::{parse_track, read_track};
pub use profile::{DEFAULT_STRIDE, Profile, ProfilePoint, max_profile_len, sample_profile};
pub use track::{Track, TrackPoint};

/// Error types for track parsing
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Malformed track point #{index}: {reason}")]
    MalformedTrackPoint { index: usize, reason: String },

    #[error("XML parsing error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
