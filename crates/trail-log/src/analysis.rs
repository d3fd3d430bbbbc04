//! Trip analysis: the engine outputs as the trip record and the chart consume them
//!
//! The two consumers treat a bad track log differently, and must keep doing so:
//!
//! - the trip summary falls back to zero metrics, so saving a trip never fails
//!   because of its track log;
//! - the chart falls back to an explicit "no data" state, so a broken or empty
//!   log never shows up as a flat line at 0 km.

use crate::error::{CliError, Result};
use geo::Rect;
use rayon::prelude::*;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use trail_metrics::{Metrics, Profile, Track, TrackError, compute_metrics, sample_profile};

/// What the chart should display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ChartData {
    /// Samples to plot, never empty
    Series { points: Profile },
    /// Nothing to plot: the log had no track points or could not be parsed
    NoData,
}

/// Options shared by every analyzed file
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub stride: NonZeroUsize,
    pub include_profile: bool,
}

/// Analysis of a single track log
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAnalysis {
    pub file: PathBuf,
    pub summary: Metrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartData>,
    pub point_count: usize,
    pub points_with_elevation: usize,
    /// Area the map view should fit, in degrees (x = longitude, y = latitude)
    pub bounds: Option<Rect<f64>>,
    /// Parse failure, when one of the fallbacks was taken
    pub error: Option<String>,
}

/// Trip summary for a parse result; a failed parse yields zero metrics
pub fn summary_for(parsed: &std::result::Result<Track, TrackError>) -> Metrics {
    match parsed {
        Ok(track) => compute_metrics(track),
        Err(e) => {
            tracing::warn!("Track log could not be parsed, storing zero metrics: {e}");
            Metrics::default()
        }
    }
}

/// Chart data for a parse result; a failed parse or an empty track yields `NoData`
pub fn chart_for(
    parsed: &std::result::Result<Track, TrackError>,
    stride: NonZeroUsize,
) -> ChartData {
    match parsed {
        Ok(track) if !track.is_empty() => ChartData::Series {
            points: sample_profile(track, stride),
        },
        Ok(_) => ChartData::NoData,
        Err(e) => {
            tracing::warn!("Track log could not be parsed, chart has no data: {e}");
            ChartData::NoData
        }
    }
}

/// Analyze the text of one track log
pub fn analyze_text(file: &Path, text: &str, options: AnalysisOptions) -> TripAnalysis {
    #[cfg(feature = "profiling")]
    profiling::scope!("analysis::analyze_text");

    let parsed = trail_metrics::parse_track(text);

    let summary = summary_for(&parsed);
    let chart = options
        .include_profile
        .then(|| chart_for(&parsed, options.stride));

    let (point_count, points_with_elevation, bounds) = match &parsed {
        Ok(track) => (track.len(), track.known_elevation_count(), track.bounds()),
        Err(_) => (0, 0, None),
    };

    TripAnalysis {
        file: file.to_path_buf(),
        summary,
        chart,
        point_count,
        points_with_elevation,
        bounds,
        error: parsed.err().map(|e| e.to_string()),
    }
}

/// Read and analyze one file
pub fn analyze_file(path: &Path, options: AnalysisOptions) -> Result<TripAnalysis> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "Analyzing track log");
    Ok(analyze_text(path, &text, options))
}

/// Analyze many files in parallel, keeping the input order in the results
pub fn analyze_files(paths: &[PathBuf], options: AnalysisOptions) -> Vec<Result<TripAnalysis>> {
    paths
        .par_iter()
        .map(|path| analyze_file(path, options))
        .collect()
}
