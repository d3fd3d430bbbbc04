//! Trip summary metrics
//!
//! Aggregates a whole track into the three fields a trip record stores: total
//! distance, total elevation gain and a start-location label.

use crate::{Track, geodesic, utils};

/// Summary of a track, ready to be stored verbatim on a trip record
///
/// `Default` is the zero-valued summary used when a track log cannot be parsed.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Metrics {
    /// Total path length in kilometres, rounded to 2 decimals
    pub total_distance_km: f64,
    /// Sum of positive elevation changes in meters, rounded to whole meters
    pub total_elevation_gain_m: f64,
    /// First point as `"lat, lon"` with 4 decimals, empty for an empty track
    pub start_location: String,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Metrics {
    /// Compute the summary of a track, see [`compute_metrics`]
    pub fn from_track(track: &Track) -> Self {
        compute_metrics(track)
    }

    /// Whether this is the zero-valued summary
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Compute distance, elevation gain and start label in a single pass
///
/// Elevation gain only counts rises between points with a known elevation. A point
/// without elevation is skipped: the next known value is compared against the last
/// known one, not against zero.
///
/// Rounding happens once, on the final totals.
pub fn compute_metrics(track: &Track) -> Metrics {
    #[cfg(feature = "profiling")]
    profiling::scope!("metrics::compute");

    let points = track.points();
    let Some(first) = points.first() else {
        return Metrics::default();
    };

    let mut total_distance = 0.0;
    let mut total_gain = 0.0;
    let mut last_elevation = first.elevation;

    for pair in points.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        total_distance += geodesic::distance_km(prev, current);

        if let Some(elevation) = current.elevation {
            if let Some(last) = last_elevation {
                total_gain += (elevation - last).max(0.0);
            }
            last_elevation = Some(elevation);
        }
    }

    tracing::debug!(
        points = points.len(),
        distance_km = total_distance,
        gain_m = total_gain,
        "Computed track metrics"
    );

    Metrics {
        total_distance_km: utils::round_2dp(total_distance),
        total_elevation_gain_m: total_gain.round(),
        start_location: utils::format_lat_lon(first.latitude, first.longitude),
    }
}
