//! Elevation profile sampling for charts
//!
//! Long track logs hold tens of thousands of points, far more than a chart needs.
//! [`sample_profile`] keeps every `stride`-th point plus both endpoints, while the
//! distance axis is still accumulated over every point of the track.
//!
//! Unknown elevations are charted as 0 m. The metrics aggregator skips them instead;
//! a chart needs a value at every sample, a summary statistic must not invent one.

use crate::{Track, geodesic, utils};
use std::num::NonZeroUsize;

/// Default sampling stride: keep one point out of ten
pub const DEFAULT_STRIDE: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// One chart sample
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfilePoint {
    /// Distance from the start of the track in kilometres, rounded to 2 decimals
    #[cfg_attr(feature = "serde", serde(rename = "distance"))]
    pub cumulative_distance_km: f64,
    /// Elevation in whole meters, 0 when unknown
    #[cfg_attr(feature = "serde", serde(rename = "elevation"))]
    pub elevation_m: i32,
}

/// Downsampled (distance, elevation) series
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Profile {
    points: Vec<ProfilePoint>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Profile {
    /// Sample a track with [`DEFAULT_STRIDE`]
    pub fn from_track(track: &Track) -> Self {
        sample_profile(track, DEFAULT_STRIDE)
    }

    #[inline]
    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&ProfilePoint> {
        self.points.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&ProfilePoint> {
        self.points.last()
    }

    pub fn into_points(self) -> Vec<ProfilePoint> {
        self.points
    }
}

impl<'a> IntoIterator for &'a Profile {
    type Item = &'a ProfilePoint;
    type IntoIter = std::slice::Iter<'a, ProfilePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Maximum number of samples produced for `n` points at the given stride
///
/// `floor((n - 1) / stride) + 2` for non-empty tracks: the multiples of the stride,
/// plus one for a final point that is not itself a multiple.
pub fn max_profile_len(n: usize, stride: NonZeroUsize) -> usize {
    match n {
        0 => 0,
        n => (n - 1) / stride.get() + 2,
    }
}

/// Sample a track into a chart series
///
/// Keeps index 0, every index that is a multiple of `stride`, and the last point.
/// Each sample's distance is the running haversine total over the full track, so the
/// chart's last sample lands on the same distance as the track's metrics.
pub fn sample_profile(track: &Track, stride: NonZeroUsize) -> Profile {
    #[cfg(feature = "profiling")]
    profiling::scope!("profile::sample");

    let points = track.points();
    let Some(last_index) = points.len().checked_sub(1) else {
        return Profile::default();
    };

    let mut samples = Vec::with_capacity(max_profile_len(points.len(), stride));
    for (index, (point, distance)) in points
        .iter()
        .zip(geodesic::cumulative_km(points))
        .enumerate()
    {
        if index % stride.get() == 0 || index == last_index {
            samples.push(ProfilePoint {
                cumulative_distance_km: utils::round_2dp(distance),
                elevation_m: point.elevation.map_or(0, utils::round_meters),
            });
        }
    }

    tracing::debug!(
        points = points.len(),
        samples = samples.len(),
        stride = stride.get(),
        "Sampled elevation profile"
    );

    Profile { points: samples }
}
