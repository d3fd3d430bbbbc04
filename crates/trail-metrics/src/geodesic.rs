//! Great-circle distance between track points
//!
//! Every distance in this crate (summary totals and chart axes alike) comes from
//! [`distance_km`]. Keep it that way: two copies of the formula drift apart.

use crate::TrackPoint;

/// Earth's mean radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometres
///
/// Symmetric, and exactly `0.0` for identical points.
#[inline]
pub fn distance_km(a: &TrackPoint, b: &TrackPoint) -> f64 {
    haversine_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Haversine distance between two (lat, lon) pairs given in degrees, in kilometres
#[inline]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Running distance from the first point, one entry per point
///
/// Yields `0.0` for the first point, then the accumulated haversine distance up to
/// and including each following point.
pub fn cumulative_km(points: &[TrackPoint]) -> impl Iterator<Item = f64> + '_ {
    let mut total = 0.0;
    let mut prev: Option<&TrackPoint> = None;
    points.iter().map(move |p| {
        if let Some(prev) = prev {
            total += distance_km(prev, p);
        }
        prev = Some(p);
        total
    })
}
