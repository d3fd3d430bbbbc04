//! Utility functions for coordinate validation and output rounding

/// Valid latitude range in degrees (WGS84)
pub const MAX_LATITUDE: f64 = 90.0;

/// Valid longitude range in degrees (WGS84)
pub const MAX_LONGITUDE: f64 = 180.0;

/// Check if a latitude is finite and within [-90, 90]
#[inline(always)]
pub fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&lat)
}

/// Check if a longitude is finite and within [-180, 180]
#[inline(always)]
pub fn is_valid_longitude(lon: f64) -> bool {
    lon.is_finite() && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&lon)
}

/// Round to two decimal places (kilometre outputs)
///
/// Halfway cases round away from zero, as [`f64::round`] does.
#[inline(always)]
pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round an elevation in meters to a whole number for chart output
///
/// The float-to-int cast saturates, so absurd inputs cannot wrap around.
#[inline(always)]
pub fn round_meters(value: f64) -> i32 {
    value.round() as i32
}

/// Format a coordinate pair as a `"lat, lon"` label with 4 decimal places
pub fn format_lat_lon(lat: f64, lon: f64) -> String {
    format!("{lat:.4}, {lon:.4}")
}
