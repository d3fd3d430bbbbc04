//! Track storage module
//!
//! This module provides the `TrackPoint` and `Track` types produced by the parser,
//! together with the geometry helpers map views need (bounding box and polyline).

use geo::{Coord, LineString, Point, Rect};

/// One recorded sample along a trail
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TrackPoint {
    /// Latitude in degrees, within [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, within [-180, 180]
    pub longitude: f64,
    /// Elevation in meters, `None` when the log did not record a usable value
    pub elevation: Option<f64>,
}

impl TrackPoint {
    /// Create a new point
    pub fn new(latitude: f64, longitude: f64, elevation: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    /// The point as a `geo` point (x = longitude, y = latitude)
    #[inline]
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Ordered sequence of track points, in document order
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Track {
    points: Vec<TrackPoint>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Track {
    /// Create a track from points already in path order
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }

    /// All points in path order
    #[inline]
    pub fn points(&self) -> &[TrackPoint] {
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

    /// The first recorded point, where the trail starts
    #[inline]
    pub fn start(&self) -> Option<&TrackPoint> {
        self.points.first()
    }

    /// Number of points that carry a known elevation
    pub fn known_elevation_count(&self) -> usize {
        self.points.iter().filter(|p| p.elevation.is_some()).count()
    }

    /// A copy of this track walked in the opposite direction
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    /// Latitude/longitude bounding box (x = longitude, y = latitude)
    ///
    /// Returns `None` for an empty track.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let first = self.points.first()?;
        let mut min_x = first.longitude;
        let mut min_y = first.latitude;
        let mut max_x = first.longitude;
        let mut max_y = first.latitude;

        for p in &self.points[1..] {
            min_x = min_x.min(p.longitude);
            min_y = min_y.min(p.latitude);
            max_x = max_x.max(p.longitude);
            max_y = max_y.max(p.latitude);
        }

        Some(Rect::new(
            Coord { x: min_x, y: min_y },
            Coord { x: max_x, y: max_y },
        ))
    }

    /// The path as a polyline in document order
    pub fn line_string(&self) -> LineString<f64> {
        self.points
            .iter()
            .map(|p| Coord {
                x: p.longitude,
                y: p.latitude,
            })
            .collect()
    }
}

impl From<Vec<TrackPoint>> for Track {
    fn from(points: Vec<TrackPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<TrackPoint> for Track {
    fn from_iter<I: IntoIterator<Item = TrackPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a TrackPoint;
    type IntoIter = std::slice::Iter<'a, TrackPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
