//! GPX track log parsing
//!
//! A single streaming pass over the XML events builds the [`Track`]. Only `trkpt`
//! elements are read: their `lat`/`lon` attributes and the first `ele` inside them.
//! Everything else in the document (metadata, waypoints, routes, extensions) is
//! skipped.
//!
//! Coordinates are validated here and never defaulted: a bad `lat` or `lon` fails
//! the whole parse. A bad or missing `ele` only makes that point's elevation unknown.

use crate::{Result, Track, TrackError, TrackPoint, utils};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Parse GPX text into a track
///
/// A document without any track point is valid and yields an empty track.
///
/// # Errors
/// - [`TrackError::MalformedTrackPoint`] if a point has a missing, non-numeric or
///   out-of-range latitude or longitude
/// - [`TrackError::Xml`] if the document is not well-formed XML, including a document
///   that ends with elements still open or a `trkpt` nested in another one
pub fn parse_track(text: &str) -> Result<Track> {
    #[cfg(feature = "profiling")]
    profiling::scope!("parser::parse_track");

    let mut reader = Reader::from_str(text);
    let mut points = Vec::new();
    let mut open_point: Option<PointBuilder> = None;
    // Elements opened but not yet closed
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error(reader.error_position() as u64, e))?;

        match event {
            Event::Start(e) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"trkpt" => {
                        let position = reader.buffer_position() as u64;
                        if open_point.is_some() {
                            return Err(xml_error(position, "<trkpt> nested in an open <trkpt>"));
                        }
                        open_point = Some(PointBuilder::open(&e, points.len(), position)?);
                    }
                    b"ele" => {
                        if let Some(point) = open_point.as_mut() {
                            point.enter_elevation();
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                // Self-closing <trkpt .../> has no elevation
                if e.local_name().as_ref() == b"trkpt" {
                    let position = reader.buffer_position() as u64;
                    points.push(PointBuilder::open(&e, points.len(), position)?.finish());
                }
            }
            Event::Text(e) => {
                if let Some(point) = open_point.as_mut().filter(|p| p.in_elevation) {
                    let text = e
                        .unescape()
                        .map_err(|err| xml_error(reader.buffer_position() as u64, err))?;
                    point.elevation_text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(point) = open_point.as_mut().filter(|p| p.in_elevation) {
                    let text = std::str::from_utf8(&e)
                        .map_err(|err| xml_error(reader.buffer_position() as u64, err))?;
                    point.elevation_text.push_str(text);
                }
            }
            Event::End(e) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    xml_error(
                        reader.buffer_position() as u64,
                        "closing tag without a matching start",
                    )
                })?;
                match e.local_name().as_ref() {
                    b"trkpt" => {
                        if let Some(point) = open_point.take() {
                            points.push(point.finish());
                        }
                    }
                    b"ele" => {
                        if let Some(point) = open_point.as_mut() {
                            point.leave_elevation();
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof if depth > 0 => {
                let position = reader.buffer_position() as u64;
                return Err(xml_error(
                    position,
                    format!("unexpected end of document: {depth} element(s) left open"),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let track = Track::new(points);
    tracing::debug!(
        points = track.len(),
        with_elevation = track.known_elevation_count(),
        "Parsed track log"
    );
    Ok(track)
}

/// Read and parse a GPX file
///
/// # Errors
/// [`TrackError::Io`] if the file cannot be read, otherwise as [`parse_track`].
pub fn read_track(path: impl AsRef<Path>) -> Result<Track> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "Read track log");
    parse_track(&text)
}

impl FromStr for Track {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        parse_track(s)
    }
}

/// Track point being assembled while its element is open
struct PointBuilder {
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
    elevation_text: String,
    in_elevation: bool,
    /// Only the first <ele> of a point is read
    elevation_seen: bool,
}

impl PointBuilder {
    /// Validate the coordinates of a `trkpt` start tag
    fn open(element: &BytesStart<'_>, index: usize, position: u64) -> Result<Self> {
        let mut lat = None;
        let mut lon = None;

        for attr in element.attributes() {
            let attr = attr.map_err(|e| xml_error(position, e))?;
            match attr.key.local_name().as_ref() {
                key @ (b"lat" | b"lon") => {
                    let value = attr
                        .unescape_value()
                        .map_err(|e| xml_error(position, e))?
                        .into_owned();
                    if key == b"lat" {
                        lat = Some(value);
                    } else {
                        lon = Some(value);
                    }
                }
                _ => {}
            }
        }

        let latitude = parse_coordinate(lat.as_deref(), "lat", index, utils::is_valid_latitude)?;
        let longitude =
            parse_coordinate(lon.as_deref(), "lon", index, utils::is_valid_longitude)?;

        Ok(Self {
            latitude,
            longitude,
            elevation: None,
            elevation_text: String::new(),
            in_elevation: false,
            elevation_seen: false,
        })
    }

    fn enter_elevation(&mut self) {
        if !self.elevation_seen {
            self.in_elevation = true;
        }
    }

    fn leave_elevation(&mut self) {
        if self.in_elevation {
            self.in_elevation = false;
            self.elevation_seen = true;
            self.elevation = parse_elevation(&self.elevation_text);
        }
    }

    fn finish(self) -> TrackPoint {
        TrackPoint::new(self.latitude, self.longitude, self.elevation)
    }
}

fn parse_coordinate(
    value: Option<&str>,
    name: &str,
    index: usize,
    is_valid: fn(f64) -> bool,
) -> Result<f64> {
    let malformed = |reason: String| TrackError::MalformedTrackPoint { index, reason };

    let raw = value.ok_or_else(|| malformed(format!("missing '{name}' attribute")))?;
    let parsed: f64 = raw
        .trim()
        .parse()
        .map_err(|_| malformed(format!("'{name}' is not a number: {raw:?}")))?;

    if !parsed.is_finite() {
        return Err(malformed(format!("'{name}' is not a finite number: {raw:?}")));
    }
    if !is_valid(parsed) {
        return Err(malformed(format!("'{name}' out of range: {parsed}")));
    }
    Ok(parsed)
}

/// Empty, non-numeric and non-finite elevations are unknown, never zero
fn parse_elevation(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|ele| ele.is_finite())
}

fn xml_error(position: u64, err: impl Display) -> TrackError {
    TrackError::Xml {
        position,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><name>Test</name><trkseg>
{body}
  </trkseg></trk>
</gpx>"#
        )
    }

    fn assert_malformed(text: &str, expected_index: usize) {
        match parse_track(text) {
            Err(TrackError::MalformedTrackPoint { index, .. }) => {
                assert_eq!(index, expected_index)
            }
            other => panic!("expected MalformedTrackPoint, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_points_in_document_order() {
        let text = wrap(
            r#"<trkpt lat="46.5197" lon="8.0"><ele>1200.5</ele><time>2024-06-01T08:00:00Z</time></trkpt>
<trkpt lat="46.5201" lon="8.0012"><ele>1210</ele></trkpt>
<trkpt lat="46.5210" lon="8.0020"><ele>1195.25</ele></trkpt>"#,
        );
        let track = parse_track(&text).unwrap();

        assert_eq!(
            track.points(),
            &[
                TrackPoint::new(46.5197, 8.0, Some(1200.5)),
                TrackPoint::new(46.5201, 8.0012, Some(1210.0)),
                TrackPoint::new(46.5210, 8.0020, Some(1195.25)),
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_track("").unwrap().is_empty());
        assert!(parse_track(&wrap("")).unwrap().is_empty());
        assert!(parse_track("<gpx version=\"1.1\"/>").unwrap().is_empty());
    }

    #[test]
    fn test_missing_elevation_is_unknown() {
        let text = wrap(
            r#"<trkpt lat="0" lon="0"><ele>100</ele></trkpt>
<trkpt lat="0" lon="1"></trkpt>
<trkpt lat="0" lon="2"/>
<trkpt lat="0" lon="3"><ele></ele></trkpt>
<trkpt lat="0" lon="4"><ele>n/a</ele></trkpt>
<trkpt lat="0" lon="5"><ele>NaN</ele></trkpt>"#,
        );
        let track = parse_track(&text).unwrap();

        assert_eq!(track.len(), 6);
        assert_eq!(track.points()[0].elevation, Some(100.0));
        assert!(track.points()[1..].iter().all(|p| p.elevation.is_none()));
    }

    #[test]
    fn test_elevation_whitespace_and_cdata() {
        let text = wrap(
            r#"<trkpt lat="1" lon="1"><ele>
    812.4
</ele></trkpt>
<trkpt lat="1" lon="2"><ele><![CDATA[815]]></ele></trkpt>"#,
        );
        let track = parse_track(&text).unwrap();
        assert_eq!(track.points()[0].elevation, Some(812.4));
        assert_eq!(track.points()[1].elevation, Some(815.0));
    }

    #[test]
    fn test_only_first_elevation_counts() {
        let text = wrap(
            r#"<trkpt lat="1" lon="1"><ele>10</ele><extensions><ele>9999</ele></extensions></trkpt>"#,
        );
        assert_eq!(parse_track(&text).unwrap().points()[0].elevation, Some(10.0));
    }

    #[test]
    fn test_elevation_outside_track_point_is_ignored() {
        let text = wrap(r#"<trkpt lat="1" lon="1"/>"#).replace(
            "<trk>",
            r#"<wpt lat="5" lon="5"><ele>3000</ele></wpt><trk>"#,
        );
        let track = parse_track(&text).unwrap();
        assert_eq!(track.points(), &[TrackPoint::new(1.0, 1.0, None)]);
    }

    #[test]
    fn test_waypoints_and_route_points_are_ignored() {
        let text = r#"<gpx version="1.1">
  <wpt lat="10" lon="10"><name>Hut</name></wpt>
  <rte><rtept lat="11" lon="11"/></rte>
  <trk><trkseg><trkpt lat="12" lon="12"/></trkseg></trk>
</gpx>"#;
        let track = parse_track(text).unwrap();
        assert_eq!(track.points(), &[TrackPoint::new(12.0, 12.0, None)]);
    }

    #[test]
    fn test_multiple_segments_are_concatenated() {
        let text = r#"<gpx version="1.1"><trk>
  <trkseg><trkpt lat="1" lon="1"/><trkpt lat="2" lon="2"/></trkseg>
  <trkseg><trkpt lat="3" lon="3"/></trkseg>
</trk><trk><trkseg><trkpt lat="4" lon="4"/></trkseg></trk></gpx>"#;
        let lats: Vec<f64> = parse_track(text)
            .unwrap()
            .points()
            .iter()
            .map(|p| p.latitude)
            .collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_namespace_prefix_is_ignored() {
        let text = r#"<g:gpx xmlns:g="http://www.topografix.com/GPX/1/1" version="1.1">
  <g:trk><g:trkseg><g:trkpt lat="45.1" lon="6.2"><g:ele>2000</g:ele></g:trkpt></g:trkseg></g:trk>
</g:gpx>"#;
        let track = parse_track(text).unwrap();
        assert_eq!(track.points(), &[TrackPoint::new(45.1, 6.2, Some(2000.0))]);
    }

    #[test]
    fn test_attribute_order_and_extra_attributes() {
        let text = wrap(r#"<trkpt foo="bar" lon="-3.5" lat="-12.25"/>"#);
        let track = parse_track(&text).unwrap();
        assert_eq!(track.points(), &[TrackPoint::new(-12.25, -3.5, None)]);
    }

    #[test]
    fn test_latitude_out_of_range() {
        assert_malformed(&wrap(r#"<trkpt lat="95" lon="8"/>"#), 0);
    }

    #[test]
    fn test_longitude_out_of_range() {
        let text = wrap(
            r#"<trkpt lat="1" lon="1"/>
<trkpt lat="1" lon="180.01"/>"#,
        );
        assert_malformed(&text, 1);
    }

    #[test]
    fn test_missing_coordinates() {
        assert_malformed(&wrap(r#"<trkpt lon="8"/>"#), 0);
        assert_malformed(&wrap(r#"<trkpt lat="8"><ele>1</ele></trkpt>"#), 0);
    }

    #[test]
    fn test_non_numeric_coordinates() {
        let text = wrap(
            r#"<trkpt lat="1" lon="1"/>
<trkpt lat="1" lon="1"/>
<trkpt lat="north" lon="1"/>"#,
        );
        assert_malformed(&text, 2);
        assert_malformed(&wrap(r#"<trkpt lat="" lon="1"/>"#), 0);
        assert_malformed(&wrap(r#"<trkpt lat="NaN" lon="1"/>"#), 0);
        assert_malformed(&wrap(r#"<trkpt lat="1" lon="inf"/>"#), 0);
    }

    #[test]
    fn test_error_message_names_the_attribute() {
        let err = parse_track(&wrap(r#"<trkpt lat="95" lon="8"/>"#)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed track point #0: 'lat' out of range: 95"
        );
    }

    #[test]
    fn test_malformed_xml() {
        let text = wrap(r#"<trkpt lat="1" lon="1"><ele>5</trkpt>"#);
        assert!(matches!(parse_track(&text), Err(TrackError::Xml { .. })));
    }

    #[test]
    fn test_truncated_document() {
        // Cut off inside the second point: returning the first alone would shorten the trail
        let text = r#"<gpx><trk><trkseg><trkpt lat="0" lon="0"><ele>100</ele></trkpt><trkpt lat="0" lon="1"><ele>150</ele>"#;
        assert!(matches!(parse_track(text), Err(TrackError::Xml { .. })));
    }

    #[test]
    fn test_truncated_between_points() {
        let text = r#"<gpx><trk><trkseg><trkpt lat="0" lon="0"><ele>100</ele></trkpt>"#;
        match parse_track(text) {
            Err(TrackError::Xml { message, .. }) => {
                assert!(message.contains("3 element(s) left open"), "{message}")
            }
            other => panic!("expected Xml error, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_track_point() {
        let text = wrap(
            r#"<trkpt lat="0" lon="0"><trkpt lat="0" lon="1"><ele>5</ele></trkpt></trkpt>"#,
        );
        assert!(matches!(parse_track(&text), Err(TrackError::Xml { .. })));
    }

    #[test]
    fn test_from_str() {
        let track: Track = r#"<trkpt lat="1" lon="2"/>"#.parse().unwrap();
        assert_eq!(track.len(), 1);
    }

    #[test]
    fn test_read_track_missing_file() {
        let result = read_track("/definitely/not/a/real/file.gpx");
        assert!(matches!(result, Err(TrackError::Io(_))));
    }

    #[test]
    fn test_reads_documents_written_by_gpx_crate() {
        use gpx::{Gpx, GpxVersion, Track as GpxTrack, TrackSegment, Waypoint};

        let mut gpx = Gpx {
            version: GpxVersion::Gpx11,
            creator: Some("trail-metrics tests".to_string()),
            ..Default::default()
        };
        let mut segment = TrackSegment::default();
        for i in 0..5 {
            let mut waypoint =
                Waypoint::new(geo::Point::new(8.0 + i as f64 * 0.001, 46.5 + i as f64 * 0.001));
            if i != 2 {
                waypoint.elevation = Some(1000.0 + i as f64 * 10.0);
            }
            segment.points.push(waypoint);
        }
        let mut track = GpxTrack::default();
        track.segments.push(segment);
        gpx.tracks.push(track);

        let mut buffer = Vec::new();
        gpx::write(&gpx, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let parsed = parse_track(&text).unwrap();
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed.points()[0].latitude, 46.5);
        assert_eq!(parsed.points()[0].longitude, 8.0);
        assert_eq!(parsed.points()[1].elevation, Some(1010.0));
        assert_eq!(parsed.points()[2].elevation, None);
        assert_eq!(parsed.known_elevation_count(), 4);
    }
}
