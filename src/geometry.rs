//! Planar geometry primitives used by the section projector
//!
//! Thin wrappers around the `geo` crate: line length, interpolation by
//! along-line distance, nearest-point projection and corridor membership.

use geo::{
    Coord, Densify, EuclideanDistance, EuclideanLength, LineInterpolatePoint, LineLocatePoint,
    LineString, Point,
};
use serde::{Deserialize, Serialize};

use crate::error::{XsError, XsResult};

/// Samples per buffer distance when testing line geometries against the
/// corridor
const CORRIDOR_SAMPLES: f64 = 64.0;

/// Geometry of a field entity (borehole, point, point-of-interest)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "lowercase")]
pub enum Geometry {
    Point(Point<f64>),
    Line(LineString<f64>),
}

impl Geometry {
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point(Point::new(x, y))
    }

    pub fn line(coords: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Geometry::Line(coords.into_iter().map(Coord::from).collect())
    }

    /// Location used for projection and bearing: the point itself, or the
    /// first vertex of a line.
    pub fn anchor(&self) -> Option<Point<f64>> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::Line(ls) => ls.points().next(),
        }
    }

    pub fn vertices(&self) -> Vec<Point<f64>> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::Line(ls) => ls.points().collect(),
        }
    }
}

/// Reference line of a cross-section with its length cached.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    line: LineString<f64>,
    length: f64,
}

impl ReferenceLine {
    /// Wrap a line string. Needs at least two finite coordinates; a line of
    /// zero length is accepted here and rejected by operations that divide
    /// by the length.
    pub fn new(line: LineString<f64>) -> XsResult<Self> {
        if line.0.len() < 2 {
            return Err(XsError::degenerate(format!(
                "reference line needs at least two coordinates, got {}",
                line.0.len()
            )));
        }
        if line.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(XsError::degenerate(
                "reference line has non-finite coordinates",
            ));
        }
        let length = line.euclidean_length();
        Ok(Self { line, length })
    }

    pub fn from_coords(coords: impl IntoIterator<Item = (f64, f64)>) -> XsResult<Self> {
        Self::new(coords.into_iter().map(Coord::from).collect())
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_degenerate(&self) -> bool {
        self.length <= 0.0
    }

    pub fn line_string(&self) -> &LineString<f64> {
        &self.line
    }

    pub fn start(&self) -> Coord<f64> {
        self.line.0[0]
    }

    pub fn end(&self) -> Coord<f64> {
        self.line.0[self.line.0.len() - 1]
    }

    /// Coordinate at `distance` along the line, clamped to the endpoints.
    pub fn interpolate(&self, distance: f64) -> Coord<f64> {
        if self.is_degenerate() || distance <= 0.0 {
            return self.start();
        }
        if distance >= self.length {
            return self.end();
        }
        self.line
            .line_interpolate_point(distance / self.length)
            .map(|p| p.0)
            .unwrap_or_else(|| self.end())
    }

    /// Along-line distance of the point on the line nearest to `point`.
    ///
    /// Points beyond either end project onto that end (0 or `length`).
    pub fn project(&self, point: &Point<f64>) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        match self.line.line_locate_point(point) {
            Some(fraction) => fraction * self.length,
            None => 0.0,
        }
    }

    /// Shortest planar distance from `point` to the line
    pub fn distance_to(&self, point: &Point<f64>) -> f64 {
        self.line.euclidean_distance(point)
    }

    /// Shortest distance between `geometry` and the line; 0 when a line
    /// geometry crosses it.
    pub fn distance_to_geometry(&self, geometry: &Geometry) -> Option<f64> {
        match geometry {
            Geometry::Point(p) => Some(self.distance_to(p)),
            Geometry::Line(ls) => match ls.0.len() {
                0 => None,
                1 => Some(self.distance_to(&Point::from(ls.0[0]))),
                _ => Some(self.line.euclidean_distance(ls)),
            },
        }
    }

    /// Whether `geometry` lies strictly inside the corridor of half-width
    /// `buffer_distance` around the line.
    ///
    /// Line geometries are densified to steps of
    /// `buffer_distance / CORRIDOR_SAMPLES` so that segments leaving the
    /// corridor between two vertices are rejected.
    pub fn buffer_contains(&self, geometry: &Geometry, buffer_distance: f64) -> bool {
        if !(buffer_distance > 0.0) {
            return false;
        }
        let vertices = geometry.vertices();
        let finite = |p: &Point<f64>| p.x().is_finite() && p.y().is_finite();
        if vertices.is_empty() || !vertices.iter().all(finite) {
            return false;
        }
        let inside = |p: &Point<f64>| self.distance_to(p) < buffer_distance;
        match geometry {
            Geometry::Point(p) => inside(p),
            Geometry::Line(ls) => ls
                .densify(buffer_distance / CORRIDOR_SAMPLES)
                .points()
                .all(|p| inside(&p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn l_shape() -> ReferenceLine {
        ReferenceLine::from_coords([(0.0, 0.0), (10.0, 0.0), (10.0, 5.0)]).unwrap()
    }

    #[test]
    fn test_length_and_endpoints() {
        let line = l_shape();
        assert!(approx_eq(line.length(), 15.0));
        assert_eq!(line.start(), Coord { x: 0.0, y: 0.0 });
        assert_eq!(line.end(), Coord { x: 10.0, y: 5.0 });
    }

    #[test]
    fn test_rejects_short_line() {
        let err = ReferenceLine::from_coords([(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, XsError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_interpolate_across_vertex() {
        let line = l_shape();
        let c = line.interpolate(12.0);
        assert!(approx_eq(c.x, 10.0));
        assert!(approx_eq(c.y, 2.0));
        assert_eq!(line.interpolate(-1.0), line.start());
        assert_eq!(line.interpolate(99.0), line.end());
    }

    #[test]
    fn test_project_clamps_to_ends() {
        let line = l_shape();
        assert!(approx_eq(line.project(&Point::new(4.0, 1.0)), 4.0));
        assert_eq!(line.project(&Point::new(-3.0, 0.5)), 0.0);
        assert!(approx_eq(line.project(&Point::new(11.0, 3.0)), 13.0));
    }

    #[test]
    fn test_buffer_contains() {
        let line = l_shape();
        assert!(line.buffer_contains(&Geometry::point(5.0, 0.9), 1.0));
        assert!(!line.buffer_contains(&Geometry::point(5.0, 1.0), 1.0));
        assert!(!line.buffer_contains(&Geometry::point(5.0, -3.0), 1.0));
        let seg = Geometry::line([(2.0, 0.5), (3.0, 0.5)]);
        assert!(line.buffer_contains(&seg, 1.0));
        assert_eq!(seg.anchor(), Some(Point::new(2.0, 0.5)));
    }

    #[test]
    fn test_crossing_line_has_zero_distance() {
        let line = l_shape();
        let crossing = Geometry::line([(3.0, 1.0), (3.0, -1.0)]);
        assert_eq!(line.distance_to_geometry(&crossing), Some(0.0));
        let parallel = Geometry::line([(2.0, -0.5), (6.0, -0.5)]);
        let distance = line.distance_to_geometry(&parallel).unwrap();
        assert!(approx_eq(distance, 0.5));
        let single = Geometry::line([(4.0, 2.0)]);
        assert!(approx_eq(line.distance_to_geometry(&single).unwrap(), 2.0));
    }

    #[test]
    fn test_buffer_rejects_segment_leaving_corridor() {
        let line = ReferenceLine::from_coords([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]).unwrap();
        // both vertices lie inside, the midpoint (7.25, 2.75) does not
        let shortcut = Geometry::line([(5.0, 0.5), (9.5, 5.0)]);
        assert!(!line.buffer_contains(&shortcut, 1.0));
        let along = Geometry::line([(5.0, 0.5), (9.5, 0.5), (9.5, 5.0)]);
        assert!(line.buffer_contains(&along, 1.0));
        assert!(!line.buffer_contains(&Geometry::point(5.0, 0.0), 0.0));
    }

    #[test]
    fn test_zero_length_line_is_degenerate() {
        let line = ReferenceLine::from_coords([(3.0, 3.0), (3.0, 3.0)]).unwrap();
        assert!(line.is_degenerate());
        assert_eq!(line.project(&Point::new(4.0, 4.0)), 0.0);
        assert_eq!(line.interpolate(1.0), Coord { x: 3.0, y: 3.0 });
    }
}
