//! Compass bearings and direction labels

use crate::error::{XsError, XsResult};

/// Labels of the eight-point rose. The last sector wraps around north.
pub const EIGHT_POINT_LABELS: [&str; 9] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW", "N"];

/// Lower thresholds (degrees) of the eight-point sectors
pub const EIGHT_POINT_DIRECTIONS: [f64; 9] =
    [0.0, 22.5, 67.5, 112.5, 157.5, 202.5, 247.5, 292.5, 337.5];

/// Bearing in degrees `[0, 360)` from `(lx, ly)` to `(px, py)`, clockwise
/// from north.
pub fn bearing(px: f64, py: f64, lx: f64, ly: f64) -> f64 {
    let degrees = (px - lx).atan2(py - ly).to_degrees();
    let wrapped = (degrees + 360.0) % 360.0;
    // -0.0 and values rounding up to 360.0
    if wrapped >= 360.0 || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Sector {
    threshold: f64,
    label: String,
}

/// Sorted boundary table mapping bearings to labels.
///
/// A bearing falls in the sector with the largest threshold strictly below
/// it, so a bearing equal to a threshold belongs to the lower sector. A
/// bearing at or below every threshold wraps to the highest sector.
#[derive(Debug, Clone, PartialEq)]
pub struct CompassRose {
    sectors: Vec<Sector>,
}

impl CompassRose {
    pub fn new<S: AsRef<str>>(labels: &[S], directions: &[f64]) -> XsResult<Self> {
        if labels.len() != directions.len() {
            return Err(XsError::config(format!(
                "compass has {} labels but {} directions",
                labels.len(),
                directions.len()
            )));
        }
        if labels.is_empty() {
            return Err(XsError::config("compass needs at least one sector"));
        }
        if let Some(d) = directions.iter().find(|d| !d.is_finite()) {
            return Err(XsError::config(format!(
                "compass direction {} is not finite",
                d
            )));
        }

        let mut sectors: Vec<Sector> = labels
            .iter()
            .zip(directions)
            .map(|(label, &threshold)| Sector {
                threshold,
                label: label.as_ref().to_string(),
            })
            .collect();
        sectors.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Ok(Self { sectors })
    }

    pub fn eight_point() -> Self {
        Self {
            sectors: EIGHT_POINT_LABELS
                .iter()
                .zip(EIGHT_POINT_DIRECTIONS)
                .map(|(label, threshold)| Sector {
                    threshold,
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn label(&self, bearing: f64) -> &str {
        let sector = self
            .sectors
            .iter()
            .rev()
            .find(|s| bearing > s.threshold)
            .or_else(|| self.sectors.last());
        sector.map(|s| s.label.as_str()).unwrap_or_default()
    }

    /// Bearing from `(lx, ly)` to `(px, py)` and its label
    pub fn wind_label(&self, px: f64, py: f64, lx: f64, ly: f64) -> (f64, &str) {
        let b = bearing(px, py, lx, ly);
        (b, self.label(b))
    }
}

impl Default for CompassRose {
    fn default() -> Self {
        Self::eight_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_bearing_quadrants() {
        assert!(approx_eq(bearing(0.0, 1.0, 0.0, 0.0), 0.0));
        assert!(approx_eq(bearing(1.0, 0.0, 0.0, 0.0), 90.0));
        assert!(approx_eq(bearing(0.0, -1.0, 0.0, 0.0), 180.0));
        assert!(approx_eq(bearing(-1.0, 0.0, 0.0, 0.0), 270.0));
        assert!(approx_eq(bearing(1.0, 1.0, 0.0, 0.0), 45.0));
    }

    #[test]
    fn test_bearing_range() {
        for i in 0..72 {
            let a = (i as f64 * 5.0).to_radians();
            let b = bearing(a.sin(), a.cos(), 0.0, 0.0);
            assert!((0.0..360.0).contains(&b), "bearing {} out of range", b);
        }
        assert_eq!(bearing(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_eight_point_labels() {
        let rose = CompassRose::eight_point();
        assert_eq!(rose.label(10.0), "N");
        assert_eq!(rose.label(45.0), "NE");
        assert_eq!(rose.label(90.0), "E");
        assert_eq!(rose.label(200.0), "S");
        assert_eq!(rose.label(270.0), "W");
        assert_eq!(rose.label(350.0), "N");
    }

    #[test]
    fn test_boundary_belongs_to_lower_sector() {
        let rose = CompassRose::eight_point();
        assert_eq!(rose.label(22.5), "N");
        assert_eq!(rose.label(67.5), "NE");
        assert_eq!(rose.label(67.6), "E");
    }

    #[test]
    fn test_zero_bearing_wraps_to_highest_sector() {
        let rose = CompassRose::eight_point();
        assert_eq!(rose.label(0.0), "N");
        let custom = CompassRose::new(&["A", "B"], &[10.0, 180.0]).unwrap();
        assert_eq!(custom.label(5.0), "B");
        assert_eq!(custom.label(10.0), "B");
        assert_eq!(custom.label(11.0), "A");
    }

    #[test]
    fn test_unsorted_directions_are_sorted() {
        let rose = CompassRose::new(&["S", "N"], &[180.0, 0.0]).unwrap();
        assert_eq!(rose.label(90.0), "N");
        assert_eq!(rose.label(270.0), "S");
    }

    #[test]
    fn test_mismatched_lists_rejected() {
        let err = CompassRose::new(&["N", "S"], &[0.0]).unwrap_err();
        assert!(matches!(err, XsError::Configuration(_)));
        assert!(CompassRose::new::<&str>(&[], &[]).is_err());
    }

    #[test]
    fn test_wind_label() {
        let rose = CompassRose::default();
        let (b, label) = rose.wind_label(5.0, 3.0, 5.0, 0.0);
        assert!(approx_eq(b, 0.0));
        assert_eq!(label, "N");
        let (b, label) = rose.wind_label(0.0, 0.0, 10.0, 0.0);
        assert!(approx_eq(b, 270.0));
        assert_eq!(label, "W");
    }
}
