//! Core data models for xsection
//!
//! Boreholes (including CPTs), their depth segments, labelled field points
//! and points-of-interest. Collaborating readers construct these; the
//! classifiers enrich them and the section projector stamps them with their
//! projection onto a cross-section line.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{XsError, XsResult};
use crate::geometry::Geometry;

/// Format tag fragment identifying cone-penetration tests
pub const CPT_FORMAT_TAG: &str = "CPT";

/// Format tag fragment identifying drilled boreholes
pub const BOREHOLE_FORMAT_TAG: &str = "Borehole";

/// Free-form attribute value carried on segments and points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Float(f) => Some(*f),
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

/// Where an entity landed on a cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Distance along the section line
    pub distance: f64,
    /// Distance from the entity to the section line
    pub perpendicular_distance: f64,
    /// Compass bearing from the projected point to the entity, in `[0, 360)`
    pub bearing: f64,
    /// Compass label for `bearing`
    pub label: String,
}

/// Depth interval within a borehole. Depth increases downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub top: f64,
    pub base: f64,
    #[serde(default)]
    pub lithology: Option<String>,
    #[serde(default)]
    pub sandmedianclass: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, AttrValue>,
}

impl Segment {
    pub fn new(top: f64, base: f64) -> XsResult<Self> {
        if !(base > top) {
            return Err(XsError::InvalidInterval { top, base });
        }
        Ok(Self {
            top,
            base,
            lithology: None,
            sandmedianclass: None,
            attrs: BTreeMap::new(),
        })
    }

    pub fn with_lithology(mut self, lithology: impl Into<String>) -> Self {
        self.lithology = Some(lithology.into());
        self
    }

    pub fn with_sandmedianclass(mut self, class: impl Into<String>) -> Self {
        self.sandmedianclass = Some(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn thickness(&self) -> f64 {
        self.base - self.top
    }

    /// Build a contiguous column from `(base, lithology, sandmedianclass)`
    /// rows. The first top is 0 and every base becomes the next top.
    pub fn contiguous<I>(rows: I) -> XsResult<Vec<Segment>>
    where
        I: IntoIterator<Item = (f64, Option<String>, Option<String>)>,
    {
        let mut top = 0.0;
        let mut segments = Vec::new();
        for (base, lithology, sandmedianclass) in rows {
            let mut segment = Segment::new(top, base)?;
            segment.lithology = lithology;
            segment.sandmedianclass = sandmedianclass;
            segments.push(segment);
            top = base;
        }
        Ok(segments)
    }
}

/// One CPT measurement at a given depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CptSample {
    pub depth: f64,
    pub friction_ratio: Option<f64>,
    pub cone_resistance: Option<f64>,
}

/// Raw CPT measurements, ordered by increasing depth
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CptLog {
    pub samples: Vec<CptSample>,
}

/// A borehole or CPT location with its segment column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borehole {
    pub code: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    /// Surface level
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub depth: Option<f64>,
    /// Source format tag, e.g. `"GEF CPT"` or `"CSV Borehole"`
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub cpt: Option<CptLog>,
    #[serde(default)]
    pub projection: Option<ProjectionResult>,
}

impl Borehole {
    pub fn new(code: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            code: code.into(),
            geometry: Geometry::point(x, y),
            x: Some(x),
            y: Some(y),
            z: None,
            depth: None,
            format: String::new(),
            segments: Vec::new(),
            cpt: None,
            projection: None,
        }
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_cpt(mut self, cpt: CptLog) -> Self {
        self.cpt = Some(cpt);
        self
    }

    pub fn is_cpt(&self) -> bool {
        self.format.contains(CPT_FORMAT_TAG)
    }

    pub fn is_borehole(&self) -> bool {
        self.format.contains(BOREHOLE_FORMAT_TAG)
    }
}

/// Named value shown next to a field point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointValue {
    pub name: String,
    pub value: Option<AttrValue>,
    /// Display format hint for renderers
    #[serde(default)]
    pub format: Option<String>,
}

/// Labelled observation over a depth interval (e.g. a lab sample)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    pub code: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub base: Option<f64>,
    #[serde(default)]
    pub values: Vec<PointValue>,
    #[serde(default)]
    pub projection: Option<ProjectionResult>,
}

impl FieldPoint {
    pub fn new(code: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            code: code.into(),
            geometry: Geometry::point(x, y),
            x: Some(x),
            y: Some(y),
            z: None,
            top: None,
            base: None,
            values: Vec::new(),
            projection: None,
        }
    }

    pub fn with_interval(mut self, top: Option<f64>, base: Option<f64>) -> Self {
        self.top = top;
        self.base = base;
        self
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Level of the middle of the top/base interval relative to `z`.
    /// With only one of top/base known, that depth is used.
    pub fn midlevel(&self) -> Option<f64> {
        let z = self.z?;
        let depth = match (self.top, self.base) {
            (Some(top), Some(base)) => (top + base) / 2.0,
            (Some(top), None) => top,
            (None, Some(base)) => base,
            (None, None) => return None,
        };
        Some(z - depth)
    }
}

/// Marker drawn as a vertical line across the section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub code: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub label: Option<String>,
    /// Vertical extent of the marker
    #[serde(default)]
    pub ylim: Option<(f64, f64)>,
    #[serde(default)]
    pub projection: Option<ProjectionResult>,
}

impl PointOfInterest {
    pub fn new(code: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            code: code.into(),
            geometry: Geometry::point(x, y),
            label: None,
            ylim: None,
            projection: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
