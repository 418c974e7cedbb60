//! Cross-section projection
//!
//! A [`CrossSection`] owns a reference line and a buffer corridor around it.
//! Boreholes, field points and points-of-interest inside the corridor are
//! projected onto the line and stored as copies stamped with their
//! [`ProjectionResult`]. Collections can be sorted by along-line distance,
//! decluttered for display and flattened into export records.

pub mod compass;
pub mod declutter;
pub mod layout;

pub use compass::{bearing, CompassRose, EIGHT_POINT_DIRECTIONS, EIGHT_POINT_LABELS};
pub use declutter::{declutter, Declutter, Extension, Extensions};
pub use layout::{LayoutConfig, Placement, PointPlacement, SectionLayout, Tick};

use geo::Coord;
use serde::Serialize;
use tracing::debug;

use crate::error::{XsError, XsResult};
use crate::geometry::{Geometry, ReferenceLine};
use crate::models::{
    Borehole, FieldPoint, PointOfInterest, ProjectionResult, BOREHOLE_FORMAT_TAG, CPT_FORMAT_TAG,
};

/// Entity that can be placed on a cross-section
pub trait Projectable: Clone {
    fn code(&self) -> &str;
    fn geometry(&self) -> &Geometry;
    fn projection(&self) -> Option<&ProjectionResult>;
    fn set_projection(&mut self, projection: ProjectionResult);
}

macro_rules! impl_projectable {
    ($($ty:ty),*) => {
        $(
            impl Projectable for $ty {
                fn code(&self) -> &str {
                    &self.code
                }

                fn geometry(&self) -> &Geometry {
                    &self.geometry
                }

                fn projection(&self) -> Option<&ProjectionResult> {
                    self.projection.as_ref()
                }

                fn set_projection(&mut self, projection: ProjectionResult) {
                    self.projection = Some(projection);
                }
            }
        )*
    };
}

impl_projectable!(Borehole, FieldPoint, PointOfInterest);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Empty,
    Populated,
    Sorted,
}

/// Count of entities on a section and the count per 100 length units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionMetadata {
    pub count: usize,
    pub per_100: f64,
}

/// One exported row: a borehole segment with its section placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRecord {
    pub label: Option<String>,
    pub distance: f64,
    pub code: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub top: f64,
    pub base: f64,
    pub lithology: Option<String>,
    pub sandmedianclass: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CrossSection {
    line: ReferenceLine,
    buffer_distance: f64,
    label: Option<String>,
    title: Option<String>,
    compass: CompassRose,
    boreholes: Vec<(f64, Borehole)>,
    points: Vec<(f64, FieldPoint)>,
    pois: Vec<(f64, PointOfInterest)>,
    state: SectionState,
}

impl CrossSection {
    pub fn new(line: ReferenceLine, buffer_distance: f64, compass: CompassRose) -> XsResult<Self> {
        if !(buffer_distance.is_finite() && buffer_distance >= 0.0) {
            return Err(XsError::config(format!(
                "buffer distance must be finite and non-negative, got {}",
                buffer_distance
            )));
        }
        Ok(Self {
            line,
            buffer_distance,
            label: None,
            title: None,
            compass,
            boreholes: Vec::new(),
            points: Vec::new(),
            pois: Vec::new(),
            state: SectionState::Empty,
        })
    }

    pub fn from_coords(
        coords: impl IntoIterator<Item = (f64, f64)>,
        buffer_distance: f64,
        compass: CompassRose,
    ) -> XsResult<Self> {
        let line = ReferenceLine::from_coords(coords)?;
        Self::new(line, buffer_distance, compass)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn line(&self) -> &ReferenceLine {
        &self.line
    }

    pub fn length(&self) -> f64 {
        self.line.length()
    }

    pub fn buffer_distance(&self) -> f64 {
        self.buffer_distance
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn compass(&self) -> &CompassRose {
        &self.compass
    }

    pub fn state(&self) -> SectionState {
        self.state
    }

    pub fn boreholes(&self) -> &[(f64, Borehole)] {
        &self.boreholes
    }

    pub fn points(&self) -> &[(f64, FieldPoint)] {
        &self.points
    }

    pub fn pois(&self) -> &[(f64, PointOfInterest)] {
        &self.pois
    }

    fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("<unlabelled>")
    }

    /// Sample the line every `resolution` units starting at `start`.
    ///
    /// The last item is always the exact end point at `distance == length`.
    pub fn discretize(&self, resolution: f64, start: f64) -> XsResult<Discretize<'_>> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(XsError::config(format!(
                "discretize resolution must be positive, got {}",
                resolution
            )));
        }
        if !start.is_finite() {
            return Err(XsError::config(format!(
                "discretize start {} is not finite",
                start
            )));
        }
        Ok(Discretize {
            line: &self.line,
            start,
            resolution,
            step: 0,
            done: false,
        })
    }

    /// Projection of `geometry` onto the line, or `None` when it lies
    /// outside the corridor or projects onto (or beyond) an end point.
    pub fn project(&self, geometry: &Geometry) -> Option<ProjectionResult> {
        project_geometry(&self.line, self.buffer_distance, &self.compass, geometry)
    }

    /// Project and keep every borehole inside the corridor. Returns the
    /// number accepted.
    pub fn add_boreholes<'a, I>(&mut self, boreholes: I) -> usize
    where
        I: IntoIterator<Item = &'a Borehole>,
    {
        let accepted = collect_projected(
            &self.line,
            self.buffer_distance,
            &self.compass,
            boreholes,
            &mut self.boreholes,
        );
        self.state = SectionState::Populated;
        debug!(
            "Section {}: {} boreholes added",
            self.display_label(),
            accepted
        );
        accepted
    }

    pub fn add_points<'a, I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = &'a FieldPoint>,
    {
        let accepted = collect_projected(
            &self.line,
            self.buffer_distance,
            &self.compass,
            points,
            &mut self.points,
        );
        self.state = SectionState::Populated;
        debug!(
            "Section {}: {} points added",
            self.display_label(),
            accepted
        );
        accepted
    }

    pub fn add_pois<'a, I>(&mut self, pois: I) -> usize
    where
        I: IntoIterator<Item = &'a PointOfInterest>,
    {
        let accepted = collect_projected(
            &self.line,
            self.buffer_distance,
            &self.compass,
            pois,
            &mut self.pois,
        );
        self.state = SectionState::Populated;
        debug!(
            "Section {}: {} points-of-interest added",
            self.display_label(),
            accepted
        );
        accepted
    }

    /// Bearing from `(lx, ly)` to `(px, py)` and its compass label
    pub fn wind_label(&self, px: f64, py: f64, lx: f64, ly: f64) -> (f64, &str) {
        self.compass.wind_label(px, py, lx, ly)
    }

    /// Direction the start of the line points to, seen from its end
    pub fn wind_label_left(&self) -> &str {
        let (start, end) = (self.line.start(), self.line.end());
        self.wind_label(start.x, start.y, end.x, end.y).1
    }

    /// Direction the end of the line points to, seen from its start
    pub fn wind_label_right(&self) -> &str {
        let (start, end) = (self.line.start(), self.line.end());
        self.wind_label(end.x, end.y, start.x, start.y).1
    }

    /// Stable ascending sort of boreholes and points by distance.
    pub fn sort(&mut self) {
        self.boreholes.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.points.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.state = SectionState::Sorted;
    }

    fn per_100(&self, count: usize) -> XsResult<f64> {
        if self.line.is_degenerate() {
            return Err(XsError::degenerate(format!(
                "section {} has zero length",
                self.display_label()
            )));
        }
        Ok(count as f64 / self.line.length() * 100.0)
    }

    /// Boreholes per 100 length units
    pub fn borehole_density(&self) -> XsResult<f64> {
        self.per_100(self.boreholes.len())
    }

    pub fn cpt_metadata(&self) -> XsResult<SectionMetadata> {
        self.metadata_for(CPT_FORMAT_TAG)
    }

    pub fn borehole_metadata(&self) -> XsResult<SectionMetadata> {
        self.metadata_for(BOREHOLE_FORMAT_TAG)
    }

    fn metadata_for(&self, tag: &str) -> XsResult<SectionMetadata> {
        let count = self
            .boreholes
            .iter()
            .filter(|(_, b)| b.format.contains(tag))
            .count();
        Ok(SectionMetadata {
            count,
            per_100: self.per_100(count)?,
        })
    }

    /// Sort the section and flatten its boreholes into one record per
    /// segment.
    pub fn records(&mut self) -> Vec<SectionRecord> {
        self.sort();
        let label = &self.label;
        self.boreholes
            .iter()
            .flat_map(|(distance, borehole)| {
                borehole.segments.iter().map(move |segment| SectionRecord {
                    label: label.clone(),
                    distance: *distance,
                    code: borehole.code.clone(),
                    x: borehole.x,
                    y: borehole.y,
                    z: borehole.z,
                    top: segment.top,
                    base: segment.base,
                    lithology: segment.lithology.clone(),
                    sandmedianclass: segment.sandmedianclass.clone(),
                })
            })
            .collect()
    }
}

fn project_geometry(
    line: &ReferenceLine,
    buffer_distance: f64,
    compass: &CompassRose,
    geometry: &Geometry,
) -> Option<ProjectionResult> {
    if !line.buffer_contains(geometry, buffer_distance) {
        return None;
    }
    let anchor = geometry.anchor()?;
    let distance = line.project(&anchor);
    if !(distance > 0.0 && distance < line.length()) {
        return None;
    }
    let foot = line.interpolate(distance);
    let (bearing, label) = compass.wind_label(anchor.x(), anchor.y(), foot.x, foot.y);
    Some(ProjectionResult {
        distance,
        perpendicular_distance: line.distance_to_geometry(geometry)?,
        bearing,
        label: label.to_string(),
    })
}

fn collect_projected<'a, T, I>(
    line: &ReferenceLine,
    buffer_distance: f64,
    compass: &CompassRose,
    entities: I,
    into: &mut Vec<(f64, T)>,
) -> usize
where
    T: Projectable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let before = into.len();
    for entity in entities {
        let projection = project_geometry(line, buffer_distance, compass, entity.geometry());
        if let Some(projection) = projection {
            let distance = projection.distance;
            let mut copy = entity.clone();
            copy.set_projection(projection);
            into.push((distance, copy));
        }
    }
    into.len() - before
}

/// Lazy sampling of a reference line, see [`CrossSection::discretize`].
#[derive(Debug, Clone)]
pub struct Discretize<'a> {
    line: &'a ReferenceLine,
    start: f64,
    resolution: f64,
    step: usize,
    done: bool,
}

impl Iterator for Discretize<'_> {
    type Item = (f64, Coord<f64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let distance = self.start + self.step as f64 * self.resolution;
        if distance < self.line.length() {
            self.step += 1;
            return Some((distance, self.line.interpolate(distance)));
        }
        self.done = true;
        Some((self.line.length(), self.line.end()))
    }
}
