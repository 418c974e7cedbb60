//! Display layout of a cross-section
//!
//! Everything a renderer needs to draw a section, without drawing it: axis
//! limits, decluttered borehole positions, bar widths, field points placed
//! at their borehole, shifted markers and ticks, and the end labels.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::declutter::{declutter, Declutter, Extensions};
use super::CrossSection;
use crate::error::{XsError, XsResult};
use crate::models::Borehole;

/// Layout factors, all relative to the section length or the x-range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Minimum display spacing between boreholes, times length
    pub min_distance_factor: f64,
    /// Margin kept between the outer boreholes and the axis limits
    pub min_limit_factor: f64,
    pub barwidth_factor: f64,
    pub verticalwidth_factor: f64,
    /// Spacing of x-axis ticks in length units; no ticks when unset
    pub xtickstep: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_distance_factor: 2e-2,
            min_limit_factor: 4e-2,
            barwidth_factor: 1e-2,
            verticalwidth_factor: 1e-2,
            xtickstep: None,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> XsResult<()> {
        let factors = [
            ("min_distance_factor", self.min_distance_factor),
            ("min_limit_factor", self.min_limit_factor),
            ("barwidth_factor", self.barwidth_factor),
            ("verticalwidth_factor", self.verticalwidth_factor),
        ];
        for (name, value) in factors {
            if !(value.is_finite() && value >= 0.0) {
                return Err(XsError::config(format!(
                    "layout.{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if let Some(step) = self.xtickstep {
            if !(step.is_finite() && step > 0.0) {
                return Err(XsError::config(format!(
                    "layout.xtickstep must be positive, got {}",
                    step
                )));
            }
        }
        Ok(())
    }
}

/// Entity placed on the section at its true and display distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub code: String,
    pub distance: f64,
    pub display_distance: f64,
}

/// Field point drawn next to the borehole sharing its code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointPlacement {
    pub code: String,
    pub display_distance: f64,
    pub midlevel: f64,
}

/// Tick at display `position` labelled with true distance `value`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionLayout {
    pub xmin: f64,
    pub xmax: f64,
    pub min_distance: f64,
    pub bar_width: f64,
    pub vertical_width: f64,
    pub boreholes: Vec<Placement>,
    pub points: Vec<PointPlacement>,
    pub pois: Vec<Placement>,
    pub extensions: Extensions,
    pub xticks: Vec<Tick>,
    pub wind_label_left: String,
    pub wind_label_right: String,
}

impl SectionLayout {
    /// Sort `section` and lay it out.
    pub fn compute(section: &mut CrossSection, config: &LayoutConfig) -> XsResult<Self> {
        config.validate()?;
        if section.line().is_degenerate() {
            return Err(XsError::degenerate(format!(
                "cannot lay out zero-length section {}",
                section.label().unwrap_or("<unlabelled>")
            )));
        }
        section.sort();

        let length = section.length();
        let min_distance = config.min_distance_factor * length;
        let distances: Vec<f64> = section.boreholes().iter().map(|(d, _)| *d).collect();

        let (mut xmin, mut xmax) = (0.0, length);
        if let (Some(&first), Some(&last)) = (distances.first(), distances.last()) {
            let min_limit = config.min_limit_factor * length;
            if first < min_limit {
                xmin -= min_limit - first;
            }
            if xmax - last < min_limit {
                xmax += min_limit - (xmax - last);
            }
        }

        let Declutter {
            display,
            extensions,
        } = declutter(&distances, min_distance)?;
        xmax += extensions.total();
        let width = xmax - xmin;

        let boreholes: Vec<Placement> = section
            .boreholes()
            .iter()
            .zip(&display)
            .map(|((distance, borehole), display_distance)| Placement {
                code: borehole.code.clone(),
                distance: *distance,
                display_distance: *display_distance,
            })
            .collect();

        let by_code: HashMap<&str, (f64, &Borehole)> = section
            .boreholes()
            .iter()
            .zip(&display)
            .map(|((_, borehole), d)| {
                (borehole.code.as_str(), (*d, borehole))
            })
            .collect();
        let points: Vec<PointPlacement> = section
            .points()
            .iter()
            .filter_map(|(_, point)| {
                let (display_distance, borehole) = by_code.get(point.code.as_str())?;
                let mut point = point.clone();
                if point.z.is_none() {
                    point.z = borehole.z;
                }
                Some(PointPlacement {
                    code: point.code.clone(),
                    display_distance: *display_distance,
                    midlevel: point.midlevel()?,
                })
            })
            .collect();

        let pois: Vec<Placement> = section
            .pois()
            .iter()
            .filter(|(_, poi)| poi.label.is_some())
            .map(|(distance, poi)| Placement {
                code: poi.code.clone(),
                distance: *distance,
                display_distance: extensions.shift(*distance),
            })
            .collect();

        let xticks = match config.xtickstep {
            Some(step) => (0..)
                .map(|i| i as f64 * step)
                .take_while(|value| *value < length + step)
                .map(|value| Tick {
                    position: extensions.shift(value),
                    value,
                })
                .collect(),
            None => Vec::new(),
        };

        debug!(
            "Section {}: layout [{:.1}, {:.1}] with {} extensions",
            section.label().unwrap_or("<unlabelled>"),
            xmin,
            xmax,
            extensions.len()
        );

        Ok(Self {
            xmin,
            xmax,
            min_distance,
            bar_width: config.barwidth_factor * width,
            vertical_width: config.verticalwidth_factor * width,
            boreholes,
            points,
            pois,
            extensions,
            xticks,
            wind_label_left: section.wind_label_left().to_string(),
            wind_label_right: section.wind_label_right().to_string(),
        })
    }
}
