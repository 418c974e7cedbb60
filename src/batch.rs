//! Project many section lines at once
//!
//! Sections are independent: each one owns its copies of the projected
//! entities, so lines are projected in parallel with rayon. A failing line
//! is logged and reported in its own outcome without stopping the others.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::XsResult;
use crate::models::{Borehole, FieldPoint, PointOfInterest};
use crate::section::{CompassRose, CrossSection};

/// Section line as read from a lines file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLine {
    pub label: String,
    #[serde(default)]
    pub title: Option<String>,
    pub coordinates: Vec<(f64, f64)>,
}

#[derive(Debug)]
pub struct SectionOutcome {
    pub label: String,
    pub result: XsResult<CrossSection>,
}

/// Build one cross-section per selected line.
///
/// Fails up front only when the compass configuration is invalid; errors of
/// individual lines end up in their [`SectionOutcome`].
pub fn project_sections(
    lines: &[SectionLine],
    boreholes: &[Borehole],
    points: &[FieldPoint],
    pois: &[PointOfInterest],
    config: &Config,
) -> XsResult<Vec<SectionOutcome>> {
    let compass = config.compass()?;

    let selected: Vec<&SectionLine> = lines
        .iter()
        .filter(|line| {
            let keep = config.section.is_selected(&line.label);
            if !keep {
                warn!("Skipping section {}: not selected", line.label);
            }
            keep
        })
        .collect();

    let failures = AtomicUsize::new(0);
    let outcomes: Vec<SectionOutcome> = selected
        .par_iter()
        .map(|line| {
            let result = build_section(line, boreholes, points, pois, config, &compass);
            if let Err(e) = &result {
                failures.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to project section {}: {}", line.label, e);
            }
            SectionOutcome {
                label: line.label.clone(),
                result,
            }
        })
        .collect();

    info!(
        "Projected {} of {} sections ({} failed, {} skipped)",
        outcomes.len() - failures.load(Ordering::Relaxed),
        lines.len(),
        failures.load(Ordering::Relaxed),
        lines.len() - selected.len()
    );
    Ok(outcomes)
}

fn build_section(
    line: &SectionLine,
    boreholes: &[Borehole],
    points: &[FieldPoint],
    pois: &[PointOfInterest],
    config: &Config,
    compass: &CompassRose,
) -> XsResult<CrossSection> {
    let mut section = CrossSection::from_coords(
        line.coordinates.iter().copied(),
        config.section.buffer_distance,
        compass.clone(),
    )?
    .with_label(line.label.clone());
    if let Some(title) = &line.title {
        section = section.with_title(title.clone());
    }
    section.add_boreholes(boreholes);
    section.add_points(points);
    section.add_pois(pois);
    section.sort();
    Ok(section)
}
