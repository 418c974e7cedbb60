//! Declutter closely spaced section distances for display
//!
//! Consecutive distances closer than a minimum spacing are pushed apart.
//! Every push is recorded as an [`Extension`] so that other along-line
//! positions (ticks, markers) can be shifted consistently.

use serde::Serialize;

use crate::error::{XsError, XsResult};

/// Extra display width `dx` inserted at true distance `point`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extension {
    pub point: f64,
    pub dx: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Extensions(Vec<Extension>);

impl Extensions {
    pub fn iter(&self) -> std::slice::Iter<'_, Extension> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all inserted widths
    pub fn total(&self) -> f64 {
        self.0.iter().map(|e| e.dx).sum()
    }

    /// Display position of true distance `distance`: every extension at or
    /// before it adds its width.
    pub fn shift(&self, distance: f64) -> f64 {
        distance
            + self
                .0
                .iter()
                .filter(|e| e.point <= distance)
                .map(|e| e.dx)
                .sum::<f64>()
    }
}

impl<'a> IntoIterator for &'a Extensions {
    type Item = &'a Extension;
    type IntoIter = std::slice::Iter<'a, Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Declutter {
    /// Display distance per input distance
    pub display: Vec<f64>,
    pub extensions: Extensions,
}

/// Spread sorted `distances` so that consecutive display distances are at
/// least `min_distance` apart.
pub fn declutter(distances: &[f64], min_distance: f64) -> XsResult<Declutter> {
    if !(min_distance.is_finite() && min_distance >= 0.0) {
        return Err(XsError::config(format!(
            "minimum display distance must be finite and non-negative, got {}",
            min_distance
        )));
    }
    if distances.windows(2).any(|w| !(w[1] >= w[0])) {
        return Err(XsError::InvalidInput(
            "distances must be sorted in ascending order".to_string(),
        ));
    }

    let Some(&first) = distances.first() else {
        return Ok(Declutter::default());
    };

    let mut display = Vec::with_capacity(distances.len());
    let mut extensions = Vec::new();
    let mut position = first;
    display.push(position);
    for pair in distances.windows(2) {
        let gap = pair[1] - pair[0];
        if gap < min_distance {
            extensions.push(Extension {
                point: pair[1],
                dx: min_distance - gap,
            });
        }
        position += gap.max(min_distance);
        display.push(position);
    }

    Ok(Declutter {
        display,
        extensions: Extensions(extensions),
    })
}
