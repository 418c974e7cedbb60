//! Sand median grain-size classes

use serde::{Deserialize, Serialize};

use crate::error::{XsError, XsResult};

/// Half-open `[lower, upper)` median range mapped to a class code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianBin {
    pub lower: f64,
    pub upper: f64,
    pub medianclass: String,
}

impl MedianBin {
    pub fn contains(&self, median: f64) -> bool {
        median >= self.lower && median < self.upper
    }
}

/// Binned lookup of sand median classes. Bins are scanned in table order and
/// the first containing bin wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SandmedianClassifier {
    bins: Vec<MedianBin>,
}

impl SandmedianClassifier {
    pub fn new(bins: Vec<MedianBin>) -> XsResult<Self> {
        for bin in &bins {
            if !(bin.lower < bin.upper) {
                return Err(XsError::config(format!(
                    "sand median bin '{}' has an empty range [{}, {})",
                    bin.medianclass, bin.lower, bin.upper
                )));
            }
        }
        Ok(Self { bins })
    }

    pub fn bins(&self) -> &[MedianBin] {
        &self.bins
    }

    /// Class of `median`, or `None` when no bin contains it.
    pub fn classify(&self, median: f64) -> Option<&str> {
        self.bins
            .iter()
            .find(|bin| bin.contains(median))
            .map(|bin| bin.medianclass.as_str())
    }
}
