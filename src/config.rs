//! Configuration for xsection
//!
//! Built-in defaults are embedded from `defaultconfig.toml`. A user file
//! (TOML, JSON or YAML, picked by extension) overrides them section by
//! section.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::classifier::{
    AdmixClassifier, LithologyClassifier, LithologyTable, MedianBin, SandmedianClassifier,
};
use crate::error::{XsError, XsResult};
use crate::section::{CompassRose, LayoutConfig};

/// Embedded default configuration
pub const DEFAULT_CONFIG: &str = include_str!("defaultconfig.toml");

/// Parallel lists of compass labels and their lower sector thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompassConfig {
    pub labels: Vec<String>,
    pub directions: Vec<f64>,
}

impl CompassConfig {
    pub fn build(&self) -> XsResult<CompassRose> {
        CompassRose::new(&self.labels, &self.directions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Half-width of the corridor around each section line
    pub buffer_distance: f64,
    /// Only project sections with these labels
    pub selected: Option<Vec<String>>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            buffer_distance: 50.0,
            selected: None,
        }
    }
}

impl SectionConfig {
    pub fn is_selected(&self, label: &str) -> bool {
        match &self.selected {
            Some(labels) => labels.iter().any(|l| l == label),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub compass: CompassConfig,
    /// Rule type name for [`LithologyClassifier`]
    pub cpt_classifier: String,
    pub cpt_classification: LithologyTable,
    pub sandmedian_bins: Vec<MedianBin>,
    pub admix_fieldnames: HashMap<String, String>,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub section: SectionConfig,
}

/// A user file: every top-level section is optional
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    compass: Option<CompassConfig>,
    cpt_classifier: Option<String>,
    cpt_classification: Option<LithologyTable>,
    sandmedian_bins: Option<Vec<MedianBin>>,
    admix_fieldnames: Option<HashMap<String, String>>,
    layout: Option<LayoutConfig>,
    section: Option<SectionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config is valid")
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Self::default().merged(toml::from_str(content)?))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(Self::default().merged(serde_json::from_str(content)?))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(Self::default().merged(serde_yaml::from_str(content)?))
    }

    fn merged(mut self, other: UserConfig) -> Self {
        self.merge(other);
        self
    }

    /// Merge a user config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        if let Some(compass) = other.compass {
            self.compass = compass;
        }
        if let Some(cpt_classifier) = other.cpt_classifier {
            self.cpt_classifier = cpt_classifier;
        }
        if let Some(table) = other.cpt_classification {
            self.cpt_classification = table;
        }
        if let Some(bins) = other.sandmedian_bins {
            self.sandmedian_bins = bins;
        }
        if let Some(fieldnames) = other.admix_fieldnames {
            self.admix_fieldnames = fieldnames;
        }
        if let Some(layout) = other.layout {
            self.layout = layout;
        }
        if let Some(section) = other.section {
            self.section = section;
        }
    }

    pub fn compass(&self) -> XsResult<CompassRose> {
        self.compass.build()
    }

    pub fn lithology_classifier(&self) -> XsResult<LithologyClassifier> {
        LithologyClassifier::new(&self.cpt_classification, &self.cpt_classifier)
    }

    pub fn sandmedian_classifier(&self) -> XsResult<SandmedianClassifier> {
        SandmedianClassifier::new(self.sandmedian_bins.clone())
    }

    pub fn admix_classifier(&self) -> AdmixClassifier {
        AdmixClassifier::new(self.admix_fieldnames.clone())
    }

    /// Build every classifier once so that configuration errors surface
    /// before any section is projected.
    pub fn validate(&self) -> XsResult<()> {
        self.compass()?;
        self.lithology_classifier()?;
        self.sandmedian_classifier()?;
        self.layout.validate()?;
        let buffer = self.section.buffer_distance;
        if !(buffer.is_finite() && buffer >= 0.0) {
            return Err(XsError::config(format!(
                "section.buffer_distance must be finite and non-negative, got {}",
                buffer
            )));
        }
        Ok(())
    }
}

/// Load a configuration file on top of the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => load_toml_config(path),
        Some("json") => load_json_config(path),
        Some("yaml") | Some("yml") => load_yaml_config(path),
        _ => anyhow::bail!(
            "Unsupported config format: {} (expected .toml, .json, .yaml or .yml)",
            path.display()
        ),
    }
    .with_context(|| format!("Failed to load config from {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn load_toml_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    Config::from_toml_str(&content)
}

fn load_json_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    Config::from_json_str(&content)
}

fn load_yaml_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    Config::from_yaml_str(&content)
}
