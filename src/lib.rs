//! xsection - geological cross-section projection and soil classification
//!
//! Projects boreholes, CPTs, field points and points-of-interest onto
//! section lines, labels them with compass directions and declutters them
//! for display. The classifiers turn raw CPT and grain-size measurements
//! into lithology and sand median classes.
//!
//! ```no_run
//! use xsection::{CrossSection, Borehole, Config};
//!
//! let config = Config::default();
//! let mut section = CrossSection::from_coords(
//!     [(0.0, 0.0), (100.0, 0.0)],
//!     config.section.buffer_distance,
//!     config.compass()?,
//! )?;
//! section.add_boreholes(&[Borehole::new("B1", 40.0, 3.0)]);
//! section.sort();
//! # Ok::<(), xsection::XsError>(())
//! ```

pub mod batch;
pub mod borehole;
pub mod classifier;
pub mod config;
pub mod error;
pub mod geometry;
pub mod models;
pub mod section;

pub use batch::{project_sections, SectionLine, SectionOutcome};
pub use borehole::SANDMEDIAN_ATTR;
pub use classifier::{
    AdmixClassifier, LithologyClassifier, LithologyTable, MedianBin, OverrideOrder, RuleType,
    SandmedianClassifier,
};
pub use config::{load_config, Config};
pub use error::{XsError, XsResult};
pub use geometry::{Geometry, ReferenceLine};
pub use models::{
    AttrValue, Borehole, CptLog, CptSample, FieldPoint, PointOfInterest, PointValue,
    ProjectionResult, Segment,
};
pub use section::{
    declutter, CompassRose, CrossSection, Declutter, Extension, Extensions, LayoutConfig,
    Projectable, SectionLayout, SectionMetadata, SectionRecord,
};
