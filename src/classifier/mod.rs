//! Rule-based soil classifiers
//!
//! - [`LithologyClassifier`]: CPT friction ratio / cone resistance → lithology
//! - [`SandmedianClassifier`]: median grain size → sand median class
//! - [`AdmixClassifier`]: composite lithology code → main lithology and
//!   admixture fields
//!
//! Unclassifiable input is never an error here: it maps to the table
//! default, `None` or an empty map. Only malformed tables fail, at
//! construction.

pub mod admix;
pub mod lithology;
pub mod sandmedian;

pub use admix::{AdmixClassifier, LITHOLOGY_KEY};
pub use lithology::{
    ExpLithologyRule, Limit, LithologyClassifier, LithologyRule, LithologyTable, OverrideOrder,
    RuleEntry, RuleType, SoilBehaviourClass, SoilBehaviourIndexRule, ISBT_BOUNDARIES,
};
pub use sandmedian::{MedianBin, SandmedianClassifier};
