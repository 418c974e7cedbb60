//! CPT lithology classification
//!
//! Two rule families turn a friction ratio / cone resistance pair into a
//! lithology code:
//!
//! - exponential rules, read from a table: a rule matches when the friction
//!   ratio falls in one of its `(left, right]` windows and the cone
//!   resistance exceeds `a * exp(b * friction_ratio)`
//! - the built-in soil behaviour type index (Robertson 2010, Ic), with peat
//!   and organic clay overrides for Dutch soils

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{XsError, XsResult};

/// Soil behaviour index class boundaries
pub const ISBT_BOUNDARIES: [f64; 6] = [1.6, 2.0, 2.2, 2.6, 2.95, 3.6];

/// One `(left, right]` friction ratio window of an exponential rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub left: f64,
    pub right: f64,
    pub a: f64,
    pub b: f64,
}

/// Table entry: a lithology and the windows in which it applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub lithology: String,
    #[serde(default)]
    pub limits: Vec<Limit>,
}

/// Which rule wins when several table entries match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideOrder {
    /// The earliest matching table entry wins
    #[default]
    FirstMatch,
    /// The latest matching table entry wins
    LastMatch,
}

/// Rule table for [`LithologyClassifier`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LithologyTable {
    /// Code returned for missing data and when no rule matches
    pub default: String,
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
    #[serde(default)]
    pub override_order: OverrideOrder,
}

/// Rule family selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Exponential,
    Isbt,
}

impl FromStr for RuleType {
    type Err = XsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exponential" => Ok(RuleType::Exponential),
            "isbt" => Ok(RuleType::Isbt),
            other => Err(XsError::config(format!(
                "rule type '{}' not supported (expected 'exponential' or 'isbt')",
                other
            ))),
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleType::Exponential => write!(f, "exponential"),
            RuleType::Isbt => write!(f, "isbt"),
        }
    }
}

/// A lithology rule over `(friction_ratio, cone_resistance)`.
pub trait LithologyRule: fmt::Debug + Send + Sync {
    /// Lithology code if the rule matches, `None` otherwise.
    fn test(&self, friction_ratio: f64, cone_resistance: Option<f64>) -> Option<&str>;

    fn matches(&self, friction_ratio: f64, cone_resistance: Option<f64>) -> bool {
        self.test(friction_ratio, cone_resistance).is_some()
    }
}

/// Exponential threshold rule
#[derive(Debug, Clone, PartialEq)]
pub struct ExpLithologyRule {
    lithology: String,
    limits: Vec<Limit>,
}

impl ExpLithologyRule {
    pub fn new(entry: &RuleEntry) -> XsResult<Self> {
        for limit in &entry.limits {
            if !(limit.left < limit.right) {
                return Err(XsError::config(format!(
                    "rule '{}': limit window ({}, {}] is empty",
                    entry.lithology, limit.left, limit.right
                )));
            }
            if !limit.a.is_finite() || !limit.b.is_finite() {
                return Err(XsError::config(format!(
                    "rule '{}': coefficients a={} b={} must be finite",
                    entry.lithology, limit.a, limit.b
                )));
            }
        }
        Ok(Self {
            lithology: entry.lithology.clone(),
            limits: entry.limits.clone(),
        })
    }

    pub fn lithology(&self) -> &str {
        &self.lithology
    }
}

impl LithologyRule for ExpLithologyRule {
    fn test(&self, friction_ratio: f64, cone_resistance: Option<f64>) -> Option<&str> {
        // the first window containing the friction ratio decides
        let limit = self
            .limits
            .iter()
            .find(|l| friction_ratio > l.left && friction_ratio <= l.right)?;
        let qc = cone_resistance?;
        (qc > limit.a * (limit.b * friction_ratio).exp()).then_some(self.lithology.as_str())
    }
}

/// Classes produced by the soil behaviour index rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilBehaviourClass {
    Sand,
    ClayeySand,
    Clay,
    Peat,
    OrganicClay,
}

impl SoilBehaviourClass {
    /// Lithology code written to segments
    pub fn code(&self) -> &'static str {
        match self {
            SoilBehaviourClass::Sand => "Z",
            SoilBehaviourClass::ClayeySand => "Kzx",
            SoilBehaviourClass::Clay => "K",
            SoilBehaviourClass::Peat => "V",
            SoilBehaviourClass::OrganicClay => "Kh2",
        }
    }
}

impl fmt::Display for SoilBehaviourClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Soil behaviour type index rule (Robertson 2010) with the Fugro peat
/// condition (`qc < 1.5 and rf > 5`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoilBehaviourIndexRule;

impl SoilBehaviourIndexRule {
    /// `Ic`, or `None` when either input is non-positive.
    pub fn index(friction_ratio: f64, cone_resistance: f64) -> Option<f64> {
        if !(friction_ratio > 0.0 && cone_resistance > 0.0) {
            return None;
        }
        let qc_term = 3.47 - (cone_resistance / 0.1).log10();
        let rf_term = friction_ratio.log10() + 1.22;
        let ic = (qc_term.powi(2) + rf_term.powi(2)).sqrt();
        ic.is_finite().then_some(ic)
    }

    /// Class for valid inputs; `None` when the index is undefined.
    pub fn classify(friction_ratio: f64, cone_resistance: f64) -> Option<SoilBehaviourClass> {
        let ic = Self::index(friction_ratio, cone_resistance)?;
        let b = &ISBT_BOUNDARIES;

        // rf > 6 also covers the high-index peat condition (Ic >= 3.6, rf > 8)
        let peat = (friction_ratio > 5.0 && cone_resistance < 1.5) || friction_ratio > 6.0;
        let class = if peat {
            SoilBehaviourClass::Peat
        } else if ic < b[3] {
            SoilBehaviourClass::Sand
        } else if ic < b[4] {
            SoilBehaviourClass::ClayeySand
        } else if ic < b[5] {
            SoilBehaviourClass::Clay
        } else {
            SoilBehaviourClass::OrganicClay
        };
        Some(class)
    }
}

impl LithologyRule for SoilBehaviourIndexRule {
    fn test(&self, friction_ratio: f64, cone_resistance: Option<f64>) -> Option<&str> {
        Self::classify(friction_ratio, cone_resistance?).map(|c| c.code())
    }
}

/// Dispatches CPT samples over a list of lithology rules.
#[derive(Debug)]
pub struct LithologyClassifier {
    default: String,
    rule_type: RuleType,
    override_order: OverrideOrder,
    rules: Vec<Box<dyn LithologyRule>>,
}

impl LithologyClassifier {
    /// Build from a table and a rule type name (`"exponential"` or `"isbt"`).
    pub fn new(table: &LithologyTable, rule_type: &str) -> XsResult<Self> {
        Self::with_rule_type(table, rule_type.parse()?)
    }

    pub fn with_rule_type(table: &LithologyTable, rule_type: RuleType) -> XsResult<Self> {
        if table.default.trim().is_empty() {
            return Err(XsError::config(
                "lithology table needs a non-empty default code",
            ));
        }
        let rules: Vec<Box<dyn LithologyRule>> = match rule_type {
            RuleType::Exponential => table
                .rules
                .iter()
                .map(|entry| {
                    ExpLithologyRule::new(entry).map(|r| Box::new(r) as Box<dyn LithologyRule>)
                })
                .collect::<XsResult<_>>()?,
            RuleType::Isbt => vec![Box::new(SoilBehaviourIndexRule)],
        };
        debug!(
            "Built {} lithology classifier with {} rule(s), default '{}'",
            rule_type,
            rules.len(),
            table.default
        );
        Ok(Self {
            default: table.default.clone(),
            rule_type,
            override_order: table.override_order,
            rules,
        })
    }

    pub fn default_code(&self) -> &str {
        &self.default
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn override_order(&self) -> OverrideOrder {
        self.override_order
    }

    /// Lithology code for one sample. A missing or negative friction ratio
    /// means "no data" and yields the default code.
    pub fn classify(&self, friction_ratio: Option<f64>, cone_resistance: Option<f64>) -> &str {
        let rf = match friction_ratio {
            Some(rf) if rf >= 0.0 => rf,
            _ => return &self.default,
        };
        let mut hits = self.rules.iter().filter_map(|rule| rule.test(rf, cone_resistance));
        let hit = match self.override_order {
            OverrideOrder::FirstMatch => hits.next(),
            OverrideOrder::LastMatch => hits.last(),
        };
        hit.unwrap_or(&self.default)
    }
}
