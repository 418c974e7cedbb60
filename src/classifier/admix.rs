//! Composite lithology code parsing
//!
//! A composite code such as `"Khz1s"` holds an uppercase main lithology
//! (`K`) followed by lowercase admixture letters, each with an optional
//! one-digit intensity (`h`, `z1`, `s`).

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Output key holding the main lithology
pub const LITHOLOGY_KEY: &str = "lithology";

/// Intensity suffix for admixtures written without a digit
const IMPLICIT_INTENSITY: char = 'X';

fn main_lithology_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]+").expect("valid regex"))
}

fn admix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-z][0-9]?").expect("valid regex"))
}

/// Splits composite lithology codes into main lithology and admixture
/// fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmixClassifier {
    fieldnames: HashMap<String, String>,
}

impl AdmixClassifier {
    /// `fieldnames` maps admixture letters to output field names; letters
    /// missing from the table are used as field names themselves.
    pub fn new(fieldnames: HashMap<String, String>) -> Self {
        let fieldnames = fieldnames
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self { fieldnames }
    }

    pub fn fieldname<'a>(&'a self, letter: &'a str) -> &'a str {
        self.fieldnames.get(letter).map(String::as_str).unwrap_or(letter)
    }

    /// Parse a composite code. `None` yields an empty map; a code without a
    /// leading uppercase run has no `lithology` key.
    pub fn classify(&self, code: Option<&str>) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        let Some(code) = code else {
            return attrs;
        };

        if let Some(m) = main_lithology_pattern().find(code) {
            attrs.insert(LITHOLOGY_KEY.to_string(), m.as_str().to_string());
        }

        for token in admix_pattern().find_iter(code) {
            let token = token.as_str();
            let letter = token[..1].to_lowercase();
            let mut value = token.to_uppercase();
            if value.len() == 1 {
                value.push(IMPLICIT_INTENSITY);
            }
            attrs.insert(self.fieldname(&letter).to_string(), value);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> AdmixClassifier {
        AdmixClassifier::new(HashMap::from([
            ("h".to_string(), "humus".to_string()),
            ("z".to_string(), "sand".to_string()),
        ]))
    }

    #[test]
    fn test_none_is_empty() {
        assert!(classifier().classify(None).is_empty());
    }

    #[test]
    fn test_main_and_admixtures() {
        let attrs = classifier().classify(Some("Khz1"));
        assert_eq!(attrs.get("lithology").map(String::as_str), Some("K"));
        assert_eq!(attrs.get("humus").map(String::as_str), Some("HX"));
        assert_eq!(attrs.get("sand").map(String::as_str), Some("Z1"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_unknown_letter_uses_letter_as_field() {
        let attrs = classifier().classify(Some("Zks3"));
        assert_eq!(attrs.get("lithology").map(String::as_str), Some("Z"));
        assert_eq!(attrs.get("k").map(String::as_str), Some("KX"));
        assert_eq!(attrs.get("s").map(String::as_str), Some("S3"));
    }

    #[test]
    fn test_multi_letter_main_lithology() {
        let attrs = classifier().classify(Some("NBE"));
        assert_eq!(attrs.get("lithology").map(String::as_str), Some("NBE"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_missing_main_lithology() {
        let attrs = classifier().classify(Some("hz2"));
        assert!(!attrs.contains_key("lithology"));
        assert_eq!(attrs.get("humus").map(String::as_str), Some("HX"));
        assert_eq!(attrs.get("sand").map(String::as_str), Some("Z2"));
    }

    #[test]
    fn test_default_classifier_keeps_letters() {
        let attrs = AdmixClassifier::default().classify(Some("Kh2"));
        assert_eq!(attrs.get("h").map(String::as_str), Some("H2"));
    }
}
