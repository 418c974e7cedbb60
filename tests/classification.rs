//! End-to-end classification through the public API and default config

use std::collections::HashMap;

use xsection::classifier::{Limit, RuleEntry, SoilBehaviourClass, SoilBehaviourIndexRule};
use xsection::{
    AdmixClassifier, Borehole, Config, CptLog, CptSample, LithologyClassifier, LithologyTable,
    MedianBin, OverrideOrder, RuleType, SandmedianClassifier, Segment, SANDMEDIAN_ATTR,
};

fn table() -> LithologyTable {
    LithologyTable {
        default: "NBE".to_string(),
        rules: vec![
            RuleEntry {
                lithology: "Z".to_string(),
                limits: vec![Limit {
                    left: 0.0,
                    right: 1.5,
                    a: 1.0,
                    b: 0.0,
                }],
            },
            RuleEntry {
                lithology: "K".to_string(),
                limits: vec![Limit {
                    left: 1.0,
                    right: 5.0,
                    a: 0.0,
                    b: 0.0,
                }],
            },
        ],
        override_order: OverrideOrder::FirstMatch,
    }
}

#[test]
fn test_no_data_yields_default_for_every_rule_type() {
    for rule_type in ["exponential", "isbt"] {
        let clf = LithologyClassifier::new(&table(), rule_type).unwrap();
        assert_eq!(clf.classify(None, Some(5.0)), "NBE", "{rule_type}");
        assert_eq!(clf.classify(Some(-1.0), Some(5.0)), "NBE", "{rule_type}");
        assert_eq!(clf.classify(Some(-0.001), None), "NBE", "{rule_type}");
    }
}

#[test]
fn test_unknown_rule_type_is_configuration_error() {
    let err = LithologyClassifier::new(&table(), "linear").unwrap_err();
    assert!(matches!(err, xsection::XsError::Configuration(_)));
}

#[test]
fn test_override_order_on_overlapping_windows() {
    let first = LithologyClassifier::with_rule_type(&table(), RuleType::Exponential).unwrap();
    assert_eq!(first.classify(Some(1.2), Some(2.0)), "Z");

    let mut last_table = table();
    last_table.override_order = OverrideOrder::LastMatch;
    let last = LithologyClassifier::with_rule_type(&last_table, RuleType::Exponential).unwrap();
    assert_eq!(last.classify(Some(1.2), Some(2.0)), "K");
    // only the clay rule fires outside the overlap
    assert_eq!(last.classify(Some(3.0), Some(2.0)), "K");
    assert_eq!(last.classify(Some(0.5), Some(2.0)), "Z");
}

#[test]
fn test_soil_behaviour_index_classes() {
    assert_eq!(
        SoilBehaviourIndexRule::classify(1.0, 5.0),
        Some(SoilBehaviourClass::Sand)
    );
    assert_eq!(
        SoilBehaviourIndexRule::classify(7.0, 1.0),
        Some(SoilBehaviourClass::Peat)
    );
    assert_eq!(SoilBehaviourIndexRule::classify(0.0, 1.0), None);

    let clf = Config::default().lithology_classifier().unwrap();
    assert_eq!(clf.classify(Some(1.0), Some(5.0)), "Z");
    assert_eq!(clf.classify(Some(7.0), Some(1.0)), "V");
    // undefined index: no match, so the default code
    assert_eq!(clf.classify(Some(1.0), Some(0.0)), "NBE");
}

#[test]
fn test_sandmedian_bins() {
    let clf = Config::default().sandmedian_classifier().unwrap();
    assert_eq!(clf.classify(63.0), Some("ZUF"));
    assert_eq!(clf.classify(299.9), Some("ZMG"));
    assert_eq!(clf.classify(62.0), None);
    assert_eq!(clf.classify(2000.0), None);

    let custom = SandmedianClassifier::new(vec![MedianBin {
        lower: 0.0,
        upper: 1.0,
        medianclass: "A".to_string(),
    }])
    .unwrap();
    assert_eq!(custom.bins().len(), 1);
}

#[test]
fn test_admix_fieldnames_from_table() {
    let admix = AdmixClassifier::new(HashMap::from([
        ("H".to_string(), "humus".to_string()),
        ("z".to_string(), "sand".to_string()),
    ]));
    assert!(admix.classify(None).is_empty());
    let attrs = admix.classify(Some("Khz1"));
    assert_eq!(attrs.get("lithology").map(String::as_str), Some("K"));
    assert_eq!(attrs.get("humus").map(String::as_str), Some("HX"));
    assert_eq!(attrs.get("sand").map(String::as_str), Some("Z1"));
}

#[test]
fn test_enrichment_pipeline() {
    let config = Config::default();
    let lithology = config.lithology_classifier().unwrap();
    let admix = config.admix_classifier();
    let sandmedian = config.sandmedian_classifier().unwrap();

    let mut cpt = Borehole::new("S1", 0.0, 0.0)
        .with_format("GEF CPT")
        .with_depth(3.0)
        .with_cpt(CptLog {
            samples: vec![
                CptSample {
                    depth: 0.0,
                    friction_ratio: Some(1.0),
                    cone_resistance: Some(5.0),
                },
                CptSample {
                    depth: 1.0,
                    friction_ratio: Some(7.0),
                    cone_resistance: Some(1.0),
                },
                CptSample {
                    depth: 2.0,
                    friction_ratio: None,
                    cone_resistance: None,
                },
            ],
        });
    cpt.to_lithology(&lithology, &admix);
    let codes: Vec<Option<&str>> = cpt.segments.iter().map(|s| s.lithology.as_deref()).collect();
    assert_eq!(codes, vec![Some("Z"), Some("V"), Some("NBE")]);
    assert_eq!(cpt.depth_from_segments(), Some(3.0));

    let mut bh = Borehole::new("B1", 0.0, 0.0)
        .with_format("CSV Borehole")
        .with_segments(vec![
            Segment::new(0.0, 1.0)
                .unwrap()
                .with_lithology("Zk")
                .with_attr(SANDMEDIAN_ATTR, 180.0),
            Segment::new(1.0, 1.1).unwrap().with_lithology("Kz1"),
            Segment::new(1.1, 2.0).unwrap().with_lithology("Zs"),
        ]);
    bh.apply_admix(&admix);
    bh.update_sandmedianclass(&sandmedian);
    assert_eq!(bh.segments[0].lithology.as_deref(), Some("Z"));
    assert_eq!(bh.segments[0].sandmedianclass.as_deref(), Some("ZMF"));

    let simple = bh.simplified(Some(0.5), |s| s.lithology.clone());
    assert_eq!(simple.segments.len(), 1);
    assert_eq!(simple.segments[0].base, 2.0);
}
