//! Section projection, declutter and layout through the public API

use xsection::section::SectionState;
use xsection::{
    declutter, project_sections, Borehole, CompassRose, Config, CrossSection, FieldPoint,
    LayoutConfig, PointOfInterest, Projectable, SectionLayout, SectionLine, XsError,
};

fn section(coords: &[(f64, f64)], buffer: f64) -> CrossSection {
    CrossSection::from_coords(coords.iter().copied(), buffer, CompassRose::eight_point()).unwrap()
}

#[test]
fn test_points_at_line_ends_are_never_added() {
    let mut cs = section(&[(0.0, 0.0), (10.0, 10.0)], 3.0);
    let start = FieldPoint::new("start", 0.0, 0.0);
    let end = FieldPoint::new("end", 10.0, 10.0);
    let inside = FieldPoint::new("inside", 5.0, 4.0);
    let added = cs.add_points([&start, &end, &inside]);
    assert_eq!(added, 1);

    let (distance, point) = &cs.points()[0];
    assert!(*distance > 0.0 && *distance < cs.length());
    let projection = point.projection().unwrap();
    assert!((0.0..360.0).contains(&projection.bearing));
    assert!((projection.bearing - 135.0).abs() < 1e-9);
    assert_eq!(projection.label, "SE");
}

#[test]
fn test_discretize_length_twelve() {
    let cs = section(&[(0.0, 0.0), (12.0, 0.0)], 1.0);
    let distances: Vec<f64> = cs.discretize(5.0, 0.0).unwrap().map(|(d, _)| d).collect();
    assert_eq!(distances, vec![0.0, 5.0, 10.0, 12.0]);
}

#[test]
fn test_sort_twice_is_unchanged() {
    let mut cs = section(&[(0.0, 0.0), (100.0, 0.0)], 10.0);
    let bhs: Vec<Borehole> = [70.0, 30.0, 30.0, 50.0, 10.0]
        .iter()
        .enumerate()
        .map(|(i, x)| Borehole::new(format!("B{i}"), *x, i as f64))
        .collect();
    cs.add_boreholes(&bhs);
    cs.sort();
    let once: Vec<String> = cs.boreholes().iter().map(|(_, b)| b.code.clone()).collect();
    cs.sort();
    let twice: Vec<String> = cs.boreholes().iter().map(|(_, b)| b.code.clone()).collect();
    assert_eq!(once, twice);
    assert_eq!(once, vec!["B4", "B1", "B2", "B3", "B0"]);
    assert_eq!(cs.state(), SectionState::Sorted);
}

#[test]
fn test_declutter_example() {
    let d = declutter(&[0.0, 1.0, 1.5, 10.0], 2.0).unwrap();
    for w in d.display.windows(2) {
        assert!(w[1] >= w[0]);
        assert!(w[1] - w[0] >= 2.0);
    }
    let anchored: Vec<(f64, f64)> = d.extensions.iter().map(|e| (e.point, e.dx)).collect();
    assert!(anchored.contains(&(1.5, 1.5)));
    assert!(anchored.contains(&(1.0, 1.0)));
}

#[test]
fn test_zero_length_section() {
    let mut cs = section(&[(5.0, 5.0), (5.0, 5.0)], 1.0);
    assert!(matches!(
        cs.borehole_density(),
        Err(XsError::DegenerateGeometry(_))
    ));
    let layout = SectionLayout::compute(&mut cs, &LayoutConfig::default());
    assert!(layout.is_err());
    assert_eq!(cs.add_boreholes(&[Borehole::new("B1", 5.0, 5.0)]), 0);
}

#[test]
fn test_batch_then_layout_and_records() {
    let lines = vec![SectionLine {
        label: "A".to_string(),
        title: Some("Dike section".to_string()),
        coordinates: vec![(0.0, 0.0), (0.0, 200.0)],
    }];
    let boreholes = vec![
        Borehole::new("B1", 2.0, 100.0).with_z(1.0),
        Borehole::new("B2", -1.0, 101.0),
        Borehole::new("far", 80.0, 50.0),
    ];
    let sample = FieldPoint::new("B1", 2.0, 100.0).with_interval(Some(0.5), Some(1.5));
    let points = vec![sample];
    let pois = vec![PointOfInterest::new("road", 0.5, 150.0).with_label("N3")];

    let mut config = Config::default();
    config.section.buffer_distance = 10.0;
    let mut outcomes = project_sections(&lines, &boreholes, &points, &pois, &config).unwrap();
    let mut cs = outcomes.remove(0).result.unwrap();
    assert_eq!(cs.boreholes().len(), 2);
    assert_eq!(cs.title(), Some("Dike section"));

    let layout = SectionLayout::compute(&mut cs, &config.layout).unwrap();
    assert_eq!(layout.wind_label_left, "S");
    assert_eq!(layout.wind_label_right, "N");
    assert_eq!(layout.extensions.len(), 1);
    assert!((layout.xmax - 203.0).abs() < 1e-9);
    assert_eq!(layout.points.len(), 1);
    assert!((layout.points[0].midlevel - 0.0).abs() < 1e-9);
    assert!((layout.pois[0].display_distance - 153.0).abs() < 1e-9);

    let records = cs.records();
    assert!(records.is_empty());
    let b1 = cs.boreholes().iter().find(|(_, b)| b.code == "B1").unwrap();
    assert_eq!(b1.1.projection().unwrap().label, "E");
}
