//! Reflection table workflow integration tests
//!
//! Exercises the full path an external caller takes: fuse observation and
//! shoebox records into a table, mutate status flags under row selections,
//! intersect diffracted beams with a detector, and render a scale label from
//! a table-derived value.

use rust_xrd::viewer::fonts::{GLYPH_END, GLYPH_POINT};
use rust_xrd::viewer::label::value_to_glyphs;
use rust_xrd::viewer::overlay::stamp_label;
use rust_xrd::{
    Centroid, Detector, Flag, Intensity, Observation, Panel, ReflectionTable, Shoebox,
    ValueVariance,
};

// =============================================================================
// Test Helper Functions
// =============================================================================

/// Create a matched observation/shoebox pair on the given panel.
fn matched_pair(panel: usize, x: f64) -> (Observation, Shoebox) {
    let obs = Observation {
        panel,
        centroid_px: Centroid {
            position: [x, x + 1.0, 0.0],
            variance: [0.25, 0.25, 0.1],
        },
        intensity: Intensity {
            observed: ValueVariance::new(500.0 + x, 520.0 + x),
            corrected: ValueVariance::new(480.0 + x, 490.0 + x),
        },
    };
    let x0 = x as i32;
    let sbox = Shoebox::new(panel, [x0, x0 + 3, x0, x0 + 3, 0, 2]);
    (obs, sbox)
}

/// A detector with two parallel panels facing the crystal.
fn two_panel_detector() -> Detector {
    Detector::new(vec![
        Panel::new([0.0, 0.0, 150.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        Panel::new([0.0, -50.0, 150.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ])
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_fusion_flags_and_intersections_end_to_end() {
    let pairs: Vec<_> = (0..6).map(|i| matched_pair(i % 2, i as f64)).collect();
    let observations: Vec<_> = pairs.iter().map(|(obs, _)| *obs).collect();
    let shoeboxes: Vec<_> = pairs.iter().map(|(_, sbox)| sbox.clone()).collect();

    let mut table = ReflectionTable::from_observations_and_shoeboxes(&observations, &shoeboxes);
    assert_eq!(table.nrows(), 6);

    // Flag every even row as observed, every row as predicted.
    let nrows = table.nrows();
    table.insert_column("flags", vec![0_usize; nrows]);
    let even: Vec<bool> = (0..6).map(|i| i % 2 == 0).collect();
    table.set_flags(&even, Flag::Observed).unwrap();
    table.set_flags(&vec![true; 6], Flag::Predicted).unwrap();

    let both = Flag::Predicted | Flag::Observed;
    assert_eq!(
        table.get_flags(both).unwrap(),
        vec![true, false, true, false, true, false]
    );

    // Clearing predicted on even rows leaves only their observed bit.
    table.unset_flags(&even, Flag::Predicted).unwrap();
    assert_eq!(
        table.get_flags(Flag::Observed).unwrap(),
        vec![true, false, true, false, true, false]
    );
    assert_eq!(
        table.get_flags(Flag::Predicted).unwrap(),
        vec![false, true, false, true, false, true]
    );

    // Beam vectors for each row, straight through to the row's panel.
    table.insert_column("s1", vec![[0.0, 0.0, 1.0]; 6]);
    let detector = two_panel_detector();
    let points = table.compute_ray_intersections(&detector).unwrap();
    assert_eq!(points.len(), 6);
    // Panel 1 sits 50 below panel 0, so its slow coordinate is offset.
    assert_eq!(points[0], [0.0, 0.0]);
    assert!((points[1][1] - 50.0).abs() < 1e-9);
}

#[test]
fn test_fused_shoebox_column_round_trips_through_serde() {
    let (obs, sbox) = matched_pair(1, 10.0);
    let table = ReflectionTable::from_observations_and_shoeboxes(&[obs], &[sbox.clone()]);

    let stored = &table.column::<Shoebox>("shoebox").unwrap()[0];
    let json = serde_json::to_string(stored).unwrap();
    let back: Shoebox = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, stored);
    assert_eq!(back.bbox, sbox.bbox);
}

#[test]
fn test_scale_label_from_table_value() {
    let (obs, sbox) = matched_pair(0, 2.0);
    let table = ReflectionTable::from_observations_and_shoeboxes(&[obs], &[sbox]);
    let intensity = table.column::<f64>("intensity.cor.value").unwrap()[0];

    // 482 renders as three digit glyphs and a terminator.
    let label = value_to_glyphs(intensity);
    assert_eq!(label.issue, None);
    assert_eq!(&label.glyphs[..4], &[4, 8, 2, GLYPH_END]);
    assert!(label.glyphs.iter().all(|&g| g != GLYPH_POINT));

    // And stamps into an image buffer without touching the background.
    let (width, height) = (64, 18);
    let mut buf = vec![0.0; width * height];
    stamp_label(&mut buf, width, height, 4, 2, intensity, 255.0);
    assert!(buf.iter().any(|&p| p == 255.0));
    assert!(buf.iter().all(|&p| p == 0.0 || p == 255.0));
}

#[test]
fn test_help_keys_documents_every_fused_column() {
    let (obs, sbox) = matched_pair(0, 1.0);
    let table = ReflectionTable::from_observations_and_shoeboxes(&[obs], &[sbox]);
    let help = ReflectionTable::help_keys();
    for name in table.column_names() {
        assert!(help.contains(name), "help_keys is missing '{name}'");
    }
}
