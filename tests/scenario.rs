extern crate fixtures;

use cgmath::Point3;
use fixtures::mirror::{
    make_field, make_traced_field, mirror_center, reference_config, MIRROR_REFLECTANCE,
};
use light_path_field::{Direction, LightPathField, LpfError, RayState, Uniform};

#[test]
fn test_reference_scenario() {
    let mut field = LightPathField::new(reference_config()).unwrap();
    assert_eq!(field.shape(), (13, 13));

    field.initialize_from_distribution(&Uniform);
    assert!((field.total_energy() - 1.0).abs() < 1e-12);

    let energy = field.energy_map(0)[[0, 0]] * 0.9;
    let vertex = field.get(0, 0).unwrap().last().unwrap().reference_point();
    field
        .append_interaction(0, 0, RayState::new(vertex, Direction::new(0.5, 1.0), energy))
        .unwrap();

    assert_eq!(field.get(0, 0).unwrap().len(), 2);
    assert!(field.validate_all_connectivity().is_ok());

    let result = field.append_interaction(0, 0, RayState::new(vertex, Direction::default(), 0.0));
    assert!(matches!(result, Err(LpfError::CapacityExceeded { budget: 2 })));
}

#[test]
fn test_small_field_from_uniform_source() {
    let field = make_field(20.0, 5.0);
    assert_eq!(field.shape(), (5, 5));
    assert!((field.energy_map(0).sum() - 1.0).abs() < 1e-12);
}

#[test]
fn test_mirror_bounce_is_connected() {
    let field = make_traced_field();
    assert!(field.validate_all_connectivity().is_ok());
    assert_eq!(field.max_depth(), 2);

    // Straight up hits the mirror right above the source
    let up = field.get(0, 0).unwrap();
    assert_eq!(up.entries()[0].terminal_position(), Some(mirror_center()));
    assert_eq!(up.entries()[1].position(), mirror_center());

    // Rays at 90° and beyond never reach the mirror
    for row in 9..13 {
        for col in 0..13 {
            assert_eq!(field.get(row, col).unwrap().len(), 1);
        }
    }
}

#[test]
fn test_mirror_bounce_energy_accounting() {
    let field = make_traced_field();
    let emitted = field.energy_map(0);
    let reflected = field.energy_map(1);

    // Rows 0 through 8 are below 90° and reflect
    let reflecting: f64 = emitted.rows().into_iter().take(9).map(|r| r.sum()).sum();
    assert!((reflected.sum() - reflecting * MIRROR_REFLECTANCE).abs() < 1e-12);
    assert!((field.total_energy() - (1.0 + reflecting * MIRROR_REFLECTANCE)).abs() < 1e-12);

    let restored = LightPathField::from_json(&field.to_json().unwrap()).unwrap();
    assert_eq!(restored.energy_map(1), reflected);
    assert_eq!(restored.total_energy(), field.total_energy());
}

#[test]
fn test_mirror_hits_lie_on_the_mirror() {
    let field = make_traced_field();
    for (_, chain) in field.cells() {
        if let Some(hit) = chain.entries()[0].terminal_position() {
            assert!((hit.z - 1.0).abs() < 1e-9);
            assert!(hit != Point3::new(0.0, 0.0, 0.0));
        }
    }
}
