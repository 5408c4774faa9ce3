//! Property-based tests for the light path field using proptest.
//!
//! Covers: grid shape law, normalization after initialization, capacity and
//! connectivity of chains, export roundtrip.

use cgmath::Point3;
use light_path_field::{
    Direction, FieldConfig, LightPathField, LpfError, RayChain, RayState, RayUpdate,
};
use proptest::prelude::*;

fn origin_state(energy: f64) -> RayState {
    RayState::new(Point3::new(0.0, 0.0, 0.0), Direction::default(), energy)
}

// ── Grid Shape ───────────────────────────────────────────────────────

proptest! {
    /// Both grid dimensions are floor(angle / resolution) + 1.
    #[test]
    fn grid_shape_law(
        source_angle_deg in 1.0f64..=180.0,
        angular_resolution_deg in 0.001f64..=20.0,
    ) {
        let config = FieldConfig::new(source_angle_deg, angular_resolution_deg, 1);
        let n = (source_angle_deg / angular_resolution_deg).floor() as usize + 1;

        prop_assert!(config.validate().is_ok());
        prop_assert_eq!(config.grid_shape(), (n, n));
    }

    /// Parameters outside of their domain never produce a field.
    #[test]
    fn invalid_angles_rejected(
        source_angle_deg in prop_oneof![0.0f64..0.999, 180.001f64..1000.0],
        angular_resolution_deg in 0.5f64..20.0,
    ) {
        let config = FieldConfig::new(source_angle_deg, angular_resolution_deg, 2);
        let is_config_error = matches!(LightPathField::new(config), Err(LpfError::ConfigError(_)));
        prop_assert!(is_config_error);
    }
}

// ── Initialization ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Step zero always carries a total energy of one, whatever the profile.
    #[test]
    fn initialization_normalizes(
        source_angle_deg in 1.0f64..180.0,
        angular_resolution_deg in 2.0f64..20.0,
        constant in 0.0f64..5.0,
        polar_weight in 0.0f64..5.0,
        azimuthal_weight in 0.0f64..5.0,
    ) {
        let mut field = LightPathField::new(
            FieldConfig::new(source_angle_deg, angular_resolution_deg, 2)
        ).unwrap();
        field.initialize_from_distribution(&|polar: f64, azimuthal: f64| {
            constant
                + polar_weight * polar.to_radians().sin().powi(2)
                + azimuthal_weight * azimuthal.to_radians().cos().abs()
        });

        let map = field.energy_map(0);
        prop_assert!((map.sum() - 1.0).abs() < 1e-6, "sum = {}", map.sum());
        prop_assert!(map.iter().all(|&e| e >= 0.0));
        prop_assert!((field.total_energy() - 1.0).abs() < 1e-6);
    }

    /// Initializing twice gives the same first step.
    #[test]
    fn initialization_idempotent(
        angular_resolution_deg in 2.0f64..20.0,
        exponent in 0.5f64..4.0,
    ) {
        let profile = light_path_field::Lambertian::new(exponent);
        let mut field = LightPathField::new(
            FieldConfig::new(90.0, angular_resolution_deg, 3)
        ).unwrap();

        field.initialize_from_distribution(&profile);
        let first = field.energy_map(0);
        field.initialize_from_distribution(&profile);

        prop_assert_eq!(field.energy_map(0), first);
        prop_assert_eq!(field.max_depth(), 1);
    }
}

// ── Chains ───────────────────────────────────────────────────────────

proptest! {
    /// Exactly `budget` appends succeed.
    #[test]
    fn capacity_law(budget in 1usize..16) {
        let mut chain = RayChain::new(budget);
        for _ in 0..budget {
            prop_assert!(chain.append(origin_state(0.1)).is_ok());
        }

        let exceeded = matches!(
            chain.append(origin_state(0.1)),
            Err(LpfError::CapacityExceeded { .. })
        );
        prop_assert!(exceeded);
        prop_assert_eq!(chain.len(), budget);
    }

    /// A gap of at most 1e-6 is connected, anything larger is reported at the
    /// right segment.
    #[test]
    fn connectivity_law(
        gap in 0.0f64..2e-6,
        connected_before in 0usize..4,
    ) {
        prop_assume!((gap - 1e-6).abs() > 1e-12);

        let mut chain = RayChain::new(connected_before + 2);
        for _ in 0..=connected_before {
            chain.append(origin_state(0.5)).unwrap();
        }
        chain
            .append(RayState::new(Point3::new(gap, 0.0, 0.0), Direction::default(), 0.5))
            .unwrap();

        match chain.check_connectivity() {
            Ok(()) => prop_assert!(gap < 1e-6),
            Err(LpfError::ConnectivityViolation { segment, .. }) => {
                prop_assert!(gap > 1e-6);
                prop_assert_eq!(segment, connected_before);
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }
}

// ── Export ───────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Exported and reimported fields answer energy queries identically.
    #[test]
    fn export_roundtrip(
        angular_resolution_deg in 5.0f64..20.0,
        bounces in prop::collection::vec((0usize..64, 0.0f64..1.0, 0.1f64..3.0), 0..12),
    ) {
        let mut field = LightPathField::new(
            FieldConfig::new(60.0, angular_resolution_deg, 3)
        ).unwrap();
        field.initialize_from_distribution(&|polar: f64, _: f64| 1.0 + polar);

        let cells = field.cell_count();
        for (cell, attenuation, distance) in bounces {
            let (row, col) = ((cell % cells) / field.cols(), (cell % cells) % field.cols());
            let last = *field.get(row, col).unwrap().last().unwrap();
            if field.get(row, col).unwrap().is_full() {
                continue;
            }

            let hit = last.reference_point() + last.direction().to_unit_vector() * distance;
            let step = field.get(row, col).unwrap().len() - 1;
            field
                .update_entry(row, col, step, &RayUpdate::new().terminal_position(hit))
                .unwrap();
            field
                .append_interaction(
                    row,
                    col,
                    RayState::new(hit, last.direction(), last.energy() * attenuation),
                )
                .unwrap();
        }

        let restored = LightPathField::from_json(&field.to_json().unwrap()).unwrap();
        prop_assert_eq!(restored.total_energy(), field.total_energy());
        for step in 0..field.max_depth() {
            prop_assert_eq!(restored.energy_map(step), field.energy_map(step));
        }
        prop_assert!(restored.validate_all_connectivity().is_ok());
    }
}
