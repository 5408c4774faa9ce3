use cgmath::{Point3, Vector3};
use light_path_field::{Direction, FieldConfig, LightPathField, RayState, RayUpdate, Uniform};

/// Height of the mirror plane above the source.
pub const MIRROR_HEIGHT: f64 = 1.0;
/// Fraction of energy kept by a reflection off the mirror.
pub const MIRROR_REFLECTANCE: f64 = 0.9;

/// The 120° source sampled every 10° with two recorded interactions per ray.
pub fn reference_config() -> FieldConfig {
    FieldConfig::new(120.0, 10.0, 2)
}

/// A field for the given resolution, seeded by a uniform source.
pub fn make_field(source_angle_deg: f64, angular_resolution_deg: f64) -> LightPathField {
    let mut field =
        LightPathField::new(FieldConfig::new(source_angle_deg, angular_resolution_deg, 2)).unwrap();
    field.initialize_from_distribution(&Uniform);
    field
}

/// Traces the first bounce of every ray in the field off a horizontal mirror
/// at `MIRROR_HEIGHT` above the source origin, much like an external tracer
/// would: the emission gets its hit point as terminal position and the
/// reflection is appended, starting at the hit point.
///
/// Rays that do not travel upwards miss the mirror and are left alone.
pub fn trace_mirror_bounce(field: &mut LightPathField) {
    let (rows, cols) = field.shape();
    let origin = field.config().origin();

    for row in 0..rows {
        for col in 0..cols {
            let emission = field.get(row, col).unwrap().entries()[0];
            let direction = emission.direction();
            let travel = direction.to_unit_vector();
            if travel.z <= 1e-9 {
                continue;
            }

            let hit = origin + travel * (MIRROR_HEIGHT / travel.z);
            field
                .update_entry(row, col, 0, &RayUpdate::new().terminal_position(hit))
                .unwrap();

            let reflected = Direction::new(std::f64::consts::PI - direction.polar, direction.azimuthal);
            field
                .append_interaction(
                    row,
                    col,
                    RayState::new(hit, reflected, emission.energy() * MIRROR_REFLECTANCE),
                )
                .unwrap();
        }
    }
}

/// The reference field with a uniform source and one mirror bounce traced.
pub fn make_traced_field() -> LightPathField {
    let mut field = LightPathField::new(reference_config()).unwrap();
    field.initialize_from_distribution(&Uniform);
    trace_mirror_bounce(&mut field);
    field
}

/// Point straight above the source on the mirror.
pub fn mirror_center() -> Point3<f64> {
    reference_config().origin() + Vector3::unit_z() * MIRROR_HEIGHT
}
