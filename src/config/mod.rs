mod builder;
mod field;

pub use self::builder::FieldConfigBuilder;
pub use self::field::{FieldConfig, ANGULAR_RESOLUTION_RANGE_DEG, SOURCE_ANGLE_RANGE_DEG};
