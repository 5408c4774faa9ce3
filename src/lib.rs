//! Light path field: a fixed-shape grid of bounded ray chains emanating from a
//! single source, seeded from an angular emission profile and filled in by an
//! external ray propagation step.

#[cfg(test)]
#[macro_use]
extern crate approx;
#[macro_use]
extern crate log;

mod chain;
mod config;
mod direction;
mod error;
mod export;
mod field;
mod ray;
mod source;

pub use chain::{RayChain, CONNECTIVITY_TOLERANCE};
pub use config::{
    FieldConfig, FieldConfigBuilder, ANGULAR_RESOLUTION_RANGE_DEG, SOURCE_ANGLE_RANGE_DEG,
};
pub use direction::{cart_to_sph, sph_to_cart, Direction};
pub use error::{LpfError, LpfResult, OutOfBounds};
pub use export::{ConfigRecord, EntryRecord, FieldRecord, FORMAT_VERSION};
pub use field::LightPathField;
pub use ray::{RayState, RayUpdate};
pub use source::{Gaussian, Lambertian, SourceDistribution, Uniform};
