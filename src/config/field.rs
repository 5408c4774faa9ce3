use crate::error::{LpfError, LpfResult};
use cgmath::Point3;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Admissible half-angle of the emission cone, in degrees.
pub const SOURCE_ANGLE_RANGE_DEG: RangeInclusive<f64> = 1.0..=180.0;
/// Admissible angular step between neighbouring cells, in degrees.
pub const ANGULAR_RESOLUTION_RANGE_DEG: RangeInclusive<f64> = 0.001..=20.0;

/// Grids with more cells than this are allowed but logged.
const LARGE_GRID_CELLS: usize = 4_000_000;

/// Scalar parameters a light path field is derived from.
///
/// Deserializes from JSON with every field optional; missing fields take the
/// defaults of a 120° source sampled every 10° with two recorded interactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_source_angle_deg")]
    pub source_angle_deg: f64,
    #[serde(default = "default_angular_resolution_deg")]
    pub angular_resolution_deg: f64,
    /// Maximum number of interactions recorded per chain.
    #[serde(default = "default_bounce_budget")]
    pub bounce_budget: usize,
    /// Emission point shared by every chain at initialization.
    #[serde(default)]
    pub source_origin: [f64; 3],
}

fn default_source_angle_deg() -> f64 {
    120.0
}
fn default_angular_resolution_deg() -> f64 {
    10.0
}
fn default_bounce_budget() -> usize {
    2
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            source_angle_deg: default_source_angle_deg(),
            angular_resolution_deg: default_angular_resolution_deg(),
            bounce_budget: default_bounce_budget(),
            source_origin: [0.0; 3],
        }
    }
}

impl FieldConfig {
    pub fn new(source_angle_deg: f64, angular_resolution_deg: f64, bounce_budget: usize) -> Self {
        FieldConfig {
            source_angle_deg,
            angular_resolution_deg,
            bounce_budget,
            ..FieldConfig::default()
        }
    }

    /// Loads a configuration from a JSON file and validates it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> LpfResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LpfResult<()> {
        if !SOURCE_ANGLE_RANGE_DEG.contains(&self.source_angle_deg) {
            return Err(LpfError::ConfigError(format!(
                "source_angle_deg must lie in [{}, {}], got {}",
                SOURCE_ANGLE_RANGE_DEG.start(),
                SOURCE_ANGLE_RANGE_DEG.end(),
                self.source_angle_deg
            )));
        }

        if !ANGULAR_RESOLUTION_RANGE_DEG.contains(&self.angular_resolution_deg) {
            return Err(LpfError::ConfigError(format!(
                "angular_resolution_deg must lie in [{}, {}], got {}",
                ANGULAR_RESOLUTION_RANGE_DEG.start(),
                ANGULAR_RESOLUTION_RANGE_DEG.end(),
                self.angular_resolution_deg
            )));
        }

        if self.bounce_budget < 1 {
            return Err(LpfError::ConfigError(
                "bounce_budget must be at least 1".to_string(),
            ));
        }

        if self.source_origin.iter().any(|c| !c.is_finite()) {
            return Err(LpfError::ConfigError(format!(
                "source_origin must be finite, got {:?}",
                self.source_origin
            )));
        }

        if self.is_large_grid() {
            let (rows, cols) = self.grid_shape();
            warn!(
                "Configuration derives a {}x{} grid, allocation may be expensive",
                rows, cols
            );
        }

        Ok(())
    }

    /// Rows and columns of the derived grid. Rows enumerate polar angles,
    /// columns enumerate azimuthal angles over the same range.
    pub fn grid_shape(&self) -> (usize, usize) {
        let n = (self.source_angle_deg / self.angular_resolution_deg).floor() as usize + 1;
        (n, n)
    }

    fn is_large_grid(&self) -> bool {
        let (rows, cols) = self.grid_shape();
        rows.saturating_mul(cols) > LARGE_GRID_CELLS
    }

    pub fn origin(&self) -> Point3<f64> {
        let [x, y, z] = self.source_origin;
        Point3::new(x, y, z)
    }
}
