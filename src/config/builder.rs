use super::FieldConfig;
use crate::error::LpfResult;

/// Chained construction of a [`FieldConfig`], validated on `build`.
pub struct FieldConfigBuilder {
    config: FieldConfig,
}

impl FieldConfigBuilder {
    pub fn new() -> FieldConfigBuilder {
        FieldConfigBuilder {
            config: FieldConfig::default(),
        }
    }

    pub fn source_angle_deg(mut self, source_angle_deg: f64) -> FieldConfigBuilder {
        self.config.source_angle_deg = source_angle_deg;
        self
    }

    pub fn angular_resolution_deg(mut self, angular_resolution_deg: f64) -> FieldConfigBuilder {
        self.config.angular_resolution_deg = angular_resolution_deg;
        self
    }

    pub fn bounce_budget(mut self, bounce_budget: usize) -> FieldConfigBuilder {
        self.config.bounce_budget = bounce_budget;
        self
    }

    pub fn source_origin(mut self, x: f64, y: f64, z: f64) -> FieldConfigBuilder {
        self.config.source_origin = [x, y, z];
        self
    }

    pub fn build(self) -> LpfResult<FieldConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for FieldConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
