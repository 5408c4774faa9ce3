//! Structured snapshot of a field for persistence by callers.
//!
//! The record is plain data: configuration scalars, the grid shape and every
//! chain's entries in row-major order. Writing it anywhere is up to the caller,
//! JSON helpers are provided for convenience.

use crate::chain::RayChain;
use crate::config::FieldConfig;
use crate::direction::Direction;
use crate::error::{LpfError, LpfResult};
use crate::field::LightPathField;
use crate::ray::RayState;
use cgmath::Point3;
use serde::{Deserialize, Serialize};

/// Version written into every exported record. Records with a higher version
/// are rejected on import.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub version: u32,
    pub config: ConfigRecord,
    /// One list of entries per cell, row-major.
    pub paths: Vec<Vec<EntryRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub source_angle_deg: f64,
    pub angular_resolution_deg: f64,
    pub bounce_budget: usize,
    pub source_origin: [f64; 3],
    /// `(rows, cols)` of the exported grid.
    pub shape: (usize, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub position: [f64; 3],
    pub polar: f64,
    pub azimuthal: f64,
    pub energy: f64,
    /// Written as `null` when the entry has no known endpoint.
    #[serde(default)]
    pub terminal_position: Option<[f64; 3]>,
}

impl From<&RayState> for EntryRecord {
    fn from(state: &RayState) -> Self {
        let direction = state.direction();
        EntryRecord {
            position: to_array(state.position()),
            polar: direction.polar,
            azimuthal: direction.azimuthal,
            energy: state.energy(),
            terminal_position: state.terminal_position().map(to_array),
        }
    }
}

impl From<&EntryRecord> for RayState {
    fn from(record: &EntryRecord) -> Self {
        let state = RayState::new(
            to_point(record.position),
            Direction::new(record.polar, record.azimuthal),
            record.energy,
        );

        match record.terminal_position {
            Some(terminal) => state.with_terminal_position(to_point(terminal)),
            None => state,
        }
    }
}

impl EntryRecord {
    fn is_finite(&self) -> bool {
        let terminal = self.terminal_position.unwrap_or([0.0; 3]);
        let scalars = [self.polar, self.azimuthal, self.energy];
        self.position
            .iter()
            .chain(terminal.iter())
            .chain(scalars.iter())
            .all(|v| v.is_finite())
    }
}

impl ConfigRecord {
    fn to_config(&self) -> FieldConfig {
        FieldConfig {
            source_angle_deg: self.source_angle_deg,
            angular_resolution_deg: self.angular_resolution_deg,
            bounce_budget: self.bounce_budget,
            source_origin: self.source_origin,
        }
    }
}

impl LightPathField {
    pub fn export(&self) -> FieldRecord {
        let config = self.config();
        FieldRecord {
            version: FORMAT_VERSION,
            config: ConfigRecord {
                source_angle_deg: config.source_angle_deg,
                angular_resolution_deg: config.angular_resolution_deg,
                bounce_budget: config.bounce_budget,
                source_origin: config.source_origin,
                shape: self.shape(),
            },
            paths: self
                .cells()
                .map(|(_, chain)| chain.entries().iter().map(EntryRecord::from).collect())
                .collect(),
        }
    }

    /// Rebuilds a field from an exported record.
    ///
    /// The record has to describe a valid configuration whose derived shape
    /// matches the recorded one, with one path per cell and no path longer
    /// than the bounce budget. Connectivity is not checked here.
    pub fn from_record(record: &FieldRecord) -> LpfResult<Self> {
        if record.version > FORMAT_VERSION {
            return Err(LpfError::InvalidRecord(format!(
                "format version {} is newer than the supported version {}",
                record.version, FORMAT_VERSION
            )));
        }

        let config = record.config.to_config();
        config.validate()?;

        if config.grid_shape() != record.config.shape {
            return Err(LpfError::InvalidRecord(format!(
                "recorded shape {:?} does not match the {:?} derived from the configuration",
                record.config.shape,
                config.grid_shape()
            )));
        }

        let mut field = LightPathField::new(config)?;
        if record.paths.len() != field.cell_count() {
            return Err(LpfError::InvalidRecord(format!(
                "expected {} paths, found {}",
                field.cell_count(),
                record.paths.len()
            )));
        }

        let cols = field.cols();
        for (idx, path) in record.paths.iter().enumerate() {
            let mut chain = RayChain::new(field.bounce_budget());
            for entry in path {
                chain.append(RayState::from(entry))?;
            }
            field.set(idx / cols, idx % cols, chain)?;
        }

        Ok(field)
    }

    /// Pretty JSON form of [`export`](Self::export).
    ///
    /// JSON has no infinities or NaN, so a field holding any non-finite
    /// coordinate or energy is refused instead of being written lossily.
    pub fn to_json(&self) -> LpfResult<String> {
        let record = self.export();
        let cols = self.cols();
        for (idx, path) in record.paths.iter().enumerate() {
            if let Some(step) = path.iter().position(|entry| !entry.is_finite()) {
                return Err(LpfError::InvalidRecord(format!(
                    "entry {} of cell ({}, {}) holds a non-finite value",
                    step,
                    idx / cols,
                    idx % cols
                )));
            }
        }

        Ok(serde_json::to_string_pretty(&record)?)
    }

    pub fn from_json(json: &str) -> LpfResult<Self> {
        let record: FieldRecord = serde_json::from_str(json)?;
        Self::from_record(&record)
    }
}

fn to_array(p: Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

fn to_point(a: [f64; 3]) -> Point3<f64> {
    Point3::new(a[0], a[1], a[2])
}
