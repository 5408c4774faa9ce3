use crate::direction::Direction;
use cgmath::Point3;

/// State of a ray at one recorded interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayState {
    position: Point3<f64>,
    direction: Direction,
    energy: f64,
    terminal_position: Option<Point3<f64>>,
}

impl RayState {
    /// Negative or NaN energy is stored as zero.
    pub fn new(position: Point3<f64>, direction: Direction, energy: f64) -> Self {
        RayState {
            position,
            direction,
            energy: energy.max(0.0),
            terminal_position: None,
        }
    }

    /// Marks this state as ending at a known point, e.g. a sensor hit.
    pub fn with_terminal_position(mut self, terminal_position: Point3<f64>) -> Self {
        self.terminal_position = Some(terminal_position);
        self
    }

    /// Where this interaction happens, or the emission point for the first entry.
    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Fraction of total source power carried after this interaction.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn terminal_position(&self) -> Option<Point3<f64>> {
        self.terminal_position
    }

    /// The point the next entry of a chain has to start from.
    pub fn reference_point(&self) -> Point3<f64> {
        self.terminal_position.unwrap_or(self.position)
    }

    pub(crate) fn apply(&mut self, update: &RayUpdate) {
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(polar) = update.polar {
            self.direction.polar = polar;
        }
        if let Some(azimuthal) = update.azimuthal {
            self.direction.azimuthal = azimuthal;
        }
        if let Some(energy) = update.energy {
            self.energy = energy.max(0.0);
        }
        if let Some(terminal_position) = update.terminal_position {
            self.terminal_position = Some(terminal_position);
        }
    }
}

/// Partial overwrite of a recorded [`RayState`].
///
/// Only the fields that were set are written. A terminal position can be set
/// but not removed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RayUpdate {
    position: Option<Point3<f64>>,
    polar: Option<f64>,
    azimuthal: Option<f64>,
    energy: Option<f64>,
    terminal_position: Option<Point3<f64>>,
}

impl RayUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Point3<f64>) -> Self {
        self.position = Some(position);
        self
    }

    pub fn polar(mut self, polar: f64) -> Self {
        self.polar = Some(polar);
        self
    }

    pub fn azimuthal(mut self, azimuthal: f64) -> Self {
        self.azimuthal = Some(azimuthal);
        self
    }

    pub fn direction(self, direction: Direction) -> Self {
        self.polar(direction.polar).azimuthal(direction.azimuthal)
    }

    pub fn energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn terminal_position(mut self, terminal_position: Point3<f64>) -> Self {
        self.terminal_position = Some(terminal_position);
        self
    }
}
