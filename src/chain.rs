use crate::error::{LpfError, LpfResult, OutOfBounds};
use crate::ray::{RayState, RayUpdate};
use cgmath::MetricSpace;

/// Maximum gap between the reference point of an entry and the position of
/// the next entry for the two to count as connected.
pub const CONNECTIVITY_TOLERANCE: f64 = 1e-6;

/// Bounce history of a single ray, holding at most `bounce_budget` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RayChain {
    entries: Vec<RayState>,
    bounce_budget: usize,
}

impl RayChain {
    /// Entries are allocated as they are appended, the budget only caps them.
    pub fn new(bounce_budget: usize) -> Self {
        RayChain {
            entries: Vec::new(),
            bounce_budget,
        }
    }

    pub fn append(&mut self, state: RayState) -> LpfResult<()> {
        if self.is_full() {
            return Err(LpfError::CapacityExceeded {
                budget: self.bounce_budget,
            });
        }

        self.entries.push(state);
        Ok(())
    }

    pub fn last(&self) -> Option<&RayState> {
        self.entries.last()
    }

    pub fn get(&self, step: usize) -> Option<&RayState> {
        self.entries.get(step)
    }

    pub fn entries(&self) -> &[RayState] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.bounce_budget
    }

    pub fn bounce_budget(&self) -> usize {
        self.bounce_budget
    }

    /// Energy summed over all recorded steps.
    pub fn total_energy(&self) -> f64 {
        self.entries.iter().map(RayState::energy).sum()
    }

    /// Overwrites the fields set in `update` on the entry at `step`.
    pub fn update_entry(&mut self, step: usize, update: &RayUpdate) -> LpfResult<()> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(step)
            .ok_or(LpfError::IndexOutOfBounds(OutOfBounds::Step { step, len }))?;
        entry.apply(update);
        Ok(())
    }

    /// Checks that every entry starts where the previous one ended.
    ///
    /// Fails on the first disconnected pair, reporting the index of its first
    /// entry. Never modifies the chain.
    pub fn check_connectivity(&self) -> LpfResult<()> {
        for (segment, pair) in self.entries.windows(2).enumerate() {
            let distance = pair[0].reference_point().distance(pair[1].position());
            // Negated so that a NaN gap is reported too
            if !(distance <= CONNECTIVITY_TOLERANCE) {
                return Err(LpfError::ConnectivityViolation {
                    cell: None,
                    segment,
                    distance,
                });
            }
        }

        Ok(())
    }

    /// Drops all entries and starts over from `state`.
    ///
    /// Callers guarantee a budget of at least one.
    pub(crate) fn restart(&mut self, state: RayState) {
        self.entries.clear();
        self.entries.push(state);
    }
}
