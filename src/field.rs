use crate::chain::RayChain;
use crate::config::FieldConfig;
use crate::direction::Direction;
use crate::error::{LpfError, LpfResult, OutOfBounds};
use crate::ray::{RayState, RayUpdate};
use crate::source::SourceDistribution;
use cgmath::Point3;
use ndarray::Array2;
use rand::Rng;
use rayon::prelude::*;

/// Grid of ray chains indexed by discretized emission angle.
///
/// Row `i` holds rays leaving at polar angle `i * angular_resolution_deg`,
/// column `j` rays at azimuthal angle `j * angular_resolution_deg`. Chains are
/// stored contiguously in row-major order, which is also the iteration and
/// export order.
#[derive(Debug, Clone)]
pub struct LightPathField {
    config: FieldConfig,
    rows: usize,
    cols: usize,
    chains: Vec<RayChain>,
}

impl LightPathField {
    /// Creates a field of empty chains. Fails without allocating if the
    /// configuration is invalid, and with a configuration error if the grid
    /// does not fit into memory.
    pub fn new(config: FieldConfig) -> LpfResult<Self> {
        config.validate()?;

        let (rows, cols) = config.grid_shape();
        let cells = rows.checked_mul(cols).ok_or_else(|| {
            LpfError::ConfigError(format!("a {}x{} grid is not addressable", rows, cols))
        })?;

        let mut chains: Vec<RayChain> = Vec::new();
        chains.try_reserve_exact(cells).map_err(|err| {
            LpfError::ConfigError(format!(
                "cannot allocate a {}x{} grid: {}",
                rows, cols, err
            ))
        })?;
        chains.extend((0..cells).map(|_| RayChain::new(config.bounce_budget)));
        debug!(
            "Created {}x{} light path field with a budget of {} interactions per chain",
            rows, cols, config.bounce_budget
        );

        Ok(LightPathField {
            config,
            rows,
            cols,
            chains,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn cell_count(&self) -> usize {
        self.chains.len()
    }

    pub fn bounce_budget(&self) -> usize {
        self.config.bounce_budget
    }

    /// Polar and azimuthal emission angle of a cell, in degrees.
    pub fn cell_angles_deg(&self, row: usize, col: usize) -> LpfResult<(f64, f64)> {
        self.index(row, col)?;
        Ok(self.angles_deg(row, col))
    }

    pub fn get(&self, row: usize, col: usize) -> LpfResult<&RayChain> {
        let idx = self.index(row, col)?;
        Ok(&self.chains[idx])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> LpfResult<&mut RayChain> {
        let idx = self.index(row, col)?;
        Ok(&mut self.chains[idx])
    }

    /// Replaces a cell wholesale with a chain built under the same budget.
    pub fn set(&mut self, row: usize, col: usize, chain: RayChain) -> LpfResult<()> {
        if chain.bounce_budget() != self.config.bounce_budget {
            return Err(LpfError::BudgetMismatch {
                expected: self.config.bounce_budget,
                found: chain.bounce_budget(),
            });
        }

        let idx = self.index(row, col)?;
        self.chains[idx] = chain;
        Ok(())
    }

    /// All chains in row-major order together with their cell.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &RayChain)> {
        let cols = self.cols;
        self.chains
            .iter()
            .enumerate()
            .map(move |(idx, chain)| ((idx / cols, idx % cols), chain))
    }

    /// Seeds every chain with a single emission from the source origin.
    ///
    /// The distribution is sampled once per cell, negative and non-finite
    /// values count as zero and the result is normalized to a total energy of
    /// one. If nothing is emitted at all, every cell gets the same share.
    /// Any previously recorded interactions are discarded.
    pub fn initialize_from_distribution<D>(&mut self, distribution: &D)
    where
        D: SourceDistribution + ?Sized,
    {
        let weights: Vec<f64> = (0..self.chains.len())
            .map(|idx| {
                let (polar_deg, azimuthal_deg) = self.angles_deg(idx / self.cols, idx % self.cols);
                distribution.energy(polar_deg, azimuthal_deg)
            })
            .collect();

        let weights = normalize(weights);
        let origin = self.config.origin();
        let resolution = self.config.angular_resolution_deg;
        let cols = self.cols;

        for (idx, (chain, &energy)) in self.chains.iter_mut().zip(weights.iter()).enumerate() {
            chain.restart(emission(origin, resolution, idx / cols, idx % cols, energy));
        }
    }

    /// Same as [`initialize_from_distribution`](Self::initialize_from_distribution),
    /// with cells evaluated and seeded on the rayon thread pool.
    ///
    /// The total is only formed after every cell has been evaluated, so the
    /// resulting field is identical to the serial version.
    pub fn par_initialize_from_distribution<D>(&mut self, distribution: &D)
    where
        D: SourceDistribution + Sync + ?Sized,
    {
        let cols = self.cols;
        let resolution = self.config.angular_resolution_deg;

        let weights: Vec<f64> = (0..self.chains.len())
            .into_par_iter()
            .map(|idx| {
                let polar_deg = (idx / cols) as f64 * resolution;
                let azimuthal_deg = (idx % cols) as f64 * resolution;
                distribution.energy(polar_deg, azimuthal_deg)
            })
            .collect();

        let weights = normalize(weights);
        let origin = self.config.origin();

        self.chains
            .par_iter_mut()
            .zip(weights.par_iter())
            .enumerate()
            .for_each(|(idx, (chain, &energy))| {
                chain.restart(emission(origin, resolution, idx / cols, idx % cols, energy));
            });
    }

    /// Overwrites the given fields of an already recorded interaction.
    /// Negative energies are stored as zero.
    pub fn update_entry(
        &mut self,
        row: usize,
        col: usize,
        step: usize,
        update: &RayUpdate,
    ) -> LpfResult<()> {
        self.get_mut(row, col)?.update_entry(step, update)
    }

    pub fn append_interaction(&mut self, row: usize, col: usize, state: RayState) -> LpfResult<()> {
        self.get_mut(row, col)?.append(state)
    }

    /// Checks connectivity of every chain, failing on the first violation in
    /// row-major order.
    pub fn validate_all_connectivity(&self) -> LpfResult<()> {
        for (cell, chain) in self.cells() {
            if let Err(err) = chain.check_connectivity() {
                return Err(match err {
                    LpfError::ConnectivityViolation {
                        segment, distance, ..
                    } => LpfError::ConnectivityViolation {
                        cell: Some(cell),
                        segment,
                        distance,
                    },
                    other => other,
                });
            }
        }

        Ok(())
    }

    /// Energy summed over every step of every chain.
    pub fn total_energy(&self) -> f64 {
        self.chains.iter().map(RayChain::total_energy).sum()
    }

    /// Per-cell energy at `step`, zero for chains that have not reached it.
    pub fn energy_map(&self, step: usize) -> Array2<f64> {
        let mut map = Array2::zeros((self.rows, self.cols));
        for ((row, col), chain) in self.cells() {
            if let Some(state) = chain.get(step) {
                map[[row, col]] = state.energy();
            }
        }
        map
    }

    /// Length of the longest chain.
    pub fn max_depth(&self) -> usize {
        self.chains.iter().map(RayChain::len).max().unwrap_or(0)
    }

    /// Picks a cell with probability proportional to its energy at `step`.
    ///
    /// Returns `None` if no chain carries energy at that step.
    pub fn sample_cell<R: Rng + ?Sized>(&self, step: usize, rng: &mut R) -> Option<(usize, usize)> {
        let energy_at = |chain: &RayChain| chain.get(step).map_or(0.0, RayState::energy);

        let total: f64 = self.chains.iter().map(energy_at).sum();
        if !(total > 0.0) {
            return None;
        }

        let threshold = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        let mut picked = None;
        for (idx, chain) in self.chains.iter().enumerate() {
            let energy = energy_at(chain);
            if energy <= 0.0 {
                continue;
            }

            cumulative += energy;
            picked = Some(idx);
            if threshold < cumulative {
                break;
            }
        }

        // Rounding can leave the threshold just past the last sum, the last
        // emitting cell is taken then
        picked.map(|idx| (idx / self.cols, idx % self.cols))
    }

    fn index(&self, row: usize, col: usize) -> LpfResult<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(LpfError::IndexOutOfBounds(OutOfBounds::Cell {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            }));
        }

        Ok(row * self.cols + col)
    }

    fn angles_deg(&self, row: usize, col: usize) -> (f64, f64) {
        let resolution = self.config.angular_resolution_deg;
        (row as f64 * resolution, col as f64 * resolution)
    }
}

/// Clamps raw weights to be non-negative, then scales them to sum to one.
/// Falls back to equal shares if they are all zero.
fn normalize(mut weights: Vec<f64>) -> Vec<f64> {
    let mut non_finite = 0;
    for w in weights.iter_mut() {
        if !w.is_finite() {
            non_finite += 1;
            *w = 0.0;
        } else if *w < 0.0 {
            *w = 0.0;
        }
    }
    if non_finite > 0 {
        warn!(
            "Source distribution returned non-finite energy for {} cells, treating them as dark",
            non_finite
        );
    }

    // Relative to the peak, the sum stays finite for any finite weights
    let peak = weights.iter().cloned().fold(0.0, f64::max);
    if !(peak > 0.0) {
        warn!("Source distribution is degenerate, falling back to uniform emission");
        let share = 1.0 / weights.len() as f64;
        weights.iter_mut().for_each(|w| *w = share);
        return weights;
    }

    weights.iter_mut().for_each(|w| *w /= peak);
    let total: f64 = weights.iter().sum();
    debug!(
        "Source distribution emits a total weight of {} times its peak {}",
        total, peak
    );

    weights.iter_mut().for_each(|w| *w /= total);
    weights
}

fn emission(
    origin: Point3<f64>,
    resolution_deg: f64,
    row: usize,
    col: usize,
    energy: f64,
) -> RayState {
    let direction = Direction::from_degrees(row as f64 * resolution_deg, col as f64 * resolution_deg);
    RayState::new(origin, direction, energy)
}
