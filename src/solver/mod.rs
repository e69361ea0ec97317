//! Stable-fluids solver on a square grid with one ring of ghost cells.
//!
//! Density and velocity each live in a depth-1 generational buffer: every
//! kernel runs right after a cycle, reading generation 1 and writing
//! generation 0.

mod boundary;
mod core;
pub mod diagnostics;
mod params;

// Re-export public API
pub use boundary::{set_bnd, BoundaryKind};
pub use params::{SolverParams, DEFAULT_ITERATIONS};

use self::core::{advect, diffuse, project};
use crate::error::{check_rate, check_timestep, FluidError, Result};
use crate::generational::{GenerationalArray, GenerationalObject};
use crate::velocity::VelocityGrid;

/// Row-major index into a grid `size` cells wide.
#[inline(always)]
pub const fn idx(x: usize, y: usize, size: usize) -> usize {
    y * size + x
}

/// Momentum added at one interior cell, per unit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceInjection {
    pub x: usize,
    pub y: usize,
    pub dx: f64,
    pub dy: f64,
}

/// Density added at one interior cell, per unit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceInjection {
    pub x: usize,
    pub y: usize,
    pub amount: f64,
}

pub struct FluidSolver {
    /// Interior cells per side.
    n: usize,
    /// Stored cells per side (`n + 2`).
    size: usize,
    params: SolverParams,
    density: GenerationalArray<f64, 1>,
    velocity: GenerationalObject<VelocityGrid, 1>,
    /// Pressure scratch for projection.
    pressure: Vec<f64>,
    /// Divergence scratch for projection.
    divergence: Vec<f64>,
    pending_force: Option<ForceInjection>,
    pending_source: Option<SourceInjection>,
}

impl FluidSolver {
    /// Solver with `n x n` interior cells, everything at rest.
    pub fn new(n: usize, params: SolverParams) -> Result<Self> {
        let size = Self::checked_size(n, &params)?;
        Self::with_velocity(n, params, VelocityGrid::zeros(size, size))
    }

    /// Solver starting from an explicit velocity field of `(n + 2)^2` cells.
    pub fn with_velocity(n: usize, params: SolverParams, initial: VelocityGrid) -> Result<Self> {
        let size = Self::checked_size(n, &params)?;
        if initial.width() != size || initial.height() != size {
            return Err(FluidError::ShapeMismatch {
                expected_width: size,
                expected_height: size,
                width: initial.width(),
                height: initial.height(),
            });
        }
        log::debug!(
            "fluid solver: {n}x{n} interior, visc={} diff={} iter={}",
            params.viscosity,
            params.diffusion,
            params.iterations
        );
        Ok(Self {
            n,
            size,
            params,
            density: GenerationalArray::<f64, 1>::filled(vec![0.0; size * size]),
            velocity: GenerationalObject::<VelocityGrid, 1>::filled(initial),
            pressure: vec![0.0; size * size],
            divergence: vec![0.0; size * size],
            pending_force: None,
            pending_source: None,
        })
    }

    fn checked_size(n: usize, params: &SolverParams) -> Result<usize> {
        if n == 0 {
            return Err(FluidError::InvalidGridSize);
        }
        params.validate()?;
        Ok(n + 2)
    }

    /// Interior cells per side.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Stored cells per side, ghost ring included.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SolverParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Current density generation, `size x size`, row-major.
    pub fn density(&self) -> &[f64] {
        self.density.current()
    }

    /// Current velocity generation.
    pub fn velocity(&self) -> &VelocityGrid {
        self.velocity.current()
    }

    /// Rescan the current velocity for the overlay's scale factor.
    pub fn refresh_max_magnitude(&mut self) -> f64 {
        self.velocity.current_mut().recalculate_max_magnitude()
    }

    pub fn density_at(&self, x: usize, y: usize) -> f64 {
        self.density.current()[idx(x, y, self.size)]
    }

    /// Sum of density over interior cells.
    pub fn total_density(&self) -> f64 {
        diagnostics::total(self.density.current(), self.n)
    }

    pub fn kinetic_energy(&self) -> f64 {
        let v = self.velocity.current();
        diagnostics::kinetic_energy(&v.horizontal, &v.vertical, self.n)
    }

    pub fn mean_abs_divergence(&self) -> f64 {
        let v = self.velocity.current();
        diagnostics::mean_abs_divergence(&v.horizontal, &v.vertical, self.n)
    }

    fn check_cell(&self, x: usize, y: usize) -> Result<()> {
        if (1..=self.n).contains(&x) && (1..=self.n).contains(&y) {
            Ok(())
        } else {
            Err(FluidError::CellOutOfRange { x, y, size: self.size })
        }
    }

    /// Hold a force for the next `velocity_step`, replacing any earlier one.
    pub fn queue_force(&mut self, force: ForceInjection) -> Result<()> {
        self.check_cell(force.x, force.y)?;
        self.pending_force = Some(force);
        Ok(())
    }

    /// Hold a source for the next `density_step`, replacing any earlier one.
    pub fn queue_source(&mut self, source: SourceInjection) -> Result<()> {
        self.check_cell(source.x, source.y)?;
        self.pending_source = Some(source);
        Ok(())
    }

    /// Add `dt * (dx, dy)` to the current velocity at the force's cell.
    pub fn add_flow(&mut self, force: ForceInjection, dt: f64) -> Result<()> {
        self.check_cell(force.x, force.y)?;
        let i = idx(force.x, force.y, self.size);
        let v = self.velocity.current_mut();
        v.horizontal[i] += dt * force.dx;
        v.vertical[i] += dt * force.dy;
        Ok(())
    }

    /// Add `dt * amount` to the current density at the source's cell.
    /// The cell never goes below zero, whatever the sign of `amount`.
    pub fn add_source(&mut self, source: SourceInjection, dt: f64) -> Result<()> {
        self.check_cell(source.x, source.y)?;
        let cell = &mut self.density.current_mut()[idx(source.x, source.y, self.size)];
        *cell = (*cell + dt * source.amount).max(0.0);
        Ok(())
    }

    /// One tick with the stored viscosity and diffusion rates.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        let SolverParams { viscosity, diffusion, .. } = self.params;
        self.velocity_step(viscosity, dt)?;
        self.density_step(diffusion, dt)
    }

    /// Velocity half of a tick: force, diffuse, project, advect, project.
    pub fn velocity_step(&mut self, viscosity: f64, dt: f64) -> Result<()> {
        check_timestep(dt)?;
        check_rate("viscosity", viscosity)?;

        if let Some(force) = self.pending_force.take() {
            self.add_flow(force, dt)?;
        }

        let n = self.n;
        let iter = self.params.iterations;

        self.velocity.evolve(|v| {
            let (cur, prev) = v.split_current();
            diffuse(BoundaryKind::InvertHorizontal, &mut cur.horizontal, &prev.horizontal, viscosity, dt, iter, n);
            diffuse(BoundaryKind::InvertVertical, &mut cur.vertical, &prev.vertical, viscosity, dt, iter, n);
        });
        self.project();

        self.velocity.evolve(|v| {
            let (cur, prev) = v.split_current();
            advect(BoundaryKind::InvertHorizontal, &mut cur.horizontal, &prev.horizontal, &prev.horizontal, &prev.vertical, dt, n);
            advect(BoundaryKind::InvertVertical, &mut cur.vertical, &prev.vertical, &prev.horizontal, &prev.vertical, dt, n);
        });
        self.project();
        Ok(())
    }

    /// Density half of a tick: source, diffuse, advect along the current velocity.
    pub fn density_step(&mut self, diffusion: f64, dt: f64) -> Result<()> {
        check_timestep(dt)?;
        check_rate("diffusion", diffusion)?;

        if let Some(source) = self.pending_source.take() {
            self.add_source(source, dt)?;
        }

        let n = self.n;
        let iter = self.params.iterations;

        self.density.evolve(|d| {
            let (cur, prev) = d.split_current();
            diffuse(BoundaryKind::Continuous, cur, prev, diffusion, dt, iter, n);
        });

        let velocity = self.velocity.current();
        self.density.evolve(|d| {
            let (cur, prev) = d.split_current();
            advect(BoundaryKind::Continuous, cur, prev, &velocity.horizontal, &velocity.vertical, dt, n);
        });
        Ok(())
    }

    /// Make the current velocity approximately divergence-free.
    pub fn project(&mut self) {
        let v = self.velocity.current_mut();
        project(
            &mut v.horizontal,
            &mut v.vertical,
            &mut self.pressure,
            &mut self.divergence,
            self.params.iterations,
            self.n,
        );
    }

    /// Zero every generation and drop pending injections.
    pub fn reset(&mut self) {
        for generation in 0..=self.density.depth() {
            self.density.at_mut(generation).fill(0.0);
        }
        for generation in 0..=self.velocity.depth() {
            self.velocity.at_mut(generation).clear();
        }
        self.pressure.fill(0.0);
        self.divergence.fill(0.0);
        self.pending_force = None;
        self.pending_source = None;
    }
}
