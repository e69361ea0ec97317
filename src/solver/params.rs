use crate::error::{check_rate, FluidError, Result};

/// Relaxation sweeps per diffusion / pressure solve.
pub const DEFAULT_ITERATIONS: usize = 20;

/// Solver parameters for the fluid simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    /// Kinematic viscosity used by `FluidSolver::step`.
    pub viscosity: f64,
    /// Density diffusion rate used by `FluidSolver::step`.
    pub diffusion: f64,
    /// Gauss-Seidel sweeps for both diffusion and projection.
    pub iterations: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            viscosity: 0.002,
            diffusion: 0.0005,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl SolverParams {
    /// Inviscid, non-diffusive settings: only advection and projection act.
    pub fn inviscid() -> Self {
        Self { viscosity: 0.0, diffusion: 0.0, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        check_rate("viscosity", self.viscosity)?;
        check_rate("diffusion", self.diffusion)?;
        // Zero sweeps would leave pressure at zero and projection a no-op.
        if self.iterations == 0 {
            return Err(FluidError::InvalidParameter { name: "iterations", value: 0.0 });
        }
        Ok(())
    }
}
