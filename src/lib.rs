//! Interactive 2-D stable-fluids simulation.
//!
//! The solver core ([`solver::FluidSolver`]) keeps density and velocity in
//! [`generational`] buffers so every kernel reads the previous generation and
//! writes the current one. The remaining modules make up the desktop viewer.

pub mod config;
pub mod error;
pub mod generational;
pub mod input;
pub mod renderer;
pub mod solver;
pub mod velocity;
