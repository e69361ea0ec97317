//! Error types for the solver core and the configuration loader.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FluidError {
    #[error("grid size must be positive")]
    InvalidGridSize,

    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f64),

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("grid dimension mismatch: expected {expected} cells, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("grid shape mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    ShapeMismatch { expected_width: usize, expected_height: usize, width: usize, height: usize },

    #[error("cell ({x}, {y}) is outside the interior of a {size}x{size} grid")]
    CellOutOfRange { x: usize, y: usize, size: usize },
}

pub type Result<T> = std::result::Result<T, FluidError>;

/// Failure to read or parse the YAML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Reject non-positive or non-finite timesteps.
pub(crate) fn check_timestep(dt: f64) -> Result<()> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(FluidError::InvalidTimestep(dt))
    }
}

/// Reject negative or non-finite rates (viscosity, diffusion).
pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(FluidError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_timestep() {
        assert!(check_timestep(0.01).is_ok());
        assert_eq!(check_timestep(0.0), Err(FluidError::InvalidTimestep(0.0)));
        assert_eq!(check_timestep(-1.0), Err(FluidError::InvalidTimestep(-1.0)));
        assert!(check_timestep(f64::NAN).is_err());
        assert!(check_timestep(f64::INFINITY).is_err());
    }

    #[test]
    fn test_check_rate() {
        assert!(check_rate("viscosity", 0.0).is_ok());
        assert!(check_rate("viscosity", 0.5).is_ok());
        assert_eq!(
            check_rate("diffusion", -0.1),
            Err(FluidError::InvalidParameter { name: "diffusion", value: -0.1 })
        );
    }

    #[test]
    fn test_error_messages() {
        let e = FluidError::CellOutOfRange { x: 0, y: 3, size: 6 };
        assert_eq!(e.to_string(), "cell (0, 3) is outside the interior of a 6x6 grid");
        let e = FluidError::DimensionMismatch { expected: 16, got: 9 };
        assert_eq!(e.to_string(), "grid dimension mismatch: expected 16 cells, got 9");
        let e = FluidError::ShapeMismatch { expected_width: 6, expected_height: 6, width: 3, height: 12 };
        assert_eq!(e.to_string(), "grid shape mismatch: expected 6x6, got 3x12");
    }
}
