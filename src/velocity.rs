use crate::error::{FluidError, Result};

/// Lower bound for the cached display magnitude, so a still field never
/// produces a zero divisor when scaling arrows.
pub const MAGNITUDE_FLOOR: f64 = 1e-6;

/// Two equal-sized component grids, row-major (`y * width + x`).
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityGrid {
    width: usize,
    height: usize,
    pub horizontal: Vec<f64>,
    pub vertical: Vec<f64>,
    /// Cached for rendering only; refreshed by `recalculate_max_magnitude`.
    max_magnitude: f64,
}

impl VelocityGrid {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            horizontal: vec![0.0; width * height],
            vertical: vec![0.0; width * height],
            max_magnitude: MAGNITUDE_FLOOR,
        }
    }

    pub fn from_components(width: usize, height: usize, horizontal: Vec<f64>, vertical: Vec<f64>) -> Result<Self> {
        let expected = width * height;
        for got in [horizontal.len(), vertical.len()] {
            if got != expected {
                return Err(FluidError::DimensionMismatch { expected, got });
            }
        }
        let mut grid = Self { width, height, horizontal, vertical, max_magnitude: MAGNITUDE_FLOOR };
        grid.recalculate_max_magnitude();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    #[inline]
    pub fn magnitude_at(&self, x: usize, y: usize) -> f64 {
        let i = y * self.width + x;
        self.horizontal[i].hypot(self.vertical[i])
    }

    /// Rescan every cell for the largest vector length.
    pub fn recalculate_max_magnitude(&mut self) -> f64 {
        let max = self
            .horizontal
            .iter()
            .zip(&self.vertical)
            .map(|(u, v)| u.hypot(*v))
            .fold(0.0_f64, f64::max);
        self.max_magnitude = max.max(MAGNITUDE_FLOOR);
        self.max_magnitude
    }

    /// Zero both components in place.
    pub fn clear(&mut self) {
        self.horizontal.fill(0.0);
        self.vertical.fill(0.0);
        self.max_magnitude = MAGNITUDE_FLOOR;
    }
}
