//! Mouse state to solver injections.

use crate::config::InputConfig;
use crate::solver::{ForceInjection, SourceInjection};

/// Raw pointer state sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseSample {
    /// Cursor position in window pixels, `None` when outside the window.
    pub position: Option<(f32, f32)>,
    pub left: bool,
    pub right: bool,
}

/// Injections produced by one frame of input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub force: Option<ForceInjection>,
    pub source: Option<SourceInjection>,
}

/// Maps window pixels onto solver cells and tracks the drag between frames.
///
/// The whole stored grid, ghost ring included, is stretched over the window,
/// so pixel column `px` lands in stored column `px * size / width`.
#[derive(Debug, Clone)]
pub struct MouseTracker {
    n: usize,
    width: usize,
    height: usize,
    force_scale: f64,
    source_amount: f64,
    last_cell: Option<(usize, usize)>,
}

impl MouseTracker {
    pub fn new(n: usize, width: usize, height: usize, input: &InputConfig) -> Self {
        Self {
            n,
            width,
            height,
            force_scale: input.force_scale,
            source_amount: input.source_amount,
            last_cell: None,
        }
    }

    /// Track a new window size; the drag origin is kept.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Stored-grid cell under a window pixel, ghost cells included.
    pub fn cell_at(&self, px: f32, py: f32) -> Option<(usize, usize)> {
        if self.width == 0 || self.height == 0 || px < 0.0 || py < 0.0 {
            return None;
        }
        let size = self.n + 2;
        let x = (px as f64 * size as f64 / self.width as f64) as usize;
        let y = (py as f64 * size as f64 / self.height as f64) as usize;
        (x < size && y < size).then_some((x, y))
    }

    fn is_interior(&self, (x, y): (usize, usize)) -> bool {
        (1..=self.n).contains(&x) && (1..=self.n).contains(&y)
    }

    /// Turn one frame of mouse state into injections.
    ///
    /// Left button: density at the cursor cell. Right button: force at the
    /// previous cursor cell, proportional to how many cells the cursor moved.
    pub fn update(&mut self, sample: MouseSample) -> FrameInput {
        let cell = sample.position.and_then(|(px, py)| self.cell_at(px, py));
        let mut frame = FrameInput::default();

        if sample.left {
            if let Some(c) = cell.filter(|&c| self.is_interior(c)) {
                frame.source = Some(SourceInjection { x: c.0, y: c.1, amount: self.source_amount });
            }
        }

        if sample.right {
            if let (Some(from), Some(to)) = (self.last_cell, cell) {
                if self.is_interior(from) && from != to {
                    frame.force = Some(ForceInjection {
                        x: from.0,
                        y: from.1,
                        dx: (to.0 as f64 - from.0 as f64) * self.force_scale,
                        dy: (to.1 as f64 - from.1 as f64) * self.force_scale,
                    });
                }
            }
        }

        self.last_cell = cell;
        frame
    }
}
