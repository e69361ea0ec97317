use crate::solver::idx;
use crate::velocity::VelocityGrid;

/// Overlay color for velocity lines and cell markers.
const ARROW_COLOR: [f64; 3] = [200.0, 20.0, 20.0];
/// Overlay opacity (60 / 255).
const ARROW_ALPHA: f64 = 60.0 / 255.0;
/// Line length in cells for the fastest vector on screen.
const ARROW_SCALE: f64 = 2.5;

/// Pixel layout of the stored grid on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub frame_width: usize,
    pub frame_height: usize,
    /// Stored cells per side, ghost ring included.
    pub grid_size: usize,
}

impl RenderConfig {
    /// Stretch a `grid_size` square grid over the given pixel area.
    pub fn fit(pixel_width: usize, pixel_height: usize, grid_size: usize) -> Self {
        Self {
            frame_width: pixel_width.max(1),
            frame_height: pixel_height.max(1),
            grid_size: grid_size.max(1),
        }
    }

    /// Display pixels per cell, horizontally.
    pub fn cell_width(&self) -> f64 {
        self.frame_width as f64 / self.grid_size as f64
    }

    /// Display pixels per cell, vertically.
    pub fn cell_height(&self) -> f64 {
        self.frame_height as f64 / self.grid_size as f64
    }
}

/// Density to gray level: saturates at 1.
#[inline]
pub fn density_to_gray(d: f64) -> u8 {
    (d.clamp(0.0, 1.0) * 255.0) as u8
}

// Source-over blend: dst = dst * (1 - alpha) + src * alpha
#[inline]
fn alpha_blend(buf: &mut [u8], off: usize, color: [f64; 3], alpha: f64) {
    for (c, src) in color.iter().enumerate() {
        let dst = buf[off + c] as f64;
        buf[off + c] = (dst + (src - dst) * alpha).round().clamp(0.0, 255.0) as u8;
    }
}

/// Bresenham line drawing with alpha-blended color, clipped to the frame.
fn draw_line_blended(
    buf: &mut [u8], cfg: &RenderConfig,
    x0: isize, y0: isize, x1: isize, y1: isize,
    color: [f64; 3], alpha: f64,
) {
    let (fw, fh) = (cfg.frame_width as isize, cfg.frame_height as isize);
    let mut cx = x0;
    let mut cy = y0;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: isize = if x0 < x1 { 1 } else { -1 };
    let sy: isize = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if cx >= 0 && cx < fw && cy >= 0 && cy < fh {
            let off = (cy as usize * cfg.frame_width + cx as usize) * 4;
            alpha_blend(buf, off, color, alpha);
        }
        if cx == x1 && cy == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; cx += sx; }
        if e2 <= dx { err += dx; cy += sy; }
    }
}

fn fill_rect_blended(buf: &mut [u8], cfg: &RenderConfig, x: f64, y: f64, w: f64, h: f64, color: [f64; 3], alpha: f64) {
    let x0 = x.max(0.0) as usize;
    let y0 = y.max(0.0) as usize;
    let x1 = ((x + w).ceil().max(0.0) as usize).min(cfg.frame_width);
    let y1 = ((y + h).ceil().max(0.0) as usize).min(cfg.frame_height);
    for py in y0..y1 {
        for px in x0..x1 {
            alpha_blend(buf, (py * cfg.frame_width + px) * 4, color, alpha);
        }
    }
}

/// One marker and one line per cell, line length scaled so the fastest
/// vector spans `ARROW_SCALE` cells.
fn draw_velocity(buf: &mut [u8], velocity: &VelocityGrid, cfg: &RenderConfig) {
    let cw = cfg.cell_width();
    let ch = cfg.cell_height();
    let max = velocity.max_magnitude();

    for y in 0..velocity.height() {
        for x in 0..velocity.width() {
            let i = y * velocity.width() + x;
            fill_rect_blended(
                buf, cfg,
                cw * (x as f64 + 0.4), ch * (y as f64 + 0.4), cw / 5.0, ch / 5.0,
                ARROW_COLOR, ARROW_ALPHA,
            );

            let sx = cw * (x as f64 + 0.5);
            let sy = ch * (y as f64 + 0.5);
            let ex = sx + velocity.horizontal[i] / max * cw * ARROW_SCALE;
            let ey = sy + velocity.vertical[i] / max * ch * ARROW_SCALE;
            draw_line_blended(
                buf, cfg,
                sx as isize, sy as isize, ex.round() as isize, ey.round() as isize,
                ARROW_COLOR, ARROW_ALPHA,
            );
        }
    }
}

/// Render density (and optionally the velocity overlay) into a pre-allocated
/// RGBA buffer. The buffer is resized as needed.
///
/// Rows are drawn top to bottom in grid order; no y flip.
pub fn render_into(buf: &mut Vec<u8>, density: &[f64], velocity: &VelocityGrid, cfg: &RenderConfig, show_velocity: bool) {
    let fw = cfg.frame_width;
    let fh = cfg.frame_height;
    let size = cfg.grid_size;
    buf.resize(fw * fh * 4, 0);

    for py in 0..fh {
        let gy = (py * size / fh).min(size - 1);
        for px in 0..fw {
            let gx = (px * size / fw).min(size - 1);
            let gray = density_to_gray(density[idx(gx, gy, size)]);
            let off = (py * fw + px) * 4;
            buf[off] = gray;
            buf[off + 1] = gray;
            buf[off + 2] = gray;
            buf[off + 3] = 255;
        }
    }

    if show_velocity {
        draw_velocity(buf, velocity, cfg);
    }
}

pub fn render(density: &[f64], velocity: &VelocityGrid, cfg: &RenderConfig, show_velocity: bool) -> Vec<u8> {
    let mut buf = Vec::new();
    render_into(&mut buf, density, velocity, cfg, show_velocity);
    buf
}
