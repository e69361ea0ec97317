use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use thiserror::Error;

use eulerfluid::config::{self, Config};
use eulerfluid::error::FluidError;
use eulerfluid::input::{MouseSample, MouseTracker};
use eulerfluid::renderer::{self, RenderConfig};
use eulerfluid::solver::{FluidSolver, ForceInjection, SourceInjection};

const USAGE: &str = "usage: eulerfluid [--config <path>] [--headless <steps>]";

struct Defaults;

impl Defaults {
    /// Fixed timestep for headless runs.
    const HEADLESS_DT: f64 = 0.02;
    /// Headless steps between diagnostic log lines.
    const HEADLESS_LOG_EVERY: usize = 50;
}

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}\n{}", USAGE)]
    Usage(String),

    #[error("window: {0}")]
    Window(#[from] minifb::Error),

    #[error("signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("solver: {0}")]
    Fluid(#[from] FluidError),
}

#[derive(Debug, PartialEq)]
struct Args {
    config: PathBuf,
    headless: Option<usize>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, AppError> {
    let mut parsed = Args { config: PathBuf::from(config::DEFAULT_PATH), headless: None };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or_else(|| AppError::Usage("--config needs a path".into()))?;
                parsed.config = PathBuf::from(path);
            }
            "--headless" => {
                let steps = args
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| AppError::Usage("--headless needs a step count".into()))?;
                parsed.headless = Some(steps);
            }
            other => return Err(AppError::Usage(format!("unknown argument {other:?}"))),
        }
    }
    Ok(parsed)
}

/// Convert RGBA &[u8] buffer to 0RGB &[u32] buffer for minifb.
fn rgba_to_argb(rgba: &[u8], out: &mut [u32]) {
    for (i, pixel) in rgba.chunks_exact(4).enumerate() {
        out[i] = (pixel[0] as u32) << 16 | (pixel[1] as u32) << 8 | pixel[2] as u32;
    }
}

/// Install a Ctrl+C handler that clears the returned flag.
fn install_interrupt() -> Result<Arc<AtomicBool>, AppError> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;
    Ok(running)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = parse_args(std::env::args().skip(1)).and_then(|args| {
        let cfg = config::load(&args.config);
        match args.headless {
            Some(steps) => run_headless(&cfg, steps),
            None => run_gui(&cfg),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Drive the solver without a window: a steady source and a steady push at
/// the centre, diagnostics logged periodically.
fn run_headless(cfg: &Config, steps: usize) -> Result<(), AppError> {
    let running = install_interrupt()?;
    let mut solver = FluidSolver::new(cfg.physics.grid_size, cfg.physics.solver_params())?;
    let mid = cfg.physics.grid_size / 2 + 1;
    let dt = Defaults::HEADLESS_DT.min(cfg.physics.max_dt);
    log::info!("headless: {steps} steps, grid {n}x{n}, dt={dt}", n = cfg.physics.grid_size);

    let started = Instant::now();
    for step in 1..=steps {
        if !running.load(Ordering::SeqCst) {
            log::warn!("interrupted after {} steps", step - 1);
            break;
        }
        solver.queue_source(SourceInjection { x: mid, y: mid, amount: cfg.input.source_amount })?;
        solver.queue_force(ForceInjection { x: mid, y: mid, dx: 0.0, dy: -cfg.input.force_scale })?;
        solver.step(dt)?;

        if step % Defaults::HEADLESS_LOG_EVERY == 0 || step == steps {
            log::info!(
                "step {step}: density={:.4} energy={:.6} divergence={:.3e}",
                solver.total_density(),
                solver.kinetic_energy(),
                solver.mean_abs_divergence()
            );
        }
    }
    log::info!("headless run finished in {:.2?}", started.elapsed());
    Ok(())
}

fn run_gui(cfg: &Config) -> Result<(), AppError> {
    let mut solver = FluidSolver::new(cfg.physics.grid_size, cfg.physics.solver_params())?;
    let mut show_velocity = cfg.display.show_velocity;

    let (mut w, mut h) = (cfg.display.width, cfg.display.height);
    let mut render_cfg = RenderConfig::fit(w, h, solver.size());
    let mut tracker = MouseTracker::new(solver.n(), w, h, &cfg.input);

    let mut window = Window::new(
        "eulerfluid",
        w,
        h,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(cfg.display.target_fps);

    let running = install_interrupt()?;

    let mut framebuf = vec![0u32; w * h];
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut frame_count = 0u32;
    let mut last_fps_time = Instant::now();
    let mut last_frame = Instant::now();

    while window.is_open() && running.load(Ordering::SeqCst) {
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            break;
        }
        if window.is_key_pressed(Key::V, KeyRepeat::No) {
            show_velocity = !show_velocity;
        }
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            solver.reset();
            log::info!("simulation reset");
        }

        let (new_w, new_h) = window.get_size();
        if (new_w, new_h) != (w, h) && new_w > 0 && new_h > 0 {
            w = new_w;
            h = new_h;
            render_cfg = RenderConfig::fit(w, h, solver.size());
            tracker.resize(w, h);
            framebuf = vec![0u32; w * h];
        }

        let now = Instant::now();
        let dt = cfg.physics.frame_dt(now.duration_since(last_frame).as_secs_f64());
        last_frame = now;

        let input = tracker.update(MouseSample {
            position: window.get_mouse_pos(MouseMode::Discard),
            left: window.get_mouse_down(MouseButton::Left),
            right: window.get_mouse_down(MouseButton::Right),
        });
        if let Some(force) = input.force {
            solver.queue_force(force)?;
        }
        if let Some(source) = input.source {
            solver.queue_source(source)?;
        }
        solver.step(dt)?;

        if show_velocity {
            solver.refresh_max_magnitude();
        }
        renderer::render_into(&mut rgba_buf, solver.density(), solver.velocity(), &render_cfg, show_velocity);
        rgba_to_argb(&rgba_buf, &mut framebuf);
        window.update_with_buffer(&framebuf, w, h)?;

        frame_count += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let display_fps = frame_count;
            frame_count = 0;
            last_fps_time = now;
            window.set_title(&format!(
                "eulerfluid - {display_fps} fps - density {:.1}",
                solver.total_density()
            ));
        }
    }

    Ok(())
}
