use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::solver::SolverParams;

pub const DEFAULT_PATH: &str = "eulerfluid.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub input: InputConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Interior cells per side.
    pub grid_size: usize,
    pub viscosity: f64,
    pub diffusion: f64,
    pub iterations: usize,
    /// Upper clamp on the wall-clock frame timestep.
    pub max_dt: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Force per cell of mouse drag.
    pub force_scale: f64,
    /// Density added per unit time while the source button is held.
    pub source_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
    pub show_velocity: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            input: InputConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let params = SolverParams::default();
        Self {
            grid_size: 60,
            viscosity: params.viscosity,
            diffusion: params.diffusion,
            iterations: params.iterations,
            max_dt: 0.05,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            force_scale: 500.0,
            source_amount: 100.0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            target_fps: 60,
            show_velocity: true,
        }
    }
}

impl PhysicsConfig {
    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            viscosity: self.viscosity,
            diffusion: self.diffusion,
            iterations: self.iterations,
        }
    }

    /// Clamp a measured frame time into `(0, max_dt]`.
    pub fn frame_dt(&self, elapsed: f64) -> f64 {
        if elapsed.is_finite() && elapsed > 0.0 {
            elapsed.min(self.max_dt)
        } else {
            self.max_dt
        }
    }
}

impl Config {
    /// Reject values the viewer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason: reason.to_string() })
        };
        let p = &self.physics;
        if p.grid_size == 0 {
            return invalid("physics.grid_size", "must be positive");
        }
        if !(p.max_dt > 0.0 && p.max_dt.is_finite()) {
            return invalid("physics.max_dt", "must be positive and finite");
        }
        if p.iterations == 0 {
            return invalid("physics.iterations", "must be positive");
        }
        for (field, rate) in [("physics.viscosity", p.viscosity), ("physics.diffusion", p.diffusion)] {
            if !(rate >= 0.0 && rate.is_finite()) {
                return invalid(field, "must be non-negative and finite");
            }
        }
        Ok(())
    }
}

/// Parse and validate a config file, failing on any problem.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&contents)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists, falling back to defaults on any problem.
pub fn load(path: &Path) -> Config {
    if !path.exists() {
        log::info!("no config at {}, using defaults", path.display());
        return Config::default();
    }
    match load_from(path) {
        Ok(cfg) => {
            log::info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            log::warn!("{}: {e}; using defaults", path.display());
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.physics.grid_size, 60);
        assert_eq!(cfg.physics.viscosity, 0.002);
        assert_eq!(cfg.physics.diffusion, 0.0005);
        assert_eq!(cfg.physics.iterations, 20);
        assert_eq!(cfg.physics.max_dt, 0.05);
        assert_eq!(cfg.input.force_scale, 500.0);
        assert_eq!(cfg.input.source_amount, 100.0);
        assert_eq!(cfg.display.width, 1000);
        assert_eq!(cfg.display.height, 1000);
        assert_eq!(cfg.display.target_fps, 60);
        assert!(cfg.display.show_velocity);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "physics:\n  viscosity: 0.01\ndisplay:\n  show_velocity: false\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.physics.viscosity, 0.01);
        assert_eq!(cfg.physics.diffusion, 0.0005); // default
        assert!(!cfg.display.show_velocity);
        assert_eq!(cfg.display.width, 1000); // default
        assert_eq!(cfg.input.force_scale, 500.0); // default
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
physics:
  grid_size: 128
  viscosity: 0.0
  diffusion: 0.001
  iterations: 30
  max_dt: 0.02
input:
  force_scale: 250.0
  source_amount: 40.0
display:
  width: 800
  height: 600
  target_fps: 30
  show_velocity: false
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.physics.grid_size, 128);
        assert_eq!(cfg.physics.viscosity, 0.0);
        assert_eq!(cfg.physics.diffusion, 0.001);
        assert_eq!(cfg.physics.iterations, 30);
        assert_eq!(cfg.physics.max_dt, 0.02);
        assert_eq!(cfg.input.force_scale, 250.0);
        assert_eq!(cfg.input.source_amount, 40.0);
        assert_eq!(cfg.display.width, 800);
        assert_eq!(cfg.display.height, 600);
        assert_eq!(cfg.display.target_fps, 30);
        assert!(!cfg.display.show_velocity);
    }

    #[test]
    fn test_solver_params_from_physics() {
        let cfg: Config = serde_yaml::from_str("physics:\n  iterations: 7\n").unwrap();
        let params = cfg.physics.solver_params();
        assert_eq!(params.iterations, 7);
        assert_eq!(params, SolverParams { iterations: 7, ..SolverParams::default() });
    }

    #[test]
    fn test_frame_dt_clamped() {
        let physics = PhysicsConfig::default();
        assert_eq!(physics.frame_dt(0.01), 0.01);
        assert_eq!(physics.frame_dt(0.5), 0.05);
        assert_eq!(physics.frame_dt(0.0), 0.05);
        assert_eq!(physics.frame_dt(f64::NAN), 0.05);
    }

    #[test]
    fn test_load_missing_file() {
        let cfg = load(Path::new("definitely-not-here/eulerfluid.yaml"));
        assert_eq!(cfg.physics.grid_size, 60);
        assert!(matches!(
            load_from(Path::new("definitely-not-here/eulerfluid.yaml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_physics() {
        for yaml in [
            "physics:\n  max_dt: 0.0\n",
            "physics:\n  max_dt: -0.1\n",
            "physics:\n  grid_size: 0\n",
            "physics:\n  iterations: 0\n",
            "physics:\n  viscosity: -1.0\n",
        ] {
            let cfg: Config = serde_yaml::from_str(yaml).unwrap();
            assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { .. })), "accepted {yaml:?}");
        }
    }

    #[test]
    fn test_load_invalid_values_falls_back() {
        let path = std::env::temp_dir().join(format!("eulerfluid-zero-dt-{}.yaml", std::process::id()));
        std::fs::write(&path, "physics:\n  max_dt: 0.0\n  grid_size: 32\n").unwrap();
        assert!(matches!(
            load_from(&path),
            Err(ConfigError::Invalid { field: "physics.max_dt", .. })
        ));
        let cfg = load(&path);
        assert_eq!(cfg.physics.max_dt, 0.05);
        assert_eq!(cfg.physics.grid_size, 60);
        assert!(cfg.physics.frame_dt(0.0) > 0.0);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_unparsable_file_falls_back() {
        let path = std::env::temp_dir().join(format!("eulerfluid-bad-{}.yaml", std::process::id()));
        std::fs::write(&path, "physics: [not, a, map").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse(_))));
        let cfg = load(&path);
        assert_eq!(cfg.physics.grid_size, 60);
        std::fs::remove_file(&path).unwrap();
    }
}
