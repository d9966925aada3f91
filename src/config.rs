//! Game configuration
//!
//! Sources, lowest priority first:
//! 1. `<dir>/default.toml`
//! 2. `<dir>/user.toml`
//! 3. Environment variables (`SQUARES_SECTION__KEY`)
//!
//! Every key has a default, so a missing directory loads the built-in values.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_PREFIX: &str = "SQUARES_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
    #[error("surface {width}x{height} cannot fit squares of size {size} (needs at least twice the size per side)")]
    SurfaceTooSmall { width: u32, height: u32, size: f32 },
    #[error("square size must be positive and finite, got {0}")]
    BadSize(f32),
    #[error("drift must be non-negative and finite, got {0}")]
    BadDrift(f32),
    #[error("movement bounds must be finite and ordered: x {min_x}..{max_x}, y {min_y}..{max_y}")]
    BadBounds {
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    },
    #[error("tick period must be non-zero")]
    ZeroTick,
    #[error("round length must be non-zero")]
    ZeroRound,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub surface: Surface,
    pub game: GameConfig,
    pub squares: SquareConfig,
    pub hud: HudConfig,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width
    pub width: u32,
    /// Logical height
    pub height: u32,
}

/// Framebuffer the squares live on, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Ticks per round; one tick takes one second off the clock.
    pub round_seconds: u32,
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SquareConfig {
    /// Side length
    pub size: f32,
    /// Maximum per-axis offset applied on each drift
    pub drift: f32,
    /// Rectangle that drifting squares are clamped into
    pub movement: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Finished rounds kept in the scrollback
    pub history: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "squares".to_string(),
            width: 400,
            height: 600,
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: 400,
            height: 600,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: 30,
            tick_ms: 500,
        }
    }
}

impl Default for SquareConfig {
    fn default() -> Self {
        Self {
            size: 50.0,
            drift: 10.0,
            movement: Bounds::default(),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: 50.0,
            max_x: 350.0,
            min_y: 100.0,
            max_y: 500.0,
        }
    }
}

impl Default for HudConfig {
    fn default() -> Self {
        Self { history: 16 }
    }
}

impl Config {
    /// Load and validate configuration from `config_dir`.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // SQUARES_GAME__ROUND_SECONDS=10 -> game.round_seconds = 10
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.squares.validate()?;
        self.surface.check_fits(self.squares.size)?;

        if self.game.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.game.round_seconds == 0 {
            return Err(ConfigError::ZeroRound);
        }

        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.game.tick_ms)
    }
}

impl SquareConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size(self.size)?;
        check_drift(self.drift)?;
        self.movement.check()
    }
}

pub fn check_size(size: f32) -> Result<(), ConfigError> {
    if !(size.is_finite() && size > 0.0) {
        return Err(ConfigError::BadSize(size));
    }
    Ok(())
}

/// Drift offsets are sampled from `[-drift, drift]`, whose width must stay finite.
pub fn check_drift(drift: f32) -> Result<(), ConfigError> {
    if !(drift >= 0.0 && (2.0 * drift).is_finite()) {
        return Err(ConfigError::BadDrift(drift));
    }
    Ok(())
}

impl Surface {
    /// Spawn positions are drawn from `[size, dim - size]`, which is empty
    /// unless each side is at least `2 * size`.
    pub fn check_fits(&self, size: f32) -> Result<(), ConfigError> {
        if (self.width as f32) < 2.0 * size || (self.height as f32) < 2.0 * size {
            return Err(ConfigError::SurfaceTooSmall {
                width: self.width,
                height: self.height,
                size,
            });
        }
        Ok(())
    }
}

impl Bounds {
    pub fn check(&self) -> Result<(), ConfigError> {
        let finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !(finite && self.min_x <= self.max_x && self.min_y <= self.max_y) {
            return Err(ConfigError::BadBounds {
                min_x: self.min_x,
                max_x: self.max_x,
                min_y: self.min_y,
                max_y: self.max_y,
            });
        }
        Ok(())
    }

    pub fn clamp_x(&self, x: f32) -> f32 {
        x.max(self.min_x).min(self.max_x)
    }

    pub fn clamp_y(&self, y: f32) -> f32 {
        y.max(self.min_y).min(self.max_y)
    }
}
