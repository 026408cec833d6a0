//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use super::surface::KeyCode;

/// Window configuration, passed through to the embedder's windowing layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial window geometry as "WIDTHxHEIGHT", e.g. "500x500"
    pub geometry: String,
    /// Requested OpenGL version, e.g. "3.2"
    pub api_version: String,
}

impl WindowConfig {
    /// Parses the "WIDTHxHEIGHT" geometry string. Both dimensions must be
    /// positive integers.
    pub fn parse_geometry(&self) -> Option<(u32, u32)> {
        let (w, h) = self.geometry.split_once('x')?;
        let width: u32 = w.trim().parse().ok()?;
        let height: u32 = h.trim().parse().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some((width, height))
    }
}

/// Render-loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Target tick rate in Hz
    pub tick_rate_hz: u32,
    /// Key that ends the loop
    pub quit_key: KeyCode,
    /// Name of the scene to run (see `scene::catalog`)
    pub scene: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Window configuration
    pub window: WindowConfig,
    /// Render-loop configuration
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Profiles are loaded from config files in the following order:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix APP_ (e.g., APP_WINDOW__TITLE=x)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let config_dir = Self::find_config_dir();

        let mut builder = Config::builder();

        if let Some(ref dir) = config_dir {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            builder =
                builder.add_source(File::with_name(&format!("config/{}", profile)).required(false));
        }

        // Environment variables with APP_ prefix; __ separates nested
        // fields (e.g., APP_RUNTIME__TICK_RATE_HZ=120).
        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.set_override("profile", profile)?.build()?;

        config.try_deserialize()
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<std::path::PathBuf> {
        // Try to find config dir relative to executable
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        // Fall back to current directory
        let cwd_config = std::path::PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self {
            profile: "release".to_string(),
            window: WindowConfig {
                title: "Prism".to_string(),
                geometry: "500x500".to_string(),
                api_version: "3.2".to_string(),
            },
            runtime: RuntimeConfig {
                tick_rate_hz: 60,
                quit_key: KeyCode::Escape,
                scene: "orbiting-prisms".to_string(),
            },
        })
    }
}
