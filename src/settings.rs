//! Host settings
//!
//! Persisted separately from high scores: `settings.json` in the data
//! directory natively, LocalStorage in the browser.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sim::GameId;

/// Host settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed run seed; None derives one from the clock
    pub seed: Option<u64>,
    /// Where the native host keeps `highscores.json` and `settings.json`
    pub data_dir: PathBuf,
    /// `env_logger` filter for the native host
    pub log_filter: String,
    /// Game the native host runs when none is named on the command line
    pub default_game: GameId,
    /// Ticks the headless host runs before stopping
    pub demo_ticks: u64,
    /// Let the headless host steer with a scripted autopilot
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            data_dir: PathBuf::from(".arcade-night"),
            log_filter: "info".to_string(),
            default_game: GameId::Snake,
            demo_ticks: 600,
            autopilot: true,
        }
    }
}

impl Settings {
    /// File name inside the data directory
    pub const FILE_NAME: &'static str = "settings.json";

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "arcade_night_settings";

    /// Location of the high score store
    pub fn highscore_path(&self) -> PathBuf {
        self.data_dir.join("highscores.json")
    }

    /// Parse settings JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Invalid settings ({}), using defaults", e);
            Self::default()
        })
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from `<dir>/settings.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(dir: &std::path::Path) -> Self {
        let path = dir.join(Self::FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                let mut settings = Self::from_json(&json);
                settings.data_dir = dir.to_path_buf();
                settings
            }
            Err(_) => Self {
                data_dir: dir.to_path_buf(),
                ..Self::default()
            },
        }
    }

    /// Load settings from `<dir>/settings.json`, writing the defaults there
    /// on first run so they can be edited
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_init(dir: &std::path::Path) -> Self {
        let settings = Self::load_from(dir);
        let path = settings.path();
        if !path.exists() {
            match settings.save() {
                Ok(()) => log::info!("Wrote default settings to {}", path.display()),
                Err(e) => log::warn!("Could not write {}: {}", path.display(), e),
            }
        }
        settings
    }

    /// `<data_dir>/settings.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(Self::FILE_NAME)
    }

    /// Write settings to `<data_dir>/settings.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(self.path(), json)
    }
}
