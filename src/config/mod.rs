mod building;
mod settings;

pub use building::{BuildingSettings, Config, StoreBackend, StoreSettings};
pub use settings::{Settings, SettingsUpdate};

use crate::error::{RentError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.rentbook/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "rentbook") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.rentbook/
    let home = dirs_home().ok_or_else(|| {
        RentError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".rentbook"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand a leading `~/`, anchoring other relative paths at the config directory
pub fn resolve_path(path: &str, cfg_dir: &Path) -> PathBuf {
    if let (Some(rest), Some(home)) = (path.strip_prefix("~/"), dirs_home()) {
        return home.join(rest);
    }
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cfg_dir.join(path)
    }
}

/// Load the main config.toml
pub fn load_config(cfg_dir: &Path) -> Result<Config> {
    if !cfg_dir.exists() {
        return Err(RentError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    let path = cfg_dir.join("config.toml");
    if !path.exists() {
        return Err(RentError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| RentError::ConfigParse { path, source: e })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[building]
name = "My Building"
currency_symbol = "₹"

[store]
backend = "json"      # "json" (file in this directory) or "memory" (16 fresh rooms each run)
path = "rooms.json"   # relative to this directory
"#;
