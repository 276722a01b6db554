use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub building: BuildingSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BuildingSettings {
    pub name: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Json,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Document path for the json backend, relative to the config directory
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String {
    "rooms.json".to_string()
}
