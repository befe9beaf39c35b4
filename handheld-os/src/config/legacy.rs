//! Flat `config.json` layout
//!
//! Older installs keep a flat object of string settings written by the
//! web setup page. Its keys map onto `shortcut` and the per-app tables.

use handheld_core::config::Config;
use serde::Deserialize;
use serde_json::Value;

/// Keys that only exist in the flat layout
const FLAT_KEYS: [&str; 7] = [
    "owm_api_key",
    "owm_lat",
    "owm_lon",
    "owm_units",
    "ha_url",
    "ha_token",
    "shortcut_app",
];

pub fn is_legacy(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.keys().any(|k| FLAT_KEYS.contains(&k.as_str())))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlatConfig {
    owm_api_key: Option<String>,
    owm_lat: Option<Value>,
    owm_lon: Option<Value>,
    owm_units: Option<String>,
    ha_url: Option<String>,
    ha_token: Option<String>,
    shortcut_app: Option<String>,
}

/// Coordinates were written as numbers or strings
fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl FlatConfig {
    pub fn into_config(self) -> Config {
        let mut config = Config::default();
        if let Some(id) = self.shortcut_app.filter(|id| !id.is_empty()) {
            config.shortcut = Some(id);
        }

        let weather = [
            ("api_key", self.owm_api_key),
            ("lat", self.owm_lat.and_then(scalar)),
            ("lon", self.owm_lon.and_then(scalar)),
            ("units", self.owm_units),
        ];
        for (key, value) in weather {
            if let Some(value) = value {
                config.set_app_setting("weather", key, value);
            }
        }

        let home = [("url", self.ha_url), ("token", self.ha_token)];
        for (key, value) in home {
            if let Some(value) = value {
                config.set_app_setting("home_assistant", key, value);
            }
        }
        config
    }
}
