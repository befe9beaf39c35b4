//! Configuration loading
//!
//! Lookup order when no file is named on the command line:
//!
//! 1. `handheld.toml` in the working directory
//! 2. `config.json` (either the full structure or the older flat layout)
//! 3. Built-in defaults
//!
//! A file that exists but does not parse is an error; only a missing file
//! falls through to the next candidate. The result is always validated.

mod legacy;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use handheld_core::config::Config;

pub const TOML_FILE: &str = "handheld.toml";
pub const JSON_FILE: &str = "config.json";

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Defaults,
}

/// Load and validate the configuration
pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Config, Source)> {
    let (config, source) = match explicit {
        Some(path) => (read(path)?, Source::File(path.to_path_buf())),
        None => discover(Path::new("."))?,
    };
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration ({:?}): {}", source, e))?;
    Ok((config, source))
}

/// Try the default file names in `dir`
fn discover(dir: &Path) -> anyhow::Result<(Config, Source)> {
    for name in [TOML_FILE, JSON_FILE] {
        let path = dir.join(name);
        if path.is_file() {
            return Ok((read(&path)?, Source::File(path)));
        }
    }
    tracing::warn!("no {} or {} found, using defaults", TOML_FILE, JSON_FILE);
    Ok((Config::default(), Source::Defaults))
}

/// Read one file; the extension picks the format
fn read(path: &Path) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json(&text).with_context(|| format!("parsing {}", path.display()))
    } else {
        parse_toml(&text).with_context(|| format!("parsing {}", path.display()))
    }
}

pub fn parse_toml(text: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(text)?)
}

/// Parse JSON in either layout
pub fn parse_json(text: &str) -> anyhow::Result<Config> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if legacy::is_legacy(&value) {
        tracing::info!("flat config.json layout detected");
        let flat: legacy::FlatConfig = serde_json::from_value(value)?;
        Ok(flat.into_config())
    } else {
        Ok(serde_json::from_value(value)?)
    }
}
