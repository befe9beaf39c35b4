//! Built-in app catalog

use handheld_core::nav::{AppDescriptor, AppRegistry, Category, RegistryError};

use crate::home_assistant::SmartHome;
use crate::measure::Measure;
use crate::settings::Settings;
use crate::snake::Snake;
use crate::torch::Torch;
use crate::weather::Weather;

/// Registry holding every built-in screen
pub fn registry() -> Result<AppRegistry, RegistryError> {
    let mut registry = AppRegistry::new();
    registry.register(AppDescriptor::new("snake", "Snake", Category::Games, Snake::launch))?;
    registry.register(AppDescriptor::new("torch", "Torch", Category::Tools, Torch::launch))?;
    registry.register(AppDescriptor::new("measure", "Measure", Category::Tools, Measure::launch))?;
    registry.register(AppDescriptor::new("weather", "Weather", Category::Apps, Weather::launch))?;
    registry.register(AppDescriptor::new("home_assistant", "Smart Home", Category::Apps, SmartHome::launch))?;
    registry.register(AppDescriptor::new("settings", "Settings", Category::Settings, Settings::launch))?;
    Ok(registry)
}
