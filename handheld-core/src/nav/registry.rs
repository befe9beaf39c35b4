//! App registry
//!
//! Every launchable screen is described once at startup by an
//! [`AppDescriptor`]: id, display name, menu category and a factory. The
//! registry is read-only after that.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::screen::{Screen, ScreenFault};
use crate::config::Config;

/// Root menu categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    Games,
    Tools,
    Apps,
    Settings,
}

impl Category {
    /// Root menu order
    pub const ALL: [Category; 4] = [
        Category::Games,
        Category::Tools,
        Category::Apps,
        Category::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Games => "Games",
            Category::Tools => "Tools",
            Category::Apps => "Apps",
            Category::Settings => "Settings",
        }
    }
}

/// What a factory gets to build a screen from
pub struct LaunchContext<'a> {
    pub config: &'a Config,
    /// Runtime clock at launch
    pub now_ms: u64,
}

/// Builds a fresh screen instance
pub type ScreenFactory = Box<dyn Fn(&LaunchContext<'_>) -> Result<Box<dyn Screen>, ScreenFault>>;

/// Static metadata for one launchable screen
pub struct AppDescriptor {
    pub id: String,
    pub name: String,
    pub category: Category,
    factory: ScreenFactory,
}

impl core::fmt::Debug for AppDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

impl AppDescriptor {
    pub fn new<F>(id: &str, name: &str, category: Category, factory: F) -> Self
    where
        F: Fn(&LaunchContext<'_>) -> Result<Box<dyn Screen>, ScreenFault> + 'static,
    {
        Self {
            id: String::from(id),
            name: String::from(name),
            category,
            factory: Box::new(factory),
        }
    }

    /// Build a new instance of this screen
    pub fn launch(&self, ctx: &LaunchContext<'_>) -> Result<Box<dyn Screen>, ScreenFault> {
        (self.factory)(ctx)
    }
}

/// Registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// An app with this id is already registered
    DuplicateId,
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistryError::DuplicateId => f.write_str("duplicate app id"),
        }
    }
}

/// All known apps, in registration order
#[derive(Debug, Default)]
pub struct AppRegistry {
    apps: Vec<AppDescriptor>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, app: AppDescriptor) -> Result<(), RegistryError> {
        if self.get(&app.id).is_some() {
            return Err(RegistryError::DuplicateId);
        }
        self.apps.push(app);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&AppDescriptor> {
        self.apps.iter().find(|app| app.id == id)
    }

    /// Apps listed under `category`, in registration order
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &AppDescriptor> + '_ {
        self.apps.iter().filter(move |app| app.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppDescriptor> + '_ {
        self.apps.iter()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
