//! Smart Home: lights and switches from a Home Assistant server
//!
//! The entity list is fetched on a `home-assistant` worker thread when the
//! screen opens. Tapping a row toggles that entity, then the list is
//! fetched again so the checkboxes show the server's state. After an error
//! a tap retries the fetch.

use std::sync::Arc;
use std::time::Duration;

use embedded_graphics::draw_target::DrawTarget;
use handheld_core::config::{Config, Theme};
use handheld_core::input::LogicalEvent;
use handheld_core::nav::{Context, LaunchContext, Menu, MenuItem, Screen, ScreenFault};
use handheld_display::FrameBuffer;
use serde::Deserialize;

use crate::mailbox::Mailbox;
use crate::widgets::{self, LARGE, SMALL};

/// Settings table in `Config::apps`
pub const APP_ID: &str = "home_assistant";

const TITLE: &str = "Smart Home";

/// Placeholder token shipped in sample configs
const PLACEHOLDER_TOKEN: &str = "YOUR_LONG_LIVED_ACCESS_TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Service calls land on the server before the new state is readable
const TOGGLE_SETTLE: Duration = Duration::from_millis(500);

/// Entity domains shown in the list
const DOMAINS: [&str; 2] = ["light.", "switch."];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaError {
    /// Server URL or access token missing
    NotConfigured,
    /// Server answered with a non-success status
    Status(u16),
    /// Request never completed (DNS, connect, timeout)
    Connection,
    /// Body was not a state list
    Parse,
}

impl std::fmt::Display for HaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaError::NotConfigured => f.write_str("Not Configured"),
            HaError::Status(code) => write!(f, "Error: {}", code),
            HaError::Connection => f.write_str("Conn Error"),
            HaError::Parse => f.write_str("Bad Response"),
        }
    }
}

impl std::error::Error for HaError {}

/// A light or switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// e.g. `light.kitchen`
    pub id: String,
    pub name: String,
    pub on: bool,
}

impl Entity {
    /// Menu row, e.g. `[X] Kitchen`
    pub fn label(&self) -> String {
        let mark = if self.on { "[X]" } else { "[ ]" };
        format!("{} {}", mark, self.name)
    }

    /// `light` or `switch`
    pub fn domain(&self) -> &str {
        self.id.split('.').next().unwrap_or(&self.id)
    }

    /// Service that flips the current state
    pub fn toggle_service(&self) -> &'static str {
        if self.on {
            "turn_off"
        } else {
            "turn_on"
        }
    }

    /// Parse an `/api/states` body, keeping lights and switches
    pub fn parse_states(body: &str) -> Result<Vec<Self>, HaError> {
        let raw: Vec<HaState> = serde_json::from_str(body).map_err(|_| HaError::Parse)?;
        Ok(Self::from_states(raw))
    }

    fn from_states(raw: Vec<HaState>) -> Vec<Self> {
        raw.into_iter()
            .filter(|s| DOMAINS.iter().any(|d| s.entity_id.starts_with(d)))
            .map(|s| Self {
                name: s.attributes.friendly_name.unwrap_or_else(|| s.entity_id.clone()),
                on: s.state == "on",
                id: s.entity_id,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct HaState {
    entity_id: String,
    state: String,
    #[serde(default)]
    attributes: HaAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct HaAttributes {
    friendly_name: Option<String>,
}

/// A Home Assistant server, blocking
pub trait HomeSource: Send + Sync {
    fn entities(&self) -> Result<Vec<Entity>, HaError>;
    fn toggle(&self, entity: &Entity) -> Result<(), HaError>;
}

/// Connection settings from the `home_assistant` app table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaSettings {
    pub url: Option<String>,
    pub token: Option<String>,
}

impl HaSettings {
    pub fn from_config(config: &Config) -> Self {
        let get = |key: &str| {
            config
                .app_setting(APP_ID, key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };
        Self {
            url: get("url").map(|u| u.trim_end_matches('/').to_string()),
            token: get("token")
                .filter(|t| *t != PLACEHOLDER_TOKEN)
                .map(String::from),
        }
    }
}

/// Home Assistant REST client
pub struct HomeAssistant {
    client: reqwest::blocking::Client,
    settings: HaSettings,
}

impl HomeAssistant {
    pub fn new(settings: HaSettings) -> Result<Self, HaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::warn!(error = %e, "home assistant http client unavailable");
                HaError::Connection
            })?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> Result<(&str, &str), HaError> {
        match (&self.settings.url, &self.settings.token) {
            (Some(url), Some(token)) => Ok((url.as_str(), token.as_str())),
            _ => Err(HaError::NotConfigured),
        }
    }

    fn check(response: &reqwest::blocking::Response) -> Result<(), HaError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            tracing::warn!(status = status.as_u16(), "home assistant request rejected");
            Err(HaError::Status(status.as_u16()))
        }
    }
}

fn connection(e: reqwest::Error) -> HaError {
    tracing::warn!(error = %e, "home assistant request failed");
    HaError::Connection
}

impl HomeSource for HomeAssistant {
    fn entities(&self) -> Result<Vec<Entity>, HaError> {
        let (url, token) = self.endpoint()?;
        let response = self
            .client
            .get(format!("{}/api/states", url))
            .bearer_auth(token)
            .send()
            .map_err(connection)?;
        Self::check(&response)?;

        let raw: Vec<HaState> = response.json().map_err(|e| {
            tracing::warn!(error = %e, "home assistant response unreadable");
            HaError::Parse
        })?;
        Ok(Entity::from_states(raw))
    }

    fn toggle(&self, entity: &Entity) -> Result<(), HaError> {
        let (url, token) = self.endpoint()?;
        let service = format!(
            "{}/api/services/{}/{}",
            url,
            entity.domain(),
            entity.toggle_service()
        );
        let response = self
            .client
            .post(service)
            .bearer_auth(token)
            .json(&serde_json::json!({ "entity_id": entity.id }))
            .send()
            .map_err(connection)?;
        Self::check(&response)?;
        tracing::info!(entity = %entity.id, service = entity.toggle_service(), "entity toggled");
        std::thread::sleep(TOGGLE_SETTLE);
        Ok(())
    }
}

type FetchResult = Result<Vec<Entity>, HaError>;

/// Work for the worker thread
enum Job {
    Fetch,
    Toggle(Entity),
}

pub struct SmartHome {
    source: Arc<dyn HomeSource>,
    mailbox: Mailbox<FetchResult>,
    in_flight: bool,
    entities: Option<Vec<Entity>>,
    error: Option<HaError>,
    /// Row actions index into `entities`
    menu: Menu<usize>,
    theme: Theme,
    height: u16,
}

impl SmartHome {
    pub fn new(source: Arc<dyn HomeSource>, theme: &Theme, height: u16) -> Self {
        Self {
            source,
            mailbox: Mailbox::new(),
            in_flight: false,
            entities: None,
            error: None,
            menu: Menu::new(TITLE, Vec::new(), height),
            theme: *theme,
            height,
        }
    }

    pub fn launch(ctx: &LaunchContext<'_>) -> Result<Box<dyn Screen>, ScreenFault> {
        let settings = HaSettings::from_config(ctx.config);
        let client = HomeAssistant::new(settings).map_err(|_| ScreenFault::Launch("http client unavailable"))?;
        Ok(Box::new(Self::new(
            Arc::new(client),
            &ctx.config.theme,
            ctx.config.display.height,
        )))
    }

    pub fn is_loading(&self) -> bool {
        self.entities.is_none() && self.error.is_none()
    }

    pub fn entities(&self) -> Option<&[Entity]> {
        self.entities.as_deref()
    }

    pub fn error(&self) -> Option<&HaError> {
        self.error.as_ref()
    }

    pub fn menu(&self) -> &Menu<usize> {
        &self.menu
    }

    /// Hand a job to a worker unless one is already running
    fn start(&mut self, job: Job) {
        if self.in_flight {
            return;
        }
        let source = Arc::clone(&self.source);
        let poster = self.mailbox.poster();
        let spawned = std::thread::Builder::new()
            .name("home-assistant".into())
            .spawn(move || {
                let result = match job {
                    Job::Fetch => source.entities(),
                    Job::Toggle(entity) => source.toggle(&entity).and_then(|()| source.entities()),
                };
                if !poster.post(result) {
                    tracing::debug!("home assistant result arrived after screen closed");
                }
            });

        match spawned {
            Ok(_) => {
                self.in_flight = true;
                if self.error.take().is_some() {
                    self.entities = None;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "home assistant worker could not start");
                self.error = Some(HaError::Connection);
            }
        }
    }

    /// Rebuild the rows, keeping the selected index when it still exists
    fn show(&mut self, entities: Vec<Entity>) {
        let mut items: Vec<MenuItem<usize>> = entities
            .iter()
            .enumerate()
            .map(|(i, e)| MenuItem::new(&e.label(), i))
            .collect();
        if items.is_empty() {
            items.push(MenuItem::disabled("No Devices Found"));
        }
        let selected = self.menu.selected();
        let keep = selected < items.len();
        self.menu = Menu::new(TITLE, items, self.height);
        if keep {
            self.menu.move_selection(selected as i32);
        }
        self.entities = Some(entities);
    }

    fn draw_error(&self, frame: &mut FrameBuffer, error: &HaError) -> Result<(), ScreenFault> {
        widgets::text(frame, &error.to_string(), 20, 140, &LARGE, self.theme.warning())?;
        widgets::text(frame, "Check config", 20, 165, &SMALL, self.theme.fg())?;
        widgets::text(frame, "Press Select to Retry", 50, 240, &SMALL, self.theme.muted())
    }
}

impl Screen for SmartHome {
    fn name(&self) -> &str {
        TITLE
    }

    fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
        if let Some(result) = self.mailbox.take() {
            self.in_flight = false;
            match result {
                Ok(entities) => {
                    tracing::info!(count = entities.len(), "home assistant entities loaded");
                    self.error = None;
                    self.show(entities);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "home assistant fetch failed");
                    self.error = Some(e);
                }
            }
        }

        if self.is_loading() && !self.in_flight {
            self.start(Job::Fetch);
        }
        self.menu.update();
        Ok(())
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        if let Some(error) = &self.error {
            frame.clear(self.theme.bg())?;
            return self.draw_error(frame, error);
        }
        if self.is_loading() {
            frame.clear(self.theme.bg())?;
            return widgets::text(frame, "Loading...", 80, 140, &LARGE, self.theme.fg());
        }
        self.menu.draw_list(frame, &self.theme)
    }

    fn handle(&mut self, event: LogicalEvent, _ctx: &mut Context) -> Result<bool, ScreenFault> {
        match event {
            LogicalEvent::RotateLeft | LogicalEvent::RotateRight => {
                if self.error.is_some() || self.entities.is_none() {
                    return Ok(false);
                }
                self.menu.move_selection(event.delta());
                Ok(true)
            }
            LogicalEvent::Tap => {
                if self.in_flight {
                    return Ok(true);
                }
                if self.error.is_some() {
                    self.start(Job::Fetch);
                    return Ok(true);
                }
                let entity = self
                    .menu
                    .selected_action()
                    .and_then(|&i| self.entities.as_ref()?.get(i))
                    .cloned();
                if let Some(entity) = entity {
                    self.start(Job::Toggle(entity));
                }
                Ok(true)
            }
            LogicalEvent::Hold => Ok(false),
        }
    }
}
