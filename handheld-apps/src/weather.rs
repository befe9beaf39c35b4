//! Weather: current conditions from OpenWeatherMap
//!
//! Fetches run on a detached `weather-fetch` thread and post their result
//! into a [`Mailbox`]. Only one fetch is in flight at a time. A successful
//! report is refreshed every 30 minutes; after an error nothing is fetched
//! until the user taps to retry.

use std::sync::Arc;
use std::time::Duration;

use embedded_graphics::prelude::*;
use handheld_core::config::{Config, Theme};
use handheld_core::input::LogicalEvent;
use handheld_core::nav::{Context, LaunchContext, Screen, ScreenFault};
use handheld_display::FrameBuffer;
use serde::Deserialize;

use crate::mailbox::Mailbox;
use crate::widgets::{self, title_case, LARGE, LARGE_LATIN1, SMALL};

/// Settings table in `Config::apps`
pub const APP_ID: &str = "weather";

/// Placeholder key shipped in sample configs
const PLACEHOLDER_KEY: &str = "YOUR_OWM_API_KEY";

const DEFAULT_URL: &str = "https://api.openweathermap.org";

pub const REFRESH_INTERVAL_MS: u64 = 30 * 60 * 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No usable API key configured
    ApiKeyMissing,
    /// Server answered with a non-success status
    Status(u16),
    /// Request never completed (DNS, connect, timeout)
    Connection,
    /// Body was not a weather report
    Parse,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::ApiKeyMissing => f.write_str("API Key Missing"),
            FetchError::Status(code) => write!(f, "Error: {}", code),
            FetchError::Connection => f.write_str("Conn Error"),
            FetchError::Parse => f.write_str("Bad Response"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Current conditions, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub city: String,
    pub temperature: f32,
    /// `C`, `F` or `K`
    pub unit: char,
    pub description: String,
    pub humidity: u32,
    /// Metres per second
    pub wind: f32,
}

impl Report {
    /// Parse an OpenWeatherMap `/data/2.5/weather` body
    pub fn parse(body: &str, units: &str) -> Result<Self, FetchError> {
        let raw: OwmResponse = serde_json::from_str(body).map_err(|_| FetchError::Parse)?;
        Ok(Self::from_owm(raw, units))
    }

    fn from_owm(raw: OwmResponse, units: &str) -> Self {
        let description = raw
            .weather
            .first()
            .map(|w| title_case(&w.description))
            .unwrap_or_default();
        Self {
            city: raw.name,
            temperature: raw.main.temp,
            unit: unit_letter(units),
            description,
            humidity: raw.main.humidity,
            wind: raw.wind.speed,
        }
    }

    /// Whole degrees with unit, e.g. `21°C`
    pub fn temperature_label(&self) -> String {
        format!("{}\u{b0}{}", self.temperature.trunc() as i32, self.unit)
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    wind: OwmWind,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f32,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f32,
}

fn unit_letter(units: &str) -> char {
    match units {
        "metric" => 'C',
        "imperial" => 'F',
        _ => 'K',
    }
}

/// Something that can produce a report, blocking
pub trait WeatherSource: Send + Sync {
    fn fetch(&self) -> Result<Report, FetchError>;
}

/// Weather settings from the `weather` app table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSettings {
    pub api_key: Option<String>,
    pub lat: String,
    pub lon: String,
    pub units: String,
    pub base_url: String,
}

impl WeatherSettings {
    pub fn from_config(config: &Config) -> Self {
        let get = |key: &str| config.app_setting(APP_ID, key);
        let api_key = get("api_key")
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_KEY)
            .map(String::from);
        Self {
            api_key,
            lat: get("lat").unwrap_or("0").to_string(),
            lon: get("lon").unwrap_or("0").to_string(),
            units: get("units").unwrap_or("metric").to_string(),
            base_url: get("url").unwrap_or(DEFAULT_URL).to_string(),
        }
    }
}

/// OpenWeatherMap current-weather client
pub struct OpenWeatherMap {
    client: reqwest::blocking::Client,
    settings: WeatherSettings,
}

impl OpenWeatherMap {
    pub fn new(settings: WeatherSettings) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::warn!(error = %e, "weather http client unavailable");
                FetchError::Connection
            })?;
        Ok(Self { client, settings })
    }
}

impl WeatherSource for OpenWeatherMap {
    fn fetch(&self) -> Result<Report, FetchError> {
        let api_key = self.settings.api_key.as_deref().ok_or(FetchError::ApiKeyMissing)?;
        let url = format!("{}/data/2.5/weather", self.settings.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", self.settings.lat.as_str()),
                ("lon", self.settings.lon.as_str()),
                ("appid", api_key),
                ("units", self.settings.units.as_str()),
            ])
            .send()
            .map_err(|e| {
                tracing::warn!(error = %e, "weather request failed");
                FetchError::Connection
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "weather request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }

        let raw: OwmResponse = response.json().map_err(|e| {
            tracing::warn!(error = %e, "weather response unreadable");
            FetchError::Parse
        })?;
        Ok(Report::from_owm(raw, &self.settings.units))
    }
}

type FetchResult = Result<Report, FetchError>;

pub struct Weather {
    source: Arc<dyn WeatherSource>,
    mailbox: Mailbox<FetchResult>,
    in_flight: bool,
    report: Option<Report>,
    error: Option<FetchError>,
    /// When the shown report arrived
    fetched_at: Option<u64>,
    theme: Theme,
    now_ms: u64,
}

impl Weather {
    pub fn new(source: Arc<dyn WeatherSource>, theme: &Theme, now_ms: u64) -> Self {
        Self {
            source,
            mailbox: Mailbox::new(),
            in_flight: false,
            report: None,
            error: None,
            fetched_at: None,
            theme: *theme,
            now_ms,
        }
    }

    pub fn launch(ctx: &LaunchContext<'_>) -> Result<Box<dyn Screen>, ScreenFault> {
        let settings = WeatherSettings::from_config(ctx.config);
        let client = OpenWeatherMap::new(settings).map_err(|_| ScreenFault::Launch("http client unavailable"))?;
        Ok(Box::new(Self::new(Arc::new(client), &ctx.config.theme, ctx.now_ms)))
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight || (self.report.is_none() && self.error.is_none())
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Start a fetch unless one is already running
    fn start_fetch(&mut self) {
        if self.in_flight {
            return;
        }
        let source = Arc::clone(&self.source);
        let poster = self.mailbox.poster();
        let spawned = std::thread::Builder::new()
            .name("weather-fetch".into())
            .spawn(move || {
                let result = source.fetch();
                if !poster.post(result) {
                    tracing::debug!("weather result arrived after screen closed");
                }
            });

        match spawned {
            Ok(_) => {
                self.in_flight = true;
                self.error = None;
                tracing::debug!("weather fetch started");
            }
            Err(e) => {
                tracing::warn!(error = %e, "weather worker could not start");
                self.error = Some(FetchError::Connection);
            }
        }
    }

    fn refresh_due(&self) -> bool {
        if self.in_flight || self.error.is_some() {
            return false;
        }
        match self.fetched_at {
            Some(at) => self.now_ms.saturating_sub(at) >= REFRESH_INTERVAL_MS,
            None => true,
        }
    }

    fn draw_error(&self, frame: &mut FrameBuffer, error: &FetchError) -> Result<(), ScreenFault> {
        widgets::text(frame, "Weather Error", 20, 100, &LARGE, self.theme.warning())?;
        widgets::text(frame, &error.to_string(), 20, 130, &LARGE, self.theme.fg())?;
        if *error == FetchError::ApiKeyMissing {
            widgets::text(frame, "Check config", 20, 160, &SMALL, self.theme.muted())?;
        }
        widgets::text(frame, "Press Select to Retry", 50, 240, &SMALL, self.theme.muted())
    }

    fn draw_report(&self, frame: &mut FrameBuffer, report: &Report) -> Result<(), ScreenFault> {
        widgets::text(frame, &report.city, 20, 20, &LARGE, self.theme.accent())?;
        widgets::text(frame, &report.temperature_label(), 20, 60, &LARGE_LATIN1, self.theme.fg())?;
        widgets::text(frame, &report.description, 20, 130, &LARGE, self.theme.accent())?;
        let humidity = format!("Humidity: {}%", report.humidity);
        widgets::text(frame, &humidity, 20, 180, &SMALL, self.theme.muted())?;
        let wind = format!("Wind: {} m/s", report.wind);
        widgets::text(frame, &wind, 20, 210, &SMALL, self.theme.muted())?;
        if let Some(at) = self.fetched_at {
            let minutes = self.now_ms.saturating_sub(at) / 60_000;
            let updated = format!("Updated: {} min ago", minutes);
            widgets::text(frame, &updated, 20, 280, &SMALL, self.theme.muted())?;
        }
        Ok(())
    }
}

impl Screen for Weather {
    fn name(&self) -> &str {
        "Weather"
    }

    fn update(&mut self, ctx: &mut Context) -> Result<(), ScreenFault> {
        self.now_ms = ctx.now_ms();

        if let Some(result) = self.mailbox.take() {
            self.in_flight = false;
            match result {
                Ok(report) => {
                    tracing::info!(city = %report.city, "weather updated");
                    self.report = Some(report);
                    self.fetched_at = Some(self.now_ms);
                    self.error = None;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "weather fetch failed");
                    self.error = Some(e);
                }
            }
        }

        if self.refresh_due() {
            self.start_fetch();
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        frame.clear(self.theme.bg())?;
        if self.is_loading() {
            return widgets::text(frame, "Loading...", 80, 140, &LARGE, self.theme.fg());
        }
        if let Some(error) = &self.error {
            return self.draw_error(frame, error);
        }
        match &self.report {
            Some(report) => self.draw_report(frame, report),
            None => Ok(()),
        }
    }

    fn handle(&mut self, event: LogicalEvent, ctx: &mut Context) -> Result<bool, ScreenFault> {
        self.now_ms = ctx.now_ms();
        match event {
            LogicalEvent::Tap => {
                self.start_fetch();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const SAMPLE: &str = r#"{
        "name": "Lisbon",
        "main": {"temp": 21.7, "humidity": 64},
        "weather": [{"description": "scattered clouds"}],
        "wind": {"speed": 3.6}
    }"#;

    /// Source answering from a script, counting calls
    struct Scripted {
        answers: Mutex<Vec<FetchResult>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(mut answers: Vec<FetchResult>) -> Arc<Self> {
            answers.reverse();
            Arc::new(Self {
                answers: Mutex::new(answers),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl WeatherSource for Scripted {
        fn fetch(&self) -> FetchResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers.lock().unwrap().pop().unwrap_or(Err(FetchError::Connection))
        }
    }

    fn report() -> Report {
        Report::parse(SAMPLE, "metric").unwrap()
    }

    /// Tick until the in-flight fetch lands
    fn settle(weather: &mut Weather, now_ms: u64) {
        for _ in 0..400 {
            weather.update(&mut Context::new(now_ms)).unwrap();
            if !weather.in_flight {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("fetch never finished");
    }

    #[test]
    fn test_parse_report() {
        let r = report();
        assert_eq!(r.city, "Lisbon");
        assert_eq!(r.humidity, 64);
        assert_eq!(r.description, "Scattered Clouds");
        assert_eq!(r.temperature_label(), "21\u{b0}C");
        assert_eq!(Report::parse("{}", "metric"), Err(FetchError::Parse));
    }

    #[test]
    fn test_error_labels() {
        assert_eq!(FetchError::ApiKeyMissing.to_string(), "API Key Missing");
        assert_eq!(FetchError::Status(401).to_string(), "Error: 401");
        assert_eq!(FetchError::Connection.to_string(), "Conn Error");
    }

    #[test]
    fn test_settings_reject_placeholder_key() {
        let mut config = Config::default();
        config.set_app_setting(APP_ID, "api_key", PLACEHOLDER_KEY);
        let settings = WeatherSettings::from_config(&config);
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.units, "metric");
        assert_eq!(settings.base_url, DEFAULT_URL);

        config.set_app_setting(APP_ID, "api_key", "k123");
        config.set_app_setting(APP_ID, "lat", "38.7");
        let settings = WeatherSettings::from_config(&config);
        assert_eq!(settings.api_key.as_deref(), Some("k123"));
        assert_eq!(settings.lat, "38.7");
    }

    #[test]
    fn test_missing_key_fails_without_request() {
        let client = OpenWeatherMap::new(WeatherSettings::from_config(&Config::default())).unwrap();
        assert_eq!(client.fetch(), Err(FetchError::ApiKeyMissing));
    }

    #[test]
    fn test_first_update_fetches() {
        let source = Scripted::new(vec![Ok(report())]);
        let mut weather = Weather::new(source.clone(), &Theme::default(), 0);
        assert!(weather.is_loading());

        settle(&mut weather, 1_000);
        assert_eq!(weather.report().map(|r| r.city.as_str()), Some("Lisbon"));
        assert!(!weather.is_loading());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_auto_refresh_after_interval() {
        let source = Scripted::new(vec![Ok(report()), Ok(report())]);
        let mut weather = Weather::new(source.clone(), &Theme::default(), 0);
        settle(&mut weather, 0);

        weather.update(&mut Context::new(REFRESH_INTERVAL_MS - 1)).unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        weather.update(&mut Context::new(REFRESH_INTERVAL_MS)).unwrap();
        settle(&mut weather, REFRESH_INTERVAL_MS);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_error_waits_for_tap() {
        let source = Scripted::new(vec![Err(FetchError::Status(500)), Ok(report())]);
        let mut weather = Weather::new(source.clone(), &Theme::default(), 0);
        settle(&mut weather, 0);
        assert_eq!(weather.error(), Some(&FetchError::Status(500)));

        // No automatic retry
        weather.update(&mut Context::new(REFRESH_INTERVAL_MS * 2)).unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        assert_eq!(weather.handle(LogicalEvent::Tap, &mut Context::new(0)), Ok(true));
        settle(&mut weather, REFRESH_INTERVAL_MS * 2);
        assert_eq!(weather.error(), None);
        assert!(weather.report().is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_hold_and_rotation_not_consumed() {
        let mut weather = Weather::new(Scripted::new(vec![]), &Theme::default(), 0);
        let mut ctx = Context::new(0);
        assert_eq!(weather.handle(LogicalEvent::Hold, &mut ctx), Ok(false));
        assert_eq!(weather.handle(LogicalEvent::RotateLeft, &mut ctx), Ok(false));
    }

    #[test]
    fn test_error_screen_drawn_in_warning_colour() {
        let theme = Theme::default();
        let source = Scripted::new(vec![Err(FetchError::ApiKeyMissing)]);
        let mut weather = Weather::new(source, &theme, 0);
        settle(&mut weather, 0);

        let mut frame = FrameBuffer::new(240, 320);
        weather.draw(&mut frame).unwrap();
        assert!(widgets::any_pixel(&frame, 20, 100, 130, 20, theme.warning()));
        assert!(widgets::any_pixel(&frame, 20, 160, 72, 10, theme.muted()));
    }

    #[test]
    fn test_report_drawn() {
        let theme = Theme::default();
        let mut weather = Weather::new(Scripted::new(vec![Ok(report())]), &theme, 0);
        settle(&mut weather, 0);

        let mut frame = FrameBuffer::new(240, 320);
        weather.draw(&mut frame).unwrap();
        // City in accent, temperature in text colour
        assert!(widgets::any_pixel(&frame, 20, 20, 60, 20, theme.accent()));
        assert!(widgets::any_pixel(&frame, 20, 60, 40, 20, theme.fg()));
        assert!(widgets::any_pixel(&frame, 20, 280, 100, 10, theme.muted()));
    }
}
