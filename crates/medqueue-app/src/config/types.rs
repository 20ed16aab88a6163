//! Configuration types for `.medqueue/config.toml`

use std::time::Duration;

use medqueue_core::{Coordinates, DEFAULT_FEE};
use medqueue_remote::WatchOptions;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `remote.api_key`
pub const API_KEY_ENV_VAR: &str = "MEDQUEUE_API_KEY";

/// Application settings (.medqueue/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub remote: RemoteSettings,

    #[serde(default)]
    pub location: LocationSettings,

    #[serde(default)]
    pub booking: BookingSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Which queue table implementation to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteBackend {
    /// In-process table (nothing leaves the machine)
    #[default]
    Memory,
    /// Hosted PostgREST endpoint with realtime
    Postgrest,
}

impl std::fmt::Display for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteBackend::Memory => write!(f, "memory"),
            RemoteBackend::Postgrest => write!(f, "postgrest"),
        }
    }
}

/// Remote queue store settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub backend: RemoteBackend,

    /// Project base URL, required for `postgrest`
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,

    /// Subscribe to push notifications
    #[serde(default = "default_true")]
    pub realtime: bool,

    /// Pre-fill the memory backend with sample patients
    #[serde(default = "default_true")]
    pub seed_demo: bool,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            backend: RemoteBackend::default(),
            url: None,
            api_key: None,
            table: default_table(),
            realtime: true,
            seed_demo: true,
        }
    }
}

impl RemoteSettings {
    /// API key, with the environment variable taking precedence
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone())
    }
}

/// Geocoder implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocoderKind {
    /// OpenStreetMap Nominatim + Overpass (network)
    Osm,
    /// Built-in catalogue
    #[default]
    Offline,
}

/// Position source and live-tracking settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocationSettings {
    /// Fixed device position; live location is unavailable without one
    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    /// Abandon a stalled position read after this long
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub maximum_age_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub geocoder: GeocoderKind,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            high_accuracy: true,
            timeout_ms: default_timeout_ms(),
            maximum_age_ms: 0,
            poll_interval_ms: default_poll_interval_ms(),
            geocoder: GeocoderKind::default(),
        }
    }
}

impl LocationSettings {
    pub fn fixed_position(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            maximum_age: Duration::from_millis(self.maximum_age_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// Fee quoted on the summary step
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BookingSettings {
    #[serde(default = "default_fee")]
    pub fee: f64,

    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            fee: default_fee(),
            currency: default_currency(),
        }
    }
}

impl BookingSettings {
    /// `₹75.00`
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency, amount)
    }
}

/// Staff / doctor login gate
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default = "default_access_code")]
    pub access_code: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            access_code: default_access_code(),
        }
    }
}

/// Icon rendering mode for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconMode {
    /// Safe Unicode characters that work in all terminals
    #[default]
    Unicode,
    /// Nerd Font glyphs (requires a Nerd Font in the terminal)
    NerdFonts,
}

impl std::fmt::Display for IconMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconMode::Unicode => write!(f, "unicode"),
            IconMode::NerdFonts => write!(f, "nerd_fonts"),
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    #[serde(default)]
    pub icons: IconMode,
}

fn default_table() -> String {
    "queue".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    3_000
}

fn default_fee() -> f64 {
    DEFAULT_FEE
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_access_code() -> String {
    "1234".to_string()
}
