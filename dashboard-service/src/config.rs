use anyhow::Context;
use serde::Deserialize;
use std::fs;
use time::{macros::format_description, UtcOffset};

/// Account owners whose meters are shown on the map when no list is configured.
pub const DEFAULT_MAP_USER_IDS: [&str; 2] = [
    "0b3c4572-ef30-4e3a-bc54-8862c5af1ae1",
    "3e78bf6c-d48d-4532-a237-3394f310189e",
];

#[derive(Debug, Clone, Deserialize)]
pub struct QuestDbConfig {
    pub uri: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: String,
    /// Deadline applied to every API request.
    pub request_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Calendar used to bucket timestamps into months and hours of day.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Fixed offset such as `"-04:00"`. When unset the host's local offset is used.
    pub utc_offset: Option<String>,
}

impl ReportingConfig {
    /// Resolve the reporting offset.
    ///
    /// The local offset can only be read reliably while the process is still
    /// single-threaded, so call this before the runtime starts.
    pub fn resolve_offset(&self) -> anyhow::Result<UtcOffset> {
        match &self.utc_offset {
            Some(raw) => parse_utc_offset(raw),
            None => Ok(UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not determine local UTC offset, reporting in UTC");
                UtcOffset::UTC
            })),
        }
    }
}

pub fn parse_utc_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        trimmed,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid reporting.utc_offset '{raw}'"))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeterMapConfig {
    /// Owners whose meters are placed on the map. An empty list selects every meter.
    pub user_ids: Vec<String>,
    pub readings_per_meter: i64,
    /// Upper bound on in-flight per-meter lookups.
    pub lookup_concurrency: usize,
}

impl Default for MeterMapConfig {
    fn default() -> Self {
        Self {
            user_ids: DEFAULT_MAP_USER_IDS.iter().map(|s| s.to_string()).collect(),
            readings_per_meter: 1,
            lookup_concurrency: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    pub name: String,
    pub rate_per_m3: f64,
    /// Country calling code prepended to local phone numbers.
    pub phone_prefix: String,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            name: "Tarifa Básica".to_string(),
            rate_per_m3: 2.5,
            phone_prefix: "+591".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub questdb: QuestDbConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
    #[serde(default)]
    pub meter_map: MeterMapConfig,
    #[serde(default)]
    pub tariff: TariffConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| "dashboard-config.toml".to_string());
        let contents =
            fs::read_to_string(&path).with_context(|| format!("failed to read config file '{path}'"))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}
