use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Full database connection URL, e.g. `sqlite://data/waterlog.db?mode=rwc`.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// Account every request is scoped to in a single-account deployment.
    /// The core threads this through explicitly; nothing below the HTTP
    /// layer assumes a fixed identity.
    #[serde(default = "default_account_id")]
    pub account_id: String,
    /// UTC offset used for day-boundary arithmetic, e.g. `+09:00`.
    /// Explicit so "today" and day ranges are reproducible in tests.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    /// Prompt locale: `ko` or `en`.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// CORS allowed origins; empty allows all origins (development mode).
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub weekly_report: WeeklyReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReportConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_weekly_tick_secs")]
    pub tick_interval_secs: u64,
}

fn default_http_port() -> u16 {
    8080
}

fn default_db_url() -> String {
    "sqlite://data/waterlog.db?mode=rwc".to_string()
}

fn default_account_id() -> String {
    // single-account deployments ship with one well-known account
    "00000000-0000-0000-0000-000000000000".to_string()
}

fn default_utc_offset() -> String {
    "+09:00".to_string()
}

fn default_locale() -> String {
    "ko".to_string()
}

fn default_ai_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    120
}

fn default_weekly_tick_secs() -> u64 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            db_url: default_db_url(),
            account_id: default_account_id(),
            utc_offset: default_utc_offset(),
            locale: default_locale(),
            cors_allowed_origins: Vec::new(),
            ai: AiConfig::default(),
            weekly_report: WeeklyReportConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_ai_model(),
            base_url: None,
            timeout_secs: default_ai_timeout_secs(),
            max_output_tokens: None,
        }
    }
}

impl Default for WeeklyReportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tick_interval_secs: default_weekly_tick_secs(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn tz_offset(&self) -> anyhow::Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }
}

/// Parse a `±HH:MM` offset string (also accepts `Z` for UTC).
pub fn parse_utc_offset(s: &str) -> anyhow::Result<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(|| anyhow::anyhow!("invalid offset"));
    }

    let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
        (1i32, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (-1i32, rest)
    } else {
        anyhow::bail!("invalid UTC offset '{s}', expected format +HH:MM");
    };

    let (hh, mm) = rest
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("invalid UTC offset '{s}', expected format +HH:MM"))?;
    let hours: i32 = hh.parse()?;
    let minutes: i32 = mm.parse()?;
    if hours > 23 || minutes > 59 {
        anyhow::bail!("UTC offset '{s}' out of range");
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow::anyhow!("UTC offset '{s}' out of range"))
}
