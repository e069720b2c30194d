use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use vibescore_income::ScoreOptions;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_env() -> Self {
        match env::var("VIBESCORE_ENV")
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the scoring service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_env();

        let host = env::var("VIBESCORE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("VIBESCORE_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let telemetry = TelemetryConfig {
            log_level: env::var("VIBESCORE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            engine_log_level: env::var("VIBESCORE_ENGINE_LOG_LEVEL").ok(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            scoring: ScoringConfig::load()?,
            telemetry,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Per-deployment reference points for the scoring engine.
///
/// A deployment serving a high-cost market can raise the baseline and cap
/// without touching callers; anything left unset falls through to the
/// engine's documented defaults, and requests carrying explicit options
/// still win over all of this.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub baseline_monthly_income: Option<f64>,
    pub strong_income_cap: Option<f64>,
    pub ideal_emergency_months: Option<f64>,
}

impl ScoringConfig {
    fn load() -> Result<Self, ConfigError> {
        let config = Self {
            baseline_monthly_income: positive_f64("VIBESCORE_BASELINE_INCOME")?,
            strong_income_cap: positive_f64("VIBESCORE_STRONG_INCOME_CAP")?,
            ideal_emergency_months: positive_f64("VIBESCORE_EMERGENCY_MONTHS")?,
        };

        if let (Some(baseline), Some(cap)) =
            (config.baseline_monthly_income, config.strong_income_cap)
        {
            if cap <= baseline {
                return Err(ConfigError::IncomeBounds { baseline, cap });
            }
        }

        Ok(config)
    }

    /// Engine options with the deployment overrides applied.
    pub fn score_options(&self) -> ScoreOptions {
        let mut options = ScoreOptions::default();
        if let Some(value) = self.baseline_monthly_income {
            options.baseline_monthly_income = value;
        }
        if let Some(value) = self.strong_income_cap {
            options.strong_income_cap = value;
        }
        if let Some(value) = self.ideal_emergency_months {
            options.ideal_emergency_months = value;
        }
        options
    }
}

fn positive_f64(key: &'static str) -> Result<Option<f64>, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}

/// Tracing controls. The engine crate can be opened up to a chattier level
/// than the rest of the service.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub engine_log_level: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    IncomeBounds { baseline: f64, cap: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "VIBESCORE_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "VIBESCORE_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive number, got '{value}'")
            }
            ConfigError::IncomeBounds { baseline, cap } => write!(
                f,
                "VIBESCORE_STRONG_INCOME_CAP ({cap}) must exceed VIBESCORE_BASELINE_INCOME ({baseline})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
