use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::leads::{DeliveryFailurePolicy, LeadSettings, PromoCodeSource};
use crate::workflows::quote::EstimatePolicy;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub providers: ProviderConfig,
    pub leads: LeadSettings,
    pub estimate_policy: EstimatePolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let providers = ProviderConfig {
            resend_api_key: optional_var("RESEND_API_KEY"),
            stripe_secret_key: optional_var("STRIPE_SECRET_KEY"),
        };

        let estimate_policy = match optional_var("ESTIMATE_POLICY") {
            Some(raw) => EstimatePolicy::parse(&raw).ok_or(ConfigError::InvalidSetting {
                name: "ESTIMATE_POLICY",
                value: raw,
            })?,
            None => EstimatePolicy::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            providers,
            leads: load_lead_settings()?,
            estimate_policy,
        })
    }
}

fn load_lead_settings() -> Result<LeadSettings, ConfigError> {
    let mut settings = LeadSettings::default();

    if let Some(from) = optional_var("RESEND_FROM_EMAIL") {
        settings.quote.from = from;
    }
    if let Some(owner) = optional_var("RESEND_OWNER_EMAIL") {
        settings.quote.owner = owner;
    }
    settings.quote.forward = optional_var("RESEND_FORWARD_EMAIL");
    if let Some(raw) = optional_var("QUOTE_FAILURE_POLICY") {
        settings.quote.failure_policy =
            DeliveryFailurePolicy::parse(&raw).ok_or(ConfigError::InvalidSetting {
                name: "QUOTE_FAILURE_POLICY",
                value: raw,
            })?;
    }

    if let Some(from) = optional_var("PROMO_FROM_EMAIL") {
        settings.promo.from = from;
    }
    if let Some(owner) = optional_var("PROMO_OWNER_EMAIL") {
        settings.promo.owner = owner;
    }
    settings.promo.manager = optional_var("PROMO_MANAGER_EMAIL");
    if let Some(subject) = optional_var("PROMO_SUBJECT") {
        settings.promo.subject = subject;
    }
    match optional_var("PROMO_CODE_MODE").as_deref() {
        None | Some("fixed") => {
            if let Some(code) = optional_var("PROMO_CODE") {
                settings.promo.code = PromoCodeSource::Fixed(code);
            }
        }
        Some("generated") => {
            settings.promo.code = PromoCodeSource::Generated {
                prefix: optional_var("PROMO_CODE_PREFIX").unwrap_or_else(|| "NK".to_string()),
            };
        }
        Some(other) => {
            return Err(ConfigError::InvalidSetting {
                name: "PROMO_CODE_MODE",
                value: other.to_string(),
            })
        }
    }

    if let Some(raw) = optional_var("DEPOSIT_AMOUNT_CENTS") {
        settings.deposit.amount_cents = raw
            .parse::<u32>()
            .ok()
            .filter(|cents| *cents > 0)
            .ok_or(ConfigError::InvalidDepositAmount)?;
    }
    if let Some(url) = optional_var("CHECKLIST_URL") {
        settings.checklist.url = url;
    }
    if let Some(to) = optional_var("HIRING_TO_EMAIL") {
        settings.hiring.to = to;
    }

    Ok(settings)
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Credentials for the mail and payment providers. Missing keys leave the
/// matching handlers answering "not configured".
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub resend_api_key: Option<String>,
    pub stripe_secret_key: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("resend_api_key", &self.resend_api_key.is_some())
            .field("stripe_secret_key", &self.stripe_secret_key.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDepositAmount,
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDepositAmount => {
                write!(f, "DEPOSIT_AMOUNT_CENTS must be a positive whole number")
            }
            ConfigError::InvalidSetting { name, value } => {
                write!(f, "{name} has unsupported value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDepositAmount
            | ConfigError::InvalidSetting { .. } => None,
        }
    }
}
