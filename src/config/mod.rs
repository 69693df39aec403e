pub mod routes;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::gate::{
    is_local_path, Gate, MatcherScope, PublicRoutes, RouteTable, TokenSources, DEFAULT_FALLBACK_PATH,
    DEFAULT_LOGIN_PATH,
};
use crate::gate::token::{DEFAULT_TOKEN_COOKIE, LEGACY_TOKEN_COOKIE};
use routes::RouteFile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub gate: GateSettings,
    pub dev_tokens: DevTokenConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Built frontend bundle served behind the gate
    pub static_dir: PathBuf,
    pub enable_cors: bool,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    pub routes_file: Option<PathBuf>,
    pub login_path: String,
    pub default_fallback: String,
    pub token_cookie: String,
    pub legacy_token_cookie: String,
    pub decision_logging: bool,
}

/// Signing settings for `gatectl token mint`. The gate itself never verifies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevTokenConfig {
    pub secret: String,
    pub expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("GATE_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("GATE_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("GATE_ENABLE_CORS") {
            self.server.enable_cors = v.parse().unwrap_or(self.server.enable_cors);
        }
        if let Ok(v) = env::var("GATE_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Gate overrides
        if let Ok(v) = env::var("GATE_ROUTES_FILE") {
            self.gate.routes_file = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("GATE_LOGIN_PATH") {
            self.gate.login_path = v;
        }
        if let Ok(v) = env::var("GATE_DEFAULT_FALLBACK") {
            self.gate.default_fallback = v;
        }
        if let Ok(v) = env::var("GATE_TOKEN_COOKIE") {
            self.gate.token_cookie = v;
        }
        if let Ok(v) = env::var("GATE_LEGACY_TOKEN_COOKIE") {
            self.gate.legacy_token_cookie = v;
        }
        if let Ok(v) = env::var("GATE_DECISION_LOGGING") {
            self.gate.decision_logging = v.parse().unwrap_or(self.gate.decision_logging);
        }

        // Dev token overrides
        if let Ok(v) = env::var("GATE_DEV_TOKEN_SECRET") {
            self.dev_tokens.secret = v;
        }
        if let Ok(v) = env::var("GATE_DEV_TOKEN_EXPIRY_HOURS") {
            self.dev_tokens.expiry_hours = v.parse().unwrap_or(self.dev_tokens.expiry_hours);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                static_dir: PathBuf::from("dist"),
                enable_cors: true,
                enable_request_logging: true,
            },
            gate: GateSettings::clinic_defaults(true),
            dev_tokens: DevTokenConfig {
                secret: "clinic-gate-dev".to_string(),
                expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                static_dir: PathBuf::from("/srv/clinic/dist"),
                enable_cors: true,
                enable_request_logging: true,
            },
            gate: GateSettings::clinic_defaults(true),
            dev_tokens: DevTokenConfig {
                secret: String::new(),
                expiry_hours: 24,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                static_dir: PathBuf::from("/srv/clinic/dist"),
                enable_cors: false,
                enable_request_logging: false,
            },
            gate: GateSettings::clinic_defaults(false),
            dev_tokens: DevTokenConfig {
                secret: String::new(),
                expiry_hours: 4,
            },
        }
    }

    /// Assemble the gate: route file when configured, clinic defaults otherwise
    pub fn build_gate(&self) -> Result<Gate, ConfigError> {
        let settings = &self.gate;
        for (setting, value) in [
            ("login path", &settings.login_path),
            ("default fallback", &settings.default_fallback),
        ] {
            if !is_local_path(value) {
                return Err(ConfigError::InvalidRedirectSetting {
                    setting,
                    value: value.clone(),
                });
            }
        }

        let (public, table) = match &settings.routes_file {
            Some(path) => {
                let file = RouteFile::load(path)?;
                (
                    file.public_routes(PublicRoutes::clinic_defaults())?,
                    file.route_table(&settings.default_fallback)?,
                )
            }
            None => (
                PublicRoutes::clinic_defaults(),
                RouteTable::clinic_defaults(&settings.default_fallback),
            ),
        };

        Ok(Gate::new(public, table)
            .with_token_sources(TokenSources {
                cookie: settings.token_cookie.clone(),
                legacy_cookie: settings.legacy_token_cookie.clone(),
            })
            .with_scope(MatcherScope::default())
            .with_login_path(settings.login_path.clone())
            .with_decision_logging(settings.decision_logging))
    }
}

impl GateSettings {
    fn clinic_defaults(decision_logging: bool) -> Self {
        Self {
            routes_file: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            default_fallback: DEFAULT_FALLBACK_PATH.to_string(),
            token_cookie: DEFAULT_TOKEN_COOKIE.to_string(),
            legacy_token_cookie: LEGACY_TOKEN_COOKIE.to_string(),
            decision_logging,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
