//! Configuration types.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;
use crate::intake::countries::is_known_dial_code;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind on 0.0.0.0.
    pub port: u16,
    /// libSQL database file.
    pub db_path: PathBuf,
    /// Calling code for local numbers and the form's default picker value.
    pub dial_code: String,
    /// Replaces the built-in chatbot system prompt when set.
    pub system_prompt: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            db_path: PathBuf::from("./data/leadflow.db"),
            dial_code: "+20".to_string(),
            system_prompt: None,
        }
    }
}

impl ServerConfig {
    /// Build from environment variables, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = std::env::var("LEADFLOW_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let db_path = std::env::var("LEADFLOW_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let dial_code = match std::env::var("LEADFLOW_DIAL_CODE") {
            Ok(raw) => normalize_dial_code(&raw)?,
            Err(_) => defaults.dial_code,
        };

        let system_prompt = std::env::var("LEADFLOW_SYSTEM_PROMPT")
            .ok()
            .filter(|p| !p.trim().is_empty());

        Ok(Self {
            port,
            db_path,
            dial_code,
            system_prompt,
        })
    }
}

/// Accept `20`, `+20` or ` +20 `; reject codes missing from the country table.
fn normalize_dial_code(raw: &str) -> Result<String, ConfigError> {
    let digits = raw.trim().trim_start_matches('+');
    let code = format!("+{digits}");
    if digits.is_empty() || !is_known_dial_code(&code) {
        return Err(ConfigError::InvalidValue {
            key: "LEADFLOW_DIAL_CODE".to_string(),
            message: format!("unknown calling code '{raw}'"),
        });
    }
    Ok(code)
}

/// Shared-secret guard for the admin lead endpoints.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    pub token: Option<SecretString>,
}

impl AdminConfig {
    /// `LEADFLOW_ADMIN_TOKEN`; unset or blank leaves the endpoints open.
    pub fn from_env() -> Self {
        let token = std::env::var("LEADFLOW_ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);
        Self { token }
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(SecretString::from(token)),
        }
    }

    /// Check an `Authorization` header value.
    pub fn authorize(&self, header: Option<&str>) -> bool {
        let Some(expected) = &self.token else {
            return true;
        };
        header
            .and_then(|h| h.strip_prefix("Bearer "))
            .is_some_and(|given| given.trim() == expected.expose_secret())
    }
}
