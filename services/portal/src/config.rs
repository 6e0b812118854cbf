//! services/portal/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use crate::adapters::wire::RegistrationShape;
use clinic_portal_core::role::RoleStrategy;
use reqwest::Url;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base: String,
    pub role_strategy: RoleStrategy,
    pub registration_shape: RegistrationShape,
    pub doctor_patients_path: String,
    pub session_file: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Backend Location ---
        let api_base = lookup("PORTAL_API_BASE")
            .unwrap_or_else(|| "http://localhost:8000/api".to_string());
        Url::parse(&api_base).map_err(|e| {
            ConfigError::InvalidValue("PORTAL_API_BASE".to_string(), e.to_string())
        })?;
        let api_base = api_base.trim_end_matches('/').to_string();

        // --- Backend Variant ---
        let role_strategy = match lookup("PORTAL_ROLE_STRATEGY") {
            Some(value) => value
                .parse::<RoleStrategy>()
                .map_err(|e| ConfigError::InvalidValue("PORTAL_ROLE_STRATEGY".to_string(), e))?,
            None => RoleStrategy::Explicit,
        };

        let registration_shape = match lookup("PORTAL_REGISTRATION_SHAPE") {
            Some(value) => value.parse::<RegistrationShape>().map_err(|e| {
                ConfigError::InvalidValue("PORTAL_REGISTRATION_SHAPE".to_string(), e)
            })?,
            None => RegistrationShape::Flat,
        };

        let doctor_patients_path = lookup("PORTAL_DOCTOR_PATIENTS_PATH")
            .unwrap_or_else(|| "/doctors/patients/".to_string());
        if !doctor_patients_path.starts_with('/') {
            return Err(ConfigError::InvalidValue(
                "PORTAL_DOCTOR_PATIENTS_PATH".to_string(),
                format!("'{}' must start with '/'", doctor_patients_path),
            ));
        }

        // --- Local State ---
        let session_file = lookup("PORTAL_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_session_file);

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base,
            role_strategy,
            registration_shape,
            doctor_patients_path,
            session_file,
            log_level,
        })
    }
}

fn default_session_file() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join("clinic-portal").join("session.json"),
        None => PathBuf::from("./.clinic-portal-session.json"),
    }
}
