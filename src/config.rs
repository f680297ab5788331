// src/config.rs
//! Unified configuration management - single place that reads the environment

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_MONTH_USD_LIMIT: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub metering: MeteringConfig,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    pub output_path: PathBuf,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct MeteringConfig {
    pub month_usd_limit: f64,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub firebase_project_id: String,
}

impl ConfigManager {
    /// Load all configurations from the environment
    pub fn load() -> Result<Self> {
        let environment = Self::load_environment()?;
        let metering = Self::load_metering();
        let auth = Self::load_auth();

        Ok(Self {
            environment,
            metering,
            auth,
        })
    }

    fn load_environment() -> Result<EnvironmentConfig> {
        let env = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        info!("Loading environment configuration for: {}", env);

        let base_dir = if env == "production" {
            PathBuf::from("/app")
        } else {
            std::env::current_dir().context("Failed to get current directory")?
        };

        let port = match std::env::var("ROCKET_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .context("ROCKET_PORT must be a valid port number")?,
            Err(_) => 8000,
        };

        Ok(EnvironmentConfig {
            database_path: base_dir.join("resumely.db"),
            output_path: base_dir.join("out"),
            port,
        })
    }

    fn load_metering() -> MeteringConfig {
        let raw = std::env::var("AI_MONTH_USD_LIMIT").ok();
        MeteringConfig {
            month_usd_limit: parse_month_usd_limit(raw.as_deref()),
        }
    }

    fn load_auth() -> AuthSettings {
        let firebase_project_id =
            std::env::var("FIREBASE_PROJECT_ID").unwrap_or_else(|_| "resumely-app".to_string());

        AuthSettings {
            firebase_project_id,
        }
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        crate::utils::ensure_dir_exists(&self.environment.output_path).await?;

        if let Some(db_parent) = self.environment.database_path.parent() {
            crate::utils::ensure_dir_exists(db_parent).await?;
        }

        Ok(())
    }
}

fn parse_month_usd_limit(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(DEFAULT_MONTH_USD_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_usd_limit_defaults_when_unset() {
        assert_eq!(parse_month_usd_limit(None), DEFAULT_MONTH_USD_LIMIT);
    }

    #[test]
    fn test_month_usd_limit_parses_valid_value() {
        assert_eq!(parse_month_usd_limit(Some("3.5")), 3.5);
    }

    #[test]
    fn test_month_usd_limit_ignores_garbage() {
        assert_eq!(parse_month_usd_limit(Some("plenty")), DEFAULT_MONTH_USD_LIMIT);
        assert_eq!(parse_month_usd_limit(Some("")), DEFAULT_MONTH_USD_LIMIT);
    }
}
