//! Configuración de variables de entorno
//!
//! Todas las variables tienen un valor por defecto de desarrollo; un valor
//! presente pero mal formado es un error de configuración.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::clients::traccar_client::DEFAULT_TIMEOUT;
use crate::utils::errors::AppError;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub storage_dir: PathBuf,
    pub traccar_timeout: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: "fleet-dev-secret".to_string(),
            jwt_expiration: 86_400,
            cors_origins: vec!["*".to_string()],
            storage_dir: PathBuf::from("./data"),
            traccar_timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} tiene un valor inválido: {}", key, raw))),
        _ => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Leer la configuración desde una fuente arbitraria de variables
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            _ => defaults.cors_origins,
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .unwrap_or(defaults.jwt_secret);

        let config = Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            host: lookup("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration: parse_var(&lookup, "JWT_EXPIRATION", defaults.jwt_expiration)?,
            cors_origins,
            storage_dir: lookup("STORAGE_DIR").map(PathBuf::from).unwrap_or(defaults.storage_dir),
            traccar_timeout: Duration::from_secs(parse_var(
                &lookup,
                "TRACCAR_TIMEOUT_SECS",
                defaults.traccar_timeout.as_secs(),
            )?),
        };

        if config.is_production() && config.jwt_secret == Self::default().jwt_secret {
            log::warn!("⚠️ JWT_SECRET no definido en producción, usando el secreto de desarrollo");
        }

        Ok(config)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = EnvironmentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.traccar_timeout, Duration::from_secs(8));
        assert!(config.is_development());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
    }

    #[test]
    fn test_values_are_parsed() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("ENVIRONMENT", "production"),
            ("PORT", "8080"),
            ("CORS_ORIGINS", "https://a.com, https://b.com,"),
            ("STORAGE_DIR", "/var/lib/fleet"),
            ("TRACCAR_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["https://a.com", "https://b.com"]);
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/fleet"));
        assert_eq!(config.traccar_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_malformed_number_is_a_config_error() {
        let err = EnvironmentConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("PORT")));
    }
}
