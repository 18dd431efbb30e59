//! Configuración de variables de entorno
//!
//! Solo el binario lee el entorno; la librería recibe la configuración ya
//! construida.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingConfig {
    pub environment: String,
    pub log_level: String,
    pub seed_sample_data: bool,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            seed_sample_data: true,
        }
    }
}

impl SchedulingConfig {
    /// Construir la configuración desde el entorno, con valores por defecto
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            seed_sample_data: lookup("SCHEDULING_SEED_SAMPLE_DATA")
                .map(|value| parse_flag(&value))
                .unwrap_or(defaults.seed_sample_data),
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Nivel de log para `tracing_subscriber`; `info` si el valor no es válido
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
