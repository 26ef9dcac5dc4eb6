//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servicio con soporte para argumentos CLI y variables
//! de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./perf_analyzer --port 8000 \
//!   --runner-workers 8 \
//!   --processing-delay-ms 500 \
//!   --cors-origin http://localhost:3000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! PORT=8000 HOST=0.0.0.0 PROCESSING_DELAY_MS=2000 ./perf_analyzer
//! ```

use crate::error::ConfigError;
use crate::jobs::RunnerConfig;
use clap::Parser;
use tracing::info;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuración del servicio de análisis
#[derive(Debug, Clone, Parser)]
#[command(name = "perf_analyzer")]
#[command(about = "Servicio de análisis de rendimiento de modelos de IA")]
#[command(version)]
pub struct Config {
    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8000", env = "PORT")]
    pub port: u16,

    /// Único origen aceptado por la política CORS
    #[arg(long = "cors-origin", default_value = "http://localhost:3000", env = "CORS_ORIGIN")]
    pub cors_origin: String,

    // === Runner ===

    /// Retardo simulado de cada análisis en milisegundos
    #[arg(long = "processing-delay-ms", default_value = "2000", env = "PROCESSING_DELAY_MS")]
    pub processing_delay_ms: u64,

    /// Número de workers que procesan jobs en segundo plano
    #[arg(long = "runner-workers", default_value = "4", env = "RUNNER_WORKERS")]
    pub runner_workers: usize,

    // === Límites ===

    /// Tamaño máximo de un request (headers + body) en bytes
    #[arg(long = "max-request-bytes", default_value = "65536", env = "MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    /// Nivel de log cuando RUST_LOG no está definido
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use perf_analyzer::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Proyección de la configuración del runner
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::from_config(self)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runner_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }

        if self.max_request_bytes == 0 {
            return Err(ConfigError::ZeroRequestSize);
        }

        if self.cors_origin.trim().is_empty() {
            return Err(ConfigError::EmptyCorsOrigin);
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración efectiva
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            cors_origin = %self.cors_origin,
            "network configuration"
        );
        info!(
            workers = self.runner_workers,
            processing_delay_ms = self.processing_delay_ms,
            max_request_bytes = self.max_request_bytes,
            "runner configuration"
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origin: "http://localhost:3000".to_string(),
            processing_delay_ms: 2000,
            runner_workers: 4,
            max_request_bytes: 64 * 1024,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.runner_workers, 4);
        assert_eq!(config.processing_delay_ms, 2000);
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_parse_from_args() {
        let config = Config::parse_from([
            "perf_analyzer",
            "--port",
            "9000",
            "--runner-workers",
            "2",
            "--processing-delay-ms",
            "10",
        ]);

        assert_eq!(config.port, 9000);
        assert_eq!(config.runner_workers, 2);
        assert_eq!(config.processing_delay_ms, 10);
    }

    #[test]
    fn test_runner_config_projection() {
        let mut config = Config::default();
        config.runner_workers = 3;
        config.processing_delay_ms = 150;

        let runner = config.runner_config();
        assert_eq!(runner.workers, 3);
        assert_eq!(runner.processing_delay, Duration::from_millis(150));
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    // ==================== Validación ====================

    #[test]
    fn test_validate_invalid_workers() {
        let mut config = Config::default();
        config.runner_workers = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoWorkers));
    }

    #[test]
    fn test_validate_zero_request_size() {
        let mut config = Config::default();
        config.max_request_bytes = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRequestSize));
    }

    #[test]
    fn test_validate_empty_origin() {
        let mut config = Config::default();
        config.cors_origin = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyCorsOrigin));
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = Config::default();
        config.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());

        config.log_level = "loud".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_zero_delay_is_valid() {
        let mut config = Config::default();
        config.processing_delay_ms = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_summary() {
        // No debe hacer panic sin subscriber instalado
        Config::default().log_summary();
    }
}
