//! # Errores del Servicio
//! src/error.rs
//!
//! Taxonomía de errores del núcleo de jobs y de la configuración.

use thiserror::Error;

/// Errores del ciclo de vida de jobs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// El id no existe en el store (se traduce a 404)
    #[error("Job not found: {0}")]
    NotFound(String),

    /// Violación de invariante: el id ya estaba registrado
    #[error("Duplicate job id: {0}")]
    DuplicateId(String),

    /// Falla durante la estimación en segundo plano
    #[error("Processing error: {0}")]
    Processing(String),
}

/// Errores de validación de la configuración
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Runner workers must be >= 1")]
    NoWorkers,

    #[error("Max request size must be > 0")]
    ZeroRequestSize,

    #[error("CORS origin must not be empty")]
    EmptyCorsOrigin,

    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),
}
