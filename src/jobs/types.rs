//! # Tipos y Estructuras para el Sistema de Jobs
//! src/jobs/types.rs
//!
//! Define los tipos fundamentales de un job de análisis de rendimiento.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Batch size usado cuando el cliente no envía uno
pub const DEFAULT_BATCH_SIZE: u32 = 32;

/// Estado de un job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Job procesándose en segundo plano
    Running,

    /// Job completado con métricas
    Completed,

    /// Job falló durante la estimación
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Verifica si el estado es terminal (no admite más transiciones)
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Métricas simuladas de un modelo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    /// Latencia promedio en milisegundos
    pub average_latency: f64,

    /// Inferencias por segundo
    pub throughput: f64,

    /// Memoria en MB
    pub memory_usage: f64,

    /// Precisión entre 0 y 1
    pub accuracy: f64,
}

/// Resultado terminal que el runner escribe en el store
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerminalOutcome {
    Completed(MetricsBundle),
    Failed,
}

impl TerminalOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            TerminalOutcome::Completed(_) => JobStatus::Completed,
            TerminalOutcome::Failed => JobStatus::Failed,
        }
    }
}

/// Body de `POST /jobs/`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobCreate {
    pub model_name: String,

    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}

/// Un job de análisis de rendimiento
///
/// Las cuatro métricas viven juntas en `metrics`, así que un job nunca
/// puede tener métricas a medias.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: String,
    model_name: String,
    batch_size: u32,
    status: JobStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    metrics: Option<MetricsBundle>,
}

impl Job {
    /// Crea un job nuevo en estado `running` con un id UUID v4
    pub fn new(model_name: impl Into<String>, batch_size: u32) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), model_name, batch_size)
    }

    /// Crea un job con un id explícito
    pub fn with_id(id: impl Into<String>, model_name: impl Into<String>, batch_size: u32) -> Self {
        Self {
            id: id.into(),
            model_name: model_name.into(),
            batch_size,
            status: JobStatus::Running,
            created_at: Utc::now(),
            completed_at: None,
            metrics: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn metrics(&self) -> Option<&MetricsBundle> {
        self.metrics.as_ref()
    }

    /// Aplica la transición terminal
    ///
    /// Retorna `false` sin tocar nada si el job ya era terminal.
    /// Los jobs fallidos no reciben `completed_at`.
    pub(crate) fn finish(&mut self, outcome: TerminalOutcome) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        match outcome {
            TerminalOutcome::Completed(metrics) => {
                self.status = JobStatus::Completed;
                self.completed_at = Some(Utc::now());
                self.metrics = Some(metrics);
            }
            TerminalOutcome::Failed => {
                self.status = JobStatus::Failed;
            }
        }

        true
    }
}

/// Representación JSON de un job
#[derive(Serialize)]
struct JobRepr<'a> {
    id: &'a str,
    model_name: &'a str,
    batch_size: u32,
    status: JobStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    average_latency: Option<f64>,
    throughput: Option<f64>,
    memory_usage: Option<f64>,
    accuracy: Option<f64>,
}

impl Serialize for Job {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JobRepr {
            id: &self.id,
            model_name: &self.model_name,
            batch_size: self.batch_size,
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
            average_latency: self.metrics.map(|m| m.average_latency),
            throughput: self.metrics.map(|m| m.throughput),
            memory_usage: self.metrics.map(|m| m.memory_usage),
            accuracy: self.metrics.map(|m| m.accuracy),
        }
        .serialize(serializer)
    }
}

/// Respuesta de `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,

    /// Segundos desde epoch, con fracción
    pub timestamp: f64,

    pub total_jobs: usize,
}
