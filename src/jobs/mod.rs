//! # Sistema de Jobs
//!
//! Análisis de rendimiento asíncrono: el job se registra como `running`,
//! se responde de inmediato y un worker en segundo plano lo completa
//! (o lo marca `failed`) después del retardo simulado.
//!
//! ## Endpoints
//!
//! - `POST /jobs/` - Crear job
//! - `GET /jobs/` - Listar jobs
//! - `GET /jobs/{id}` - Consultar un job
//! - `GET /health` - Estado del servicio

pub mod estimator;
pub mod handlers;
pub mod queue;
pub mod runner;
pub mod service;
pub mod store;
pub mod types;

pub use estimator::{MetricEstimator, Tier, TieredEstimator};
pub use runner::{JobRunner, RunnerConfig};
pub use service::JobService;
pub use store::{JobStore, TerminalUpdate};
pub use types::{HealthReport, Job, JobCreate, JobStatus, MetricsBundle, TerminalOutcome};
