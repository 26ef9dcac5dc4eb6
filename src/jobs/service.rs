//! # Fachada del Sistema de Jobs
//! src/jobs/service.rs
//!
//! Punto de entrada que usa la capa HTTP: coordina `JobStore` y `JobRunner`.

use crate::error::JobError;
use crate::jobs::estimator::{MetricEstimator, TieredEstimator};
use crate::jobs::runner::{JobRunner, RunnerConfig};
use crate::jobs::store::JobStore;
use crate::jobs::types::{HealthReport, Job, TerminalOutcome};
use std::io;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

/// Servicio de jobs
pub struct JobService {
    store: JobStore,
    runner: JobRunner,
}

impl JobService {
    /// Crea el servicio con un estimador propio
    ///
    /// Falla si el runner no pudo lanzar ningún worker.
    pub fn new(config: &RunnerConfig, estimator: Arc<dyn MetricEstimator>) -> io::Result<Self> {
        let store = JobStore::new();
        let runner = JobRunner::start(config, store.clone(), estimator)?;

        info!(
            workers = config.workers,
            delay_ms = config.processing_delay.as_millis() as u64,
            "job service started"
        );

        Ok(Self { store, runner })
    }

    /// Crea el servicio con el estimador por tiers
    pub fn with_defaults(config: &RunnerConfig) -> io::Result<Self> {
        Self::new(config, Arc::new(TieredEstimator::new()))
    }

    /// Registra un job y programa su procesamiento
    ///
    /// Retorna el job recién insertado, todavía en `running`. Si el runner
    /// ya no acepta tareas el job queda `failed` en el acto.
    pub fn create_job(&self, model_name: &str, batch_size: u32) -> Result<Job, JobError> {
        let job = Job::new(model_name, batch_size);
        self.store.insert(job.clone())?;

        if !self.runner.schedule(job.id(), job.model_name(), job.batch_size()) {
            error!(job_id = job.id(), "job could not be scheduled, marking failed");
            self.store.update_terminal(job.id(), TerminalOutcome::Failed);
            return self.store.get(job.id());
        }

        info!(job_id = job.id(), model = model_name, batch_size, "job created");
        Ok(job)
    }

    /// Obtiene un job por id
    pub fn get_job(&self, job_id: &str) -> Result<Job, JobError> {
        self.store.get(job_id)
    }

    /// Todos los jobs en orden de creación
    pub fn list_jobs(&self) -> Vec<Job> {
        self.store.list()
    }

    /// Estado del servicio
    pub fn health(&self) -> HealthReport {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        HealthReport {
            status: "healthy",
            timestamp,
            total_jobs: self.store.len(),
        }
    }

    /// Detiene el runner después de procesar lo encolado
    pub fn shutdown(&self) {
        self.runner.shutdown();
    }
}
