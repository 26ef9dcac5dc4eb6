//! # Registro en Memoria de Jobs
//! src/jobs/store.rs
//!
//! Dueño único de los registros de jobs. Todo acceso pasa por un solo Mutex,
//! así que los lectores ven el estado antes o después de una transición,
//! nunca a medias. Es volátil y append-only: no hay borrado.

use crate::error::JobError;
use crate::jobs::types::{Job, TerminalOutcome};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Qué ocurrió con un `update_terminal`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalUpdate {
    /// La transición se aplicó
    Applied,

    /// El job ya era terminal; no se tocó
    AlreadyTerminal,

    /// El id no existe
    Missing,
}

#[derive(Default)]
struct StoreInner {
    /// Índice por id
    jobs: HashMap<String, Job>,

    /// Ids en orden de creación
    order: Vec<String>,
}

/// Store thread-safe de jobs
#[derive(Clone, Default)]
pub struct JobStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl JobStore {
    /// Crea un store vacío
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Un panic en otro thread no debe bloquear el store
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registra un job nuevo
    pub fn insert(&self, job: Job) -> Result<(), JobError> {
        let mut inner = self.lock();

        if inner.jobs.contains_key(job.id()) {
            return Err(JobError::DuplicateId(job.id().to_string()));
        }

        debug!(job_id = job.id(), model = job.model_name(), "job inserted");
        inner.order.push(job.id().to_string());
        inner.jobs.insert(job.id().to_string(), job);

        Ok(())
    }

    /// Obtiene una copia de un job por id
    pub fn get(&self, job_id: &str) -> Result<Job, JobError> {
        self.lock()
            .jobs
            .get(job_id)
            .cloned()
            .ok_or_else(|| JobError::NotFound(job_id.to_string()))
    }

    /// Snapshot de todos los jobs en orden de creación
    pub fn list(&self) -> Vec<Job> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.jobs.get(id).cloned())
            .collect()
    }

    /// Transiciona un job de `running` a su estado terminal
    ///
    /// Nunca falla: ids ausentes o jobs ya terminados se registran en el log
    /// y se ignoran.
    pub fn update_terminal(&self, job_id: &str, outcome: TerminalOutcome) -> TerminalUpdate {
        let mut inner = self.lock();

        let Some(job) = inner.jobs.get_mut(job_id) else {
            warn!(job_id, "terminal update for unknown job ignored");
            return TerminalUpdate::Missing;
        };

        if job.finish(outcome) {
            debug!(job_id, status = job.status().as_str(), "job finished");
            TerminalUpdate::Applied
        } else {
            warn!(
                job_id,
                status = job.status().as_str(),
                "job already terminal, update ignored"
            );
            TerminalUpdate::AlreadyTerminal
        }
    }

    /// Número de jobs almacenados
    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
