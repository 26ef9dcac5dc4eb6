//! # Runner de Jobs en Segundo Plano
//! src/jobs/runner.rs
//!
//! Pool fijo de workers que toma tareas de la `WorkQueue`, simula el tiempo
//! de procesamiento, invoca el estimador y escribe el resultado terminal en
//! el `JobStore`. Quien llama a `schedule` nunca espera.

use crate::jobs::estimator::MetricEstimator;
use crate::jobs::queue::{RunnerTask, WorkQueue};
use crate::jobs::store::{JobStore, TerminalUpdate};
use crate::jobs::types::TerminalOutcome;
use std::collections::HashSet;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Configuración del runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Número de workers
    pub workers: usize,

    /// Tiempo simulado de procesamiento por job
    pub processing_delay: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            processing_delay: Duration::from_secs(2),
        }
    }
}

impl RunnerConfig {
    /// Crea una configuración desde el Config principal
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            workers: config.runner_workers,
            processing_delay: Duration::from_millis(config.processing_delay_ms),
        }
    }
}

/// Runner de jobs
pub struct JobRunner {
    queue: WorkQueue,

    processing_delay: Duration,

    /// Ids que ya recibieron su única tarea
    scheduled: Mutex<HashSet<String>>,

    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl JobRunner {
    /// Crea el runner e inicia sus workers
    ///
    /// Falla solo si no se pudo lanzar ningún worker; si algunos fallan, el
    /// runner sigue con los que sí arrancaron.
    pub fn start(
        config: &RunnerConfig,
        store: JobStore,
        estimator: Arc<dyn MetricEstimator>,
    ) -> io::Result<Self> {
        let queue = WorkQueue::new();
        let count = config.workers.max(1);

        let mut workers = Vec::with_capacity(count);
        let mut last_error = None;

        for i in 0..count {
            let queue = queue.clone();
            let store = store.clone();
            let estimator = Arc::clone(&estimator);

            let spawned = thread::Builder::new()
                .name(format!("runner-{}", i))
                .spawn(move || Self::worker_loop(i, queue, store, estimator));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    error!(error = %e, worker = i, "failed to spawn runner worker");
                    last_error = Some(e);
                }
            }
        }

        if workers.is_empty() {
            queue.close();
            return Err(last_error.unwrap_or_else(|| io::Error::other("no runner workers")));
        }

        Ok(Self {
            queue,
            processing_delay: config.processing_delay,
            scheduled: Mutex::new(HashSet::new()),
            workers: Mutex::new(workers),
        })
    }

    /// Loop principal del worker
    fn worker_loop(
        index: usize,
        queue: WorkQueue,
        store: JobStore,
        estimator: Arc<dyn MetricEstimator>,
    ) {
        debug!(worker = index, "runner worker started");

        while let Some(task) = queue.dequeue() {
            debug!(worker = index, job_id = %task.job_id, "worker picked up job");

            // Trabajo en progreso: el retardo corre desde `schedule`, no desde
            // que el worker toma la tarea
            let wait = task.ready_at.saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                thread::sleep(wait);
            }

            let outcome = Self::process(&task, estimator.as_ref());
            match store.update_terminal(&task.job_id, outcome) {
                TerminalUpdate::Applied => info!(
                    worker = index,
                    job_id = %task.job_id,
                    status = outcome.status().as_str(),
                    "job finished"
                ),
                other => debug!(worker = index, job_id = %task.job_id, ?other, "terminal update skipped"),
            }
        }

        debug!(worker = index, "runner worker stopped");
    }

    /// Ejecuta la estimación y la traduce a un resultado terminal
    ///
    /// Errores y panics del estimador marcan el job como `failed`;
    /// nunca se propagan al worker.
    fn process(task: &RunnerTask, estimator: &dyn MetricEstimator) -> TerminalOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            estimator.estimate(&task.model_name, task.batch_size)
        }));

        match result {
            Ok(Ok(metrics)) => TerminalOutcome::Completed(metrics),
            Ok(Err(e)) => {
                error!(job_id = %task.job_id, error = %e, "job processing failed");
                TerminalOutcome::Failed
            }
            Err(_) => {
                error!(job_id = %task.job_id, "metric estimator panicked");
                TerminalOutcome::Failed
            }
        }
    }

    /// Programa la única tarea de un job
    ///
    /// Retorna `false` si el id ya fue programado o el runner está detenido.
    pub fn schedule(&self, job_id: &str, model_name: &str, batch_size: u32) -> bool {
        {
            let mut scheduled = self
                .scheduled
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if !scheduled.insert(job_id.to_string()) {
                warn!(job_id, "job already scheduled, ignoring");
                return false;
            }
        }

        let accepted = self.queue.enqueue(RunnerTask {
            job_id: job_id.to_string(),
            model_name: model_name.to_string(),
            batch_size,
            ready_at: Instant::now() + self.processing_delay,
        });

        if !accepted {
            warn!(job_id, "runner is shut down, job not scheduled");
            self.scheduled
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .remove(job_id);
        }
        accepted
    }

    /// Tareas encoladas que ningún worker tomó todavía
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Cierra la cola y espera a que los workers terminen lo encolado
    pub fn shutdown(&self) {
        self.queue.close();

        let handles: Vec<JoinHandle<()>> = self
            .workers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .drain(..)
            .collect();

        for handle in handles {
            if handle.join().is_err() {
                error!("runner worker exited with a panic");
            }
        }
        info!("job runner stopped");
    }
}

impl Drop for JobRunner {
    fn drop(&mut self) {
        // Los workers salen solos cuando vacían la cola
        self.queue.close();
    }
}
