//! # Cola de Trabajo del Runner
//! src/jobs/queue.rs
//!
//! Cola FIFO thread-safe entre `JobRunner::schedule` y los workers.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Instant;

/// Trabajo pendiente para un job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerTask {
    pub job_id: String,
    pub model_name: String,
    pub batch_size: u32,

    /// Momento a partir del cual el job puede procesarse
    pub ready_at: Instant,
}

struct QueueState {
    tasks: VecDeque<RunnerTask>,
    closed: bool,
}

/// Cola FIFO bloqueante
#[derive(Clone)]
pub struct WorkQueue {
    state: Arc<Mutex<QueueState>>,

    /// Condvar para notificar cuando hay nuevas tareas o se cierra la cola
    condvar: Arc<Condvar>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                tasks: VecDeque::new(),
                closed: false,
            })),
            condvar: Arc::new(Condvar::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Encola una tarea
    ///
    /// Retorna `false` si la cola ya fue cerrada.
    pub fn enqueue(&self, task: RunnerTask) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }

        state.tasks.push_back(task);

        // Notificar a un worker esperando
        self.condvar.notify_one();
        true
    }

    /// Desencola la tarea más antigua
    ///
    /// Bloquea hasta que haya una tarea. Retorna `None` solo cuando la cola
    /// está cerrada y vacía, así que las tareas ya encoladas siempre corren.
    pub fn dequeue(&self) -> Option<RunnerTask> {
        let mut state = self.lock();

        loop {
            if let Some(task) = state.tasks.pop_front() {
                return Some(task);
            }
            if state.closed {
                return None;
            }

            state = self
                .condvar
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Cierra la cola y despierta a todos los workers
    pub fn close(&self) {
        self.lock().closed = true;
        self.condvar.notify_all();
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn task(id: &str) -> RunnerTask {
        RunnerTask {
            job_id: id.to_string(),
            model_name: "m".to_string(),
            batch_size: 1,
            ready_at: Instant::now(),
        }
    }

    #[test]
    fn test_queue_fifo_order() {
        let queue = WorkQueue::new();
        queue.enqueue(task("1"));
        queue.enqueue(task("2"));
        queue.enqueue(task("3"));

        assert_eq!(queue.len(), 3);

        assert_eq!(queue.dequeue().unwrap().job_id, "1");
        assert_eq!(queue.dequeue().unwrap().job_id, "2");
        assert_eq!(queue.dequeue().unwrap().job_id, "3");
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_closed_queue_rejects_and_drains() {
        let queue = WorkQueue::new();
        queue.enqueue(task("pending"));
        queue.close();

        assert!(!queue.enqueue(task("late")));
        assert_eq!(queue.dequeue().unwrap().job_id, "pending");
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_dequeue_wakes_on_enqueue() {
        let queue = WorkQueue::new();
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.dequeue())
        };

        thread::sleep(Duration::from_millis(50));
        queue.enqueue(task("wake"));

        assert_eq!(consumer.join().unwrap().unwrap().job_id, "wake");
    }

    #[test]
    fn test_close_wakes_idle_workers() {
        let queue = WorkQueue::new();
        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || queue.dequeue())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.close();

        for consumer in consumers {
            assert!(consumer.join().unwrap().is_none());
        }
        assert!(!queue.enqueue(task("after-close")));
    }
}
