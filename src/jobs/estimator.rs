//! # Estimador de Métricas
//! src/jobs/estimator.rs
//!
//! Genera métricas simuladas a partir del nombre del modelo. El nombre se
//! clasifica en un tier (large, medium o small) y cada métrica se sortea
//! uniformemente dentro del rango del tier.

use crate::error::JobError;
use crate::jobs::types::MetricsBundle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::Mutex;

/// Estima métricas de rendimiento para un modelo
///
/// El runner convierte cualquier `Err` (o panic) en un job `failed`.
pub trait MetricEstimator: Send + Sync {
    fn estimate(&self, model_name: &str, batch_size: u32) -> Result<MetricsBundle, JobError>;
}

/// Tier derivado del nombre del modelo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Large,
    Medium,
    Small,
}

/// Rangos de cada métrica para un tier
#[derive(Debug, Clone, PartialEq)]
pub struct TierRanges {
    pub latency_ms: RangeInclusive<f64>,
    pub throughput: RangeInclusive<f64>,
    pub memory_mb: RangeInclusive<f64>,
    pub accuracy: RangeInclusive<f64>,
}

impl Tier {
    /// Clasifica un nombre de modelo (case-insensitive)
    ///
    /// "large" tiene prioridad sobre "medium"; cualquier otro nombre cae en
    /// `Small`.
    pub fn classify(model_name: &str) -> Self {
        let name = model_name.to_lowercase();
        if name.contains("large") {
            Tier::Large
        } else if name.contains("medium") {
            Tier::Medium
        } else {
            Tier::Small
        }
    }

    pub fn ranges(&self) -> TierRanges {
        match self {
            Tier::Large => TierRanges {
                latency_ms: 50.0..=100.0,
                throughput: 10.0..=20.0,
                memory_mb: 400.0..=800.0,
                accuracy: 0.85..=0.95,
            },
            Tier::Medium => TierRanges {
                latency_ms: 20.0..=50.0,
                throughput: 20.0..=40.0,
                memory_mb: 200.0..=400.0,
                accuracy: 0.75..=0.85,
            },
            Tier::Small => TierRanges {
                latency_ms: 5.0..=20.0,
                throughput: 40.0..=80.0,
                memory_mb: 50.0..=200.0,
                accuracy: 0.65..=0.75,
            },
        }
    }
}

impl TierRanges {
    /// Verifica si un bundle cae dentro de los rangos
    pub fn contains(&self, metrics: &MetricsBundle) -> bool {
        self.latency_ms.contains(&metrics.average_latency)
            && self.throughput.contains(&metrics.throughput)
            && self.memory_mb.contains(&metrics.memory_usage)
            && self.accuracy.contains(&metrics.accuracy)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MetricsBundle {
        MetricsBundle {
            average_latency: rng.gen_range(self.latency_ms.clone()),
            throughput: rng.gen_range(self.throughput.clone()),
            memory_usage: rng.gen_range(self.memory_mb.clone()),
            accuracy: rng.gen_range(self.accuracy.clone()),
        }
    }
}

/// Fuente de aleatoriedad del estimador
enum Source {
    Thread,
    Seeded(Mutex<StdRng>),
}

/// Estimador por tiers (implementación por defecto)
///
/// `batch_size` se acepta pero todavía no escala las métricas.
pub struct TieredEstimator {
    source: Source,
}

impl TieredEstimator {
    /// Usa el RNG del thread actual
    pub fn new() -> Self {
        Self {
            source: Source::Thread,
        }
    }

    /// Usa un RNG con semilla fija: misma secuencia de métricas en cada corrida
    pub fn with_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl Default for TieredEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricEstimator for TieredEstimator {
    fn estimate(&self, model_name: &str, _batch_size: u32) -> Result<MetricsBundle, JobError> {
        let ranges = Tier::classify(model_name).ranges();

        let metrics = match &self.source {
            Source::Thread => ranges.sample(&mut rand::thread_rng()),
            Source::Seeded(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                ranges.sample(&mut *rng)
            }
        };

        Ok(metrics)
    }
}
