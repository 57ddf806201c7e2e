//! Logging and in-process metrics for LearnHub search tools
//!
//! - `tracing` output on stderr, compact or JSON, filtered by `RUST_LOG` or
//!   the configured level
//! - Named counters and millisecond timings, exported as a [`MetricsSnapshot`]
//! - A session ID attached to the startup event and the snapshot

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Logging setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directives used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit one JSON object per event instead of compact text
    pub json: bool,
    /// Include the event target in compact output
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            show_target: false,
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Fails if a global
/// subscriber is already installed.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_ansi(false))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(config.show_target)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        json = config.json,
        "Logging initialized"
    );

    Ok(())
}

/// ID of this process run
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Process-wide registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

/// Named counters and timing samples
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, AtomicU64>>,
    timings: RwLock<HashMap<String, Vec<f64>>>,
    started: Instant,
}

impl MetricsRegistry {
    fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            timings: RwLock::new(HashMap::new()),
            started: Instant::now(),
        }
    }

    /// Add one to a counter
    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    /// Add `value` to a counter, creating it at zero
    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            counter.fetch_add(value, Ordering::Relaxed);
            return;
        }

        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Current value of a counter (0 if never touched)
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Record one duration sample
    pub fn record(&self, name: &str, duration: Duration) {
        self.timings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .push(duration.as_secs_f64() * 1000.0);
    }

    /// Summary of a timing, if any sample was recorded
    pub fn timing(&self, name: &str) -> Option<TimingStats> {
        self.timings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .and_then(|samples| TimingStats::from_samples(samples))
    }

    /// Copy of every counter and timing summary, sorted by name
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, value)| (name.clone(), value.load(Ordering::Relaxed)))
            .collect();

        let timings = self
            .timings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|(name, samples)| {
                TimingStats::from_samples(samples).map(|stats| (name.clone(), stats))
            })
            .collect();

        MetricsSnapshot {
            session_id: session_id().to_string(),
            uptime_ms: self.started.elapsed().as_millis(),
            counters,
            timings,
        }
    }
}

/// Point-in-time copy of a [`MetricsRegistry`]
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub session_id: String,
    pub uptime_ms: u128,
    pub counters: BTreeMap<String, u64>,
    pub timings: BTreeMap<String, TimingStats>,
}

/// Summary of the samples of one timing, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingStats {
    pub samples: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
}

impl TimingStats {
    fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let last = sorted.len() - 1;
        let rank = |p: f64| sorted[((p * last as f64).round() as usize).min(last)];

        Some(Self {
            samples: sorted.len(),
            min_ms: sorted[0],
            max_ms: sorted[last],
            mean_ms: sorted.iter().sum::<f64>() / sorted.len() as f64,
            p50_ms: rank(0.5),
            p95_ms: rank(0.95),
        })
    }
}

/// Records the time until [`Timer::stop`] or drop, whichever comes first
pub struct Timer {
    name: String,
    start: Instant,
    recorded: bool,
}

impl Timer {
    /// Start timing `name`
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Record and return the elapsed time
    pub fn stop(mut self) -> Duration {
        self.finish()
    }

    fn finish(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        if !self.recorded {
            self.recorded = true;
            metrics().record(&self.name, elapsed);
            tracing::debug!(timing = %self.name, elapsed_us = elapsed.as_micros() as u64, "Timer stopped");
        }
        elapsed
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.finish();
    }
}
