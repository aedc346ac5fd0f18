//! Log sampling for high-volume scenarios
//!
//! Caps repetitive output: within each tick, the first `initial` entries with
//! a given level and message are written, then only every `thereafter`-th.
//! Counting happens at check time, so a sampled-out call never reaches the
//! encoder.
//!
//! # Example
//!
//! ```
//! use kvlog::{Logger, SamplingConfig};
//!
//! let logger = Logger::builder()
//!     .sampling(SamplingConfig {
//!         initial: 100,
//!         thereafter: 100,
//!         tick_ms: 1000,
//!     })
//!     .build();
//! ```

use super::entry::Entry;
use super::error::Result;
use super::field::Field;
use super::level::Level;
use super::pipeline::Core;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

const BUCKETS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Entries per (level, message) always written within a tick.
    pub initial: u64,

    /// After `initial`, write every n-th entry. Zero drops the rest.
    pub thereafter: u64,

    /// Counter reset interval in milliseconds.
    pub tick_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            initial: 100,
            thereafter: 100,
            tick_ms: 1000,
        }
    }
}

/// Metrics for sampling observability
#[derive(Debug, Default)]
pub struct SamplerMetrics {
    sampled_count: AtomicU64,
    dropped_count: AtomicU64,
}

impl SamplerMetrics {
    #[inline]
    pub fn sampled_count(&self) -> u64 {
        self.sampled_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.sampled_count() + self.dropped_count()
    }
}

#[derive(Debug, Default)]
struct Counter {
    reset_at: AtomicU64,
    count: AtomicU64,
}

impl Counter {
    /// Bump the counter, starting a new tick first if the current one is over.
    fn incr(&self, now: u64, tick: u64) -> u64 {
        let reset_at = self.reset_at.load(Ordering::Acquire);
        if reset_at > now {
            return self.count.fetch_add(1, Ordering::Relaxed) + 1;
        }

        self.count.store(1, Ordering::Relaxed);
        if self
            .reset_at
            .compare_exchange(
                reset_at,
                now.saturating_add(tick),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            // Another thread started the tick; count within it.
            return self.count.fetch_add(1, Ordering::Relaxed) + 1;
        }
        1
    }
}

struct SamplerState {
    config: SamplingConfig,
    started: Instant,
    counters: Vec<Counter>,
    metrics: Arc<SamplerMetrics>,
}

impl SamplerState {
    fn counter(&self, level: Level, message: &str) -> &Counter {
        let bucket = (fnv1a(message) as usize) % BUCKETS;
        &self.counters[level as usize * BUCKETS + bucket]
    }

    fn sample(&self, entry: &Entry) -> bool {
        let now = self.started.elapsed().as_nanos() as u64;
        let tick = self.config.tick_ms.saturating_mul(1_000_000);
        let n = self.counter(entry.level, &entry.message).incr(now, tick);

        let keep = n <= self.config.initial
            || (self.config.thereafter > 0 && (n - self.config.initial) % self.config.thereafter == 0);

        if keep {
            self.metrics.sampled_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.metrics.dropped_count.fetch_add(1, Ordering::Relaxed);
        }
        keep
    }
}

fn fnv1a(s: &str) -> u32 {
    const OFFSET: u32 = 2_166_136_261;
    const PRIME: u32 = 16_777_619;
    s.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ byte as u32).wrapping_mul(PRIME))
}

/// Wraps a core and drops repetitive entries. Derived cores share counters.
#[derive(Clone)]
pub struct SamplerCore {
    inner: Arc<dyn Core>,
    state: Arc<SamplerState>,
}

impl SamplerCore {
    pub fn new(inner: Arc<dyn Core>, config: SamplingConfig) -> Self {
        let counters = (0..Level::ALL.len() * BUCKETS)
            .map(|_| Counter::default())
            .collect();
        Self {
            inner,
            state: Arc::new(SamplerState {
                config,
                started: Instant::now(),
                counters,
                metrics: Arc::default(),
            }),
        }
    }

    pub fn metrics(&self) -> &SamplerMetrics {
        &self.state.metrics
    }

    /// Handle to the counters that outlives this core.
    pub fn shared_metrics(&self) -> Arc<SamplerMetrics> {
        Arc::clone(&self.state.metrics)
    }
}

impl Core for SamplerCore {
    fn enabled(&self, level: Level) -> bool {
        self.inner.enabled(level)
    }

    fn check(&self, entry: &Entry) -> bool {
        self.inner.check(entry) && self.state.sample(entry)
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn Core> {
        Arc::new(Self {
            inner: self.inner.with(fields),
            state: Arc::clone(&self.state),
        })
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()> {
        self.inner.write(entry, fields)
    }

    fn sync(&self) -> Result<()> {
        self.inner.sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::{EncoderConfig, KeyValueEncoder};
    use crate::core::pipeline::IoCore;
    use crate::sinks::MemorySink;

    fn sampler(config: SamplingConfig) -> SamplerCore {
        let io = IoCore::new(
            KeyValueEncoder::new(EncoderConfig::default()),
            Arc::new(MemorySink::new()),
            Level::Debug,
        );
        SamplerCore::new(Arc::new(io), config)
    }

    fn long_tick(initial: u64, thereafter: u64) -> SamplingConfig {
        SamplingConfig {
            initial,
            thereafter,
            tick_ms: 3_600_000,
        }
    }

    #[test]
    fn test_initial_then_every_nth() {
        let core = sampler(long_tick(2, 3));
        let entry = Entry::new(Level::Info, "repeated");
        let kept: Vec<bool> = (0..8).map(|_| core.check(&entry)).collect();
        // n = 1..=8: keep 1, 2, then 5 and 8.
        assert_eq!(kept, vec![true, true, false, false, true, false, false, true]);
        assert_eq!(core.metrics().sampled_count(), 4);
        assert_eq!(core.metrics().dropped_count(), 4);
        assert_eq!(core.metrics().total_count(), 8);
    }

    #[test]
    fn test_messages_and_levels_counted_separately() {
        let core = sampler(long_tick(1, 0));
        assert!(core.check(&Entry::new(Level::Info, "a")));
        assert!(!core.check(&Entry::new(Level::Info, "a")));
        assert!(core.check(&Entry::new(Level::Warn, "a")));
        assert!(core.check(&Entry::new(Level::Info, "b")));
    }

    #[test]
    fn test_tick_resets_counts() {
        let core = sampler(SamplingConfig {
            initial: 1,
            thereafter: 0,
            tick_ms: 20,
        });
        let entry = Entry::new(Level::Info, "tick");
        assert!(core.check(&entry));
        assert!(!core.check(&entry));
        std::thread::sleep(std::time::Duration::from_millis(40));
        assert!(core.check(&entry));
    }

    #[test]
    fn test_unbounded_tick_never_resets() {
        let core = sampler(SamplingConfig {
            initial: 1,
            thereafter: 0,
            tick_ms: u64::MAX,
        });
        let entry = Entry::new(Level::Info, "same");
        let kept: Vec<bool> = (0..3).map(|_| core.check(&entry)).collect();
        assert_eq!(kept, vec![true, false, false]);
        assert_eq!(core.metrics().dropped_count(), 2);
    }

    #[test]
    fn test_derived_cores_share_counters() {
        let core = sampler(long_tick(1, 0));
        let child = core.with(&[Field::string("k", "v")]);
        let entry = Entry::new(Level::Info, "shared");
        assert!(core.check(&entry));
        assert!(!child.check(&entry));
    }
}
