// src/metrics/mod.rs

//! Synthesizes noisy link measurements for a color value.
//!
//! Nothing here touches the network: `fetch` waits a fixed delay to stand in
//! for a round trip, then draws Gaussian noise around nominal figures.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Nominal ping in milliseconds.
pub const PING_MEAN_MS: f64 = 20.0;
/// Standard deviation of the ping noise.
pub const PING_SIGMA_MS: f64 = 5.0;
/// Nominal download rate in bits per second.
pub const DOWNLOAD_MEAN_BPS: f64 = 100e6;
pub const DOWNLOAD_SIGMA_BPS: f64 = 10e6;
/// Nominal upload rate in bits per second.
pub const UPLOAD_MEAN_BPS: f64 = 50e6;
pub const UPLOAD_SIGMA_BPS: f64 = 5e6;

/// Default simulated round-trip wait.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_secs(1);

/// One synthesized set of link measurements, tagged with the color it was requested for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// The `#RRGGBB` value as supplied by the trigger; validated later by the encoder.
    pub color: String,
    pub ping_ms: f64,
    pub download_bps: f64,
    pub upload_bps: f64,
}

/// Draws `MetricsRecord`s from a seeded generator.
#[derive(Debug)]
pub struct MetricsProducer {
    rng: StdRng,
    delay: Duration,
}

impl MetricsProducer {
    /// Producer seeded from the thread-local entropy source, with the default delay.
    pub fn new() -> Self {
        Self::with_seed(rand::random::<u64>())
    }

    /// Deterministic producer: equal seeds yield equal sequences of records.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            delay: DEFAULT_FETCH_DELAY,
        }
    }

    /// Replaces the simulated round-trip wait. Zero skips the wait entirely.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits the configured delay, then samples a record.
    pub async fn fetch(&mut self, color: &str) -> MetricsRecord {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.sample(color)
    }

    /// Samples a record without waiting. Draw order is ping, download, upload.
    pub fn sample(&mut self, color: &str) -> MetricsRecord {
        let ping_ms = self.gaussian(PING_MEAN_MS, PING_SIGMA_MS);
        let download_bps = self.gaussian(DOWNLOAD_MEAN_BPS, DOWNLOAD_SIGMA_BPS);
        let upload_bps = self.gaussian(UPLOAD_MEAN_BPS, UPLOAD_SIGMA_BPS);
        debug!(color, ping_ms, download_bps, upload_bps, "sampled link metrics");

        MetricsRecord {
            color: color.to_string(),
            ping_ms,
            download_bps,
            upload_bps,
        }
    }

    fn gaussian(&mut self, mean: f64, sigma: f64) -> f64 {
        let z: f64 = StandardNormal.sample(&mut self.rng);
        mean + sigma * z
    }
}

impl Default for MetricsProducer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_values() {
        let a = MetricsProducer::with_seed(42).sample("#FF5733");
        let b = MetricsProducer::with_seed(42).sample("#FF5733");
        assert_eq!(a, b);
        assert_eq!(a.ping_ms.to_bits(), b.ping_ms.to_bits());
    }

    #[test]
    fn reseeded_producer_replays_whole_sequence() {
        let mut a = MetricsProducer::with_seed(9);
        let mut b = MetricsProducer::with_seed(9);
        for _ in 0..5 {
            assert_eq!(a.sample("#FF5733"), b.sample("#FF5733"));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = MetricsProducer::with_seed(1).sample("#000000");
        let b = MetricsProducer::with_seed(2).sample("#000000");
        assert_ne!((a.ping_ms, a.download_bps, a.upload_bps), (b.ping_ms, b.download_bps, b.upload_bps));
    }

    #[test]
    fn values_cluster_around_nominal() {
        let mut producer = MetricsProducer::with_seed(7);
        let n = 2_000;
        let (mut ping, mut down, mut up) = (0.0, 0.0, 0.0);
        for _ in 0..n {
            let r = producer.sample("#123456");
            ping += r.ping_ms;
            down += r.download_bps;
            up += r.upload_bps;
        }
        let n = n as f64;
        // Five standard errors of the mean
        assert!((ping / n - PING_MEAN_MS).abs() < 5.0 * PING_SIGMA_MS / n.sqrt());
        assert!((down / n - DOWNLOAD_MEAN_BPS).abs() < 5.0 * DOWNLOAD_SIGMA_BPS / n.sqrt());
        assert!((up / n - UPLOAD_MEAN_BPS).abs() < 5.0 * UPLOAD_SIGMA_BPS / n.sqrt());
    }

    #[test]
    fn color_is_kept_verbatim() {
        let r = MetricsProducer::with_seed(0).sample("not-a-color");
        assert_eq!(r.color, "not-a-color");
    }
}
