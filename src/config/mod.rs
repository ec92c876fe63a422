// src/config/mod.rs

//! Runtime configuration, passed explicitly into the pipeline.

use crate::insight::InsightSettings;
use crate::ui::INSIGHTS_LABEL;
use std::time::Duration;

/// Color the trigger control submits when none is given.
pub const DEFAULT_TRIGGER_COLOR: &str = "#FF5733";

/// Everything a `ConnectionAnalyzer` needs.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Completion endpoint, credential, token cap and timeout.
    pub insight: InsightSettings,
    /// Simulated round-trip wait before metrics are produced.
    pub fetch_delay: Duration,
    /// Fixed seed for the metrics noise; `None` draws a fresh seed per trigger.
    pub seed: Option<u64>,
    /// Element that receives the insight text.
    pub target_element: String,
}

impl FinderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            insight: InsightSettings::new(api_key),
            fetch_delay: crate::metrics::DEFAULT_FETCH_DELAY,
            seed: None,
            target_element: INSIGHTS_LABEL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.insight = self.insight.with_endpoint(endpoint);
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.insight.timeout = timeout;
        self
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        // Placeholder credential; real runs pass one in.
        Self::new("your_api_key")
    }
}
