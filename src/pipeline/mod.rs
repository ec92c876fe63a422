// src/pipeline/mod.rs

//! Wires producer, encoder, requester and presenter together per trigger.
//!
//! Each trigger runs on its own OS thread inside a freshly built
//! current-thread tokio runtime that is dropped once the action finishes.
//! Triggers are independent: nothing serializes them, so when two overlap the
//! label ends up with whichever insight arrives last.

use crate::config::FinderConfig;
use crate::core::FinderError;
use crate::encoder::StateEncoder;
use crate::insight::InsightRequester;
use crate::metrics::{MetricsProducer, MetricsRecord};
use crate::simulation::CircuitResult;
use crate::ui::UiHandle;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{Instrument, debug, info, info_span, warn};

/// Everything one finished action produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub action_id: u64,
    pub record: MetricsRecord,
    pub circuit: CircuitResult,
    pub insight: String,
}

impl AnalysisOutcome {
    /// Serializable digest: the record, the insight and the dominant basis state.
    pub fn summary(&self) -> OutcomeSummary {
        let (index, probability) = self.circuit.dominant_state().unwrap_or((0, 0.0));
        OutcomeSummary {
            action_id: self.action_id,
            record: self.record.clone(),
            dominant_state: self.circuit.basis_label(index),
            dominant_probability: probability,
            insight: self.insight.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeSummary {
    pub action_id: u64,
    pub record: MetricsRecord,
    pub dominant_state: String,
    pub dominant_probability: f64,
    pub insight: String,
}

/// Runs the fetch, encode and request steps for one color.
///
/// Encoding happens before the request, so a malformed color fails without
/// touching the network.
pub async fn analyze(
    action_id: u64,
    color: &str,
    producer: &mut MetricsProducer,
    encoder: &StateEncoder,
    requester: &InsightRequester,
) -> Result<AnalysisOutcome, FinderError> {
    let record = producer.fetch(color).await;
    let circuit = encoder.encode(&record)?;
    if let Some((k, p)) = circuit.dominant_state() {
        info!(dominant = %circuit.basis_label(k), probability = p, "circuit evaluated");
    }

    let insight = requester.request(&record).await?;
    Ok(AnalysisOutcome { action_id, record, circuit, insight })
}

/// Completion handle for a triggered action.
#[derive(Debug)]
pub struct ActionHandle {
    action_id: u64,
    thread: JoinHandle<Result<AnalysisOutcome, FinderError>>,
}

impl ActionHandle {
    pub fn action_id(&self) -> u64 {
        self.action_id
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the action and returns its outcome.
    pub fn join(self) -> Result<AnalysisOutcome, FinderError> {
        self.thread.join().map_err(|_| FinderError::Runtime {
            message: format!("action {} panicked", self.action_id),
        })?
    }
}

/// Entry point behind the trigger control.
#[derive(Debug, Clone)]
pub struct ConnectionAnalyzer {
    config: FinderConfig,
    requester: InsightRequester,
    ui: UiHandle,
    next_action: Arc<AtomicU64>,
}

impl ConnectionAnalyzer {
    /// Analyzer talking HTTP to the configured completion endpoint.
    pub fn new(config: FinderConfig, ui: UiHandle) -> Result<Self, FinderError> {
        let requester = InsightRequester::from_settings(&config.insight)?;
        Ok(Self::with_requester(config, requester, ui))
    }

    /// Analyzer over a caller-supplied requester.
    pub fn with_requester(config: FinderConfig, requester: InsightRequester, ui: UiHandle) -> Self {
        Self {
            config,
            requester,
            ui,
            next_action: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Starts one action for `color` and returns immediately.
    ///
    /// The outcome is delivered twice: as a `UiCommand` to the surface (the
    /// insight, or an error message) and through the returned handle.
    pub fn trigger(&self, color: &str) -> Result<ActionHandle, FinderError> {
        let action_id = self.next_action.fetch_add(1, Ordering::Relaxed);
        let color = color.to_string();
        let requester = self.requester.clone();
        let ui = self.ui.clone();
        let element = self.config.target_element.clone();
        let mut producer = match self.config.seed {
            Some(seed) => MetricsProducer::with_seed(seed),
            None => MetricsProducer::new(),
        }
        .with_delay(self.config.fetch_delay);

        let thread = thread::Builder::new()
            .name(format!("connfinder-action-{}", action_id))
            .spawn(move || {
                let span = info_span!("action", id = action_id, color = %color);
                let run = panic::catch_unwind(AssertUnwindSafe(|| {
                    let fut = run_once(action_id, &color, &mut producer, &requester).instrument(span.clone());
                    block_on_fresh_runtime(fut)
                }));
                let result = run.unwrap_or_else(|payload| {
                    Err(FinderError::Runtime {
                        message: format!("action {} panicked: {}", action_id, panic_message(payload.as_ref())),
                    })
                });

                let _entered = span.enter();
                match &result {
                    Ok(outcome) => {
                        if !ui.set_text(&element, outcome.insight.clone()) {
                            warn!("surface closed before the insight arrived");
                        }
                    }
                    Err(err) => {
                        warn!(kind = err.kind(), error = %err, "action failed");
                        if !ui.show_error(&element, format!("Analysis failed: {}", err)) {
                            warn!("surface closed before the error could be shown");
                        }
                    }
                }
                result
            })
            .map_err(|e| FinderError::Runtime { message: format!("spawning action thread: {}", e) })?;

        debug!(action_id, "action started");
        Ok(ActionHandle { action_id, thread })
    }
}

async fn run_once(
    action_id: u64,
    color: &str,
    producer: &mut MetricsProducer,
    requester: &InsightRequester,
) -> Result<AnalysisOutcome, FinderError> {
    let encoder = StateEncoder::new();
    analyze(action_id, color, producer, &encoder, requester).await
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Builds a single-use current-thread runtime, drives `fut` to completion and tears it down.
fn block_on_fresh_runtime<F>(fut: F) -> Result<AnalysisOutcome, FinderError>
where
    F: std::future::Future<Output = Result<AnalysisOutcome, FinderError>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| FinderError::Runtime { message: format!("building action runtime: {}", e) })?;
    runtime.block_on(fut)
}
