// src/lib.rs

//! `connfinder` - employee connection analysis over synthetic link metrics.
//!
//! A trigger produces a noisy metrics record for a color, encodes it into a
//! six-wire rotation/CNOT circuit evaluated on a dense state vector, asks a
//! text-completion endpoint for an insight on the record, and posts the
//! answer to a user surface that applies it on its own thread.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod metrics;
pub mod encoder;
pub mod insight;
pub mod ui;
pub mod config;
pub mod pipeline;

// Re-export the most common types for easier top-level use
pub use crate::core::{FinderError, HexColor, WireId};
pub use operations::Operation;
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{CircuitResult, Simulator};
pub use validation::{check_normalization, validate_state};
pub use metrics::{MetricsProducer, MetricsRecord};
pub use encoder::StateEncoder;
pub use insight::{CompletionTransport, HttpTransport, InsightRequester, InsightSettings};
pub use ui::{UiCommand, UiHandle, UiSurface, INSIGHTS_LABEL};
pub use config::FinderConfig;
pub use pipeline::{ActionHandle, AnalysisOutcome, ConnectionAnalyzer};

// Example 1: Encoding a Metrics Record
// Builds the six-wire circuit for a record and checks the evaluated state.
/// ```
/// use connfinder::{MetricsProducer, StateEncoder, FinderError};
///
/// let record = MetricsProducer::with_seed(7).sample("#FF5733");
/// let encoder = StateEncoder::new();
///
/// let circuit = encoder.build_circuit(&record)?;
/// println!("{}", circuit);
/// assert_eq!(circuit.len(), 11); // six rotations, five CNOTs
///
/// let state = encoder.encode(&record)?;
/// assert_eq!(state.len(), 64);
/// assert!((state.norm_sqr_sum() - 1.0).abs() < 1e-6);
/// # Ok::<(), FinderError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Small Hand-Built Circuit
// Uses the same simulator directly for a Bell pair.
/// ```
/// use connfinder::{CircuitBuilder, Simulator, WireId, FinderError};
/// use std::f64::consts::PI;
///
/// let circuit = CircuitBuilder::new()
///     .ry(WireId(0), PI / 2.0)
///     .cnot(WireId(0), WireId(1))
///     .build();
///
/// let result = Simulator::new().run(&circuit)?;
/// println!("{}", result);
/// let probs = result.probabilities();
/// assert!((probs[0] - 0.5).abs() < 1e-9); // |00>
/// assert!((probs[3] - 0.5).abs() < 1e-9); // |11>
/// # Ok::<(), FinderError>(())
/// ```
#[doc(hidden)]
const _: () = ();
