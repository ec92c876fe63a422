//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Identifier of a two-level position ("wire") in a simulated circuit.
/// Wires are ordered by id; the lowest id maps to the most significant bit
/// of a basis-state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(pub u64);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Every failure the analysis pipeline can report.
///
/// Variants are raised by the component that detects them and propagate
/// unchanged up to the triggering action; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)] // Eq useful for testing error variants
pub enum FinderError {
    /// The color value is not a `#RRGGBB` hex string.
    #[error("Color Parse Error ({input:?}): {message}")]
    ColorParse {
        /// The rejected input, verbatim
        input: String,
        /// What was wrong with it
        message: String,
    },

    /// Transport failure while calling the completion endpoint.
    #[error("Network Error: {message}")]
    Network {
        /// Network failure message
        message: String,
    },

    /// The completion endpoint answered with a non-2xx status.
    #[error("HTTP Status Error ({status}): {body}")]
    HttpStatus {
        /// Status code returned by the endpoint
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// The completion response did not carry `choices[0].text`.
    #[error("Malformed Response: {message}")]
    MalformedResponse {
        /// MalformedResponse failure message
        message: String,
    },

    /// The surface has no element with the requested id.
    #[error("UI Precondition Violated: no element '{element}'")]
    UiPrecondition {
        /// The missing element id
        element: String,
    },

    /// An operation is inconsistent with the circuit it belongs to.
    #[error("Invalid Operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// General error encountered during the simulation process itself.
    #[error("Simulation Process Error: {message}")]
    Simulation {
        /// Simulation failure message
        message: String,
    },

    /// A state vector lost normalization.
    #[error("Incoherence Violation: {message}")]
    Incoherence {
        /// Incoherence failure message
        message: String,
    },

    /// The per-action runtime could not be built or its thread died.
    #[error("Runtime Error: {message}")]
    Runtime {
        /// Runtime failure message
        message: String,
    },
}

impl FinderError {
    /// Short stable name of the variant, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            FinderError::ColorParse { .. } => "color_parse",
            FinderError::Network { .. } => "network",
            FinderError::HttpStatus { .. } => "http_status",
            FinderError::MalformedResponse { .. } => "malformed_response",
            FinderError::UiPrecondition { .. } => "ui_precondition",
            FinderError::InvalidOperation { .. } => "invalid_operation",
            FinderError::Simulation { .. } => "simulation",
            FinderError::Incoherence { .. } => "incoherence",
            FinderError::Runtime { .. } => "runtime",
        }
    }
}

impl From<reqwest::Error> for FinderError {
    fn from(err: reqwest::Error) -> Self {
        FinderError::Network { message: err.to_string() }
    }
}
