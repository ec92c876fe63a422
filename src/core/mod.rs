// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod state;
pub mod color;

// Re-export public types for convenient access via `connfinder::core::TypeName`
pub use error::{FinderError, WireId};
pub use state::StateVector;
pub use color::HexColor;

pub mod constants;
pub use constants::encoding::{WIRE_COUNT, PING_SCALE, RATE_SCALE}; // Re-export
