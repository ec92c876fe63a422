// src/operations/mod.rs

//! Gate operations that can appear in a circuit.
//!
//! The set is deliberately small: the metrics encoding only needs Y rotations
//! and controlled-NOTs, with a phase shift and a bit flip kept for building
//! and testing other circuits on the same simulator.

use crate::core::WireId;

/// A single gate applied to one or two wires.
#[derive(Debug, Clone, PartialEq)] // Using PartialEq for simplicity; f64 comparison needs care in practice.
pub enum Operation {
    /// Rotation about the Y axis by `theta` radians.
    ///
    /// Matrix: `[[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]`.
    RotateY {
        /// The wire being rotated.
        target: WireId,
        /// Rotation angle in radians.
        theta: f64,
    },

    /// Applies the phase `e^(iθ)` to the `|1>` component of a wire.
    PhaseShift {
        target: WireId,
        theta: f64,
    },

    /// Bit flip (Pauli X).
    PauliX {
        target: WireId,
    },

    /// Flips `target` when `control` is `|1>`.
    ControlledNot {
        /// The wire whose value conditions the flip.
        control: WireId,
        /// The wire that is flipped.
        target: WireId,
    },
}

impl Operation {
    /// Returns the wires this operation acts on, control first for two-wire gates.
    pub fn involved_wires(&self) -> Vec<WireId> {
        match self {
            Operation::RotateY { target, .. } => vec![*target],
            Operation::PhaseShift { target, .. } => vec![*target],
            Operation::PauliX { target } => vec![*target],
            Operation::ControlledNot { control, target } => vec![*control, *target],
        }
    }
}
