// src/core/state.rs

use num_complex::Complex;
use std::fmt;

/// Dense amplitude vector over `2^n` basis states.
///
/// Index `k` is the basis state whose binary digits (most significant first)
/// are the values of wires in ascending id order.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    /// Wraps an amplitude vector as is. Normalization is checked by `validation`, not here.
    pub(crate) fn new(amplitudes: Vec<Complex<f64>>) -> Self {
        Self { amplitudes }
    }

    /// Provides read-only access to the amplitudes.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Number of basis states represented.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Consumes the state, returning the raw amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex<f64>> {
        self.amplitudes
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
