use crate::core::{StateVector, WireId};
use num_complex::Complex;
use std::fmt;

/// Final state of a simulated circuit: one amplitude per basis state.
///
/// Basis index `k` reads its wire values most-significant-first in ascending
/// wire order, so for six wires `k = 0b101000` means wires 0 and 2 are `|1>`.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitResult {
    wires: Vec<WireId>,
    state: StateVector,
}

impl CircuitResult {
    pub(crate) fn new(wires: Vec<WireId>, state: StateVector) -> Self {
        Self { wires, state }
    }

    /// All amplitudes, in basis-index order.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        self.state.amplitudes()
    }

    /// The underlying state vector.
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Wires in the order they map onto bits, most significant first.
    pub fn wires(&self) -> &[WireId] {
        &self.wires
    }

    /// Number of amplitudes (`2^wires`).
    pub fn len(&self) -> usize {
        self.state.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.state.dim() == 0
    }

    /// Squared magnitude of every amplitude.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes().iter().map(|c| c.norm_sqr()).collect()
    }

    /// Sum of squared magnitudes; 1.0 for a normalized state.
    pub fn norm_sqr_sum(&self) -> f64 {
        self.amplitudes().iter().map(|c| c.norm_sqr()).sum()
    }

    /// The most probable basis state and its probability. Ties resolve to the lowest index.
    pub fn dominant_state(&self) -> Option<(usize, f64)> {
        self.amplitudes()
            .iter()
            .map(|c| c.norm_sqr())
            .enumerate()
            .fold(None, |best, (k, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((k, p)),
            })
    }

    /// Renders basis index `k` as a ket over this result's wires, e.g. `|010110>`.
    pub fn basis_label(&self, k: usize) -> String {
        let n = self.wires.len();
        let bits: String = (0..n).map(|i| if (k >> (n - 1 - i)) & 1 == 1 { '1' } else { '0' }).collect();
        format!("|{}>", bits)
    }
}

impl fmt::Display for CircuitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit Result ({} wires, {} amplitudes):", self.wires.len(), self.len())?;
        match self.dominant_state() {
            Some((k, p)) => writeln!(f, "  Dominant: {} p={:.4}", self.basis_label(k), p)?,
            None => writeln!(f, "  Empty state")?,
        }
        // Only list basis states that carry weight
        for (k, c) in self.amplitudes().iter().enumerate() {
            if c.norm_sqr() > 1e-12 {
                writeln!(f, "    {}: {:.4}", self.basis_label(k), c)?;
            }
        }
        Ok(())
    }
}
