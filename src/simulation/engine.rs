// src/simulation/engine.rs
use crate::core::{FinderError, StateVector, WireId};
use crate::operations::Operation;
// NOTE: Does not directly use Circuit, operates on ops passed from Simulator
use num_complex::Complex;
use num_traits::{One, Zero};
use std::collections::{BTreeSet, HashMap};

/// Dense state-vector engine evolving `2^N` amplitudes for N wires.
/// (Internal visibility)
pub(crate) struct SimulationEngine {
    /// Maps wire ids to their index (0..N-1); index 0 is the most significant bit.
    wire_indices: HashMap<WireId, usize>,
    /// The global state over all wires.
    state: StateVector,
    /// Number of wires being simulated (N).
    num_wires: usize,
}

impl SimulationEngine {
    /// Initializes the engine in `|0...0>` over the given wires.
    pub(crate) fn init(wires: &BTreeSet<WireId>) -> Result<Self, FinderError> {
        if wires.is_empty() {
            return Err(FinderError::InvalidOperation { message: "Cannot initialize simulation engine with zero wires".to_string() });
        }

        let num_wires = wires.len();
        let dim = u32::try_from(num_wires)
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .ok_or_else(|| FinderError::Simulation { message: format!("{} wires overflow the state vector dimension", num_wires) })?;

        // BTreeSet iteration is sorted, so index assignment is deterministic.
        let wire_indices: HashMap<WireId, usize> = wires.iter().enumerate().map(|(index, w)| (*w, index)).collect();

        let mut initial = vec![Complex::zero(); dim];
        initial[0] = Complex::one();

        Ok(Self {
            wire_indices,
            state: StateVector::new(initial),
            num_wires,
        })
    }

    #[cfg(test)] // Only compile this function when running tests
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<(), FinderError> {
        if state.dim() != self.state.dim() {
            Err(FinderError::Simulation {
                message: format!("Cannot set state: provided dimension {} does not match engine dimension {}", state.dim(), self.state.dim())
            })
        } else {
            self.state = state;
            Ok(())
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    pub(crate) fn into_state(self) -> StateVector {
        self.state
    }

    /// Applies a single operation to the global state.
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<(), FinderError> {
        match op {
            Operation::RotateY { target, theta } => {
                let target_idx = self.wire_index(target)?;
                self.apply_single_wire_gate(target_idx, &rotate_y_matrix(*theta))?;
            }
            Operation::PhaseShift { target, theta } => {
                let target_idx = self.wire_index(target)?;
                self.apply_single_wire_gate(target_idx, &phase_shift_matrix(*theta))?;
            }
            Operation::PauliX { target } => {
                let target_idx = self.wire_index(target)?;
                self.apply_single_wire_gate(target_idx, &pauli_x_matrix())?;
            }
            Operation::ControlledNot { control, target } => {
                let control_idx = self.wire_index(control)?;
                let target_idx = self.wire_index(target)?;

                if control_idx == target_idx {
                    return Err(FinderError::InvalidOperation { message: format!("Control and target cannot both be {} for a controlled-NOT", control) });
                }

                // Basis order: |control, target> -> |00>, |01>, |10>, |11>
                let x = pauli_x_matrix();
                let cnot: [[Complex<f64>; 4]; 4] = [
                    // Control |0> subspace: Identity on target
                    [Complex::one(),  Complex::zero(), Complex::zero(), Complex::zero()],
                    [Complex::zero(), Complex::one(),  Complex::zero(), Complex::zero()],
                    // Control |1> subspace: flip target
                    [Complex::zero(), Complex::zero(), x[0][0],         x[0][1]        ],
                    [Complex::zero(), Complex::zero(), x[1][0],         x[1][1]        ],
                ];
                self.apply_two_wire_gate(control_idx, target_idx, &cnot)?;
            }
        };
        Ok(())
    }

    fn wire_index(&self, wire: &WireId) -> Result<usize, FinderError> {
        self.wire_indices
            .get(wire)
            .copied()
            .ok_or_else(|| FinderError::InvalidOperation { message: format!("Wire {} not found in simulation context", wire) })
    }

    /// Bit position (from the right, 0-based) of the wire at `index`.
    fn bit_position(&self, index: usize) -> usize {
        self.num_wires - 1 - index
    }

    /// Applies a 2x2 matrix to one wire.
    fn apply_single_wire_gate(&mut self, target_idx: usize, matrix: &[[Complex<f64>; 2]; 2]) -> Result<(), FinderError> {
        let k = self.bit_position(target_idx);
        let k_mask = 1usize << k;

        let amps = self.state.amplitudes();
        let dim = amps.len();
        let mut new_vec = vec![Complex::zero(); dim];

        // Iterate over pairs of basis states differing only at the target bit
        for i in 0..dim / 2 {
            let i0 = insert_zero_bit(i, k);
            let i1 = i0 | k_mask;
            if i1 >= dim {
                return Err(FinderError::Simulation { message: format!("Index out of bounds during single-wire gate. i0={}, i1={}, dim={}", i0, i1, dim) });
            }

            let psi_0 = amps[i0];
            let psi_1 = amps[i1];
            new_vec[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            new_vec[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }

        self.state = StateVector::new(new_vec);
        Ok(())
    }

    /// Applies a 4x4 matrix to two wires. Rows and columns of `matrix` are
    /// ordered `|b1 b2>` with `b1` the wire at `idx1` and `b2` the wire at `idx2`.
    fn apply_two_wire_gate(
        &mut self,
        idx1: usize,
        idx2: usize,
        matrix: &[[Complex<f64>; 4]; 4],
    ) -> Result<(), FinderError> {
        if idx1 == idx2 {
            return Err(FinderError::InvalidOperation { message: "Target indices for a two-wire gate cannot be the same".to_string() });
        }

        let k1 = self.bit_position(idx1);
        let k2 = self.bit_position(idx2);
        let (k_hi, k_lo) = (k1.max(k2), k1.min(k2));

        let amps = self.state.amplitudes();
        let dim = amps.len();
        let mut new_vec = vec![Complex::zero(); dim];

        // Every combination of the other N-2 wires
        for i_other in 0..dim / 4 {
            // Insert the lower gap first so the higher position is measured in final coordinates.
            let i_base = insert_zero_bit(insert_zero_bit(i_other, k_lo), k_hi);
            let indices = [
                i_base,                          // 00
                i_base | (1 << k2),              // 01
                i_base | (1 << k1),              // 10
                i_base | (1 << k1) | (1 << k2),  // 11
            ];
            if indices[3] >= dim {
                return Err(FinderError::Simulation { message: format!("Index out of bounds during two-wire gate. Index={}, dim={}", indices[3], dim) });
            }

            let psi = indices.map(|idx| amps[idx]);
            for (row, &idx) in indices.iter().enumerate() {
                new_vec[idx] = matrix[row].iter().zip(psi.iter()).map(|(m, p)| m * p).sum();
            }
        }

        self.state = StateVector::new(new_vec);
        Ok(())
    }
}

/// Spreads `value` apart at bit `pos`, leaving a zero there.
fn insert_zero_bit(value: usize, pos: usize) -> usize {
    let lower = value & ((1usize << pos) - 1);
    ((value >> pos) << (pos + 1)) | lower
}

/// `RY(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]`
fn rotate_y_matrix(theta: f64) -> [[Complex<f64>; 2]; 2] {
    let (sin_a, cos_a) = (theta / 2.0).sin_cos();
    [
        [Complex::new(cos_a, 0.0), Complex::new(-sin_a, 0.0)],
        [Complex::new(sin_a, 0.0), Complex::new(cos_a, 0.0)],
    ]
}

/// Applies `e^(iθ)` to the `|1>` component.
fn phase_shift_matrix(theta: f64) -> [[Complex<f64>; 2]; 2] {
    [
        [Complex::one(), Complex::zero()],
        [Complex::zero(), Complex::from_polar(1.0, theta)],
    ]
}

fn pauli_x_matrix() -> [[Complex<f64>; 2]; 2] {
    [
        [Complex::zero(), Complex::one()],
        [Complex::one(), Complex::zero()],
    ]
}
