// src/simulation/mod.rs

//! Runs `connfinder::circuits::Circuit` on a dense state vector.
//! `Simulator` is the entry point; the internal `SimulationEngine` owns the
//! amplitudes and applies gates.

mod results;
pub(crate) mod engine;

pub use results::CircuitResult;

use crate::circuits::Circuit;
use crate::core::FinderError;
use engine::SimulationEngine;
use tracing::trace;

/// Evaluates circuits from the all-zero state.
#[derive(Debug, Default)] // Allows Simulator::default() -> Simulator::new()
pub struct Simulator {}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every operation of `circuit` in order, starting from `|0...0>`,
    /// and returns the full final state.
    ///
    /// # Errors
    /// * `FinderError::Simulation` for an empty circuit or one with too many wires.
    /// * `FinderError::InvalidOperation` for a controlled gate whose control and target coincide.
    pub fn run(&self, circuit: &Circuit) -> Result<CircuitResult, FinderError> {
        if circuit.is_empty() {
            return Err(FinderError::Simulation { message: "Cannot evaluate an empty circuit".to_string() });
        }

        let mut engine = SimulationEngine::init(circuit.wires())?;
        for op in circuit.operations() {
            trace!(?op, "applying operation");
            engine.apply_operation(op)?;
        }

        let wires = circuit.wires().iter().copied().collect();
        Ok(CircuitResult::new(wires, engine.into_state()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::engine::SimulationEngine;
    use crate::core::*;
    use crate::operations::Operation;
    use crate::CircuitBuilder;
    use num_complex::Complex;
    use num_traits::Zero;
    use std::collections::BTreeSet;
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    const TEST_TOLERANCE: f64 = 1e-9;

    fn wid(id: u64) -> WireId {
        WireId(id)
    }

    /// Asserts that two complex state vectors are approximately equal component-wise.
    fn assert_complex_vec_approx_equal(
        actual: &[Complex<f64>],
        expected: &[Complex<f64>],
        tolerance: f64,
        context: &str,
    ) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < tolerance * tolerance,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, DistSq: {:.3e}, Context: {}",
                i, actual[i], expected[i], dist_sq, context
            );
        }
    }

    fn basis(dim: usize, k: usize) -> Vec<Complex<f64>> {
        let mut v = vec![Complex::zero(); dim];
        v[k] = Complex::new(1.0, 0.0);
        v
    }

    #[test]
    fn test_engine_starts_in_all_zero_state() -> Result<(), FinderError> {
        let wires: BTreeSet<WireId> = [wid(0), wid(1), wid(2)].into_iter().collect();
        let engine = SimulationEngine::init(&wires)?;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &basis(8, 0), TEST_TOLERANCE, "initial |000>");
        Ok(())
    }

    #[test]
    fn test_cnot_on_non_adjacent_middle_wires() -> Result<(), FinderError> {
        // Four wires, flip wire 1 then CNOT 1 -> 3: |0100> -> |0101>
        let wires: BTreeSet<WireId> = (0..4).map(wid).collect();
        let mut engine = SimulationEngine::init(&wires)?;
        engine.apply_operation(&Operation::PauliX { target: wid(1) })?;
        engine.apply_operation(&Operation::ControlledNot { control: wid(1), target: wid(3) })?;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &basis(16, 0b0101), TEST_TOLERANCE, "CNOT 1->3");

        // Reverse direction with the control below the target: |0001> -> |0011>
        engine.set_state(StateVector::new(basis(16, 0b0001)))?;
        engine.apply_operation(&Operation::ControlledNot { control: wid(3), target: wid(2) })?;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &basis(16, 0b0011), TEST_TOLERANCE, "CNOT 3->2");
        Ok(())
    }

    #[test]
    fn test_cnot_leaves_control_zero_untouched() -> Result<(), FinderError> {
        let wires: BTreeSet<WireId> = (0..3).map(wid).collect();
        let mut engine = SimulationEngine::init(&wires)?;
        engine.set_state(StateVector::new(basis(8, 0b001)))?;
        engine.apply_operation(&Operation::ControlledNot { control: wid(0), target: wid(2) })?;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &basis(8, 0b001), TEST_TOLERANCE, "control |0>");
        Ok(())
    }

    #[test]
    fn test_bell_pair_from_rotation_and_cnot() -> Result<(), FinderError> {
        // RY(pi/2) on wire 0 gives (|0> + |1>)/sqrt2, CNOT spreads it to (|00> + |11>)/sqrt2
        let circuit = CircuitBuilder::new().ry(wid(0), PI / 2.0).cnot(wid(0), wid(1)).build();
        let result = Simulator::new().run(&circuit)?;

        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        let expected = vec![h, Complex::zero(), Complex::zero(), h];
        assert_complex_vec_approx_equal(result.amplitudes(), &expected, TEST_TOLERANCE, "Bell pair");
        Ok(())
    }

    #[test]
    fn test_phase_shift_only_touches_one_component() -> Result<(), FinderError> {
        let circuit = CircuitBuilder::new()
            .ry(wid(0), PI / 2.0)
            .add_op(Operation::PhaseShift { target: wid(0), theta: PI })
            .build();
        let result = Simulator::new().run(&circuit)?;

        let expected = vec![Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(-FRAC_1_SQRT_2, 0.0)];
        assert_complex_vec_approx_equal(result.amplitudes(), &expected, TEST_TOLERANCE, "phase pi on |1>");
        Ok(())
    }

    #[test]
    fn test_set_state_rejects_wrong_dimension() -> Result<(), FinderError> {
        let wires: BTreeSet<WireId> = [wid(0)].into_iter().collect();
        let mut engine = SimulationEngine::init(&wires)?;
        let err = engine.set_state(StateVector::new(basis(4, 0)));
        assert!(matches!(err, Err(FinderError::Simulation { .. })));
        Ok(())
    }
}
