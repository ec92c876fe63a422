// src/validation/mod.rs

//! Checks on simulated states.

use crate::core::FinderError;
use crate::simulation::CircuitResult;

// Default tolerance (can be overridden by caller)
const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks that squared amplitudes sum to 1.0.
///
/// # Arguments
/// * `result` - The circuit result to check.
/// * `tolerance` - Allowed deviation from 1.0; defaults to `1e-9`.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(FinderError::Incoherence)` otherwise.
pub fn check_normalization(result: &CircuitResult, tolerance: Option<f64>) -> Result<(), FinderError> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq = result.norm_sqr_sum();
    if (norm_sq - 1.0).abs() > effective_tolerance || !norm_sq.is_finite() {
        Err(FinderError::Incoherence {
            message: format!("State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})", norm_sq, effective_tolerance)
        })
    } else {
        Ok(())
    }
}

/// Checks that the result holds exactly `2^wires` amplitudes.
pub fn check_dimension(result: &CircuitResult) -> Result<(), FinderError> {
    let expected = 1usize << result.wires().len();
    if result.len() != expected {
        return Err(FinderError::Incoherence {
            message: format!("Expected {} amplitudes for {} wires, found {}", expected, result.wires().len(), result.len())
        });
    }
    Ok(())
}

/// Runs the dimension and normalization checks.
///
/// # Arguments
/// * `result` - The circuit result to validate.
/// * `norm_tolerance` - Optional allowed deviation from 1.0 for normalization.
pub fn validate_state(result: &CircuitResult, norm_tolerance: Option<f64>) -> Result<(), FinderError> {
    check_dimension(result)?;
    check_normalization(result, norm_tolerance)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StateVector, WireId};
    use num_complex::Complex;

    fn result_of(amps: Vec<Complex<f64>>, wires: u64) -> CircuitResult {
        CircuitResult::new((0..wires).map(WireId).collect(), StateVector::new(amps))
    }

    #[test]
    fn accepts_normalized_state() {
        let r = result_of(vec![Complex::new(0.6, 0.0), Complex::new(0.0, 0.8)], 1);
        assert!(validate_state(&r, None).is_ok());
    }

    #[test]
    fn rejects_unnormalized_state() {
        let r = result_of(vec![Complex::new(0.6, 0.0), Complex::new(0.6, 0.0)], 1);
        assert!(matches!(check_normalization(&r, None), Err(FinderError::Incoherence { .. })));
        // Loose tolerance lets it through
        assert!(check_normalization(&r, Some(0.5)).is_ok());
    }

    #[test]
    fn rejects_wrong_amplitude_count() {
        let r = result_of(vec![Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)], 2);
        assert!(matches!(validate_state(&r, None), Err(FinderError::Incoherence { .. })));
    }
}
