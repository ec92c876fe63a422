// src/encoder/mod.rs

//! Maps a `MetricsRecord` onto the fixed six-wire circuit and evaluates it.
//!
//! Wires 0-2 carry the color channels (`RY(channel/255 * π)`), wires 3-5 the
//! ping, download and upload figures, followed by a CNOT ladder
//! `0→1, 1→2, 2→3, 3→4, 4→5`.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{FinderError, HexColor, WireId, PING_SCALE, RATE_SCALE, WIRE_COUNT};
use crate::metrics::MetricsRecord;
use crate::simulation::{CircuitResult, Simulator};
use std::f64::consts::PI;
use tracing::debug;

/// Stateless encoder; holds the simulator it runs circuits on.
#[derive(Debug, Default)]
pub struct StateEncoder {
    simulator: Simulator,
}

impl StateEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the encoding circuit for `record`.
    ///
    /// Fails with `FinderError::ColorParse` when the record's color is not `#RRGGBB`.
    pub fn build_circuit(&self, record: &MetricsRecord) -> Result<Circuit, FinderError> {
        let color = HexColor::parse(&record.color)?;
        let [r, g, b] = color.normalized();

        let angles = [
            r * PI,
            g * PI,
            b * PI,
            record.ping_ms / PING_SCALE,
            record.download_bps / RATE_SCALE,
            record.upload_bps / RATE_SCALE,
        ];

        let mut builder = CircuitBuilder::new();
        for (wire, theta) in angles.into_iter().enumerate() {
            builder = builder.ry(WireId(wire as u64), theta);
        }
        for control in 0..WIRE_COUNT as u64 - 1 {
            builder = builder.cnot(WireId(control), WireId(control + 1));
        }
        Ok(builder.build())
    }

    /// Builds and evaluates the encoding circuit, returning all `2^6` amplitudes.
    pub fn encode(&self, record: &MetricsRecord) -> Result<CircuitResult, FinderError> {
        let circuit = self.build_circuit(record)?;
        let result = self.simulator.run(&circuit)?;
        debug!(amplitudes = result.len(), norm = result.norm_sqr_sum(), "encoded metrics record");
        Ok(result)
    }
}
