// src/circuits/mod.rs

//! Ordered sequences of gate operations (`connfinder::operations::Operation`).
//!
//! A `Circuit` records its operations in application order together with the
//! set of wires they touch; `CircuitBuilder` offers a chaining interface for
//! assembling one.

use crate::core::WireId;
use crate::operations::Operation;
use std::collections::{BTreeSet, HashMap}; // BTreeSet keeps wires sorted for index assignment and drawing
use std::fmt;

/// An ordered sequence of operations over a set of wires.
///
/// Order matters: the simulator applies operations front to back.
#[derive(Clone, PartialEq)] // PartialEq useful for testing circuits
pub struct Circuit {
    /// Every wire mentioned by at least one operation.
    wires: BTreeSet<WireId>,

    /// The operations, in application order.
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self {
            wires: BTreeSet::new(),
            operations: Vec::new(),
        }
    }

    /// Appends an operation and registers the wires it touches.
    pub fn add_operation(&mut self, op: Operation) {
        self.wires.extend(op.involved_wires());
        self.operations.push(op);
    }

    /// Appends every operation yielded by `ops`, in order.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op);
        }
    }

    /// The wires involved in this circuit, in ascending id order.
    pub fn wires(&self) -> &BTreeSet<WireId> {
        &self.wires
    }

    /// The operations in application order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Shorthand for `add_op(Operation::RotateY { .. })`.
    pub fn ry(self, target: WireId, theta: f64) -> Self {
        self.add_op(Operation::RotateY { target, theta })
    }

    /// Shorthand for `add_op(Operation::ControlledNot { .. })`.
    pub fn cnot(self, control: WireId, target: WireId) -> Self {
        self.add_op(Operation::ControlledNot { control, target })
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() {
            return writeln!(f, "Circuit[0 operations on 0 wires]");
        }

        // --- Setup ---
        let ops = &self.operations;
        let num_ops = ops.len();

        let sorted_wires: Vec<WireId> = self.wires.iter().copied().collect();
        let num_wires = sorted_wires.len();
        let wire_to_row: HashMap<WireId, usize> = sorted_wires.iter().enumerate().map(|(i, w)| (*w, i)).collect();

        let max_label_width = sorted_wires.iter().map(|w| w.to_string().len()).max().unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2); // Label + ": "

        const GATE_WIDTH: usize = 7; // e.g., "──RY───"
        const WIRE: &str = "───────"; // GATE_WIDTH dashes
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] stores the gate/wire segment string
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_wires];
        // v_connect[row][time] stores the vertical connector char below this row at this time
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_wires];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        // --- Populate Grids ---
        for (t, op) in ops.iter().enumerate() {
            match op {
                Operation::RotateY { target, .. } => {
                    if let Some(r) = wire_to_row.get(target) {
                        op_grid[*r][t] = format_gate("RY");
                    }
                }
                Operation::PhaseShift { target, .. } => {
                    if let Some(r) = wire_to_row.get(target) {
                        op_grid[*r][t] = format_gate("P");
                    }
                }
                Operation::PauliX { target } => {
                    if let Some(r) = wire_to_row.get(target) {
                        op_grid[*r][t] = format_gate("X");
                    }
                }
                Operation::ControlledNot { control, target } => {
                    if let (Some(r_ctrl), Some(r_tgt)) = (wire_to_row.get(control), wire_to_row.get(target)) {
                        op_grid[*r_ctrl][t] = format_gate("@");
                        op_grid[*r_tgt][t] = format_gate("X");

                        let r_min = (*r_ctrl).min(*r_tgt);
                        let r_max = (*r_ctrl).max(*r_tgt);
                        for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                            row_vec[t] = V_WIRE;
                        }
                    }
                }
            }
        }

        // --- Format Output String ---
        writeln!(f, "Circuit[{} operations on {} wires]", num_ops, num_wires)?;
        for r in 0..num_wires {
            let label = format!("{}: ", sorted_wires[r]);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            // Vertical connector row between wires
            if r < num_wires - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wid(id: u64) -> WireId {
        WireId(id)
    }

    #[test]
    fn builder_tracks_wires_and_order() {
        let circuit = CircuitBuilder::new()
            .ry(wid(2), 0.5)
            .cnot(wid(0), wid(2))
            .add_op(Operation::PauliX { target: wid(1) })
            .build();

        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.wires().iter().copied().collect::<Vec<_>>(), vec![wid(0), wid(1), wid(2)]);
        assert_eq!(circuit.operations()[1], Operation::ControlledNot { control: wid(0), target: wid(2) });
    }

    #[test]
    fn display_draws_one_row_per_wire() {
        let circuit = CircuitBuilder::new().ry(wid(0), 1.0).cnot(wid(0), wid(1)).build();
        let drawing = circuit.to_string();

        assert!(drawing.starts_with("Circuit[2 operations on 2 wires]"));
        assert!(drawing.contains("w0: "));
        assert!(drawing.contains("RY"));
        assert!(drawing.contains('@'));
        assert!(drawing.contains('│'));
        // Header, two wire rows, one connector row
        assert_eq!(drawing.lines().count(), 4);
    }

    #[test]
    fn empty_circuit_display() {
        assert_eq!(Circuit::default().to_string(), "Circuit[0 operations on 0 wires]\n");
    }
}
