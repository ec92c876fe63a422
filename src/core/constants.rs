//! Constants shared by the metrics encoding.

/// Scales and sizes used when mapping a metrics record onto circuit wires.
pub mod encoding {
    /// Number of wires in the encoding circuit (three color channels, three link metrics).
    pub const WIRE_COUNT: usize = 6;
    /// Ping (milliseconds) is divided by this to obtain a rotation angle.
    pub const PING_SCALE: f64 = 100.0;
    /// Download and upload rates (bits per second) are divided by this to obtain rotation angles.
    pub const RATE_SCALE: f64 = 1e9;
}
