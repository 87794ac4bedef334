//! Clock - Boundary checks for timers driven by summed `f64` ticks
//!
//! Ten ticks of 0.1s add up to 0.9999999999999999, not 1.0. Every timer in
//! the crate compares against its end point through these helpers so a
//! boundary is reached on the tick that nominally lands on it.

/// Slack allowed when comparing accumulated simulation time
pub const TIME_EPSILON: f64 = 1e-9;

/// True once `elapsed` has reached `threshold`
pub fn reached(elapsed: f64, threshold: f64) -> bool {
    elapsed >= threshold - TIME_EPSILON
}

/// True once a countdown has run out
pub fn expired(remaining: f64) -> bool {
    remaining <= TIME_EPSILON
}
