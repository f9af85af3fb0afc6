//! Phase modulus, coherence compensation, closed-form accumulator and
//! rate computations, sec<->sample conversion, frequency normalisation
//! (spec §4.1, component C1).

use std::f64::consts::PI;

const TAU: f64 = 2.0 * PI;

/// Reduce `x` into `[0, 2*PI)` with a positive representative.
pub fn phase_mod(x: f64) -> f64 {
    let m = x % TAU;
    if m < 0.0 {
        m + TAU
    } else {
        m
    }
}

/// The smallest `delta` in `[-PI, PI]` such that
/// `phase_mod(source + delta) == phase_mod(target)`.
///
/// Exactly zero when `source == target` bitwise (checked before any
/// reduction, so that floating-point noise introduced by `phase_mod`
/// itself can never produce a nonzero result for identical inputs).
pub fn coherence_compensation(source: f64, target: f64) -> f64 {
    if source == target {
        return 0.0;
    }
    let s = phase_mod(source);
    let t = phase_mod(target);
    let mut delta = t - s;
    if delta > PI {
        delta -= TAU;
    } else if delta <= -PI {
        delta += TAU;
    }
    delta
}

/// `floor(t * sample_rate)` as an unsigned sample index.
pub fn seconds_to_samples(t: f64, sample_rate: u32) -> u64 {
    (t * sample_rate as f64).floor() as u64
}

/// `2*PI*f_hz / sample_rate`, in radians per sample.
pub fn normalize_frequency(f_hz: f64, sample_rate: u32) -> f64 {
    TAU * f_hz / sample_rate as f64
}

/// Closed-form integral of a linear frequency ramp over `n` samples:
/// `c0 + f0*n + 0.5*f_rate*n^2`.
pub fn compute_cycle_accumulator(c0: f64, f0: f64, f_rate: f64, n: f64) -> f64 {
    c0 + f0 * n + 0.5 * f_rate * n * n
}

/// Mean-frequency form of the same integral, used when both endpoint
/// frequencies are known exactly (eliminates the drift that recomputing
/// `f_rate` first and then integrating would accumulate).
pub fn compute_cycle_accumulator_to_exact_end(c0: f64, f0: f64, f1: f64, n: f64) -> f64 {
    c0 + f0 * n + (f1 - f0) * n / 2.0
}

/// The frequency rate that makes the accumulator hit `c1` at sample `n`,
/// given it started at `c0` with instantaneous frequency `f0`.
///
/// `n` must be nonzero; the generator only calls this between two
/// distinct fused sample indices.
pub fn compute_frequency_rate(c0: f64, f0: f64, c1: f64, n: f64) -> f64 {
    2.0 * (c1 - c0 - f0 * n) / (n * n)
}
