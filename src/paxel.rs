//! Paxel renderer: expands one paxel's fused points into per-sample
//! values and emits PCM-scaled integer samples (spec §4.6, component C6).

use crate::config::{RenderConfig, MAX_24BIT_INT};
use crate::physical::{Paxel, PhysicalEnvelopePoint, PhysicalPartialEnvelope};
use rayon::prelude::*;

/// Render a single paxel into a fixed-size buffer of 24-bit-range PCM
/// samples stored as `i32`.
///
/// Every local sample in `[0, paxel_size)` is assigned exactly once. The
/// final point's rate extends through to `paxel_size`, since the
/// underlying envelope interval is oblivious to paxel boundaries (spec
/// §4.5.4's grid slicing guarantees that extension is physically correct:
/// the interval genuinely continues into the next paxel, or the last
/// paxel carries an appended silent point so the tail renders as zero).
pub fn render_paxel(paxel: &Paxel, paxel_size: u64) -> Vec<i32> {
    let mut out = vec![0i32; paxel_size as usize];
    if paxel.points.is_empty() {
        return out;
    }

    for pair in paxel.points.windows(2) {
        render_span(&pair[0], pair[1].sample, &mut out);
    }

    let last = paxel.points.last().expect("checked non-empty above");
    render_span(last, paxel_size, &mut out);

    out
}

fn render_span(cur: &PhysicalEnvelopePoint, end_exclusive: u64, out: &mut [i32]) {
    for s in cur.sample..end_exclusive {
        let n = (s - cur.sample) as f64;
        let amp = cur.amplitude + cur.amplitude_rate * n;
        let acc = crate::math::compute_cycle_accumulator(cur.cycle_accumulator, cur.frequency, cur.frequency_rate, n);
        out[s as usize] = (acc.sin() * amp * MAX_24BIT_INT).round() as i32;
    }
}

/// Render every paxel of a physical partial envelope, in parallel
/// (spec §4.6/§5: embarrassingly parallel once §4.5 has completed).
///
/// Returns the concatenated per-partial sample buffer, in paxel order.
pub fn render_partial(envelope: &PhysicalPartialEnvelope, config: &RenderConfig) -> Vec<i32> {
    envelope
        .paxels
        .par_iter()
        .map(|paxel| render_paxel(paxel, config.paxel_size))
        .collect::<Vec<_>>()
        .concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physical::PhysicalEnvelopePoint;
    use std::f64::consts::PI;

    fn point(sample: u64, amplitude: f64, frequency: f64) -> PhysicalEnvelopePoint {
        PhysicalEnvelopePoint {
            sample,
            cycle_accumulator: 0.0,
            frequency,
            frequency_rate: 0.0,
            amplitude,
            amplitude_rate: 0.0,
        }
    }

    #[test]
    fn first_sample_of_a_zero_phase_partial_is_zero() {
        let paxel = Paxel { points: vec![point(0, 0.4, 0.1)] };
        let out = render_paxel(&paxel, 8);
        assert_eq!(out[0], 0);
    }

    #[test]
    fn every_local_sample_assigned_exactly_once() {
        let paxel = Paxel {
            points: vec![point(0, 1.0, 0.05), point(4, 0.5, 0.05)],
        };
        let out = render_paxel(&paxel, 8);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn quarter_cycle_hits_expected_amplitude_scaled_peak() {
        let config = crate::config::RenderConfig::new(96_000);
        let normalized = std::f64::consts::TAU * 1000.0 / config.sample_rate as f64;
        let quarter_cycle_sample = ((PI / 2.0) / normalized).round() as u64;
        let paxel = Paxel {
            points: vec![PhysicalEnvelopePoint {
                sample: 0,
                cycle_accumulator: 0.0,
                frequency: normalized,
                frequency_rate: 0.0,
                amplitude: 0.4,
                amplitude_rate: 0.0,
            }],
        };
        let out = render_paxel(&paxel, quarter_cycle_sample + 1);
        let expected = (0.4 * crate::config::MAX_24BIT_INT).round() as i32;
        assert!((out[quarter_cycle_sample as usize] - expected).abs() <= 1);
    }

    #[test]
    fn rendering_same_paxel_twice_is_bit_identical() {
        let paxel = Paxel {
            points: vec![point(0, 0.8, 0.02), point(3, 0.2, 0.02)],
        };
        let a = render_paxel(&paxel, 16);
        let b = render_paxel(&paxel, 16);
        assert_eq!(a, b);
    }
}
