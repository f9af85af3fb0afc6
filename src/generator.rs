//! Physical envelope generator: fuses the amplitude, frequency and phase
//! envelopes into a single ordered list of fused envelope points, applies
//! phase compensation, and slices the result onto the paxel grid
//! (spec §4.5, component C5 — the hard part of this crate).

use crate::config::RenderConfig;
use crate::envelope::{PartialEnvelopes, PhaseCoordinates};
use crate::math;
use crate::physical::{
    Paxel, PhysicalAmplitudeCoordinate, PhysicalEnvelopePoint, PhysicalFrequencyCoordinate,
    PhysicalPartialEnvelope, PhysicalPhaseCoordinate,
};
use itertools::izip;

/// Render the physical envelope for one partial, starting at
/// `start_time_seconds` in the overall timeline.
///
/// This is total: a `PartialEnvelopes` has already been validated at
/// construction time (spec §7), so nothing here can fail.
pub fn generate(partial: &PartialEnvelopes, start_time_seconds: f64, config: &RenderConfig) -> PhysicalPartialEnvelope {
    let duration = partial.end_time_seconds();
    let end_sample = math::seconds_to_samples(duration, config.sample_rate);

    let (amp_levels, amp_times) = crate::trim::trim(
        partial.amplitude.inner().levels().to_vec(),
        partial.amplitude.inner().times().to_vec(),
        duration,
    );
    let (freq_levels, freq_times) = crate::trim::trim(
        partial.frequency.inner().levels().to_vec(),
        partial.frequency.inner().times().to_vec(),
        duration,
    );

    let amp_coords = build_amplitude_coords(&amp_levels, &amp_times, config.sample_rate, end_sample);
    let freq_coords = build_frequency_coords(&freq_levels, &freq_times, config.sample_rate, end_sample);
    let phase_coords = build_phase_coords(&partial.phase, config.sample_rate);

    let mut sweep = fuse(&amp_coords, &freq_coords, &phase_coords, end_sample);
    compensate(&mut sweep.points, &sweep.anchors, &phase_coords);

    let absolute_start_sample = math::seconds_to_samples(start_time_seconds, config.sample_rate);
    let (paxels, first_paxel_index) = slice_into_paxels(&sweep.points, absolute_start_sample, config.paxel_size);

    let first_sample_fraction = 1.0 - frac(start_time_seconds * config.sample_rate as f64);
    let last_sample_fraction = frac((start_time_seconds + duration) * config.sample_rate as f64);

    PhysicalPartialEnvelope {
        paxels,
        first_paxel_index,
        first_sample_fraction,
        last_sample_fraction,
    }
}

fn frac(x: f64) -> f64 {
    x - x.floor()
}

fn cumulative_times(times: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    let mut out = Vec::with_capacity(times.len() + 1);
    out.push(0.0);
    for &t in times {
        acc += t;
        out.push(acc);
    }
    out
}

/// §4.5.1: amplitude breakpoints keyed by absolute sample index, with the
/// final coordinate forced onto the partial's final sample.
fn build_amplitude_coords(levels: &[f64], times: &[f64], sample_rate: u32, end_sample: u64) -> Vec<PhysicalAmplitudeCoordinate> {
    let cum = cumulative_times(times);
    let mut coords: Vec<PhysicalAmplitudeCoordinate> = izip!(levels, cum.iter())
        .map(|(&amplitude, &t)| PhysicalAmplitudeCoordinate {
            sample: math::seconds_to_samples(t, sample_rate),
            amplitude,
        })
        .collect();
    if let Some(last) = coords.last_mut() {
        last.sample = end_sample;
    }
    coords
}

/// §4.5.1: frequency breakpoints, normalised to rad/sample.
fn build_frequency_coords(levels: &[f64], times: &[f64], sample_rate: u32, end_sample: u64) -> Vec<PhysicalFrequencyCoordinate> {
    let cum = cumulative_times(times);
    let mut coords: Vec<PhysicalFrequencyCoordinate> = izip!(levels, cum.iter())
        .map(|(&level, &t)| PhysicalFrequencyCoordinate {
            sample: math::seconds_to_samples(t, sample_rate),
            frequency: math::normalize_frequency(level, sample_rate),
        })
        .collect();
    if let Some(last) = coords.last_mut() {
        last.sample = end_sample;
    }
    coords
}

fn build_phase_coords(phase: &PhaseCoordinates, sample_rate: u32) -> Vec<PhysicalPhaseCoordinate> {
    phase
        .as_slice()
        .iter()
        .map(|pc| PhysicalPhaseCoordinate {
            sample: pc.time_samples(sample_rate),
            phase: pc.phase(),
            natural: pc.is_natural(),
        })
        .collect()
}

fn rate(cur_sample: u64, cur_value: f64, next_sample: u64, next_value: f64) -> f64 {
    let n = (next_sample - cur_sample) as f64;
    if n == 0.0 {
        0.0
    } else {
        (next_value - cur_value) / n
    }
}

struct FusedSweep {
    points: Vec<PhysicalEnvelopePoint>,
    anchors: Vec<usize>,
}

/// §4.5.2: the fused sweep over the three coordinate lists.
fn fuse(
    amp_coords: &[PhysicalAmplitudeCoordinate],
    freq_coords: &[PhysicalFrequencyCoordinate],
    phase_coords: &[PhysicalPhaseCoordinate],
    end_sample: u64,
) -> FusedSweep {
    let mut amp_i = 0usize;
    let mut freq_i = 0usize;
    let mut phase_i = 0usize;

    let mut amp_rate = if amp_coords.len() > 1 {
        rate(amp_coords[0].sample, amp_coords[0].amplitude, amp_coords[1].sample, amp_coords[1].amplitude)
    } else {
        0.0
    };
    let mut freq_rate = if freq_coords.len() > 1 {
        rate(freq_coords[0].sample, freq_coords[0].frequency, freq_coords[1].sample, freq_coords[1].frequency)
    } else {
        0.0
    };

    let mut freq_at_bp = freq_coords[0].frequency;
    let mut freq_bp_sample = freq_coords[0].sample;
    let mut last_freq_coord_accumulator = 0.0f64;

    let mut points = vec![PhysicalEnvelopePoint {
        sample: 0,
        cycle_accumulator: 0.0,
        frequency: freq_coords[0].frequency,
        frequency_rate: freq_rate,
        amplitude: amp_coords[0].amplitude,
        amplitude_rate: amp_rate,
    }];
    let mut anchors = vec![0usize];

    loop {
        let next_amp = if amp_i + 1 < amp_coords.len() { Some(amp_coords[amp_i + 1].sample) } else { None };
        let next_freq = if freq_i + 1 < freq_coords.len() { Some(freq_coords[freq_i + 1].sample) } else { None };
        let next_phase = if phase_i + 1 < phase_coords.len() { Some(phase_coords[phase_i + 1].sample) } else { None };

        let next_sample = match [next_amp, next_freq, next_phase].into_iter().flatten().min() {
            Some(s) => s,
            None => break,
        };

        let n_amp = (next_sample - amp_coords[amp_i].sample) as f64;
        let mut amplitude = amp_coords[amp_i].amplitude + amp_rate * n_amp;

        let n_since_freq_bp = (next_sample - freq_bp_sample) as f64;
        let mut frequency = freq_at_bp + freq_rate * n_since_freq_bp;
        let mut cycle_accumulator = math::compute_cycle_accumulator(last_freq_coord_accumulator, freq_at_bp, freq_rate, n_since_freq_bp);

        if next_freq == Some(next_sample) {
            let exact_freq = freq_coords[freq_i + 1].frequency;
            cycle_accumulator = math::compute_cycle_accumulator_to_exact_end(last_freq_coord_accumulator, freq_at_bp, exact_freq, n_since_freq_bp);
            frequency = exact_freq;
            last_freq_coord_accumulator = cycle_accumulator;
            freq_i += 1;
            freq_bp_sample = next_sample;
            freq_at_bp = exact_freq;
            freq_rate = if freq_i + 1 < freq_coords.len() {
                rate(freq_coords[freq_i].sample, freq_coords[freq_i].frequency, freq_coords[freq_i + 1].sample, freq_coords[freq_i + 1].frequency)
            } else {
                0.0
            };
        }

        if next_amp == Some(next_sample) {
            amp_i += 1;
            amplitude = amp_coords[amp_i].amplitude;
            amp_rate = if amp_i + 1 < amp_coords.len() {
                rate(amp_coords[amp_i].sample, amp_coords[amp_i].amplitude, amp_coords[amp_i + 1].sample, amp_coords[amp_i + 1].amplitude)
            } else {
                0.0
            };
        }

        points.push(PhysicalEnvelopePoint {
            sample: next_sample,
            cycle_accumulator,
            frequency,
            frequency_rate: freq_rate,
            amplitude,
            amplitude_rate: amp_rate,
        });

        if next_phase == Some(next_sample) {
            phase_i += 1;
            anchors.push(points.len() - 1);
        }

        if next_sample == end_sample {
            break;
        }
    }

    FusedSweep { points, anchors }
}

/// §4.5.3: distribute each interval's phase-coherence correction across
/// its intervening fused points, carrying a running `cumulative_shift`
/// forward pass over the list.
fn compensate(points: &mut [PhysicalEnvelopePoint], anchors: &[usize], phase_coords: &[PhysicalPhaseCoordinate]) {
    let mut cumulative_shift = phase_coords[0].phase.unwrap_or(0.0);
    points[anchors[0]].cycle_accumulator += cumulative_shift;

    for i in 1..anchors.len() {
        let prev_anchor = anchors[i - 1];
        let curr_anchor = anchors[i];
        let prev_sample = points[prev_anchor].sample;
        let curr_sample = points[curr_anchor].sample;
        let span = (curr_sample - prev_sample) as f64;

        let delta = if phase_coords[i].natural {
            0.0
        } else {
            math::coherence_compensation(
                points[curr_anchor].cycle_accumulator + cumulative_shift,
                phase_coords[i].phase.expect("controlled coordinate carries a target phase"),
            )
        };

        for idx in (prev_anchor + 1)..=curr_anchor {
            let fraction = if span == 0.0 { 1.0 } else { (points[idx].sample - prev_sample) as f64 / span };
            let shift = cumulative_shift + delta * fraction;
            points[idx].cycle_accumulator += shift;

            let prev_idx = idx - 1;
            let n = (points[idx].sample - points[prev_idx].sample) as f64;
            if n > 0.0 {
                points[prev_idx].frequency_rate =
                    math::compute_frequency_rate(points[prev_idx].cycle_accumulator, points[prev_idx].frequency, points[idx].cycle_accumulator, n);
            }
        }

        cumulative_shift += delta;
    }
}

/// §4.5.4: slice the compensated fused list onto the fixed-size paxel
/// grid, synthesising boundary points where no breakpoint lands exactly
/// on a paxel edge.
fn slice_into_paxels(points: &[PhysicalEnvelopePoint], absolute_start_sample: u64, paxel_size: u64) -> (Vec<Paxel>, u64) {
    let first_paxel_index = absolute_start_sample / paxel_size;
    let absolute_end_sample = absolute_start_sample + points.last().expect("fused list is non-empty").sample;
    // The partial's content occupies samples up to (but not including)
    // `absolute_end_sample`; when that lands exactly on a paxel boundary
    // there is no content in the paxel that would start there, so the
    // last paxel is the one holding `absolute_end_sample - 1`.
    let last_paxel_index = (absolute_end_sample.max(1) - 1) / paxel_size;

    let mut abs_points: Vec<PhysicalEnvelopePoint> = points
        .iter()
        .map(|p| PhysicalEnvelopePoint { sample: p.sample + absolute_start_sample, ..*p })
        .collect();

    if absolute_end_sample % paxel_size != 0 {
        abs_points.push(PhysicalEnvelopePoint::silent(absolute_end_sample + 1));
    }

    let mut paxels = Vec::with_capacity((last_paxel_index - first_paxel_index + 1) as usize);
    let mut iter = abs_points.into_iter().peekable();
    let mut carry: Option<PhysicalEnvelopePoint> = None;

    for k in first_paxel_index..=last_paxel_index {
        let window_start = k * paxel_size;
        let window_end = window_start + paxel_size;
        let mut local = Vec::new();

        while let Some(&pt) = iter.peek() {
            if pt.sample < window_end {
                local.push(PhysicalEnvelopePoint { sample: pt.sample - window_start, ..pt });
                iter.next();
            } else {
                break;
            }
        }

        let needs_leading_point = local.first().map(|p| p.sample).unwrap_or(1) != 0;
        if needs_leading_point {
            let synthesized = if k == first_paxel_index {
                PhysicalEnvelopePoint::silent(0)
            } else {
                let base = carry.expect("non-initial paxel must carry a prior point");
                let interpolated = PhysicalEnvelopePoint::interpolate(&base, window_start);
                PhysicalEnvelopePoint { sample: 0, ..interpolated }
            };
            local.insert(0, synthesized);
        }

        carry = local.last().map(|lp| PhysicalEnvelopePoint { sample: lp.sample + window_start, ..*lp });
        paxels.push(Paxel { points: local });
    }

    (paxels, first_paxel_index)
}
