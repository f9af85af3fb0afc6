//! Physical coordinate model: per-parameter coordinates in sample time and
//! the fused envelope point (spec §3, §4.3, component C3).

pub type SampleIndex = u64;

/// An amplitude value paired with an absolute sample index (relative to
/// partial start).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalAmplitudeCoordinate {
    pub sample: SampleIndex,
    pub amplitude: f64,
}

/// A normalised-frequency value (rad/sample) paired with an absolute
/// sample index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalFrequencyCoordinate {
    pub sample: SampleIndex,
    pub frequency: f64,
}

/// A phase target paired with an absolute sample index; `natural` mirrors
/// the logical `PhaseCoordinate`'s natural/controlled distinction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalPhaseCoordinate {
    pub sample: SampleIndex,
    pub phase: Option<f64>,
    pub natural: bool,
}

/// One point of the fused envelope (spec §3's `PhysicalEnvelopePoint`).
///
/// `frequency_rate`/`amplitude_rate` are the per-sample linear rates valid
/// on the interval *beginning* at this point; they are piecewise-constant
/// across that interval and recomputed at each point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalEnvelopePoint {
    pub sample: SampleIndex,
    pub cycle_accumulator: f64,
    pub frequency: f64,
    pub frequency_rate: f64,
    pub amplitude: f64,
    pub amplitude_rate: f64,
}

impl PhysicalEnvelopePoint {
    pub fn silent(sample: SampleIndex) -> PhysicalEnvelopePoint {
        PhysicalEnvelopePoint {
            sample,
            cycle_accumulator: 0.0,
            frequency: 0.0,
            frequency_rate: 0.0,
            amplitude: 0.0,
            amplitude_rate: 0.0,
        }
    }

    /// Interpolate a new point between `prev` and the point that would
    /// come after it, at absolute sample `at`, preserving `prev`'s current
    /// frequency rate (spec §4.5.4's `interpolate`). The accumulator is
    /// computed forward from `prev` via the closed-form integral.
    pub fn interpolate(prev: &PhysicalEnvelopePoint, at: SampleIndex) -> PhysicalEnvelopePoint {
        let n = (at - prev.sample) as f64;
        let amplitude = prev.amplitude + prev.amplitude_rate * n;
        let frequency = prev.frequency + prev.frequency_rate * n;
        let cycle_accumulator = crate::math::compute_cycle_accumulator(
            prev.cycle_accumulator,
            prev.frequency,
            prev.frequency_rate,
            n,
        );
        PhysicalEnvelopePoint {
            sample: at,
            cycle_accumulator,
            frequency,
            frequency_rate: prev.frequency_rate,
            amplitude,
            amplitude_rate: prev.amplitude_rate,
        }
    }
}

/// One paxel: a window of fused points whose sample indices are *local*
/// to the paxel (`0 .. paxel_size`).
#[derive(Debug, Clone, PartialEq)]
pub struct Paxel {
    pub points: Vec<PhysicalEnvelopePoint>,
}

/// A partial's full set of paxels plus the paxel-grid offset bookkeeping
/// (spec §4.5.4).
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalPartialEnvelope {
    pub paxels: Vec<Paxel>,
    pub first_paxel_index: u64,
    pub first_sample_fraction: f64,
    pub last_sample_fraction: f64,
}
