//! Logical envelope model: immutable value types for amplitude/frequency
//! envelopes, phase coordinates and the partial-envelope aggregate, with
//! constructor-time invariant validation (spec §3, §4.2, component C2).

use crate::error::{RenderError, RenderResult};

/// A piecewise-linear trajectory: `levels.len() == times.len() + 1`
/// (`levels.len() >= 1`). `curves` is accepted for forward-compatibility
/// with non-linear interpolation (spec §1, §9) but is not interpreted —
/// every segment in this crate is linear.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    levels: Vec<f64>,
    times: Vec<f64>,
    curves: Vec<Option<f64>>,
}

impl Envelope {
    /// Build an envelope without validating level bounds; used by the
    /// amplitude/frequency wrappers below, which each enforce their own
    /// invariant after this shared shape check.
    fn new_unchecked(levels: Vec<f64>, times: Vec<f64>) -> RenderResult<Envelope> {
        if levels.is_empty() {
            return Err(RenderError::invariant("envelope must have at least one level"));
        }
        if levels.len() != times.len() + 1 {
            return Err(RenderError::invariant(format!(
                "envelope levels.len() ({}) must equal times.len() ({}) + 1",
                levels.len(),
                times.len()
            )));
        }
        if times.iter().any(|t| *t <= 0.0) {
            return Err(RenderError::invariant("envelope segment times must be positive"));
        }
        let curves = vec![None; times.len()];
        Ok(Envelope { levels, times, curves })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn curves(&self) -> &[Option<f64>] {
        &self.curves
    }

    /// Total duration implied by summing all segment times.
    pub fn duration(&self) -> f64 {
        self.times.iter().sum()
    }
}

/// Envelope with the invariant that every level is strictly positive (Hz).
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEnvelope(Envelope);

impl FrequencyEnvelope {
    pub fn new(levels: Vec<f64>, times: Vec<f64>) -> RenderResult<FrequencyEnvelope> {
        if levels.iter().any(|l| *l <= 0.0) {
            return Err(RenderError::invariant("frequency envelope levels must be strictly positive"));
        }
        Ok(FrequencyEnvelope(Envelope::new_unchecked(levels, times)?))
    }

    pub fn inner(&self) -> &Envelope {
        &self.0
    }
}

/// Envelope with every level in `[-1.0, 1.0]`; negative values mean phase
/// inversion.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeEnvelope(Envelope);

impl AmplitudeEnvelope {
    pub fn new(levels: Vec<f64>, times: Vec<f64>) -> RenderResult<AmplitudeEnvelope> {
        if levels.iter().any(|l| !(-1.0..=1.0).contains(l)) {
            return Err(RenderError::invariant("amplitude envelope levels must be in [-1.0, 1.0]"));
        }
        Ok(AmplitudeEnvelope(Envelope::new_unchecked(levels, times)?))
    }

    pub fn inner(&self) -> &Envelope {
        &self.0
    }
}

/// Either a *controlled* coordinate (a target phase at a given time) or a
/// *natural* one ("whatever phase the partial naturally reaches here").
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseCoordinate {
    Controlled { time_seconds: f64, phase: f64 },
    Natural { time_seconds: f64 },
}

impl PhaseCoordinate {
    pub fn time_seconds(&self) -> f64 {
        match self {
            PhaseCoordinate::Controlled { time_seconds, .. } => *time_seconds,
            PhaseCoordinate::Natural { time_seconds } => *time_seconds,
        }
    }

    pub fn time_samples(&self, sample_rate: u32) -> u64 {
        crate::math::seconds_to_samples(self.time_seconds(), sample_rate)
    }

    pub fn is_natural(&self) -> bool {
        matches!(self, PhaseCoordinate::Natural { .. })
    }

    pub fn phase(&self) -> Option<f64> {
        match self {
            PhaseCoordinate::Controlled { phase, .. } => Some(*phase),
            PhaseCoordinate::Natural { .. } => None,
        }
    }
}

/// Ordered sequence of at least two `PhaseCoordinate`s.
///
/// Invariants: first coordinate at t=0 and controlled; times strictly
/// ascending; the last coordinate's time defines the partial's end.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseCoordinates(Vec<PhaseCoordinate>);

impl PhaseCoordinates {
    pub fn new(coordinates: Vec<PhaseCoordinate>) -> RenderResult<PhaseCoordinates> {
        if coordinates.len() < 2 {
            return Err(RenderError::invariant("phase coordinates must contain at least two entries"));
        }
        match coordinates[0] {
            PhaseCoordinate::Controlled { time_seconds, .. } if time_seconds == 0.0 => {}
            _ => {
                return Err(RenderError::invariant(
                    "first phase coordinate must be controlled and at t=0",
                ))
            }
        }
        for pair in coordinates.windows(2) {
            if pair[1].time_seconds() <= pair[0].time_seconds() {
                return Err(RenderError::invariant(format!(
                    "phase coordinate times must be strictly ascending (found {} then {})",
                    pair[0].time_seconds(),
                    pair[1].time_seconds()
                )));
            }
        }
        for (i, c) in coordinates.iter().enumerate() {
            if let PhaseCoordinate::Controlled { phase, .. } = c {
                if !(0.0..=std::f64::consts::TAU).contains(phase) {
                    return Err(RenderError::invariant(format!(
                        "phase coordinate #{i} target phase {phase} is outside [0, 2*PI]"
                    )));
                }
            }
        }
        Ok(PhaseCoordinates(coordinates))
    }

    pub fn as_slice(&self) -> &[PhaseCoordinate] {
        &self.0
    }

    /// The partial's end time in seconds, defined by the last coordinate.
    pub fn end_time_seconds(&self) -> f64 {
        self.0.last().expect("validated nonempty").time_seconds()
    }
}

/// Aggregate of one amplitude envelope, one frequency envelope and one
/// phase-coordinate sequence describing a single partial.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialEnvelopes {
    pub amplitude: AmplitudeEnvelope,
    pub frequency: FrequencyEnvelope,
    pub phase: PhaseCoordinates,
}

impl PartialEnvelopes {
    pub fn new(
        amplitude: AmplitudeEnvelope,
        frequency: FrequencyEnvelope,
        phase: PhaseCoordinates,
    ) -> PartialEnvelopes {
        PartialEnvelopes { amplitude, frequency, phase }
    }

    /// The partial's end time, defined by the phase coordinates (spec §3).
    pub fn end_time_seconds(&self) -> f64 {
        self.phase.end_time_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_envelope_rejects_nonpositive() {
        let err = FrequencyEnvelope::new(vec![440.0, 0.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, RenderError::InvariantViolation { .. }));
    }

    #[test]
    fn amplitude_envelope_rejects_out_of_bounds() {
        let err = AmplitudeEnvelope::new(vec![0.5, 1.5], vec![1.0]).unwrap_err();
        assert!(matches!(err, RenderError::InvariantViolation { .. }));
    }

    #[test]
    fn amplitude_envelope_accepts_negative_for_inversion() {
        let env = AmplitudeEnvelope::new(vec![-1.0, 1.0], vec![1.0]).unwrap();
        assert_eq!(env.inner().levels(), &[-1.0, 1.0]);
    }

    #[test]
    fn envelope_rejects_mismatched_lengths() {
        let err = FrequencyEnvelope::new(vec![440.0, 880.0, 220.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, RenderError::InvariantViolation { .. }));
    }

    #[test]
    fn envelope_rejects_nonpositive_segment_time() {
        let err = FrequencyEnvelope::new(vec![440.0, 880.0], vec![0.0]).unwrap_err();
        assert!(matches!(err, RenderError::InvariantViolation { .. }));
    }

    #[test]
    fn phase_coordinates_requires_controlled_start_at_zero() {
        let err = PhaseCoordinates::new(vec![
            PhaseCoordinate::Natural { time_seconds: 0.0 },
            PhaseCoordinate::Natural { time_seconds: 1.0 },
        ])
        .unwrap_err();
        assert!(matches!(err, RenderError::InvariantViolation { .. }));

        let err = PhaseCoordinates::new(vec![
            PhaseCoordinate::Controlled { time_seconds: 0.1, phase: 0.0 },
            PhaseCoordinate::Natural { time_seconds: 1.0 },
        ])
        .unwrap_err();
        assert!(matches!(err, RenderError::InvariantViolation { .. }));
    }

    #[test]
    fn phase_coordinates_requires_ascending_times() {
        let err = PhaseCoordinates::new(vec![
            PhaseCoordinate::Controlled { time_seconds: 0.0, phase: 0.0 },
            PhaseCoordinate::Natural { time_seconds: 1.0 },
            PhaseCoordinate::Natural { time_seconds: 0.5 },
        ])
        .unwrap_err();
        assert!(matches!(err, RenderError::InvariantViolation { .. }));
    }

    #[test]
    fn phase_coordinates_rejects_phase_outside_range() {
        let err = PhaseCoordinates::new(vec![
            PhaseCoordinate::Controlled { time_seconds: 0.0, phase: 0.0 },
            PhaseCoordinate::Controlled { time_seconds: 1.0, phase: 7.0 },
        ])
        .unwrap_err();
        assert!(matches!(err, RenderError::InvariantViolation { .. }));
    }

    #[test]
    fn phase_coordinates_accepts_valid_sequence() {
        let pc = PhaseCoordinates::new(vec![
            PhaseCoordinate::Controlled { time_seconds: 0.0, phase: 0.0 },
            PhaseCoordinate::Natural { time_seconds: 1.0 },
        ])
        .unwrap();
        assert_eq!(pc.end_time_seconds(), 1.0);
    }

    #[test]
    fn partial_envelopes_end_time_comes_from_phase() {
        let amp = AmplitudeEnvelope::new(vec![0.4], vec![]).unwrap();
        let freq = FrequencyEnvelope::new(vec![1000.0], vec![]).unwrap();
        let phase = PhaseCoordinates::new(vec![
            PhaseCoordinate::Controlled { time_seconds: 0.0, phase: 0.0 },
            PhaseCoordinate::Natural { time_seconds: 1.0 },
        ])
        .unwrap();
        let partial = PartialEnvelopes::new(amp, freq, phase);
        assert_eq!(partial.end_time_seconds(), 1.0);
    }
}
