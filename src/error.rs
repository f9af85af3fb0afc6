//! Error kinds surfaced by the rendering core (spec §7).
//!
//! Construction-time validation fails fast and names the offending field.
//! Numerical routines (math, generator, paxel renderer) never fail: they
//! compute. The mixer never fails either.

use thiserror::Error;

/// The three error kinds the rendering core and its collaborators report.
///
/// `IoFailure` is never produced inside this crate — no WAV writer ships
/// here (see `SPEC_FULL.md` §6) — but it stays part of the public enum so
/// a downstream writer can report failures through the same type as the
/// construction-time errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// Construction of a logical type violated a stated invariant
    /// (negative frequency, phase outside `[0, 2*PI]`, non-ascending phase
    /// times, first phase coordinate not at t=0 or not controlled, ...).
    #[error("invariant violation: {detail}")]
    InvariantViolation { detail: String },

    /// After trimming, times and levels could not be reconciled with the
    /// phase-defined partial duration.
    #[error("inconsistent envelope: {detail}")]
    InconsistentEnvelope { detail: String },

    /// Reserved for the (external) PCM writer collaborator.
    #[error("io failure: {detail}")]
    IoFailure { detail: String },
}

impl RenderError {
    /// Builds an `InvariantViolation` and logs it at the point of
    /// construction, matching the teacher's practice of printing a
    /// diagnostic right where a failure is discovered (`engrave.rs`'s
    /// `println!("Problem while mixing buffers. Message: {}", err)`).
    pub fn invariant(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        eprintln!("invariant violation: {detail}");
        RenderError::InvariantViolation { detail }
    }

    /// Builds an `InconsistentEnvelope` and logs it the same way.
    pub fn inconsistent(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        eprintln!("inconsistent envelope: {detail}");
        RenderError::InconsistentEnvelope { detail }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
