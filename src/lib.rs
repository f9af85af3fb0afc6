//! Rendering core of an additive-synthesis engine.
//!
//! Given a partial specification — an amplitude envelope, a frequency
//! envelope, and a set of phase coordinates — this crate produces a
//! discrete-time PCM signal that exactly matches the specified amplitude
//! and instantaneous frequency at sample precision, exactly hits every
//! non-natural phase target, and contains no amplitude/phase/frequency
//! discontinuities at any internal boundary.
//!
//! Out of scope (external collaborators): textual envelope ingestion
//! (upstream YAML with keys `audio_fragment`, `start_time`, `labels`,
//! `partials`, `partial`, `frequency_envelope`, `amplitude_envelope`,
//! `phase_coordinates`, `levels`, `times`, `phases`, `curves`), the WAV
//! container writer (`RenderError::IoFailure` is reserved for it), and the
//! CLI entry point (`-f/--frequency`, `-a/--amplitude`, `-d/--duration`,
//! `-o/--output`, `-s/--samplerate`).

#![allow(dead_code)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod generator;
pub mod labels;
pub mod math;
pub mod mixer;
pub mod paxel;
pub mod physical;
pub mod trim;

use config::RenderConfig;
use envelope::PartialEnvelopes;
use labels::PartialGroup;

/// Render one partial end-to-end: fuse its envelopes onto the paxel grid
/// (C5) and render every paxel (C6), returning the concatenated
/// per-partial sample buffer.
pub fn render_partial(partial: &PartialEnvelopes, start_time_seconds: f64, config: &RenderConfig) -> Vec<i32> {
    let physical = generator::generate(partial, start_time_seconds, config);
    paxel::render_partial(&physical, config)
}

/// Render and mix several partials into one buffer (C7).
pub fn render_and_mix(
    partials: &[(PartialEnvelopes, f64)],
    config: &RenderConfig,
    auto_normalize: bool,
) -> Vec<i32> {
    let rendered: Vec<Vec<i32>> = partials
        .iter()
        .map(|(partial, start_time_seconds)| render_partial(partial, *start_time_seconds, config))
        .collect();
    mixer::mix(&rendered, auto_normalize)
}

/// Render and mix a labeled group of partials (C7 + C8). Labels are
/// carried solely for the caller's own diagnostics/grouping — they do not
/// influence which samples come out.
pub fn render_group(group: &PartialGroup, config: &RenderConfig, auto_normalize: bool) -> Vec<i32> {
    let rendered: Vec<Vec<i32>> = group
        .partials
        .iter()
        .map(|partial| render_partial(&partial.envelopes, partial.start_time_seconds, config))
        .collect();
    mixer::mix(&rendered, auto_normalize)
}
