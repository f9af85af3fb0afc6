//! Constants and scaling (spec §4.9, component C9).

/// Canonical per-partial bit depth: 24 bits, stored in a 32-bit signed
/// integer. `2^23 - 1`, matching spec §4.9's `[-2^23+1, 2^23-1]` range.
pub const MAX_24BIT_INT: f64 = 8_388_607.0;

/// Bundled/mixed bit depth headroom; mixed sums are stored in full 32-bit
/// signed range.
pub const MAX_32BIT_INT: i64 = i32::MAX as i64;

/// Audio frequency working range used for validation guidance only
/// (spec §4.9). Out-of-range frequencies are accepted by
/// `FrequencyEnvelope` — see `DESIGN.md` for the rationale.
pub const AUDIO_FREQUENCY_RANGE: (f64, f64) = (20.0, 20_000.0);

/// Default sample rate: 96 kHz, matching the source's own default.
pub const DEFAULT_SAMPLE_RATE: u32 = 96_000;

/// Renderer-wide configuration: sample rate and paxel size.
///
/// Paxel size defaults to one second of audio at the configured sample
/// rate, per spec §4.5.4 and the GLOSSARY's definition of a paxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub sample_rate: u32,
    pub paxel_size: u64,
}

impl RenderConfig {
    /// A config with paxel size equal to one second of audio, the source's
    /// own convention (`P = sampleRate`).
    pub fn new(sample_rate: u32) -> RenderConfig {
        RenderConfig {
            sample_rate,
            paxel_size: sample_rate as u64,
        }
    }

    /// A config with an explicit, non-default paxel size.
    pub fn with_paxel_size(sample_rate: u32, paxel_size: u64) -> RenderConfig {
        RenderConfig { sample_rate, paxel_size }
    }
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig::new(DEFAULT_SAMPLE_RATE)
    }
}
