use paxel_synth::config::RenderConfig;

/// A `RenderConfig` at the source's default sample rate, for scenarios
/// that don't need a non-default paxel size.
pub fn test_config() -> RenderConfig {
    RenderConfig::new(96_000)
}
