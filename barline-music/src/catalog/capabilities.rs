//! Generator capability flags
//!
//! A capability names a pattern generator the downstream compiler may or may
//! not support. Unknown keys are treated as enabled so new patterns degrade
//! gracefully on older capability tables.

use std::collections::HashMap;

/// Built-in capability table; entries absent here default to enabled.
static DEFAULT_CAPABILITIES: &[(&str, bool)] = &[
    ("gen_arpeggio_basic", true),
    ("gen_sustain_basic", true),
    ("gen_broken_chords", true),
    ("gen_offbeat_plucks", true),
    ("gen_call_response", true),
    ("gen_alberti_bass", true),
    ("gen_ostinato_pulse", true),
    ("gen_walking_bass_simple", true),
    ("gen_comping_stabs", true),
    ("gen_gate_mask", true),
    ("gen_step_arp_octave", true),
    ("gen_walking_bass", true),
    ("gen_montuno", false),
    ("gen_travis_picking", false),
    ("gen_poly_rhythms", false),
];

/// Capability gate applied to pattern candidate pools
#[derive(Debug, Clone)]
pub struct Capabilities {
    flags: HashMap<String, bool>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            flags: DEFAULT_CAPABILITIES
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

impl Capabilities {
    /// All capabilities enabled, including experimental generators.
    pub fn all_enabled() -> Self {
        let mut caps = Self::default();
        for value in caps.flags.values_mut() {
            *value = true;
        }
        caps
    }

    pub fn with_disabled(mut self, key: &str) -> Self {
        self.flags.insert(key.to_string(), false);
        self
    }

    pub fn with_enabled(mut self, key: &str) -> Self {
        self.flags.insert(key.to_string(), true);
        self
    }

    /// Whether a pattern requiring `key` may be used. `None` means the
    /// pattern has no requirement.
    pub fn enabled(&self, key: Option<&str>) -> bool {
        match key {
            None => true,
            Some(k) => self.flags.get(k).copied().unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_experimental_generators() {
        let caps = Capabilities::default();
        assert!(caps.enabled(Some("gen_arpeggio_basic")));
        assert!(!caps.enabled(Some("gen_montuno")));
        assert!(!caps.enabled(Some("gen_travis_picking")));
    }

    #[test]
    fn unknown_keys_default_to_enabled() {
        let caps = Capabilities::default();
        assert!(caps.enabled(Some("gen_future_thing")));
        assert!(caps.enabled(None));
    }

    #[test]
    fn overrides_apply() {
        let caps = Capabilities::default()
            .with_disabled("gen_walking_bass")
            .with_enabled("gen_montuno");
        assert!(!caps.enabled(Some("gen_walking_bass")));
        assert!(caps.enabled(Some("gen_montuno")));
    }
}
