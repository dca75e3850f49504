//! Fuzz target: `EngineConfig` JSON parsing
//!
//! Feeds arbitrary bytes to the config loader and verifies:
//! - No panics on any input
//! - Anything that parses and validates has a non-zero sweep length
//! - A validated config survives a serialise → parse round trip
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use analog_emu::config::EngineConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = EngineConfig::from_json(text) else {
        return;
    };
    let Ok(params) = config.validate() else {
        assert_eq!(config.max_duty_value, 0);
        return;
    };
    assert!(params.steps_per_sweep() > 0);

    let json = config.to_json().expect("validated config must serialise");
    let again = EngineConfig::from_json(&json).expect("own output must parse");
    assert_eq!(config, again);
});
