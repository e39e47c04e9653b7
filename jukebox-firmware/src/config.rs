//! Configuration loading
//!
//! Parses the embedded `jukebox.toml` at boot. Any parse or validation error
//! falls back to the built-in defaults, which are always valid.

use defmt::*;

use jukebox_core::config::{parse_config, DeviceConfig};

/// Parse and validate the embedded configuration
pub fn load(source: &str) -> DeviceConfig {
    let config = match parse_config(source) {
        Ok(config) => config,
        Err(e) => {
            // build.rs checks the same file, so this only happens if the
            // two parsers disagree
            error!("Failed to parse embedded config: {}", e);
            return DeviceConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        error!("Embedded config rejected: {}", e);
        return DeviceConfig::default();
    }

    info!(
        "Config: heartbeat={}ms serial={}ms screen={}ms usb={=u16:04x}:{=u16:04x}",
        config.link.heartbeat_timeout_ms,
        config.serial.interval_ms,
        config.screen.interval_ms,
        config.usb.vid,
        config.usb.pid
    );
    config
}
