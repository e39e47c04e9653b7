//! Configuration type definitions
//!
//! These types represent the device configuration. The firmware embeds a
//! TOML file and falls back to [`DeviceConfig::default`] when it cannot be
//! used.

use heapless::String;

use crate::link::DEFAULT_HEARTBEAT_TIMEOUT_MS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest refresh interval a polling loop may use
pub const MAX_REFRESH_INTERVAL_MS: u32 = 250;

/// Maximum USB string descriptor length
pub const MAX_USB_STRING_LEN: usize = 32;

/// Configuration section, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigSection {
    Link,
    Serial,
    Screen,
    Usb,
}

/// Semantic configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Refresh interval outside `1..=MAX_REFRESH_INTERVAL_MS`
    IntervalOutOfRange {
        section: ConfigSection,
        interval_ms: u32,
    },
    /// Heartbeat window shorter than two serial refresh periods
    HeartbeatTooShort { timeout_ms: u32, min_ms: u32 },
}

/// Host link timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// Time allowed between host messages before the link is dropped (ms)
    pub heartbeat_timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout_ms: DEFAULT_HEARTBEAT_TIMEOUT_MS,
        }
    }
}

/// Cadence of one cooperative polling job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RefreshConfig {
    /// Period between runs (ms)
    pub interval_ms: u32,
    /// Phase shift relative to other jobs (ms)
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset_ms: u32,
}

impl RefreshConfig {
    pub const fn new(interval_ms: u32, offset_ms: u32) -> Self {
        Self {
            interval_ms,
            offset_ms,
        }
    }

    /// Serial link polling: 250 ms
    pub const fn serial() -> Self {
        Self::new(250, 0)
    }

    /// Screen refresh: 100 ms
    pub const fn screen() -> Self {
        Self::new(100, 0)
    }

    fn validate(&self, section: ConfigSection) -> Result<(), ConfigError> {
        if self.interval_ms == 0 || self.interval_ms > MAX_REFRESH_INTERVAL_MS {
            return Err(ConfigError::IntervalOutOfRange {
                section,
                interval_ms: self.interval_ms,
            });
        }
        Ok(())
    }
}

/// USB device identity
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UsbConfig {
    /// Vendor ID
    pub vid: u16,
    /// Product ID
    pub pid: u16,
    /// Manufacturer string descriptor
    pub manufacturer: String<MAX_USB_STRING_LEN>,
    /// Product string descriptor
    pub product: String<MAX_USB_STRING_LEN>,
}

impl Default for UsbConfig {
    fn default() -> Self {
        let mut manufacturer = String::new();
        let _ = manufacturer.push_str("FriendTeamInc");
        let mut product = String::new();
        let _ = product.push_str("JukeBox V5");
        Self {
            vid: 0x1209,
            pid: 0xF209,
            manufacturer,
            product,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    pub link: LinkConfig,
    pub serial: RefreshConfig,
    pub screen: RefreshConfig,
    pub usb: UsbConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            serial: RefreshConfig::serial(),
            screen: RefreshConfig::screen(),
            usb: UsbConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.serial.validate(ConfigSection::Serial)?;
        self.screen.validate(ConfigSection::Screen)?;

        // The link must survive at least one missed poll
        let min_ms = self.serial.interval_ms.saturating_mul(2);
        if self.link.heartbeat_timeout_ms < min_ms {
            return Err(ConfigError::HeartbeatTooShort {
                timeout_ms: self.link.heartbeat_timeout_ms,
                min_ms,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DeviceConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.link.heartbeat_timeout_ms, 1500);
        assert_eq!(config.serial, RefreshConfig::new(250, 0));
        assert_eq!(config.screen, RefreshConfig::new(100, 0));
        assert_eq!(config.usb.vid, 0x1209);
        assert_eq!(config.usb.product.as_str(), "JukeBox V5");
    }

    #[test]
    fn test_interval_limits() {
        let mut config = DeviceConfig::default();
        config.screen.interval_ms = 251;
        assert_eq!(
            config.validate(),
            Err(ConfigError::IntervalOutOfRange {
                section: ConfigSection::Screen,
                interval_ms: 251
            })
        );

        config.screen.interval_ms = 0;
        assert!(config.validate().is_err());

        config.screen.interval_ms = 250;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_heartbeat_must_cover_two_polls() {
        let mut config = DeviceConfig::default();
        config.link.heartbeat_timeout_ms = 499;
        assert_eq!(
            config.validate(),
            Err(ConfigError::HeartbeatTooShort {
                timeout_ms: 499,
                min_ms: 500
            })
        );

        config.serial.interval_ms = 100;
        assert!(config.validate().is_ok());
    }
}
