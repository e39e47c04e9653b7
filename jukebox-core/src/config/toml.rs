//! Simple TOML parser for device configuration
//!
//! This is a minimal, allocation-free parser that handles only the subset
//! needed for `jukebox.toml`. It does NOT support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - Decimal and `0x` hexadecimal integers, `_` digit separators
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings, escapes inside strings
//! - Arrays and inline tables
//! - Dotted keys

use heapless::String;

use super::types::{DeviceConfig, RefreshConfig, MAX_USB_STRING_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed section header
    InvalidSection { line: usize },
    /// Section name not known
    UnknownSection { line: usize },
    /// Key not known in its section
    UnknownKey { line: usize },
    /// Line is neither a header nor `key = value`
    InvalidLine { line: usize },
    /// Value has the wrong type or is out of range
    InvalidValue { line: usize },
    /// String longer than the destination allows
    StringTooLong { line: usize },
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Link,
    Serial,
    Screen,
    Usb,
}

/// Parse TOML configuration into DeviceConfig
///
/// Keys not present keep their default values. The result is not validated;
/// call [`DeviceConfig::validate`] afterwards.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ParseError::InvalidSection { line: line_no })?;
            section = parse_section_header(name.trim(), line_no)?;
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ParseError::InvalidLine { line: line_no })?;
        apply_value(&mut config, section, key, value, line_no)?;
    }

    Ok(config)
}

fn parse_section_header(name: &str, line: usize) -> Result<Section, ParseError> {
    match name {
        "link" => Ok(Section::Link),
        "serial" => Ok(Section::Serial),
        "screen" => Ok(Section::Screen),
        "usb" => Ok(Section::Usb),
        "" => Err(ParseError::InvalidSection { line }),
        _ => Err(ParseError::UnknownSection { line }),
    }
}

fn apply_value(
    config: &mut DeviceConfig,
    section: Section,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Link, "heartbeat_timeout_ms") => {
            config.link.heartbeat_timeout_ms = parse_int(value, line)?;
        }
        (Section::Serial, _) => apply_refresh(&mut config.serial, key, value, line)?,
        (Section::Screen, _) => apply_refresh(&mut config.screen, key, value, line)?,
        (Section::Usb, "vid") => config.usb.vid = parse_int(value, line)?,
        (Section::Usb, "pid") => config.usb.pid = parse_int(value, line)?,
        (Section::Usb, "manufacturer") => {
            config.usb.manufacturer = parse_label(value, line)?;
        }
        (Section::Usb, "product") => config.usb.product = parse_label(value, line)?,
        _ => return Err(ParseError::UnknownKey { line }),
    }
    Ok(())
}

fn apply_refresh(
    refresh: &mut RefreshConfig,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match key {
        "interval_ms" => refresh.interval_ms = parse_int(value, line)?,
        "offset_ms" => refresh.offset_ms = parse_int(value, line)?,
        _ => return Err(ParseError::UnknownKey { line }),
    }
    Ok(())
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_int<T: TryFrom<u64>>(value: &str, line: usize) -> Result<T, ParseError> {
    let invalid = ParseError::InvalidValue { line };

    let (digits, radix) = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };

    let mut result: u64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        if c == '_' && seen_digit {
            continue;
        }
        let digit = c.to_digit(radix).ok_or(invalid)?;
        result = result
            .checked_mul(u64::from(radix))
            .and_then(|r| r.checked_add(u64::from(digit)))
            .ok_or(invalid)?;
        seen_digit = true;
    }

    if !seen_digit {
        return Err(invalid);
    }

    T::try_from(result).map_err(|_| invalid)
}

fn parse_label(value: &str, line: usize) -> Result<String<MAX_USB_STRING_LEN>, ParseError> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue { line })?;

    let mut label = String::new();
    label
        .push_str(inner)
        .map_err(|_| ParseError::StringTooLong { line })?;
    Ok(label)
}
