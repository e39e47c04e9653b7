//! Build script for jukebox-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates jukebox.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use jukebox_core::config::{ConfigError, ConfigSection, DeviceConfig};

/// Keys accepted in each section
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("link", &["heartbeat_timeout_ms"]),
    ("serial", &["interval_ms", "offset_ms"]),
    ("screen", &["interval_ms", "offset_ms"]),
    ("usb", &["vid", "pid", "manufacturer", "product"]),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate jukebox.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=jukebox.toml");

    let config_path = Path::new("jukebox.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: jukebox.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds jukebox.toml as its device configuration.   ║\n\
            ║  Please create one in the jukebox-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read jukebox.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse TOML syntax first so unknown keys can be reported by name
    let value: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail("Invalid TOML syntax in jukebox.toml", &e.to_string()),
    };

    validate_known_keys(&value);

    let config: DeviceConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => fail("Invalid value in jukebox.toml", &e.to_string()),
    };

    if let Err(e) = config.validate() {
        fail("Invalid device configuration", &describe(e));
    }

    println!("cargo:warning=jukebox.toml validated successfully");
}

/// Reject sections and keys the firmware parser would refuse
fn validate_known_keys(config: &toml::Value) {
    let Some(root) = config.as_table() else {
        return;
    };

    let mut errors = Vec::new();

    for (section, body) in root {
        let Some((_, keys)) = KNOWN_KEYS.iter().find(|(name, _)| name == section) else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };

        let Some(table) = body.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };

        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", section, key));
            }
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Unknown entries in jukebox.toml                          ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

fn describe(error: ConfigError) -> String {
    match error {
        ConfigError::IntervalOutOfRange {
            section,
            interval_ms,
        } => {
            let name = match section {
                ConfigSection::Link => "link",
                ConfigSection::Serial => "serial",
                ConfigSection::Screen => "screen",
                ConfigSection::Usb => "usb",
            };
            format!("[{}] interval_ms = {} must be 1-250", name, interval_ms)
        }
        ConfigError::HeartbeatTooShort { timeout_ms, min_ms } => format!(
            "[link] heartbeat_timeout_ms = {} must be at least {}",
            timeout_ms, min_ms
        ),
    }
}

fn fail(title: &str, detail: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(detail)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
