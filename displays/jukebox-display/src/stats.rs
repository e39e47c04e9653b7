//! Stats and waiting pages
//!
//! Lays out the last-known telemetry as text rows. Hardware names are tinted
//! by vendor; readings sit in fixed-width columns above their labels.

use core::fmt::Write;

use heapless::String;
use jukebox_core::{ScreenState, Telemetry};

use crate::color::Color;
use crate::screen::{Screen, LINE_LEN};

/// Width of one reading column
const COLUMN: usize = 10;

const ROW_CPU_NAME: usize = 0;
const ROW_CPU_VALUES: usize = 1;
const ROW_CPU_LABELS: usize = 2;
const ROW_GPU_NAME: usize = 4;
const ROW_GPU_VALUES: usize = 5;
const ROW_GPU_LABELS: usize = 6;
const ROW_CLOCK_VALUES: usize = 7;
const ROW_CLOCK_LABELS: usize = 8;
const ROW_RAM: usize = 10;

const ROW_TITLE: usize = 0;
const ROW_MESSAGE: usize = 2;

/// Hardware vendor derived from a product name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vendor {
    Amd,
    Intel,
    Nvidia,
    Other,
}

impl Vendor {
    /// Classify by name prefix, ignoring ASCII case
    pub fn classify(name: &str) -> Self {
        let starts_with = |prefix: &str| {
            name.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        };

        if starts_with("AMD") {
            Vendor::Amd
        } else if starts_with("INTEL") {
            Vendor::Intel
        } else if starts_with("NVIDIA") {
            Vendor::Nvidia
        } else {
            Vendor::Other
        }
    }

    /// Accent used for a CPU name
    pub const fn cpu_accent(self) -> Color {
        match self {
            Vendor::Amd => Color::new(255, 63, 0),
            Vendor::Intel => Color::new(0, 127, 255),
            _ => Color::MAGENTA,
        }
    }

    /// Accent used for a GPU name
    pub const fn gpu_accent(self) -> Color {
        match self {
            Vendor::Amd => Color::new(255, 0, 0),
            Vendor::Nvidia => Color::new(127, 255, 127),
            _ => Color::MAGENTA,
        }
    }
}

/// Fill `screen` with the page for `state`
///
/// Rows are only rewritten, never cleared in bulk, so an unchanged page
/// leaves the screen clean.
pub fn render_status(telemetry: &Telemetry, state: ScreenState, screen: &mut Screen) {
    if state.shows_stats() {
        render_stats(telemetry, screen);
    } else {
        render_waiting(state, screen);
    }
}

fn render_waiting(state: ScreenState, screen: &mut Screen) {
    let message = match state {
        ScreenState::ErrorScreen => "Link error",
        _ => "Waiting for connection...",
    };

    for row in 0..screen.rows() {
        let text = match row {
            ROW_TITLE => "JukeBoxStats",
            ROW_MESSAGE => message,
            _ => "",
        };
        screen.set_line(row, text);
        screen.set_color(row, Color::WHITE);
    }
}

fn render_stats(t: &Telemetry, screen: &mut Screen) {
    let mut rows: [(String<LINE_LEN>, Color); 11] = Default::default();

    rows[ROW_CPU_NAME] = (text(&t.cpu_name), Vendor::classify(&t.cpu_name).cpu_accent());
    rows[ROW_CPU_VALUES].0 = columns(&[
        t.cpu_freq.as_str(),
        t.cpu_load.as_str(),
        t.cpu_temp.as_str(),
    ]);
    rows[ROW_CPU_LABELS].0 = columns(&["FreqGHz", "Load%", "Temp°C"]);

    rows[ROW_GPU_NAME] = (text(&t.gpu_name), Vendor::classify(&t.gpu_name).gpu_accent());
    rows[ROW_GPU_VALUES].0 = columns(&[
        t.gpu_core_load.as_str(),
        t.gpu_vram_load.as_str(),
        t.gpu_temp.as_str(),
    ]);
    rows[ROW_GPU_LABELS].0 = columns(&["Load%", "Vram%", "Temp°C"]);
    rows[ROW_CLOCK_VALUES].0 = columns(&[t.gpu_core_clock.as_str(), t.gpu_vram_clock.as_str()]);
    rows[ROW_CLOCK_LABELS].0 = columns(&["CoreMHz", "VramMHz"]);

    let mut ram = String::new();
    let _ = write!(ram, "RAM: {} / {}", t.ram_used.as_str(), t.ram_count.as_str());
    rows[ROW_RAM] = (ram, Color::MAGENTA);

    for (row, (line, color)) in rows.iter_mut().enumerate() {
        if line.is_empty() {
            *color = Color::WHITE;
        }
        screen.set_line(row, line);
        screen.set_color(row, *color);
    }
    for row in rows.len()..screen.rows() {
        screen.set_line(row, "");
        screen.set_color(row, Color::WHITE);
    }
}

/// Copy as much of `value` as fits, cut on a character boundary
fn text(value: &str) -> String<LINE_LEN> {
    let mut line = String::new();
    for c in value.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

/// Left-align each cell in a fixed-width column
fn columns(cells: &[&str]) -> String<LINE_LEN> {
    let mut line = String::new();
    for cell in cells {
        let _ = write!(line, "{cell:<COLUMN$}");
    }
    // Trailing padding only costs row space
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use jukebox_protocol::{encode_data, DataKind};

    fn apply(t: &mut Telemetry, kind: DataKind, values: &[&str]) {
        let line: Vec<u8, 128> = encode_data(kind, values).unwrap();
        t.apply(kind, &line[3..]).unwrap();
    }

    fn sample() -> Telemetry {
        let mut t = Telemetry::new();
        apply(
            &mut t,
            DataKind::Identity,
            &["AMD Ryzen 7 5800X", "NVIDIA RTX 3080", "32.0"],
        );
        apply(
            &mut t,
            DataKind::Stats,
            &["4.70", "65", "12", "18.2", "54", "1905", "33", "9501", "21"],
        );
        t
    }

    #[test]
    fn test_classify_vendor() {
        assert_eq!(Vendor::classify("AMD Ryzen 9"), Vendor::Amd);
        assert_eq!(Vendor::classify("amd radeon"), Vendor::Amd);
        assert_eq!(Vendor::classify("Intel Core i7"), Vendor::Intel);
        assert_eq!(Vendor::classify("NVIDIA GeForce"), Vendor::Nvidia);
        assert_eq!(Vendor::classify("Apple M2"), Vendor::Other);
        assert_eq!(Vendor::classify("AM"), Vendor::Other);
        assert_eq!(Vendor::classify(""), Vendor::Other);
    }

    #[test]
    fn test_accents() {
        assert_eq!(Vendor::Amd.cpu_accent(), Color::new(255, 63, 0));
        assert_eq!(Vendor::Intel.cpu_accent(), Color::new(0, 127, 255));
        assert_eq!(Vendor::Nvidia.cpu_accent(), Color::MAGENTA);
        assert_eq!(Vendor::Amd.gpu_accent(), Color::new(255, 0, 0));
        assert_eq!(Vendor::Nvidia.gpu_accent(), Color::new(127, 255, 127));
        assert_eq!(Vendor::Intel.gpu_accent(), Color::MAGENTA);
    }

    #[test]
    fn test_waiting_page() {
        let mut screen = Screen::new();
        render_status(&sample(), ScreenState::WaitingConnection, &mut screen);

        assert_eq!(screen.get_line(0), Some("JukeBoxStats"));
        assert_eq!(screen.get_line(2), Some("Waiting for connection..."));
        // Telemetry is not shown before the link comes up
        assert!(screen.lines().all(|l| !l.contains("Ryzen")));
    }

    #[test]
    fn test_stats_page_layout() {
        let mut screen = Screen::new();
        render_status(&sample(), ScreenState::ShowStats, &mut screen);

        assert_eq!(screen.get_line(0), Some("AMD Ryzen 7 5800X"));
        assert_eq!(screen.get_color(0), Some(Color::new(255, 63, 0)));
        assert_eq!(screen.get_line(1), Some("4.70      12        65"));
        assert_eq!(screen.get_line(2), Some("FreqGHz   Load%     Temp°C"));

        assert_eq!(screen.get_line(4), Some("NVIDIA RTX 3080"));
        assert_eq!(screen.get_color(4), Some(Color::new(127, 255, 127)));
        assert_eq!(screen.get_line(5), Some("33        21        54"));
        assert_eq!(screen.get_line(7), Some("1905      9501"));
        assert_eq!(screen.get_line(8), Some("CoreMHz   VramMHz"));

        assert_eq!(screen.get_line(10), Some("RAM: 18.2 / 32.0"));
        assert_eq!(screen.get_color(10), Some(Color::MAGENTA));
    }

    #[test]
    fn test_rerender_keeps_screen_clean() {
        let t = sample();
        let mut screen = Screen::new();
        render_status(&t, ScreenState::ShowStats, &mut screen);
        screen.mark_clean();

        render_status(&t, ScreenState::ShowStats, &mut screen);
        assert!(!screen.is_dirty());

        render_status(&t, ScreenState::WaitingConnection, &mut screen);
        assert!(screen.is_dirty());
        assert_eq!(screen.get_line(10), Some(""));
        assert_eq!(screen.get_color(0), Some(Color::WHITE));
    }

    #[test]
    fn test_error_page() {
        let mut screen = Screen::new();
        render_status(&Telemetry::new(), ScreenState::ErrorScreen, &mut screen);
        assert_eq!(screen.get_line(2), Some("Link error"));
    }
}
