//! Screen buffer types
//!
//! Provides a character-based screen buffer for the stats pages.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};
use crate::color::Color;

/// Number of character rows (320 px panel, 16 px cells)
pub const SCREEN_ROWS: usize = 20;

/// Number of character columns (240 px panel, 8 px cells)
pub const SCREEN_COLS: usize = 30;

/// Bytes reserved per row; leaves room for multi-byte characters
pub const LINE_LEN: usize = 40;

/// Screen buffer for text-mode rendering
#[derive(Clone)]
pub struct Screen {
    /// Current display content
    lines: [String<LINE_LEN>; SCREEN_ROWS],
    /// Text colour per row
    colors: [Color; SCREEN_ROWS],
    /// Whether the screen needs to be redrawn
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            colors: [Color::WHITE; SCREEN_ROWS],
            dirty: true,
        }
    }

    /// Clear the entire screen
    pub fn clear(&mut self) {
        for row in 0..SCREEN_ROWS {
            self.set_line(row, "");
            self.set_color(row, Color::WHITE);
        }
    }

    /// Set the content of a specific row
    ///
    /// Text longer than a row is cut on a character boundary. The screen
    /// only becomes dirty when the content actually changes.
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };

        let text = truncate_cols(text, SCREEN_COLS, LINE_LEN);
        if line.as_str() == text {
            return;
        }

        line.clear();
        let _ = line.push_str(text);
        self.dirty = true;
    }

    /// Set the text colour of a row
    pub fn set_color(&mut self, row: usize, color: Color) {
        if let Some(slot) = self.colors.get_mut(row) {
            if *slot != color {
                *slot = color;
                self.dirty = true;
            }
        }
    }

    /// Get the content of a specific row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Get the colour of a specific row
    pub fn get_color(&self, row: usize) -> Option<Color> {
        self.colors.get(row).copied()
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Get all lines as an iterator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    /// Push the screen to a backend if anything changed
    ///
    /// Returns whether a redraw happened.
    pub fn render<B: DisplayBackend>(&mut self, backend: &mut B) -> Result<bool, DisplayError> {
        if !self.dirty {
            return Ok(false);
        }
        if !backend.is_ready() {
            return Err(DisplayError::NotInitialized);
        }

        backend.clear()?;
        for (row, (line, color)) in self.lines.iter().zip(self.colors.iter()).enumerate() {
            if !line.is_empty() {
                backend.draw_text(row as u8, 0, line, *color)?;
            }
        }
        backend.flush()?;

        self.dirty = false;
        Ok(true)
    }

    /// Get number of rows
    pub const fn rows(&self) -> usize {
        SCREEN_ROWS
    }

    /// Get number of columns
    pub const fn cols(&self) -> usize {
        SCREEN_COLS
    }
}

/// Longest prefix of `text` with at most `cols` characters and `bytes` bytes
fn truncate_cols(text: &str, cols: usize, bytes: usize) -> &str {
    let mut end = 0;
    for (count, (i, c)) in text.char_indices().enumerate() {
        if count == cols || i + c.len_utf8() > bytes {
            break;
        }
        end = i + c.len_utf8();
    }
    &text[..end]
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().filter(|l| !l.is_empty()).enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}
