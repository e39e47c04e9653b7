//! Display output
//!
//! The LCD rasteriser and SPI transfer are board plumbing outside this
//! firmware's link logic. Until a panel driver is attached, screen content is
//! mirrored to the defmt log.

use defmt::*;

use jukebox_display::{Color, DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

/// Display backend that writes each redraw to the log
#[derive(Debug, Default)]
pub struct LogBackend {
    frames: u32,
}

impl LogBackend {
    pub const fn new() -> Self {
        Self { frames: 0 }
    }
}

impl DisplayBackend for LogBackend {
    fn clear(&mut self) -> Result<(), DisplayError> {
        trace!("LCD clear");
        Ok(())
    }

    fn draw_text(
        &mut self,
        row: u8,
        col: u8,
        text: &str,
        color: Color,
    ) -> Result<(), DisplayError> {
        if usize::from(row) >= SCREEN_ROWS || usize::from(col) >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        debug!(
            "LCD[{=u8:02}] #{=u16:04x} {=str}",
            row,
            color.to_rgb565(),
            text
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.frames = self.frames.wrapping_add(1);
        trace!("LCD frame {} done", self.frames);
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }

    fn is_ready(&self) -> bool {
        true
    }
}
