//! Virtual serial port over the USB pipes
//!
//! The USB tasks move packets between the CDC endpoints and two byte pipes.
//! [`PipeSerial`] gives the link machine a non-blocking view of them.

use core::sync::atomic::Ordering;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use jukebox_hal::{SerialError, SerialPort};

use crate::channels::{PIPE_SIZE, USB_CONNECTED};

type BytePipe = Pipe<CriticalSectionRawMutex, PIPE_SIZE>;

/// Non-blocking serial port on top of the RX and TX pipes
pub struct PipeSerial {
    rx: &'static BytePipe,
    tx: &'static BytePipe,
}

impl PipeSerial {
    pub fn new(rx: &'static BytePipe, tx: &'static BytePipe) -> Self {
        Self { rx, tx }
    }
}

impl SerialPort for PipeSerial {
    type Error = SerialError;

    fn available(&self) -> bool {
        !self.rx.is_empty()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        // Empty is the only failure and just means nothing arrived
        Ok(self.rx.try_read(buf).unwrap_or(0))
    }

    fn write(&mut self, data: &[u8]) -> Result<(), SerialError> {
        if !USB_CONNECTED.load(Ordering::Relaxed) {
            return Err(SerialError::Disconnected);
        }
        // Frames are queued whole or not at all
        if self.tx.free_capacity() < data.len() {
            return Err(SerialError::WouldBlock);
        }

        let mut rest = data;
        while !rest.is_empty() {
            let written = self
                .tx
                .try_write(rest)
                .map_err(|_| SerialError::WouldBlock)?;
            rest = &rest[written..];
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        // The TX task drains the pipe as soon as it holds data
        Ok(())
    }
}
