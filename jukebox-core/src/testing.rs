//! In-memory transport and clock for host tests

use core::cell::Cell;
use jukebox_hal::{MonotonicClock, SerialError, SerialPort};
use std::collections::VecDeque;
use std::vec::Vec;

/// Loopback-style serial port
///
/// Bytes queued with [`MemoryPort::feed`] are delivered in `chunk` sized
/// reads; everything the device writes lands in `tx`.
pub struct MemoryPort {
    rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub chunk: usize,
    pub fail_writes: bool,
}

impl Default for MemoryPort {
    fn default() -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
            chunk: 64,
            fail_writes: false,
        }
    }
}

impl MemoryPort {
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Take everything written so far
    pub fn take_tx(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.tx)
    }

    pub fn pending_rx(&self) -> usize {
        self.rx.len()
    }
}

impl SerialPort for MemoryPort {
    type Error = SerialError;

    fn available(&self) -> bool {
        !self.rx.is_empty()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.chunk).min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(SerialError::Disconnected);
        }
        self.tx.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Manually stepped clock
#[derive(Default)]
pub struct ManualClock {
    now_us: Cell<u64>,
}

impl ManualClock {
    pub fn advance_ms(&self, ms: u64) {
        self.now_us.set(self.now_us.get() + ms * 1000);
    }
}

impl MonotonicClock for ManualClock {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}
