//! Inter-task communication channels
//!
//! Defines the statics shared between the USB tasks, the updates task and
//! main. Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

/// Capacity of each USB byte pipe
pub const PIPE_SIZE: usize = 256;

/// Bytes received from the host, waiting for the link machine
pub static USB_RX: Pipe<CriticalSectionRawMutex, PIPE_SIZE> = Pipe::new();

/// Response frames waiting to be sent to the host
pub static USB_TX: Pipe<CriticalSectionRawMutex, PIPE_SIZE> = Pipe::new();

/// Whether the CDC interface is currently configured by a host
pub static USB_CONNECTED: AtomicBool = AtomicBool::new(false);

/// Signal that the updates task has stopped after a bootloader request
pub static UPDATES_FINISHED: Signal<CriticalSectionRawMutex, ()> = Signal::new();
