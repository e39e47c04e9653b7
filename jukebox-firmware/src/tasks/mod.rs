//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod updates;
pub mod usb;

pub use updates::updates_task;
pub use usb::{usb_device_task, usb_rx_task, usb_tx_task};
