//! Board-agnostic core logic for the JukeBox macropad firmware
//!
//! This crate contains all host link logic that does not depend on
//! specific hardware implementations:
//!
//! - Link state machine (handshake, heartbeat, telemetry exchange)
//! - Telemetry store read by the display
//! - Screen state flag
//! - Refresh scheduling for cooperative polling loops
//! - Configuration type definitions and parsing

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod link;
pub mod scheduler;
pub mod screen;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use link::{LinkEvent, LinkMachine, PollOutcome, Stage};
pub use screen::ScreenState;
pub use telemetry::Telemetry;
