//! JukeBox Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the link protocol
//! engine is written against. The firmware implements them on top of the
//! RP2040 USB stack and timer; tests implement them in memory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  jukebox-core (link state machine)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  jukebox-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ USB CDC pipes │       │ in-memory     │
//! │ (firmware)    │       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialPort`] - Non-blocking virtual serial transport
//! - [`clock::MonotonicClock`] - Monotonic microsecond time source

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use clock::MonotonicClock;
pub use serial::{SerialError, SerialPort};
