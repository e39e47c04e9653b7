//! Display abstraction and shared layout for JukeBox
//!
//! This crate provides:
//! - `DisplayBackend` trait for different display types (SPI LCD, logging)
//! - `Screen` text buffer with per-row colours
//! - The stats page layout fed from the link core's telemetry
//!
//! # Architecture
//!
//! The firmware renders telemetry into a [`Screen`] on its own cadence and
//! pushes the screen to whichever backend it owns. The layout knows nothing
//! about the hardware, and backends know nothing about telemetry.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod backend;
pub mod color;
pub mod screen;
pub mod stats;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use color::Color;
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
pub use stats::{render_status, Vendor};
