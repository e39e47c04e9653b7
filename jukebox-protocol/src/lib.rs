//! JukeBox Host Link Protocol
//!
//! This crate defines the line protocol spoken between the desktop
//! application (host) and the macropad (device) over a USB CDC serial port.
//!
//! # Protocol Overview
//!
//! Every message is one ASCII/byte line terminated by `\r\n`:
//! ```text
//! ┌──────┬───────────┬──────────────────────────────────┬────────┐
//! │ TAG  │ CHANNEL   │ FIELDS (0x1F-terminated, ASCII)  │ \r\n   │
//! │ 1B   │ 1-2B      │ 0–123B                           │ 2B     │
//! └──────┴───────────┴──────────────────────────────────┴────────┘
//! ```
//!
//! The link is lock-step: greeting, protocol version exchange, link
//! confirmation, then a steady stream of telemetry and heartbeats, each
//! answered by a short acknowledgement frame. There is no checksum; integrity
//! relies on line framing and the ack/nack handshake.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod field;
pub mod fields;
pub mod line;
pub mod messages;

pub use field::{Field, FieldSink};
pub use fields::{parse_fixed_fields, split_fields, FieldError, FIELD_DELIMITER};
pub use line::{LineBuffer, LINE_CAPACITY, LINE_END};
pub use messages::{encode_ack, encode_data, DataKind, DeviceResponse, HostMessage};
