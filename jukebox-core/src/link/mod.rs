//! Host link state machine
//!
//! Drives the handshake, heartbeat and telemetry exchange with the host.
//! The machine is explicit, finite and never blocks.

pub mod events;
pub mod machine;
pub mod stage;

pub use events::{LinkEvent, PollOutcome};
pub use machine::{LinkMachine, DEFAULT_HEARTBEAT_TIMEOUT_MS};
pub use stage::Stage;
