//! Events reported by the link state machine
//!
//! The machine itself does not log; the firmware task turns these into log
//! lines and reacts to the reset request.

use super::stage::Stage;
use jukebox_protocol::{DataKind, FieldError};

/// Something notable that happened during one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Regular stage transition
    StageChanged { from: Stage, to: Stage },
    /// Heartbeat deadline passed while in `stage`; now in `ErrorWait`
    TimedOut(Stage),
    /// Telemetry record parsed and committed
    TelemetryUpdated(DataKind),
    /// Telemetry record refused (NACKed)
    TelemetryRejected {
        /// `None` when the sub-tag itself was not recognised
        kind: Option<DataKind>,
        error: Option<FieldError>,
    },
    /// Heartbeat answered, deadline re-armed
    HeartbeatAcked,
    /// Host asked to disconnect; now in `ErrorWait`
    Disconnected,
    /// Host asked for a reboot into the bootloader
    ResetRequested,
    /// Line did not match anything expected in the current stage
    LineDiscarded,
    /// Line buffer filled up without a terminator and was dropped
    Overflow,
}

impl LinkEvent {
    /// Check if this event moved the link backwards
    pub fn is_link_loss(&self) -> bool {
        matches!(
            self,
            LinkEvent::TimedOut(_)
                | LinkEvent::Disconnected
                | LinkEvent::StageChanged {
                    to: Stage::ErrorWait,
                    ..
                }
        )
    }
}

/// Result of one [`LinkMachine::poll`](super::LinkMachine::poll)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollOutcome {
    /// What happened, if anything
    pub event: Option<LinkEvent>,
    /// A response frame could not be handed to the transport
    pub write_failed: bool,
}

impl PollOutcome {
    /// Nothing happened
    pub const fn idle() -> Self {
        Self {
            event: None,
            write_failed: false,
        }
    }

    /// Outcome carrying one event
    pub const fn event(event: LinkEvent) -> Self {
        Self {
            event: Some(event),
            write_failed: false,
        }
    }

    /// Check if the poll changed nothing observable
    pub fn is_idle(&self) -> bool {
        self.event.is_none() && !self.write_failed
    }
}
