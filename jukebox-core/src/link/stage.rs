//! Link stages
//!
//! The host link is a lock-step handshake followed by steady-state exchange:
//!
//! ```text
//! GreetHost ──JB␅──▶ GreetDevice ──P001──▶ LinkConfirmHost ──P␆──▶ LinkConfirmDevice
//!     ▲                                     │ P␕ / timeout              │ L␆
//!     │                                     ▼                           ▼
//!     └──────── deadline ──────────── ErrorWait ◀── timeout / U0 ── TransmitReady
//! ```

/// Protocol stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Backing off after a failure; resets the link once the deadline passes
    ErrorWait,
    /// Waiting for the host greeting
    #[default]
    GreetHost,
    /// Greeting received; version reply goes out on the next poll
    GreetDevice,
    /// Waiting for the host to accept or reject the link
    LinkConfirmHost,
    /// Host accepted; link ack goes out on the next poll
    LinkConfirmDevice,
    /// Linked; exchanging telemetry and heartbeats
    TransmitReady,
}

impl Stage {
    /// Check if this stage runs against the heartbeat deadline
    pub fn has_deadline(&self) -> bool {
        matches!(
            self,
            Stage::ErrorWait | Stage::LinkConfirmHost | Stage::TransmitReady
        )
    }

    /// Check if the link is fully established
    pub fn is_linked(&self) -> bool {
        matches!(self, Stage::TransmitReady)
    }
}
