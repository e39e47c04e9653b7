//! Link state machine
//!
//! Owns everything the host link needs: stage, heartbeat deadline, the
//! pending input line, telemetry and screen state. Each call to
//! [`LinkMachine::poll`] pulls bytes from the transport, handles at most one
//! completed line and never blocks.

use jukebox_hal::{MonotonicClock, SerialPort};
use jukebox_protocol::{DeviceResponse, HostMessage, LineBuffer};

use super::events::{LinkEvent, PollOutcome};
use super::stage::Stage;
use crate::config::LinkConfig;
use crate::screen::ScreenState;
use crate::telemetry::Telemetry;

/// Default heartbeat window
pub const DEFAULT_HEARTBEAT_TIMEOUT_MS: u32 = 1500;

/// Host link protocol engine
#[derive(Debug, Clone)]
pub struct LinkMachine {
    stage: Stage,
    /// Absolute time (µs) after which the current stage has stalled
    deadline_us: u64,
    timeout_us: u64,
    line: LineBuffer,
    telemetry: Telemetry,
    screen: ScreenState,
    reset_requested: bool,
}

impl Default for LinkMachine {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_TIMEOUT_MS)
    }
}

impl LinkMachine {
    /// Create a machine in `GreetHost` with empty telemetry
    pub const fn new(heartbeat_timeout_ms: u32) -> Self {
        Self {
            stage: Stage::GreetHost,
            deadline_us: 0,
            timeout_us: heartbeat_timeout_ms as u64 * 1000,
            line: LineBuffer::new(),
            telemetry: Telemetry::new(),
            screen: ScreenState::WaitingConnection,
            reset_requested: false,
        }
    }

    /// Create a machine from the link configuration section
    pub const fn from_config(config: &LinkConfig) -> Self {
        Self::new(config.heartbeat_timeout_ms)
    }

    /// Return to the initial state
    ///
    /// Clears telemetry, the pending line and any reset request. Calling it
    /// repeatedly has the same effect as calling it once.
    pub fn reset(&mut self) {
        self.stage = Stage::GreetHost;
        self.screen = ScreenState::WaitingConnection;
        self.line.consume();
        self.telemetry.clear();
        self.reset_requested = false;
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Current screen state
    pub fn screen_state(&self) -> ScreenState {
        self.screen
    }

    /// Last-known telemetry
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Whether the host asked for a bootloader reboot
    ///
    /// Once set, [`Self::poll`] does nothing until [`Self::reset`].
    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    /// Armed heartbeat deadline (µs)
    pub fn deadline_us(&self) -> u64 {
        self.deadline_us
    }

    /// Heartbeat window (µs)
    pub fn heartbeat_timeout_us(&self) -> u64 {
        self.timeout_us
    }

    /// Whether a received line is waiting to be handled
    pub fn line_pending(&self) -> bool {
        self.line.is_ready()
    }

    /// Run one step of the protocol
    pub fn poll<P, C>(&mut self, port: &mut P, clock: &C) -> PollOutcome
    where
        P: SerialPort,
        C: MonotonicClock,
    {
        if self.reset_requested {
            return PollOutcome::event(LinkEvent::ResetRequested);
        }

        // A failed read leaves the buffer as it was; a dead transport is
        // caught by the heartbeat deadline
        let _ = self.line.poll(port);

        let now_us = clock.now_us();
        match self.stage {
            Stage::ErrorWait => self.poll_error_wait(now_us),
            Stage::GreetHost => self.poll_greet_host(),
            Stage::GreetDevice => {
                let ok = respond(port, DeviceResponse::VersionAck);
                self.arm(now_us);
                self.enter(Stage::LinkConfirmHost).write_status(ok)
            }
            Stage::LinkConfirmHost => self.poll_link_confirm_host(now_us),
            Stage::LinkConfirmDevice => {
                let ok = respond(port, DeviceResponse::LinkAck);
                self.arm(now_us);
                self.enter(Stage::TransmitReady).write_status(ok)
            }
            Stage::TransmitReady => self.poll_transmit_ready(port, now_us),
        }
    }

    fn poll_error_wait(&mut self, now_us: u64) -> PollOutcome {
        if !self.expired(now_us) {
            return PollOutcome::idle();
        }
        self.reset();
        PollOutcome::event(LinkEvent::StageChanged {
            from: Stage::ErrorWait,
            to: Stage::GreetHost,
        })
    }

    fn poll_greet_host(&mut self) -> PollOutcome {
        if let Some(line) = self.line.line() {
            let greeted = HostMessage::decode(line) == HostMessage::Greeting;
            self.line.consume();
            if greeted {
                return self.enter(Stage::GreetDevice);
            }
            return PollOutcome::event(LinkEvent::LineDiscarded);
        }

        // No deadline here, so a full buffer would otherwise stay stuck
        if self.line.is_stalled() {
            self.line.consume();
            return PollOutcome::event(LinkEvent::Overflow);
        }

        PollOutcome::idle()
    }

    fn poll_link_confirm_host(&mut self, now_us: u64) -> PollOutcome {
        if let Some(line) = self.line.line() {
            let outcome = match HostMessage::decode(line) {
                HostMessage::LinkAccept => self.enter(Stage::LinkConfirmDevice),
                HostMessage::LinkReject => {
                    self.arm(now_us);
                    self.enter(Stage::ErrorWait)
                }
                _ => PollOutcome::event(LinkEvent::LineDiscarded),
            };
            self.line.consume();
            return outcome;
        }

        if self.expired(now_us) {
            self.line.consume();
            self.arm(now_us);
            self.stage = Stage::ErrorWait;
            return PollOutcome::event(LinkEvent::TimedOut(Stage::LinkConfirmHost));
        }

        PollOutcome::idle()
    }

    fn poll_transmit_ready<P: SerialPort>(&mut self, port: &mut P, now_us: u64) -> PollOutcome {
        self.screen = ScreenState::ShowStats;

        let Some(line) = self.line.line() else {
            if self.expired(now_us) {
                self.line.consume();
                self.arm(now_us);
                self.stage = Stage::ErrorWait;
                self.screen = ScreenState::WaitingConnection;
                return PollOutcome::event(LinkEvent::TimedOut(Stage::TransmitReady));
            }
            return PollOutcome::idle();
        };

        let outcome = match HostMessage::decode(line) {
            HostMessage::Data { kind, payload } => match self.telemetry.apply(kind, payload) {
                Ok(()) => PollOutcome::event(LinkEvent::TelemetryUpdated(kind))
                    .write_status(respond(port, DeviceResponse::DataAck)),
                Err(error) => PollOutcome::event(LinkEvent::TelemetryRejected {
                    kind: Some(kind),
                    error: Some(error),
                })
                .write_status(respond(port, DeviceResponse::DataNack)),
            },
            HostMessage::DataUnknown { .. } => PollOutcome::event(LinkEvent::TelemetryRejected {
                kind: None,
                error: None,
            })
            .write_status(respond(port, DeviceResponse::DataNack)),
            // Lighting is driven locally; the command is accepted and ignored
            HostMessage::RgbControl => PollOutcome::idle(),
            HostMessage::Heartbeat => {
                self.arm(now_us);
                PollOutcome::event(LinkEvent::HeartbeatAcked)
                    .write_status(respond(port, DeviceResponse::HeartbeatAck))
            }
            HostMessage::Disconnect => {
                self.arm(now_us);
                self.stage = Stage::ErrorWait;
                self.screen = ScreenState::WaitingConnection;
                PollOutcome::event(LinkEvent::Disconnected)
                    .write_status(respond(port, DeviceResponse::DisconnectAck))
            }
            HostMessage::Update => {
                self.reset_requested = true;
                PollOutcome::event(LinkEvent::ResetRequested)
                    .write_status(respond(port, DeviceResponse::DisconnectAck))
            }
            HostMessage::Greeting
            | HostMessage::LinkAccept
            | HostMessage::LinkReject
            | HostMessage::Unknown => PollOutcome::event(LinkEvent::LineDiscarded),
        };

        self.line.consume();
        outcome
    }

    /// Move to `to` and report the transition
    fn enter(&mut self, to: Stage) -> PollOutcome {
        let from = self.stage;
        self.stage = to;
        self.screen = ScreenState::for_stage(to);
        PollOutcome::event(LinkEvent::StageChanged { from, to })
    }

    fn arm(&mut self, now_us: u64) {
        self.deadline_us = now_us.saturating_add(self.timeout_us);
    }

    fn expired(&self, now_us: u64) -> bool {
        self.stage.has_deadline() && now_us >= self.deadline_us
    }
}

impl PollOutcome {
    fn write_status(mut self, ok: bool) -> Self {
        self.write_failed = !ok;
        self
    }
}

/// Send a response frame, reporting whether the transport took it
fn respond<P: SerialPort>(port: &mut P, response: DeviceResponse) -> bool {
    port.send(response.as_bytes()).is_ok()
}
