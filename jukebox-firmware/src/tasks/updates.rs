//! Link and display update task
//!
//! Cooperative loop that polls the link machine on the serial cadence and
//! redraws the screen on the screen cadence. After the host asks for the
//! bootloader it waits for the acknowledgement to drain, signals main and
//! returns.

use defmt::*;
use embassy_time::Timer;

use jukebox_core::config::DeviceConfig;
use jukebox_core::scheduler::RefreshTimer;
use jukebox_core::{LinkEvent, LinkMachine, PollOutcome};
use jukebox_display::{render_status, Screen};
use jukebox_hal::MonotonicClock;

use crate::channels::{UPDATES_FINISHED, USB_RX, USB_TX};
use crate::clock::EmbassyClock;
use crate::display::LogBackend;
use crate::serial::PipeSerial;

/// Time given to the USB stack to send the final acknowledgement
const RESET_DRAIN_MS: u64 = 1000;

/// Updates task - runs the host link and the stats screen
#[embassy_executor::task]
pub async fn updates_task(config: &'static DeviceConfig) {
    info!("Updates task started");

    let clock = EmbassyClock;
    let mut port = PipeSerial::new(&USB_RX, &USB_TX);
    let mut link = LinkMachine::from_config(&config.link);
    let mut screen = Screen::new();
    let mut display = LogBackend::new();

    let mut serial_timer = RefreshTimer::from_config(&config.serial);
    let mut screen_timer = RefreshTimer::from_config(&config.screen);
    let start = clock.now_ms();
    serial_timer.reset(start);
    screen_timer.reset(start);

    loop {
        let now = clock.now_ms();

        if serial_timer.poll(now) {
            let outcome = link.poll(&mut port, &clock);
            report(&outcome);
            if link.reset_requested() {
                break;
            }
        }

        if screen_timer.poll(now) {
            render_status(link.telemetry(), link.screen_state(), &mut screen);
            if let Err(e) = screen.render(&mut display) {
                warn!("Screen redraw failed: {}", e);
            }
        }

        let wait = serial_timer
            .remaining_ms(now)
            .min(screen_timer.remaining_ms(now))
            .max(1);
        Timer::after_millis(wait).await;
    }

    info!("Bootloader requested, draining USB output");
    Timer::after_millis(RESET_DRAIN_MS).await;
    UPDATES_FINISHED.signal(());
    info!("Updates task stopped");
}

/// Log what the link machine reported
fn report(outcome: &PollOutcome) {
    if outcome.write_failed {
        warn!("Response frame could not be queued");
    }

    let Some(event) = outcome.event else {
        return;
    };

    match event {
        LinkEvent::StageChanged { from, to } if event.is_link_loss() => {
            warn!("Link dropped: {} -> {}", from, to)
        }
        LinkEvent::StageChanged { from, to } => info!("Link {} -> {}", from, to),
        LinkEvent::TimedOut(stage) => warn!("Heartbeat timeout in {}", stage),
        LinkEvent::TelemetryUpdated(kind) => trace!("Telemetry updated: {}", kind),
        LinkEvent::TelemetryRejected { kind, error } => {
            warn!("Telemetry rejected: kind={} error={}", kind, error)
        }
        LinkEvent::HeartbeatAcked => trace!("Heartbeat"),
        LinkEvent::Disconnected => info!("Host disconnected"),
        LinkEvent::ResetRequested => info!("Host requested bootloader"),
        LinkEvent::LineDiscarded => debug!("Unexpected line discarded"),
        LinkEvent::Overflow => warn!("Input line overflowed, dropped"),
    }
}
