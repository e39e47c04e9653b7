//! JukeBox - Macropad Firmware
//!
//! Main firmware binary for the RP2040-based JukeBox macropad. The host
//! application streams CPU/GPU statistics over a USB CDC serial link; the
//! device answers the link protocol and shows the latest statistics.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State as AcmState};
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use jukebox_core::config::DeviceConfig;
use jukebox_display::DisplayBackend;

use crate::channels::UPDATES_FINISHED;
use crate::display::LogBackend;
use crate::tasks::usb::USB_MAX_PACKET_SIZE;

mod channels;
mod clock;
mod config;
mod display;
mod serial;
mod tasks;

/// Embedded device configuration (compiled into firmware)
/// Edit jukebox.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../jukebox.toml");

const USB_MAX_POWER: u16 = 100; // milliamps
const USB_DESCRIPTOR_BUF_SIZE: usize = 256;
const USB_SERIAL_NUMBER: &str = "JBV5";

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

// Static cells for data the USB stack and tasks borrow forever
static DEVICE_CONFIG: StaticCell<DeviceConfig> = StaticCell::new();
static CONFIG_DESCRIPTOR: StaticCell<[u8; USB_DESCRIPTOR_BUF_SIZE]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; USB_DESCRIPTOR_BUF_SIZE]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; USB_DESCRIPTOR_BUF_SIZE]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; USB_MAX_PACKET_SIZE]> = StaticCell::new();
static ACM_STATE: StaticCell<AcmState> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("JukeBox firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static DeviceConfig = DEVICE_CONFIG.init(config::load(EMBEDDED_CONFIG));
    info!("Configuration loaded");

    // USB CDC-ACM serial, the only host interface this firmware drives
    let driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(config.usb.vid, config.usb.pid);
    usb_config.manufacturer = Some(config.usb.manufacturer.as_str());
    usb_config.product = Some(config.usb.product.as_str());
    usb_config.serial_number = Some(USB_SERIAL_NUMBER);
    usb_config.max_power = USB_MAX_POWER;
    usb_config.max_packet_size_0 = USB_MAX_PACKET_SIZE as u8;
    // Miscellaneous class with IADs so the CDC pair enumerates as one function
    usb_config.device_class = 0xEF;
    usb_config.device_sub_class = 0x02;
    usb_config.device_protocol = 0x01;
    usb_config.composite_with_iads = true;

    let mut builder = Builder::new(
        driver,
        usb_config,
        CONFIG_DESCRIPTOR.init([0; USB_DESCRIPTOR_BUF_SIZE]),
        BOS_DESCRIPTOR.init([0; USB_DESCRIPTOR_BUF_SIZE]),
        MSOS_DESCRIPTOR.init([0; USB_DESCRIPTOR_BUF_SIZE]),
        CONTROL_BUF.init([0; USB_MAX_PACKET_SIZE]),
    );

    let class = CdcAcmClass::new(
        &mut builder,
        ACM_STATE.init(AcmState::new()),
        USB_MAX_PACKET_SIZE as u16,
    );
    let (sender, receiver) = class.split();
    let device = builder.build();

    info!("USB CDC initialized");

    // Spawn tasks
    spawner.spawn(tasks::usb_device_task(device)).unwrap();
    spawner.spawn(tasks::usb_rx_task(receiver)).unwrap();
    spawner.spawn(tasks::usb_tx_task(sender)).unwrap();
    spawner.spawn(tasks::updates_task(config)).unwrap();

    info!("All tasks spawned, firmware running");

    // The updates task only finishes after a bootloader request
    UPDATES_FINISHED.wait().await;

    let mut display = LogBackend::new();
    if display.clear().and_then(|()| display.flush()).is_err() {
        warn!("Failed to blank display before reset");
    }

    info!("Rebooting into USB bootloader");
    embassy_rp::rom_data::reset_to_usb_boot(0, 0);

    loop {
        cortex_m::asm::wfi();
    }
}
