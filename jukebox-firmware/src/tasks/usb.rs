//! USB CDC tasks
//!
//! Runs the USB device and moves serial packets between the CDC endpoints
//! and the byte pipes read by the link machine.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::cdc_acm::{Receiver, Sender};
use embassy_usb::driver::EndpointError;
use embassy_usb::UsbDevice;

use crate::channels::{USB_CONNECTED, USB_RX, USB_TX};

/// Full-speed bulk packet size
pub const USB_MAX_PACKET_SIZE: usize = 64;

pub type UsbDriver = Driver<'static, USB>;

/// USB device task - services enumeration and control transfers
#[embassy_executor::task]
pub async fn usb_device_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// USB RX task - forwards received packets into the RX pipe
#[embassy_executor::task]
pub async fn usb_rx_task(mut receiver: Receiver<'static, UsbDriver>) {
    info!("USB RX task started");

    let mut buf = [0u8; USB_MAX_PACKET_SIZE];

    loop {
        receiver.wait_connection().await;
        info!("USB serial connected");
        USB_CONNECTED.store(true, Ordering::Relaxed);

        loop {
            match receiver.read_packet(&mut buf).await {
                Ok(n) => {
                    trace!("RX: {} bytes", n);
                    USB_RX.write_all(&buf[..n]).await;
                }
                Err(EndpointError::BufferOverflow) => {
                    warn!("USB RX packet too large, dropped");
                }
                Err(EndpointError::Disabled) => break,
            }
        }

        USB_CONNECTED.store(false, Ordering::Relaxed);
        // Stale bytes from the old session must not reach a new handshake
        USB_RX.clear();
        USB_TX.clear();
        info!("USB serial disconnected");
    }
}

/// USB TX task - sends queued response frames to the host
#[embassy_executor::task]
pub async fn usb_tx_task(mut sender: Sender<'static, UsbDriver>) {
    info!("USB TX task started");

    let mut buf = [0u8; USB_MAX_PACKET_SIZE];

    loop {
        sender.wait_connection().await;

        loop {
            let n = USB_TX.read(&mut buf).await;
            if let Err(e) = write_frame(&mut sender, &buf[..n]).await {
                warn!("USB TX failed: {:?}", e);
                break;
            }
            trace!("TX: {} bytes", n);
        }
    }
}

async fn write_frame(
    sender: &mut Sender<'static, UsbDriver>,
    data: &[u8],
) -> Result<(), EndpointError> {
    sender.write_packet(data).await?;
    // A full packet needs a zero-length packet to end the transfer
    if data.len() == USB_MAX_PACKET_SIZE {
        sender.write_packet(&[]).await?;
    }
    Ok(())
}
