//! Message types for the host link
//!
//! Message types are divided into two categories:
//! - Host → Device: greeting, link confirmation, telemetry, heartbeat, update
//! - Device → Host: fixed acknowledgement frames

use crate::fields::{FieldError, FIELD_DELIMITER};
use crate::line::LINE_END;
use heapless::Vec;

// Tokens: Host → Device
pub const GREETING: &[u8] = b"JB\x05";
pub const LINK_ACCEPT: &[u8] = b"P\x06";
pub const LINK_REJECT: &[u8] = b"P\x15";

pub const TAG_DATA: u8 = b'D';
pub const TAG_HEARTBEAT: u8 = b'H';
pub const TAG_UPDATE: u8 = b'U';

pub const CHANNEL_STATS: u8 = 0x11;
pub const CHANNEL_RGB: u8 = 0x12;

pub const STATS_IDENTITY: u8 = 0x30;
pub const STATS_DYNAMIC: u8 = 0x31;

pub const HEARTBEAT_PING: u8 = 0x30;

pub const UPDATE_DISCONNECT: u8 = 0x30;
pub const UPDATE_BOOTLOADER: u8 = 0x31;

// Control bytes used in responses
pub const ACK: u8 = 0x06;
pub const NAK: u8 = 0x15;
pub const EOT: u8 = 0x04;

/// Protocol version announced during the handshake
pub const PROTOCOL_VERSION: &str = "001";

/// Offset of the first field in a data message (`D`, channel, sub-tag)
pub const DATA_PAYLOAD_OFFSET: usize = 3;

/// Telemetry record carried by a data message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataKind {
    /// Static hardware identity (CPU name, GPU name, RAM total)
    Identity,
    /// Dynamic load, clock and temperature readings
    Stats,
}

impl DataKind {
    /// Number of fields the record must carry
    pub const fn field_count(self) -> usize {
        match self {
            DataKind::Identity => 3,
            DataKind::Stats => 9,
        }
    }

    /// Sub-tag byte following the stats channel
    pub const fn tag(self) -> u8 {
        match self {
            DataKind::Identity => STATS_IDENTITY,
            DataKind::Stats => STATS_DYNAMIC,
        }
    }

    /// Map a sub-tag byte to its record kind
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            STATS_IDENTITY => Some(DataKind::Identity),
            STATS_DYNAMIC => Some(DataKind::Stats),
            _ => None,
        }
    }
}

/// Messages from the host to the device
///
/// Decoding never fails: anything unrecognised becomes [`HostMessage::Unknown`]
/// and the link state decides what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage<'a> {
    /// `JB 0x05` handshake greeting
    Greeting,
    /// `P 0x06` link confirmation
    LinkAccept,
    /// `P 0x15` link rejection
    LinkReject,
    /// `D 0x11 {0x30|0x31}` telemetry record
    Data {
        kind: DataKind,
        /// Delimited fields, line terminator stripped
        payload: &'a [u8],
    },
    /// `D 0x11` with an unrecognised sub-tag
    DataUnknown { tag: u8 },
    /// `D 0x12` lighting control (accepted, not acted upon)
    RgbControl,
    /// `H 0x30` heartbeat ping
    Heartbeat,
    /// `U 0x30` orderly disconnect
    Disconnect,
    /// `U 0x31` reboot into the USB bootloader
    Update,
    /// Anything else
    Unknown,
}

impl<'a> HostMessage<'a> {
    /// Classify one received line
    ///
    /// `line` may or may not include the terminating `\r\n`.
    pub fn decode(line: &'a [u8]) -> Self {
        if line.starts_with(GREETING) {
            return HostMessage::Greeting;
        }
        if line.starts_with(LINK_ACCEPT) {
            return HostMessage::LinkAccept;
        }
        if line.starts_with(LINK_REJECT) {
            return HostMessage::LinkReject;
        }

        match line {
            [TAG_DATA, CHANNEL_STATS, tag, ..] => match DataKind::from_tag(*tag) {
                Some(kind) => {
                    let body = &line[DATA_PAYLOAD_OFFSET..];
                    let payload = body.strip_suffix(LINE_END).unwrap_or(body);
                    HostMessage::Data { kind, payload }
                }
                None => HostMessage::DataUnknown { tag: *tag },
            },
            // Sub-tag missing entirely: treated like an unknown sub-tag
            [TAG_DATA, CHANNEL_STATS] => HostMessage::DataUnknown { tag: 0 },
            [TAG_DATA, CHANNEL_RGB, ..] => HostMessage::RgbControl,
            [TAG_HEARTBEAT, HEARTBEAT_PING, ..] => HostMessage::Heartbeat,
            [TAG_UPDATE, UPDATE_DISCONNECT, ..] => HostMessage::Disconnect,
            [TAG_UPDATE, UPDATE_BOOTLOADER, ..] => HostMessage::Update,
            _ => HostMessage::Unknown,
        }
    }

    /// Encode this message as a complete line
    ///
    /// Used by host-side tooling and simulation. [`HostMessage::Unknown`]
    /// and [`HostMessage::DataUnknown`] encode to their minimal form.
    pub fn encode<const N: usize>(&self) -> Result<Vec<u8, N>, FieldError> {
        let mut out = Vec::new();
        let mut data_header = [TAG_DATA, CHANNEL_STATS, 0];
        let header: &[u8] = match self {
            HostMessage::Greeting => GREETING,
            HostMessage::LinkAccept => LINK_ACCEPT,
            HostMessage::LinkReject => LINK_REJECT,
            HostMessage::Data { kind, .. } => {
                data_header[2] = kind.tag();
                &data_header
            }
            HostMessage::DataUnknown { tag } => {
                data_header[2] = *tag;
                &data_header
            }
            HostMessage::RgbControl => &[TAG_DATA, CHANNEL_RGB],
            HostMessage::Heartbeat => &[TAG_HEARTBEAT, HEARTBEAT_PING],
            HostMessage::Disconnect => &[TAG_UPDATE, UPDATE_DISCONNECT],
            HostMessage::Update => &[TAG_UPDATE, UPDATE_BOOTLOADER],
            HostMessage::Unknown => b"?",
        };
        out.extend_from_slice(header)
            .map_err(|_| FieldError::BufferTooSmall)?;

        if let HostMessage::Data { payload, .. } = self {
            out.extend_from_slice(payload)
                .map_err(|_| FieldError::BufferTooSmall)?;
        }

        out.extend_from_slice(LINE_END)
            .map_err(|_| FieldError::BufferTooSmall)?;
        Ok(out)
    }
}

/// Build a complete telemetry line from field values
///
/// Each value is followed by the field delimiter. Values must not contain
/// the delimiter themselves.
pub fn encode_data<const N: usize>(
    kind: DataKind,
    values: &[&str],
) -> Result<Vec<u8, N>, FieldError> {
    if values.len() != kind.field_count() {
        return Err(FieldError::FieldCount {
            expected: kind.field_count(),
            found: values.len(),
        });
    }

    let mut out = Vec::new();
    out.extend_from_slice(&[TAG_DATA, CHANNEL_STATS, kind.tag()])
        .map_err(|_| FieldError::BufferTooSmall)?;
    for value in values {
        out.extend_from_slice(value.as_bytes())
            .map_err(|_| FieldError::BufferTooSmall)?;
        out.push(FIELD_DELIMITER)
            .map_err(|_| FieldError::BufferTooSmall)?;
    }
    out.extend_from_slice(LINE_END)
        .map_err(|_| FieldError::BufferTooSmall)?;
    Ok(out)
}

/// Build a data acknowledgement frame for `channel`
pub const fn encode_ack(ok: bool, channel: u8) -> [u8; 5] {
    [TAG_DATA, channel, if ok { ACK } else { NAK }, b'\r', b'\n']
}

/// Frames sent from the device to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceResponse {
    /// `P001\r\n` protocol version reply to the greeting
    VersionAck,
    /// `L 0x06\r\n` link established
    LinkAck,
    /// `D 0x11 0x06\r\n` telemetry accepted
    DataAck,
    /// `D 0x11 0x15\r\n` telemetry rejected
    DataNack,
    /// `H 0x31\r\n` heartbeat reply
    HeartbeatAck,
    /// `0x04 0x04\r\n` disconnect / update acknowledgement
    DisconnectAck,
}

const RSP_VERSION: &[u8] = b"P001\r\n";
const RSP_LINK: &[u8] = b"L\x06\r\n";
const RSP_DATA_ACK: &[u8] = &encode_ack(true, CHANNEL_STATS);
const RSP_DATA_NACK: &[u8] = &encode_ack(false, CHANNEL_STATS);
const RSP_HEARTBEAT: &[u8] = b"H\x31\r\n";
const RSP_DISCONNECT: &[u8] = &[EOT, EOT, b'\r', b'\n'];

impl DeviceResponse {
    /// Wire bytes for this response
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            DeviceResponse::VersionAck => RSP_VERSION,
            DeviceResponse::LinkAck => RSP_LINK,
            DeviceResponse::DataAck => RSP_DATA_ACK,
            DeviceResponse::DataNack => RSP_DATA_NACK,
            DeviceResponse::HeartbeatAck => RSP_HEARTBEAT,
            DeviceResponse::DisconnectAck => RSP_DISCONNECT,
        }
    }

    /// Recognise a response line (used on the host side and in tests)
    pub fn parse(line: &[u8]) -> Option<Self> {
        [
            DeviceResponse::VersionAck,
            DeviceResponse::LinkAck,
            DeviceResponse::DataAck,
            DeviceResponse::DataNack,
            DeviceResponse::HeartbeatAck,
            DeviceResponse::DisconnectAck,
        ]
        .into_iter()
        .find(|rsp| rsp.as_bytes() == line)
    }
}
