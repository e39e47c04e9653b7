//! Line assembly from the serial byte stream
//!
//! Bytes are accumulated into a fixed-capacity buffer until the content ends
//! with `\r\n`. While a line is pending no further bytes are read, so the
//! transport applies back-pressure to the host until the line is consumed.

use jukebox_hal::SerialPort;

/// Line terminator
pub const LINE_END: &[u8] = b"\r\n";

/// Total buffer size including the trailing NUL slot
pub const LINE_CAPACITY: usize = 128;

/// Fixed-capacity line accumulator
///
/// At most `N - 1` content bytes are held; the last slot is reserved for the
/// NUL byte that always follows the content.
#[derive(Debug, Clone)]
pub struct LineBuffer<const N: usize = LINE_CAPACITY> {
    buffer: [u8; N],
    len: usize,
    ready: bool,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            len: 0,
            ready: false,
        }
    }

    /// Pull bytes from the transport
    ///
    /// Reads only when the transport has data and no line is pending. Returns
    /// the number of bytes appended. The terminator check runs on every call
    /// that finds at least two buffered bytes, so a line split across several
    /// reads is detected once its final chunk lands.
    pub fn poll<S: SerialPort>(&mut self, port: &mut S) -> Result<usize, S::Error> {
        let mut read = 0;

        if !self.ready && port.available() {
            let room = self.room();
            if room > 0 {
                read = port.read(&mut self.buffer[self.len..self.len + room])?;
                self.len += read.min(room);
                self.buffer[self.len] = 0;
            }
        }

        if !self.ready && self.len >= LINE_END.len() && self.as_bytes().ends_with(LINE_END) {
            self.ready = true;
        }

        Ok(read)
    }

    /// Whether a complete line is pending
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The pending line (terminator included), if one is ready
    pub fn line(&self) -> Option<&[u8]> {
        if self.ready {
            Some(self.as_bytes())
        } else {
            None
        }
    }

    /// Current content regardless of readiness
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Number of buffered content bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no content
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of content bytes
    pub const fn capacity(&self) -> usize {
        N.saturating_sub(1)
    }

    /// Full without a terminator
    ///
    /// A stalled buffer never becomes ready on its own; only [`Self::consume`]
    /// recovers it.
    pub fn is_stalled(&self) -> bool {
        !self.ready && self.len == self.capacity()
    }

    /// Discard the content and clear the ready flag
    pub fn consume(&mut self) {
        self.len = 0;
        self.ready = false;
        if N > 0 {
            self.buffer[0] = 0;
        }
    }

    fn room(&self) -> usize {
        self.capacity() - self.len
    }
}
