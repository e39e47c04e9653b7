//! Virtual serial (USB CDC) transport abstraction
//!
//! The USB device stack is treated as a given transport that delivers and
//! consumes byte buffers. Every operation is non-blocking and may move zero
//! bytes on any call.

/// Transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Host is not connected (port closed or USB suspended)
    Disconnected,
    /// Outgoing buffer could not take the whole frame
    WouldBlock,
}

/// Non-blocking virtual serial port
pub trait SerialPort {
    /// Error type for transport operations
    type Error;

    /// Whether the transport holds unread bytes
    fn available(&self) -> bool;

    /// Read available bytes into `buf`
    ///
    /// Returns the number of bytes read, which may be zero.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Queue bytes for transmission
    ///
    /// Either the whole frame is queued or an error is returned.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Push queued bytes towards the host
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Queue a frame and flush it
    fn send(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.write(data)?;
        self.flush()
    }
}

impl<T: SerialPort + ?Sized> SerialPort for &mut T {
    type Error = T::Error;

    fn available(&self) -> bool {
        (**self).available()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        written: usize,
        flushes: usize,
        refuse_writes: bool,
    }

    impl SerialPort for Recorder {
        type Error = SerialError;

        fn available(&self) -> bool {
            false
        }

        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
            Ok(0)
        }

        fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            if self.refuse_writes {
                return Err(SerialError::WouldBlock);
            }
            self.written += data.len();
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_send_writes_then_flushes() {
        let mut port = Recorder::default();
        port.send(b"P001\r\n").unwrap();
        assert_eq!(port.written, 6);
        assert_eq!(port.flushes, 1);
    }

    #[test]
    fn test_send_skips_flush_on_write_error() {
        let mut port = Recorder {
            refuse_writes: true,
            ..Default::default()
        };
        assert_eq!(port.send(b"H1\r\n"), Err(SerialError::WouldBlock));
        assert_eq!(port.flushes, 0);
    }

    #[test]
    fn test_mut_reference_forwards() {
        fn send_through<P: SerialPort>(mut port: P, data: &[u8]) -> Result<(), P::Error> {
            port.send(data)
        }

        let mut port = Recorder::default();
        send_through(&mut port, b"L\x06\r\n").unwrap();
        assert_eq!(port.written, 4);
        assert_eq!(port.flushes, 1);
    }
}
