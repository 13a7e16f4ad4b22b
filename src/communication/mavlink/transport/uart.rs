//! UART Transport Implementation
//!
//! Adapts any `embedded_io` serial port to [`SerialTransport`].
//!
//! # Overview
//!
//! UART is the usual telemetry link: a USB/FTDI cable to the ground station
//! or a telemetry radio (SiK, RFD900). Standard MAVLink settings are
//! 57600 or 115200 baud, 8N1, no flow control.
//!
//! # Usage
//!
//! ```ignore
//! use autopilot_link::communication::mavlink::transport::UartTransport;
//!
//! let transport = UartTransport::new(serial_port);
//! telemetry.attach(transport);
//! ```

use super::{SerialTransport, TransportError};
use embedded_io::{Error, ErrorKind, Read, ReadReady, Write};

/// UART transport for the telemetry link
///
/// # Type Parameters
///
/// - `P`: Serial port implementing `embedded_io` `Read + ReadReady + Write`
///
/// `ReadReady` only reports whether input is pending, so
/// [`SerialTransport::bytes_available`] returns 1 or 0.
pub struct UartTransport<P> {
    port: P,
}

impl<P> UartTransport<P> {
    /// Create a new UART transport
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port, already configured for baud rate and framing
    pub fn new(port: P) -> Self {
        Self { port }
    }

    /// Borrow the underlying port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Give back the underlying port
    pub fn into_inner(self) -> P {
        self.port
    }
}

impl<P: Write> UartTransport<P> {
    /// Block until the port has drained its transmit buffer
    ///
    /// Frame writes never flush; call this when the caller needs the bytes
    /// on the wire, e.g. before detaching.
    pub fn flush(&mut self) -> Result<(), TransportError> {
        self.port.flush().map_err(classify)
    }
}

impl<P> SerialTransport for UartTransport<P>
where
    P: Read + ReadReady + Write,
{
    fn bytes_available(&mut self) -> usize {
        match self.port.read_ready() {
            Ok(true) => 1,
            _ => 0,
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        self.port.write_all(bytes).map_err(classify)?;
        Ok(bytes.len())
    }
}

fn classify<E: Error>(error: E) -> TransportError {
    match error.kind() {
        ErrorKind::TimedOut => TransportError::Timeout,
        ErrorKind::NotConnected
        | ErrorKind::BrokenPipe
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted => TransportError::Disconnected,
        _ => TransportError::IoError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, Copy)]
    struct PortError(ErrorKind);

    impl Error for PortError {
        fn kind(&self) -> ErrorKind {
            self.0
        }
    }

    /// Mock serial port for testing
    #[derive(Default)]
    struct MockPort {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        flushes: usize,
        fail_with: Option<ErrorKind>,
    }

    impl embedded_io::ErrorType for MockPort {
        type Error = PortError;
    }

    impl Read for MockPort {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(byte) => {
                        buf[n] = byte;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl ReadReady for MockPort {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty())
        }
    }

    impl Write for MockPort {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if let Some(kind) = self.fail_with {
                return Err(PortError(kind));
            }
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_uart_transport_read() {
        let port = MockPort {
            rx: VecDeque::from(vec![0xFD, 0x09]),
            ..Default::default()
        };
        let mut transport = UartTransport::new(port);

        assert_eq!(transport.bytes_available(), 1);
        assert_eq!(transport.read_byte(), Some(0xFD));
        assert_eq!(transport.read_byte(), Some(0x09));
        assert_eq!(transport.bytes_available(), 0);
        assert_eq!(transport.read_byte(), None);
    }

    #[test]
    fn test_uart_transport_write_does_not_flush() {
        let mut transport = UartTransport::new(MockPort::default());

        let data = b"Test message";
        assert_eq!(transport.write_bytes(data), Ok(data.len()));
        assert_eq!(transport.write_bytes(data), Ok(data.len()));
        assert_eq!(transport.port().flushes, 0);

        assert_eq!(transport.flush(), Ok(()));
        let port = transport.into_inner();
        assert_eq!(port.tx.len(), 2 * data.len());
        assert_eq!(port.flushes, 1);
    }

    #[test]
    fn test_uart_transport_error_mapping() {
        let cases = [
            (ErrorKind::TimedOut, TransportError::Timeout),
            (ErrorKind::BrokenPipe, TransportError::Disconnected),
            (ErrorKind::NotConnected, TransportError::Disconnected),
            (ErrorKind::Other, TransportError::IoError),
        ];

        for (kind, expected) in cases {
            let port = MockPort {
                fail_with: Some(kind),
                ..Default::default()
            };
            let mut transport = UartTransport::new(port);
            assert_eq!(transport.write_bytes(b"x"), Err(expected), "{:?}", kind);
            assert_eq!(transport.port().flushes, 0);
        }
    }
}
