//! MAVLink Transport Abstraction
//!
//! Byte-level serial link used by the telemetry orchestrator. The transport
//! knows nothing about framing; the parser and writer handle MAVLink.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │     MAVLink Protocol Layer           │
//! │  (parser, writer, message handlers)  │
//! └──────────┬───────────────────────────┘
//!            │
//!            │ Uses SerialTransport trait
//!            ▼
//! ┌──────────────────────────────────────┐
//! │  UartTransport (embedded-io port)    │
//! │  or any host-provided transport      │
//! └──────────────────────────────────────┘
//! ```
//!
//! All operations are non-blocking from the caller's point of view: reads
//! are only issued while `bytes_available()` reports buffered input, and
//! writes are best effort.
//!
//! # Modules
//!
//! - `uart` - Adapter for `embedded_io` serial ports

pub mod uart;

pub use uart::UartTransport;

/// Transport abstraction for the telemetry link
///
/// # Trait Methods
///
/// - `bytes_available()`: Buffered input that can be read without blocking
/// - `read_byte()`: Pop one buffered byte
/// - `write_bytes()`: Write a whole frame
pub trait SerialTransport {
    /// Number of bytes that can be read without blocking
    ///
    /// May be a lower bound; a port that only knows "ready or not" returns
    /// 1 while input is pending.
    fn bytes_available(&mut self) -> usize;

    /// Read one byte, `None` if nothing is buffered or the read failed
    fn read_byte(&mut self) -> Option<u8>;

    /// Write all of `bytes`
    ///
    /// # Returns
    ///
    /// - `Ok(n)` - Number of bytes accepted by the transport
    /// - `Err(TransportError)` - I/O error or disconnection
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, TransportError>;
}

impl<T: SerialTransport + ?Sized> SerialTransport for &mut T {
    fn bytes_available(&mut self) -> usize {
        (**self).bytes_available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        (**self).write_bytes(bytes)
    }
}

/// Transport error types
///
/// Categorizes transport failures for appropriate error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Generic I/O error
    ///
    /// Examples: hardware failure, driver error, buffer overflow
    #[error("I/O error")]
    IoError,

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,

    /// Transport disconnected
    ///
    /// Examples: USB cable unplugged, radio link closed
    #[error("Transport disconnected")]
    Disconnected,
}


#[cfg(test)]
mod tests {
    use super::*;
    use mock::MockTransport;

    #[test]
    fn test_mock_transport_read() {
        let mut transport = MockTransport::new();
        transport.push_rx(b"Hi");

        assert_eq!(transport.bytes_available(), 2);
        assert_eq!(transport.read_byte(), Some(b'H'));
        assert_eq!(transport.read_byte(), Some(b'i'));
        assert_eq!(transport.read_byte(), None);
        assert_eq!(transport.bytes_available(), 0);
    }

    #[test]
    fn test_mock_transport_write() {
        let mut transport = MockTransport::new();
        assert_eq!(transport.write_bytes(b"frame"), Ok(5));
        assert_eq!(transport.frames(), &[b"frame".to_vec()]);
    }

    #[test]
    fn test_mock_transport_write_error() {
        let mut transport = MockTransport::new();
        transport.set_write_error(TransportError::Disconnected);

        assert_eq!(
            transport.write_bytes(b"test"),
            Err(TransportError::Disconnected)
        );
        assert!(transport.frames().is_empty());
    }

    #[test]
    fn test_mutable_reference_is_a_transport() {
        fn drain(mut transport: impl SerialTransport) -> usize {
            let mut count = 0;
            while transport.bytes_available() > 0 && transport.read_byte().is_some() {
                count += 1;
            }
            count
        }

        let mut transport = MockTransport::new();
        transport.push_rx(&[1, 2, 3]);
        assert_eq!(drain(&mut transport), 3);
        assert_eq!(transport.pending_rx(), 0);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "Operation timed out");
    }
}
