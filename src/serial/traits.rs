//! Serial link trait for abstraction and testability
//!
//! This trait defines the interface the register round trips and the
//! receive pipeline require from the UART transport, allowing the actual
//! hardware driver to be swapped with a mock for testing.

use core::future::Future;

use crate::registers::types::UartBaudRate;

/// Errors that can occur on the serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The transport could not be acquired or initialised
    Unavailable,
    /// Framing error in received data
    FramingError,
    /// Receive buffer overflow
    Overflow,
    /// Write error
    WriteError,
}

/// Abstract serial transport for the radio module
///
/// One link instance corresponds to one UART. `initialize` claims and
/// configures it, `deinitialize` releases it; the operations in between
/// are only valid on an initialised link. `read` returns whatever bytes
/// have arrived so far, possibly none; the caller owns the poll cadence.
pub trait SerialLink {
    /// Claim the transport and configure it at the given baud rate
    fn initialize(&mut self, baud: UartBaudRate) -> impl Future<Output = Result<(), LinkError>>;

    /// Enable the receive and/or transmit directions
    fn enable_directions(
        &mut self,
        rx: bool,
        tx: bool,
    ) -> impl Future<Output = Result<(), LinkError>>;

    /// Queue bytes for transmission
    fn send(&mut self, bytes: &[u8]) -> impl Future<Output = Result<(), LinkError>>;

    /// Wait until every queued byte has left the wire
    fn wait_tx_complete(&mut self) -> impl Future<Output = Result<(), LinkError>>;

    /// Read bytes that have already arrived
    ///
    /// Returns the number of bytes written into `buf`; zero means nothing
    /// was pending. Never blocks waiting for more data.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, LinkError>>;

    /// Release the transport
    fn deinitialize(&mut self) -> impl Future<Output = Result<(), LinkError>>;
}
