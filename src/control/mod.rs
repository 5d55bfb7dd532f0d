//! Configuration round trips with the radio module
//!
//! A set or query is one synchronous exchange over the serial link: claim
//! the transport, send the command, optionally wait for the 11-byte
//! response, release the transport. No retries happen here; a caller that
//! wants another attempt runs the operation again.

use embassy_time::{Instant, Timer};
use log::{debug, info, warn};

use crate::config::link::{POLL_INTERVAL, QUERY_TIMEOUT};
use crate::config::protocol::FRAME_LEN;
use crate::registers::codec::{RegisterFrame, QUERY_FRAME};
use crate::registers::types::{RadioConfig, UartBaudRate};
use crate::serial::traits::{LinkError, SerialLink};

/// Errors surfaced by a configuration round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// The serial transport could not be acquired or driven
    LinkUnavailable,
    /// Fewer than eleven response bytes arrived within the timeout
    InsufficientResponse,
}

impl From<LinkError> for ControlError {
    fn from(_: LinkError) -> Self {
        ControlError::LinkUnavailable
    }
}

/// Write a configuration into the module's registers
///
/// The module sends no acknowledgement for a set command; success means
/// the frame left the wire.
pub async fn apply<S: SerialLink>(
    link: &mut S,
    baud: UartBaudRate,
    config: &RadioConfig,
) -> Result<(), ControlError> {
    let frame = RegisterFrame::encode(config);

    link.initialize(baud).await?;
    let result = send_command(link, frame.as_bytes()).await;
    let _ = link.deinitialize().await;
    result?;

    info!(
        "config applied at {} baud: {}",
        baud.bps(),
        frame.to_hex_string()
    );
    Ok(())
}

/// Read the module's current register state
///
/// Uses the operational default timeout of 3 seconds.
pub async fn query<S: SerialLink>(
    link: &mut S,
    baud: UartBaudRate,
) -> Result<RadioConfig, ControlError> {
    query_with_timeout(link, baud, QUERY_TIMEOUT).await
}

/// Read the module's current register state, waiting at most `timeout`
///
/// Sends the 3-byte query command, then polls the link every
/// [`POLL_INTERVAL`] until eleven response bytes have accumulated. Fails
/// with [`ControlError::InsufficientResponse`] if the deadline passes
/// first.
pub async fn query_with_timeout<S: SerialLink>(
    link: &mut S,
    baud: UartBaudRate,
    timeout: embassy_time::Duration,
) -> Result<RadioConfig, ControlError> {
    link.initialize(baud).await?;
    let result = run_query(link, timeout).await;
    let _ = link.deinitialize().await;
    result
}

async fn send_command<S: SerialLink>(link: &mut S, bytes: &[u8]) -> Result<(), ControlError> {
    link.enable_directions(true, true).await?;
    link.send(bytes).await?;
    link.wait_tx_complete().await?;
    Ok(())
}

async fn run_query<S: SerialLink>(
    link: &mut S,
    timeout: embassy_time::Duration,
) -> Result<RadioConfig, ControlError> {
    send_command(link, &QUERY_FRAME).await?;
    debug!("query command sent: C1 00 08");

    let deadline = Instant::now() + timeout;
    let mut response = [0u8; FRAME_LEN];
    let mut filled = 0;

    loop {
        filled += link.read(&mut response[filled..]).await?;
        if filled >= FRAME_LEN {
            break;
        }
        if Instant::now() >= deadline {
            warn!("query timed out with {filled} of {FRAME_LEN} bytes");
            return Err(ControlError::InsufficientResponse);
        }
        Timer::after(POLL_INTERVAL).await;
    }

    let frame = RegisterFrame::from_bytes(response);
    debug!("query response: {}", frame.to_hex_string());
    Ok(frame.decode())
}
