//! Receive pipeline: bounded byte queue, worker, bounded hex log
//!
//! One [`ReceiveSession`] covers one monitoring run. The producer side
//! ([`ReceiveSession::push_byte`]) is called from the serial driver's rx
//! context for every arrived byte; it must stay minimal, so it only does a
//! non-blocking enqueue, and the channel wake doubles as the data-ready
//! signal. The worker ([`ReceiveSession::run_worker`]) drains the queue in
//! batches, renders each byte as two uppercase hex digits plus a space,
//! and appends to a capacity-bounded log under a mutex, evicting the
//! oldest characters first. A consumer reads the log under the same mutex
//! and can wait on the refresh signal, so it never observes a partially
//! appended batch.

use core::cell::RefCell;
use core::fmt::Write as _;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use heapless::{String, Vec};
use log::debug;

use crate::config::monitor::{BATCH_TEXT_CAPACITY, LOG_CAPACITY, RX_QUEUE_CAPACITY};
use crate::serial::traits::SerialLink;

/// Idle wait between polls when the link has nothing pending
const PUMP_IDLE_WAIT: Duration = Duration::from_millis(10);

/// State shared between the rx producer, the worker and the consumer
///
/// Created when a receive run starts and dropped when it ends; nothing
/// persists across sessions.
pub struct ReceiveSession {
    /// Bounded single-producer single-consumer byte queue. `try_send`
    /// keeps the producer side non-blocking; a full queue drops bytes.
    queue: Channel<CriticalSectionRawMutex, u8, RX_QUEUE_CAPACITY>,
    /// Hex text log, written only by the worker, read by the consumer
    log: Mutex<CriticalSectionRawMutex, RefCell<String<LOG_CAPACITY>>>,
    /// Raised by the worker after each appended batch
    refresh: Signal<CriticalSectionRawMutex, ()>,
    /// Cooperative stop request for the worker
    stop: Signal<CriticalSectionRawMutex, ()>,
    /// Latched once the session is shutting down
    stopped: AtomicBool,
}

impl ReceiveSession {
    /// Create an idle session with empty buffers
    pub fn new() -> Self {
        Self {
            queue: Channel::new(),
            log: Mutex::new(RefCell::new(String::new())),
            refresh: Signal::new(),
            stop: Signal::new(),
            stopped: AtomicBool::new(false),
        }
    }

    /// Producer entry point, one arrived byte
    ///
    /// Safe to call from an interrupt-flavoured context: no blocking, no
    /// allocation. A byte that does not fit in the queue is dropped
    /// silently; backpressure at this layer is lossy and never reported
    /// as an error. After [`stop`](Self::stop) the byte is ignored.
    pub fn push_byte(&self, byte: u8) {
        if self.stopped.load(Ordering::Acquire) {
            return;
        }
        let _ = self.queue.try_send(byte);
    }

    /// Worker loop; resolves once a stop request has been observed
    ///
    /// Awaiting this future to completion is the join: after it resolves
    /// no further log writes occur.
    pub async fn run_worker(&self) {
        loop {
            match select(self.stop.wait(), self.queue.receive()).await {
                Either::First(()) => break,
                Either::Second(first) => self.process_batch(first),
            }
        }
        self.stopped.store(true, Ordering::Release);
        debug!("receive worker stopped");
    }

    /// Drain everything currently queued and append it as one batch
    fn process_batch(&self, first: u8) {
        let mut batch: Vec<u8, RX_QUEUE_CAPACITY> = Vec::new();
        let _ = batch.push(first);
        while batch.len() < batch.capacity() {
            match self.queue.try_receive() {
                Ok(byte) => {
                    let _ = batch.push(byte);
                }
                Err(_) => break,
            }
        }

        let mut text: String<BATCH_TEXT_CAPACITY> = String::new();
        for &byte in &batch {
            // Capacity is three chars per queued byte, write cannot fail
            let _ = write!(text, "{:02X} ", byte);
        }

        // One lock region per wake-up: batches never interleave
        self.log.lock(|cell| {
            append_bounded(&mut cell.borrow_mut(), &text);
        });
        self.refresh.signal(());
    }

    /// Request worker shutdown; idempotent
    ///
    /// Marks the session stopped (so later [`push_byte`](Self::push_byte)
    /// calls are dropped) and wakes the worker. Callers join by awaiting
    /// the [`run_worker`](Self::run_worker) future.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.stop.signal(());
    }

    /// Whether the session has been stopped
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Consumer wait for the next appended batch
    pub async fn wait_refresh(&self) {
        self.refresh.wait().await
    }

    /// Read the log under the same mutex the worker writes it with
    pub fn with_log<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        self.log.lock(|cell| f(cell.borrow().as_str()))
    }

    /// Reset the log, e.g. on back/cancel
    pub fn clear_log(&self) {
        self.log.lock(|cell| cell.borrow_mut().clear());
    }
}

impl Default for ReceiveSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Append to the bounded log, evicting the oldest characters first
///
/// Keeps at most the most recent `LOG_CAPACITY` characters; the retained
/// suffix is preserved exactly. Log content is pure ASCII hex, so slicing
/// by byte count is slicing by character count.
fn append_bounded(log: &mut String<LOG_CAPACITY>, text: &str) {
    let total = log.len() + text.len();
    if total > LOG_CAPACITY {
        let excess = total - LOG_CAPACITY;
        if excess >= log.len() {
            // The new text alone fills the log
            log.clear();
            let start = text.len().saturating_sub(LOG_CAPACITY);
            let _ = log.push_str(&text[start..]);
            return;
        }
        let mut retained: String<LOG_CAPACITY> = String::new();
        let _ = retained.push_str(&log[excess..]);
        *log = retained;
    }
    let _ = log.push_str(text);
}

/// Feed a session from a serial link until the session stops
///
/// This is the listener binding for transports that expose a polled
/// `read` instead of an rx callback; drivers with a real per-byte
/// interrupt call [`ReceiveSession::push_byte`] directly.
pub async fn pump<S: SerialLink>(link: &mut S, session: &ReceiveSession) {
    let mut buf = [0u8; 64];
    while !session.is_stopped() {
        match link.read(&mut buf).await {
            Ok(0) => Timer::after(PUMP_IDLE_WAIT).await,
            Ok(n) => {
                for &byte in &buf[..n] {
                    session.push_byte(byte);
                }
            }
            Err(_) => {
                // Link hiccup, retry after a short pause
                Timer::after(PUMP_IDLE_WAIT).await;
            }
        }
    }
}
