//! In-memory panel for tests
//!
//! [`SimPanel`] implements [`SerialLink`]. Every frame the session writes is
//! recorded and passed to a responder closure whose return value is queued
//! as inbound bytes, so a test can script a healthy panel, a silent one, or
//! anything in between. Button presses are injected with
//! [`SimPanel::inject`].

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use nasdisplay_hal::{UartConfig, UartRx, UartTx};
use nasdisplay_protocol::{ASUSTOR, QNAP};

use crate::link::SerialLink;

type Responder = Box<dyn FnMut(&[u8]) -> Vec<Vec<u8>> + Send>;

/// One recorded outbound frame
#[derive(Debug, Clone)]
pub struct SimWrite {
    pub at: Instant,
    pub bytes: Vec<u8>,
}

struct Shared {
    inbound_tx: Sender<Vec<u8>>,
    inbound_rx: Receiver<Vec<u8>>,
    writes: Mutex<Vec<SimWrite>>,
    responder: Mutex<Responder>,
    opens: AtomicUsize,
    last_config: Mutex<Option<UartConfig>>,
    short_writes: AtomicBool,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

/// Scriptable stand-in for a serial-attached panel
#[derive(Clone)]
pub struct SimPanel {
    shared: Arc<Shared>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimPanel {
    /// Panel answering each written frame with `responder(frame)`
    pub fn new(responder: impl FnMut(&[u8]) -> Vec<Vec<u8>> + Send + 'static) -> Self {
        let (inbound_tx, inbound_rx) = unbounded();
        Self {
            shared: Arc::new(Shared {
                inbound_tx,
                inbound_rx,
                writes: Mutex::new(Vec::new()),
                responder: Mutex::new(Box::new(responder)),
                opens: AtomicUsize::new(0),
                last_config: Mutex::new(None),
                short_writes: AtomicBool::new(false),
                fail_writes: AtomicBool::new(false),
                fail_reads: AtomicBool::new(false),
            }),
        }
    }

    /// Panel that never answers
    pub fn silent() -> Self {
        Self::new(|_| Vec::new())
    }

    /// Healthy ASUSTOR panel: answers status probes and acknowledges text
    pub fn asustor() -> Self {
        Self::new(asustor_replies)
    }

    /// Healthy QNAP panel: answers the init command
    pub fn qnap() -> Self {
        Self::new(qnap_replies)
    }

    /// Replace the responder
    pub fn respond_with(&self, responder: impl FnMut(&[u8]) -> Vec<Vec<u8>> + Send + 'static) {
        *lock(&self.shared.responder) = Box::new(responder);
    }

    /// Queue raw inbound bytes, as if the panel sent them
    pub fn inject(&self, bytes: &[u8]) {
        let _ = self.shared.inbound_tx.send(bytes.to_vec());
    }

    /// Every frame written so far
    pub fn writes(&self) -> Vec<Vec<u8>> {
        lock(&self.shared.writes)
            .iter()
            .map(|w| w.bytes.clone())
            .collect()
    }

    /// Every frame written so far, with timestamps
    pub fn timed_writes(&self) -> Vec<SimWrite> {
        lock(&self.shared.writes).clone()
    }

    /// Number of frames equal to `bytes`
    pub fn count_writes(&self, bytes: &[u8]) -> usize {
        lock(&self.shared.writes)
            .iter()
            .filter(|w| w.bytes == bytes)
            .count()
    }

    pub fn clear_writes(&self) {
        lock(&self.shared.writes).clear();
    }

    /// How many times the port was opened
    pub fn opens(&self) -> usize {
        self.shared.opens.load(Ordering::SeqCst)
    }

    /// Line settings of the most recent open
    pub fn last_config(&self) -> Option<UartConfig> {
        *lock(&self.shared.last_config)
    }

    /// Accept one byte less than asked on every write
    pub fn set_short_writes(&self, enabled: bool) {
        self.shared.short_writes.store(enabled, Ordering::SeqCst);
    }

    /// Fail every write with a broken pipe
    pub fn set_write_failure(&self, enabled: bool) {
        self.shared.fail_writes.store(enabled, Ordering::SeqCst);
    }

    /// Fail every read with a broken pipe, as an unplugged port does
    pub fn set_read_failure(&self, enabled: bool) {
        self.shared.fail_reads.store(enabled, Ordering::SeqCst);
    }
}

fn asustor_replies(frame: &[u8]) -> Vec<Vec<u8>> {
    if frame.starts_with(ASUSTOR.display_status) {
        vec![ASUSTOR.probe_acks[0].to_vec()]
    } else if frame.starts_with(&ASUSTOR.text.header[..3]) {
        vec![ASUSTOR.write_acks[0].to_vec()]
    } else {
        Vec::new()
    }
}

fn qnap_replies(frame: &[u8]) -> Vec<Vec<u8>> {
    if frame == QNAP.display_status {
        vec![QNAP.probe_acks[0].to_vec()]
    } else {
        Vec::new()
    }
}

/// Receive half of a [`SimPanel`]
pub struct SimRx {
    shared: Arc<Shared>,
    pending: Vec<u8>,
    poll: Duration,
}

/// Transmit half of a [`SimPanel`]
pub struct SimTx {
    shared: Arc<Shared>,
}

impl SerialLink for SimPanel {
    type Rx = SimRx;
    type Tx = SimTx;

    fn open(&self, config: &UartConfig, poll: Duration) -> io::Result<(SimRx, SimTx)> {
        self.shared.opens.fetch_add(1, Ordering::SeqCst);
        *lock(&self.shared.last_config) = Some(*config);
        Ok((
            SimRx {
                shared: Arc::clone(&self.shared),
                pending: Vec::new(),
                poll,
            },
            SimTx {
                shared: Arc::clone(&self.shared),
            },
        ))
    }

    fn describe(&self) -> String {
        "sim".to_string()
    }
}

impl UartRx for SimRx {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.shared.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "panel gone"));
        }
        if self.pending.is_empty() {
            match self.shared.inbound_rx.recv_timeout(self.poll) {
                Ok(chunk) => self.pending = chunk,
                Err(RecvTimeoutError::Timeout) => return Ok(0),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "panel gone"))
                }
            }
        }
        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

impl UartTx for SimTx {
    type Error = io::Error;

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.shared.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "panel gone"));
        }

        let accepted = if self.shared.short_writes.load(Ordering::SeqCst) {
            data.len().saturating_sub(1)
        } else {
            data.len()
        };

        lock(&self.shared.writes).push(SimWrite {
            at: Instant::now(),
            bytes: data[..accepted].to_vec(),
        });

        let replies = {
            let mut responder = lock(&self.shared.responder);
            (*responder)(&data[..accepted])
        };
        for reply in replies {
            let _ = self.shared.inbound_tx.send(reply);
        }
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
