//! Background read loop
//!
//! One reader thread runs per open session. It owns the receive half of the
//! link, cuts the byte stream into frames and routes each frame to the
//! acknowledgment queue or the button queue. The thread ends when the close
//! signal fires or the link fails; either way its queue senders are
//! dropped, which consumers observe as disconnection. A link failure also
//! marks the session closed, so fire-and-forget commands stop succeeding.

use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, SendTimeoutError, Sender, TryRecvError, TrySendError};
use log::{debug, trace, warn};

use nasdisplay_hal::UartRx;
use nasdisplay_protocol::{Frame, FrameAssembler, Framing, Inbound, Profile, Resync};

use crate::display::SessionState;

/// Read chunk size for marker-scanning profiles
const READ_CHUNK: usize = 64;

/// Whether the close signal has fired
pub(crate) fn closing(signal: &Receiver<()>) -> bool {
    matches!(signal.try_recv(), Err(TryRecvError::Disconnected))
}

/// Everything the reader thread owns
pub(crate) struct Reader<R> {
    pub rx: R,
    pub profile: &'static Profile,
    pub acks: Sender<Frame>,
    pub buttons: Sender<Frame>,
    pub closed: Receiver<()>,
    pub state: Arc<AtomicU8>,
    /// Bounded wait on a full ack queue; button frames never wait
    pub enqueue_timeout: Duration,
}

impl<R: UartRx<Error = io::Error>> Reader<R> {
    /// Run until close or link failure
    pub fn run(mut self) {
        let mut assembler = FrameAssembler::new(self.profile);
        let mut buf = [0u8; READ_CHUNK];

        debug!("{}: reader started", self.profile.name);

        loop {
            if closing(&self.closed) {
                break;
            }

            // Fixed-window profiles never read past the current frame
            let want = match self.profile.resync {
                Resync::FixedWindow => assembler.remaining(),
                Resync::ScanForMarker => READ_CHUNK,
            };

            let n = match self.rx.read(&mut buf[..want]) {
                Ok(0) => continue,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    if !closing(&self.closed) {
                        warn!("{}: serial read failed, reader stopping: {}", self.profile.name, e);
                        self.state.store(SessionState::Closed as u8, Ordering::SeqCst);
                    }
                    break;
                }
            };

            trace!("{}: RX {:02X?}", self.profile.name, &buf[..n]);

            for &byte in &buf[..n] {
                if let Some(frame) = assembler.feed(byte) {
                    if !self.route(frame) {
                        debug!("{}: reader stopped", self.profile.name);
                        return;
                    }
                }
            }
        }

        debug!("{}: reader stopped", self.profile.name);
    }

    /// Deliver one frame; `false` once the consumers are gone
    fn route(&self, frame: Frame) -> bool {
        if self.profile.framing == Framing::Checksummed && !frame.checksum_ok() {
            trace!(
                "{}: inbound checksum mismatch on {:02X?}",
                self.profile.name,
                frame.as_bytes()
            );
        }

        match self.profile.classify(frame) {
            Inbound::Button(frame) => {
                if closing(&self.closed) {
                    return false;
                }
                match self.buttons.try_send(frame) {
                    Ok(()) => true,
                    Err(TrySendError::Full(frame)) => {
                        warn!(
                            "{}: button queue full, dropping {:02X?}",
                            self.profile.name,
                            frame.as_bytes()
                        );
                        true
                    }
                    Err(TrySendError::Disconnected(_)) => false,
                }
            }
            Inbound::Reply(frame) => match self.acks.send_timeout(frame, self.enqueue_timeout) {
                Ok(()) => true,
                Err(SendTimeoutError::Timeout(frame)) => {
                    warn!(
                        "{}: reply queue full, dropping {:02X?}",
                        self.profile.name,
                        frame.as_bytes()
                    );
                    true
                }
                Err(SendTimeoutError::Disconnected(_)) => false,
            },
        }
    }
}
