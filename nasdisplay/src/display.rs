//! Display session
//!
//! A [`Display`] owns one panel: the link, the background reader, the two
//! inbound queues and the write pipeline. All outbound traffic (probes,
//! text, backlight) goes through the session lock, so exactly one
//! write-then-acknowledge cycle is in flight at any time and a reply can
//! never be matched against the wrong write.
//!
//! Closing fires a close signal before taking the session lock. Writers
//! blocked on an acknowledgment and listeners blocked on a button both wait
//! on that signal, so they return [`DisplayError::Closed`] immediately
//! instead of holding up the teardown.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, Receiver, Sender};
use log::{debug, info, trace, warn};

use nasdisplay_hal::{UartConfig, UartTx};
use nasdisplay_protocol::{ButtonDecoder, Frame, Line, Profile};

use crate::config::DisplayConfig;
use crate::error::{DisplayError, Result};
use crate::link::SerialLink;
use crate::reader::{closing, Reader};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Closed = 0,
    Opening = 1,
    Open = 2,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SessionState::Opening,
            2 => SessionState::Open,
            _ => SessionState::Closed,
        }
    }
}

/// Consumer ends of the reader's queues plus the close signal
#[derive(Clone)]
pub(crate) struct Wiring {
    pub acks: Receiver<Frame>,
    pub buttons: Receiver<Frame>,
    pub closed: Receiver<()>,
    /// Shared by every button stream of the session, so a release is
    /// attributed even when listening restarts between press and release
    pub decoder: Arc<Mutex<ButtonDecoder>>,
}

/// Everything guarded by the session lock
struct Session<Tx> {
    tx: Option<Tx>,
    wiring: Option<Wiring>,
    reader: Option<JoinHandle<()>>,
    last_write: Option<Instant>,
}

impl<Tx> Session<Tx> {
    fn empty() -> Self {
        Self {
            tx: None,
            wiring: None,
            reader: None,
            last_write: None,
        }
    }

    fn is_torn_down(&self) -> bool {
        self.tx.is_none() && self.reader.is_none() && self.wiring.is_none()
    }
}

/// A front-panel display driven over a serial link
pub struct Display<L: SerialLink> {
    link: L,
    profile: &'static Profile,
    config: DisplayConfig,
    state: Arc<AtomicU8>,
    session: Mutex<Session<L::Tx>>,
    close_signal: Mutex<Option<Sender<()>>>,
}

impl<L: SerialLink> Display<L> {
    /// Create a closed display; call [`Display::open`] to probe the panel
    pub fn new(link: L, profile: &'static Profile, config: DisplayConfig) -> Self {
        Self {
            link,
            profile,
            config,
            state: Arc::new(AtomicU8::new(SessionState::Closed as u8)),
            session: Mutex::new(Session::empty()),
            close_signal: Mutex::new(None),
        }
    }

    /// Create a display and open it
    pub fn connect(link: L, profile: &'static Profile, config: DisplayConfig) -> Result<Self> {
        let display = Self::new(link, profile, config);
        display.open()?;
        Ok(display)
    }

    pub fn profile(&self) -> &'static Profile {
        self.profile
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_open(&self) -> bool {
        self.state() == SessionState::Open
    }

    /// Open the link and probe the panel
    ///
    /// Does nothing if already open. The probe sequence is sent one command
    /// at a time until the panel answers with a probe acknowledgment; if it
    /// never does the link is released and [`DisplayError::NotResponding`]
    /// is returned.
    pub fn open(&self) -> Result<()> {
        let mut session = self.lock_session();
        if self.is_open() && !Self::reader_gone(&session) {
            return Ok(());
        }
        if !session.is_torn_down() {
            self.force_close(&mut session);
        }

        self.set_state(SessionState::Opening);
        if let Err(e) = self.start(&mut session) {
            warn!("{}: cannot open {}: {}", self.profile.name, self.link.describe(), e);
            self.force_close(&mut session);
            return Err(e);
        }

        match self.handshake(&mut session) {
            Ok(()) if Self::reader_gone(&session) => {
                warn!("{}: link lost right after handshake", self.profile.name);
                self.force_close(&mut session);
                Err(DisplayError::Closed)
            }
            Ok(()) => {
                self.set_state(SessionState::Open);
                info!("{}: display ready on {}", self.profile.name, self.link.describe());
                Ok(())
            }
            Err(e) => {
                debug!("{}: handshake failed: {}", self.profile.name, e);
                self.force_close(&mut session);
                Err(e)
            }
        }
    }

    /// Write `text` to `line`, truncated or padded to 16 columns
    pub fn write(&self, line: Line, text: &str) -> Result<()> {
        let frame = self.profile.text_frame(line, text)?;
        let mut session = self.lock_session();
        self.ensure_live(&mut session)?;
        self.send_confirmed(&mut session, &frame, self.profile.write_acks)
    }

    /// Turn the display on or off
    pub fn enable(&self, on: bool) -> Result<()> {
        let frame = self.profile.enable_frame(on)?;
        let mut session = self.lock_session();
        self.ensure_live(&mut session)?;
        self.send_confirmed(&mut session, &frame, self.profile.enable_acks)
    }

    /// Blank both lines
    pub fn clear(&self) -> Result<()> {
        let frame = self.profile.frame(self.profile.clear)?;
        let mut session = self.lock_session();
        self.ensure_live(&mut session)?;
        self.transmit(&mut session, &frame)
    }

    /// Close the link
    ///
    /// Does nothing if already closed. Blocked writers and listeners are
    /// woken with [`DisplayError::Closed`].
    pub fn close(&self) -> Result<()> {
        // Wake waiters before queueing for the session lock
        drop(self.lock_signal().take());

        let mut session = self.lock_session();
        if session.is_torn_down() {
            self.set_state(SessionState::Closed);
            return Ok(());
        }
        self.force_close(&mut session);
        info!("{}: display closed", self.profile.name);
        Ok(())
    }

    /// Receivers for the current session
    pub(crate) fn wiring(&self) -> Result<Wiring> {
        let mut session = self.lock_session();
        self.ensure_live(&mut session)?;
        session.wiring.clone().ok_or(DisplayError::Closed)
    }

    fn start(&self, session: &mut Session<L::Tx>) -> Result<()> {
        let uart = UartConfig::eight_n_one(self.profile.baud_rate);
        let (rx, tx) = self.link.open(&uart, self.config.read_poll())?;

        let capacity = self.config.queue_capacity.max(1);
        let (ack_tx, acks) = bounded(capacity);
        let (button_tx, buttons) = bounded(capacity);
        let (close_tx, closed) = bounded::<()>(0);

        let reader = Reader {
            rx,
            profile: self.profile,
            acks: ack_tx,
            buttons: button_tx,
            closed: closed.clone(),
            state: Arc::clone(&self.state),
            enqueue_timeout: self.config.enqueue_timeout(),
        };
        let handle = thread::Builder::new()
            .name(format!("{}-reader", self.profile.name))
            .spawn(move || reader.run())?;

        *self.lock_signal() = Some(close_tx);
        session.tx = Some(tx);
        session.reader = Some(handle);
        session.wiring = Some(Wiring {
            acks,
            buttons,
            closed,
            decoder: Arc::new(Mutex::new(ButtonDecoder::new(self.profile))),
        });
        session.last_write = None;
        Ok(())
    }

    fn handshake(&self, session: &mut Session<L::Tx>) -> Result<()> {
        let steps = self.profile.probe_sequence.len();
        for (step, command) in self.profile.probe_sequence.iter().enumerate() {
            let frame = self.profile.frame(command)?;
            self.drain_stale(session);
            self.transmit(session, &frame)?;

            if self.await_reply(session, self.profile.probe_acks, self.config.probe_timeout())? {
                debug!("{}: probe answered at step {}/{}", self.profile.name, step + 1, steps);
                return Ok(());
            }
            debug!(
                "{}: no probe reply to {:02X?} (step {}/{})",
                self.profile.name,
                frame.as_bytes(),
                step + 1,
                steps
            );
        }
        Err(DisplayError::NotResponding)
    }

    /// Send `frame` and, unless `acks` is empty, wait for one of them,
    /// retrying up to the configured number of attempts
    fn send_confirmed(
        &self,
        session: &mut Session<L::Tx>,
        frame: &Frame,
        acks: &[&[u8]],
    ) -> Result<()> {
        if acks.is_empty() {
            return self.transmit(session, frame);
        }

        let attempts = self.config.write_attempts.max(1);
        for attempt in 1..=attempts {
            self.drain_stale(session);
            self.transmit(session, frame)?;

            if self.await_reply(session, acks, self.config.ack_timeout())? {
                if attempt > 1 {
                    debug!("{}: acknowledged on attempt {}", self.profile.name, attempt);
                }
                return Ok(());
            }
            debug!(
                "{}: no acknowledgment (attempt {}/{})",
                self.profile.name, attempt, attempts
            );
        }

        warn!(
            "{}: giving up after {} unacknowledged attempts",
            self.profile.name, attempts
        );
        Err(DisplayError::NotResponding)
    }

    /// Put one frame on the wire, keeping the minimum write spacing
    fn transmit(&self, session: &mut Session<L::Tx>, frame: &Frame) -> Result<()> {
        if let Some(wiring) = &session.wiring {
            if closing(&wiring.closed) {
                return Err(DisplayError::Closed);
            }
        }

        if let Some(last) = session.last_write {
            let spacing = self.config.write_spacing();
            let elapsed = last.elapsed();
            if elapsed < spacing {
                thread::sleep(spacing - elapsed);
            }
        }

        let tx = session.tx.as_mut().ok_or(DisplayError::Closed)?;
        let bytes = frame.as_bytes();
        trace!("{}: TX {:02X?}", self.profile.name, bytes);

        let result = tx.write(bytes).and_then(|n| tx.flush().map(|()| n));
        session.last_write = Some(Instant::now());

        match result {
            Ok(n) if n == bytes.len() => Ok(()),
            Ok(n) => Err(DisplayError::SizeMismatch {
                expected: bytes.len(),
                written: n,
            }),
            Err(e) => {
                warn!("{}: serial write failed: {}", self.profile.name, e);
                self.force_close(session);
                Err(DisplayError::Transport(e))
            }
        }
    }

    /// Wait for the next reply; `Ok(true)` if it is one of `expected`
    fn await_reply(
        &self,
        session: &mut Session<L::Tx>,
        expected: &[&[u8]],
        timeout: Duration,
    ) -> Result<bool> {
        let wiring = session.wiring.clone().ok_or(DisplayError::Closed)?;

        select! {
            recv(wiring.closed) -> _ => Err(DisplayError::Closed),
            recv(wiring.acks) -> reply => match reply {
                Ok(frame) => {
                    let matched = Profile::is_one_of(&frame, expected);
                    if !matched {
                        debug!("{}: unexpected reply {:02X?}", self.profile.name, frame.as_bytes());
                    }
                    Ok(matched)
                }
                Err(_) => {
                    warn!("{}: reader gone, closing session", self.profile.name);
                    self.force_close(session);
                    Err(DisplayError::Closed)
                }
            },
            default(timeout) => Ok(false),
        }
    }

    /// Discard replies nobody waited for (e.g. to fire-and-forget commands)
    fn drain_stale(&self, session: &Session<L::Tx>) {
        if let Some(wiring) = &session.wiring {
            let stale = wiring.acks.try_iter().count();
            if stale > 0 {
                trace!("{}: discarded {} stale replies", self.profile.name, stale);
            }
        }
    }

    /// Release everything; used by close and after fatal errors
    fn force_close(&self, session: &mut Session<L::Tx>) {
        self.set_state(SessionState::Closed);
        drop(self.lock_signal().take());
        session.tx = None;
        if let Some(handle) = session.reader.take() {
            if handle.join().is_err() {
                warn!("{}: reader thread panicked", self.profile.name);
            }
        }
        session.wiring = None;
    }

    /// `Closed` unless the session is open with its reader running; a
    /// session whose reader has stopped is released here
    fn ensure_live(&self, session: &mut Session<L::Tx>) -> Result<()> {
        if self.is_open() && !Self::reader_gone(session) {
            return Ok(());
        }
        if !session.is_torn_down() {
            debug!("{}: reader stopped, releasing link", self.profile.name);
            self.force_close(session);
        }
        Err(DisplayError::Closed)
    }

    fn reader_gone(session: &Session<L::Tx>) -> bool {
        session
            .reader
            .as_ref()
            .map_or(true, JoinHandle::is_finished)
    }

    fn set_state(&self, state: SessionState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    fn lock_session(&self) -> MutexGuard<'_, Session<L::Tx>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_signal(&self) -> MutexGuard<'_, Option<Sender<()>>> {
        self.close_signal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<L: SerialLink> Drop for Display<L> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPanel;
    use nasdisplay_protocol::{checksum, ASUSTOR, QNAP};
    use std::sync::Arc;

    fn fast_config() -> DisplayConfig {
        DisplayConfig {
            probe_timeout_ms: 100,
            ack_timeout_ms: 50,
            write_spacing_ms: 2,
            write_attempts: 4,
            read_poll_ms: 5,
            enqueue_timeout_ms: 10,
            ..DisplayConfig::default()
        }
    }

    fn status_frame() -> Vec<u8> {
        ASUSTOR.frame(ASUSTOR.display_status).unwrap().as_bytes().to_vec()
    }

    fn text_frames(sim: &SimPanel) -> Vec<Vec<u8>> {
        sim.writes()
            .into_iter()
            .filter(|w| w.starts_with(&ASUSTOR.text.header[..3]))
            .collect()
    }

    #[test]
    fn test_open_and_write_hello() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();
        assert!(display.is_open());
        assert_eq!(sim.last_config(), Some(UartConfig::eight_n_one(115_200)));
        assert_eq!(sim.writes(), vec![status_frame()]);

        display.write(Line::One, "Hello").unwrap();

        let frames = text_frames(&sim);
        assert_eq!(frames.len(), 1);
        let frame = &frames[0];
        assert_eq!(frame.len(), 22);
        assert_eq!(&frame[5..21], b"Hello           ");
        assert_eq!(frame[21], checksum(&frame[..21]));
    }

    #[test]
    fn test_open_is_idempotent() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();
        display.open().unwrap();
        assert_eq!(sim.opens(), 1);
        assert_eq!(sim.writes().len(), 1);
    }

    #[test]
    fn test_probe_falls_back_to_clear_then_status() {
        let sim = SimPanel::silent();
        let mut probes = 0;
        sim.respond_with(move |frame| {
            if frame.starts_with(ASUSTOR.display_status) {
                probes += 1;
                if probes == 2 {
                    return vec![ASUSTOR.probe_acks[1].to_vec()];
                }
            }
            Vec::new()
        });

        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();
        assert!(display.is_open());

        let clear = ASUSTOR.frame(ASUSTOR.clear).unwrap().as_bytes().to_vec();
        assert_eq!(sim.writes(), vec![status_frame(), clear, status_frame()]);
    }

    #[test]
    fn test_silent_panel_is_not_responding() {
        let sim = SimPanel::silent();
        let display = Display::new(sim.clone(), &ASUSTOR, fast_config());

        let err = display.open().unwrap_err();
        assert!(matches!(err, DisplayError::NotResponding));
        assert_eq!(display.state(), SessionState::Closed);
        assert_eq!(sim.writes().len(), ASUSTOR.probe_sequence.len());

        assert!(matches!(display.write(Line::One, "x"), Err(DisplayError::Closed)));
        assert!(matches!(display.enable(true), Err(DisplayError::Closed)));
    }

    #[test]
    fn test_write_retries_exactly_configured_attempts() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();

        sim.respond_with(|_| Vec::new());
        let err = display.write(Line::Two, "lost").unwrap_err();

        assert!(matches!(err, DisplayError::NotResponding));
        assert_eq!(text_frames(&sim).len(), 4);
        assert!(display.is_open());
    }

    #[test]
    fn test_mismatched_ack_is_retried() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();

        let mut first = true;
        sim.respond_with(move |_| {
            if std::mem::take(&mut first) {
                // A status reply where a write acknowledgment is expected
                vec![ASUSTOR.probe_acks[0].to_vec()]
            } else {
                vec![ASUSTOR.write_acks[0].to_vec()]
            }
        });

        display.write(Line::One, "retry").unwrap();
        assert_eq!(text_frames(&sim).len(), 2);
    }

    #[test]
    fn test_writes_keep_minimum_spacing() {
        let sim = SimPanel::asustor();
        let config = DisplayConfig {
            write_spacing_ms: 15,
            ..fast_config()
        };
        let display = Display::connect(sim.clone(), &ASUSTOR, config).unwrap();

        sim.clear_writes();
        for i in 0..3 {
            display.write(Line::One, &format!("tick {}", i)).unwrap();
        }

        let writes = sim.timed_writes();
        assert_eq!(writes.len(), 3);
        for pair in writes.windows(2) {
            assert!(pair[1].at.duration_since(pair[0].at) >= Duration::from_millis(15));
        }
    }

    #[test]
    fn test_short_write_is_size_mismatch() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();

        sim.set_short_writes(true);
        let err = display.write(Line::One, "short").unwrap_err();
        assert!(matches!(
            err,
            DisplayError::SizeMismatch {
                expected: 22,
                written: 21
            }
        ));
        assert_eq!(text_frames(&sim).len(), 1);
    }

    #[test]
    fn test_transport_failure_closes_session() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();

        sim.set_write_failure(true);
        let err = display.write(Line::One, "gone").unwrap_err();
        assert!(matches!(err, DisplayError::Transport(_)));
        assert!(!display.is_open());

        sim.set_write_failure(false);
        display.open().unwrap();
        display.write(Line::One, "back").unwrap();
        assert_eq!(sim.opens(), 2);
    }

    fn wait_until_closed<L: SerialLink>(display: &Display<L>) {
        let deadline = Instant::now() + Duration::from_millis(500);
        while display.is_open() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_read_failure_closes_fire_and_forget_session() {
        let sim = SimPanel::qnap();
        let display = Display::connect(sim.clone(), &QNAP, fast_config()).unwrap();

        sim.set_read_failure(true);
        wait_until_closed(&display);

        assert!(!display.is_open());
        assert_eq!(display.state(), SessionState::Closed);
        assert!(matches!(display.write(Line::One, "x"), Err(DisplayError::Closed)));
        assert!(matches!(display.enable(true), Err(DisplayError::Closed)));
        assert!(matches!(display.clear(), Err(DisplayError::Closed)));
        assert!(matches!(display.listen(|_, _| true), Err(DisplayError::Closed)));

        // Nothing reached the wire after the read side died
        assert_eq!(sim.writes(), vec![vec![0x4D, 0x00]]);

        sim.set_read_failure(false);
        display.open().unwrap();
        display.write(Line::One, "back").unwrap();
        assert_eq!(sim.opens(), 2);
    }

    #[test]
    fn test_read_failure_closes_asustor_session() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();

        sim.set_read_failure(true);
        wait_until_closed(&display);

        assert!(!display.is_open());
        assert!(matches!(display.enable(false), Err(DisplayError::Closed)));
        assert!(matches!(display.clear(), Err(DisplayError::Closed)));
        assert!(matches!(display.write(Line::Two, "x"), Err(DisplayError::Closed)));
        assert_eq!(sim.writes(), vec![status_frame()]);

        display.close().unwrap();
        assert_eq!(display.state(), SessionState::Closed);
    }

    #[test]
    fn test_enable_is_fire_and_forget() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();

        display.enable(false).unwrap();
        display.enable(true).unwrap();
        display.clear().unwrap();

        let off = ASUSTOR.enable_frame(false).unwrap().as_bytes().to_vec();
        let on = ASUSTOR.enable_frame(true).unwrap().as_bytes().to_vec();
        assert_eq!(sim.count_writes(&off), 1);
        assert_eq!(sim.count_writes(&on), 1);
    }

    #[test]
    fn test_stale_reply_does_not_satisfy_next_write() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();

        // Unsolicited acknowledgment sitting in the queue
        sim.inject(ASUSTOR.write_acks[0]);
        std::thread::sleep(Duration::from_millis(30));

        sim.respond_with(|_| Vec::new());
        assert!(matches!(
            display.write(Line::One, "stale"),
            Err(DisplayError::NotResponding)
        ));
    }

    #[test]
    fn test_close_is_idempotent_and_reopenable() {
        let sim = SimPanel::asustor();
        let display = Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap();

        display.close().unwrap();
        display.close().unwrap();
        assert!(!display.is_open());
        assert!(matches!(display.write(Line::One, "x"), Err(DisplayError::Closed)));

        display.open().unwrap();
        display.write(Line::One, "again").unwrap();
        assert_eq!(sim.opens(), 2);
    }

    #[test]
    fn test_close_wakes_writer_waiting_for_ack() {
        let sim = SimPanel::asustor();
        let config = DisplayConfig {
            ack_timeout_ms: 200,
            write_attempts: 1000,
            ..fast_config()
        };
        let display = Arc::new(Display::connect(sim.clone(), &ASUSTOR, config).unwrap());
        sim.respond_with(|_| Vec::new());

        let writer = {
            let display = Arc::clone(&display);
            std::thread::spawn(move || display.write(Line::One, "blocked"))
        };

        std::thread::sleep(Duration::from_millis(50));
        let started = Instant::now();
        display.close().unwrap();
        let result = writer.join().unwrap();

        assert!(matches!(result, Err(DisplayError::Closed)));
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_concurrent_writes_never_interleave() {
        let sim = SimPanel::asustor();
        let display = Arc::new(Display::connect(sim.clone(), &ASUSTOR, fast_config()).unwrap());
        sim.clear_writes();

        let workers: Vec<_> = (0..2)
            .map(|worker| {
                let display = Arc::clone(&display);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        display
                            .write(Line::One, &format!("w{} #{}", worker, i))
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        // Every write went out whole and was acknowledged on the first try
        let writes = sim.writes();
        assert_eq!(writes.len(), 20);
        for frame in writes {
            assert_eq!(frame.len(), 22);
            assert_eq!(frame[21], checksum(&frame[..21]));
        }
    }

    #[test]
    fn test_qnap_session() {
        let sim = SimPanel::qnap();
        let display = Display::connect(sim.clone(), &QNAP, fast_config()).unwrap();
        assert_eq!(sim.last_config().map(|c| c.baudrate), Some(1_200));

        display.write(Line::Two, "QNAP").unwrap();
        display.enable(true).unwrap();

        let writes = sim.writes();
        assert_eq!(writes[0], vec![0x4D, 0x00]);
        assert_eq!(writes[1].len(), 23);
        assert_eq!(&writes[1][..7], &[0x4D, 0x5E, 0x01, 0x4D, 0x0C, 0x01, 0x10]);
        assert_eq!(writes[2], vec![0x4D, 0x5E, 0x01, 0x0A]);
    }
}
