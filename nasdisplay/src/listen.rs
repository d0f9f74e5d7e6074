//! Button listening
//!
//! [`ButtonStream`] pulls decoded events from the session's button queue.
//! A pull blocks until the next event or until the session closes; frames
//! still queued when the close signal fires are never delivered.
//!
//! Button state lives with the session rather than the stream: a press seen
//! by one stream and its release seen by the next are still paired.

use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{select, Receiver};
use log::trace;

use nasdisplay_protocol::{ButtonDecoder, ButtonEvent, Frame};

use crate::display::Display;
use crate::error::{DisplayError, Result};
use crate::link::SerialLink;
use crate::reader::closing;

/// Blocking source of button events for one session
pub struct ButtonStream {
    frames: Receiver<Frame>,
    closed: Receiver<()>,
    decoder: Arc<Mutex<ButtonDecoder>>,
}

impl ButtonStream {
    /// Wait for the next button event
    ///
    /// Returns [`DisplayError::Closed`] once the session closes or the link
    /// is lost.
    pub fn next_event(&mut self) -> Result<ButtonEvent> {
        loop {
            if closing(&self.closed) {
                return Err(DisplayError::Closed);
            }

            let frame = select! {
                recv(self.closed) -> _ => return Err(DisplayError::Closed),
                recv(self.frames) -> frame => frame.map_err(|_| DisplayError::Closed)?,
            };

            // Both arms may be ready at once
            if closing(&self.closed) {
                return Err(DisplayError::Closed);
            }

            let event = self
                .decoder
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .decode(&frame);
            match event {
                Some(event) => return Ok(event),
                None => trace!("button frame {:02X?} carries no event", frame.as_bytes()),
            }
        }
    }
}

impl Iterator for ButtonStream {
    type Item = ButtonEvent;

    /// Ends when the session closes
    fn next(&mut self) -> Option<ButtonEvent> {
        self.next_event().ok()
    }
}

impl<L: SerialLink> Display<L> {
    /// Button events of the current session
    pub fn buttons(&self) -> Result<ButtonStream> {
        let wiring = self.wiring()?;
        Ok(ButtonStream {
            frames: wiring.buttons,
            closed: wiring.closed,
            decoder: wiring.decoder,
        })
    }

    /// Call `callback(button, released)` for each button event
    ///
    /// Returns `Ok(())` when the callback returns `false` and
    /// [`DisplayError::Closed`] when the session closes first. Listening
    /// may stop and resume between a press and its release; the release
    /// still names the held button.
    pub fn listen<F>(&self, mut callback: F) -> Result<()>
    where
        F: FnMut(u8, bool) -> bool,
    {
        let mut stream = self.buttons()?;
        loop {
            let event = stream.next_event()?;
            if !callback(event.button, event.released) {
                return Ok(());
            }
        }
    }
}
