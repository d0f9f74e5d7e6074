//! Display backend trait
//!
//! Object-safe interface over a concrete [`Display`] so callers can hold
//! whatever [`crate::find`] discovered, including the no-op [`NullDisplay`].

use log::debug;

use nasdisplay_protocol::Line;

use crate::display::Display;
use crate::error::Result;
use crate::link::SerialLink;

/// Front-panel display backend
pub trait Lcd: Send + Sync {
    /// Open the link and probe the panel
    fn open(&self) -> Result<()>;

    /// Write `text` to `line`
    fn write(&self, line: Line, text: &str) -> Result<()>;

    /// Turn the display on or off
    fn enable(&self, on: bool) -> Result<()>;

    /// Blank both lines
    fn clear(&self) -> Result<()>;

    /// Deliver button events to `callback(button, released)` until it
    /// returns `false` or the session closes
    fn listen(&self, callback: &mut dyn FnMut(u8, bool) -> bool) -> Result<()>;

    /// Close the link
    fn close(&self) -> Result<()>;

    fn is_open(&self) -> bool;

    /// Panel family name
    fn name(&self) -> &'static str;
}

impl<L: SerialLink> Lcd for Display<L> {
    fn open(&self) -> Result<()> {
        Display::open(self)
    }

    fn write(&self, line: Line, text: &str) -> Result<()> {
        Display::write(self, line, text)
    }

    fn enable(&self, on: bool) -> Result<()> {
        Display::enable(self, on)
    }

    fn clear(&self) -> Result<()> {
        Display::clear(self)
    }

    fn listen(&self, callback: &mut dyn FnMut(u8, bool) -> bool) -> Result<()> {
        Display::listen(self, callback)
    }

    fn close(&self) -> Result<()> {
        Display::close(self)
    }

    fn is_open(&self) -> bool {
        Display::is_open(self)
    }

    fn name(&self) -> &'static str {
        self.profile().name
    }
}

/// Display that accepts everything and shows nothing
///
/// Returned by discovery when no panel answers, so callers need no special
/// case for enclosures without a front panel.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl Lcd for NullDisplay {
    fn open(&self) -> Result<()> {
        Ok(())
    }

    fn write(&self, line: Line, text: &str) -> Result<()> {
        debug!("null display: line {} <- {:?}", line.index(), text);
        Ok(())
    }

    fn enable(&self, _on: bool) -> Result<()> {
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        Ok(())
    }

    /// No buttons; returns at once
    fn listen(&self, _callback: &mut dyn FnMut(u8, bool) -> bool) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn is_open(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
