//! Front-panel LCD engine for ASUSTOR and QNAP NAS enclosures
//!
//! Drives the two-line, sixteen-column panels these enclosures carry on an
//! internal serial port. A [`Display`] opens the port, proves the panel is
//! there, writes text with acknowledgment and retry where the family
//! supports it, and turns the panel's button frames into press and release
//! events.
//!
//! ```no_run
//! # #[cfg(feature = "native")]
//! # fn main() -> Result<(), nasdisplay::DisplayError> {
//! use nasdisplay::{Display, DisplayConfig, Line, NativeSerial, ASUSTOR};
//!
//! let config = DisplayConfig::default();
//! let display = Display::connect(NativeSerial::new(&config.tty), &ASUSTOR, config)?;
//! display.write(Line::One, "Hello")?;
//! display.listen(|button, released| {
//!     println!("button {} {}", button, if released { "up" } else { "down" });
//!     true
//! })?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "native"))]
//! # fn main() {}
//! ```
//!
//! Wire-level types live in `nasdisplay-protocol` and are re-exported here.

#![deny(unsafe_code)]

pub mod backend;
pub mod config;
pub mod display;
pub mod error;
pub mod find;
pub mod link;
pub mod listen;
#[cfg(feature = "native")]
pub mod native;
mod reader;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use backend::{Lcd, NullDisplay};
pub use config::{DisplayConfig, Variant, DEFAULT_TTY};
pub use display::{Display, SessionState};
pub use error::{ConfigError, DisplayError, Result};
#[cfg(feature = "native")]
pub use find::find;
pub use find::find_with;
pub use link::SerialLink;
pub use listen::ButtonStream;
#[cfg(feature = "native")]
pub use native::NativeSerial;

pub use nasdisplay_hal::UartConfig;
pub use nasdisplay_protocol::{
    fit_line, progress_bar, ButtonEvent, FrameError, Line, Profile, BUTTON_BOTH, BUTTON_DOWN,
    BUTTON_UP, ASUSTOR, LINE_WIDTH, QNAP,
};
