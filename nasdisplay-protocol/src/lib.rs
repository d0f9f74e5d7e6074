//! Front-panel display wire protocol
//!
//! This crate defines the serial protocol spoken by the two-line LCD panels
//! fitted to ASUSTOR and QNAP NAS enclosures. Both families exchange short
//! fixed-length frames; they differ only in constants, so each family is
//! described by an immutable [`Profile`] and the codec, the resynchronizing
//! frame assembler and the button interpreter are shared.
//!
//! # Frame format (ASUSTOR)
//!
//! ```text
//! ┌──────┬────────┬─────────┬─────────────┬──────────┐
//! │ TYPE │ LENGTH │ COMMAND │ DATA        │ CHECKSUM │
//! │ 1B   │ 1B     │ 1B      │ 1–18B       │ 1B       │
//! └──────┴────────┴─────────┴─────────────┴──────────┘
//! ```
//!
//! The checksum is the byte sum (mod 256) of everything before it. QNAP
//! panels use the same command/reply shape without a checksum.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buttons;
pub mod frame;
pub mod profile;
pub mod text;

pub use buttons::{ButtonDecoder, ButtonEvent, BUTTON_BOTH, BUTTON_DOWN, BUTTON_UP};
pub use frame::{checksum, Frame, FrameAssembler, FrameError, MAX_FRAME_SIZE};
pub use profile::{ButtonScheme, Framing, Inbound, Profile, Resync, TextCommand, ASUSTOR, QNAP};
pub use text::{fit_line, progress_bar, Line, LineError, LINE_WIDTH};
