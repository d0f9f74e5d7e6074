//! Per-family protocol constants
//!
//! A [`Profile`] holds every byte sequence and framing rule one panel family
//! needs. Profiles are `static` and never change after selection; the
//! engine takes a `&'static Profile` and all family differences flow
//! through it.

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_FRAME_SIZE};
use crate::text::{fit_line, Line};

/// How outbound commands are turned into frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Framing {
    /// Append a trailing byte-sum checksum
    Checksummed,
    /// Send the command bytes as they are
    Raw,
}

/// How the reader finds frame boundaries in the inbound stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resync {
    /// Every `frame_len` bytes form one frame
    FixedWindow,
    /// Skip bytes until a marker byte, then take `frame_len` bytes
    ScanForMarker,
}

/// How button frames encode presses and releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonScheme {
    /// One frame per physical event, carrying the button id
    Combined,
    /// Separate press frames (up, down, both) and an anonymous release frame
    PressRelease,
}

/// Layout of the "write text to line" command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextCommand {
    /// Bytes preceding the 16 text bytes
    pub header: &'static [u8],
    /// Position inside `header` that receives the line number
    pub line_index: usize,
}

/// Immutable description of one panel family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    /// Human readable family name
    pub name: &'static str,
    /// Serial line speed, always 8N1
    pub baud_rate: u32,
    /// Length of every inbound frame
    pub frame_len: usize,
    /// Bytes that may start an inbound frame (used by marker scan)
    pub markers: &'static [u8],
    pub framing: Framing,
    pub resync: Resync,

    pub display_status: &'static [u8],
    pub clear: &'static [u8],
    pub display_on: &'static [u8],
    pub display_off: &'static [u8],
    pub text: TextCommand,

    /// Leading bytes identifying a button frame
    pub button_prefix: &'static [u8],
    pub button_scheme: ButtonScheme,
    /// Re-order button frames whose prefix arrives shuffled
    pub unscramble_buttons: bool,

    /// Commands sent in turn while probing, until one is acknowledged
    pub probe_sequence: &'static [&'static [u8]],
    /// Replies accepted as "device is alive"
    pub probe_acks: &'static [&'static [u8]],
    /// Replies confirming a text write; empty means fire-and-forget
    pub write_acks: &'static [&'static [u8]],
    /// Replies confirming display on/off; empty means fire-and-forget
    pub enable_acks: &'static [&'static [u8]],
}

/// A classified inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Inbound {
    /// Front-panel button frame
    Button(Frame),
    /// Anything else: replies to commands
    Reply(Frame),
}

const ASUSTOR_CMD: u8 = 0xF0;
const ASUSTOR_REPLY: u8 = 0xF1;
const ASUSTOR_STATUS: &[u8] = &[ASUSTOR_CMD, 0x01, 0x11, 0x01];
const ASUSTOR_CLEAR: &[u8] = &[ASUSTOR_CMD, 0x01, 0x12, 0x01];

/// ASUSTOR AS6404T and relatives: 115200 baud, checksummed 5-byte replies
pub static ASUSTOR: Profile = Profile {
    name: "asustor",
    baud_rate: 115_200,
    frame_len: 5,
    markers: &[ASUSTOR_CMD, ASUSTOR_REPLY],
    framing: Framing::Checksummed,
    resync: Resync::ScanForMarker,

    display_status: ASUSTOR_STATUS,
    clear: ASUSTOR_CLEAR,
    display_on: &[ASUSTOR_CMD, 0x01, 0x22, 0x00],
    display_off: &[ASUSTOR_CMD, 0x01, 0x11, 0x00],
    text: TextCommand {
        header: &[ASUSTOR_CMD, 0x12, 0x27, 0x00, 0x00],
        line_index: 3,
    },

    button_prefix: &[ASUSTOR_CMD, 0x01, 0x80],
    button_scheme: ButtonScheme::Combined,
    unscramble_buttons: false,

    probe_sequence: &[ASUSTOR_STATUS, ASUSTOR_CLEAR, ASUSTOR_STATUS],
    probe_acks: &[
        &[ASUSTOR_REPLY, 0x01, 0x11, 0x00, 0x03],
        &[ASUSTOR_REPLY, 0x01, 0x11, 0x04, 0x07],
        &[ASUSTOR_REPLY, 0x01, 0x27, 0x04, 0x1D],
    ],
    write_acks: &[&[ASUSTOR_REPLY, 0x01, 0x27, 0x00, 0x19]],
    enable_acks: &[],
};

const QNAP_INIT: &[u8] = &[0x4D, 0x00];
const QNAP_CLEAR: &[u8] = &[0x4D, 0x0D];

/// QNAP TVS-x72XT and relatives: 1200 baud, raw 4-byte replies
pub static QNAP: Profile = Profile {
    name: "qnap",
    baud_rate: 1_200,
    frame_len: 4,
    markers: &[0x53],
    framing: Framing::Raw,
    resync: Resync::FixedWindow,

    display_status: QNAP_INIT,
    clear: QNAP_CLEAR,
    display_on: &[0x4D, 0x5E, 0x01, 0x0A],
    display_off: &[0x4D, 0x5E, 0x00, 0x0A],
    // Backlight on, then "write line": 4D 0C <line> 10 <16 chars>
    text: TextCommand {
        header: &[0x4D, 0x5E, 0x01, 0x4D, 0x0C, 0x00, 0x10],
        line_index: 5,
    },

    button_prefix: &[0x53, 0x05, 0x00],
    button_scheme: ButtonScheme::PressRelease,
    unscramble_buttons: true,

    probe_sequence: &[QNAP_INIT, QNAP_CLEAR, QNAP_INIT],
    probe_acks: &[&[0x53, 0x01, 0x00, 0x7D]],
    write_acks: &[],
    enable_acks: &[],
};

impl Profile {
    /// Encode a command with this profile's framing
    pub fn frame(&self, command: &[u8]) -> Result<Frame, FrameError> {
        Frame::encode(self, command)
    }

    /// Build the frame writing `text` to `line`, fitted to 16 columns
    pub fn text_frame(&self, line: Line, text: &str) -> Result<Frame, FrameError> {
        let mut command: Vec<u8, MAX_FRAME_SIZE> =
            Vec::from_slice(self.text.header).map_err(|_| FrameError::TooLong)?;
        if let Some(slot) = command.get_mut(self.text.line_index) {
            *slot = line.index();
        }
        command
            .extend_from_slice(&fit_line(text))
            .map_err(|_| FrameError::TooLong)?;
        self.frame(&command)
    }

    /// Frame for display on (`true`) or off (`false`)
    pub fn enable_frame(&self, on: bool) -> Result<Frame, FrameError> {
        self.frame(if on { self.display_on } else { self.display_off })
    }

    /// Route an inbound frame by its prefix
    pub fn classify(&self, frame: Frame) -> Inbound {
        if frame.starts_with(self.button_prefix) {
            return Inbound::Button(frame);
        }
        if self.unscramble_buttons {
            if let Some(ordered) = frame.unscrambled(self.button_prefix) {
                return Inbound::Button(ordered);
            }
        }
        Inbound::Reply(frame)
    }

    /// Whether `frame` is one of `expected`
    pub fn is_one_of(frame: &Frame, expected: &[&[u8]]) -> bool {
        expected.iter().any(|pattern| frame.matches(pattern))
    }
}
