//! Frame encoding and decoding for the panel protocol.
//!
//! Outbound frames are a command followed (for checksummed profiles) by a
//! trailing byte holding the wrapping sum of the command bytes. Inbound
//! frames have a fixed per-profile length and are cut out of the byte
//! stream by [`FrameAssembler`].
//!
//! Inbound checksums are not enforced. Panels have been seen to answer with
//! frames whose classification prefix is intact while the trailing byte is
//! off, so routing goes by content and [`Frame::checksum_ok`] is only
//! reported.

use heapless::Vec;

use crate::profile::{Framing, Profile, Resync};

/// Largest frame either panel family sends or accepts
pub const MAX_FRAME_SIZE: usize = 32;

/// Errors that can occur while building or cutting frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Command has no bytes
    Empty,
    /// Command plus checksum does not fit in [`MAX_FRAME_SIZE`]
    TooLong,
    /// Received frame length differs from the profile frame length
    LengthMismatch { expected: usize, actual: usize },
}

/// Wrapping byte sum used as the trailing checksum
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// A complete frame as it travels on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    bytes: Vec<u8, MAX_FRAME_SIZE>,
}

impl Frame {
    /// Build the outbound frame for `command` using the profile's framing
    pub fn encode(profile: &Profile, command: &[u8]) -> Result<Self, FrameError> {
        match profile.framing {
            Framing::Checksummed => Self::checksummed(command),
            Framing::Raw => Self::raw(command),
        }
    }

    /// Copy `command` and append its checksum
    pub fn checksummed(command: &[u8]) -> Result<Self, FrameError> {
        if command.is_empty() {
            return Err(FrameError::Empty);
        }
        if command.len() + 1 > MAX_FRAME_SIZE {
            return Err(FrameError::TooLong);
        }

        let mut bytes = Vec::new();
        bytes
            .extend_from_slice(command)
            .map_err(|_| FrameError::TooLong)?;
        bytes
            .push(checksum(command))
            .map_err(|_| FrameError::TooLong)?;
        Ok(Self { bytes })
    }

    /// Copy `command` unchanged
    pub fn raw(command: &[u8]) -> Result<Self, FrameError> {
        if command.is_empty() {
            return Err(FrameError::Empty);
        }
        let bytes = Vec::from_slice(command).map_err(|_| FrameError::TooLong)?;
        Ok(Self { bytes })
    }

    /// Accept a received frame of exactly `expected_len` bytes
    pub fn decode(raw: &[u8], expected_len: usize) -> Result<Self, FrameError> {
        if raw.len() != expected_len {
            return Err(FrameError::LengthMismatch {
                expected: expected_len,
                actual: raw.len(),
            });
        }
        Self::raw(raw)
    }

    /// All bytes, including the checksum if there is one
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Frame length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false` for a constructed frame
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The bytes covered by the checksum
    pub fn body(&self) -> &[u8] {
        &self.bytes[..self.bytes.len().saturating_sub(1)]
    }

    /// Whether the trailing byte is the checksum of the body
    pub fn checksum_ok(&self) -> bool {
        match self.bytes.last() {
            Some(&last) => checksum(self.body()) == last,
            None => false,
        }
    }

    /// Whether the frame begins with `prefix`
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes.starts_with(prefix)
    }

    /// Whether the frame is byte-for-byte equal to `pattern`
    pub fn matches(&self, pattern: &[u8]) -> bool {
        self.bytes.as_slice() == pattern
    }

    /// Byte at `index`, if present
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// Restore a frame whose prefix bytes arrived out of order.
    ///
    /// QNAP panels share one wire for both directions and a button frame
    /// read while a write is in progress can come back shuffled. Every
    /// prefix byte is pulled out of the frame in turn; the leftover bytes
    /// follow. Returns `None` when some prefix byte is missing altogether.
    pub fn unscrambled(&self, prefix: &[u8]) -> Option<Self> {
        if self.starts_with(prefix) {
            return Some(self.clone());
        }

        let mut rest = self.bytes.clone();
        let mut ordered: Vec<u8, MAX_FRAME_SIZE> = Vec::new();
        for &wanted in prefix {
            let pos = rest.iter().position(|&b| b == wanted)?;
            rest.swap_remove(pos);
            ordered.push(wanted).ok()?;
        }
        ordered.extend_from_slice(&rest).ok()?;
        Some(Self { bytes: ordered })
    }
}

/// Cuts fixed-length frames out of a raw byte stream
///
/// With [`Resync::ScanForMarker`] bytes are discarded until one of the
/// profile markers starts a frame, which recovers from garbage left by an
/// earlier desynchronization. With [`Resync::FixedWindow`] every byte is
/// taken and each window of `frame_len` bytes is one frame.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    resync: Resync,
    markers: &'static [u8],
    frame_len: usize,
    buffer: Vec<u8, MAX_FRAME_SIZE>,
}

impl FrameAssembler {
    /// Create an assembler for the profile's inbound frames
    pub fn new(profile: &Profile) -> Self {
        Self {
            resync: profile.resync,
            markers: profile.markers,
            frame_len: profile.frame_len.min(MAX_FRAME_SIZE),
            buffer: Vec::new(),
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Bytes still needed to complete the current frame
    pub fn remaining(&self) -> usize {
        self.frame_len - self.buffer.len()
    }

    /// Feed a single byte
    ///
    /// Returns `Some(frame)` when the byte completes a frame.
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        if self.buffer.is_empty()
            && self.resync == Resync::ScanForMarker
            && !self.markers.contains(&byte)
        {
            return None;
        }

        // Cannot overflow: the buffer is drained at frame_len <= capacity
        let _ = self.buffer.push(byte);
        if self.buffer.len() < self.frame_len {
            return None;
        }

        let frame = Frame {
            bytes: self.buffer.clone(),
        };
        self.reset();
        Some(frame)
    }
}
