//! Front-panel button events

use crate::frame::Frame;
use crate::profile::{ButtonScheme, Profile};

/// "Up" (or first) button on press/release panels
pub const BUTTON_UP: u8 = 1;
/// "Down" (or second) button on press/release panels
pub const BUTTON_DOWN: u8 = 2;
/// Both buttons held together
pub const BUTTON_BOTH: u8 = 3;

// Wire codes following the button prefix on press/release panels
const CODE_RELEASED: u8 = 0;

/// A decoded button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    /// Button identifier as reported by the panel
    pub button: u8,
    /// `true` for a release, `false` for a press
    pub released: bool,
}

impl ButtonEvent {
    pub const fn pressed(button: u8) -> Self {
        Self {
            button,
            released: false,
        }
    }

    pub const fn released(button: u8) -> Self {
        Self {
            button,
            released: true,
        }
    }
}

/// Turns raw button frames into [`ButtonEvent`]s
///
/// Press/release panels send an anonymous release frame, so the decoder
/// remembers which button is held and names it on release. While both
/// buttons are held, single-button frames are contact bounce and are
/// dropped until the release arrives.
#[derive(Debug, Clone)]
pub struct ButtonDecoder {
    scheme: ButtonScheme,
    code_index: usize,
    held: Option<u8>,
}

impl ButtonDecoder {
    /// Create a decoder for the profile's button frames
    pub fn new(profile: &Profile) -> Self {
        Self {
            scheme: profile.button_scheme,
            code_index: profile.button_prefix.len(),
            held: None,
        }
    }

    /// Button currently held, if any
    pub fn held(&self) -> Option<u8> {
        self.held
    }

    /// Decode one button frame
    ///
    /// Returns `None` for frames that carry no event: suppressed bounce,
    /// a release with nothing held, or an unknown code.
    pub fn decode(&mut self, frame: &Frame) -> Option<ButtonEvent> {
        let code = frame.byte(self.code_index)?;
        match self.scheme {
            ButtonScheme::Combined => Some(ButtonEvent::released(code)),
            ButtonScheme::PressRelease => self.press_release(code),
        }
    }

    fn press_release(&mut self, code: u8) -> Option<ButtonEvent> {
        match code {
            CODE_RELEASED => self.held.take().map(ButtonEvent::released),
            BUTTON_UP | BUTTON_DOWN => {
                if self.held == Some(BUTTON_BOTH) {
                    return None;
                }
                self.held = Some(code);
                Some(ButtonEvent::pressed(code))
            }
            BUTTON_BOTH => {
                self.held = Some(BUTTON_BOTH);
                Some(ButtonEvent::pressed(BUTTON_BOTH))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ASUSTOR, QNAP};

    fn qnap_frame(code: u8) -> Frame {
        Frame::raw(&[0x53, 0x05, 0x00, code]).unwrap()
    }

    fn decode_all(decoder: &mut ButtonDecoder, codes: &[u8]) -> Vec<ButtonEvent> {
        codes
            .iter()
            .filter_map(|&code| decoder.decode(&qnap_frame(code)))
            .collect()
    }

    #[test]
    fn test_both_pressed_suppresses_bounce() {
        let mut decoder = ButtonDecoder::new(&QNAP);
        let events = decode_all(&mut decoder, &[BUTTON_UP, BUTTON_BOTH, BUTTON_DOWN, 0]);

        assert_eq!(
            events,
            vec![
                ButtonEvent::pressed(BUTTON_UP),
                ButtonEvent::pressed(BUTTON_BOTH),
                ButtonEvent::released(BUTTON_BOTH),
            ]
        );
        assert_eq!(decoder.held(), None);
    }

    #[test]
    fn test_release_names_held_button() {
        let mut decoder = ButtonDecoder::new(&QNAP);
        let events = decode_all(&mut decoder, &[BUTTON_DOWN, 0, BUTTON_UP, 0]);

        assert_eq!(
            events,
            vec![
                ButtonEvent::pressed(BUTTON_DOWN),
                ButtonEvent::released(BUTTON_DOWN),
                ButtonEvent::pressed(BUTTON_UP),
                ButtonEvent::released(BUTTON_UP),
            ]
        );
    }

    #[test]
    fn test_single_buttons_allowed_again_after_release() {
        let mut decoder = ButtonDecoder::new(&QNAP);
        let events = decode_all(&mut decoder, &[BUTTON_BOTH, BUTTON_UP, 0, BUTTON_UP]);

        assert_eq!(
            events,
            vec![
                ButtonEvent::pressed(BUTTON_BOTH),
                ButtonEvent::released(BUTTON_BOTH),
                ButtonEvent::pressed(BUTTON_UP),
            ]
        );
    }

    #[test]
    fn test_orphan_release_and_unknown_codes_ignored() {
        let mut decoder = ButtonDecoder::new(&QNAP);
        assert!(decode_all(&mut decoder, &[0, 0x42]).is_empty());
    }

    #[test]
    fn test_combined_scheme_is_stateless() {
        let mut decoder = ButtonDecoder::new(&ASUSTOR);
        let frame = Frame::checksummed(&[0xF0, 0x01, 0x80, 0x04]).unwrap();

        assert_eq!(decoder.decode(&frame), Some(ButtonEvent::released(0x04)));
        assert_eq!(decoder.decode(&frame), Some(ButtonEvent::released(0x04)));
        assert_eq!(decoder.held(), None);
    }

    #[test]
    fn test_short_frame_yields_nothing() {
        let mut decoder = ButtonDecoder::new(&QNAP);
        let frame = Frame::raw(&[0x53, 0x05, 0x00]).unwrap();
        assert_eq!(decoder.decode(&frame), None);
    }
}
