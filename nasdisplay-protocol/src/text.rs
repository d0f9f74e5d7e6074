//! Line selection and text layout for the 2x16 panel

use heapless::String;

/// Characters per panel line
pub const LINE_WIDTH: usize = 16;

/// One of the two panel lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    One,
    Two,
}

/// Line number outside the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineError(pub u8);

impl Line {
    /// Zero-based line number as sent on the wire
    pub const fn index(self) -> u8 {
        match self {
            Line::One => 0,
            Line::Two => 1,
        }
    }
}

impl TryFrom<u8> for Line {
    type Error = LineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Line::One),
            1 => Ok(Line::Two),
            other => Err(LineError(other)),
        }
    }
}

/// Fit `text` to exactly one line
///
/// Longer text is cut at 16 bytes, shorter text is padded with spaces.
/// Works on bytes: the panel character ROM is single-byte.
pub fn fit_line(text: &str) -> [u8; LINE_WIDTH] {
    let mut line = [b' '; LINE_WIDTH];
    let bytes = text.as_bytes();
    let len = bytes.len().min(LINE_WIDTH);
    line[..len].copy_from_slice(&bytes[..len]);
    line
}

/// Render `percent` (clamped to 100) as a 16-column bar
///
/// Filled columns use `fill`, the rest `-`.
pub fn progress_bar(percent: u8, fill: char) -> String<{ LINE_WIDTH * 4 }> {
    let filled = LINE_WIDTH * usize::from(percent.min(100)) / 100;
    let mut bar = String::new();
    for column in 0..LINE_WIDTH {
        // Capacity covers 16 chars of up to 4 bytes each
        let _ = bar.push(if column < filled { fill } else { '-' });
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fit_line_pads() {
        assert_eq!(&fit_line("Hello"), b"Hello           ");
        assert_eq!(&fit_line(""), b"                ");
    }

    #[test]
    fn test_fit_line_truncates() {
        assert_eq!(&fit_line("0123456789abcdefXYZ"), b"0123456789abcdef");
    }

    #[test]
    fn test_line_conversion() {
        assert_eq!(Line::try_from(0), Ok(Line::One));
        assert_eq!(Line::try_from(1), Ok(Line::Two));
        assert_eq!(Line::try_from(2), Err(LineError(2)));
        assert_eq!(Line::Two.index(), 1);
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, '#').as_str(), "----------------");
        assert_eq!(progress_bar(50, '#').as_str(), "########--------");
        assert_eq!(progress_bar(100, '#').as_str(), "################");
        assert_eq!(progress_bar(250, '#').as_str(), "################");
    }

    proptest! {
        #[test]
        fn prop_fit_line_is_fixed_width_and_idempotent(text in "[ -~]{0,40}") {
            let once = fit_line(&text);
            prop_assert_eq!(once.len(), LINE_WIDTH);

            let as_str = core::str::from_utf8(&once).unwrap();
            prop_assert_eq!(fit_line(as_str), once);

            let keep = text.len().min(LINE_WIDTH);
            prop_assert_eq!(&once[..keep], &text.as_bytes()[..keep]);
            prop_assert!(once[keep..].iter().all(|&b| b == b' '));
        }
    }
}
