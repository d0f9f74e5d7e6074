//! Display configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! tty = "/dev/ttyS1"
//! variant = "asustor"      # or "qnap"; omit to probe both
//! probe_timeout_ms = 300
//! ack_timeout_ms = 40
//! write_spacing_ms = 10
//! write_attempts = 10
//! queue_capacity = 100
//! read_poll_ms = 50
//! enqueue_timeout_ms = 50
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use nasdisplay_protocol::{Profile, ASUSTOR, QNAP};

use crate::error::ConfigError;

/// Serial device the panel is wired to on both families
pub const DEFAULT_TTY: &str = "/dev/ttyS1";

/// Panel family selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Asustor,
    Qnap,
}

impl Variant {
    /// Every family, in probing order
    pub const ALL: [Variant; 2] = [Variant::Asustor, Variant::Qnap];

    pub fn profile(self) -> &'static Profile {
        match self {
            Variant::Asustor => &ASUSTOR,
            Variant::Qnap => &QNAP,
        }
    }
}

/// Timing and sizing knobs of a display session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Serial device path
    pub tty: String,
    /// Restrict discovery to one family
    pub variant: Option<Variant>,
    /// Wait for a reply to each probe command
    pub probe_timeout_ms: u64,
    /// Wait for a write acknowledgment
    pub ack_timeout_ms: u64,
    /// Minimum gap between the end of one write and the start of the next
    pub write_spacing_ms: u64,
    /// Total attempts for an acknowledged write
    pub write_attempts: u32,
    /// Capacity of the acknowledgment and button queues
    pub queue_capacity: usize,
    /// Idle period after which a serial read returns empty
    pub read_poll_ms: u64,
    /// How long the reader blocks on a full queue before dropping a frame
    pub enqueue_timeout_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tty: DEFAULT_TTY.to_string(),
            variant: None,
            probe_timeout_ms: 300,
            ack_timeout_ms: 40,
            write_spacing_ms: 10,
            write_attempts: 10,
            queue_capacity: 100,
            read_poll_ms: 50,
            enqueue_timeout_ms: 50,
        }
    }
}

impl DisplayConfig {
    /// Parse a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }

    pub fn write_spacing(&self) -> Duration {
        Duration::from_millis(self.write_spacing_ms)
    }

    pub fn read_poll(&self) -> Duration {
        Duration::from_millis(self.read_poll_ms)
    }

    pub fn enqueue_timeout(&self) -> Duration {
        Duration::from_millis(self.enqueue_timeout_ms)
    }

    /// Families to try, in order
    pub fn variants(&self) -> Vec<Variant> {
        match self.variant {
            Some(variant) => vec![variant],
            None => Variant::ALL.to_vec(),
        }
    }
}
