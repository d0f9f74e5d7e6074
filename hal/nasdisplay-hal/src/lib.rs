//! nasdisplay Hardware Abstraction Layer
//!
//! This crate defines the serial line traits the display engine runs on.
//! The engine never touches a serial port directly; a backend (a native
//! serial port, a simulated device in tests) implements these traits and
//! hands the two halves to the session.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  nasdisplay (session, reader, writer)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  nasdisplay-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  serialport   │       │   simulated   │
//! │   backend     │       │    device     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{DataBits, FlowControl, Parity, StopBits, UartConfig, UartRx, UartTx};
