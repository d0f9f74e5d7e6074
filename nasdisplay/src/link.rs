//! Serial link the session runs on

use std::io;

use nasdisplay_hal::{UartConfig, UartRx, UartTx};

/// Opens the duplex byte channel to a panel
///
/// The returned halves are independent: the receive half moves to the
/// reader thread while the session keeps the transmit half. Dropping both
/// halves closes the port.
pub trait SerialLink: Send + Sync + 'static {
    type Rx: UartRx<Error = io::Error> + Send + 'static;
    type Tx: UartTx<Error = io::Error> + Send + 'static;

    /// Open the port with `config`
    ///
    /// `poll` bounds how long a read may block without data.
    fn open(&self, config: &UartConfig, poll: std::time::Duration)
        -> io::Result<(Self::Rx, Self::Tx)>;

    /// Port description for logs
    fn describe(&self) -> String;
}
