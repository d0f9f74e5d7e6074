//! [`SerialLink`] backed by the `serialport` crate

use std::io::{self, Read, Write};
use std::time::Duration;

use nasdisplay_hal::{DataBits, FlowControl, Parity, StopBits, UartConfig, UartRx, UartTx};
use serialport::SerialPort;

use crate::link::SerialLink;

/// A serial device node such as `/dev/ttyS1`
#[derive(Debug, Clone)]
pub struct NativeSerial {
    path: String,
}

impl NativeSerial {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Receive half of a native port
pub struct NativeRx(Box<dyn SerialPort>);

/// Transmit half of a native port
pub struct NativeTx(Box<dyn SerialPort>);

impl SerialLink for NativeSerial {
    type Rx = NativeRx;
    type Tx = NativeTx;

    fn open(&self, config: &UartConfig, poll: Duration) -> io::Result<(NativeRx, NativeTx)> {
        let port = serialport::new(self.path.as_str(), config.baudrate)
            .data_bits(match config.data_bits {
                DataBits::Seven => serialport::DataBits::Seven,
                DataBits::Eight => serialport::DataBits::Eight,
            })
            .parity(match config.parity {
                Parity::None => serialport::Parity::None,
                Parity::Even => serialport::Parity::Even,
                Parity::Odd => serialport::Parity::Odd,
            })
            .stop_bits(match config.stop_bits {
                StopBits::One => serialport::StopBits::One,
                StopBits::Two => serialport::StopBits::Two,
            })
            .flow_control(match config.flow_control {
                FlowControl::None => serialport::FlowControl::None,
                FlowControl::Software => serialport::FlowControl::Software,
                FlowControl::Hardware => serialport::FlowControl::Hardware,
            })
            .timeout(poll)
            .open()?;
        let rx = port.try_clone()?;
        Ok((NativeRx(rx), NativeTx(port)))
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

impl UartRx for NativeRx {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            other => other,
        }
    }
}

impl UartTx for NativeTx {
    type Error = io::Error;

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}
