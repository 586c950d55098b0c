use super::Protocol;
use crate::error::Result;
use log::debug;
use serial::SystemPort;
use std::time::Duration;

/// Serial link, e.g. a GP-IB or USB bridge that presents itself as a serial port.
#[derive(Clone, Copy, Debug)]
pub struct Serial {
    pub baud_rate: serial::BaudRate,
    pub data_bits: serial::CharSize,
    pub parity: serial::Parity,
    pub stop_bits: serial::StopBits,
    pub flow_control: serial::FlowControl,
    pub timeout: Duration,
}

impl Default for Serial {
    fn default() -> Self {
        Self {
            baud_rate: serial::Baud9600,
            data_bits: serial::Bits8,
            parity: serial::ParityNone,
            stop_bits: serial::Stop1,
            flow_control: serial::FlowNone,
            timeout: super::tcp::DEFAULT_TIMEOUT,
        }
    }
}

impl Serial {
    pub fn with_baud_rate(baud_rate: usize) -> Self {
        Self {
            baud_rate: serial::BaudRate::from_speed(baud_rate),
            ..Self::default()
        }
    }
}

impl Protocol for Serial {
    type Address = String;
    type IO = SystemPort;
    fn connect(self, address: Self::Address) -> Result<Self::IO> {
        debug!("opening serial port {} at {:?}", address, self.baud_rate);
        let mut port = serial::open(&address)?;
        crate::config_serial(&mut port, self)?;
        Ok(port)
    }
}
