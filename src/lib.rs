//! Driver for the Yokogawa AQ6370D optical spectrum analyzer.
//!
//! The instrument is reached through any [`scpi::Scpi`] connection: a [`instruments::Link`]
//! over TCP or a serial port, or a [`protocols::Loopback`] for offline use. Settings are
//! declared as [`control`] descriptors that validate values before anything is sent.
//!
//! ```no_run
//! use aq6370d::{instruments::aq6370d::AQ6370D, Analyzer, DefaultConfig};
//!
//! # fn main() -> aq6370d::Result<()> {
//! let mut osa = Analyzer::new(AQ6370D::default_connect("192.168.1.20:10001".parse().unwrap())?);
//! osa.set_wavelength_center(1550e-9)?;
//! osa.set_wavelength_span(10e-9)?;
//! osa.single_sweep()?;
//! let spectrum = osa.get_trace("TRA")?;
//! println!("{} points", spectrum.len());
//! # Ok(())
//! # }
//! ```

use serial::SerialPort;

use instruments::{Bound, Model};
use protocols::{Protocol, Serial};

pub mod config;
pub mod control;
pub mod error;
pub mod instruments;
pub mod protocols;
pub mod scpi;

pub use error::{Error, Result};
pub use instruments::aq6370d::{Analyzer, Trace};
pub use scpi::Scpi;

fn config_serial<T: SerialPort>(port: &mut T, config: Serial) -> serial::Result<()> {
    port.reconfigure(&|settings| {
        settings.set_baud_rate(config.baud_rate)?;
        settings.set_char_size(config.data_bits);
        settings.set_parity(config.parity);
        settings.set_stop_bits(config.stop_bits);
        settings.set_flow_control(config.flow_control);
        Ok(())
    })?;
    port.set_timeout(config.timeout)
}

/// The transport an instrument model is usually reached by.
pub trait DefaultConfig: Model + Sized {
    type DefaultProtocol: Protocol + Default;

    fn default_connect(
        address: <Self::DefaultProtocol as Protocol>::Address,
    ) -> Bound<Self::DefaultProtocol, Self> {
        instruments::connect(Self::DefaultProtocol::default(), address)
    }
}
