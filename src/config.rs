//! Connection settings read from a TOML file.
//!
//! ```toml
//! [connection]
//! transport = "tcp"
//! address = "192.168.1.20:10001"
//! timeout_ms = 3000
//! ```

use std::{
    net::ToSocketAddrs,
    path::Path,
    str::FromStr,
    time::Duration,
};

use log::info;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    instruments::{self, aq6370d::AQ6370D},
    protocols::{Serial, Tcp},
    scpi::Scpi,
};

fn default_timeout_ms() -> u64 {
    3000
}

fn default_baud_rate() -> usize {
    9600
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum ConnectionConfig {
    Tcp {
        address: String,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
    Serial {
        port: String,
        #[serde(default = "default_baud_rate")]
        baud_rate: usize,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }
}

impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl ConnectionConfig {
    pub fn timeout(&self) -> Duration {
        match self {
            ConnectionConfig::Tcp { timeout_ms, .. } | ConnectionConfig::Serial { timeout_ms, .. } => {
                Duration::from_millis(*timeout_ms)
            }
        }
    }

    /// Open the configured transport, framed for the AQ6370D.
    pub fn connect(&self) -> Result<Box<dyn Scpi>> {
        match self {
            ConnectionConfig::Tcp { address, .. } => {
                let addr = address.to_socket_addrs()?.next().ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("'{}' resolves to no address", address),
                    )
                })?;
                info!("connecting to AQ6370D at {}", addr);
                let link = instruments::connect::<_, AQ6370D>(Tcp::with_timeout(self.timeout()), addr)?;
                Ok(Box::new(link))
            }
            ConnectionConfig::Serial {
                port, baud_rate, ..
            } => {
                info!("connecting to AQ6370D on {} at {} baud", port, baud_rate);
                let serial = Serial {
                    timeout: self.timeout(),
                    ..Serial::with_baud_rate(*baud_rate)
                };
                let link = instruments::connect::<_, AQ6370D>(serial, port.clone())?;
                Ok(Box::new(link))
            }
        }
    }
}
