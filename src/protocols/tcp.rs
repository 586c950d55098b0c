use super::Protocol;
use crate::error::Result;
use log::debug;
use std::{
    net::{SocketAddr, TcpStream},
    time::Duration,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Raw socket link, as offered by the AQ6370D ethernet interface.
#[derive(Debug, Clone, Copy)]
pub struct Tcp {
    pub timeout: Duration,
}

impl Default for Tcp {
    fn default() -> Self {
        Tcp {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Tcp {
    pub fn with_timeout(timeout: Duration) -> Self {
        Tcp { timeout }
    }
}

impl Protocol for Tcp {
    type IO = TcpStream;
    type Address = SocketAddr;
    fn connect(self, address: Self::Address) -> Result<Self::IO> {
        debug!("connecting to {} (timeout {:?})", address, self.timeout);
        let stream = TcpStream::connect_timeout(&address, self.timeout)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
