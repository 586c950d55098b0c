use std::{
    io::{BufRead, BufReader, Read, Write},
    marker::PhantomData,
};

use bytes::Bytes;
use log::trace;

use crate::{
    error::{Error, Result},
    protocols::Protocol,
    scpi::{self, Scpi},
};

pub type Bound<P, M> = Result<Link<<P as Protocol>::IO, M>>;

pub mod aq6370d;

/// Static description of an instrument's message framing.
pub trait Model {
    const DESCRIPTION: &'static str;
    /// Appended to every command written.
    const TERMINATOR: &'static str;
    /// Last byte of every response.
    const END_BYTE: u8;
}

/// Buffered, terminator aware connection to a model `M` over a raw byte stream.
pub struct Link<IO: Write + Read, M: Model> {
    messenger: BufReader<IO>,
    model: PhantomData<M>,
    buf: Vec<u8>,
}

impl<IO: Write + Read, M: Model> Link<IO, M> {
    pub fn new(io: IO) -> Self {
        Self {
            messenger: BufReader::new(io),
            model: PhantomData,
            buf: Vec::new(),
        }
    }

    pub fn get_mut(&mut self) -> &mut IO {
        self.messenger.get_mut()
    }

    pub fn into_inner(self) -> IO {
        self.messenger.into_inner()
    }

    /// Read one raw response up to and including `M::END_BYTE`.
    pub fn read_bytes(&mut self) -> Result<Bytes> {
        self.buf.clear();
        let n = self.messenger.read_until(M::END_BYTE, &mut self.buf)?;
        if n == 0 {
            return Err(Error::IOError(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("{} closed the connection", M::DESCRIPTION),
            )));
        }
        trace!("read {} bytes", n);
        Ok(Bytes::copy_from_slice(&self.buf))
    }
}

impl<IO: Write + Read, M: Model> Scpi for Link<IO, M> {
    fn write(&mut self, command: &str) -> Result<()> {
        let io = self.messenger.get_mut();
        io.write_all(command.as_bytes())?;
        io.write_all(M::TERMINATOR.as_bytes())?;
        io.flush()?;
        trace!("wrote '{}'", command);
        Ok(())
    }
    fn read(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        scpi::decode(bytes)
    }
}

/// Open `protocol` at `address` and frame it for model `M`.
pub fn connect<P: Protocol, M: Model>(protocol: P, address: P::Address) -> Bound<P, M> {
    Ok(Link::new(protocol.connect(address)?))
}
