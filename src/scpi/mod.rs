use bytes::Bytes;
use log::{debug, error, trace};

use crate::error::{Error, Result};

pub mod com_cmd;
pub mod format;
pub mod scpi_error;

pub use scpi_error::{DeviceError, ScpiErrorKind};

/// Upper bound on error queue reads in [`Scpi::check_errors`], so a device that keeps
/// reporting errors cannot stall the caller forever.
const MAX_QUEUED_ERRORS: usize = 32;

/// Connection capability shared by every link to an instrument.
///
/// Implementors only provide [`write`](Scpi::write) and [`read`](Scpi::read); queries and the
/// IEEE 488.2 common commands are built on top of them. Each call is a blocking exchange,
/// concurrent use of one connection must be serialized by the caller.
pub trait Scpi {
    /// Send one command. The implementor appends the transport terminator.
    fn write(&mut self, command: &str) -> Result<()>;
    /// Read one response with the terminator stripped.
    fn read(&mut self) -> Result<String>;

    fn query(&mut self, command: &str) -> Result<String> {
        self.write(command)?;
        let response = self.read()?;
        debug!("'{}' -> '{}'", command, response);
        Ok(response)
    }

    /// Query a comma separated list of numbers.
    fn query_values(&mut self, command: &str) -> Result<Vec<f64>> {
        let response = self.query(command)?;
        let values = parse_values(&response)?;
        trace!("'{}' returned {} values", command, values.len());
        Ok(values)
    }

    fn id(&mut self) -> Result<String> {
        self.query(com_cmd::IDN.to_command().query().as_str())
    }
    fn options(&mut self) -> Result<String> {
        self.query(com_cmd::OPT.to_command().query().as_str())
    }
    fn reset(&mut self) -> Result<()> {
        self.write(com_cmd::RST)
    }
    fn clear(&mut self) -> Result<()> {
        self.write(com_cmd::CLS)
    }
    /// Block until all pending operations are finished.
    fn complete(&mut self) -> Result<()> {
        let response = self.query(com_cmd::OPC.to_command().query().as_str())?;
        match response.trim() {
            "1" | "+1" => Ok(()),
            other => Err(Error::parse(other, "operation complete flag")),
        }
    }
    fn status_byte(&mut self) -> Result<StatusByte> {
        let response = self.query(com_cmd::STB.to_command().query().as_str())?;
        Ok(StatusByte::new(parse_register(&response)?))
    }
    fn event_status(&mut self) -> Result<EventStatusByte> {
        let response = self.query(com_cmd::ESR.to_command().query().as_str())?;
        Ok(EventStatusByte::new(parse_register(&response)?))
    }
    fn set_event_mask(&mut self, byte: EventStatusByte) -> Result<()> {
        self.write(com_cmd::ESE.to_command().para(byte.to_string()).as_str())
    }
    fn set_service_mask(&mut self, byte: StatusByte) -> Result<()> {
        self.write(com_cmd::SRE.to_command().para(byte.to_string()).as_str())
    }

    /// Pop the oldest entry of the device error queue, `None` once it is empty.
    fn next_error(&mut self) -> Result<Option<DeviceError>> {
        let response = self.query(com_cmd::SYST_ERR.to_command().query().as_str())?;
        let err: DeviceError = response.parse()?;
        if err.is_no_error() {
            Ok(None)
        } else {
            Ok(Some(err))
        }
    }

    /// Drain the device error queue, failing with the first error found.
    fn check_errors(&mut self) -> Result<()> {
        let mut first = None;
        for _ in 0..MAX_QUEUED_ERRORS {
            match self.next_error()? {
                Some(err) => {
                    error!("device reported: {}", err);
                    first.get_or_insert(err);
                }
                None => break,
            }
        }
        match first {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

impl<S: Scpi + ?Sized> Scpi for &mut S {
    fn write(&mut self, command: &str) -> Result<()> {
        (**self).write(command)
    }
    fn read(&mut self) -> Result<String> {
        (**self).read()
    }
}

impl<S: Scpi + ?Sized> Scpi for Box<S> {
    fn write(&mut self, command: &str) -> Result<()> {
        (**self).write(command)
    }
    fn read(&mut self) -> Result<String> {
        (**self).read()
    }
}

/// Parse an ASCII list such as `+1.52000000E-006,+1.52001000E-006`.
pub fn parse_values(response: &str) -> Result<Vec<f64>> {
    let response = response.trim();
    if response.is_empty() {
        return Ok(Vec::new());
    }
    response
        .split(',')
        .map(|v| {
            let v = v.trim();
            v.parse::<f64>().map_err(|_| Error::parse(v, "float"))
        })
        .collect()
}

fn parse_register(response: &str) -> Result<u8> {
    let response = response.trim();
    response
        .trim_start_matches('+')
        .parse()
        .map_err(|_| Error::parse(response, "8-bit register"))
}

/// Raw response bytes as returned by a link, before text decoding.
pub fn decode(bytes: Bytes) -> Result<String> {
    let text = std::str::from_utf8(&bytes)?;
    Ok(text.trim_end_matches(&['\r', '\n'][..]).to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command(String);

impl Command {
    pub fn new<S: ToString>(s: S) -> Self {
        Self(s.to_string())
    }
    pub fn query(mut self) -> Self {
        self.0.push('?');
        self
    }
    pub fn para<P: AsRef<str>>(mut self, para: P) -> Self {
        self.0.push(' ');
        self.0.push_str(para.as_ref());
        self
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
    pub fn into_inner(self) -> String {
        self.0
    }
}
impl AsRef<str> for Command {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait ToCommand {
    fn to_command(&self) -> Command;
}
impl<T> ToCommand for T
where
    T: ToString,
{
    fn to_command(&self) -> Command {
        Command(self.to_string())
    }
}

/// IEEE 488.2 status byte (`*STB?`, `*SRE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusByte(u8);
impl StatusByte {
    pub fn new(b: u8) -> Self {
        Self(b)
    }
    pub fn byte(&self) -> u8 {
        self.0
    }
    pub fn is_error_queue_nonempty(&self) -> bool {
        self.0 & (1 << 2) != 0
    }
    pub fn error_queue_nonempty(mut self) -> Self {
        self.0 |= 1 << 2;
        self
    }
    pub fn is_message_available(&self) -> bool {
        self.0 & (1 << 4) != 0
    }
    pub fn message_available(mut self) -> Self {
        self.0 |= 1 << 4;
        self
    }
    pub fn is_event_happened(&self) -> bool {
        self.0 & (1 << 5) != 0
    }
    pub fn event_happened(mut self) -> Self {
        self.0 |= 1 << 5;
        self
    }
    pub fn is_requesting_service(&self) -> bool {
        self.0 & (1 << 6) != 0
    }
}

/// IEEE 488.2 standard event status register (`*ESR?`, `*ESE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventStatusByte(u8);
impl EventStatusByte {
    pub fn new(b: u8) -> Self {
        Self(b)
    }
    pub fn byte(&self) -> u8 {
        self.0
    }
    pub fn is_opera_complete(&self) -> bool {
        self.0 & (1 << 0) != 0
    }
    pub fn opera_complete(mut self) -> Self {
        self.0 |= 1 << 0;
        self
    }
    pub fn is_query_err(&self) -> bool {
        self.0 & (1 << 2) != 0
    }
    pub fn query_err(mut self) -> Self {
        self.0 |= 1 << 2;
        self
    }
    pub fn is_device_dep_err(&self) -> bool {
        self.0 & (1 << 3) != 0
    }
    pub fn device_dep_err(mut self) -> Self {
        self.0 |= 1 << 3;
        self
    }
    pub fn is_execution_err(&self) -> bool {
        self.0 & (1 << 4) != 0
    }
    pub fn execution_err(mut self) -> Self {
        self.0 |= 1 << 4;
        self
    }
    pub fn is_command_err(&self) -> bool {
        self.0 & (1 << 5) != 0
    }
    pub fn command_err(mut self) -> Self {
        self.0 |= 1 << 5;
        self
    }
    pub fn is_power_on(&self) -> bool {
        self.0 & (1 << 7) != 0
    }
}
impl std::fmt::Display for StatusByte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for EventStatusByte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
