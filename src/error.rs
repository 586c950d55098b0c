use std::convert::Infallible;

use thiserror::Error;

use crate::scpi::DeviceError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("transfer layer error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("serial protocol error: {0}")]
    SerialError(#[from] serial::Error),
    #[error("value {value} is out of range [{min}, {max}]")]
    RangeError { value: String, min: String, max: String },
    #[error("value '{value}' is not in the discrete set [{}]", .allowed.join(", "))]
    InvalidChoiceError { value: String, allowed: Vec<String> },
    #[error("device response '{response}' matches none of the mapped codes [{}]", .allowed.join(", "))]
    MappingError {
        response: String,
        allowed: Vec<String>,
    },
    #[error("cannot parse device response '{response}' as {expected}")]
    ParseError {
        response: String,
        expected: &'static str,
    },
    #[error("invalid command template '{0}'")]
    TemplateError(String),
    #[error("device error: {0}")]
    DeviceError(#[from] DeviceError),
    #[error("config error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::IOError(e) => e.kind() == std::io::ErrorKind::TimedOut,
            Error::SerialError(e) => matches!(
                e.kind(),
                serial::ErrorKind::Io(std::io::ErrorKind::TimedOut)
            ),
            _ => false,
        }
    }

    /// Whether the error was raised by local validation, i.e. before anything reached the device.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::RangeError { .. } | Error::InvalidChoiceError { .. }
        )
    }

    pub(crate) fn parse<S: ToString>(response: S, expected: &'static str) -> Self {
        Error::ParseError {
            response: response.to_string(),
            expected,
        }
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Error::IOError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Self {
        Error::IOError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl From<Infallible> for Error {
    fn from(_: Infallible) -> Self {
        unreachable!()
    }
}
