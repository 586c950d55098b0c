use std::str::FromStr;

use thiserror::Error;

/// SCPI error classes, by the code ranges of the standard error queue.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScpiErrorKind {
    #[error("no error")]
    NoError,
    #[error("command error")]
    CommandError,
    #[error("execution error")]
    ExecutionError,
    #[error("device-dependent error")]
    DevDependError,
    #[error("query error")]
    QueryError,
    #[error("instrument specific error")]
    InstrumentError,
}

impl From<i32> for ScpiErrorKind {
    fn from(code: i32) -> Self {
        use ScpiErrorKind::*;
        match code {
            0 => NoError,
            -199..=-100 => CommandError,
            -299..=-200 => ExecutionError,
            -399..=-300 => DevDependError,
            -499..=-400 => QueryError,
            _ => InstrumentError,
        }
    }
}

/// One entry of the device error queue, e.g. `-113,"Undefined header"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct DeviceError {
    code: i32,
    message: String,
}

impl DeviceError {
    pub fn new<S: Into<String>>(code: i32, message: S) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
    pub fn code(&self) -> i32 {
        self.code
    }
    pub fn message(&self) -> &str {
        &self.message
    }
    pub fn kind(&self) -> ScpiErrorKind {
        ScpiErrorKind::from(self.code)
    }
    pub fn is_no_error(&self) -> bool {
        self.code == 0
    }
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, \"{}\" ({})", self.code, self.message, self.kind())
    }
}

impl FromStr for DeviceError {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (code, message) = match s.split_once(',') {
            Some((code, message)) => (code, message),
            None => (s, ""),
        };
        let code = code
            .trim()
            .trim_start_matches('+')
            .parse()
            .map_err(|_| crate::error::Error::parse(s, "error queue entry"))?;
        Ok(Self::new(code, message.trim().trim_matches('"')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_error_queue_entries() {
        let e: DeviceError = "-222,\"Data out of range\"".parse().unwrap();
        assert_eq!(e, DeviceError::new(-222, "Data out of range"));
        assert_eq!(e.kind(), ScpiErrorKind::ExecutionError);
        assert_eq!(e.to_string(), "-222, \"Data out of range\" (execution error)");

        let e: DeviceError = "+0,\"No error\"\n".parse().unwrap();
        assert!(e.is_no_error());

        let e: DeviceError = "0".parse().unwrap();
        assert!(e.is_no_error());
        assert!("garbage".parse::<DeviceError>().is_err());
    }

    #[test]
    fn classifies_by_code_range() {
        assert_eq!(ScpiErrorKind::from(-350), ScpiErrorKind::DevDependError);
        assert_eq!(ScpiErrorKind::from(-410), ScpiErrorKind::QueryError);
        assert_eq!(ScpiErrorKind::from(103), ScpiErrorKind::InstrumentError);
    }
}
