//! Declarative instrument controls.
//!
//! A control couples a query command, a set command template with one printf slot and a
//! validator. Controls hold no connection and no state, so an instrument declares them as
//! `const` items and hands its connection to [`Control::get`] / [`Control::set`].
//!
//! ```
//! use aq6370d::control::{Control, StrictRange};
//! use aq6370d::protocols::Loopback;
//!
//! const LEVEL: Control<f64, StrictRange<f64>> = Control::new(
//!     "level",
//!     ":LEVel?",
//!     ":LEVel %g",
//!     StrictRange::new(-100.0, 20.0),
//! );
//!
//! let mut link = Loopback::with_responses(["-10.0"]);
//! LEVEL.set(&mut link, -12.5).unwrap();
//! assert!(LEVEL.set(&mut link, 30.0).is_err());
//! assert_eq!(LEVEL.get(&mut link).unwrap(), -10.0);
//! assert_eq!(link.written(), [":LEVel -12.5", ":LEVel?"]);
//! ```

use std::{fmt::Debug, marker::PhantomData};

use log::{debug, warn};

use crate::{
    error::{Error, Result},
    scpi::{
        format::{format_command, Arg},
        Scpi,
    },
};

pub mod validator;

pub use validator::{StrictDiscreteSet, StrictRange, Unchecked, Validator};

/// A scalar that can travel through a control: parsed from a response, rendered into a command.
pub trait ControlValue: Sized + Clone + Debug {
    /// What the value is called in parse errors.
    const EXPECTED: &'static str;
    fn from_response(response: &str) -> Result<Self>;
    fn to_arg(&self) -> Arg;
}

impl ControlValue for f64 {
    const EXPECTED: &'static str = "float";
    fn from_response(response: &str) -> Result<Self> {
        let response = response.trim();
        response
            .parse()
            .map_err(|_| Error::parse(response, Self::EXPECTED))
    }
    fn to_arg(&self) -> Arg {
        Arg::Float(*self)
    }
}

impl ControlValue for i64 {
    const EXPECTED: &'static str = "integer";
    /// Accepts integral float renderings too, the instrument answers `+1.00000000E+001` as
    /// readily as `10`.
    fn from_response(response: &str) -> Result<Self> {
        let response = response.trim();
        if let Ok(v) = response.trim_start_matches('+').parse::<i64>() {
            return Ok(v);
        }
        match response.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
            _ => Err(Error::parse(response, Self::EXPECTED)),
        }
    }
    fn to_arg(&self) -> Arg {
        Arg::Int(*self)
    }
}

impl ControlValue for String {
    const EXPECTED: &'static str = "string";
    fn from_response(response: &str) -> Result<Self> {
        Ok(response.trim().trim_matches('"').to_string())
    }
    fn to_arg(&self) -> Arg {
        Arg::Str(self.clone())
    }
}

/// A typed control validated by `V`.
#[derive(Debug, Clone, Copy)]
pub struct Control<T, V> {
    name: &'static str,
    get_command: &'static str,
    set_command: &'static str,
    validator: V,
    value: PhantomData<fn() -> T>,
}

impl<T, V> Control<T, V> {
    pub const fn new(
        name: &'static str,
        get_command: &'static str,
        set_command: &'static str,
        validator: V,
    ) -> Self {
        Self {
            name,
            get_command,
            set_command,
            validator,
            value: PhantomData,
        }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn get_command(&self) -> &'static str {
        self.get_command
    }
    pub fn set_command(&self) -> &'static str {
        self.set_command
    }
    pub fn validator(&self) -> &V {
        &self.validator
    }
}

impl<T: ControlValue, V: Validator<T>> Control<T, V> {
    /// Validate `value` and render the set command, without touching any connection.
    pub fn command(&self, value: T) -> Result<String> {
        let value = self.validator.validate(value)?;
        format_command(self.set_command, &value.to_arg())
    }

    pub fn get<S: Scpi + ?Sized>(&self, conn: &mut S) -> Result<T> {
        let response = conn.query(self.get_command)?;
        T::from_response(&response)
    }

    pub fn set<S: Scpi + ?Sized>(&self, conn: &mut S, value: T) -> Result<()> {
        let command = self.command(value)?;
        debug!("set {}: '{}'", self.name, command);
        conn.write(&command)
    }
}

/// Bidirectional association of user facing keys with device codes.
#[derive(Debug, Clone, Copy)]
pub struct ValueMap<C: 'static> {
    pairs: &'static [(&'static str, C)],
}

impl<C> ValueMap<C> {
    pub const fn new(pairs: &'static [(&'static str, C)]) -> Self {
        Self { pairs }
    }
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(k, _)| *k)
    }
}

impl<C: ControlValue + PartialEq> ValueMap<C> {
    /// Device code for `key`; an unknown key is an invalid choice.
    pub fn code(&self, key: &str) -> Result<C> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| Error::InvalidChoiceError {
                value: key.to_string(),
                allowed: self.keys().map(str::to_string).collect(),
            })
    }

    pub fn key(&self, code: &C) -> Option<&'static str> {
        self.pairs.iter().find(|(_, c)| c == code).map(|(k, _)| *k)
    }

    fn mapping_error(&self, response: &str) -> Error {
        Error::MappingError {
            response: response.to_string(),
            allowed: self.pairs.iter().map(|(_, c)| c.to_arg().to_string()).collect(),
        }
    }
}

/// A control whose values are symbolic keys, translated to device codes on the wire.
///
/// Setting checks the key against the map before translating it, so the discrete set is
/// exactly the set of keys.
#[derive(Debug, Clone, Copy)]
pub struct MappedControl<C: 'static> {
    name: &'static str,
    get_command: &'static str,
    set_command: &'static str,
    map: ValueMap<C>,
}

impl<C> MappedControl<C> {
    pub const fn new(
        name: &'static str,
        get_command: &'static str,
        set_command: &'static str,
        map: ValueMap<C>,
    ) -> Self {
        Self {
            name,
            get_command,
            set_command,
            map,
        }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn get_command(&self) -> &'static str {
        self.get_command
    }
    pub fn set_command(&self) -> &'static str {
        self.set_command
    }
    pub fn map(&self) -> &ValueMap<C> {
        &self.map
    }
}

impl<C: ControlValue + PartialEq> MappedControl<C> {
    pub fn command(&self, key: &str) -> Result<String> {
        let code = self.map.code(key)?;
        format_command(self.set_command, &code.to_arg())
    }

    pub fn get<S: Scpi + ?Sized>(&self, conn: &mut S) -> Result<&'static str> {
        let response = conn.query(self.get_command)?;
        let key = C::from_response(&response)
            .ok()
            .and_then(|code| self.map.key(&code));
        match key {
            Some(key) => Ok(key),
            None => {
                warn!("{}: unmapped response '{}'", self.name, response);
                Err(self.map.mapping_error(response.trim()))
            }
        }
    }

    pub fn set<S: Scpi + ?Sized>(&self, conn: &mut S, key: &str) -> Result<()> {
        let command = self.command(key)?;
        debug!("set {}: '{}' ({})", self.name, command, key);
        conn.write(&command)
    }
}
