//! Yokogawa AQ6370D optical spectrum analyzer.
//!
//! All wavelength settings assume the instrument is in wavelength (not frequency) mode.
//! Wavelengths are in metres, levels in dBm.

use std::{fmt, str::FromStr};

use log::debug;

use super::{Link, Model};
use crate::{
    control::{Control, ControlValue, MappedControl, StrictRange, Unchecked, ValueMap},
    error::{Error, Result},
    protocols::{Protocol, Tcp},
    scpi::{format::Arg, Command, Scpi},
    DefaultConfig,
};

/// Model marker for [`Link`] framing.
pub struct AQ6370D;

impl Model for AQ6370D {
    const DESCRIPTION: &'static str = "Yokogawa AQ6370D Optical Spectrum Analyzer";
    const TERMINATOR: &'static str = "\n";
    const END_BYTE: u8 = b'\n';
}

impl DefaultConfig for AQ6370D {
    type DefaultProtocol = Tcp;
}

/// Sentinel accepted by [`Analyzer::delete_trace`] to clear every trace.
pub const ALL_TRACES: &str = "ALL";

/// Trace memories of the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trace {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Trace {
    pub const ALL: [Trace; 7] = [
        Trace::A,
        Trace::B,
        Trace::C,
        Trace::D,
        Trace::E,
        Trace::F,
        Trace::G,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trace::A => "TRA",
            Trace::B => "TRB",
            Trace::C => "TRC",
            Trace::D => "TRD",
            Trace::E => "TRE",
            Trace::F => "TRF",
            Trace::G => "TRG",
        }
    }
}

impl AsRef<str> for Trace {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trace {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Trace::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidChoiceError {
                value: s.to_string(),
                allowed: Trace::ALL.iter().map(|t| t.to_string()).collect(),
            })
    }
}

impl ControlValue for Trace {
    const EXPECTED: &'static str = "trace identifier";
    fn from_response(response: &str) -> Result<Self> {
        response
            .parse()
            .map_err(|_| Error::parse(response.trim(), Self::EXPECTED))
    }
    fn to_arg(&self) -> Arg {
        Arg::Str(self.as_str().to_string())
    }
}

// Leveling

pub const REFERENCE_LEVEL: Control<f64, StrictRange<f64>> = Control::new(
    "reference_level",
    ":DISPlay:TRACe:Y1:SCALe:RLEVel?",
    ":DISPlay:TRACe:Y1:SCALe:RLEVel %g",
    StrictRange::new(-100.0, 20.0),
);

/// Position in divisions; the total is 8, 10 or 12 depending on the display setup.
pub const LEVEL_POSITION: Control<i64, StrictRange<i64>> = Control::new(
    "level_position",
    ":DISPlay:TRACe:Y1:RPOSition?",
    ":DISPlay:TRACe:Y1:RPOSition %g",
    StrictRange::new(0, 12),
);

// Sweep settings

pub const SWEEP_MODE: MappedControl<i64> = MappedControl::new(
    "sweep_mode",
    ":INITiate:SMODe?",
    ":INITiate:SMODe %s",
    ValueMap::new(&[("SINGLE", 1), ("REPEAT", 2), ("AUTO", 3), ("SEGMENT", 4)]),
);

// The instrument reads the speed back from the settings subsystem.
pub const SWEEP_SPEED: MappedControl<i64> = MappedControl::new(
    "sweep_speed",
    ":SENSe:SETTing:SPEed?",
    ":SENSe:SWEep:SPEed %d",
    ValueMap::new(&[("1x", 0), ("2x", 1)]),
);

/// Seconds between repeated sweeps.
pub const SWEEP_TIME_INTERVAL: Control<i64, StrictRange<i64>> = Control::new(
    "sweep_time_interval",
    ":SENSe:SWEep:TIME:INTerval?",
    ":SENSe:SWEep:TIME:INTerval %g",
    StrictRange::new(0, 99999),
);

// Wavelength settings

pub const WAVELENGTH_CENTER: Control<f64, StrictRange<f64>> = Control::new(
    "wavelength_center",
    ":SENSe:WAVelength:CENTer?",
    ":SENSe:WAVelength:CENTer %g",
    StrictRange::new(50e-9, 2250e-9),
);

pub const WAVELENGTH_SPAN: Control<f64, StrictRange<f64>> = Control::new(
    "wavelength_span",
    ":SENSe:WAVelength:SPAN?",
    ":SENSe:WAVelength:SPAN %g",
    StrictRange::new(0.0, 1100e-9),
);

pub const WAVELENGTH_START: Control<f64, StrictRange<f64>> = Control::new(
    "wavelength_start",
    ":SENSe:WAVelength:STARt?",
    ":SENSe:WAVelength:STARt %g",
    StrictRange::new(50e-9, 2250e-9),
);

pub const WAVELENGTH_STOP: Control<f64, StrictRange<f64>> = Control::new(
    "wavelength_stop",
    ":SENSe:WAVelength:STOP?",
    ":SENSe:WAVelength:STOP %g",
    StrictRange::new(50e-9, 2250e-9),
);

// Traces

pub const ACTIVE_TRACE: Control<Trace, Unchecked> = Control::new(
    "active_trace",
    ":TRACe:ACTive?",
    ":TRACe:ACTive %s",
    Unchecked,
);

// Resolution

/// The instrument only offers 0.02, 0.05, 0.1, 0.2, 0.5, 1 and 2 nm and picks the nearest.
pub const RESOLUTION_BANDWIDTH: Control<f64, StrictRange<f64>> = Control::new(
    "resolution_bandwidth",
    ":SENSe:BWIDth:RESolution?",
    ":SENSe:BWIDth:RESolution %g",
    StrictRange::new(0.02e-9, 2e-9),
);

/// Names of every control, as used by [`Analyzer::get_by_name`] and [`Analyzer::set_by_name`].
pub const CONTROL_NAMES: [&str; 11] = [
    "reference_level",
    "level_position",
    "sweep_mode",
    "sweep_speed",
    "sweep_time_interval",
    "wavelength_center",
    "wavelength_span",
    "wavelength_start",
    "wavelength_stop",
    "active_trace",
    "resolution_bandwidth",
];

/// AQ6370D driver over any connection.
///
/// The driver keeps no state of its own besides the connection, which it either owns or
/// borrows (`Analyzer<&mut C>`).
pub struct Analyzer<C: Scpi> {
    conn: C,
}

impl<IO: std::io::Read + std::io::Write> Analyzer<Link<IO, AQ6370D>> {
    pub fn from_io(io: IO) -> Self {
        Self::new(Link::new(io))
    }
}

impl Analyzer<Link<std::net::TcpStream, AQ6370D>> {
    /// Connect over the raw socket interface with default settings.
    pub fn connect_tcp(address: std::net::SocketAddr) -> Result<Self> {
        Ok(Self::from_io(Tcp::default().connect(address)?))
    }
}

impl<C: Scpi> Analyzer<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn connection(&mut self) -> &mut C {
        &mut self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }

    // Initiate and abort sweep

    /// Stop operations such as measurements and calibration.
    pub fn abort(&mut self) -> Result<()> {
        self.conn.write(":ABORt")
    }

    pub fn initiate(&mut self) -> Result<()> {
        self.conn.write(":INITiate:IMMediate")
    }

    /// Run one sweep in single mode and block until the instrument reports completion.
    /// How long this may take is bounded by the connection timeout.
    pub fn single_sweep(&mut self) -> Result<()> {
        self.set_sweep_mode("SINGLE")?;
        self.initiate()?;
        self.conn.complete()?;
        debug!("single sweep finished");
        Ok(())
    }

    // Leveling

    pub fn reference_level(&mut self) -> Result<f64> {
        REFERENCE_LEVEL.get(&mut self.conn)
    }
    pub fn set_reference_level(&mut self, dbm: f64) -> Result<()> {
        REFERENCE_LEVEL.set(&mut self.conn, dbm)
    }

    pub fn level_position(&mut self) -> Result<i64> {
        LEVEL_POSITION.get(&mut self.conn)
    }
    pub fn set_level_position(&mut self, divisions: i64) -> Result<()> {
        LEVEL_POSITION.set(&mut self.conn, divisions)
    }

    /// Set the reference level to the peak level.
    pub fn level_position_max(&mut self) -> Result<()> {
        self.conn.write(":CALCulate:MARKer:MAXimum:SRLevel")
    }

    // Sweep settings

    /// One of `SINGLE`, `REPEAT`, `AUTO`, `SEGMENT`.
    pub fn sweep_mode(&mut self) -> Result<&'static str> {
        SWEEP_MODE.get(&mut self.conn)
    }
    pub fn set_sweep_mode(&mut self, mode: &str) -> Result<()> {
        SWEEP_MODE.set(&mut self.conn, mode)
    }

    /// `1x`, or `2x` for double speed.
    pub fn sweep_speed(&mut self) -> Result<&'static str> {
        SWEEP_SPEED.get(&mut self.conn)
    }
    pub fn set_sweep_speed(&mut self, speed: &str) -> Result<()> {
        SWEEP_SPEED.set(&mut self.conn, speed)
    }

    pub fn sweep_time_interval(&mut self) -> Result<i64> {
        SWEEP_TIME_INTERVAL.get(&mut self.conn)
    }
    pub fn set_sweep_time_interval(&mut self, seconds: i64) -> Result<()> {
        SWEEP_TIME_INTERVAL.set(&mut self.conn, seconds)
    }

    // Wavelength settings

    pub fn wavelength_center(&mut self) -> Result<f64> {
        WAVELENGTH_CENTER.get(&mut self.conn)
    }
    pub fn set_wavelength_center(&mut self, metres: f64) -> Result<()> {
        WAVELENGTH_CENTER.set(&mut self.conn, metres)
    }

    pub fn wavelength_span(&mut self) -> Result<f64> {
        WAVELENGTH_SPAN.get(&mut self.conn)
    }
    pub fn set_wavelength_span(&mut self, metres: f64) -> Result<()> {
        WAVELENGTH_SPAN.set(&mut self.conn, metres)
    }

    pub fn wavelength_start(&mut self) -> Result<f64> {
        WAVELENGTH_START.get(&mut self.conn)
    }
    pub fn set_wavelength_start(&mut self, metres: f64) -> Result<()> {
        WAVELENGTH_START.set(&mut self.conn, metres)
    }

    pub fn wavelength_stop(&mut self) -> Result<f64> {
        WAVELENGTH_STOP.get(&mut self.conn)
    }
    pub fn set_wavelength_stop(&mut self, metres: f64) -> Result<()> {
        WAVELENGTH_STOP.set(&mut self.conn, metres)
    }

    // Trace operations

    pub fn active_trace(&mut self) -> Result<Trace> {
        ACTIVE_TRACE.get(&mut self.conn)
    }
    pub fn set_active_trace(&mut self, trace: Trace) -> Result<()> {
        ACTIVE_TRACE.set(&mut self.conn, trace)
    }

    /// Copy the data of `source` into `destination`. Identifiers are passed through as is.
    pub fn copy_trace<S: AsRef<str>, D: AsRef<str>>(
        &mut self,
        source: S,
        destination: D,
    ) -> Result<()> {
        let command = Command::new(":TRACe:COPY")
            .para(format!("{},{}", source.as_ref(), destination.as_ref()));
        self.conn.write(command.as_str())
    }

    /// Delete one trace, or every trace when given [`ALL_TRACES`].
    pub fn delete_trace<T: AsRef<str>>(&mut self, trace: T) -> Result<()> {
        let trace = trace.as_ref();
        if trace == ALL_TRACES {
            self.conn.write(":TRACe:DELete:ALL")
        } else {
            self.conn
                .write(Command::new(":TRACe:DELete").para(trace).as_str())
        }
    }

    /// Wavelength axis of `trace`, in metres.
    pub fn get_xdata<T: AsRef<str>>(&mut self, trace: T) -> Result<Vec<f64>> {
        self.conn
            .query_values(Command::new(":TRACe:X").query().para(trace).as_str())
    }

    /// Level axis of `trace`, in dBm.
    pub fn get_ydata<T: AsRef<str>>(&mut self, trace: T) -> Result<Vec<f64>> {
        self.conn
            .query_values(Command::new(":TRACe:Y").query().para(trace).as_str())
    }

    /// Both axes of `trace` as `(wavelength, level)` points.
    pub fn get_trace<T: AsRef<str>>(&mut self, trace: T) -> Result<Vec<(f64, f64)>> {
        let trace = trace.as_ref();
        let x = self.get_xdata(trace)?;
        let y = self.get_ydata(trace)?;
        if x.len() != y.len() {
            return Err(Error::ParseError {
                response: format!("{} x values, {} y values for {}", x.len(), y.len(), trace),
                expected: "axes of equal length",
            });
        }
        Ok(x.into_iter().zip(y).collect())
    }

    // Resolution

    pub fn resolution_bandwidth(&mut self) -> Result<f64> {
        RESOLUTION_BANDWIDTH.get(&mut self.conn)
    }
    pub fn set_resolution_bandwidth(&mut self, metres: f64) -> Result<()> {
        RESOLUTION_BANDWIDTH.set(&mut self.conn, metres)
    }

    /// Read a control by name, rendered as text.
    pub fn get_by_name(&mut self, name: &str) -> Result<String> {
        let c = &mut self.conn;
        Ok(match name {
            "reference_level" => REFERENCE_LEVEL.get(c)?.to_arg().to_string(),
            "level_position" => LEVEL_POSITION.get(c)?.to_string(),
            "sweep_mode" => SWEEP_MODE.get(c)?.to_string(),
            "sweep_speed" => SWEEP_SPEED.get(c)?.to_string(),
            "sweep_time_interval" => SWEEP_TIME_INTERVAL.get(c)?.to_string(),
            "wavelength_center" => WAVELENGTH_CENTER.get(c)?.to_arg().to_string(),
            "wavelength_span" => WAVELENGTH_SPAN.get(c)?.to_arg().to_string(),
            "wavelength_start" => WAVELENGTH_START.get(c)?.to_arg().to_string(),
            "wavelength_stop" => WAVELENGTH_STOP.get(c)?.to_arg().to_string(),
            "active_trace" => ACTIVE_TRACE.get(c)?.to_string(),
            "resolution_bandwidth" => RESOLUTION_BANDWIDTH.get(c)?.to_arg().to_string(),
            other => return Err(unknown_control(other)),
        })
    }

    /// Parse `value` for the named control and set it.
    pub fn set_by_name(&mut self, name: &str, value: &str) -> Result<()> {
        let c = &mut self.conn;
        match name {
            "reference_level" => REFERENCE_LEVEL.set(c, f64::from_response(value)?),
            "level_position" => LEVEL_POSITION.set(c, i64::from_response(value)?),
            "sweep_mode" => SWEEP_MODE.set(c, value.trim()),
            "sweep_speed" => SWEEP_SPEED.set(c, value.trim()),
            "sweep_time_interval" => SWEEP_TIME_INTERVAL.set(c, i64::from_response(value)?),
            "wavelength_center" => WAVELENGTH_CENTER.set(c, f64::from_response(value)?),
            "wavelength_span" => WAVELENGTH_SPAN.set(c, f64::from_response(value)?),
            "wavelength_start" => WAVELENGTH_START.set(c, f64::from_response(value)?),
            "wavelength_stop" => WAVELENGTH_STOP.set(c, f64::from_response(value)?),
            "active_trace" => ACTIVE_TRACE.set(c, value.parse()?),
            "resolution_bandwidth" => RESOLUTION_BANDWIDTH.set(c, f64::from_response(value)?),
            other => Err(unknown_control(other)),
        }
    }
}

fn unknown_control(name: &str) -> Error {
    Error::InvalidChoiceError {
        value: name.to_string(),
        allowed: CONTROL_NAMES.iter().map(|n| n.to_string()).collect(),
    }
}

/// Base SCPI commands (`*IDN?`, `*RST`, error queue, ...) go straight to the connection.
impl<C: Scpi> Scpi for Analyzer<C> {
    fn write(&mut self, command: &str) -> Result<()> {
        self.conn.write(command)
    }
    fn read(&mut self) -> Result<String> {
        self.conn.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::Loopback;

    #[test]
    fn trace_identifiers() {
        assert_eq!("trc".parse::<Trace>().unwrap(), Trace::C);
        assert_eq!(Trace::G.to_string(), "TRG");
        assert!(matches!(
            "TRZ".parse::<Trace>(),
            Err(Error::InvalidChoiceError { .. })
        ));
        assert!(matches!(
            Trace::from_response("XYZ"),
            Err(Error::ParseError { .. })
        ));
    }

    #[test]
    fn controls_by_name() {
        let mut osa = Analyzer::new(Loopback::with_responses(["+1.55000000E-006", "3"]));
        assert_eq!(osa.get_by_name("wavelength_center").unwrap(), "1.55e-06");
        assert_eq!(osa.get_by_name("sweep_mode").unwrap(), "AUTO");
        osa.set_by_name("sweep_speed", "2x").unwrap();
        osa.set_by_name("active_trace", "trb").unwrap();
        osa.set_by_name("level_position", "10").unwrap();
        assert!(osa.set_by_name("wavelength_span", "wide").is_err());
        assert!(osa.set_by_name("zoom", "1").is_err());
        assert!(osa.get_by_name("zoom").is_err());
        assert_eq!(
            osa.into_inner().written(),
            [
                ":SENSe:WAVelength:CENTer?",
                ":INITiate:SMODe?",
                ":SENSe:SWEep:SPEed 1",
                ":TRACe:ACTive TRB",
                ":DISPlay:TRACe:Y1:RPOSition 10",
            ]
        );
    }

    #[test]
    fn every_named_control_is_reachable() {
        for name in CONTROL_NAMES {
            let mut osa = Analyzer::new(Loopback::new());
            let err = osa.get_by_name(name).unwrap_err();
            assert!(matches!(err, Error::IOError(_)), "{}: {:?}", name, err);
        }
    }
}
