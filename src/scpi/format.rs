//! printf-style rendering of command templates such as `:SENSe:WAVelength:CENTer %g`.
//!
//! Only the conversions the instrument command tables use are supported: `%g`, `%d`, `%s`
//! and the `%%` escape. The output follows C `printf`, which is what the device firmware
//! documentation assumes.

use std::fmt::{self, Display};

use crate::error::{Error, Result};

/// Significant digits of `%g` without an explicit precision.
const G_PRECISION: i32 = 6;

/// A value to be placed into the single slot of a command template.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Float(f64),
    Int(i64),
    Str(String),
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}
impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}
impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Str(v.to_string())
    }
}
impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Str(v)
    }
}

impl Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Float(v) => f.write_str(&format_g(*v)),
            Arg::Int(v) => write!(f, "{}", v),
            Arg::Str(s) => f.write_str(s),
        }
    }
}

impl Arg {
    fn to_g(&self) -> Result<String> {
        match self {
            Arg::Float(v) => Ok(format_g(*v)),
            Arg::Int(v) => Ok(format_g(*v as f64)),
            Arg::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(format_g)
                .map_err(|_| Error::TemplateError(format!("%g given non-numeric '{}'", s))),
        }
    }

    fn to_d(&self) -> Result<String> {
        match self {
            Arg::Float(v) if v.is_finite() => Ok(format!("{}", v.trunc() as i64)),
            Arg::Float(v) => Err(Error::TemplateError(format!("%d given {}", v))),
            Arg::Int(v) => Ok(v.to_string()),
            Arg::Str(s) => s
                .trim()
                .parse::<i64>()
                .map(|v| v.to_string())
                .map_err(|_| Error::TemplateError(format!("%d given non-integer '{}'", s))),
        }
    }
}

/// Render `template` with `arg` in its only conversion slot.
pub fn format_command(template: &str, arg: &Arg) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut slots = 0;
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let rendered = match chars.next() {
            Some('%') => {
                out.push('%');
                continue;
            }
            Some('g') => arg.to_g()?,
            Some('d') => arg.to_d()?,
            Some('s') => arg.to_string(),
            _ => return Err(Error::TemplateError(template.to_string())),
        };
        slots += 1;
        out.push_str(&rendered);
    }
    if slots != 1 {
        return Err(Error::TemplateError(template.to_string()));
    }
    Ok(out)
}

/// C `%g`: six significant digits, exponent form outside `1e-4 <= |v| < 1e6`,
/// trailing zeros dropped.
pub fn format_g(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    // The exponent is taken after rounding to the target precision, so 999999.5 goes to 1e+06.
    let sci = format!("{:.*e}", (G_PRECISION - 1) as usize, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if exp < -4 || exp >= G_PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(mantissa), sign, exp.abs())
    } else {
        let fixed = format!("{:.*}", (G_PRECISION - 1 - exp) as usize, v);
        strip_zeros(&fixed).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
