use const_format::formatcp;
use std::fmt;

use crate::{
    config::{AccelerationFactor, Settings},
    error::MouseFixError,
};

pub const PROGRAM_NAME: &str = "MouseFix";
const FALLBACK_PROGRAM: &str = "mousefix";
const SYNOPSIS_HEADER: &str = formatcp!("{}: Fix the mouse movement of macOS", PROGRAM_NAME);

/// Command line of a run: `mousefix [accel]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramArgs {
    /// Name the program was invoked as, used in the usage text.
    program: String,
    /// Acceleration factor as given on the command line. `None` if no argument was given.
    acceleration: Option<f64>,
}

impl fmt::Display for ProgramArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.acceleration {
            Some(accel) => write!(f, "Acceleration factor: {}", accel),
            None => write!(f, "Acceleration factor: (default)"),
        }
    }
}

impl ProgramArgs {
    /// Read the arguments of the current process.
    /// Arguments that are not valid UTF-8 are converted lossily.
    pub fn get() -> Self {
        Self::from_args(std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()))
    }

    /// Only the first argument after the program name is used, the rest is ignored.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut args = args.into_iter();
        let program = args
            .next()
            .unwrap_or_else(|| String::from(FALLBACK_PROGRAM));
        let acceleration = args.next().map(|arg| {
            // The factor is kept in single precision by the driver interface.
            #[allow(clippy::cast_possible_truncation)]
            let accel = f64::from(parse_leading_float(&arg) as f32);
            log::debug!("Parsed acceleration argument '{}' as {}", arg, accel);
            accel
        });

        Self {
            program,
            acceleration,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn acceleration(&self) -> Option<f64> {
        self.acceleration
    }

    /// Compiled-in settings with the acceleration factor from the command line.
    pub fn settings(&self) -> Result<Settings, MouseFixError> {
        let settings = Settings::compiled();
        match self.acceleration {
            Some(accel) => Ok(settings.with_acceleration(AccelerationFactor::new(accel)?)),
            None => Ok(settings),
        }
    }

    /// Help text shown when the acceleration factor is not usable.
    pub fn usage(&self) -> String {
        let table_state = if cfg!(feature = "scaling-table") {
            "This build uses a mouse scaling table, resulting in a non-linear\n\
            mouse/cursor relationship. To stop using the table, rebuild without\n\
            the `scaling-table` feature."
        } else {
            "This build does not use a mouse scaling table. To use one, adjust the\n\
            table in the code and rebuild with the `scaling-table` feature."
        };

        format!(
            "\n{}\n\
            Synopsis: {} {{accel}}\n\n\
            Where:\n\
            accel - This is optional and if specified must be a positive\n        \
                    floating point mouse acceleration factor. The default\n        \
                    value is {}\n\n        \
                    NOTE: Although this is called an 'acceleration' factor,\n        \
                    ----  if the scaling table is disabled it acts as a simple\n              \
                          scaling factor, resulting in a scaled linear mouse/cursor\n              \
                          relationship.\n\n\
            {}\n",
            SYNOPSIS_HEADER,
            self.program,
            AccelerationFactor::default(),
            table_state,
        )
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn hex_digit(byte: Option<&u8>) -> Option<u32> {
    byte.and_then(|b| char::from(*b).to_digit(16))
}

/// Parse an unsigned hexadecimal float (`0x1.8p3`).
/// `None` if `bytes` does not start with `0x` followed by at least one hex digit.
fn parse_hex_float(bytes: &[u8]) -> Option<f64> {
    let rest = bytes
        .strip_prefix(b"0x")
        .or_else(|| bytes.strip_prefix(b"0X"))?;

    let mut mantissa = 0.0_f64;
    let mut exponent = 0_i32;
    let mut seen = false;
    let mut end = 0;
    while let Some(d) = hex_digit(rest.get(end)) {
        mantissa = mantissa * 16.0 + f64::from(d);
        seen = true;
        end += 1;
    }
    if rest.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while let Some(d) = hex_digit(rest.get(frac_end)) {
            mantissa = mantissa * 16.0 + f64::from(d);
            exponent = exponent.saturating_sub(4);
            seen = true;
            frac_end += 1;
        }
        if seen {
            end = frac_end;
        }
    }
    if !seen {
        return None;
    }
    if mantissa == 0.0 {
        return Some(0.0);
    }

    // Binary exponent, written in decimal.
    if matches!(rest.get(end), Some(b'p' | b'P')) {
        let mut exp_start = end + 1;
        let negative = rest.get(exp_start) == Some(&b'-');
        if matches!(rest.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_digits = count_digits(&rest[exp_start..]);
        if exp_digits > 0 {
            let exp = std::str::from_utf8(&rest[exp_start..exp_start + exp_digits])
                .ok()
                .and_then(|e| e.parse::<i32>().ok())
                .unwrap_or(i32::MAX);
            exponent = exponent.saturating_add(if negative { -exp } else { exp });
        }
    }

    Some(mantissa * 2.0_f64.powi(exponent))
}

/// Parse the longest numeric prefix of `s` like C's `atof`.
///
/// Leading whitespace is skipped. Decimal and `0x` hexadecimal floats are understood,
/// `inf` and `nan` are not. A string that does not start with a number gives 0.
pub fn parse_leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if let Some(value) = parse_hex_float(&bytes[end..]) {
        return if bytes.first() == Some(&b'-') {
            -value
        } else {
            value
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}
