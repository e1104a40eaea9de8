use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type C = Complex64;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseComplexError {
    #[error("empty complex literal")]
    Empty,
    #[error("malformed complex literal '{text}'")]
    Invalid { text: String },
    #[error("symbol #{index}: {source}")]
    Symbol {
        index: usize,
        #[source]
        source: Box<ParseComplexError>,
    },
}

/// Radix given as absolute value and angle in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polar {
    pub abs: f64,
    pub angle_degrees: f64,
}

impl Polar {
    pub fn new(abs: f64, angle_degrees: f64) -> Self {
        Polar { abs, angle_degrees }
    }

    pub fn to_c(self) -> C {
        from_polar_degrees(self.abs, self.angle_degrees)
    }
}

pub fn from_polar_degrees(abs: f64, degrees: f64) -> C {
    C::from_polar(abs, degrees.to_radians())
}

pub fn to_polar_degrees(c: C) -> Polar {
    let (abs, arg) = c.to_polar();
    Polar::new(abs, arg.to_degrees())
}

/// Parses a complex literal such as `2`, `-j`, `1+j`, `(0.5-1e-3J)`.
///
/// Surrounding whitespace and one pair of parentheses are allowed; whitespace
/// between the real and imaginary parts is not.
pub fn parse_complex(text: &str) -> Result<C, ParseComplexError> {
    let mut s = text.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        s = inner.trim();
    }
    if s.is_empty() {
        return Err(ParseComplexError::Empty);
    }

    let invalid = || ParseComplexError::Invalid { text: text.trim().to_string() };

    let Some(body) = s.strip_suffix('j').or_else(|| s.strip_suffix('J')) else {
        return parse_component(s).map(|re| C::new(re, 0.0)).ok_or_else(invalid);
    };

    match split_point(body) {
        Some(at) => {
            let re = parse_component(&body[..at]).ok_or_else(invalid)?;
            let im = parse_coefficient(&body[at..]).ok_or_else(invalid)?;
            Ok(C::new(re, im))
        }
        None => {
            let im = parse_coefficient(body).ok_or_else(invalid)?;
            Ok(C::new(0.0, im))
        }
    }
}

/// Parses a comma separated list of complex literals.
pub fn parse_symbols(text: &str) -> Result<Vec<C>, ParseComplexError> {
    text.split(',')
        .enumerate()
        .map(|(index, item)| {
            parse_complex(item).map_err(|source| ParseComplexError::Symbol {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

// Position of the sign separating the real and imaginary parts, skipping
// exponent signs like the one in `1e-3`.
fn split_point(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'))
}

fn parse_coefficient(s: &str) -> Option<f64> {
    match s {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => parse_component(s),
    }
}

fn parse_component(s: &str) -> Option<f64> {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return None;
    }
    s.parse::<f64>().ok()
}
