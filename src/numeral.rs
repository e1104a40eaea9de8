use crate::math::C;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumeralError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("digit {digit} has no symbol (symbol table holds {symbols})")]
    IndexError { digit: usize, symbols: usize },
}

/// Canonical base-`level` digits of a non-negative integer, most significant first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DigitString {
    digits: Vec<usize>,
}

impl DigitString {
    pub fn new(digits: Vec<usize>) -> Self {
        DigitString { digits }
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    /// Digits from least to most significant.
    pub fn lsb_first(&self) -> impl Iterator<Item = usize> + '_ {
        self.digits.iter().rev().copied()
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &d in &self.digits {
            match char::from_digit(d as u32, 36) {
                Some(ch) if d < 36 => write!(f, "{ch}")?,
                _ => write!(f, "[{d}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for DigitString {
    type Err = NumeralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |what: &str| {
            NumeralError::InvalidArgument(format!("malformed digit string '{s}': {what}"))
        };
        let mut digits = Vec::with_capacity(s.len());
        let mut chars = s.chars();

        while let Some(ch) = chars.next() {
            if ch == '[' {
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    return Err(bad("unclosed bracket"));
                }
                let d = inner.parse::<usize>().map_err(|_| bad("bad bracketed digit"))?;
                digits.push(d);
            } else {
                let d = ch.to_digit(36).ok_or_else(|| bad("unexpected character"))?;
                digits.push(d as usize);
            }
        }

        if digits.is_empty() {
            return Err(bad("no digits"));
        }
        Ok(DigitString::new(digits))
    }
}

/// `0` followed by `n` samples of the unit circle at angles `2πk/n`, `k = 1..=n`.
///
/// The `k = n` sample sits at `2π`, i.e. on `1`; no sample is taken at `k = 0`.
pub fn generate_symbols(n: usize) -> Result<Vec<C>, NumeralError> {
    if n < 1 {
        return Err(NumeralError::InvalidArgument(
            "roots of unity need n >= 1".to_string(),
        ));
    }

    let mut symbols = Vec::with_capacity(n + 1);
    symbols.push(C::new(0.0, 0.0));
    for k in 1..=n {
        let angle = 2.0 * PI * k as f64 / n as f64;
        symbols.push(C::from_polar(1.0, angle));
    }
    Ok(symbols)
}

pub fn convert_to_digits(num: u64, level: usize) -> Result<DigitString, NumeralError> {
    if level < 2 {
        return Err(NumeralError::InvalidArgument(format!(
            "digit conversion needs a base >= 2, got {level}"
        )));
    }
    if num == 0 {
        return Ok(DigitString::new(vec![0]));
    }

    let base = level as u64;
    let mut rest = num;
    let mut digits = Vec::new();
    while rest > 0 {
        digits.push((rest % base) as usize);
        rest /= base;
    }
    digits.reverse();
    Ok(DigitString::new(digits))
}

/// Evaluates `Σ S[d_k] · radix^k` with `d_0` the rightmost digit.
pub fn evaluate(digits: &DigitString, radix: C, symbols: &[C]) -> Result<C, NumeralError> {
    if let Some(&digit) = digits.digits().iter().find(|&&d| d >= symbols.len()) {
        return Err(NumeralError::IndexError { digit, symbols: symbols.len() });
    }

    let mut value = C::new(0.0, 0.0);
    let mut power = C::new(1.0, 0.0);
    for (k, d) in digits.lsb_first().enumerate() {
        if k > 0 {
            power *= radix;
        }
        value += symbols[d] * power;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reals(values: &[f64]) -> Vec<C> {
        values.iter().map(|&v| C::new(v, 0.0)).collect()
    }

    #[test]
    fn five_in_binary() {
        let digits = convert_to_digits(5, 2).unwrap();
        assert_eq!(digits.to_string(), "101");
        let value = evaluate(&digits, C::new(2.0, 0.0), &reals(&[0.0, 1.0])).unwrap();
        assert_eq!(value, C::new(5.0, 0.0));
    }

    #[test]
    fn zero_is_a_single_digit() {
        for level in 2..40 {
            assert_eq!(convert_to_digits(0, level).unwrap().digits(), &[0]);
        }
    }

    #[test]
    fn base_below_two_is_rejected() {
        for level in [0, 1] {
            assert!(matches!(
                convert_to_digits(7, level),
                Err(NumeralError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn single_root_of_unity_lands_on_one() {
        let symbols = generate_symbols(1).unwrap();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0], C::new(0.0, 0.0));
        assert!((symbols[1] - C::new(1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn roots_of_unity_sit_on_the_circle() {
        let symbols = generate_symbols(4).unwrap();
        assert_eq!(symbols.len(), 5);
        let expected = [C::new(0.0, 1.0), C::new(-1.0, 0.0), C::new(0.0, -1.0), C::new(1.0, 0.0)];
        for (got, want) in symbols[1..].iter().zip(expected) {
            assert!((got - want).norm() < 1e-12, "{got} != {want}");
        }
        assert!(matches!(generate_symbols(0), Err(NumeralError::InvalidArgument(_))));
    }

    #[test]
    fn missing_symbol_is_an_index_error() {
        let digits = convert_to_digits(5, 3).unwrap();
        assert_eq!(digits.to_string(), "12");
        let err = evaluate(&digits, C::new(3.0, 0.0), &reals(&[0.0, 1.0])).unwrap_err();
        assert_eq!(err, NumeralError::IndexError { digit: 2, symbols: 2 });
    }

    #[test]
    fn zero_radix_keeps_the_constant_term() {
        let digits: DigitString = "111".parse().unwrap();
        let value = evaluate(&digits, C::new(0.0, 0.0), &reals(&[0.0, 3.0])).unwrap();
        assert_eq!(value, C::new(3.0, 0.0));
    }

    #[test]
    fn twindragon_radix() {
        // 110 in base -1+i is (-1+i)^2 + (-1+i) = -2i - 1 + i
        let digits: DigitString = "110".parse().unwrap();
        let value = evaluate(&digits, C::new(-1.0, 1.0), &reals(&[0.0, 1.0])).unwrap();
        assert_eq!(value, C::new(-1.0, -1.0));
    }

    #[test]
    fn digit_text_beyond_ten() {
        let digits = convert_to_digits(35 * 36 + 10, 36).unwrap();
        assert_eq!(digits.to_string(), "za");
        assert_eq!("za".parse::<DigitString>().unwrap(), digits);

        let wide = convert_to_digits(40 * 50 + 7, 50).unwrap();
        assert_eq!(wide.to_string(), "[40]7");
        assert_eq!("[40]7".parse::<DigitString>().unwrap(), wide);

        assert!("".parse::<DigitString>().is_err());
        assert!("1?".parse::<DigitString>().is_err());
        assert!(matches!("[12".parse::<DigitString>(), Err(NumeralError::InvalidArgument(_))));
        assert!("1[40".parse::<DigitString>().is_err());
        assert!("[]".parse::<DigitString>().is_err());
    }
}
