use crate::math::C;
use crate::numeral::{DigitString, NumeralError, convert_to_digits, evaluate};
use tracing::debug;

/// Immutable inputs of one series computation.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesConfig {
    pub symbols: Vec<C>,
    pub radix: C,
    pub count: usize,
}

impl SeriesConfig {
    pub fn new(symbols: Vec<C>, radix: C, count: usize) -> Self {
        SeriesConfig { symbols, radix, count }
    }

    pub fn level(&self) -> usize {
        self.symbols.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesEntry {
    pub index: u64,
    pub digits: DigitString,
    pub point: C,
    pub weight: f64,
}

impl SeriesEntry {
    pub fn length(&self) -> usize {
        self.digits.len()
    }
}

/// Axis-aligned box around the finite points of a series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: C,
    pub max: C,
}

/// Points in integer order; consecutive entries are consecutive integers,
/// not spatial neighbours.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSeries {
    entries: Vec<SeriesEntry>,
    max_length: usize,
}

impl PointSeries {
    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn points(&self) -> Vec<C> {
        self.entries.iter().map(|e| e.point).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.weight).collect()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.entries
            .iter()
            .map(|e| e.point)
            .filter(|p| p.re.is_finite() && p.im.is_finite())
            .fold(None, |acc, p| {
                Some(match acc {
                    None => Bounds { min: p, max: p },
                    Some(b) => Bounds {
                        min: C::new(b.min.re.min(p.re), b.min.im.min(p.im)),
                        max: C::new(b.max.re.max(p.re), b.max.im.max(p.im)),
                    },
                })
            })
    }
}

impl<'a> IntoIterator for &'a PointSeries {
    type Item = &'a SeriesEntry;
    type IntoIter = std::slice::Iter<'a, SeriesEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

pub fn build_series(config: &SeriesConfig) -> Result<PointSeries, NumeralError> {
    build_series_from(&config.symbols, config.radix, config.count)
}

/// Evaluates every integer in `[0, count)` with base `|symbols|` and weights
/// each point by its digit count relative to the longest one.
pub fn build_series_from(
    symbols: &[C],
    radix: C,
    count: usize,
) -> Result<PointSeries, NumeralError> {
    let level = symbols.len();
    if level < 2 {
        return Err(NumeralError::InvalidArgument(format!(
            "a series needs at least 2 symbols, got {level}"
        )));
    }
    if count < 1 {
        return Err(NumeralError::InvalidArgument(
            "a series needs at least one point".to_string(),
        ));
    }

    let mut entries = Vec::with_capacity(count);
    for i in 0..count as u64 {
        let digits = convert_to_digits(i, level)?;
        let point = evaluate(&digits, radix, symbols)?;
        entries.push(SeriesEntry { index: i, digits, point, weight: 0.0 });
    }

    let max_length = entries.iter().map(SeriesEntry::length).max().unwrap_or(1);
    for entry in &mut entries {
        entry.weight = entry.length() as f64 / max_length as f64;
    }

    debug!(level, count, max_length, radix = %radix, "built point series");
    Ok(PointSeries { entries, max_length })
}
