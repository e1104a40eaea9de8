use crate::math::{C, ParseComplexError, Polar, parse_complex, parse_symbols, to_polar_degrees};
use crate::numeral::{NumeralError, generate_symbols};
use crate::series::{PointSeries, SeriesConfig, build_series};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

pub const POINTS_RANGE: RangeInclusive<usize> = 16..=32768;
pub const FIELD_RANGE: RangeInclusive<u32> = 50..=500;
pub const ANGLE_RANGE: RangeInclusive<i32> = 0..=360;

pub const DEFAULT_SYMBOLS: &str = "0, 1";
pub const DEFAULT_RADIX: &str = "1+j";
pub const DEFAULT_POINTS: usize = 512;
pub const DEFAULT_FIELD: u32 = 100;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseComplexError),
    #[error(transparent)]
    Numeral(#[from] NumeralError),
    #[error("{control} must be within {min}..={max}, got {value}")]
    OutOfRange {
        control: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{control} must be finite")]
    NonFinite { control: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Session(#[from] SessionError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SymbolSource {
    Manual { text: String, symbols: Vec<C> },
    RootsOfUnity { n: usize, symbols: Vec<C> },
}

impl SymbolSource {
    pub fn symbols(&self) -> &[C] {
        match self {
            SymbolSource::Manual { symbols, .. }
            | SymbolSource::RootsOfUnity { symbols, .. } => symbols,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadixMode {
    Manual,
    Polar,
}

/// Symbol input as written in a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolSpec {
    Manual(String),
    Roots(usize),
}

/// Radix input as written in a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadixSpec {
    Manual(String),
    Polar { abs: f64, angle_degrees: i32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub symbols: SymbolSpec,
    pub radix: RadixSpec,
    pub points: usize,
    pub field_size: u32,
    pub draw_lines: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            symbols: SymbolSpec::Manual(DEFAULT_SYMBOLS.to_string()),
            radix: RadixSpec::Manual(DEFAULT_RADIX.to_string()),
            points: DEFAULT_POINTS,
            field_size: DEFAULT_FIELD,
            draw_lines: false,
        }
    }
}

impl SessionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        info!(path = %path.display(), "loaded navigator config");
        Ok(config)
    }
}

/// The navigator's controls. Every setter validates before it mutates, so a
/// rejected edit leaves the previous configuration in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    symbols: SymbolSource,
    radix_mode: RadixMode,
    radix_text: String,
    manual_radix: C,
    polar: Polar,
    points: usize,
    field_size: u32,
    draw_lines: bool,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            symbols: SymbolSource::Manual {
                text: DEFAULT_SYMBOLS.to_string(),
                symbols: vec![C::new(0.0, 0.0), C::new(1.0, 0.0)],
            },
            radix_mode: RadixMode::Manual,
            radix_text: DEFAULT_RADIX.to_string(),
            manual_radix: C::new(1.0, 1.0),
            polar: Polar::new(2.0, 90.0),
            points: DEFAULT_POINTS,
            field_size: DEFAULT_FIELD,
            draw_lines: false,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        let mut session = Session::default();
        match &config.symbols {
            SymbolSpec::Manual(text) => session.set_symbols_text(text)?,
            SymbolSpec::Roots(n) => session.set_roots_of_unity(*n)?,
        }
        match &config.radix {
            RadixSpec::Manual(text) => session.set_radix_text(text)?,
            RadixSpec::Polar { abs, angle_degrees } => {
                session.set_radix_polar(*abs, *angle_degrees)?
            }
        }
        session.set_points(config.points)?;
        session.set_field_size(config.field_size)?;
        session.set_draw_lines(config.draw_lines);
        Ok(session)
    }

    pub fn symbol_source(&self) -> &SymbolSource {
        &self.symbols
    }

    pub fn symbols(&self) -> &[C] {
        self.symbols.symbols()
    }

    pub fn radix_mode(&self) -> RadixMode {
        self.radix_mode
    }

    pub fn radix_text(&self) -> &str {
        &self.radix_text
    }

    pub fn polar(&self) -> Polar {
        self.polar
    }

    pub fn radix(&self) -> C {
        match self.radix_mode {
            RadixMode::Manual => self.manual_radix,
            RadixMode::Polar => self.polar.to_c(),
        }
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn field_size(&self) -> u32 {
        self.field_size
    }

    pub fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    pub fn set_symbols_text(&mut self, text: &str) -> Result<(), SessionError> {
        let symbols = parse_symbols(text)
            .inspect_err(|e| warn!(input = text, error = %e, "rejected symbols"))?;
        self.symbols = SymbolSource::Manual { text: text.trim().to_string(), symbols };
        Ok(())
    }

    pub fn set_roots_of_unity(&mut self, n: usize) -> Result<(), SessionError> {
        let symbols = generate_symbols(n)
            .inspect_err(|e| warn!(n, error = %e, "rejected roots of unity"))?;
        self.symbols = SymbolSource::RootsOfUnity { n, symbols };
        Ok(())
    }

    /// Switches to manual radix entry and keeps the polar controls in step.
    pub fn set_radix_text(&mut self, text: &str) -> Result<(), SessionError> {
        let radix = parse_complex(text)
            .inspect_err(|e| warn!(input = text, error = %e, "rejected radix"))?;
        if !(radix.re.is_finite() && radix.im.is_finite()) {
            warn!(input = text, "rejected non-finite radix");
            return Err(SessionError::NonFinite { control: "radix" });
        }

        let polar = to_polar_degrees(radix);
        let mut angle = polar.angle_degrees;
        if angle < 0.0 {
            angle += 360.0;
        }
        let angle = angle.trunc().clamp(0.0, 360.0);

        self.radix_mode = RadixMode::Manual;
        self.radix_text = text.trim().to_string();
        self.manual_radix = radix;
        self.polar = Polar::new(polar.abs, angle);
        Ok(())
    }

    pub fn set_radix_polar(&mut self, abs: f64, angle_degrees: i32) -> Result<(), SessionError> {
        if !abs.is_finite() {
            warn!(abs, "rejected radix absolute value");
            return Err(SessionError::NonFinite { control: "radix absolute value" });
        }
        let (min, max) = (*ANGLE_RANGE.start() as i64, *ANGLE_RANGE.end() as i64);
        check_range("radix angle", angle_degrees as i64, min, max)?;
        self.radix_mode = RadixMode::Polar;
        self.polar = Polar::new(abs, angle_degrees as f64);
        Ok(())
    }

    pub fn set_radix_mode(&mut self, mode: RadixMode) {
        self.radix_mode = mode;
    }

    pub fn set_points(&mut self, points: usize) -> Result<(), SessionError> {
        let (min, max) = (*POINTS_RANGE.start() as i64, *POINTS_RANGE.end() as i64);
        check_range("number of points", points as i64, min, max)?;
        self.points = points;
        Ok(())
    }

    pub fn set_field_size(&mut self, field_size: u32) -> Result<(), SessionError> {
        let (min, max) = (*FIELD_RANGE.start() as i64, *FIELD_RANGE.end() as i64);
        check_range("field size", field_size as i64, min, max)?;
        self.field_size = field_size;
        Ok(())
    }

    pub fn set_draw_lines(&mut self, draw_lines: bool) {
        self.draw_lines = draw_lines;
    }

    pub fn config(&self) -> SeriesConfig {
        SeriesConfig::new(self.symbols().to_vec(), self.radix(), self.points)
    }

    pub fn series(&self) -> Result<PointSeries, SessionError> {
        Ok(build_series(&self.config())?)
    }
}

fn check_range(control: &'static str, value: i64, min: i64, max: i64) -> Result<(), SessionError> {
    if value < min || value > max {
        warn!(control, value, "rejected out of range value");
        return Err(SessionError::OutOfRange { control, value, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_navigator() {
        let session = Session::new();
        assert_eq!(session.symbols(), &[C::new(0.0, 0.0), C::new(1.0, 0.0)]);
        assert_eq!(session.radix(), C::new(1.0, 1.0));
        assert_eq!(session.points(), 512);
        assert_eq!(session.field_size(), 100);
        assert!(!session.draw_lines());
        assert_eq!(session.polar(), Polar::new(2.0, 90.0));
    }

    #[test]
    fn bad_radix_keeps_previous_state() {
        let mut session = Session::new();
        session.set_radix_text("-1+j").unwrap();
        let before = session.clone();

        assert!(session.set_radix_text("1 + j").is_err());
        assert!(session.set_radix_text("").is_err());
        assert_eq!(session, before);
        assert_eq!(session.radix(), C::new(-1.0, 1.0));
    }

    #[test]
    fn bad_symbols_keep_previous_state() {
        let mut session = Session::new();
        session.set_symbols_text("0, 1, j").unwrap();
        let before = session.config();

        assert!(session.set_symbols_text("0, 1, oops").is_err());
        assert!(session.set_roots_of_unity(0).is_err());
        assert_eq!(session.config(), before);
    }

    #[test]
    fn out_of_range_controls_are_rejected() {
        let mut session = Session::new();
        assert!(matches!(
            session.set_points(8),
            Err(SessionError::OutOfRange { min: 16, max: 32768, .. })
        ));
        assert!(session.set_points(40_000).is_err());
        assert!(session.set_field_size(10).is_err());
        assert!(session.set_radix_polar(2.0, 400).is_err());
        assert!(session.set_radix_polar(f64::INFINITY, 10).is_err());
        assert_eq!(session, Session::new());
    }

    #[test]
    fn manual_radix_updates_polar_controls() {
        let mut session = Session::new();
        session.set_radix_text("0-2j").unwrap();
        let polar = session.polar();
        assert!((polar.abs - 2.0).abs() < 1e-12);
        assert_eq!(polar.angle_degrees, 270.0);

        session.set_radix_mode(RadixMode::Polar);
        assert!((session.radix() - C::new(0.0, -2.0)).norm() < 1e-12);
    }

    #[test]
    fn synced_angle_truncates_to_whole_degrees() {
        let mut session = Session::new();
        let radix = crate::math::from_polar_degrees(1.0, 44.9);
        session.set_radix_text(&format!("{}{:+}j", radix.re, radix.im)).unwrap();
        assert_eq!(session.polar().angle_degrees, 44.0);
    }

    #[test]
    fn non_finite_radix_is_rejected_on_both_paths() {
        let mut session = Session::new();
        for text in ["nan", "inf", "1+infj", "-nanj"] {
            assert!(matches!(
                session.set_radix_text(text),
                Err(SessionError::NonFinite { .. })
            ));
        }
        assert!(session.set_radix_polar(f64::NAN, 30).is_err());
        assert_eq!(session, Session::new());
    }

    #[test]
    fn polar_radix_drives_the_series() {
        let mut session = Session::new();
        session.set_radix_polar(2.0, 180).unwrap();
        assert_eq!(session.radix_mode(), RadixMode::Polar);
        assert!((session.radix() - C::new(-2.0, 0.0)).norm() < 1e-12);
        assert_eq!(session.series().unwrap().len(), 512);
    }

    #[test]
    fn single_symbol_fails_at_series_time() {
        let mut session = Session::new();
        session.set_symbols_text("1").unwrap();
        assert!(matches!(
            session.series(),
            Err(SessionError::Numeral(NumeralError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn config_applies_through_validation() {
        let config: SessionConfig = serde_json::from_str(
            r#"{
                "symbols": { "roots": 3 },
                "radix": { "polar": { "abs": 1.5, "angle_degrees": 45 } },
                "points": 1024
            }"#,
        )
        .unwrap();
        let session = Session::from_config(&config).unwrap();
        assert_eq!(session.symbols().len(), 4);
        assert_eq!(session.points(), 1024);
        assert_eq!(session.field_size(), DEFAULT_FIELD);
        assert_eq!(session.radix_mode(), RadixMode::Polar);

        let bad = SessionConfig { points: 3, ..SessionConfig::default() };
        assert!(Session::from_config(&bad).is_err());
        assert!(serde_json::from_str::<SessionConfig>(r#"{ "colour": "red" }"#).is_err());
    }
}
