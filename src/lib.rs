pub mod math;
pub mod numeral;
pub mod series;
pub mod colormap;
pub mod session;
pub mod export;
pub mod logging;

pub use math::{
    C, ParseComplexError, Polar, from_polar_degrees, parse_complex, parse_symbols, to_polar_degrees,
};
pub use numeral::{DigitString, NumeralError, convert_to_digits, evaluate, generate_symbols};
pub use series::{Bounds, PointSeries, SeriesConfig, SeriesEntry, build_series, build_series_from};
pub use colormap::{Gradient, Rgb};
pub use session::{ConfigError, RadixMode, Session, SessionConfig, SessionError, SymbolSource};
pub use export::{ExportError, ExportFormat, PointRecord, SeriesExport};
pub use logging::init_tracing;
