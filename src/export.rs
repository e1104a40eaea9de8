use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::colormap::Gradient;
use crate::math::C;
use crate::series::PointSeries;
use crate::session::Session;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("binary export failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("binary import failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("json cannot carry non-finite {what}; export to a .bin file instead")]
    NonFinite { what: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Binary,
}

impl ExportFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => ExportFormat::Binary,
            _ => ExportFormat::Json,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PointRecord {
    pub index: u64,
    pub digits: String,
    pub length: u32,
    pub re: f64,
    pub im: f64,
    pub weight: f64,
    pub color: u32,
}

/// Everything an external renderer needs to plot one series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SeriesExport {
    pub radix: [f64; 2],
    pub symbols: Vec<[f64; 2]>,
    pub field_size: u32,
    pub draw_lines: bool,
    pub max_length: u32,
    pub points: Vec<PointRecord>,
}

fn pair(c: C) -> [f64; 2] {
    [c.re, c.im]
}

impl SeriesExport {
    pub fn new(series: &PointSeries, session: &Session, gradient: &Gradient) -> Self {
        let points = series
            .iter()
            .map(|entry| PointRecord {
                index: entry.index,
                digits: entry.digits.to_string(),
                length: entry.length() as u32,
                re: entry.point.re,
                im: entry.point.im,
                weight: entry.weight,
                color: gradient.sample(entry.weight).to_u32(),
            })
            .collect();

        SeriesExport {
            radix: pair(session.radix()),
            symbols: session.symbols().iter().copied().map(pair).collect(),
            field_size: session.field_size(),
            draw_lines: session.draw_lines(),
            max_length: series.max_length() as u32,
            points,
        }
    }

    /// First radix, symbol or point holding an infinity or NaN.
    pub fn first_non_finite(&self) -> Option<String> {
        let finite = |[re, im]: [f64; 2]| re.is_finite() && im.is_finite();
        if !finite(self.radix) {
            return Some("radix".to_string());
        }
        if let Some(i) = self.symbols.iter().position(|&s| !finite(s)) {
            return Some(format!("symbol #{i}"));
        }
        self.points
            .iter()
            .find(|p| !(finite([p.re, p.im]) && p.weight.is_finite()))
            .map(|p| format!("point {}", p.index))
    }

    pub fn to_bytes(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        Ok(match format {
            ExportFormat::Json => {
                // serde_json writes these as null, which reads back as an error
                if let Some(what) = self.first_non_finite() {
                    return Err(ExportError::NonFinite { what });
                }
                serde_json::to_vec_pretty(self)?
            }
            ExportFormat::Binary => bincode::encode_to_vec(self, bincode::config::standard())?,
        })
    }

    pub fn from_bytes(data: &[u8], format: ExportFormat) -> Result<Self, ExportError> {
        Ok(match format {
            ExportFormat::Json => serde_json::from_slice(data)?,
            ExportFormat::Binary => {
                let (export, _len): (SeriesExport, usize) =
                    bincode::decode_from_slice(data, bincode::config::standard())?;
                export
            }
        })
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<ExportFormat, ExportError> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path);
        fs::write(path, self.to_bytes(format)?)?;
        info!(path = %path.display(), ?format, points = self.points.len(), "exported series");
        Ok(format)
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Self::from_bytes(&data, ExportFormat::from_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExportFormat::from_path("walk.bin"), ExportFormat::Binary);
        assert_eq!(ExportFormat::from_path("walk.BIN"), ExportFormat::Binary);
        assert_eq!(ExportFormat::from_path("walk.json"), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path("walk"), ExportFormat::Json);
    }

    #[test]
    fn records_carry_digits_and_colours() {
        let session = Session::new();
        let series = session.series().unwrap();
        let export = SeriesExport::new(&series, &session, &Gradient::digits());

        assert_eq!(export.points.len(), 512);
        assert_eq!(export.max_length, 9);
        assert_eq!(export.radix, [1.0, 1.0]);
        assert_eq!(export.symbols, vec![[0.0, 0.0], [1.0, 0.0]]);

        let last = export.points.last().unwrap();
        assert_eq!(last.digits, "111111111");
        assert_eq!(last.weight, 1.0);
        assert_eq!(last.color, 0xffc0cb);
        assert_eq!(export.points[0].digits, "0");
    }

    #[test]
    fn binary_bytes_decode_back() {
        let session = Session::new();
        let export = SeriesExport::new(&session.series().unwrap(), &session, &Gradient::digits());
        let bytes = export.to_bytes(ExportFormat::Binary).unwrap();
        assert_eq!(SeriesExport::from_bytes(&bytes, ExportFormat::Binary).unwrap(), export);
    }
}
