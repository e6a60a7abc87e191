//! Bode magnitude plots.
//!
//! Frequency runs along a log axis, gain in dB along a linear one. The output
//! format follows the file extension: `.svg` writes SVG, anything else goes
//! through the bitmap backend (PNG for `.png`).

use std::ops::Range;
use std::path::Path;

use ampsweep_core::Trace;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{Error, Result};

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Bitmap,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageFormat::Svg,
            _ => ImageFormat::Bitmap,
        }
    }
}

/// A magnitude-vs-frequency chart with one or more traces.
#[derive(Debug, Clone)]
pub struct BodePlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub size: (u32, u32),
    traces: Vec<Trace>,
}

impl BodePlot {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: "Frequency [Hz]".to_string(),
            y_label: "Gain [dB]".to_string(),
            size: (1024, 768),
            traces: Vec::new(),
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn with_traces(mut self, traces: impl IntoIterator<Item = Trace>) -> Self {
        self.traces.extend(traces);
        self
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// A legend is only worth drawing when traces need telling apart.
    pub fn shows_legend(&self) -> bool {
        self.traces.len() > 1
    }

    /// Frequency and dB ranges covering every trace.
    pub fn axis_ranges(&self) -> Result<(Range<f64>, Range<f64>)> {
        let first = self
            .traces
            .first()
            .ok_or_else(|| Error::Empty(format!("plot '{}' has no traces", self.title)))?;
        if first.is_empty() {
            return Err(Error::Empty(format!("trace {} has no points", first.label())));
        }
        for trace in &self.traces[1..] {
            if trace.frequencies() != first.frequencies() {
                return Err(Error::MismatchedAxis {
                    label: trace.label().to_string(),
                });
            }
        }

        let (f_lo, f_hi) = first
            .frequencies()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &f| {
                (lo.min(f), hi.max(f))
            });
        if !(f_lo > 0.0 && f_hi.is_finite()) {
            return Err(Error::InvalidAxis(format!(
                "frequencies must be positive and finite, got {f_lo}..{f_hi}"
            )));
        }
        let (f_lo, f_hi) = if f_lo == f_hi {
            (f_lo / 10f64.sqrt(), f_hi * 10f64.sqrt())
        } else {
            (f_lo, f_hi)
        };

        let (db_lo, db_hi) = self
            .traces
            .iter()
            .filter_map(Trace::db_range)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            });
        if !db_lo.is_finite() || !db_hi.is_finite() {
            return Err(Error::Empty(format!(
                "plot '{}' has no finite values",
                self.title
            )));
        }
        let pad = ((db_hi - db_lo) * 0.05).max(1.0);

        Ok((f_lo..f_hi, (db_lo - pad)..(db_hi + pad)))
    }

    /// Render to `path`, picking the backend from the extension.
    pub fn render(&self, path: &Path) -> Result<()> {
        // Fail before creating the file.
        self.axis_ranges()?;
        match ImageFormat::from_path(path) {
            ImageFormat::Svg => self.draw(SVGBackend::new(path, self.size).into_drawing_area()),
            ImageFormat::Bitmap => {
                self.draw(BitMapBackend::new(path, self.size).into_drawing_area())
            }
        }?;
        log::info!("wrote {}", path.display());
        Ok(())
    }

    /// Render to an in-memory SVG document.
    pub fn render_svg_string(&self) -> Result<String> {
        let mut svg = String::new();
        self.draw(SVGBackend::with_string(&mut svg, self.size).into_drawing_area())?;
        Ok(svg)
    }

    fn draw<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> Result<()> {
        let (x_range, y_range) = self.axis_ranges()?;

        root.fill(&WHITE).map_err(drawing)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(self.title.as_str(), ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.log_scale(), y_range)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .x_label_formatter(&|f: &f64| format_hz(*f))
            .draw()
            .map_err(drawing)?;

        let legend = self.shows_legend();
        for (i, trace) in self.traces.iter().enumerate() {
            let color = Palette99::pick(i).mix(0.9);
            let series = chart
                .draw_series(LineSeries::new(trace.points(), color.stroke_width(2)))
                .map_err(drawing)?;
            if legend {
                series
                    .label(trace.label())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }

        if legend {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(drawing)?;
        }

        root.present().map_err(drawing)?;
        Ok(())
    }
}

pub(crate) fn drawing<E>(err: DrawingAreaErrorKind<E>) -> Error
where
    E: std::error::Error + Send + Sync,
{
    Error::Drawing(err.to_string())
}

/// Tick label for a frequency: `10`, `1k`, `100M`.
fn format_hz(f: f64) -> String {
    let (scaled, suffix) = if f >= 1e9 {
        (f / 1e9, "G")
    } else if f >= 1e6 {
        (f / 1e6, "M")
    } else if f >= 1e3 {
        (f / 1e3, "k")
    } else {
        (f, "")
    };
    let text = format!("{:.2}", scaled);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text}{suffix}")
}
