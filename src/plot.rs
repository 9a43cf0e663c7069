// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::error::Error;
use std::path::Path;
use std::sync::Once;

use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            (($colour & 0x0000FF) >> 0) as u8,
        )
    };
}

const LINE_COLOUR: RGBColor = hexcolour!(0xAA0000);

#[derive(Debug, thiserror::Error)]
#[error("unsupported output format: {0:?}")]
pub struct UnsupportedFormat(pub String);

/// Renders fonts from the embedded DejaVu face so that output does not
/// depend on system font discovery.
fn ensure_fonts() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| {
        let bytes: &'static [u8] = dejavu::sans_mono::regular();
        if plotters::style::register_font("sans-serif", FontStyle::Normal, bytes).is_err() {
            warn!("unable to register embedded font");
        }
    });
}

/// A line plot of a ratio series against its 0-based record index. The
/// caption and the y-axis description are only drawn when configured.
/// NaN ratios are drawn as gaps in the trace.
pub struct RatioPlot {
    series: Vec<f64>,
    ylabel: Option<String>,
    title: Option<String>,
    size: (u32, u32),
}

impl RatioPlot {
    pub fn new(series: Vec<f64>) -> Self {
        Self {
            series,
            ylabel: None,
            title: None,
            size: (1080, 720),
        }
    }

    pub fn ylabel(&mut self, label: impl AsRef<str>) -> &mut Self {
        self.ylabel = Some(label.as_ref().to_owned());
        self
    }

    pub fn title(&mut self, title: impl AsRef<str>) -> &mut Self {
        self.title = Some(title.as_ref().to_owned());
        self
    }

    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    pub fn series(&self) -> &[f64] {
        &self.series
    }

    /// Encodes and writes the plot, choosing the backend from the file
    /// extension of `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        debug!("saving {:?} plot to {}", extension, path.display());

        match extension.as_str() {
            "png" | "jpg" | "jpeg" | "bmp" => {
                let root = BitMapBackend::new(path, self.size).into_drawing_area();
                self.draw(&root)
            }
            "svg" => {
                let root = SVGBackend::new(path, self.size).into_drawing_area();
                self.draw(&root)
            }
            _ => Err(Box::new(UnsupportedFormat(extension))),
        }
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Box<dyn Error>>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        ensure_fonts();

        root.fill(&WHITE)?;

        let (min, max) = finite_bounds(&self.series);
        let xmax = if self.series.len() > 1 {
            (self.series.len() - 1) as f64
        } else {
            1.0
        };

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 100)
            .set_label_area_size(LabelAreaPosition::Bottom, 40);
        if let Some(title) = &self.title {
            builder.caption(title, ("sans-serif", 40));
        }
        let mut chart = builder.build_cartesian_2d(0.0..xmax, min..max)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .disable_y_mesh()
            .x_label_style(("sans-serif", 20))
            .y_label_style(("sans-serif", 20));
        if let Some(label) = &self.ylabel {
            mesh.y_desc(label.as_str());
        }
        mesh.draw()?;

        for segment in finite_segments(&self.series) {
            chart.draw_series(LineSeries::new(segment, LINE_COLOUR.stroke_width(2)))?;
        }

        root.present()?;

        Ok(())
    }
}

/// Splits the series into runs of finite points, so that undefined ratios
/// leave a gap in the trace instead of a spurious connecting line.
fn finite_segments(values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for (index, &value) in values.iter().enumerate() {
        if value.is_finite() {
            current.push((index as f64, value));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Padded y-axis range over the finite values, with fallbacks for
/// constant and fully-undefined series.
fn finite_bounds(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for &value in values {
        if value.is_finite() {
            min = min.min(value);
            max = max.max(value);
        }
    }

    if min > max {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_split_on_nan() {
        let segments = finite_segments(&[1.0, 0.5, f64::NAN, 2.0]);
        assert_eq!(
            segments,
            vec![vec![(0.0, 1.0), (1.0, 0.5)], vec![(3.0, 2.0)]]
        );
    }

    #[test]
    fn segments_ignore_leading_and_trailing_nan() {
        let segments = finite_segments(&[f64::NAN, 1.0, f64::NAN]);
        assert_eq!(segments, vec![vec![(1.0, 1.0)]]);
    }

    #[test]
    fn segments_of_empty_series() {
        assert!(finite_segments(&[]).is_empty());
        assert!(finite_segments(&[f64::NAN, f64::NAN]).is_empty());
    }

    #[test]
    fn bounds_pad_the_extremes() {
        let (min, max) = finite_bounds(&[1.0, 3.0]);
        assert!(min < 1.0 && min > 0.5);
        assert!(max > 3.0 && max < 3.5);
    }

    #[test]
    fn bounds_skip_undefined_values() {
        let (min, max) = finite_bounds(&[f64::NAN, 2.0, f64::NAN, 4.0]);
        assert!(min < 2.0 && max > 4.0);
    }

    #[test]
    fn bounds_of_constant_series() {
        assert_eq!(finite_bounds(&[1.0, 1.0]), (0.5, 1.5));
    }

    #[test]
    fn bounds_of_undefined_series() {
        assert_eq!(finite_bounds(&[]), (0.0, 1.0));
        assert_eq!(finite_bounds(&[f64::NAN]), (0.0, 1.0));
    }

    #[test]
    fn save_rejects_unknown_extension() {
        let plot = RatioPlot::new(vec![1.0, 0.5]);
        assert!(plot.save("comparison.pdf").is_err());
        assert!(plot.save("comparison").is_err());
        assert!(!Path::new("comparison.pdf").exists());
        assert!(!Path::new("comparison").exists());
    }
}
