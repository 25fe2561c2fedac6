//! PNG chart rendering with plotters.
//!
//! Text needs a TrueType font registered with plotters. When none can be
//! loaded the charts are still drawn, just without captions and labels.

use anyhow::{anyhow, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::db::{SalesTotal, YearSales};

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 600;

const FONT_FAMILY: &str = "sans-serif";

/// Fonts tried when none is configured
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Registration happens once per process; later calls reuse the outcome
static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Presentation of one bar chart
#[derive(Debug, Clone, Copy)]
pub struct BarChart {
    pub title: &'static str,
    pub x_desc: Option<&'static str>,
    pub y_desc: &'static str,
    pub color: RGBColor,
}

pub const GENRE_SALES: BarChart = BarChart {
    title: "Sales by Genre",
    x_desc: None,
    y_desc: "Units sold",
    color: RGBColor(255, 127, 80),
};

pub const PLATFORM_SALES: BarChart = BarChart {
    title: "Total Sales by Platform",
    x_desc: Some("Platform"),
    y_desc: "Sales",
    color: RGBColor(60, 179, 113),
};

const YEAR_COLOR: RGBColor = RGBColor(70, 130, 180);

#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    labels: bool,
}

impl ChartRenderer {
    /// Renderer that draws text if `font` (or a known system font) loads
    pub fn new(font: Option<&Path>) -> Self {
        let labels = *FONT_READY.get_or_init(|| register_font(font));
        Self { labels }
    }

    /// Renderer that never draws text
    pub fn without_text() -> Self {
        Self { labels: false }
    }

    /// Bar chart of sales totals in the given order
    pub fn bar_chart(&self, bar: &BarChart, data: &[SalesTotal]) -> Result<Vec<u8>> {
        let labels: Vec<&str> = data.iter().map(|d| d.label.as_str()).collect();
        let y_max = axis_max(data.iter().map(|d| d.num_sales));
        let slots = data.len().max(1) as u32;

        render(|root| {
            let mut builder = ChartBuilder::on(root);
            builder.margin(20);
            if self.labels {
                builder
                    .caption(bar.title, (FONT_FAMILY, 26))
                    .x_label_area_size(140)
                    .y_label_area_size(70);
            }

            let mut chart = builder
                .build_cartesian_2d((0u32..slots).into_segmented(), 0f64..y_max)
                .map_err(draw_error)?;

            let label_of = |v: &SegmentValue<u32>| match v {
                SegmentValue::CenterOf(i) => {
                    labels.get(*i as usize).map(|s| s.to_string()).unwrap_or_default()
                }
                _ => String::new(),
            };

            // plotters cannot lay out zero key points, so the mesh is only
            // drawn together with its labels
            if self.labels {
                let mut mesh = chart.configure_mesh();
                mesh.disable_x_mesh()
                    .x_labels(labels.len().max(1))
                    .x_label_formatter(&label_of)
                    .x_label_style(
                        (FONT_FAMILY, 13)
                            .into_font()
                            .transform(FontTransform::Rotate90),
                    )
                    .y_desc(bar.y_desc);
                if let Some(x_desc) = bar.x_desc {
                    mesh.x_desc(x_desc);
                }
                mesh.draw().map_err(draw_error)?;
            }

            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(bar.color.filled())
                        .margin(6)
                        .data(data.iter().enumerate().map(|(i, d)| (i as u32, d.num_sales))),
                )
                .map_err(draw_error)?;

            Ok(())
        })
    }

    /// Line chart of sales per release year; rows without a year are left out
    pub fn year_chart(&self, data: &[YearSales]) -> Result<Vec<u8>> {
        let points: Vec<(i64, f64)> = data
            .iter()
            .filter_map(|d| d.release_year.map(|year| (year, d.num_sales)))
            .collect();

        let x_range = match (points.first(), points.last()) {
            (Some(first), Some(last)) if first.0 < last.0 => first.0..last.0,
            (Some(only), _) => only.0 - 1..only.0 + 1,
            _ => 0..1,
        };
        let y_max = axis_max(points.iter().map(|p| p.1));

        render(|root| {
            let mut builder = ChartBuilder::on(root);
            builder.margin(20);
            if self.labels {
                builder
                    .caption("Total Sales by Release Year", (FONT_FAMILY, 26))
                    .x_label_area_size(50)
                    .y_label_area_size(70);
            }

            let mut chart = builder
                .build_cartesian_2d(x_range, 0f64..y_max)
                .map_err(draw_error)?;

            if self.labels {
                chart
                    .configure_mesh()
                    .x_desc("Release year")
                    .y_desc("Sales")
                    .draw()
                    .map_err(draw_error)?;
            }

            chart
                .draw_series(LineSeries::new(
                    points.iter().copied(),
                    YEAR_COLOR.stroke_width(2),
                ))
                .map_err(draw_error)?;
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, YEAR_COLOR.filled())),
                )
                .map_err(draw_error)?;

            Ok(())
        })
    }
}

fn register_font(configured: Option<&Path>) -> bool {
    let candidates: Vec<PathBuf> = match configured {
        Some(path) => vec![path.to_path_buf()],
        None => SYSTEM_FONTS.iter().map(PathBuf::from).collect(),
    };

    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        // plotters keeps a reference for the lifetime of the process
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        match plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
            Ok(()) => {
                log::info!("Chart font loaded from {:?}", path);
                return true;
            }
            Err(_) => log::warn!("Ignoring unreadable font {:?}", path),
        }
    }

    log::warn!("No chart font available; charts are drawn without text");
    false
}

/// Upper bound of the value axis with some headroom
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn draw_error(err: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("Failed to draw chart: {}", err)
}

/// Draw onto a white RGB canvas and encode it as PNG
fn render<F>(draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    let mut pixels = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;
        draw(&root)?;
        root.present().map_err(draw_error)?;
    }

    let image = image::RgbImage::from_raw(WIDTH, HEIGHT, pixels)
        .context("Chart buffer does not match the image size")?;
    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, image::ImageFormat::Png)
        .context("Failed to encode chart as PNG")?;

    Ok(png.into_inner())
}
