//! Bar charts
//!
//! Rankings are drawn as vertical SVG bar charts for files and as
//! horizontal text bars for the terminal.

use crate::error::{ParlaMintError, Result};
use crate::report::RankedEntry;
use console::{measure_text_width, pad_str, Alignment};
use plotters::prelude::*;
use std::path::Path;

/// Widest bar, in characters
pub const BAR_WIDTH: usize = 40;

const SVG_MIN_WIDTH: u32 = 640;
const SVG_PLOT_HEIGHT: u32 = 480;
const SVG_BAR_PIXELS: u32 = 24;

/// Chart file formats, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    /// SVG image
    Svg,
    /// Text bars, as printed to the terminal
    Text,
}

impl ChartFormat {
    /// Format of a chart file
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("svg") => Ok(Self::Svg),
            Some("txt") => Ok(Self::Text),
            _ => Err(ParlaMintError::ReportError(format!(
                "Unsupported chart file '{}': use a .svg or .txt extension",
                path.display()
            ))),
        }
    }
}

/// Titles of a chart and its axes
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels<'a> {
    /// Caption above the plot
    pub title: &'a str,
    /// Horizontal axis description
    pub x_desc: &'a str,
    /// Vertical axis description
    pub y_desc: &'a str,
}

/// Render a vertical bar chart as an SVG document
///
/// Bars keep the ranking order from left to right, with their labels
/// rotated under the axis.
pub fn render_svg_bar_chart(labels: ChartLabels<'_>, entries: &[RankedEntry]) -> Result<String> {
    let slots = entries.len().max(1);
    let width = (slots as u32 * SVG_BAR_PIXELS + 160).max(SVG_MIN_WIDTH);
    let longest = entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0) as u32;
    let label_area = (longest * 7 + 40).clamp(60, 260);
    let max = entries.iter().map(|e| e.count).max().unwrap_or(0).max(1);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, SVG_PLOT_HEIGHT + label_area))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(labels.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(label_area)
            .y_label_area_size(70)
            .build_cartesian_2d((0..slots as i32).into_segmented(), 0u64..max + max / 10 + 1)
            .map_err(chart_error)?;

        let label = |value: &SegmentValue<i32>| match value {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => entries
                .get(*i as usize)
                .map(|e| e.label.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots + 1)
            .x_label_formatter(&label)
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(labels.x_desc)
            .y_desc(labels.y_desc)
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(entries.iter().enumerate().map(|(i, entry)| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0),
                        (SegmentValue::Exact(i + 1), entry.count),
                    ],
                    BLUE.mix(0.75).filled(),
                );
                bar.set_margin(0, 0, 2, 2);
                bar
            }))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

fn chart_error<E: std::fmt::Display>(err: E) -> ParlaMintError {
    ParlaMintError::ReportError(format!("Chart rendering failed: {}", err))
}

/// Render a horizontal bar chart, one line per entry
pub fn render_bar_chart(title: &str, entries: &[RankedEntry]) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(measure_text_width(title)));
    out.push('\n');

    let label_width = entries
        .iter()
        .map(|e| measure_text_width(&e.label))
        .max()
        .unwrap_or(0);
    let max = entries.iter().map(|e| e.count).max().unwrap_or(0);

    for entry in entries {
        let len = if max == 0 {
            0
        } else {
            ((entry.count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
        };
        out.push_str(&pad_str(&entry.label, label_width, Alignment::Left, None));
        out.push_str(" | ");
        out.push_str(&"█".repeat(len));
        out.push_str(&format!(" {}\n", entry.count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_scale_to_largest() {
        let entries = vec![
            RankedEntry { label: "vom vota".into(), count: 10 },
            RankedEntry { label: "voi fi".into(), count: 5 },
            RankedEntry { label: "vor".into(), count: 0 },
        ];
        let chart = render_bar_chart("Top forms", &entries);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "Top forms");
        assert_eq!(lines[1], "=========");
        assert_eq!(lines[2], format!("vom vota | {} 10", "█".repeat(BAR_WIDTH)));
        assert_eq!(lines[3], format!("voi fi   | {} 5", "█".repeat(BAR_WIDTH / 2)));
        assert_eq!(lines[4], "vor      |  0");
    }

    #[test]
    fn test_labels_with_diacritics_align() {
        let entries = vec![
            RankedEntry { label: "Șerban".into(), count: 1 },
            RankedEntry { label: "Ion".into(), count: 1 },
        ];
        let chart = render_bar_chart("T", &entries);
        let lines: Vec<&str> = chart.lines().collect();
        assert!(lines[2].starts_with("Șerban |"));
        assert!(lines[3].starts_with("Ion    |"));
    }

    #[test]
    fn test_empty_chart() {
        assert_eq!(render_bar_chart("Empty", &[]), "Empty\n=====\n");
    }

    #[test]
    fn test_chart_format_from_extension() {
        assert_eq!(ChartFormat::from_path(Path::new("plots/top.svg")).unwrap(), ChartFormat::Svg);
        assert_eq!(ChartFormat::from_path(Path::new("top.SVG")).unwrap(), ChartFormat::Svg);
        assert_eq!(ChartFormat::from_path(Path::new("top.txt")).unwrap(), ChartFormat::Text);
        assert!(matches!(
            ChartFormat::from_path(Path::new("top.png")),
            Err(ParlaMintError::ReportError(_))
        ));
        assert!(ChartFormat::from_path(Path::new("top")).is_err());
    }

    #[test]
    fn test_svg_chart_has_bars_and_captions() {
        let entries = vec![
            RankedEntry { label: "vom vota".into(), count: 12 },
            RankedEntry { label: "voi fi".into(), count: 3 },
        ];
        let labels = ChartLabels {
            title: "Top 2 future verb forms",
            x_desc: "Verb form",
            y_desc: "Count",
        };
        let svg = render_svg_bar_chart(labels, &entries).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        for text in ["Top 2 future verb forms", "Verb form", "vom vota", "voi fi"] {
            assert!(svg.contains(text), "missing {}", text);
        }
        assert!(svg.contains("rotate(90"));
    }

    #[test]
    fn test_svg_chart_without_entries() {
        let labels = ChartLabels {
            title: "Nothing",
            x_desc: "x",
            y_desc: "y",
        };
        let svg = render_svg_bar_chart(labels, &[]).unwrap();
        assert!(svg.contains("Nothing"));
    }
}
