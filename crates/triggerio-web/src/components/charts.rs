//! CSS-only charts

use super::{NEUTRAL_COLOR, opt_count, safe_color};
use askama::Template;

/// One slice of a donut or pie
#[derive(Debug, Clone, Copy)]
pub struct Slice<'a> {
    /// Legend label
    pub label: &'a str,
    /// Slice weight
    pub value: u64,
    /// Fill color
    pub color: &'a str,
}

/// `conic-gradient` stops for the slices, sized by value share
#[must_use]
pub fn conic_gradient(slices: &[Slice<'_>]) -> String {
    let total = slices
        .iter()
        .map(|s| s.value)
        .fold(0, u64::saturating_add);
    if total == 0 {
        return format!("conic-gradient({NEUTRAL_COLOR} 0 100%)");
    }

    let mut start = 0.0;
    let stops: Vec<String> = slices
        .iter()
        .map(|slice| {
            let end = start + slice.value as f64 / total as f64 * 100.0;
            let stop = format!(
                "{} {:.2}% {:.2}%",
                safe_color(slice.color),
                start,
                end
            );
            start = end;
            stop
        })
        .collect();
    format!("conic-gradient({})", stops.join(", "))
}

/// Donut (with a hole) or pie chart
#[derive(Debug, Clone, Template)]
#[template(path = "components/donut.html")]
pub struct Donut {
    /// `donut` or `pie`
    pub class: &'static str,
    /// Accessible description listing the slices
    pub label: String,
    /// CSS background
    pub gradient: String,
}

/// Build a donut or pie for the slices
#[must_use]
pub fn donut(slices: &[Slice<'_>], hole: bool) -> Donut {
    let labels: Vec<&str> = slices.iter().map(|s| s.label).collect();
    Donut {
        class: if hole { "donut" } else { "pie" },
        label: labels.join(", "),
        gradient: conic_gradient(slices),
    }
}

/// One row of a bar chart
#[derive(Debug, Clone)]
pub struct Bar {
    /// Row label
    pub label: String,
    /// Bar width in percent of the track
    pub width: String,
    /// Fill color
    pub color: String,
    /// Displayed value
    pub value: String,
}

/// Horizontal bar chart
#[derive(Debug, Clone, Template)]
#[template(path = "components/bar_chart.html")]
pub struct BarChart {
    /// Rows in display order
    pub bars: Vec<Bar>,
}

/// Bar chart with bars scaled to the largest value; a missing value draws no bar
#[must_use]
pub fn bar_chart(bars: &[(&str, Option<u64>)], color: &str) -> BarChart {
    let max = bars.iter().filter_map(|(_, v)| *v).max().unwrap_or(0);
    BarChart {
        bars: bars
            .iter()
            .map(|(label, value)| {
                let width = match value {
                    Some(v) if max > 0 => *v as f64 / max as f64 * 100.0,
                    _ => 0.0,
                };
                Bar {
                    label: (*label).to_string(),
                    width: format!("{width:.1}"),
                    color: safe_color(color).to_string(),
                    value: opt_count(*value),
                }
            })
            .collect(),
    }
}
