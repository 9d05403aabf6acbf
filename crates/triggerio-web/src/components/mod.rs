//! Server-rendered building blocks of the dashboard page
//!
//! Each component is an askama template fed with display-ready values.
//! Templates escape everything they interpolate; colors are additionally
//! checked here before they reach inline styles.

pub mod charts;
pub mod controls;
pub mod loading;
pub mod sections;

use triggerio_core::utils::{format_number, format_thousands, is_hex_color};

/// Neutral color used when a row carries something that is not a hex color
pub const NEUTRAL_COLOR: &str = "#9CA3AF";

/// A color that is safe to place in a `style` attribute
#[must_use]
pub fn safe_color(color: &str) -> &str {
    if is_hex_color(color) {
        color
    } else {
        NEUTRAL_COLOR
    }
}

/// Optional count; blank when missing
#[must_use]
pub fn opt_count(value: Option<u64>) -> String {
    value.map(format_thousands).unwrap_or_default()
}

/// Optional percentage; blank when missing
#[must_use]
pub fn opt_percent(value: Option<f64>) -> String {
    value.map(|v| format!("{}%", format_number(v))).unwrap_or_default()
}
