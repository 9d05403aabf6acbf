//! Page header controls and the filter bar
//!
//! Dropdowns are toggled through the page query so the page works without
//! scripts: every toggle is a link to the same filters with one flag flipped.

use crate::{
    export::ExportSection,
    filters::{DateRange, FilterState, PlatformFilter, StatusFilter},
};
use askama::Template;

/// One entry of a dropdown menu
#[derive(Debug, Clone)]
pub struct MenuLink {
    /// Target URL
    pub href: String,
    /// Visible label
    pub label: String,
    /// Currently chosen entry
    pub selected: bool,
}

/// Date selector, export menu and refresh button
#[derive(Debug, Clone, Template)]
#[template(path = "components/header_controls.html")]
pub struct HeaderControls {
    /// Label of the selected date range
    pub date_label: &'static str,
    /// Link that opens or closes the date menu
    pub date_toggle: String,
    /// Date menu entries; `None` while the menu is closed
    pub date_menu: Option<Vec<MenuLink>>,
    /// Link that opens or closes the export menu
    pub export_toggle: String,
    /// Export menu entries; `None` while the menu is closed
    pub export_menu: Option<Vec<MenuLink>>,
}

/// Header controls for the current filters
#[must_use]
pub fn header_controls(filters: &FilterState) -> HeaderControls {
    let date_toggle = FilterState {
        show_date_dropdown: !filters.show_date_dropdown,
        show_export_dropdown: false,
        ..filters.clone()
    };
    let export_toggle = FilterState {
        show_export_dropdown: !filters.show_export_dropdown,
        show_date_dropdown: false,
        ..filters.clone()
    };

    let date_menu = filters.show_date_dropdown.then(|| {
        DateRange::ALL
            .into_iter()
            .map(|range| MenuLink {
                href: FilterState {
                    date_range: range,
                    show_date_dropdown: false,
                    ..filters.clone()
                }
                .href(),
                label: range.label().to_string(),
                selected: range == filters.date_range,
            })
            .collect()
    });
    let export_menu = filters.show_export_dropdown.then(|| {
        ExportSection::ALL
            .into_iter()
            .map(|section| MenuLink {
                href: format!("/export/csv?section={}", section.as_query()),
                label: format!("CSV: {}", section.title()),
                selected: false,
            })
            .collect()
    });

    HeaderControls {
        date_label: filters.date_range.label(),
        date_toggle: date_toggle.href(),
        date_menu,
        export_toggle: export_toggle.href(),
        export_menu,
    }
}

/// One `<option>` of a select
#[derive(Debug, Clone)]
pub struct SelectOption {
    /// Submitted value
    pub value: &'static str,
    /// Visible label
    pub label: &'static str,
    /// Currently chosen
    pub selected: bool,
}

/// Search box plus platform and status selects
#[derive(Debug, Clone, Template)]
#[template(path = "components/filter_bar.html")]
pub struct FilterBar {
    /// Non-default date range carried through the form
    pub date_range: Option<&'static str>,
    /// Current search text
    pub search: String,
    /// Platform choices
    pub platforms: Vec<SelectOption>,
    /// Status choices
    pub statuses: Vec<SelectOption>,
}

/// Filter bar echoing the current values
#[must_use]
pub fn filter_bar(filters: &FilterState) -> FilterBar {
    FilterBar {
        date_range: (filters.date_range != DateRange::default())
            .then(|| filters.date_range.as_query()),
        search: filters.search.clone(),
        platforms: PlatformFilter::ALL
            .into_iter()
            .map(|p| SelectOption {
                value: p.as_query(),
                label: p.label(),
                selected: p == filters.platform,
            })
            .collect(),
        statuses: StatusFilter::ALL
            .into_iter()
            .map(|s| SelectOption {
                value: s.as_query(),
                label: s.label(),
                selected: s == filters.status,
            })
            .collect(),
    }
}
