//! Filter and dropdown state carried in the page query string

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Reporting window sent to the analytics backend as `dateRange`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRange {
    /// Last 7 days
    #[serde(rename = "last_7_days")]
    Last7Days,
    /// Last 30 days
    #[default]
    #[serde(rename = "last_30_days")]
    Last30Days,
    /// Last 90 days
    #[serde(rename = "last_90_days")]
    Last90Days,
    /// Custom window chosen by the backend
    #[serde(rename = "custom")]
    Custom,
}

impl DateRange {
    /// Every selectable range, in dropdown order
    pub const ALL: [Self; 4] = [Self::Last7Days, Self::Last30Days, Self::Last90Days, Self::Custom];

    /// Query token understood by the backend
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Last7Days => "last_7_days",
            Self::Last30Days => "last_30_days",
            Self::Last90Days => "last_90_days",
            Self::Custom => "custom",
        }
    }

    /// Parse a query token
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|range| range.as_query() == value)
    }

    /// Dropdown label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "آخر 7 أيام",
            Self::Last30Days => "آخر 30 يوماً",
            Self::Last90Days => "آخر 90 يوماً",
            Self::Custom => "مخصص",
        }
    }
}

/// Rule status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// No filtering
    #[default]
    All,
    /// Active rules
    Active,
    /// Paused rules
    Paused,
    /// Draft rules
    Draft,
}

impl StatusFilter {
    /// Every option, in select order
    pub const ALL: [Self; 4] = [Self::All, Self::Active, Self::Paused, Self::Draft];

    /// Query token
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Draft => "draft",
        }
    }

    /// Select label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Status",
            Self::Active => "نشط (Active)",
            Self::Paused => "معطّل (Paused)",
            Self::Draft => "مسودة (Draft)",
        }
    }
}

/// Source platform filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFilter {
    /// No filtering
    #[default]
    All,
    /// Instagram only
    Instagram,
    /// Facebook only
    Facebook,
}

impl PlatformFilter {
    /// Every option, in select order
    pub const ALL: [Self; 3] = [Self::All, Self::Instagram, Self::Facebook];

    /// Query token
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
        }
    }

    /// Select label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Platforms",
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
        }
    }
}

/// Local, per-session display state
///
/// Only `date_range` reaches the backend. The status, platform and search
/// values are kept and echoed into the controls but do not filter anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Selected reporting window
    pub date_range: DateRange,
    /// Selected rule status
    pub status: StatusFilter,
    /// Selected platform
    pub platform: PlatformFilter,
    /// Free-text search
    pub search: String,
    /// Date dropdown open
    pub show_date_dropdown: bool,
    /// Export dropdown open
    pub show_export_dropdown: bool,
}

/// Wire form of [`FilterState`] in the page URL
#[derive(Debug, Default, Serialize, Deserialize)]
struct PageQuery {
    #[serde(rename = "dateRange", skip_serializing_if = "Option::is_none")]
    date_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    q: Option<String>,
    #[serde(rename = "dateMenu", skip_serializing_if = "Option::is_none")]
    date_menu: Option<String>,
    #[serde(rename = "exportMenu", skip_serializing_if = "Option::is_none")]
    export_menu: Option<String>,
}

impl FilterState {
    /// Read filter state from a raw query string, ignoring unrelated parameters
    ///
    /// Unknown values fall back to each filter's default.
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        let page: PageQuery = query
            .and_then(|q| match serde_urlencoded::from_str(q) {
                Ok(page) => Some(page),
                Err(e) => {
                    warn!("Ignoring unparsable page query: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let date_range = page
            .date_range
            .as_deref()
            .map_or_else(DateRange::default, |value| {
                DateRange::parse(value).unwrap_or_else(|| {
                    warn!("Unknown dateRange '{}', using {}", value, DateRange::default().as_query());
                    DateRange::default()
                })
            });

        Self {
            date_range,
            status: parse_choice(page.status.as_deref(), &StatusFilter::ALL, |s| s.as_query()),
            platform: parse_choice(page.platform.as_deref(), &PlatformFilter::ALL, |p| {
                p.as_query()
            }),
            search: page.q.unwrap_or_default(),
            show_date_dropdown: is_open(page.date_menu.as_deref()),
            show_export_dropdown: is_open(page.export_menu.as_deref()),
        }
    }

    /// Encode as a query string; defaults and closed menus are omitted
    #[must_use]
    pub fn to_query(&self) -> String {
        let page = PageQuery {
            date_range: (self.date_range != DateRange::default())
                .then(|| self.date_range.as_query().to_string()),
            status: (self.status != StatusFilter::default())
                .then(|| self.status.as_query().to_string()),
            platform: (self.platform != PlatformFilter::default())
                .then(|| self.platform.as_query().to_string()),
            q: (!self.search.is_empty()).then(|| self.search.clone()),
            date_menu: self.show_date_dropdown.then(|| "open".to_string()),
            export_menu: self.show_export_dropdown.then(|| "open".to_string()),
        };
        serde_urlencoded::to_string(&page).unwrap_or_default()
    }

    /// Page link for this state (`/` or `/?...`)
    #[must_use]
    pub fn href(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            "/".to_string()
        } else {
            format!("/?{query}")
        }
    }
}

fn parse_choice<T: Copy + Default>(
    value: Option<&str>,
    options: &[T],
    token: impl Fn(&T) -> &'static str,
) -> T {
    value
        .and_then(|v| options.iter().copied().find(|o| token(o) == v))
        .unwrap_or_default()
}

fn is_open(value: Option<&str>) -> bool {
    matches!(value, Some("open" | "1" | "true"))
}
