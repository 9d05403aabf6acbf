//! The analytics dashboard page

use crate::{
    components::{
        controls::{self, FilterBar, HeaderControls},
        loading::LoadingIndicator,
        sections::{
            self, ActivityFeed, AutomationCard, EmailCard, FunnelCard, GhlCard, OverviewCards,
            SocialCard, TemperatureCard,
        },
    },
    filters::FilterState,
    view::DashboardView,
};
use askama::Template;
use triggerio_core::{Error, Result};

/// Whole page: header, controls and every section in display order
#[derive(Debug, Clone, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    /// Page and document title
    pub title: &'static str,
    /// Date selector, export menu and refresh
    pub controls: HeaderControls,
    /// Spinner while a fetch is in flight
    pub loading: Option<LoadingIndicator>,
    /// Headline cards
    pub overview: OverviewCards,
    /// Search and filter selects
    pub filter_bar: FilterBar,
    /// Temperature distribution
    pub temperature: TemperatureCard,
    /// Sales funnel
    pub funnel: FunnelCard,
    /// Email campaigns
    pub email_campaigns: EmailCard,
    /// Social engagement
    pub social_media: SocialCard,
    /// Automation rules
    pub automation_rules: AutomationCard,
    /// GoHighLevel transfers
    pub ghl_transfers: GhlCard,
    /// Activity feed
    pub recent_activities: ActivityFeed,
}

impl DashboardPage {
    /// Assemble the page for the current view, filters and loading flag
    #[must_use]
    pub fn new(view: &DashboardView, filters: &FilterState, loading: bool) -> Self {
        let insights = view.insights();
        Self {
            title: "Analytics Dashboard",
            controls: controls::header_controls(filters),
            loading: LoadingIndicator::when(loading),
            overview: sections::overview_cards(view),
            filter_bar: controls::filter_bar(filters),
            temperature: sections::temperature(view),
            funnel: sections::funnel(view, &insights),
            email_campaigns: sections::email_campaigns(view, &insights),
            social_media: sections::social_media(view, &insights),
            automation_rules: sections::automation_rules(view, &insights, filters.date_range),
            ghl_transfers: sections::ghl_transfers(view, &insights),
            recent_activities: sections::recent_activities(view),
        }
    }
}

/// Render the whole page to HTML
///
/// # Errors
///
/// Returns an error if a template fails to render
pub fn render_dashboard(view: &DashboardView, filters: &FilterState, loading: bool) -> Result<String> {
    DashboardPage::new(view, filters, loading)
        .render()
        .map_err(|e| Error::Other(format!("Failed to render dashboard: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_has_every_section() {
        let html =
            render_dashboard(&DashboardView::merge(None), &FilterState::default(), false).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"dir="rtl""#));
        assert!(html.contains("<title>Analytics Dashboard</title>"));
        for id in [
            "overview",
            "temperature",
            "funnel",
            "email-campaigns",
            "social-media",
            "automation-rules",
            "ghl-transfers",
            "recent-activities",
        ] {
            assert!(html.contains(&format!(r#"id="{id}""#)), "missing section {id}");
        }
        assert!(!html.contains("جاري التحميل"));
    }

    #[test]
    fn test_children_are_embedded_unescaped() {
        let html =
            render_dashboard(&DashboardView::merge(None), &FilterState::default(), false).unwrap();

        assert!(html.contains(r#"<div class="header-controls">"#));
        assert!(html.contains(r#"<section class="card" id="funnel" data-source="fallback">"#));
        assert!(!html.contains("&lt;section"));
    }

    #[test]
    fn test_loading_indicator_shown_while_fetching() {
        let html =
            render_dashboard(&DashboardView::merge(None), &FilterState::default(), true).unwrap();

        assert!(html.contains("جاري التحميل..."));
    }
}
