//! Merge of the fetched payload with the bundled fallback datasets

use crate::insights::{
    self, AutomationTotals, EmailTotals, FunnelDrop, FunnelSummary, GhlBreakdown,
};
use serde::Serialize;
use triggerio_core::{
    DashboardPayload, fallback,
    types::{
        ActivityEvent, AutomationRule, EmailCampaign, FunnelStage, GhlTransferSegment,
        OverviewStats, SocialPlatformMetric, TemperatureSegment,
    },
};

/// Where a section's data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Supplied by the backend
    Live,
    /// Bundled sample data
    Fallback,
}

impl DataSource {
    /// Wire and markup name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fallback => "fallback",
        }
    }
}

/// One display section and its origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<T> {
    /// Origin of `data`
    pub source: DataSource,
    /// Rows or values to display
    pub data: T,
}

impl<T: Clone> Section<T> {
    /// Take the live value when present, otherwise the whole fallback
    fn pick(live: Option<&T>, fallback: impl FnOnce() -> T) -> Self {
        live.map_or_else(
            || Self {
                source: DataSource::Fallback,
                data: fallback(),
            },
            |data| Self {
                source: DataSource::Live,
                data: data.clone(),
            },
        )
    }
}

/// Everything the dashboard screen displays
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Overview cards
    pub overview: Section<OverviewStats>,
    /// Lead temperature distribution
    pub temperature: Section<Vec<TemperatureSegment>>,
    /// Sales funnel
    pub funnel: Section<Vec<FunnelStage>>,
    /// Email campaign table
    pub email_campaigns: Section<Vec<EmailCampaign>>,
    /// Social engagement
    pub social_media: Section<Vec<SocialPlatformMetric>>,
    /// Automation rule table
    pub automation_rules: Section<Vec<AutomationRule>>,
    /// GoHighLevel transfers
    pub ghl_transfers: Section<Vec<GhlTransferSegment>>,
    /// Activity feed
    pub recent_activities: Section<Vec<ActivityEvent>>,
}

impl DashboardView {
    /// Build the view for a payload, section by section
    ///
    /// A section present in the payload is used as is, even when it is an
    /// empty list or a partially filled overview. Only an absent section is
    /// replaced, and always by its complete fallback dataset.
    #[must_use]
    pub fn merge(payload: Option<&DashboardPayload>) -> Self {
        Self {
            overview: Section::pick(payload.and_then(|p| p.overview.as_ref()), fallback::overview),
            temperature: Section::pick(
                payload.and_then(|p| p.temperature_data.as_ref()),
                fallback::temperature,
            ),
            funnel: Section::pick(payload.and_then(|p| p.funnel_data.as_ref()), fallback::funnel),
            email_campaigns: Section::pick(
                payload.and_then(|p| p.email_campaigns.as_ref()),
                fallback::email_campaigns,
            ),
            social_media: Section::pick(
                payload.and_then(|p| p.social_media_data.as_ref()),
                fallback::social_media,
            ),
            automation_rules: Section::pick(
                payload.and_then(|p| p.automation_rules.as_ref()),
                fallback::automation_rules,
            ),
            ghl_transfers: Section::pick(
                payload.and_then(|p| p.ghl_transfers_data.as_ref()),
                fallback::ghl_transfers,
            ),
            recent_activities: Section::pick(
                payload.and_then(|p| p.recent_activities.as_ref()),
                fallback::recent_activities,
            ),
        }
    }

    /// Figures computed from the rows currently in view
    #[must_use]
    pub fn insights(&self) -> ViewInsights {
        ViewInsights {
            funnel_drops: insights::funnel_drops(&self.funnel.data),
            funnel: insights::funnel_summary(&self.funnel.data),
            email: insights::email_totals(&self.email_campaigns.data),
            social_total: insights::social_total(&self.social_media.data),
            automation: insights::automation_totals(&self.automation_rules.data),
            ghl: insights::ghl_breakdown(&self.ghl_transfers.data),
        }
    }
}

/// Derived figures bundled for rendering and the JSON API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewInsights {
    /// Drop between each pair of consecutive stages; `None` where a count is missing
    pub funnel_drops: Vec<Option<FunnelDrop>>,
    /// Funnel narrative
    pub funnel: FunnelSummary,
    /// Email totals row
    pub email: EmailTotals,
    /// Social engagements
    pub social_total: u64,
    /// Automation totals row
    pub automation: AutomationTotals,
    /// GHL totals and shares
    pub ghl: GhlBreakdown,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> DashboardPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_no_payload_is_all_fallback() {
        let view = DashboardView::merge(None);

        assert_eq!(view.overview.source, DataSource::Fallback);
        assert_eq!(view.overview.data, fallback::overview());
        assert_eq!(view.funnel.data, fallback::funnel());
        assert_eq!(view.recent_activities.data.len(), 5);
        assert_eq!(view.ghl_transfers.source, DataSource::Fallback);
    }

    #[test]
    fn test_empty_payload_matches_no_payload() {
        assert_eq!(
            DashboardView::merge(Some(&DashboardPayload::default())),
            DashboardView::merge(None)
        );
    }

    #[test]
    fn test_partial_overview_is_not_backfilled() {
        let view = DashboardView::merge(Some(&payload(json!({ "overview": { "successRate": 88 } }))));

        assert_eq!(view.overview.source, DataSource::Live);
        assert_eq!(view.overview.data.success_rate, Some(88.0));
        assert_eq!(view.overview.data.executed_today, None);
        assert_eq!(view.funnel.source, DataSource::Fallback);
    }

    #[test]
    fn test_live_list_replaces_whole_section() {
        let view = DashboardView::merge(Some(&payload(json!({
            "funnelData": [
                { "stage": "Contact", "count": 10, "percentage": 100, "color": "#7C3AED" },
            ],
        }))));

        assert_eq!(view.funnel.source, DataSource::Live);
        assert_eq!(view.funnel.data.len(), 1);
        assert_eq!(view.funnel.data[0].count, Some(10));
        assert!(view.insights().funnel_drops.is_empty());
    }

    #[test]
    fn test_empty_list_stays_empty() {
        let view = DashboardView::merge(Some(&payload(json!({ "emailCampaigns": [] }))));

        assert_eq!(view.email_campaigns.source, DataSource::Live);
        assert!(view.email_campaigns.data.is_empty());
        assert_eq!(view.insights().email.sent, 0);
    }

    #[test]
    fn test_merge_is_pure() {
        let input = payload(json!({ "overview": { "successRate": 50 } }));
        let snapshot = input.clone();

        let first = DashboardView::merge(Some(&input));
        let second = DashboardView::merge(Some(&input));

        assert_eq!(first, second);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_insights_follow_live_rows() {
        let view = DashboardView::merge(Some(&payload(json!({
            "ghlTransfersData": [
                { "name": "Hot Leads", "value": 3, "color": "#EF4444" },
                { "name": "MQLs", "value": 1, "color": "#F59E0B" },
            ],
        }))));

        let ghl = view.insights().ghl;
        assert_eq!(ghl.total, 4);
        assert_eq!(ghl.shares[0].percent, Some(75.0));
    }

    #[test]
    fn test_view_json_marks_sources() {
        let view = DashboardView::merge(Some(&payload(json!({ "overview": { "successRate": 88 } }))));
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["overview"]["source"], "live");
        assert_eq!(value["overview"]["data"]["successRate"], 88.0);
        assert_eq!(value["emailCampaigns"]["source"], "fallback");
    }

    #[test]
    fn test_row_with_missing_fields_stays_live() {
        let view = DashboardView::merge(Some(&payload(json!({
            "funnelData": [
                { "stage": "Contact", "count": 10, "percentage": 100 },
                { "stage": "Lead" },
            ],
        }))));

        assert_eq!(view.funnel.source, DataSource::Live);
        assert_eq!(view.funnel.data[1].count, None);
        assert_eq!(view.funnel.data[0].color, "");
        assert_eq!(view.insights().funnel_drops, [None]);
    }
}
