//! Display records for the analytics dashboard and the payload that carries them

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

/// Headline counters shown in the four overview cards
///
/// Every field is optional: a backend that sends a partial overview gets
/// blanks for the missing counters, never the fallback values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    /// Automation success rate in percent
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    /// Rule executions today
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub executed_today: Option<u64>,
    /// Change against yesterday, preformatted (e.g. `+15%`)
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub executed_today_change: Option<String>,
    /// Currently active rules
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub active_rules: Option<u64>,
    /// Active rules as a share of all rules
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub active_rules_percentage: Option<f64>,
    /// All rules
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total_rules: Option<u64>,
    /// Change against last month, preformatted (e.g. `+5`)
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total_rules_change: Option<String>,
}

// Row fields follow the same rule as the overview: a missing or mistyped
// value is blank, the row itself is kept. Options are serialized as `null`
// (empty CSV cells) so every row has the same columns.

/// One lead-temperature bucket (Cold, Warm, Hot, Frozen)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSegment {
    /// Bucket name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Contacts in the bucket
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<u64>,
    /// Chart color
    #[serde(default, deserialize_with = "lenient_text")]
    pub color: String,
    /// Share of all contacts in percent
    #[serde(default, deserialize_with = "lenient")]
    pub percentage: Option<f64>,
}

/// One step of the acquisition funnel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelStage {
    /// Stage name
    #[serde(default, deserialize_with = "lenient_text")]
    pub stage: String,
    /// Contacts that reached this stage
    #[serde(default, deserialize_with = "lenient")]
    pub count: Option<u64>,
    /// Share of the first stage in percent
    #[serde(default, deserialize_with = "lenient")]
    pub percentage: Option<f64>,
    /// Bar color
    #[serde(default, deserialize_with = "lenient_text")]
    pub color: String,
}

/// Summary row of one email campaign
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailCampaign {
    /// Campaign name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Emails sent
    #[serde(default, deserialize_with = "lenient")]
    pub sent: Option<u64>,
    /// Open rate in percent
    #[serde(default, deserialize_with = "lenient")]
    pub opens: Option<f64>,
    /// Click rate in percent
    #[serde(default, deserialize_with = "lenient")]
    pub clicks: Option<f64>,
    /// Conversion rate in percent
    #[serde(default, deserialize_with = "lenient")]
    pub conversion: Option<f64>,
    /// Attributed revenue in dollars
    #[serde(default, deserialize_with = "lenient")]
    pub revenue: Option<f64>,
}

/// Engagement count for one social platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialPlatformMetric {
    /// Platform name
    #[serde(default, deserialize_with = "lenient_text")]
    pub platform: String,
    /// Engagements
    #[serde(default, deserialize_with = "lenient")]
    pub count: Option<u64>,
    /// Share of all engagements in percent
    #[serde(default, deserialize_with = "lenient")]
    pub percentage: Option<f64>,
}

/// Summary row of one automation rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRule {
    /// Rule name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Executions in the period
    #[serde(default, deserialize_with = "lenient")]
    pub executions: Option<u64>,
    /// Success rate in percent
    #[serde(default, deserialize_with = "lenient")]
    pub success: Option<f64>,
    /// Contacts added by the rule
    #[serde(default, deserialize_with = "lenient")]
    pub contacts_added: Option<u64>,
}

/// Contacts transferred to GoHighLevel for one stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GhlTransferSegment {
    /// Stage name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Contacts transferred
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<u64>,
    /// Chart color
    #[serde(default, deserialize_with = "lenient_text")]
    pub color: String,
}

/// One entry of the recent activity feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Event kind (`hot`, `campaign`, `automation`, `transfer`, `payment`, ...)
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub kind: String,
    /// Emoji icon
    #[serde(default, deserialize_with = "lenient_text")]
    pub icon: String,
    /// Headline
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    /// Optional second line
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Relative time label (e.g. `2 min ago`)
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: String,
    /// Accent color
    #[serde(default, deserialize_with = "lenient_text")]
    pub color: String,
}

/// Body of the dashboard analytics endpoint
///
/// Any subset of sections may be missing or `null`. A list section that is
/// not a JSON array (or an overview that is not an object) is logged and
/// treated as missing, so it falls back on its own instead of failing the
/// whole payload. Inside a supplied list, rows that are not objects are
/// dropped and rows with missing or mistyped fields are kept with blanks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    /// Overview cards
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub overview: Option<OverviewStats>,
    /// Temperature distribution
    #[serde(default, deserialize_with = "lenient_rows", skip_serializing_if = "Option::is_none")]
    pub temperature_data: Option<Vec<TemperatureSegment>>,
    /// Sales funnel
    #[serde(default, deserialize_with = "lenient_rows", skip_serializing_if = "Option::is_none")]
    pub funnel_data: Option<Vec<FunnelStage>>,
    /// Email campaign table
    #[serde(default, deserialize_with = "lenient_rows", skip_serializing_if = "Option::is_none")]
    pub email_campaigns: Option<Vec<EmailCampaign>>,
    /// Social engagement chart
    #[serde(default, deserialize_with = "lenient_rows", skip_serializing_if = "Option::is_none")]
    pub social_media_data: Option<Vec<SocialPlatformMetric>>,
    /// Automation rule table
    #[serde(default, deserialize_with = "lenient_rows", skip_serializing_if = "Option::is_none")]
    pub automation_rules: Option<Vec<AutomationRule>>,
    /// GoHighLevel transfer chart
    #[serde(default, deserialize_with = "lenient_rows", skip_serializing_if = "Option::is_none")]
    pub ghl_transfers_data: Option<Vec<GhlTransferSegment>>,
    /// Activity feed
    #[serde(default, deserialize_with = "lenient_rows", skip_serializing_if = "Option::is_none")]
    pub recent_activities: Option<Vec<ActivityEvent>>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                warn!("Ignoring malformed dashboard value: {}", e);
                Ok(None)
            }
        },
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = lenient(deserializer)?;
    Ok(text.unwrap_or_default())
}

fn lenient_rows<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| match serde_json::from_value(item) {
                    Ok(row) => Some(row),
                    Err(e) => {
                        warn!("Dropping malformed dashboard row: {}", e);
                        None
                    }
                })
                .collect(),
        )),
        Some(_) => {
            warn!("Ignoring dashboard section that is not a list");
            Ok(None)
        }
    }
}

/// Sum of a breakdown's percentages; breakdowns are expected to land near 100
///
/// Rows without a percentage count as zero.
#[must_use]
pub fn percentages_sum<T>(items: &[T], percentage: impl Fn(&T) -> Option<f64>) -> f64 {
    items.iter().filter_map(percentage).sum()
}

/// Whether funnel counts never grow from one stage to the next
///
/// Pairs with a missing count are not compared.
#[must_use]
pub fn is_non_increasing(stages: &[FunnelStage]) -> bool {
    stages.windows(2).all(|pair| match pair {
        [prev, next] => match (prev.count, next.count) {
            (Some(prev), Some(next)) => next <= prev,
            _ => true,
        },
        _ => true,
    })
}
