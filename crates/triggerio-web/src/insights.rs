//! Figures derived from live section data
//!
//! Everything here is computed from whatever rows the view holds, fallback
//! or live, so the summaries always agree with the tables they sit under.

use serde::Serialize;
use triggerio_core::{
    types::{AutomationRule, EmailCampaign, FunnelStage, GhlTransferSegment, SocialPlatformMetric},
    utils::format_fixed1,
};

/// Color coding of a rate cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Healthy
    Good,
    /// Borderline
    Warning,
    /// Needs attention
    Poor,
}

impl Tone {
    fn by_thresholds(value: f64, good: f64, warning: f64) -> Self {
        if value >= good {
            Self::Good
        } else if value >= warning {
            Self::Warning
        } else {
            Self::Poor
        }
    }

    /// Open rate: ≥30 good, ≥20 warning
    #[must_use]
    pub fn for_open_rate(rate: f64) -> Self {
        Self::by_thresholds(rate, 30.0, 20.0)
    }

    /// Click rate: ≥15 good, ≥10 warning
    #[must_use]
    pub fn for_click_rate(rate: f64) -> Self {
        Self::by_thresholds(rate, 15.0, 10.0)
    }

    /// Automation success: ≥95 good, ≥90 warning
    #[must_use]
    pub fn for_success_rate(rate: f64) -> Self {
        Self::by_thresholds(rate, 95.0, 90.0)
    }

    /// CSS class used by the page template
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Good => "tone-good",
            Self::Warning => "tone-warning",
            Self::Poor => "tone-poor",
        }
    }
}

/// Contacts lost between two consecutive funnel stages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelDrop {
    /// Upper stage
    pub from: String,
    /// Lower stage
    pub to: String,
    /// Contacts lost; negative when the lower stage is larger
    pub lost: i64,
    /// `lost` as a share of the upper stage; `None` when the upper stage is empty
    pub percent: Option<f64>,
}

impl FunnelDrop {
    /// Display form, e.g. `-391 (-31.4%)`
    #[must_use]
    pub fn label(&self) -> String {
        let sign = if self.lost >= 0 { '-' } else { '+' };
        let amount = self.lost.unsigned_abs();
        match self.percent {
            Some(percent) => format!("{sign}{amount} ({sign}{}%)", format_fixed1(percent.abs())),
            None => format!("{sign}{amount}"),
        }
    }
}

fn signed_difference(from: u64, to: u64) -> i64 {
    if from >= to {
        i64::try_from(from - to).unwrap_or(i64::MAX)
    } else {
        -i64::try_from(to - from).unwrap_or(i64::MAX)
    }
}

/// Sum of backend-supplied counts; missing values count as zero
pub(crate) fn total<T>(rows: &[T], value: impl Fn(&T) -> Option<u64>) -> u64 {
    rows.iter()
        .filter_map(value)
        .fold(0, u64::saturating_add)
}

/// Drop-off for every pair of consecutive stages
///
/// One entry per pair, in funnel order. A pair where either count is missing
/// has no drop.
#[must_use]
pub fn funnel_drops(stages: &[FunnelStage]) -> Vec<Option<FunnelDrop>> {
    stages
        .windows(2)
        .map(|pair| match pair {
            [prev, next] => {
                let (from, to) = (prev.count?, next.count?);
                let lost = signed_difference(from, to);
                Some(FunnelDrop {
                    from: prev.stage.clone(),
                    to: next.stage.clone(),
                    lost,
                    percent: (from > 0).then(|| lost as f64 / from as f64 * 100.0),
                })
            }
            _ => None,
        })
        .collect()
}

/// Share of one stage carried into the next
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Retention {
    /// Upper stage
    pub from: String,
    /// Lower stage
    pub to: String,
    /// Lower count as a share of the upper count
    pub percent: f64,
}

/// Funnel narrative figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelSummary {
    /// Last stage as a share of the first
    pub overall_conversion: Option<f64>,
    /// First stage name
    pub first_stage: Option<String>,
    /// Last stage name
    pub last_stage: Option<String>,
    /// Largest drop by contacts lost
    pub biggest_drop: Option<FunnelDrop>,
    /// Second-largest drop by contacts lost
    pub second_drop: Option<FunnelDrop>,
    /// Highest stage-to-stage retention
    pub best_retention: Option<Retention>,
}

/// Summarize a funnel
#[must_use]
pub fn funnel_summary(stages: &[FunnelStage]) -> FunnelSummary {
    let first = stages.first();
    let last = stages.last();

    let overall_conversion = match (first.and_then(|s| s.count), last.and_then(|s| s.count)) {
        (Some(first), Some(last)) if first > 0 => Some(last as f64 / first as f64 * 100.0),
        _ => None,
    };

    let mut drops: Vec<FunnelDrop> = funnel_drops(stages).into_iter().flatten().collect();
    // stable: ties keep funnel order
    drops.sort_by(|a, b| b.lost.cmp(&a.lost));
    let mut ranked = drops.into_iter();

    let best_retention = stages
        .windows(2)
        .filter_map(|pair| match pair {
            [prev, next] => match (prev.count, next.count) {
                (Some(from), Some(to)) if from > 0 => Some(Retention {
                    from: prev.stage.clone(),
                    to: next.stage.clone(),
                    percent: to as f64 / from as f64 * 100.0,
                }),
                _ => None,
            },
            _ => None,
        })
        .max_by(|a, b| a.percent.total_cmp(&b.percent));

    FunnelSummary {
        overall_conversion,
        first_stage: first.map(|s| s.stage.clone()),
        last_stage: last.map(|s| s.stage.clone()),
        biggest_drop: ranked.next(),
        second_drop: ranked.next(),
        best_retention,
    }
}

/// Campaign named in an insight line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignHighlight {
    /// Campaign name
    pub name: String,
    /// Its open rate
    pub open_rate: f64,
}

/// Totals row and insights of the email table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTotals {
    /// Emails sent across campaigns
    pub sent: u64,
    /// Revenue across campaigns
    pub revenue: f64,
    /// Send-weighted open rate
    pub open_rate: Option<f64>,
    /// Send-weighted click rate
    pub click_rate: Option<f64>,
    /// Send-weighted conversion rate
    pub conversion_rate: Option<f64>,
    /// Highest open rate
    pub best: Option<CampaignHighlight>,
    /// Lowest open rate
    pub worst: Option<CampaignHighlight>,
}

/// Rate averaged over the rows that carry both a weight and a rate
fn weighted_rate<T>(
    rows: &[T],
    weight: impl Fn(&T) -> Option<u64>,
    rate: impl Fn(&T) -> Option<f64>,
) -> Option<f64> {
    let (weights, weighted) = rows
        .iter()
        .filter_map(|row| Some((weight(row)?, rate(row)?)))
        .fold((0_u64, 0.0_f64), |(weights, weighted), (w, r)| {
            (weights.saturating_add(w), weighted + w as f64 * r)
        });
    (weights > 0).then(|| weighted / weights as f64)
}

/// Aggregate the email campaign table
#[must_use]
pub fn email_totals(campaigns: &[EmailCampaign]) -> EmailTotals {
    let rated = || {
        campaigns.iter().filter_map(|c| {
            c.opens.map(|open_rate| CampaignHighlight {
                name: c.name.clone(),
                open_rate,
            })
        })
    };

    EmailTotals {
        sent: total(campaigns, |c| c.sent),
        revenue: campaigns.iter().filter_map(|c| c.revenue).sum(),
        open_rate: weighted_rate(campaigns, |c| c.sent, |c| c.opens),
        click_rate: weighted_rate(campaigns, |c| c.sent, |c| c.clicks),
        conversion_rate: weighted_rate(campaigns, |c| c.sent, |c| c.conversion),
        best: rated().max_by(|a, b| a.open_rate.total_cmp(&b.open_rate)),
        worst: rated().min_by(|a, b| a.open_rate.total_cmp(&b.open_rate)),
    }
}

/// Totals row of the automation table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationTotals {
    /// Executions across rules
    pub executions: u64,
    /// Contacts added across rules
    pub contacts_added: u64,
    /// Execution-weighted success rate
    pub success_rate: Option<f64>,
}

/// Aggregate the automation table
#[must_use]
pub fn automation_totals(rules: &[AutomationRule]) -> AutomationTotals {
    AutomationTotals {
        executions: total(rules, |r| r.executions),
        contacts_added: total(rules, |r| r.contacts_added),
        success_rate: weighted_rate(rules, |r| r.executions, |r| r.success),
    }
}

/// Engagements across all platforms
#[must_use]
pub fn social_total(platforms: &[SocialPlatformMetric]) -> u64 {
    total(platforms, |p| p.count)
}

/// One GHL stage with its share of all transfers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferShare {
    /// Stage name
    pub name: String,
    /// Contacts transferred
    pub value: Option<u64>,
    /// Chart color
    pub color: String,
    /// Share of the total; `None` when nothing was transferred or the value is missing
    pub percent: Option<f64>,
}

/// GHL transfer totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhlBreakdown {
    /// Contacts transferred across stages
    pub total: u64,
    /// Per-stage shares
    pub shares: Vec<TransferShare>,
}

/// Break transfers down by stage
#[must_use]
pub fn ghl_breakdown(segments: &[GhlTransferSegment]) -> GhlBreakdown {
    let transferred = total(segments, |s| s.value);
    GhlBreakdown {
        total: transferred,
        shares: segments
            .iter()
            .map(|s| TransferShare {
                name: s.name.clone(),
                value: s.value,
                color: s.color.clone(),
                percent: s
                    .value
                    .filter(|_| transferred > 0)
                    .map(|value| value as f64 / transferred as f64 * 100.0),
            })
            .collect(),
    }
}
