//! One template per dashboard card
//!
//! Builders turn view rows into display strings; a value the backend left
//! out becomes an empty cell rather than a zero.

use super::{
    charts::{BarChart, Donut, Slice, bar_chart, donut},
    opt_count, opt_percent, safe_color,
};
use crate::{
    filters::DateRange,
    insights::{FunnelDrop, Tone},
    view::{DashboardView, ViewInsights},
};
use askama::Template;
use triggerio_core::utils::{format_currency, format_fixed1, format_number, format_thousands};

/// Color-coded rate
#[derive(Debug, Clone)]
pub struct ToneCell {
    /// `tone-*` class
    pub class: &'static str,
    /// Rate with its percent sign
    pub value: String,
}

impl ToneCell {
    fn new(tone: Tone, value: &str) -> Self {
        Self {
            class: tone.css_class(),
            value: format!("{value}%"),
        }
    }

    fn row(rate: Option<f64>, tone: impl Fn(f64) -> Tone) -> Option<Self> {
        rate.map(|r| Self::new(tone(r), &format_number(r)))
    }

    fn total(rate: Option<f64>, tone: impl Fn(f64) -> Tone) -> Option<Self> {
        rate.map(|r| Self::new(tone(r), &format_fixed1(r)))
    }
}

/// Swatch, name, value and optional share
#[derive(Debug, Clone)]
pub struct LegendRow {
    /// Swatch color
    pub color: String,
    /// Segment name
    pub name: String,
    /// Segment value
    pub value: String,
    /// Share, e.g. `38.0%`
    pub share: Option<String>,
}

impl LegendRow {
    fn new(name: &str, color: &str, value: Option<u64>, share: Option<String>) -> Self {
        Self {
            color: safe_color(color).to_string(),
            name: name.to_string(),
            value: opt_count(value),
            share,
        }
    }
}

/// One headline card
#[derive(Debug, Clone)]
pub struct StatCard {
    /// Emoji icon
    pub icon: &'static str,
    /// Headline value
    pub value: String,
    /// Arabic label
    pub label: &'static str,
    /// English label
    pub english: &'static str,
    /// Caption under the label
    pub note: String,
}

/// Four headline cards
#[derive(Debug, Clone, Template)]
#[template(path = "components/overview.html")]
pub struct OverviewCards {
    /// `live` or `fallback`
    pub source: &'static str,
    /// Cards in display order
    pub cards: Vec<StatCard>,
}

/// Headline cards; missing counters render blank
#[must_use]
pub fn overview_cards(view: &DashboardView) -> OverviewCards {
    let o = &view.overview.data;
    let caption = |value: Option<String>, suffix: &str| {
        value.map(|v| format!("{v} {suffix}")).unwrap_or_default()
    };

    OverviewCards {
        source: view.overview.source.as_str(),
        cards: vec![
            StatCard {
                icon: "✅",
                value: opt_percent(o.success_rate),
                label: "معدل النجاح",
                english: "Success Rate",
                note: "ممتاز".to_string(),
            },
            StatCard {
                icon: "📈",
                value: opt_count(o.executed_today),
                label: "تم التنفيذ اليوم",
                english: "Executed Today",
                note: caption(o.executed_today_change.clone(), "من الأمس"),
            },
            StatCard {
                icon: "⚡",
                value: opt_count(o.active_rules),
                label: "قواعد نشطة",
                english: "Active Rules",
                note: caption(
                    o.active_rules_percentage.map(|p| format!("{}%", format_number(p))),
                    "من الإجمالي",
                ),
            },
            StatCard {
                icon: "📋",
                value: opt_count(o.total_rules),
                label: "إجمالي القواعد",
                english: "Total Rules",
                note: caption(o.total_rules_change.clone(), "من الشهر"),
            },
        ],
    }
}

/// Temperature donut, legend and transition metrics
#[derive(Debug, Clone, Template)]
#[template(path = "components/temperature.html")]
pub struct TemperatureCard {
    /// `live` or `fallback`
    pub source: &'static str,
    /// Donut chart
    pub chart: Donut,
    /// Legend rows
    pub legend: Vec<LegendRow>,
}

/// Temperature card for the view
#[must_use]
pub fn temperature(view: &DashboardView) -> TemperatureCard {
    let rows = &view.temperature.data;
    let slices: Vec<Slice<'_>> = rows
        .iter()
        .map(|r| Slice {
            label: &r.name,
            value: r.value.unwrap_or(0),
            color: &r.color,
        })
        .collect();

    TemperatureCard {
        source: view.temperature.source.as_str(),
        chart: donut(&slices, true),
        legend: rows
            .iter()
            .map(|r| {
                let share = r.percentage.map(|p| format!("{}%", format_number(p)));
                LegendRow::new(&r.name, &r.color, r.value, share)
            })
            .collect(),
    }
}

/// One funnel stage and the drop below it
#[derive(Debug, Clone)]
pub struct FunnelRow {
    /// Stage name
    pub stage: String,
    /// Contacts at this stage
    pub count: String,
    /// Share of the first stage
    pub percentage: Option<String>,
    /// Bar width in percent
    pub width: String,
    /// Bar color
    pub color: String,
    /// Drop to the next stage
    pub drop: Option<String>,
}

/// Funnel bars with the conversion summary
#[derive(Debug, Clone, Template)]
#[template(path = "components/funnel.html")]
pub struct FunnelCard {
    /// `live` or `fallback`
    pub source: &'static str,
    /// Stages top to bottom
    pub rows: Vec<FunnelRow>,
    /// `7.1% (Contact → Customer)`
    pub conversion: Option<String>,
    /// Bullet points under the conversion rate
    pub points: Vec<String>,
}

fn drop_copy(drop: &FunnelDrop) -> String {
    format!("{} → {} ({})", drop.from, drop.to, drop.label())
}

/// Funnel card for the view
#[must_use]
pub fn funnel(view: &DashboardView, insights: &ViewInsights) -> FunnelCard {
    let rows = view
        .funnel
        .data
        .iter()
        .enumerate()
        .map(|(index, stage)| FunnelRow {
            stage: stage.stage.clone(),
            count: opt_count(stage.count),
            percentage: stage.percentage.map(|p| format!("{}%", format_number(p))),
            width: format_number(stage.percentage.unwrap_or(0.0).clamp(0.0, 100.0)),
            color: safe_color(&stage.color).to_string(),
            drop: insights
                .funnel_drops
                .get(index)
                .and_then(Option::as_ref)
                .map(FunnelDrop::label),
        })
        .collect();

    let summary = &insights.funnel;
    let mut points = Vec::new();
    if let Some(drop) = &summary.biggest_drop {
        points.push(format!("• Biggest drop: {}", drop_copy(drop)));
    }
    if let Some(drop) = &summary.second_drop {
        points.push(format!("• Second drop: {}", drop_copy(drop)));
    }
    if let Some(best) = &summary.best_retention {
        points.push(format!(
            "• Best retention: {} → {} ({}%)",
            best.from,
            best.to,
            format_fixed1(best.percent)
        ));
    }
    let conversion = match (
        summary.overall_conversion,
        &summary.first_stage,
        &summary.last_stage,
    ) {
        (Some(rate), Some(first), Some(last)) => {
            Some(format!("{}% ({first} → {last})", format_fixed1(rate)))
        }
        _ => None,
    };

    FunnelCard {
        source: view.funnel.source.as_str(),
        rows,
        conversion,
        points,
    }
}

/// One campaign row
#[derive(Debug, Clone)]
pub struct CampaignRow {
    /// Campaign name
    pub name: String,
    /// Emails sent
    pub sent: String,
    /// Open rate
    pub opens: Option<ToneCell>,
    /// Click rate
    pub clicks: Option<ToneCell>,
    /// Conversion rate
    pub conversion: String,
    /// Revenue
    pub revenue: String,
}

/// Email summary cards, campaign table and best/worst insight
#[derive(Debug, Clone, Template)]
#[template(path = "components/email_campaigns.html")]
pub struct EmailCard {
    /// `live` or `fallback`
    pub source: &'static str,
    /// Emails sent across campaigns
    pub sent: String,
    /// Weighted open rate
    pub open_rate: String,
    /// Weighted click rate
    pub click_rate: String,
    /// Campaign rows
    pub rows: Vec<CampaignRow>,
    /// Totals row
    pub total: CampaignRow,
    /// `name (x% open rate)` of the best campaign
    pub best: Option<String>,
    /// `name (x% open rate)` of the worst campaign
    pub worst: Option<String>,
}

/// Email card for the view
#[must_use]
pub fn email_campaigns(view: &DashboardView, insights: &ViewInsights) -> EmailCard {
    let totals = &insights.email;
    let rate = |v: Option<f64>| v.map(|v| format!("{}%", format_fixed1(v))).unwrap_or_default();
    let highlight = |name: &str, open_rate: f64| {
        format!("{name} ({}% open rate)", format_number(open_rate))
    };

    EmailCard {
        source: view.email_campaigns.source.as_str(),
        sent: format_thousands(totals.sent),
        open_rate: rate(totals.open_rate),
        click_rate: rate(totals.click_rate),
        rows: view
            .email_campaigns
            .data
            .iter()
            .map(|c| CampaignRow {
                name: c.name.clone(),
                sent: opt_count(c.sent),
                opens: ToneCell::row(c.opens, Tone::for_open_rate),
                clicks: ToneCell::row(c.clicks, Tone::for_click_rate),
                conversion: opt_percent(c.conversion),
                revenue: c.revenue.map(format_currency).unwrap_or_default(),
            })
            .collect(),
        total: CampaignRow {
            name: "Total".to_string(),
            sent: format_thousands(totals.sent),
            opens: ToneCell::total(totals.open_rate, Tone::for_open_rate),
            clicks: ToneCell::total(totals.click_rate, Tone::for_click_rate),
            conversion: rate(totals.conversion_rate),
            revenue: format_currency(totals.revenue),
        },
        best: totals.best.as_ref().map(|b| highlight(&b.name, b.open_rate)),
        worst: totals.worst.as_ref().map(|w| highlight(&w.name, w.open_rate)),
    }
}

/// Engagement bars, total and per-platform breakdowns
#[derive(Debug, Clone, Template)]
#[template(path = "components/social_media.html")]
pub struct SocialCard {
    /// `live` or `fallback`
    pub source: &'static str,
    /// Engagements per platform
    pub chart: BarChart,
    /// Engagements across platforms
    pub total: String,
}

/// Social card for the view
#[must_use]
pub fn social_media(view: &DashboardView, insights: &ViewInsights) -> SocialCard {
    let bars: Vec<(&str, Option<u64>)> = view
        .social_media
        .data
        .iter()
        .map(|p| (p.platform.as_str(), p.count))
        .collect();

    SocialCard {
        source: view.social_media.source.as_str(),
        chart: bar_chart(&bars, "#7C3AED"),
        total: format_thousands(insights.social_total),
    }
}

/// One automation rule row
#[derive(Debug, Clone)]
pub struct RuleRow {
    /// Rule name
    pub name: String,
    /// Times the rule ran
    pub executions: String,
    /// Success rate
    pub success: Option<ToneCell>,
    /// Contacts the rule added
    pub contacts_added: String,
}

/// Automation table with totals, milestones and save categories
#[derive(Debug, Clone, Template)]
#[template(path = "components/automation_rules.html")]
pub struct AutomationCard {
    /// `live` or `fallback`
    pub source: &'static str,
    /// Rule count from the overview
    pub active_rules: String,
    /// Label of the selected date range
    pub date_label: &'static str,
    /// Rule rows
    pub rows: Vec<RuleRow>,
    /// Totals row
    pub total: RuleRow,
}

/// Automation card for the view
#[must_use]
pub fn automation_rules(
    view: &DashboardView,
    insights: &ViewInsights,
    date_range: DateRange,
) -> AutomationCard {
    let totals = &insights.automation;
    AutomationCard {
        source: view.automation_rules.source.as_str(),
        active_rules: opt_count(view.overview.data.total_rules),
        date_label: date_range.label(),
        rows: view
            .automation_rules
            .data
            .iter()
            .map(|r| RuleRow {
                name: r.name.clone(),
                executions: opt_count(r.executions),
                success: ToneCell::row(r.success, Tone::for_success_rate),
                contacts_added: opt_count(r.contacts_added),
            })
            .collect(),
        total: RuleRow {
            name: "Total".to_string(),
            executions: format_thousands(totals.executions),
            success: ToneCell::total(totals.success_rate, Tone::for_success_rate),
            contacts_added: format_thousands(totals.contacts_added),
        },
    }
}

/// Transfer cards, pie, per-stage shares and failed transfers
#[derive(Debug, Clone, Template)]
#[template(path = "components/ghl_transfers.html")]
pub struct GhlCard {
    /// `live` or `fallback`
    pub source: &'static str,
    /// Contacts transferred
    pub total: String,
    /// Pie chart
    pub chart: Donut,
    /// Per-stage shares
    pub breakdown: Vec<LegendRow>,
}

/// GHL card for the view
#[must_use]
pub fn ghl_transfers(view: &DashboardView, insights: &ViewInsights) -> GhlCard {
    let ghl = &insights.ghl;
    let slices: Vec<Slice<'_>> = ghl
        .shares
        .iter()
        .map(|s| Slice {
            label: &s.name,
            value: s.value.unwrap_or(0),
            color: &s.color,
        })
        .collect();

    GhlCard {
        source: view.ghl_transfers.source.as_str(),
        total: format_thousands(ghl.total),
        chart: donut(&slices, false),
        breakdown: ghl
            .shares
            .iter()
            .map(|s| {
                let share = s.percent.map(|p| format!("{}%", format_fixed1(p)));
                LegendRow::new(&s.name, &s.color, s.value, share)
            })
            .collect(),
    }
}

/// One feed entry
#[derive(Debug, Clone)]
pub struct ActivityItem {
    /// Event type, used as a class suffix
    pub kind: String,
    /// Emoji icon
    pub icon: String,
    /// Headline
    pub message: String,
    /// Secondary line
    pub detail: Option<String>,
    /// Relative time
    pub time: String,
    /// Icon background
    pub tint: String,
}

/// Activity feed
#[derive(Debug, Clone, Template)]
#[template(path = "components/recent_activities.html")]
pub struct ActivityFeed {
    /// `live` or `fallback`
    pub source: &'static str,
    /// Entries newest first
    pub items: Vec<ActivityItem>,
}

/// Activity feed for the view
#[must_use]
pub fn recent_activities(view: &DashboardView) -> ActivityFeed {
    ActivityFeed {
        source: view.recent_activities.source.as_str(),
        items: view
            .recent_activities
            .data
            .iter()
            .map(|a| {
                // 8-digit hex adds the alpha channel to a 6-digit color
                let tint = match safe_color(&a.color) {
                    color if color.len() == 7 => format!("{color}20"),
                    color => color.to_string(),
                };
                ActivityItem {
                    kind: a.kind.clone(),
                    icon: a.icon.clone(),
                    message: a.message.clone(),
                    detail: a.detail.clone(),
                    time: a.time.clone(),
                    tint,
                }
            })
            .collect(),
    }
}
