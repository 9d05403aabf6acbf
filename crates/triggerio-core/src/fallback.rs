//! Sample datasets shown for any section the backend did not supply

use crate::types::{
    ActivityEvent, AutomationRule, EmailCampaign, FunnelStage, GhlTransferSegment,
    OverviewStats, SocialPlatformMetric, TemperatureSegment,
};

/// Overview card values
#[must_use]
pub fn overview() -> OverviewStats {
    OverviewStats {
        success_rate: Some(94.0),
        executed_today: Some(142),
        executed_today_change: Some("+15%".to_string()),
        active_rules: Some(18),
        active_rules_percentage: Some(78.0),
        total_rules: Some(23),
        total_rules_change: Some("+5".to_string()),
    }
}

/// Lead temperature buckets
#[must_use]
pub fn temperature() -> Vec<TemperatureSegment> {
    [
        ("Cold", 456, "#3B82F6", 36.6),
        ("Warm", 534, "#F59E0B", 42.8),
        ("Hot", 168, "#EF4444", 13.5),
        ("Frozen", 89, "#9CA3AF", 7.1),
    ]
    .into_iter()
    .map(|(name, value, color, percentage)| TemperatureSegment {
        name: name.to_string(),
        value: Some(value),
        color: color.to_string(),
        percentage: Some(percentage),
    })
    .collect()
}

/// Contact → Subscriber → Lead → MQL → SQL → Customer
#[must_use]
pub fn funnel() -> Vec<FunnelStage> {
    [
        ("Contact", 1247, 100.0, "#7C3AED"),
        ("Subscriber", 856, 68.6, "#8B5CF6"),
        ("Lead", 645, 51.7, "#A78BFA"),
        ("MQL", 423, 33.9, "#C4B5FD"),
        ("SQL", 234, 18.8, "#DDD6FE"),
        ("Customer", 89, 7.1, "#EDE9FE"),
    ]
    .into_iter()
    .map(|(stage, count, percentage, color)| FunnelStage {
        stage: stage.to_string(),
        count: Some(count),
        percentage: Some(percentage),
        color: color.to_string(),
    })
    .collect()
}

/// Email campaign rows
#[must_use]
pub fn email_campaigns() -> Vec<EmailCampaign> {
    [
        ("Welcome Series", 1234, 28.0, 12.0, 4.2, 2450.0),
        ("Product Launch", 892, 32.0, 18.0, 7.1, 5230.0),
        ("Re-engagement", 645, 18.0, 8.0, 2.1, 1120.0),
        ("Hot Lead Follow-up", 423, 45.0, 25.0, 12.3, 3650.0),
    ]
    .into_iter()
    .map(|(name, sent, opens, clicks, conversion, revenue)| EmailCampaign {
        name: name.to_string(),
        sent: Some(sent),
        opens: Some(opens),
        clicks: Some(clicks),
        conversion: Some(conversion),
        revenue: Some(revenue),
    })
    .collect()
}

/// Social engagement per platform
#[must_use]
pub fn social_media() -> Vec<SocialPlatformMetric> {
    [
        ("Instagram", 1234, 45.0),
        ("Facebook", 823, 30.0),
        ("Email", 549, 20.0),
        ("LinkedIn", 82, 3.0),
        ("Manual", 55, 2.0),
    ]
    .into_iter()
    .map(|(platform, count, percentage)| SocialPlatformMetric {
        platform: platform.to_string(),
        count: Some(count),
        percentage: Some(percentage),
    })
    .collect()
}

/// Automation rule rows
#[must_use]
pub fn automation_rules() -> Vec<AutomationRule> {
    [
        ("Auto Reply", 1456, 98.2, 423),
        ("Welcome Message", 892, 99.1, 278),
        ("Email Follow-up", 324, 95.4, 89),
        ("Hot Lead Alert", 127, 100.0, 45),
    ]
    .into_iter()
    .map(|(name, executions, success, contacts_added)| AutomationRule {
        name: name.to_string(),
        executions: Some(executions),
        success: Some(success),
        contacts_added: Some(contacts_added),
    })
    .collect()
}

/// GoHighLevel transfers per stage
#[must_use]
pub fn ghl_transfers() -> Vec<GhlTransferSegment> {
    [
        ("Hot Leads", 89, "#EF4444"),
        ("MQLs", 67, "#F59E0B"),
        ("SQLs", 45, "#3B82F6"),
        ("Customers", 33, "#10B981"),
    ]
    .into_iter()
    .map(|(name, value, color)| GhlTransferSegment {
        name: name.to_string(),
        value: Some(value),
        color: color.to_string(),
    })
    .collect()
}

/// Recent activity feed
#[must_use]
pub fn recent_activities() -> Vec<ActivityEvent> {
    [
        (
            "hot",
            "🔥",
            "John Doe moved to Hot",
            Some("Via: Email reply to \"Product Launch\""),
            "2 min ago",
            "#EF4444",
        ),
        (
            "campaign",
            "📧",
            "Campaign \"Welcome Series\" sent to 234 contacts",
            None,
            "15 min ago",
            "#7C3AED",
        ),
        (
            "automation",
            "⚡",
            "Automation \"Auto Reply\" executed for @ahmad",
            None,
            "23 min ago",
            "#10B981",
        ),
        (
            "transfer",
            "🚀",
            "Sara Ali transferred to GHL successfully",
            None,
            "45 min ago",
            "#3B82F6",
        ),
        (
            "payment",
            "💰",
            "Payment received: $299 from Ahmed Corp",
            Some("Plan: Professional (Annual)"),
            "1 hour ago",
            "#F59E0B",
        ),
    ]
    .into_iter()
    .map(|(kind, icon, message, detail, time, color)| ActivityEvent {
        kind: kind.to_string(),
        icon: icon.to_string(),
        message: message.to_string(),
        detail: detail.map(str::to_string),
        time: time.to_string(),
        color: color.to_string(),
    })
    .collect()
}
