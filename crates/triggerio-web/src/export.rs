//! CSV export of the tabular dashboard sections

use crate::view::DashboardView;
use serde::Serialize;
use triggerio_core::{Error, Result};

/// Sections offered in the export menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSection {
    /// Lead temperature buckets
    Temperature,
    /// Funnel stages
    Funnel,
    /// Email campaign table
    EmailCampaigns,
    /// Social engagement counts
    Social,
    /// Automation rule table
    AutomationRules,
    /// GHL transfers per stage
    GhlTransfers,
}

impl ExportSection {
    /// Every exportable section, in menu order
    pub const ALL: [Self; 6] = [
        Self::Temperature,
        Self::Funnel,
        Self::EmailCampaigns,
        Self::Social,
        Self::AutomationRules,
        Self::GhlTransfers,
    ];

    /// Query value of `?section=`
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Funnel => "funnel",
            Self::EmailCampaigns => "email_campaigns",
            Self::Social => "social",
            Self::AutomationRules => "automation_rules",
            Self::GhlTransfers => "ghl_transfers",
        }
    }

    /// Menu label
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature Distribution",
            Self::Funnel => "Sales Funnel",
            Self::EmailCampaigns => "Email Campaigns",
            Self::Social => "Social Media Engagement",
            Self::AutomationRules => "Automation Rules",
            Self::GhlTransfers => "GoHighLevel Transfers",
        }
    }

    /// Parse a `?section=` value
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unknown section name.
    pub fn parse(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_query() == value)
            .ok_or_else(|| Error::Validation {
                field: "section".to_string(),
                message: format!("unknown export section '{value}'"),
            })
    }

    /// Download file name
    #[must_use]
    pub fn file_name(self) -> String {
        format!("triggerio-{}.csv", self.as_query())
    }
}

fn write_rows<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| Error::Other(format!("CSV serialization failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Other(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(format!("CSV output is not UTF-8: {e}")))
}

/// Export the rows of one section exactly as they are displayed
///
/// # Errors
///
/// Returns an error if a row cannot be written as CSV.
pub fn export_csv(view: &DashboardView, section: ExportSection) -> Result<String> {
    match section {
        ExportSection::Temperature => write_rows(&view.temperature.data),
        ExportSection::Funnel => write_rows(&view.funnel.data),
        ExportSection::EmailCampaigns => write_rows(&view.email_campaigns.data),
        ExportSection::Social => write_rows(&view.social_media.data),
        ExportSection::AutomationRules => write_rows(&view.automation_rules.data),
        ExportSection::GhlTransfers => write_rows(&view.ghl_transfers.data),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_sections() {
        for section in ExportSection::ALL {
            assert_eq!(ExportSection::parse(section.as_query()).unwrap(), section);
        }
        assert!(matches!(
            ExportSection::parse("pdf"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_fallback_email_export() {
        let csv = export_csv(&DashboardView::merge(None), ExportSection::EmailCampaigns).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("name,sent,opens,clicks,conversion,revenue"));
        assert_eq!(lines.next(), Some("Welcome Series,1234,28.0,12.0,4.2,2450.0"));
        assert_eq!(csv.lines().count(), 5);
    }

    #[test]
    fn test_automation_export_uses_wire_names() {
        let csv = export_csv(&DashboardView::merge(None), ExportSection::AutomationRules).unwrap();

        assert!(csv.starts_with("name,executions,success,contactsAdded\n"));
        assert!(csv.contains("Hot Lead Alert,127,100.0,45"));
    }

    #[test]
    fn test_missing_values_export_as_empty_cells() {
        let payload: triggerio_core::DashboardPayload = serde_json::from_value(serde_json::json!({
            "funnelData": [{ "stage": "Lead", "count": 12 }],
        }))
        .unwrap();
        let csv = export_csv(&DashboardView::merge(Some(&payload)), ExportSection::Funnel).unwrap();

        assert_eq!(csv, "stage,count,percentage,color\nLead,12,,\n");
    }

    #[test]
    fn test_empty_section_exports_nothing() {
        let payload = triggerio_core::DashboardPayload {
            funnel_data: Some(Vec::new()),
            ..Default::default()
        };
        let csv = export_csv(&DashboardView::merge(Some(&payload)), ExportSection::Funnel).unwrap();

        assert_eq!(csv, "");
    }
}
