use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub contractor_id: Uuid,
    pub project_title: String,
    pub project_type: String,
    pub description: String,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub timeline: Option<String>,
    pub location: Option<String>,
    pub job_id: Option<Uuid>,
}

impl QuoteRequest {
    pub fn has_valid_budget(&self) -> bool {
        match (self.budget_min, self.budget_max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    pub fn budget_range(&self) -> Option<String> {
        match (self.budget_min, self.budget_max) {
            (Some(min), Some(max)) => Some(format!("£{min} - £{max}")),
            (Some(min), None) => Some(format!("from £{min}")),
            (None, Some(max)) => Some(format!("up to £{max}")),
            (None, None) => None,
        }
    }

    pub fn subject(&self) -> String {
        format!("Quote request: {}", self.project_title)
    }

    /// Renders the structured first message of a quote request.
    pub fn message_content(&self) -> String {
        let mut content = format!("Quote request: {}\n\n", self.project_title);
        let _ = writeln!(content, "Project type: {}", self.project_type);
        if let Some(budget) = self.budget_range() {
            let _ = writeln!(content, "Budget: {budget}");
        }
        if let Some(timeline) = &self.timeline {
            let _ = writeln!(content, "Timeline: {timeline}");
        }
        if let Some(location) = &self.location {
            let _ = writeln!(content, "Location: {location}");
        }
        if !self.description.trim().is_empty() {
            let _ = write!(content, "\n{}", self.description.trim());
        }
        content.trim_end().to_string()
    }

    pub fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "contractorId": self.contractor_id,
            "projectTitle": self.project_title,
            "projectType": self.project_type,
            "budgetMin": self.budget_min,
            "budgetMax": self.budget_max,
            "timeline": self.timeline,
            "location": self.location,
            "jobId": self.job_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestOutcome {
    pub success: bool,
    pub conversation_id: Option<Uuid>,
    pub message_id: Option<Uuid>,
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest {
            contractor_id: Uuid::new_v4(),
            project_title: "Roof repair".to_string(),
            project_type: "Roofing".to_string(),
            description: "Several slates missing after the storm.".to_string(),
            budget_min: Some(Decimal::new(1500, 0)),
            budget_max: Some(Decimal::new(3000, 0)),
            timeline: Some("Within 2 weeks".to_string()),
            location: None,
            job_id: None,
        }
    }

    #[test]
    fn message_content_embeds_project_metadata() {
        let content = request().message_content();
        assert!(content.starts_with("Quote request: Roof repair"));
        assert!(content.contains("Project type: Roofing"));
        assert!(content.contains("Budget: £1500 - £3000"));
        assert!(content.contains("Timeline: Within 2 weeks"));
        assert!(!content.contains("Location:"));
        assert!(content.ends_with("Several slates missing after the storm."));
    }

    #[test]
    fn inverted_budget_is_invalid() {
        let mut request = request();
        request.budget_min = Some(Decimal::new(5000, 0));
        assert!(!request.has_valid_budget());
        request.budget_max = None;
        assert!(request.has_valid_budget());
        assert_eq!(request.budget_range().as_deref(), Some("from £5000"));
    }
}
