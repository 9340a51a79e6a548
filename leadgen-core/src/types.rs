//! Data types exchanged with the lead-generation API.
//!
//! All payloads are owned, serde-derived structs mirroring the backend's JSON
//! shapes. A `Business` is immutable once received; the client never rewrites
//! server-computed fields such as the lead score.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One business returned by a location search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: u64,
    #[serde(default)]
    pub place_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    /// Server-computed sales-lead quality, 0..=100. 0 when absent.
    #[serde(default)]
    pub lead_score: u32,
}

impl Business {
    /// Whether the business has a usable website URL.
    ///
    /// The backend stores missing websites as null, but scraped data
    /// occasionally carries an empty string; both count as "no website".
    pub fn has_website(&self) -> bool {
        self.website
            .as_deref()
            .is_some_and(|w| !w.trim().is_empty())
    }

    /// Display tier for the lead score.
    pub fn lead_tier(&self) -> LeadTier {
        LeadTier::from_score(self.lead_score)
    }
}

/// Lead quality tier, display-only classification of the 0..=100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadTier {
    Hot,  // score >= 65
    Warm, // score >= 35
    Cold,
}

impl LeadTier {
    pub fn from_score(score: u32) -> Self {
        if score >= 65 {
            LeadTier::Hot
        } else if score >= 35 {
            LeadTier::Warm
        } else {
            LeadTier::Cold
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadTier::Hot => "HOT",
            LeadTier::Warm => "WARM",
            LeadTier::Cold => "COLD",
        }
    }
}

/// Request body for `POST /api/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub location: String,
    pub radius_km: u32,
    pub max_results: u32,
}

/// Result of one search call. Replaces any prior result in full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub search_id: u64,
    #[serde(default)]
    pub businesses: Vec<Business>,
}

/// Places API usage snapshot from `GET /api/search/usage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStats {
    pub calls_used: u32,
    pub calls_limit: u32,
    #[serde(default)]
    pub percentage_used: f64,
}

/// Scraping-credit usage attached to research responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditUsage {
    pub credits_used: u32,
    pub credits_limit: u32,
    #[serde(default)]
    pub credits_remaining: u32,
    #[serde(default)]
    pub percentage_used: f64,
}

/// Scraped company data for one business.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyResearch {
    #[serde(default)]
    pub page_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub scraped_at: Option<String>,
}

/// Envelope returned by `POST /api/research/{id}` and `GET /api/research/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    #[serde(default)]
    pub business_id: u64,
    pub business_name: String,
    #[serde(default)]
    pub website: Option<String>,
    pub research: CompanyResearch,
    /// Present on POST responses only.
    #[serde(default)]
    pub usage: Option<CreditUsage>,
}

/// Issue severity, ordered most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    #[serde(other)]
    Info,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// One finding from the SEO audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoIssue {
    pub severity: Severity,
    #[serde(default)]
    pub category: Option<String>,
    pub message: String,
    #[serde(default)]
    pub impact: Option<String>,
}

/// Per-category sub-scores of the SEO audit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeoScores {
    #[serde(default)]
    pub title: Option<f64>,
    #[serde(default)]
    pub meta: Option<f64>,
    #[serde(default)]
    pub headings: Option<f64>,
    #[serde(default)]
    pub content: Option<f64>,
    #[serde(default)]
    pub images: Option<f64>,
    #[serde(default)]
    pub links: Option<f64>,
    #[serde(default)]
    pub technical: Option<f64>,
}

/// Full SEO audit for one website.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeoAnalysis {
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub scores: SeoScores,
    #[serde(default)]
    pub metrics: serde_json::Value,
    #[serde(default)]
    pub issues: Vec<SeoIssue>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
}

/// Envelope returned by `POST /api/seo/analyze/{id}` and `GET /api/seo/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoReport {
    #[serde(default)]
    pub business_id: u64,
    pub business_name: String,
    #[serde(default)]
    pub website: Option<String>,
    pub analysis: SeoAnalysis,
    /// Present on POST responses only.
    #[serde(default)]
    pub firecrawl_usage: Option<CreditUsage>,
}

/// Issue counts in a grouped issue report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueSummary {
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub total_issues: usize,
}

/// Issues grouped by severity, from `GET /api/seo/issues/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoIssueReport {
    #[serde(default)]
    pub business_id: u64,
    pub business_name: String,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub summary: IssueSummary,
    #[serde(default)]
    pub critical_issues: Vec<SeoIssue>,
    #[serde(default)]
    pub warnings: Vec<SeoIssue>,
    #[serde(default)]
    pub info: Vec<SeoIssue>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Liveness payload from `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub config_errors: Vec<String>,
    #[serde(default)]
    pub api_key_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_tier_thresholds() {
        assert_eq!(LeadTier::from_score(100), LeadTier::Hot);
        assert_eq!(LeadTier::from_score(65), LeadTier::Hot);
        assert_eq!(LeadTier::from_score(64), LeadTier::Warm);
        assert_eq!(LeadTier::from_score(35), LeadTier::Warm);
        assert_eq!(LeadTier::from_score(34), LeadTier::Cold);
        assert_eq!(LeadTier::from_score(0), LeadTier::Cold);
    }

    #[test]
    fn test_has_website() {
        let mut b: Business = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Corner Cafe"
        }))
        .unwrap();
        assert!(!b.has_website());

        b.website = Some(String::new());
        assert!(!b.has_website());

        b.website = Some("  ".to_string());
        assert!(!b.has_website());

        b.website = Some("https://example.com".to_string());
        assert!(b.has_website());
    }

    #[test]
    fn test_business_defaults() {
        let b: Business = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "No Frills Plumbing",
            "rating": null
        }))
        .unwrap();
        assert_eq!(b.lead_score, 0);
        assert!(b.rating.is_none());
        assert!(b.review_count.is_none());
        assert!(b.address.is_none());
    }

    #[test]
    fn test_severity_parsing() {
        let s: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(s, Severity::Critical);
        let s: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(s, Severity::Warning);
        // Unrecognized severities fall back to info
        let s: Severity = serde_json::from_str("\"notice\"").unwrap();
        assert_eq!(s, Severity::Info);
    }

    #[test]
    fn test_seo_report_parsing() {
        let report: SeoReport = serde_json::from_value(serde_json::json!({
            "business_id": 3,
            "business_name": "Bay Dental",
            "website": "https://baydental.example",
            "analysis": {
                "overall_score": 72.5,
                "grade": "B",
                "scores": {"title": 80.0, "technical": 60.0},
                "issues": [
                    {"severity": "critical", "category": "meta",
                     "message": "Missing meta description",
                     "impact": "Lower click-through rates"}
                ],
                "recommendations": ["Add a compelling meta description"]
            }
        }))
        .unwrap();
        assert_eq!(report.analysis.scores.title, Some(80.0));
        assert!(report.analysis.scores.meta.is_none());
        assert_eq!(report.analysis.issues.len(), 1);
        assert_eq!(report.analysis.issues[0].severity, Severity::Critical);
        assert!(report.firecrawl_usage.is_none());
    }
}
