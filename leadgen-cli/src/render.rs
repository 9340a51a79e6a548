//! Text rendering of view models.
//!
//! Consumes only controller outputs and typed API payloads; no business
//! logic lives here, so the whole layer is swappable.

use leadgen_core::results::{FilterSelection, PageView, StatSummary, ViewState, WebsiteFilter};
use leadgen_core::types::{
    CreditUsage, HealthStatus, ResearchReport, SeoIssue, SeoIssueReport, SeoReport, UsageStats,
};
use std::fmt::Write;

const COL_ID: usize = 5;
const COL_NAME: usize = 28;
const COL_SCORE: usize = 10;
const COL_RATING: usize = 6;
const COL_REVIEWS: usize = 7;
const COL_WEBSITE: usize = 30;
const COL_PHONE: usize = 15;

/// Truncate to `max` characters, marking the cut with a trailing period.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}.")
    }
}

pub fn render_results(page: &PageView, stats: &StatSummary, filter: &FilterSelection, state: ViewState) -> String {
    match state {
        ViewState::NoSearch => return "No search yet. Try: search coffee shop @ Seattle".to_string(),
        ViewState::NoResults => return "No businesses found.".to_string(),
        _ => {}
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", render_stats(stats));
    if !filter.is_empty() {
        let _ = writeln!(out, "{}", render_filter(filter));
    }

    let _ = writeln!(
        out,
        "{:<id$} {:<name$} {:<score$} {:<rating$} {:<reviews$} {:<website$} {:<phone$}",
        "ID",
        "Name",
        "Score",
        "Rating",
        "Reviews",
        "Website",
        "Phone",
        id = COL_ID,
        name = COL_NAME,
        score = COL_SCORE,
        rating = COL_RATING,
        reviews = COL_REVIEWS,
        website = COL_WEBSITE,
        phone = COL_PHONE,
    );

    for b in &page.items {
        let score = format!("{} {}", b.lead_score, b.lead_tier().label());
        let rating = b.rating.map(|r| format!("{r:.1}")).unwrap_or_default();
        let reviews = b.review_count.map(|c| c.to_string()).unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<id$} {:<name$} {:<score$} {:<rating$} {:<reviews$} {:<website$} {:<phone$}",
            b.id,
            clip(&b.name, COL_NAME),
            score,
            rating,
            reviews,
            clip(b.website.as_deref().unwrap_or(""), COL_WEBSITE),
            clip(b.phone.as_deref().unwrap_or(""), COL_PHONE),
            id = COL_ID,
            name = COL_NAME,
            score = COL_SCORE,
            rating = COL_RATING,
            reviews = COL_REVIEWS,
            website = COL_WEBSITE,
            phone = COL_PHONE,
        );
    }

    if state == ViewState::FilteredEmpty {
        let _ = writeln!(out, "(all results filtered out)");
    }
    let _ = write!(out, "{}", render_page_footer(page));
    out
}

pub fn render_page_footer(page: &PageView) -> String {
    if page.total_pages == 0 {
        format!("Page 0/0 - {} leads", page.total_filtered)
    } else {
        format!(
            "Page {}/{} - {} leads",
            page.page_index + 1,
            page.total_pages,
            page.total_filtered
        )
    }
}

pub fn render_stats(stats: &StatSummary) -> String {
    format!(
        "{} businesses - {} with website, {} without",
        stats.total, stats.with_website, stats.without_website
    )
}

fn render_filter(filter: &FilterSelection) -> String {
    let mut parts = Vec::new();
    match filter.website {
        WebsiteFilter::Any => {}
        WebsiteFilter::WithWebsite => parts.push("website: yes".to_string()),
        WebsiteFilter::WithoutWebsite => parts.push("website: no".to_string()),
    }
    if let Some(min) = filter.min_rating {
        parts.push(format!("rating >= {min}"));
    }
    format!("Filter: {}", parts.join(", "))
}

pub fn render_usage(usage: &UsageStats) -> String {
    format!(
        "API usage: {}/{} calls ({:.1}%)",
        usage.calls_used, usage.calls_limit, usage.percentage_used
    )
}

pub fn render_credit_usage(usage: &CreditUsage) -> String {
    format!(
        "Scrape credits: {}/{} used, {} remaining ({:.1}%)",
        usage.credits_used, usage.credits_limit, usage.credits_remaining, usage.percentage_used
    )
}

pub fn render_health(health: &HealthStatus) -> String {
    let mut out = format!("Backend status: {}", health.status);
    if !health.api_key_configured {
        out.push_str("\n  places API key not configured");
    }
    for error in &health.config_errors {
        let _ = write!(out, "\n  warning: {error}");
    }
    out
}

pub fn render_research(report: &ResearchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Company research - {}", report.business_name);
    if let Some(website) = &report.website {
        let _ = writeln!(out, "  website: {website}");
    }

    let r = &report.research;
    if let Some(title) = &r.page_title {
        let _ = writeln!(out, "  title: {title}");
    }
    if let Some(desc) = &r.meta_description {
        let _ = writeln!(out, "  description: {}", clip(desc, 120));
    }
    if !r.emails.is_empty() {
        let _ = writeln!(out, "  emails: {}", r.emails.join(", "));
    }
    if !r.phones.is_empty() {
        let _ = writeln!(out, "  phones: {}", r.phones.join(", "));
    }
    for (network, url) in &r.social_links {
        let _ = writeln!(out, "  {network}: {url}");
    }
    if !r.technologies.is_empty() {
        let _ = writeln!(out, "  technologies: {}", r.technologies.join(", "));
    }
    if let Some(at) = &r.scraped_at {
        let _ = writeln!(out, "  scraped at: {at}");
    }
    if let Some(usage) = &report.usage {
        let _ = writeln!(out, "{}", render_credit_usage(usage));
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_seo(report: &SeoReport) -> String {
    let mut out = String::new();
    let a = &report.analysis;
    let score = a
        .overall_score
        .map(|s| format!("{s:.0}"))
        .unwrap_or_else(|| "-".to_string());
    let grade = a.grade.as_deref().unwrap_or("-");
    let _ = writeln!(
        out,
        "SEO analysis - {} (score {score}, grade {grade})",
        report.business_name
    );

    let categories = [
        ("title", a.scores.title),
        ("meta", a.scores.meta),
        ("headings", a.scores.headings),
        ("content", a.scores.content),
        ("images", a.scores.images),
        ("links", a.scores.links),
        ("technical", a.scores.technical),
    ];
    for (name, score) in categories {
        if let Some(score) = score {
            let _ = writeln!(out, "  {name:<10} {score:>5.0}");
        }
    }

    if !a.issues.is_empty() {
        let _ = writeln!(out, "Issues:");
        for issue in &a.issues {
            let _ = writeln!(out, "{}", render_issue(issue));
        }
    }
    if !a.recommendations.is_empty() {
        let _ = writeln!(out, "Recommendations:");
        for rec in &a.recommendations {
            let _ = writeln!(out, "  - {rec}");
        }
    }
    if let Some(usage) = &report.firecrawl_usage {
        let _ = writeln!(out, "{}", render_credit_usage(usage));
    }
    out.truncate(out.trim_end().len());
    out
}

fn render_issue(issue: &SeoIssue) -> String {
    let category = issue
        .category
        .as_deref()
        .map(|c| format!(" [{c}]"))
        .unwrap_or_default();
    let mut line = format!("  [{}]{} {}", issue.severity.label(), category, issue.message);
    if let Some(impact) = &issue.impact {
        line.push_str(&format!("\n      impact: {impact}"));
    }
    line
}

pub fn render_issue_report(report: &SeoIssueReport) -> String {
    let mut out = String::new();
    let score = report
        .overall_score
        .map(|s| format!("{s:.0}"))
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        out,
        "SEO issues - {} (score {score}, grade {})",
        report.business_name,
        report.grade.as_deref().unwrap_or("-")
    );
    let s = &report.summary;
    let _ = writeln!(
        out,
        "  {} total: {} critical, {} warnings, {} info",
        s.total_issues, s.critical_count, s.warning_count, s.info_count
    );

    for (heading, issues) in [
        ("Critical", &report.critical_issues),
        ("Warnings", &report.warnings),
        ("Info", &report.info),
    ] {
        if !issues.is_empty() {
            let _ = writeln!(out, "{heading}:");
            for issue in issues {
                let _ = writeln!(out, "{}", render_issue(issue));
            }
        }
    }
    if !report.recommendations.is_empty() {
        let _ = writeln!(out, "Recommendations:");
        for rec in &report.recommendations {
            let _ = writeln!(out, "  - {rec}");
        }
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_error(message: &str) -> String {
    format!("error: {message}")
}

pub fn help_text() -> &'static str {
    "Commands:\n\
     \x20 search <query> @ <location> [radius_km] [max_results]\n\
     \x20 filter website any|yes|no | filter rating <min> | filter clear\n\
     \x20 next | prev | show          page through results\n\
     \x20 export [path]               write the filtered view as CSV\n\
     \x20 research <id>               scrape a business website\n\
     \x20 seo <id>                    run an SEO audit\n\
     \x20 issues <id>                 stored SEO issues, grouped\n\
     \x20 usage | stats | health      backend snapshots\n\
     \x20 help | quit"
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgen_core::results::{ResultSetController, WebsiteFilter};
    use leadgen_core::types::{Business, SearchResult};

    fn controller_with(n: usize) -> ResultSetController {
        let businesses = (0..n as u64)
            .map(|i| Business {
                id: i,
                place_id: None,
                name: format!("Biz {i}"),
                address: None,
                phone: None,
                website: Some("https://example.com".to_string()),
                rating: Some(4.2),
                review_count: Some(10),
                lead_score: 70,
            })
            .collect();
        let mut ctrl = ResultSetController::new();
        ctrl.set_search_result(SearchResult {
            search_id: 1,
            businesses,
        });
        ctrl
    }

    #[test]
    fn test_page_footer() {
        let ctrl = controller_with(25);
        assert_eq!(render_page_footer(&ctrl.page_view()), "Page 1/3 - 25 leads");

        let empty = ResultSetController::new();
        assert_eq!(render_page_footer(&empty.page_view()), "Page 0/0 - 0 leads");
    }

    #[test]
    fn test_results_table_lists_page_rows() {
        let ctrl = controller_with(12);
        let text = render_results(
            &ctrl.page_view(),
            &ctrl.stats(),
            &ctrl.filter(),
            ctrl.view_state(),
        );
        assert!(text.contains("Biz 0"));
        assert!(text.contains("70 HOT"));
        assert!(!text.contains("Biz 10")); // second page
        assert!(text.ends_with("Page 1/2 - 12 leads"));
    }

    #[test]
    fn test_filtered_empty_keeps_table_frame() {
        let mut ctrl = controller_with(3);
        ctrl.set_filter(FilterSelection {
            website: WebsiteFilter::WithoutWebsite,
            min_rating: None,
        });
        let text = render_results(
            &ctrl.page_view(),
            &ctrl.stats(),
            &ctrl.filter(),
            ctrl.view_state(),
        );
        // Header row still present, no data rows, distinct from "no results"
        assert!(text.contains("ID"));
        assert!(text.contains("(all results filtered out)"));
        assert!(!text.contains("No businesses found"));
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("exactly-10", 10), "exactly-10");
        assert_eq!(clip("much longer text", 8), "much lo.");
    }
}
