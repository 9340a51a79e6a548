//! Interactive session: wires the command parser, the API client and the
//! result-set controller together.

use crate::command::Command;
use crate::render;
use anyhow::Result;
use leadgen_core::client::ApiClient;
use leadgen_core::export;
use leadgen_core::results::{FilterSelection, ResultSetController};
use leadgen_core::types::{Business, SearchRequest, UsageStats};

/// Outcome of one handled command.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    Continue,
    Quit,
}

pub struct Session {
    client: ApiClient,
    controller: ResultSetController,
    usage: Option<UsageStats>,
    rendered_revision: u64,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            controller: ResultSetController::new(),
            usage: None,
            rendered_revision: 0,
        }
    }

    /// Fetch backend health and usage once at startup. Failures are
    /// non-fatal; the backend may come up later.
    pub async fn startup(&mut self) {
        match self.client.health().await {
            Ok(health) => println!("{}", render::render_health(&health)),
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                println!("{}", render::render_error(&e.to_string()));
            }
        }
        if let Ok(usage) = self.client.usage().await {
            println!("{}", render::render_usage(&usage));
            self.usage = Some(usage);
        }
    }

    /// Handle one parsed command, rendering output to stdout.
    pub async fn handle(&mut self, command: Command) -> Result<SessionOutcome> {
        match command {
            Command::Search {
                query,
                location,
                radius_km,
                max_results,
            } => self.run_search(query, location, radius_km, max_results).await,
            Command::FilterWebsite(website) => {
                let filter = FilterSelection {
                    website,
                    ..self.controller.filter()
                };
                self.controller.set_filter(filter);
            }
            Command::FilterRating(min) => {
                let filter = FilterSelection {
                    min_rating: Some(min),
                    ..self.controller.filter()
                };
                self.controller.set_filter(filter);
            }
            Command::FilterClear => self.controller.set_filter(FilterSelection::default()),
            Command::Next => {
                if !self.controller.next_page() {
                    println!("Already on the last page");
                }
            }
            Command::Prev => {
                if !self.controller.prev_page() {
                    println!("Already on the first page");
                }
            }
            Command::Show => self.render_results(),
            Command::Export { path } => self.export(path)?,
            Command::Research { business_id } => self.research(business_id).await,
            Command::Seo { business_id } => self.seo(business_id).await,
            Command::Issues { business_id } => self.issues(business_id).await,
            Command::Usage => self.show_usage().await,
            Command::Stats => match self.client.business_stats().await {
                Ok(stats) => match serde_json::to_string_pretty(&stats) {
                    Ok(text) => println!("{text}"),
                    Err(e) => println!("{}", render::render_error(&e.to_string())),
                },
                Err(e) => println!("{}", render::render_error(&e.to_string())),
            },
            Command::Health => match self.client.health().await {
                Ok(health) => println!("{}", render::render_health(&health)),
                Err(e) => println!("{}", render::render_error(&e.to_string())),
            },
            Command::Help => println!("{}", render::help_text()),
            Command::Quit => return Ok(SessionOutcome::Quit),
        }

        // Controller mutations re-render exactly once, whichever command
        // caused them.
        if self.controller.revision() != self.rendered_revision {
            self.render_results();
        }

        Ok(SessionOutcome::Continue)
    }

    fn render_results(&mut self) {
        let text = render::render_results(
            &self.controller.page_view(),
            &self.controller.stats(),
            &self.controller.filter(),
            self.controller.view_state(),
        );
        println!("{text}");
        self.rendered_revision = self.controller.revision();
    }

    /// Commands are handled one at a time: a search is awaited to completion
    /// before the next input line is read, so two searches can never overlap.
    async fn run_search(
        &mut self,
        query: String,
        location: String,
        radius_km: u32,
        max_results: u32,
    ) {
        let request = SearchRequest {
            query,
            location,
            radius_km,
            max_results,
        };
        match self.client.search(&request).await {
            Ok(result) => {
                tracing::info!(
                    search_id = result.search_id,
                    count = result.businesses.len(),
                    "Search completed"
                );
                self.controller.set_search_result(result);
                // The stat bar tracks API usage per search
                if let Ok(usage) = self.client.usage().await {
                    println!("{}", render::render_usage(&usage));
                    self.usage = Some(usage);
                }
            }
            Err(e) => println!("{}", render::render_error(&e.to_string())),
        }
    }

    fn export(&self, path: Option<String>) -> Result<()> {
        match self.controller.export_csv()? {
            None => {
                println!("Nothing to export - run a search first");
                Ok(())
            }
            Some(bytes) => {
                let path = path.unwrap_or_else(export::export_filename_today);
                std::fs::write(&path, &bytes)?;
                println!("Exported {} bytes to {path}", bytes.len());
                Ok(())
            }
        }
    }

    async fn research(&mut self, business_id: u64) {
        if let Err(refusal) = website_gate(self.controller.business(business_id), "research") {
            println!("{}", render::render_error(&refusal));
            return;
        }

        println!("Researching... this scrapes the website and can take a minute");
        match self.client.run_research(business_id).await {
            Ok(report) => println!("{}", render::render_research(&report)),
            Err(e) => println!("{}", render::render_error(&e.to_string())),
        }
    }

    async fn seo(&mut self, business_id: u64) {
        if let Err(refusal) = website_gate(self.controller.business(business_id), "analyze") {
            println!("{}", render::render_error(&refusal));
            return;
        }

        println!("Analyzing... this scrapes the website and can take a minute");
        match self.client.run_seo_analysis(business_id).await {
            Ok(report) => println!("{}", render::render_seo(&report)),
            Err(e) => println!("{}", render::render_error(&e.to_string())),
        }
    }

    async fn issues(&mut self, business_id: u64) {
        match self.client.seo_issues(business_id).await {
            Ok(Some(report)) => println!("{}", render::render_issue_report(&report)),
            Ok(None) => println!("No SEO analysis for business {business_id} yet - run 'seo {business_id}' first"),
            Err(e) => println!("{}", render::render_error(&e.to_string())),
        }
    }

    #[cfg(test)]
    pub(crate) fn controller_mut(&mut self) -> &mut ResultSetController {
        &mut self.controller
    }

    async fn show_usage(&mut self) {
        match self.client.usage().await {
            Ok(usage) => {
                println!("{}", render::render_usage(&usage));
                self.usage = Some(usage);
            }
            Err(e) => match &self.usage {
                Some(cached) => println!("{} (cached)", render::render_usage(cached)),
                None => println!("{}", render::render_error(&e.to_string())),
            },
        }
        match self.client.research_usage().await {
            Ok(credits) => println!("{}", render::render_credit_usage(&credits)),
            Err(e) => tracing::debug!("Credit usage unavailable: {}", e),
        }
    }
}

/// Research and SEO runs scrape the business website server-side; they are
/// only offered when a website exists, so refuse locally instead of
/// round-tripping a guaranteed 400.
fn website_gate(business: Option<&Business>, verb: &str) -> Result<(), String> {
    match business {
        None => Err("No such business in the current results".to_string()),
        Some(b) if !b.has_website() => Err(format!("Business has no website to {verb}")),
        Some(_) => Ok(()),
    }
}
