//! Core library for the leadgen client.
//!
//! Holds the typed API client for the lead-generation backend and the
//! result-set controller that filters, paginates and exports search results.
//! Rendering lives in the frontend crate and only consumes the view models
//! produced here.

pub mod client;
pub mod error;
pub mod export;
pub mod results;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use results::{FilterSelection, PageView, ResultSetController, StatSummary, ViewState, WebsiteFilter, PAGE_SIZE};
