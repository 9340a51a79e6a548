//! Result-set controller: filter -> paginate -> view model.
//!
//! Owns the current search result, the active filter selection and the page
//! index as one explicit state object. Mutations bump a revision counter; the
//! rendering layer re-renders when the revision moves instead of being called
//! from inside business logic.

use crate::export;
use crate::types::{Business, SearchResult};
use anyhow::Result;

/// Rows per page in the results table.
pub const PAGE_SIZE: usize = 10;

/// Tri-state website-presence filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebsiteFilter {
    #[default]
    Any,
    /// Only businesses with a website.
    WithWebsite,
    /// Only businesses without a website.
    WithoutWebsite,
}

/// Transient filter selection. Survives pagination, not a new search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterSelection {
    pub website: WebsiteFilter,
    pub min_rating: Option<f64>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.website == WebsiteFilter::Any && self.min_rating.is_none()
    }

    /// Website predicate first, then the rating threshold. A business with no
    /// rating fails every threshold, including 0.
    fn matches(&self, business: &Business) -> bool {
        let website_ok = match self.website {
            WebsiteFilter::Any => true,
            WebsiteFilter::WithWebsite => business.has_website(),
            WebsiteFilter::WithoutWebsite => !business.has_website(),
        };
        if !website_ok {
            return false;
        }
        match self.min_rating {
            None => true,
            Some(min) => business.rating.is_some_and(|r| r >= min),
        }
    }
}

/// One renderable page of the filtered view.
#[derive(Debug, Clone)]
pub struct PageView {
    pub items: Vec<Business>,
    pub page_index: usize,
    pub total_pages: usize,
    pub total_filtered: usize,
}

/// Counts over the full unfiltered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatSummary {
    pub total: usize,
    pub with_website: usize,
    pub without_website: usize,
}

/// Which empty/non-empty state the view is in. Filtered-to-zero keeps the
/// table frame with an empty body and is distinct from a zero-result search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No search has been run yet.
    NoSearch,
    /// The search itself returned zero businesses.
    NoResults,
    /// The search has results but the filter removed all of them.
    FilteredEmpty,
    Results,
}

/// Controller for the current search result list.
#[derive(Debug, Default)]
pub struct ResultSetController {
    search: Option<SearchResult>,
    filter: FilterSelection,
    page: usize,
    revision: u64,
}

impl ResultSetController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored result set. Clears the filter and returns to the
    /// first page.
    pub fn set_search_result(&mut self, result: SearchResult) {
        self.search = Some(result);
        self.filter = FilterSelection::default();
        self.page = 0;
        self.revision += 1;
    }

    /// Replace the filter selection and return to the first page. The
    /// underlying result set is untouched.
    pub fn set_filter(&mut self, filter: FilterSelection) {
        self.filter = filter;
        self.page = 0;
        self.revision += 1;
    }

    pub fn filter(&self) -> FilterSelection {
        self.filter
    }

    pub fn search_id(&self) -> Option<u64> {
        self.search.as_ref().map(|s| s.search_id)
    }

    /// Look up a business by id in the current result set.
    pub fn business(&self, id: u64) -> Option<&Business> {
        self.search
            .as_ref()?
            .businesses
            .iter()
            .find(|b| b.id == id)
    }

    /// Bumped on every state mutation; the view re-renders when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The filtered view: a stable filter over the server-ordered list, no
    /// re-sort, no duplication.
    pub fn filtered(&self) -> Vec<&Business> {
        match &self.search {
            None => Vec::new(),
            Some(result) => result
                .businesses
                .iter()
                .filter(|b| self.filter.matches(b))
                .collect(),
        }
    }

    /// Current page of the filtered view.
    ///
    /// `total_pages` is recomputed from the current filtered count; the page
    /// index is not clamped, an out-of-range index yields an empty slice.
    /// Pagination controls are expected to disable out-of-range navigation.
    pub fn page_view(&self) -> PageView {
        let filtered = self.filtered();
        let total_filtered = filtered.len();
        let total_pages = total_filtered.div_ceil(PAGE_SIZE);

        let start = self.page * PAGE_SIZE;
        let items = if start >= total_filtered {
            Vec::new()
        } else {
            filtered[start..(start + PAGE_SIZE).min(total_filtered)]
                .iter()
                .map(|b| (*b).clone())
                .collect()
        };

        PageView {
            items,
            page_index: self.page,
            total_pages,
            total_filtered,
        }
    }

    /// Advance one page. No-op on the last page; the page count is taken
    /// from the current filtered view since filters shrink it.
    pub fn next_page(&mut self) -> bool {
        let total_pages = self.filtered().len().div_ceil(PAGE_SIZE);
        if self.page + 1 < total_pages {
            self.page += 1;
            self.revision += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. No-op on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            self.revision += 1;
            true
        } else {
            false
        }
    }

    /// Counts over the whole result set; filters only affect the table and
    /// the export, never the stat bar.
    pub fn stats(&self) -> StatSummary {
        let businesses = self
            .search
            .as_ref()
            .map(|s| s.businesses.as_slice())
            .unwrap_or(&[]);
        let with_website = businesses.iter().filter(|b| b.has_website()).count();
        StatSummary {
            total: businesses.len(),
            with_website,
            without_website: businesses.len() - with_website,
        }
    }

    pub fn view_state(&self) -> ViewState {
        match &self.search {
            None => ViewState::NoSearch,
            Some(result) if result.businesses.is_empty() => ViewState::NoResults,
            Some(_) if self.filtered().is_empty() => ViewState::FilteredEmpty,
            Some(_) => ViewState::Results,
        }
    }

    /// Serialize the currently filtered view (all pages) as CSV.
    ///
    /// Returns `Ok(None)` when there is no result set or it is empty: in that
    /// case nothing is exported at all, not even a header-only file.
    pub fn export_csv(&self) -> Result<Option<Vec<u8>>> {
        match &self.search {
            None => Ok(None),
            Some(result) if result.businesses.is_empty() => Ok(None),
            Some(_) => export::write_leads_csv(&self.filtered()).map(Some),
        }
    }
}
