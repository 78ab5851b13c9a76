//! Keyset pagination over the signup table
//!
//! Pulls the full ordered row set page by page, preferring identifier
//! keyset pagination and falling back to timestamp keyset when the table
//! exposes no id column. Fails softly: a page error ends the pass with
//! whatever rows were already collected.

use tracing::{debug, warn};

use crate::backend::{PageKey, PageOrder, PageRequest, SignupBackend, SignupRow};
use crate::error::FetchReport;

/// Rows per page, kept under typical backend response caps
pub const PAGE_SIZE: usize = 1000;

/// Hard cap on pages per pass, guarding against backend pagination bugs
pub const MAX_PAGES: usize = 100;

/// Paginated reader over a signup backend
///
/// The pagination strategy is probed once per pager and reused for every
/// subsequent pass.
pub struct SignupPager<B> {
    backend: B,
    page_size: usize,
    max_pages: usize,
    strategy: Option<PageOrder>,
}

impl<B: SignupBackend> SignupPager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            page_size: PAGE_SIZE,
            max_pages: MAX_PAGES,
            strategy: None,
        }
    }

    /// Override the page size (tests exercise multi-page passes cheaply)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Override the page-count safety cap
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// The pagination strategy in use, once probed
    pub fn strategy(&self) -> Option<PageOrder> {
        self.strategy
    }

    /// Probe the backend once to pick the pagination strategy
    ///
    /// A 1-row id-ordered query that succeeds with a usable id selects id
    /// keyset; an error or a row without an id selects timestamp keyset.
    async fn resolve_strategy(&mut self) -> PageOrder {
        if let Some(order) = self.strategy {
            return order;
        }

        let probe = PageRequest::first(PageOrder::ById, 1);
        let order = match self.backend.fetch_page(probe).await {
            Ok(rows) => {
                if rows.first().is_some_and(|row| row.id.is_none()) {
                    debug!("id column absent, using timestamp keyset pagination");
                    PageOrder::ByTimestamp
                } else {
                    debug!("using id keyset pagination");
                    PageOrder::ById
                }
            }
            Err(e) => {
                debug!(error = %e, "id probe failed, using timestamp keyset pagination");
                PageOrder::ByTimestamp
            }
        };

        self.strategy = Some(order);
        order
    }

    /// Fetch every row in key order
    ///
    /// Each page's last key becomes the next page's exclusive lower bound.
    /// The loop ends on a short or empty page, on the page-count cap
    /// (`report.truncated`), or on a page error (`report.partial`); in all
    /// cases the rows collected so far are returned rather than discarded.
    pub async fn fetch_all(&mut self, report: &mut FetchReport) -> Vec<SignupRow> {
        let order = self.resolve_strategy().await;
        let mut rows: Vec<SignupRow> = Vec::new();
        let mut after: Option<PageKey> = None;

        loop {
            if report.pages_fetched >= self.max_pages {
                warn!(
                    pages = report.pages_fetched,
                    rows = rows.len(),
                    "page-count safety cap reached, aborting pagination"
                );
                report.truncated = true;
                break;
            }

            let request = PageRequest {
                order,
                after,
                limit: self.page_size,
            };
            let page = match self.backend.fetch_page(request).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        error = %e,
                        pages = report.pages_fetched,
                        rows = rows.len(),
                        "page query failed, keeping partial result"
                    );
                    report.record_error(e.to_string());
                    break;
                }
            };

            report.pages_fetched += 1;
            let page_len = page.len();
            if page_len == 0 {
                break;
            }

            after = match order {
                PageOrder::ById => page.last().and_then(|row| row.id).map(PageKey::Id),
                PageOrder::ByTimestamp => {
                    page.last().map(|row| PageKey::Timestamp(row.timestamp))
                }
            };

            rows.extend(page);
            report.rows_fetched = rows.len();

            if page_len < self.page_size {
                break;
            }

            // A full page whose last row has no id cannot advance the cursor
            if after.is_none() {
                warn!("row without id under id keyset pagination, stopping");
                report.record_error("row without id under id keyset pagination");
                break;
            }
        }

        debug!(
            pages = report.pages_fetched,
            rows = rows.len(),
            partial = report.partial,
            truncated = report.truncated,
            "pagination pass complete"
        );
        rows
    }
}
