//! Paginated product feed.
//!
//! [`FeedController`] owns the feed state and is its only writer. Each state
//! transition happens inside a single `watch` modification, so a UI holding a
//! receiver never observes a half-applied page. Catalog requests are the only
//! await points.
//!
//! Every fetch is tagged with the generation current when it was issued.
//! `refresh`, `set_search` and `set_category` start a new generation; a
//! response that comes back for an older one is dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cache::ProductCache;
use crate::catalog::{Catalog, QueryMode};
use crate::error::CatalogError;
use crate::models::Product;

pub const DEFAULT_PAGE_SIZE: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone)]
pub struct FeedState {
    /// Products in arrival order.
    pub products: Vec<Product>,
    pub skip: usize,
    pub mode: QueryMode,
    pub loading: bool,
    pub error: Option<Arc<CatalogError>>,
    pub has_more: bool,
    pub categories: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
    generation: u64,
    /// Set by a restart until a page of the new generation lands, so the
    /// products on screen may still belong to the previous query.
    outdated: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            skip: 0,
            mode: QueryMode::None,
            loading: false,
            error: None,
            has_more: true,
            categories: Vec::new(),
            last_updated: None,
            generation: 0,
            outdated: false,
        }
    }
}

impl FeedState {
    /// Coarse state for rendering: loading wins over a recorded error.
    pub fn phase(&self) -> FeedPhase {
        if self.loading {
            FeedPhase::Loading
        } else if self.error.is_some() {
            FeedPhase::Error
        } else if self.last_updated.is_some() {
            FeedPhase::Loaded
        } else {
            FeedPhase::Idle
        }
    }

    /// Display text of the most recent failure.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What an issued fetch needs to remember until its response arrives.
struct Ticket {
    generation: u64,
    mode: QueryMode,
    skip: usize,
    replace: bool,
}

pub struct FeedController<C> {
    catalog: Arc<C>,
    cache: Arc<ProductCache>,
    page_size: usize,
    state: watch::Sender<FeedState>,
}

impl<C: Catalog> FeedController<C> {
    /// Creates a controller that requests pages of [`DEFAULT_PAGE_SIZE`].
    pub fn new(catalog: Arc<C>, cache: Arc<ProductCache>) -> Self {
        Self::with_page_size(catalog, cache, DEFAULT_PAGE_SIZE)
    }

    /// Page sizes below one are raised to one.
    pub fn with_page_size(catalog: Arc<C>, cache: Arc<ProductCache>, page_size: usize) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            catalog,
            cache,
            page_size: page_size.max(1),
            state,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Copy of the current feed state.
    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified after every applied state change.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// Switches to full-text search and reloads from the first page.
    /// Blank text clears the filter instead.
    pub async fn set_search(&self, text: impl Into<String>) {
        let text = text.into();
        let mode = if text.trim().is_empty() {
            QueryMode::None
        } else {
            QueryMode::Search(text)
        };
        self.restart(Some(mode)).await;
    }

    /// Filters by category and reloads from the first page.
    /// `None` or a blank name shows the unfiltered listing.
    pub async fn set_category(&self, category: Option<String>) {
        let mode = match category {
            Some(name) if !name.trim().is_empty() => QueryMode::Category(name),
            _ => QueryMode::None,
        };
        self.restart(Some(mode)).await;
    }

    /// Reloads the first page of the current query, replacing the list.
    pub async fn refresh(&self) {
        self.restart(None).await;
    }

    /// Appends the next page. Does nothing while a fetch is in flight or
    /// once the catalog has run out of products.
    ///
    /// If the last restart failed, the list still shows the previous query,
    /// so this fetches the first page again and replaces it.
    pub async fn load_more(&self) {
        let mut ticket = None;
        self.state.send_if_modified(|state| {
            if state.loading || !state.has_more {
                return false;
            }
            state.loading = true;
            state.error = None;
            ticket = Some(Ticket {
                generation: state.generation,
                mode: state.mode.clone(),
                skip: state.skip,
                replace: state.outdated,
            });
            true
        });

        match ticket {
            Some(ticket) => self.fetch(ticket).await,
            None => debug!("load_more ignored"),
        }
    }

    /// Fetches the category list into the feed state. Failures are logged
    /// and leave the previous list in place.
    pub async fn load_categories(&self) {
        match self.catalog.list_categories().await {
            Ok(categories) => self.state.send_modify(|state| state.categories = categories),
            Err(e) => warn!(error = %e, "failed to load categories"),
        }
    }

    async fn restart(&self, mode: Option<QueryMode>) {
        let mut ticket = None;
        self.state.send_modify(|state| {
            if let Some(mode) = mode {
                state.mode = mode;
            }
            state.generation += 1;
            state.skip = 0;
            state.has_more = true;
            state.loading = true;
            state.error = None;
            state.outdated = true;
            ticket = Some(Ticket {
                generation: state.generation,
                mode: state.mode.clone(),
                skip: 0,
                replace: true,
            });
        });

        if let Some(ticket) = ticket {
            self.fetch(ticket).await;
        }
    }

    async fn fetch(&self, ticket: Ticket) {
        let result = self
            .catalog
            .list_products(&ticket.mode, self.page_size, ticket.skip)
            .await;

        if let Ok(products) = &result {
            self.cache.extend(products.iter().cloned());
        }

        let page_size = self.page_size;
        self.state.send_if_modified(|state| {
            if state.generation != ticket.generation {
                debug!(
                    stale = ticket.generation,
                    current = state.generation,
                    "discarding superseded feed response"
                );
                return false;
            }

            state.loading = false;
            match result {
                Ok(products) => {
                    let count = products.len();
                    if ticket.replace {
                        state.products = products;
                    } else {
                        state.products.extend(products);
                    }
                    state.skip = ticket.skip + count;
                    state.has_more = count >= page_size;
                    state.last_updated = Some(Utc::now());
                    state.outdated = false;
                    debug!(count, skip = state.skip, has_more = state.has_more, "feed page applied");
                }
                Err(e) => {
                    warn!(error = %e, mode = ?ticket.mode, "feed fetch failed");
                    state.error = Some(Arc::new(e));
                }
            }
            true
        });
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
