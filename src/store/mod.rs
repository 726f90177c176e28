mod ledger;

pub use ledger::{ReadLedger, ReadRecord};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::api::{FeedBackend, QueryRequest};
use crate::models::{
    Article, FilterPatch, FilterState, GroupBy, MergePolicy, Pagination, ReadStatusFilter,
};
use crate::view;

/// The client-side state engine.
///
/// Owns the canonical article collection, the pagination cursor, filters,
/// grouping mode, and selection, and drives the injected backend and read
/// ledger. Public operations never return errors: failures resolve into
/// the `error` field for the caller to observe, and the prior collection
/// is never partially overwritten.
///
/// Methods take `&mut self`, so one store instance never has
/// `load_initial` and `load_more` unresolved at the same time; the
/// `loading_more` flag is additionally set before the suspend point and
/// cleared after resolution, so a re-entrant trigger between polls is a
/// silent no-op.
pub struct FeedStore {
    backend: Arc<dyn FeedBackend>,
    ledger: ReadLedger,
    merge_policy: MergePolicy,
    page_size: u32,

    articles: Vec<Article>,
    selection: Option<Article>,
    filters: FilterState,
    group_by: GroupBy,
    pagination: Pagination,
    loading: bool,
    loading_more: bool,
    error: Option<String>,
    read_links: HashSet<String>,
}

impl FeedStore {
    pub fn new(
        backend: Arc<dyn FeedBackend>,
        ledger: ReadLedger,
        merge_policy: MergePolicy,
        page_size: u32,
    ) -> Self {
        let read_links = ledger.all_read_links();
        Self {
            backend,
            ledger,
            merge_policy,
            page_size,
            articles: Vec::new(),
            selection: None,
            filters: FilterState::default(),
            group_by: GroupBy::default(),
            pagination: Pagination::default(),
            loading: false,
            loading_more: false,
            error: None,
            read_links,
        }
    }

    /// Fresh load of the first page. Replaces the collection on success;
    /// on failure sets `error` and leaves the prior collection untouched.
    /// Idempotent and safe to re-invoke (refresh, retry).
    pub async fn load_initial(&mut self) {
        self.loading = true;
        self.error = None;

        let request = QueryRequest::recent(self.page_size, None);
        match self.backend.query(&request).await {
            Ok(page) => {
                self.articles = merge_articles(Vec::new(), page.articles, self.merge_policy);
                self.pagination = Pagination {
                    has_more: page.has_more,
                    next_cursor: page.next_cursor,
                };
            }
            Err(e) => {
                tracing::warn!("initial load failed: {}", e);
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    /// Fetches the next page and appends it with dedup. Silently ignored
    /// when a page fetch is already in flight or there is nothing more to
    /// load.
    pub async fn load_more(&mut self) {
        if self.loading_more || !self.pagination.has_more {
            return;
        }
        // Set before the suspend point so a rapid second trigger no-ops.
        self.loading_more = true;

        let request = QueryRequest::recent(self.page_size, self.pagination.next_cursor.clone());
        match self.backend.query(&request).await {
            Ok(page) => {
                let existing = std::mem::take(&mut self.articles);
                self.articles = merge_articles(existing, page.articles, self.merge_policy);
                self.pagination = Pagination {
                    has_more: page.has_more,
                    next_cursor: page.next_cursor,
                };
            }
            Err(e) => {
                tracing::warn!("load more failed: {}", e);
                self.error = Some(e.to_string());
            }
        }

        self.loading_more = false;
    }

    /// Re-runs the initial load after a failure.
    pub async fn retry(&mut self) {
        self.load_initial().await;
    }

    /// Sets the selection. Selecting an article marks it read, in the
    /// ledger and in memory.
    pub fn select(&mut self, article: Option<Article>) {
        if let Some(article) = &article {
            self.ledger.mark_read(&article.link);
            self.read_links.insert(article.link.clone());
        }
        self.selection = article;
    }

    /// Reverts an article to unread.
    pub fn mark_unread(&mut self, link: &str) {
        self.ledger.mark_unread(link);
        self.read_links.remove(link);
    }

    /// Re-reads the ledger, dropping links whose records expired.
    pub fn refresh_read_status(&mut self) {
        self.read_links = self.ledger.all_read_links();
    }

    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.filters.apply(patch);
    }

    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.filters.category = category;
    }

    pub fn set_source_filter(&mut self, source: Option<String>) {
        self.filters.source = source;
    }

    pub fn set_search_query(&mut self, query: Option<String>) {
        self.filters.search_query = query;
    }

    pub fn set_read_status(&mut self, status: ReadStatusFilter) {
        self.filters.read_status = status;
    }

    pub fn set_group_by(&mut self, group_by: GroupBy) {
        self.group_by = group_by;
    }

    /// Clears all filters and resets grouping.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
        self.group_by = GroupBy::None;
    }

    // State accessors.

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn selection(&self) -> Option<&Article> {
        self.selection.as_ref()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn read_links(&self) -> &HashSet<String> {
        &self.read_links
    }

    // Projections.

    pub fn filtered(&self) -> Vec<Article> {
        view::filter_articles(&self.articles, &self.filters, &self.read_links)
    }

    pub fn grouped(&self) -> Vec<(String, Vec<Article>)> {
        view::group_articles(&self.filtered(), self.group_by)
    }

    pub fn categories(&self) -> Vec<String> {
        view::unique_categories(&self.articles)
    }

    pub fn sources(&self) -> Vec<String> {
        view::unique_sources(&self.articles)
    }
}

/// Merges an incoming page into the collection, keyed by identity.
///
/// Unseen identities append in arrival order. A seen identity is skipped
/// under `KeepExisting`, and replaced in place under `PreferNewer` only
/// when the incoming publish time is strictly greater; equal timestamps
/// keep the first-seen entry. Merging the same batch twice is a no-op.
fn merge_articles(
    mut existing: Vec<Article>,
    incoming: Vec<Article>,
    policy: MergePolicy,
) -> Vec<Article> {
    let mut index: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, a)| (a.identity.clone(), i))
        .collect();

    for article in incoming {
        match index.get(&article.identity) {
            Some(&slot) => {
                if policy == MergePolicy::PreferNewer
                    && article.published_at > existing[slot].published_at
                {
                    existing[slot] = article;
                }
            }
            None => {
                index.insert(article.identity.clone(), existing.len());
                existing.push(article);
            }
        }
    }

    existing
}
