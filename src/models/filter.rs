use serde::{Deserialize, Serialize};

/// Client-side filters, AND-combined over the loaded collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub category: Option<String>,
    pub source: Option<String>,
    pub search_query: Option<String>,
    pub read_status: ReadStatusFilter,
}

/// Partial update for [`FilterState`]; `None` fields are left untouched.
/// Clearing a single filter is done through the dedicated store setters.
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    pub category: Option<Option<String>>,
    pub source: Option<Option<String>>,
    pub search_query: Option<Option<String>>,
    pub read_status: Option<ReadStatusFilter>,
}

impl FilterState {
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        if let Some(search_query) = patch.search_query {
            self.search_query = search_query;
        }
        if let Some(read_status) = patch.read_status {
            self.read_status = read_status;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadStatusFilter {
    #[default]
    All,
    Read,
    Unread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    None,
    Category,
    Source,
    Hour,
}

/// Cursor pagination state; advanced only by a successful fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pagination {
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// What to do when an incoming page contains an identity that is already
/// in the collection. The backend evolved between both behaviors, so both
/// are supported; `KeepExisting` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// First-seen entry wins; pages append only.
    #[default]
    KeepExisting,
    /// Replace in place when the incoming article was published strictly
    /// later; ties keep the first-seen entry.
    PreferNewer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_set_fields() {
        let mut filters = FilterState {
            category: Some("tech".to_string()),
            source: Some("blog".to_string()),
            search_query: None,
            read_status: ReadStatusFilter::All,
        };

        filters.apply(FilterPatch {
            source: Some(None),
            read_status: Some(ReadStatusFilter::Unread),
            ..Default::default()
        });

        assert_eq!(filters.category.as_deref(), Some("tech"));
        assert_eq!(filters.source, None);
        assert_eq!(filters.read_status, ReadStatusFilter::Unread);
    }
}
