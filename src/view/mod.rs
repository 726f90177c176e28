//! Pure, derived views over the feed store's state: filtered lists,
//! grouped buckets, and facet lists. Nothing here mutates the collection.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{Article, FilterState, GroupBy, ReadStatusFilter};

/// Applies all set filters, AND-combined, preserving input order.
///
/// The search query matches case-insensitively against title, summary,
/// and content. Read status is a membership test against `read_links`.
pub fn filter_articles(
    articles: &[Article],
    filters: &FilterState,
    read_links: &HashSet<String>,
) -> Vec<Article> {
    articles
        .iter()
        .filter(|article| {
            if let Some(category) = &filters.category {
                if article.category.as_deref() != Some(category.as_str()) {
                    return false;
                }
            }

            if let Some(source) = &filters.source {
                if &article.source != source {
                    return false;
                }
            }

            if let Some(query) = &filters.search_query {
                let query = query.to_lowercase();
                let matches = article.title.to_lowercase().contains(&query)
                    || article
                        .summary
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&query))
                    || article
                        .content
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&query));
                if !matches {
                    return false;
                }
            }

            match filters.read_status {
                ReadStatusFilter::All => true,
                ReadStatusFilter::Read => read_links.contains(&article.link),
                ReadStatusFilter::Unread => !read_links.contains(&article.link),
            }
        })
        .cloned()
        .collect()
}

/// Partitions articles into buckets by the grouping key.
///
/// Buckets appear in first-encounter order of their key; within a bucket,
/// articles are sorted by publish time descending (stable, so
/// equal-timestamp articles keep their input order).
pub fn group_articles(articles: &[Article], group_by: GroupBy) -> Vec<(String, Vec<Article>)> {
    let mut groups: Vec<(String, Vec<Article>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for article in articles {
        let key = group_key(article, group_by);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(article.clone());
    }

    for (_, bucket) in &mut groups {
        bucket.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    }

    groups
}

fn group_key(article: &Article, group_by: GroupBy) -> String {
    match group_by {
        GroupBy::None => "all".to_string(),
        GroupBy::Category => article
            .category
            .clone()
            .unwrap_or_else(|| "uncategorized".to_string()),
        GroupBy::Source => article.source.clone(),
        // Publish instant truncated to the hour, as a sortable string.
        GroupBy::Hour => article.published_at.format("%Y-%m-%d %H:00").to_string(),
    }
}

/// Distinct categories across the collection, alphabetically sorted.
pub fn unique_categories(articles: &[Article]) -> Vec<String> {
    articles
        .iter()
        .filter_map(|a| a.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct source names across the collection, alphabetically sorted.
pub fn unique_sources(articles: &[Article]) -> Vec<String> {
    articles
        .iter()
        .map(|a| a.source.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Copy of the input sorted by publish time, most recent first by default.
pub fn sort_by_time(articles: &[Article], ascending: bool) -> Vec<Article> {
    let mut sorted = articles.to_vec();
    if ascending {
        sorted.sort_by(|a, b| a.published_at.cmp(&b.published_at));
    } else {
        sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    }
    sorted
}
