use chrono::{DateTime, Utc};

use crate::api::WireArticle;
use crate::error::{AppError, Result};
use crate::models::Article;

use super::sanitize_html;

/// Converts one raw wire record into the canonical article shape.
///
/// Both wire variants land here. Identity is the article link for either
/// variant. HTML snippets are sanitized before storage; malformed dates
/// fail fast rather than silently defaulting.
pub fn normalize(raw: WireArticle) -> Result<Article> {
    match raw {
        WireArticle::Labeled { labels, time } => Ok(Article {
            identity: labels.link.clone(),
            title: labels.title,
            link: labels.link,
            source: labels.source,
            category: labels.category,
            content: labels.content,
            summary: labels.summary,
            summary_html: labels.summary_html_snippet.as_deref().map(sanitize_html),
            tags: labels.tags.as_deref().and_then(split_tags),
            score: None,
            published_at: parse_instant(&labels.pub_time)?,
            fetched_at: parse_instant(&time)?,
            kind: labels.kind,
        }),
        WireArticle::Flat {
            id: _,
            title,
            link,
            source,
            category,
            summary,
            content,
            score,
            pub_time,
            created_at,
        } => {
            let published_at = parse_instant(&pub_time)?;
            let fetched_at = match created_at.as_deref() {
                Some(created_at) => parse_instant(created_at)?,
                None => published_at,
            };
            Ok(Article {
                identity: link.clone(),
                title,
                link,
                source,
                category,
                content,
                summary,
                summary_html: None,
                tags: None,
                score,
                published_at,
                fetched_at,
                kind: "rss".to_string(),
            })
        }
    }
}

/// Element-wise [`normalize`], preserving order and failing on the first
/// malformed record.
pub fn normalize_batch(raw: Vec<WireArticle>) -> Result<Vec<Article>> {
    raw.into_iter().map(normalize).collect()
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidDate(raw.to_string()))
}

fn split_tags(raw: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}
