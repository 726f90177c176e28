use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized feed article, immutable once built by the normalizer.
///
/// `identity` is the deduplication key. This crate uses the link-as-id
/// scheme: `identity == link`, and a backend-assigned numeric id (when the
/// wire record carries one) is not used for identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub identity: String,
    pub title: String,
    pub link: String,
    pub source: String,
    pub category: Option<String>,
    /// Plain-text article body, when the backend includes it.
    pub content: Option<String>,
    /// Plain-text summary.
    pub summary: Option<String>,
    /// Sanitized HTML summary snippet; safe to render as-is.
    pub summary_html: Option<String>,
    pub tags: Option<Vec<String>>,
    pub score: Option<f64>,
    pub published_at: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
    /// Backend record type label, e.g. "rss".
    pub kind: String,
}

impl Article {
    /// Best available rendering text, by precedence:
    /// sanitized HTML snippet, then full plain text, then summary.
    pub fn display_text(&self) -> &str {
        self.summary_html
            .as_deref()
            .or(self.content.as_deref())
            .or(self.summary.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_article() -> Article {
        Article {
            identity: "https://example.com/a".to_string(),
            title: "a".to_string(),
            link: "https://example.com/a".to_string(),
            source: "example".to_string(),
            category: None,
            content: None,
            summary: None,
            summary_html: None,
            tags: None,
            score: None,
            published_at: Utc::now(),
            fetched_at: Utc::now(),
            kind: "rss".to_string(),
        }
    }

    #[test]
    fn display_text_prefers_html_snippet() {
        let mut article = base_article();
        article.summary = Some("summary".to_string());
        article.content = Some("content".to_string());
        article.summary_html = Some("<p>html</p>".to_string());
        assert_eq!(article.display_text(), "<p>html</p>");

        article.summary_html = None;
        assert_eq!(article.display_text(), "content");

        article.content = None;
        assert_eq!(article.display_text(), "summary");

        article.summary = None;
        assert_eq!(article.display_text(), "");
    }
}
