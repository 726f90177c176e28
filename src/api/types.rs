use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Article;

/// Standard backend response envelope. `errno == 0` signals success; any
/// other value is a backend-level failure described by `errmsg`, with
/// `data` expected to be null.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub errno: i64,
    #[serde(default)]
    pub errmsg: String,
    pub data: Option<T>,
}

/// Payload of a successful query response.
#[derive(Debug, Deserialize)]
pub struct QueryFeedsData {
    pub feeds: Vec<WireArticle>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Raw article record as returned by the backend.
///
/// Two incompatible schemas exist in the wild: the older window-paging
/// backend nests everything under `labels`, the cursor-paging backend
/// returns a flat record with an optional numeric id and score. Both decode
/// into this union and are normalized into one [`Article`] shape; no
/// runtime shape detection happens outside serde.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireArticle {
    Labeled {
        labels: WireLabels,
        /// Fetch timestamp, ISO 8601.
        time: String,
    },
    Flat {
        #[serde(default)]
        id: Option<i64>,
        title: String,
        link: String,
        source: String,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        summary: Option<String>,
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        score: Option<f64>,
        pub_time: String,
        #[serde(default)]
        created_at: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireLabels {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub link: String,
    pub pub_time: String,
    pub source: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub summary_html_snippet: Option<String>,
    /// Comma-delimited tag list.
    #[serde(default)]
    pub tags: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Query request body. The two backend generations take different calling
/// conventions; a deployment uses one of them and never mixes the two in
/// one request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryRequest {
    Window(WindowQuery),
    Cursor(CursorQuery),
}

impl QueryRequest {
    /// Most-recent articles via the cursor convention.
    pub fn recent(limit: u32, cursor: Option<String>) -> Self {
        Self::Cursor(CursorQuery {
            limit: Some(limit),
            cursor,
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowQuery {
    /// ISO 8601 window bounds.
    pub start: String,
    pub end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_filters: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CursorQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// One page of normalized query results.
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub articles: Vec<Article>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddFeedSourceRequest {
    pub source: AddFeedSource,
}

/// New subscription definition. Exactly one of `rss.url` /
/// `rss.rsshub_route_path` must be set.
#[derive(Debug, Clone, Serialize)]
pub struct AddFeedSource {
    pub name: String,
    pub rss: RssConfig,
    /// Fetch interval as a duration string, e.g. "1h30m".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RssConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsshub_route_path: Option<String>,
}

/// Facet lists for filter dropdowns, independent of the loaded page.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesOptions {
    pub categories: Vec<String>,
    pub sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_record_decodes() {
        let json = r#"{
            "labels": {
                "title": "Hello",
                "link": "https://example.com/hello",
                "source": "Example",
                "pub_time": "2026-08-01T10:00:00Z",
                "type": "rss",
                "tags": "a, b"
            },
            "time": "2026-08-01T10:05:00Z"
        }"#;

        let record: WireArticle = serde_json::from_str(json).unwrap();
        match record {
            WireArticle::Labeled { labels, time } => {
                assert_eq!(labels.title, "Hello");
                assert_eq!(labels.kind, "rss");
                assert_eq!(time, "2026-08-01T10:05:00Z");
            }
            WireArticle::Flat { .. } => panic!("expected labeled variant"),
        }
    }

    #[test]
    fn flat_record_decodes() {
        let json = r#"{
            "id": 42,
            "title": "Hello",
            "link": "https://example.com/hello",
            "source": "Example",
            "score": 0.7,
            "pub_time": "2026-08-01T10:00:00Z"
        }"#;

        let record: WireArticle = serde_json::from_str(json).unwrap();
        match record {
            WireArticle::Flat { id, score, .. } => {
                assert_eq!(id, Some(42));
                assert_eq!(score, Some(0.7));
            }
            WireArticle::Labeled { .. } => panic!("expected flat variant"),
        }
    }

    #[test]
    fn cursor_request_omits_unset_fields() {
        let body = serde_json::to_value(QueryRequest::recent(20, None)).unwrap();
        assert_eq!(body, serde_json::json!({ "limit": 20 }));

        let body =
            serde_json::to_value(QueryRequest::recent(20, Some("c1".to_string()))).unwrap();
        assert_eq!(body, serde_json::json!({ "limit": 20, "cursor": "c1" }));
    }

    #[test]
    fn window_request_serializes_label_filters() {
        let mut label_filters = BTreeMap::new();
        label_filters.insert("category".to_string(), "tech".to_string());

        let request = QueryRequest::Window(WindowQuery {
            start: "2026-08-01T00:00:00Z".to_string(),
            end: "2026-08-02T00:00:00Z".to_string(),
            limit: Some(100),
            query: None,
            summarize: None,
            label_filters: Some(label_filters),
        });

        let body = serde_json::to_value(request).unwrap();
        assert_eq!(body["label_filters"]["category"], "tech");
        assert!(body.get("query").is_none());
    }

    #[test]
    fn envelope_decodes_null_data() {
        let json = r#"{ "errno": 1002, "errmsg": "backend unavailable", "data": null }"#;
        let envelope: ApiResponse<QueryFeedsData> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.errno, 1002);
        assert!(envelope.data.is_none());
    }
}
