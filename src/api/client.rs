use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::feed::normalize_batch;

use super::types::{
    AddFeedSource, AddFeedSourceRequest, ApiResponse, QueryFeedsData, QueryPage, QueryRequest,
    SourcesOptions,
};

/// Seam between the feed store and the network. The store only ever sees
/// this trait, so tests can script pages without a live backend.
#[async_trait]
pub trait FeedBackend: Send + Sync {
    async fn query(&self, request: &QueryRequest) -> Result<QueryPage>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Option<(String, String)>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("feedflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        let auth = match (&config.auth_user, &config.auth_pass) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };

        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some((user, pass)) => builder.basic_auth(user, Some(pass)),
            None => builder,
        }
    }

    /// Register a new subscription; returns its backend-assigned id.
    /// Input is validated before any network I/O.
    pub async fn add_source(&self, source: AddFeedSource) -> Result<u64> {
        validate_source(&source)?;

        let response = self
            .request(self.client.post(format!("{}/add-feed-source", self.base_url)))
            .json(&AddFeedSourceRequest { source })
            .send()
            .await?
            .error_for_status()?;

        #[derive(serde::Deserialize)]
        struct Created {
            id: u64,
        }

        let envelope: ApiResponse<Created> = response.json().await?;
        Ok(unwrap_envelope(envelope)?.id)
    }

    /// Category and source facet lists for filter dropdowns.
    pub async fn sources_options(&self) -> Result<SourcesOptions> {
        let response = self
            .request(self.client.get(format!("{}/sources/options", self.base_url)))
            .send()
            .await?
            .error_for_status()?;

        let envelope: ApiResponse<SourcesOptions> = response.json().await?;
        unwrap_envelope(envelope)
    }
}

#[async_trait]
impl FeedBackend for ApiClient {
    async fn query(&self, request: &QueryRequest) -> Result<QueryPage> {
        let response = self
            .request(self.client.post(format!("{}/query", self.base_url)))
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let envelope: ApiResponse<QueryFeedsData> = response.json().await?;
        let data = unwrap_envelope(envelope)?;

        tracing::debug!(
            count = data.feeds.len(),
            has_more = data.has_more,
            "query page received"
        );

        Ok(QueryPage {
            articles: normalize_batch(data.feeds)?,
            has_more: data.has_more,
            next_cursor: data.next_cursor,
        })
    }
}

/// Unpacks the backend envelope: non-zero `errno` is a typed backend
/// error, and a success envelope with null `data` is treated the same.
fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> Result<T> {
    if envelope.errno != 0 {
        return Err(AppError::Backend {
            errno: envelope.errno,
            errmsg: envelope.errmsg,
        });
    }
    envelope.data.ok_or(AppError::Backend {
        errno: envelope.errno,
        errmsg: "empty response data".to_string(),
    })
}

fn validate_source(source: &AddFeedSource) -> Result<()> {
    if source.name.trim().is_empty() {
        return Err(AppError::Validation("source name is required".to_string()));
    }

    let url = source.rss.url.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let route = source
        .rss
        .rsshub_route_path
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match (url, route) {
        (Some(url), None) => {
            url::Url::parse(url)
                .map_err(|e| AppError::Validation(format!("invalid RSS URL: {e}")))?;
            Ok(())
        }
        (None, Some(_)) => Ok(()),
        (Some(_), Some(_)) => Err(AppError::Validation(
            "set either an RSS URL or an RSSHub route path, not both".to_string(),
        )),
        (None, None) => Err(AppError::Validation(
            "an RSS URL or an RSSHub route path is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::RssConfig;

    fn source(url: Option<&str>, route: Option<&str>) -> AddFeedSource {
        AddFeedSource {
            name: "Tech Blog".to_string(),
            rss: RssConfig {
                url: url.map(String::from),
                rsshub_route_path: route.map(String::from),
            },
            interval: Some("1h".to_string()),
            labels: None,
        }
    }

    #[test]
    fn envelope_error_is_typed() {
        let envelope: ApiResponse<QueryFeedsData> = serde_json::from_str(
            r#"{ "errno": 1002, "errmsg": "backend unavailable", "data": null }"#,
        )
        .unwrap();

        match unwrap_envelope(envelope) {
            Err(AppError::Backend { errno, errmsg }) => {
                assert_eq!(errno, 1002);
                assert_eq!(errmsg, "backend unavailable");
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn success_envelope_with_null_data_is_an_error() {
        let envelope: ApiResponse<QueryFeedsData> =
            serde_json::from_str(r#"{ "errno": 0, "errmsg": "", "data": null }"#).unwrap();
        assert!(matches!(
            unwrap_envelope(envelope),
            Err(AppError::Backend { errno: 0, .. })
        ));
    }

    #[test]
    fn validation_rejects_bad_sources_before_network() {
        assert!(matches!(
            validate_source(&source(None, None)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_source(&source(Some("https://a.example/feed.xml"), Some("/x/y"))),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_source(&source(Some("not a url"), None)),
            Err(AppError::Validation(_))
        ));

        let mut unnamed = source(Some("https://a.example/feed.xml"), None);
        unnamed.name = "  ".to_string();
        assert!(matches!(
            validate_source(&unnamed),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn validation_accepts_either_variant() {
        assert!(validate_source(&source(Some("https://a.example/feed.xml"), None)).is_ok());
        assert!(validate_source(&source(None, Some("/github/issue/DIYgod/RSSHub"))).is_ok());
    }
}
