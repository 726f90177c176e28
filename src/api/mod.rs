mod client;
mod types;

pub use client::{ApiClient, FeedBackend};
pub use types::{
    AddFeedSource, AddFeedSourceRequest, ApiResponse, CursorQuery, QueryFeedsData, QueryPage,
    QueryRequest, RssConfig, SourcesOptions, WindowQuery, WireArticle, WireLabels,
};
