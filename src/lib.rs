//! Client-side feed reading engine.
//!
//! Fetches paginated article pages from a remote backend, normalizes the
//! wire records into one canonical shape (sanitizing any HTML on the way
//! in), merges pages with identity-keyed dedup, and derives filtered and
//! grouped projections. Read/unread status lives in a local JSON ledger
//! with 7-day expiry. The presentation layer is not part of this crate:
//! build a [`store::FeedStore`] with an [`api::ApiClient`] and a
//! [`store::ReadLedger`] and render its projections however you like.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod store;
pub mod view;

pub use api::{ApiClient, FeedBackend, QueryPage, QueryRequest};
pub use config::Config;
pub use error::{AppError, Result};
pub use models::{Article, FilterState, GroupBy, MergePolicy, ReadStatusFilter};
pub use store::{FeedStore, ReadLedger};
