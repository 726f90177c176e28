mod article;
mod filter;

pub use article::Article;
pub use filter::{FilterPatch, FilterState, GroupBy, MergePolicy, Pagination, ReadStatusFilter};
