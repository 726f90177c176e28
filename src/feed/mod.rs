mod normalizer;
mod sanitize;

pub use normalizer::{normalize, normalize_batch};
pub use sanitize::sanitize_html;
