use std::collections::HashSet;

use ammonia::Builder;

/// Tags a summary snippet may keep: text formatting, lists, tables,
/// images, links, figures. Everything else is stripped.
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "u", "a", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote", "code", "pre", "img", "figure", "figcaption", "table", "thead", "tbody", "tr",
    "th", "td", "div", "span",
];

const ALLOWED_ATTRS: &[&str] = &["href", "target", "rel", "src", "alt", "title", "class", "style"];

/// Cleans backend-provided HTML before it is stored on an article.
///
/// This is a security boundary: ammonia removes `<script>` elements and
/// event-handler attributes unconditionally, independent of the allow-list,
/// so encoding tricks cannot smuggle executable markup through. data-*
/// attributes are not allowed.
pub fn sanitize_html(html: &str) -> String {
    Builder::default()
        .tags(HashSet::from_iter(ALLOWED_TAGS.iter().copied()))
        .generic_attributes(HashSet::from_iter(ALLOWED_ATTRS.iter().copied()))
        // rel is caller-controlled here, so disable ammonia's own rel rewriting.
        .link_rel(None)
        .clean(html)
        .to_string()
}
