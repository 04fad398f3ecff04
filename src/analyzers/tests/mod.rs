mod typography_tests;

use crate::dom::Page;

pub(super) const PAGE_URL: &str = "https://example.com/index.html";

/// Static page fixture served from [`PAGE_URL`]
pub(super) fn page(html: &str) -> Page {
    Page::from_html(html, PAGE_URL).unwrap()
}
