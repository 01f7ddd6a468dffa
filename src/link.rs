//! Share-link handling for the viewer.
//!
//! A flipbook is opened from a locator string (a filesystem path or an
//! HTTP(S) URL) that may carry a `page` query parameter. The parameter is
//! 1-based: `?page=3` positions the viewer at index 2. On every committed
//! flip the viewer rewrites its share link so the current page always
//! round-trips; other query parameters are preserved untouched.

/// A parsed document locator: the query-free source plus the optional
/// requested page number (1-based) and any extra query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocator {
    pub source: String,
    pub page: Option<usize>,
    extra: Vec<(String, String)>,
}

impl DocumentLocator {
    /// Parse a raw locator. Non-numeric or zero `page` values are treated
    /// as absent rather than an error.
    pub fn parse(raw: &str) -> DocumentLocator {
        let (source, query) = match raw.split_once('?') {
            Some((source, query)) => (source.to_string(), query),
            None => (raw.to_string(), ""),
        };

        let mut page = None;
        let mut extra = Vec::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(key)
                .map(|k| k.into_owned())
                .unwrap_or_else(|_| key.to_string());
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            if key == "page" {
                page = value.parse::<usize>().ok().filter(|n| *n >= 1);
            } else {
                extra.push((key, value));
            }
        }

        DocumentLocator {
            source,
            page,
            extra,
        }
    }

    /// Render the share link for a 1-based page number, keeping all other
    /// query parameters in their original order.
    pub fn link_for_page(&self, page_number: usize) -> String {
        let mut link = self.source.clone();
        let mut separator = '?';
        for (key, value) in &self.extra {
            link.push(separator);
            link.push_str(&urlencoding::encode(key));
            link.push('=');
            link.push_str(&urlencoding::encode(value));
            separator = '&';
        }
        link.push(separator);
        link.push_str("page=");
        link.push_str(&page_number.to_string());
        link
    }

    /// The 0-based start index requested by the locator, if it falls inside
    /// the document. Out-of-range requests are discarded, matching the
    /// mount semantics: an invalid `page` parameter behaves as if absent.
    pub fn start_index(&self, total_pages: usize) -> Option<usize> {
        self.page
            .filter(|n| *n >= 1 && *n <= total_pages)
            .map(|n| n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_page_parameter() {
        let locator = DocumentLocator::parse("books/catalogue/pages.json?page=3");
        assert_eq!(locator.source, "books/catalogue/pages.json");
        assert_eq!(locator.page, Some(3));
        assert_eq!(locator.start_index(10), Some(2));
    }

    #[test]
    fn missing_or_invalid_page_is_absent() {
        assert_eq!(DocumentLocator::parse("pages.json").page, None);
        assert_eq!(DocumentLocator::parse("pages.json?page=abc").page, None);
        assert_eq!(DocumentLocator::parse("pages.json?page=0").page, None);
    }

    #[test]
    fn out_of_range_page_is_discarded_on_mount() {
        let locator = DocumentLocator::parse("pages.json?page=11");
        assert_eq!(locator.start_index(10), None);
    }

    #[test]
    fn link_round_trips_through_parse() {
        let locator = DocumentLocator::parse("https://example.com/b/pages.json?page=3");
        let link = locator.link_for_page(5);
        assert_eq!(link, "https://example.com/b/pages.json?page=5");
        assert_eq!(DocumentLocator::parse(&link).start_index(10), Some(4));
    }

    #[test]
    fn preserves_foreign_query_parameters() {
        let locator = DocumentLocator::parse("pages.json?embed=1&page=2&ref=mail%20shot");
        let link = locator.link_for_page(7);
        assert_eq!(link, "pages.json?embed=1&ref=mail%20shot&page=7");
        let reparsed = DocumentLocator::parse(&link);
        assert_eq!(reparsed.page, Some(7));
    }
}
