//! Page image source resolution and retrieval.
//!
//! The resolver turns the manifest's page list into an ordered list of
//! image locations, preferring backend-resolved URLs and otherwise joining
//! the media base with the conventional `projects/<slug>/pages/<file>`
//! layout. Plain-`http` URLs are rewritten to `https` as a string
//! transform so a published book never mixes content schemes.

use crate::document::Document;
use anyhow::{Context, Result};
use std::fs;
use tracing::{debug, warn};

/// Build the ordered image location list for a document. Output length and
/// order always match the page list; an empty page list yields an empty
/// vector and the caller renders its not-ready state.
pub fn resolve_image_urls(document: &Document, media_base: &str) -> Vec<String> {
    let urls: Vec<String> = document
        .pages
        .iter()
        .map(|page| match &page.image_url {
            Some(url) if !url.trim().is_empty() => normalize_scheme(url.trim()),
            _ => normalize_scheme(&join_media_url(media_base, &document.slug, &page.file)),
        })
        .collect();
    debug!(
        slug = %document.slug,
        resolved = urls.len(),
        "Resolved page image sources"
    );
    urls
}

/// Rewrite `http://` to `https://`; every other form passes through
/// untouched (relative paths, already-secure URLs, local files).
pub fn normalize_scheme(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

fn join_media_url(media_base: &str, slug: &str, file: &str) -> String {
    let base = media_base.trim_end_matches('/');
    if base.is_empty() {
        format!("projects/{slug}/pages/{file}")
    } else {
        format!("{base}/projects/{slug}/pages/{file}")
    }
}

/// Fetch and decode one page image, returning the raw encoded bytes for the
/// renderer. Decoding up front turns a truncated download or a bad file
/// into an error here rather than a blank widget later.
pub fn load_image_bytes(location: &str) -> Result<Vec<u8>> {
    let bytes = if crate::document::is_remote(location) {
        let response = reqwest::blocking::get(location)
            .with_context(|| format!("Failed to fetch page image {location}"))?
            .error_for_status()
            .with_context(|| format!("Page image request to {location} was rejected"))?;
        response
            .bytes()
            .with_context(|| format!("Failed to read page image body from {location}"))?
            .to_vec()
    } else {
        fs::read(location).with_context(|| format!("Failed to read page image {location}"))?
    };

    if let Err(err) = image::load_from_memory(&bytes) {
        warn!(location, "Page image failed to decode: {err}");
        return Err(err).with_context(|| format!("Page image {location} is not decodable"));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Page};

    fn document_with(pages: Vec<Page>) -> Document {
        Document {
            slug: "spring-catalogue".into(),
            title: String::new(),
            total_pages: pages.len(),
            can_download: false,
            pages,
        }
    }

    fn page(n: usize, image_url: Option<&str>) -> Page {
        Page {
            page_number: n,
            file: format!("page-{n:03}.jpg"),
            width: 800,
            height: 600,
            image_url: image_url.map(str::to_string),
        }
    }

    #[test]
    fn prefers_resolved_url() {
        let doc = document_with(vec![page(1, Some("https://cdn.example.com/p1.jpg"))]);
        let urls = resolve_image_urls(&doc, "https://media.example.com");
        assert_eq!(urls, vec!["https://cdn.example.com/p1.jpg"]);
    }

    #[test]
    fn constructs_fallback_from_media_base() {
        let doc = document_with(vec![page(1, None), page(2, None)]);
        let urls = resolve_image_urls(&doc, "https://media.example.com/");
        assert_eq!(
            urls,
            vec![
                "https://media.example.com/projects/spring-catalogue/pages/page-001.jpg",
                "https://media.example.com/projects/spring-catalogue/pages/page-002.jpg",
            ]
        );
    }

    #[test]
    fn upgrades_insecure_scheme() {
        let doc = document_with(vec![page(1, Some("http://cdn.example.com/p1.jpg"))]);
        let urls = resolve_image_urls(&doc, "http://media.example.com");
        assert_eq!(urls, vec!["https://cdn.example.com/p1.jpg"]);

        let doc = document_with(vec![page(1, None)]);
        let urls = resolve_image_urls(&doc, "http://media.example.com");
        assert!(urls[0].starts_with("https://media.example.com/"));
    }

    #[test]
    fn keeps_local_paths_untouched() {
        let doc = document_with(vec![page(1, None)]);
        let urls = resolve_image_urls(&doc, "/srv/media");
        assert_eq!(
            urls,
            vec!["/srv/media/projects/spring-catalogue/pages/page-001.jpg"]
        );
    }

    #[test]
    fn empty_page_list_resolves_to_empty() {
        let doc = document_with(Vec::new());
        assert!(resolve_image_urls(&doc, "https://media.example.com").is_empty());
    }

    #[test]
    fn output_order_matches_page_order() {
        let doc = document_with(vec![page(1, None), page(2, Some("https://x/p2.jpg")), page(3, None)]);
        let urls = resolve_image_urls(&doc, "base");
        assert_eq!(urls.len(), 3);
        assert!(urls[0].ends_with("page-001.jpg"));
        assert_eq!(urls[1], "https://x/p2.jpg");
        assert!(urls[2].ends_with("page-003.jpg"));
    }
}
