//! Flipbook manifest loading.
//!
//! A flipbook is described by a `pages.json` manifest produced by the
//! conversion pipeline. This module knows how to fetch the manifest from a
//! local path or an HTTP(S) URL, deserialize it, and check the page-order
//! invariant. Rendering concerns live elsewhere; an empty or inconsistent
//! page list is reported by `validate` so the UI can show an explicit
//! "document incomplete" state instead of a blank viewer.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One page of the flipbook, as listed in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub page_number: usize,
    pub file: String,
    pub width: u32,
    pub height: u32,
    /// Already-resolved absolute image URL, when the backend provided one.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// The flipbook document: identity plus the ordered page list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub total_pages: usize,
    /// Pass-through flag from the publishing workflow; the viewer only
    /// surfaces a download action when it is set.
    #[serde(default)]
    pub can_download: bool,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Document {
    /// First page's pixel size; it fixes the aspect ratio for the whole
    /// book (pages are assumed uniform).
    pub fn first_page_size(&self) -> Option<(u32, u32)> {
        self.pages.first().map(|page| (page.width, page.height))
    }

    /// Check the page-order invariant: a non-empty list of 1-based,
    /// contiguous page numbers with positive dimensions. A violation means
    /// the conversion pipeline has not finished (or produced garbage), and
    /// the viewer renders the incomplete-data state.
    pub fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            return Err(anyhow!("manifest lists no pages"));
        }
        for (idx, page) in self.pages.iter().enumerate() {
            if page.page_number != idx + 1 {
                return Err(anyhow!(
                    "page numbering is not contiguous: position {} carries page_number {}",
                    idx + 1,
                    page.page_number
                ));
            }
            if page.width == 0 || page.height == 0 {
                return Err(anyhow!("page {} has a zero dimension", page.page_number));
            }
        }
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Load a manifest from a local path or an HTTP(S) URL. The `source` is the
/// query-free part of the document locator; a directory is accepted and
/// resolved to its `pages.json`.
pub fn load_document(source: &str) -> Result<Document> {
    let raw = if is_remote(source) {
        info!(url = source, "Fetching flipbook manifest");
        let response = reqwest::blocking::get(source)
            .with_context(|| format!("Failed to fetch manifest from {source}"))?
            .error_for_status()
            .with_context(|| format!("Manifest request to {source} was rejected"))?;
        response
            .text()
            .with_context(|| format!("Failed to read manifest body from {source}"))?
    } else {
        let path = Path::new(source);
        let path = if path.is_dir() {
            path.join("pages.json")
        } else {
            path.to_path_buf()
        };
        info!(path = %path.display(), "Loading flipbook manifest");
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest at {}", path.display()))?
    };

    let document: Document = serde_json::from_str(&raw).context("Manifest is not valid JSON")?;
    debug!(
        slug = %document.slug,
        pages = document.pages.len(),
        total_pages = document.total_pages,
        "Parsed manifest"
    );
    Ok(document)
}

/// Base location for page images when the manifest does not carry resolved
/// URLs: the configured media base if set, else the manifest's own parent.
pub fn media_base_for(source: &str, configured: &str) -> String {
    if !configured.trim().is_empty() {
        return configured.trim_end_matches('/').to_string();
    }
    if is_remote(source) {
        match source.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => source.to_string(),
        }
    } else {
        let path = Path::new(source);
        let parent = if path.is_dir() {
            path
        } else {
            path.parent().unwrap_or(path)
        };
        parent.to_string_lossy().into_owned()
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pages: Vec<Page>) -> Document {
        Document {
            slug: "catalogue".into(),
            title: "Catalogue".into(),
            total_pages: pages.len(),
            can_download: false,
            pages,
        }
    }

    fn page(n: usize) -> Page {
        Page {
            page_number: n,
            file: format!("page-{n:03}.jpg"),
            width: 800,
            height: 600,
            image_url: None,
        }
    }

    #[test]
    fn contiguous_pages_validate() {
        assert!(sample(vec![page(1), page(2), page(3)]).validate().is_ok());
    }

    #[test]
    fn empty_page_list_is_invalid() {
        assert!(sample(Vec::new()).validate().is_err());
    }

    #[test]
    fn gap_in_numbering_is_invalid() {
        assert!(sample(vec![page(1), page(3)]).validate().is_err());
    }

    #[test]
    fn zero_dimension_is_invalid() {
        let mut broken = page(1);
        broken.height = 0;
        assert!(sample(vec![broken]).validate().is_err());
    }

    #[test]
    fn manifest_parses_with_optional_fields_missing() {
        let raw = r#"{"slug":"b","pages":[{"page_number":1,"file":"p1.jpg","width":800,"height":600}]}"#;
        let document: Document = serde_json::from_str(raw).unwrap();
        assert_eq!(document.pages.len(), 1);
        assert!(document.pages[0].image_url.is_none());
        assert!(!document.can_download);
    }

    #[test]
    fn media_base_prefers_configuration() {
        assert_eq!(
            media_base_for("/data/books/pages.json", "https://media.example.com/"),
            "https://media.example.com"
        );
    }

    #[test]
    fn media_base_falls_back_to_manifest_parent() {
        assert_eq!(
            media_base_for("https://cdn.example.com/books/b1/pages.json", ""),
            "https://cdn.example.com/books/b1"
        );
    }
}
