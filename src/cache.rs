//! Bookmark cache: remembers the last viewed page per document source.
//!
//! Entries live under `.cache/` keyed by a hash of the locator source so
//! URLs and odd path characters never leak into filenames. The format is a
//! tiny TOML file with a single `page` field. Failures are swallowed; a
//! missing or corrupt bookmark just means the book opens at its start.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

pub const CACHE_DIR: &str = ".cache";

#[derive(serde::Serialize, serde::Deserialize)]
struct Bookmark {
    page: usize,
}

/// Load the cached 0-based page index for a document source, if present.
pub fn load_bookmark(source: &str) -> Option<usize> {
    let data = fs::read_to_string(bookmark_path(source)).ok()?;
    let bookmark: Bookmark = toml::from_str(&data).ok()?;
    Some(bookmark.page)
}

/// Persist the current 0-based page index. Errors are ignored to keep the
/// interaction thread responsive.
pub fn save_bookmark(source: &str, page: usize) {
    let path = bookmark_path(source);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(contents) = toml::to_string(&Bookmark { page }) {
        let _ = fs::write(path, contents);
    }
}

fn bookmark_path(source: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    PathBuf::from(CACHE_DIR).join(hash).join("bookmark.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_sources_hash_to_distinct_paths() {
        assert_ne!(
            bookmark_path("https://cdn.example.com/a/pages.json"),
            bookmark_path("https://cdn.example.com/b/pages.json")
        );
    }

    #[test]
    fn bookmark_path_is_stable() {
        let first = bookmark_path("books/catalogue");
        let second = bookmark_path("books/catalogue");
        assert_eq!(first, second);
        assert!(first.starts_with(CACHE_DIR));
    }
}
