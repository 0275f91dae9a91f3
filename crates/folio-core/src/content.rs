//! Content file formats and entry ids.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Format of a content source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// Markdown content (.md files).
    Markdown,
    /// MDX content (.mdx files).
    Mdx,
}

impl ContentFormat {
    /// Determine content format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "mdx" => Some(Self::Mdx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }

    /// Get the file extension for this content format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mdx => "mdx",
        }
    }
}

/// Derive the id of an entry from its path relative to the collection base.
///
/// A `slug` given in frontmatter wins. Otherwise the extension is dropped,
/// each path segment is slugified and a trailing `index` collapses into its
/// directory:
/// - `hello-world.md` → `hello-world`
/// - `2024/My First Post.mdx` → `2024/my-first-post`
/// - `meshum/index.md` → `meshum`
///
/// A slug made only of slashes is ignored. Returns `None` when the path
/// slugifies to nothing, e.g. `!!!.md`.
pub fn entry_id(relative: &Path, slug_override: Option<&str>) -> Option<String> {
    if let Some(slug) = slug_override
        .map(|s| s.trim().trim_matches('/'))
        .filter(|s| !s.is_empty())
    {
        return Some(slug.to_string());
    }

    let without_ext = relative.with_extension("");
    let mut segments: Vec<String> = without_ext
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() > 1 && segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    (!segments.is_empty()).then(|| segments.join("/"))
}

/// Slugify one path segment: lowercase, whitespace to `-`, punctuation
/// other than `-` and `_` removed.
pub fn slugify(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else {
                None
            }
        })
        .flat_map(char::to_lowercase)
        .collect()
}
