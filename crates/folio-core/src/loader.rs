//! Glob-based discovery of collection source files.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{CoreError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Finds the files of a collection: every file under `base` whose relative
/// path matches `pattern`.
#[derive(Debug, Clone)]
pub struct GlobLoader {
    base: PathBuf,
    pattern: String,
    compiled: Vec<Pattern>,
}

impl GlobLoader {
    /// Create a loader. `pattern` may contain one `{a,b}` alternation.
    pub fn new(base: impl Into<PathBuf>, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let compiled = expand_braces(&pattern)
            .iter()
            .map(|p| Pattern::new(p).map_err(|e| CoreError::pattern(&pattern, e.to_string())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base: base.into(),
            pattern,
            compiled,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether a path relative to the base matches the pattern.
    pub fn matches(&self, relative: &Path) -> bool {
        let relative = relative
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect::<Vec<_>>()
            .join("/");

        self.compiled
            .iter()
            .any(|p| p.matches_with(&relative, MATCH_OPTIONS))
    }

    /// Lazily walk the base directory, yielding matching files in file-name
    /// order. Hidden files and directories are skipped and symlinks are not
    /// followed. A missing base directory yields nothing.
    pub fn discover(&self) -> Box<dyn Iterator<Item = walkdir::Result<PathBuf>> + '_> {
        if !self.base.is_dir() {
            warn!(base = %self.base.display(), "collection directory does not exist");
            return Box::new(std::iter::empty());
        }

        let walker = WalkDir::new(&self.base)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));

        Box::new(walker.filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let relative = entry.path().strip_prefix(&self.base).ok()?;
                if self.matches(relative) {
                    Some(Ok(entry.into_path()))
                } else {
                    debug!(path = %entry.path().display(), "skipping non-matching file");
                    None
                }
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        }))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Expand the first `{a,b,...}` group into one pattern per alternative.
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };
    let Some(close) = pattern[open..].find('}').map(|i| open + i) else {
        return vec![pattern.to_string()];
    };

    let (prefix, suffix) = (&pattern[..open], &pattern[close + 1..]);
    pattern[open + 1..close]
        .split(',')
        .flat_map(|alt| expand_braces(&format!("{prefix}{alt}{suffix}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("**/*.{md,mdx}"), vec!["**/*.md", "**/*.mdx"]);
        assert_eq!(expand_braces("*.md"), vec!["*.md"]);
        assert_eq!(
            expand_braces("{a,b}/*.{x,y}"),
            vec!["a/*.x", "a/*.y", "b/*.x", "b/*.y"]
        );
    }

    #[test]
    fn test_matches_nested_and_top_level() {
        let loader = GlobLoader::new("content/blog", "**/*.{md,mdx}").expect("loader");
        assert!(loader.matches(Path::new("post.md")));
        assert!(loader.matches(Path::new("2024/post.mdx")));
        assert!(!loader.matches(Path::new("post.txt")));
        assert!(!loader.matches(Path::new("post.markdown")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = GlobLoader::new("content", "***/x.md").unwrap_err();
        assert!(err.to_string().contains("Invalid glob pattern"));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dir.path();
        fs::create_dir_all(base.join("nested")).expect("mkdir");
        fs::create_dir_all(base.join(".drafts")).expect("mkdir");
        for file in [
            "b.md",
            "a.mdx",
            "nested/c.md",
            "notes.txt",
            ".hidden.md",
            ".drafts/d.md",
        ] {
            fs::write(base.join(file), "---\n---\n").expect("write");
        }

        let loader = GlobLoader::new(base, "**/*.{md,mdx}").expect("loader");
        let found: Vec<_> = loader
            .discover()
            .map(|r| r.expect("walk"))
            .map(|p| p.strip_prefix(base).expect("prefix").to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                PathBuf::from("a.mdx"),
                PathBuf::from("b.md"),
                PathBuf::from("nested/c.md"),
            ]
        );
    }

    #[test]
    fn test_discover_missing_base() {
        let loader = GlobLoader::new("/nonexistent/content/blog", "**/*.md").expect("loader");
        assert_eq!(loader.discover().count(), 0);
    }
}
