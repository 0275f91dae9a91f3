//! Collection loading and the registry of the site's collections.
//!
//! Loading a collection discovers its files, parses each file's frontmatter
//! and validates it against the collection schema. A collection is
//! all-or-nothing: if any file fails, no entries are returned.

use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    content::{ContentFormat, entry_id},
    entries::{BlogEntry, CollectionEntry, ProjectEntry},
    error::{CollectionError, CoreError, FileError, Result},
    frontmatter::parse_frontmatter,
    loader::GlobLoader,
    schema::{ValidationContext, ValidationMode},
};

/// One validated content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry<E> {
    /// Slug, unique within the collection.
    pub id: String,

    /// Name of the owning collection.
    pub collection: &'static str,

    /// Source file.
    pub path: PathBuf,

    pub format: ContentFormat,

    /// Content after the frontmatter block.
    #[serde(skip)]
    pub body: String,

    /// Typed frontmatter.
    pub data: E,
}

/// All entries of a collection, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection<E> {
    name: &'static str,
    entries: Vec<Entry<E>>,
}

impl<E> Collection<E> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &[Entry<E>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<E>> {
        self.entries.iter()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&Entry<E>> {
        self.entries
            .binary_search_by(|e| e.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<Entry<E>> {
        self.entries
    }
}

/// A named collection: where its files live and how they are typed.
#[derive(Debug, Clone)]
pub struct CollectionDef<E> {
    loader: GlobLoader,
    _entry: PhantomData<fn() -> E>,
}

impl<E: CollectionEntry> CollectionDef<E> {
    /// Define the collection with its default source under `root`.
    pub fn new(root: &Path) -> Result<Self> {
        Self::with_source(root.join(E::BASE), E::PATTERN)
    }

    /// Define the collection with an explicit base directory and pattern.
    pub fn with_source(base: impl Into<PathBuf>, pattern: &str) -> Result<Self> {
        Ok(Self {
            loader: GlobLoader::new(base, pattern)?,
            _entry: PhantomData,
        })
    }

    pub fn name(&self) -> &'static str {
        E::NAME
    }

    pub fn loader(&self) -> &GlobLoader {
        &self.loader
    }

    /// Discover, parse and validate every file of the collection.
    ///
    /// With [`ValidationMode::FailFast`] only the first failing file (in path
    /// order) is reported, and each file reports only its first failing field.
    pub fn load(&self, mode: ValidationMode) -> std::result::Result<Collection<E>, CollectionError> {
        let base = self.loader.base();
        info!(collection = E::NAME, base = %base.display(), "loading collection");

        let files = self
            .loader
            .discover()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CollectionError::Discover {
                collection: E::NAME,
                message: e.to_string(),
            })?;
        debug!(collection = E::NAME, count = files.len(), "discovered files");

        let results: Vec<_> = files
            .par_iter()
            .map(|path| (path, load_entry::<E>(path, base, mode)))
            .collect();

        let mut entries = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (path, result) in results {
            match result {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!(collection = E::NAME, path = %path.display(), error = %e, "invalid entry");
                    failures.push((path.clone(), e));
                }
            }
        }

        if !failures.is_empty() {
            if mode == ValidationMode::FailFast {
                failures.truncate(1);
            }
            return Err(CollectionError::Invalid {
                collection: E::NAME,
                failures,
            });
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(CollectionError::DuplicateId {
                collection: E::NAME,
                id: pair[0].id.clone(),
                first: pair[0].path.clone(),
                second: pair[1].path.clone(),
            });
        }

        info!(collection = E::NAME, entries = entries.len(), "collection loaded");
        Ok(Collection {
            name: E::NAME,
            entries,
        })
    }
}

/// Read and validate a single content file of collection `E`.
pub fn load_entry<E: CollectionEntry>(
    path: &Path,
    base: &Path,
    mode: ValidationMode,
) -> std::result::Result<Entry<E>, FileError> {
    let text = fs::read_to_string(path)?;
    let (raw, body) = parse_frontmatter(&text, path).map_err(|e| match e {
        CoreError::Frontmatter { message, .. } => FileError::Frontmatter(message),
        other => FileError::Frontmatter(other.to_string()),
    })?;

    let ctx = ValidationContext::new(path, mode);
    let record = E::schema().validate(&raw, &ctx).map_err(FileError::Fields)?;
    let data = E::from_record(record).map_err(|e| FileError::Fields(vec![e]))?;

    let relative = path.strip_prefix(base).unwrap_or(path);
    let slug = raw.get("slug").and_then(|v| v.as_str());
    let id = entry_id(relative, slug).ok_or(FileError::EmptyId)?;

    Ok(Entry {
        id,
        collection: E::NAME,
        path: path.to_path_buf(),
        format: ContentFormat::from_path(path).unwrap_or(ContentFormat::Markdown),
        body,
        data,
    })
}

/// The site's collections.
#[derive(Debug, Clone)]
pub struct Registry {
    pub blog: CollectionDef<BlogEntry>,
    pub projects: CollectionDef<ProjectEntry>,
    mode: ValidationMode,
}

impl Registry {
    /// Names of every registered collection.
    pub const NAMES: [&'static str; 2] = [BlogEntry::NAME, ProjectEntry::NAME];

    /// Registry with default sources under `root`.
    pub fn new(root: &Path) -> Result<Self> {
        Ok(Self {
            blog: CollectionDef::new(root)?,
            projects: CollectionDef::new(root)?,
            mode: ValidationMode::default(),
        })
    }

    /// Registry honoring source overrides and validation mode from config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let root = &config.content.root;
        let blog = &config.collections.blog;
        let projects = &config.collections.projects;

        Ok(Self {
            blog: CollectionDef::with_source(
                blog.base_under::<BlogEntry>(root),
                blog.pattern_or::<BlogEntry>(),
            )?,
            projects: CollectionDef::with_source(
                projects.base_under::<ProjectEntry>(root),
                projects.pattern_or::<ProjectEntry>(),
            )?,
            mode: config.validation.mode,
        })
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Load every collection. Stops at the first collection that fails.
    pub fn load_all(&self) -> Result<SiteContent> {
        Ok(SiteContent {
            blog: self.blog.load(self.mode)?,
            projects: self.projects.load(self.mode)?,
        })
    }
}

/// Every collection of the site, validated.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContent {
    pub blog: Collection<BlogEntry>,
    pub projects: Collection<ProjectEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    #[test]
    fn test_load_entry_derives_id_and_body() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dir.path().join("content/blog");
        write(
            &base,
            "2024/Hello World.mdx",
            "---\ntitle: Hello\ndescription: Hi\npubDate: 2024-01-01\n---\n# Body\n",
        );

        let path = base.join("2024/Hello World.mdx");
        let entry = load_entry::<BlogEntry>(&path, &base, ValidationMode::CollectAll)
            .expect("valid entry");

        assert_eq!(entry.id, "2024/hello-world");
        assert_eq!(entry.collection, "blog");
        assert_eq!(entry.format, ContentFormat::Mdx);
        assert_eq!(entry.body, "# Body\n");
        assert_eq!(entry.data.title, "Hello");
    }

    #[test]
    fn test_load_entry_honors_slug() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dir.path();
        write(
            base,
            "draft.md",
            "---\ntitle: T\ndescription: D\npubDate: 2024-01-01\nslug: launch\n---\n",
        );

        let entry = load_entry::<BlogEntry>(&base.join("draft.md"), base, ValidationMode::CollectAll)
            .expect("valid entry");
        assert_eq!(entry.id, "launch");
    }

    #[test]
    fn test_load_entry_rejects_unnamed_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dir.path();
        let post = "---\ntitle: T\ndescription: D\npubDate: 2024-01-01\nslug: /\n---\n";
        write(base, "!!!.md", post);
        write(base, "kept.md", post);

        let err = load_entry::<BlogEntry>(&base.join("!!!.md"), base, ValidationMode::CollectAll)
            .unwrap_err();
        assert!(matches!(err, FileError::EmptyId));

        let entry = load_entry::<BlogEntry>(&base.join("kept.md"), base, ValidationMode::CollectAll)
            .expect("valid entry");
        assert_eq!(entry.id, "kept");
    }

    #[test]
    fn test_load_entry_bad_frontmatter() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "bad.md", "---\ntitle: [unclosed\n---\n");

        let err = load_entry::<BlogEntry>(
            &dir.path().join("bad.md"),
            dir.path(),
            ValidationMode::CollectAll,
        )
        .unwrap_err();
        assert!(matches!(err, FileError::Frontmatter(_)));
    }

    #[test]
    fn test_collection_get_by_id() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();
        for name in ["b", "a", "c"] {
            write(
                root,
                &format!("content/blog/{name}.md"),
                "---\ntitle: T\ndescription: D\npubDate: 2024-01-01\n---\n",
            );
        }

        let blog = CollectionDef::<BlogEntry>::new(root)
            .expect("def")
            .load(ValidationMode::CollectAll)
            .expect("load");

        let ids: Vec<_> = blog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(blog.get("b").is_some());
        assert!(blog.get("z").is_none());
    }

    #[test]
    fn test_fail_fast_reports_single_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();
        write(root, "content/blog/a.md", "---\ndescription: D\n---\n");
        write(root, "content/blog/b.md", "---\ndescription: D\n---\n");

        let def = CollectionDef::<BlogEntry>::new(root).expect("def");

        let Err(CollectionError::Invalid { failures, .. }) = def.load(ValidationMode::FailFast)
        else {
            panic!("expected invalid collection");
        };
        assert_eq!(failures.len(), 1);
        let FileError::Fields(fields) = &failures[0].1 else {
            panic!("expected field errors");
        };
        assert_eq!(fields.len(), 1);

        let Err(CollectionError::Invalid { failures, .. }) = def.load(ValidationMode::CollectAll)
        else {
            panic!("expected invalid collection");
        };
        assert_eq!(failures.len(), 2);
    }

    #[test]
    fn test_registry_names() {
        assert_eq!(Registry::NAMES, ["blog", "projects"]);
    }
}
