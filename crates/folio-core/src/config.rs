//! Project configuration (`folio.toml`).
//!
//! Every setting has a default, so a project without a config file behaves
//! exactly like one with an empty file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    entries::CollectionEntry,
    error::{CoreError, Result},
    schema::ValidationMode,
};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "folio.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the project lives.
    #[serde(default)]
    pub content: ContentConfig,

    /// Validation behavior.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Per-collection source overrides.
    #[serde(default)]
    pub collections: CollectionsConfig,
}

/// Content location settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Project root that collection bases are resolved against.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

/// Validation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Report every failing field, or stop at the first one.
    #[serde(default)]
    pub mode: ValidationMode,
}

/// Source overrides for each collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default)]
    pub blog: CollectionSource,

    #[serde(default)]
    pub projects: CollectionSource,
}

/// Where a collection's files come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionSource {
    /// Base directory, relative to the content root.
    #[serde(default)]
    pub base: Option<PathBuf>,

    /// File pattern under the base directory.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl CollectionSource {
    /// The base directory for collection `E`, resolved under `root`.
    pub fn base_under<E: CollectionEntry>(&self, root: &Path) -> PathBuf {
        root.join(self.base.as_deref().unwrap_or(Path::new(E::BASE)))
    }

    /// The file pattern for collection `E`.
    pub fn pattern_or<E: CollectionEntry>(&self) -> &str {
        self.pattern.as_deref().unwrap_or(E::PATTERN)
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration if the file exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration using the config crate, layering `FOLIO__*`
    /// environment variables over the (optional) file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        let sources = [
            ("blog", &self.collections.blog),
            ("projects", &self.collections.projects),
        ];

        for (name, source) in sources {
            if source.pattern.as_deref().is_some_and(|p| p.trim().is_empty()) {
                return Err(CoreError::config(format!(
                    "collections.{name}.pattern cannot be empty"
                )));
            }
            if source.base.as_deref().is_some_and(Path::is_absolute) {
                tracing::warn!(
                    collection = name,
                    "collections.{name}.base is absolute and ignores content.root"
                );
            }
        }

        if self.collections.blog.base.is_some()
            && self.collections.blog.base == self.collections.projects.base
        {
            return Err(CoreError::config(
                "collections.blog.base and collections.projects.base must differ",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::entries::{BlogEntry, ProjectEntry};

    fn create_test_config() -> String {
        r#"
[content]
root = "site"

[validation]
mode = "fail-fast"

[collections.blog]
base = "posts"

[collections.projects]
pattern = "*.md"
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join(CONFIG_FILE);
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.content.root, PathBuf::from("site"));
        assert_eq!(config.validation.mode, ValidationMode::FailFast);
        assert_eq!(
            config.collections.blog.base_under::<BlogEntry>(&config.content.root),
            PathBuf::from("site/posts")
        );
        assert_eq!(config.collections.blog.pattern_or::<BlogEntry>(), "**/*.{md,mdx}");
        assert_eq!(
            config
                .collections
                .projects
                .base_under::<ProjectEntry>(&config.content.root),
            PathBuf::from("site/content/projects")
        );
        assert_eq!(config.collections.projects.pattern_or::<ProjectEntry>(), "*.md");
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join(CONFIG_FILE);
        std::fs::write(&config_path, "").expect("write");

        let config = Config::load(&config_path).expect("load config");
        assert_eq!(config, Config::default());
        assert_eq!(config.content.root, PathBuf::from("."));
        assert_eq!(config.validation.mode, ValidationMode::CollectAll);
    }

    #[test]
    fn test_config_validation_empty_pattern() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join(CONFIG_FILE);
        std::fs::write(&config_path, "[collections.blog]\npattern = \" \"\n").expect("write");

        let result = Config::load(&config_path);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("pattern cannot be empty")
        );
    }

    #[test]
    fn test_config_validation_shared_base() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &config_path,
            "[collections.blog]\nbase = \"x\"\n[collections.projects]\nbase = \"x\"\n",
        )
        .expect("write");

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/folio.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));

        let config = Config::load_or_default(Path::new("/nonexistent/folio.toml"))
            .expect("defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_with_env_missing_file() {
        let config =
            Config::load_with_env(Path::new("/nonexistent/folio.toml")).expect("load config");
        assert_eq!(config.collections, CollectionsConfig::default());
    }
}
