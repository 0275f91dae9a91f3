//! Check command - validate every content collection

use color_eyre::eyre::{Result, bail};
use folio_core::{
    CollectionDef, CollectionEntry, CollectionError, Config, FileError, Registry, ValidationMode,
};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Loads every collection and reports each failing file and field.
pub fn run(config: &Config, strict: bool) -> Result<()> {
    tracing::info!(strict, mode = ?config.validation.mode, "Checking content collections");

    let registry = Registry::from_config(config)?;
    let result = validate(&registry);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Validate every collection of the registry.
pub fn validate(registry: &Registry) -> ValidationResult {
    let mut result = ValidationResult::default();
    let mode = registry.mode();

    check_collection(&registry.blog, mode, &mut result);
    check_collection(&registry.projects, mode, &mut result);

    result
}

fn check_collection<E: CollectionEntry>(
    def: &CollectionDef<E>,
    mode: ValidationMode,
    result: &mut ValidationResult,
) {
    let name = def.name();
    let base = def.loader().base();
    println!("Checking collection '{name}' ({})...", base.display());

    if !base.is_dir() {
        result.add_warning(format!(
            "{name}: directory {} does not exist",
            base.display()
        ));
        println!("  ⚠ {} missing", base.display());
        return;
    }

    match def.load(mode) {
        Ok(collection) if collection.is_empty() => {
            result.add_warning(format!(
                "{name}: no files match '{}'",
                def.loader().pattern()
            ));
            println!("  ⚠ No entries");
        }
        Ok(collection) => {
            println!("  ✓ All {} entries valid", collection.len());
        }
        Err(CollectionError::Invalid { failures, .. }) => {
            println!("  ✗ {} file(s) have errors", failures.len());
            for (path, err) in failures {
                match err {
                    FileError::Fields(fields) => {
                        for field in fields {
                            result.add_error(format!("{name}: {}: {field}", path.display()));
                        }
                    }
                    other => result.add_error(format!("{name}: {}: {other}", path.display())),
                }
            }
        }
        Err(e) => {
            println!("  ✗ {e}");
            result.add_error(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    fn registry(root: &Path) -> Registry {
        Registry::new(root).expect("registry")
    }

    #[test]
    fn test_missing_directories_are_warnings() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let result = validate(&registry(dir.path()));

        assert!(!result.has_errors());
        assert_eq!(result.warnings().len(), 2);
        assert!(result.warnings()[0].starts_with("blog:"));
    }

    #[test]
    fn test_field_errors_are_reported_per_field() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(
            dir.path(),
            "content/blog/bad.md",
            "---\ndescription: D\npubDate: not-a-date\n---\n",
        );
        write(
            dir.path(),
            "content/projects/ok.md",
            "---\ntitle: X\ndescription: Y\nstartDate: 2024-01-01\ntechnologies: []\n---\n",
        );

        let result = validate(&registry(dir.path()));

        assert_eq!(result.errors().len(), 2);
        assert!(result.errors()[0].contains("bad.md"));
        assert!(result.errors()[0].contains("title: required field is missing"));
        assert!(result.errors()[1].contains("pubDate: invalid date 'not-a-date'"));
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_empty_collection_is_warning() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("content/blog")).expect("mkdir");
        fs::create_dir_all(dir.path().join("content/projects")).expect("mkdir");

        let result = validate(&registry(dir.path()));
        assert!(!result.has_errors());
        assert!(result.warnings().iter().all(|w| w.contains("no files match")));
    }

    #[test]
    fn test_run_fails_on_errors() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "content/blog/bad.md", "---\ntitle: T\n---\n");

        let mut config = Config::default();
        config.content.root = dir.path().to_path_buf();

        let err = run(&config, false).unwrap_err();
        assert!(err.to_string().contains("Validation failed"));
    }

    #[test]
    fn test_run_strict_fails_on_warnings() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut config = Config::default();
        config.content.root = dir.path().to_path_buf();

        assert!(run(&config, false).is_ok());
        assert!(run(&config, true).is_err());
    }
}
