//! List command - print the validated entries of a collection

use std::fmt::Write as _;

use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr};
use folio_core::{BlogEntry, Collection, Config, ProjectEntry, Registry};

/// Collections that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollectionName {
    Blog,
    Projects,
}

/// Run the list command.
pub fn run(config: &Config, collection: CollectionName, json: bool) -> Result<()> {
    let registry = Registry::from_config(config)?;
    let mode = registry.mode();

    let output = match collection {
        CollectionName::Blog => {
            let blog = registry.blog.load(mode).wrap_err("Blog collection is invalid")?;
            if json {
                serde_json::to_string_pretty(&blog)?
            } else {
                format_blog(&blog)
            }
        }
        CollectionName::Projects => {
            let projects = registry
                .projects
                .load(mode)
                .wrap_err("Projects collection is invalid")?;
            if json {
                serde_json::to_string_pretty(&projects)?
            } else {
                format_projects(&projects)
            }
        }
    };

    println!("{output}");
    Ok(())
}

/// One line per post: id, publication date, title.
pub fn format_blog(blog: &Collection<BlogEntry>) -> String {
    let mut out = String::new();
    for entry in blog.iter() {
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            entry.id,
            entry.data.pub_date.format("%Y-%m-%d"),
            entry.data.title
        );
    }
    let _ = write!(out, "{} post(s)", blog.len());
    out
}

/// One line per project: id, status, technologies, title.
pub fn format_projects(projects: &Collection<ProjectEntry>) -> String {
    let mut out = String::new();
    for entry in projects.iter() {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            entry.id,
            entry.data.status,
            entry.data.technologies.join(", "),
            entry.data.title
        );
    }
    let _ = write!(out, "{} project(s)", projects.len());
    out
}

#[cfg(test)]
mod tests {
    use std::fs;

    use folio_core::{CollectionDef, ValidationMode};

    use super::*;

    #[test]
    fn test_format_projects() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dir.path().join("content/projects");
        fs::create_dir_all(&base).expect("mkdir");
        fs::write(
            base.join("meshum.md"),
            "---\ntitle: Meshum\ndescription: Knowledge layer\nstartDate: 2024-01-01\ntechnologies: [Rust, Elixir]\n---\n",
        )
        .expect("write");

        let projects = CollectionDef::<ProjectEntry>::new(dir.path())
            .expect("def")
            .load(ValidationMode::CollectAll)
            .expect("load");

        assert_eq!(
            format_projects(&projects),
            "meshum\tactive\tRust, Elixir\tMeshum\n1 project(s)"
        );
    }

    #[test]
    fn test_blog_json_shape() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dir.path().join("content/blog");
        fs::create_dir_all(&base).expect("mkdir");
        fs::write(
            base.join("hello.md"),
            "---\ntitle: Hello\ndescription: Hi\npubDate: 2024-01-01\n---\nBody",
        )
        .expect("write");

        let blog = CollectionDef::<BlogEntry>::new(dir.path())
            .expect("def")
            .load(ValidationMode::CollectAll)
            .expect("load");

        let value = serde_json::to_value(&blog).expect("json");
        assert_eq!(value["name"], "blog");
        assert_eq!(value["entries"][0]["id"], "hello");
        assert_eq!(value["entries"][0]["format"], "markdown");
        assert_eq!(value["entries"][0]["data"]["pubDate"], "2024-01-01T00:00:00Z");
        assert!(value["entries"][0].get("body").is_none());

        assert_eq!(format_blog(&blog), "hello\t2024-01-01\tHello\n1 post(s)");
    }
}
