//! Folio Core Library
//!
//! Site identity constants and the validated content collections (blog
//! posts and projects) of a personal website.

pub mod collection;
pub mod config;
pub mod content;
pub mod entries;
pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod schema;
pub mod site;

pub use collection::{Collection, CollectionDef, Entry, Registry, SiteContent};
pub use self::config::Config;
pub use content::ContentFormat;
pub use entries::{BlogEntry, CollectionEntry, ProjectEntry, ProjectStatus};
pub use error::{CollectionError, CoreError, FieldError, FieldErrorKind, FileError, Result};
pub use frontmatter::RawFrontmatter;
pub use loader::GlobLoader;
pub use schema::{ImageRef, Schema, ValidationMode};
pub use site::{SITE, SiteMetadata};
