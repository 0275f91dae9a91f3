//! Typed entries for the site's two collections.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{FieldError, FieldErrorKind},
    schema::{Field, FieldKind, ImageRef, Record, Schema},
};

/// Glob used by both collections.
pub const MARKDOWN_PATTERN: &str = "**/*.{md,mdx}";

/// A typed entry built from a validated [`Record`].
pub trait CollectionEntry: Sized + Send {
    /// Collection name, unique across the registry.
    const NAME: &'static str;

    /// Default source directory, relative to the project root.
    const BASE: &'static str;

    /// File-name pattern matched under the base directory.
    const PATTERN: &'static str = MARKDOWN_PATTERN;

    /// Frontmatter schema for this collection.
    fn schema() -> Schema;

    /// Build the entry from a record produced by [`Self::schema`].
    fn from_record(record: Record) -> Result<Self, FieldError>;
}

const BLOG_FIELDS: &[Field] = &[
    Field::required("title", FieldKind::String { min_len: 1 }),
    Field::required("description", FieldKind::String { min_len: 0 }),
    Field::required("pubDate", FieldKind::Date),
    Field::optional("updatedDate", FieldKind::Date),
    Field::optional("heroImage", FieldKind::Image),
];

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogEntry {
    pub title: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<ImageRef>,
}

impl CollectionEntry for BlogEntry {
    const NAME: &'static str = "blog";
    const BASE: &'static str = "content/blog";

    fn schema() -> Schema {
        Schema::new(BLOG_FIELDS)
    }

    fn from_record(mut record: Record) -> Result<Self, FieldError> {
        Ok(Self {
            title: record.require("title", Record::take_string)?,
            description: record.require("description", Record::take_string)?,
            pub_date: record.require("pubDate", Record::take_date)?,
            updated_date: record.take_date("updatedDate"),
            hero_image: record.take_image("heroImage"),
        })
    }
}

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    /// Accepted literals, in declaration order.
    pub const VARIANTS: &'static [&'static str] = &["active", "completed", "archived"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = FieldErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(FieldErrorKind::InvalidEnum {
                value: other.to_string(),
                allowed: Self::VARIANTS,
            }),
        }
    }
}

const PROJECT_FIELDS: &[Field] = &[
    Field::required("title", FieldKind::String { min_len: 0 }),
    Field::required("description", FieldKind::String { min_len: 0 }),
    Field::required("startDate", FieldKind::Date),
    Field::optional("endDate", FieldKind::Date),
    Field::with_default(
        "status",
        FieldKind::Enum {
            variants: ProjectStatus::VARIANTS,
        },
        "active",
    ),
    Field::required("technologies", FieldKind::StringList),
    Field::optional("heroImage", FieldKind::Image),
    Field::optional("githubUrl", FieldKind::Url),
    Field::optional("liveUrl", FieldKind::Url),
    Field::optional("sponsorUrl", FieldKind::Url),
];

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: ProjectStatus,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor_url: Option<String>,
}

impl CollectionEntry for ProjectEntry {
    const NAME: &'static str = "projects";
    const BASE: &'static str = "content/projects";

    fn schema() -> Schema {
        Schema::new(PROJECT_FIELDS)
    }

    fn from_record(mut record: Record) -> Result<Self, FieldError> {
        let status = record
            .require("status", Record::take_string)?
            .parse::<ProjectStatus>()
            .map_err(|kind| FieldError::new("status", kind))?;

        Ok(Self {
            title: record.require("title", Record::take_string)?,
            description: record.require("description", Record::take_string)?,
            start_date: record.require("startDate", Record::take_date)?,
            end_date: record.take_date("endDate"),
            status,
            technologies: record.require("technologies", Record::take_list)?,
            hero_image: record.take_image("heroImage"),
            github_url: record.take_string("githubUrl"),
            live_url: record.take_string("liveUrl"),
            sponsor_url: record.take_string("sponsorUrl"),
        })
    }
}
