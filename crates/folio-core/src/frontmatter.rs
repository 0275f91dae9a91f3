//! Frontmatter extraction for content files.
//!
//! Only the raw key/value block is produced here. Typing and coercion are
//! the job of [`crate::schema`].

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{CoreError, Result};

/// Untyped frontmatter as read from a content file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrontmatter(Mapping);

impl RawFrontmatter {
    /// Parse a YAML mapping. Mostly useful for tests and tooling.
    pub fn from_yaml(source: &str, path: &Path) -> Result<Self> {
        parse_yaml(source, path)
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over the string keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().filter_map(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Mapping> for RawFrontmatter {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// The opening delimiter must be the first non-blank line of the file (a
/// UTF-8 BOM is tolerated). Both delimiters must sit on a line of their own
/// and may carry trailing whitespace.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut start = 0;
    let format = loop {
        let line = content[start..].split_inclusive('\n').next()?;
        start += line.len();
        match line.trim() {
            "" => continue,
            "---" => break FrontmatterFormat::Yaml,
            "+++" => break FrontmatterFormat::Toml,
            _ => return None,
        }
    };
    let delimiter = format.delimiter();

    if !content[..start].ends_with('\n') {
        return None;
    }
    let after_first = &content[start..];

    let mut offset = 0;
    for line in after_first.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = &after_first[..offset];
            let body = &after_first[offset + line.len()..];
            return Some((format, frontmatter, body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }

    None
}

/// Parse the frontmatter of a content file.
///
/// Returns the raw key/value block and the body. A file without a
/// frontmatter block yields an empty mapping and the full text as body.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(RawFrontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        if content.trim_start().starts_with("---") || content.trim_start().starts_with("+++") {
            return Err(CoreError::frontmatter(path, "frontmatter block is not closed"));
        }
        return Ok((RawFrontmatter::default(), content.to_string()));
    };

    let raw = match format {
        FrontmatterFormat::Yaml => parse_yaml(fm_str, path)?,
        FrontmatterFormat::Toml => parse_toml(fm_str, path)?,
    };

    Ok((raw, body.to_string()))
}

fn parse_yaml(source: &str, path: &Path) -> Result<RawFrontmatter> {
    if source.trim().is_empty() {
        return Ok(RawFrontmatter::default());
    }

    let value: Value =
        serde_yaml::from_str(source).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    match value {
        Value::Mapping(mapping) => Ok(RawFrontmatter(mapping)),
        Value::Null => Ok(RawFrontmatter::default()),
        other => Err(CoreError::frontmatter(
            path,
            format!("expected a mapping, found {}", value_type(&other)),
        )),
    }
}

fn parse_toml(source: &str, path: &Path) -> Result<RawFrontmatter> {
    let table: toml::Table =
        toml::from_str(source).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    let mapping = table
        .into_iter()
        .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
        .collect();

    Ok(RawFrontmatter(mapping))
}

/// Convert a TOML value into the YAML value model used for validation.
/// Datetimes become their RFC 3339 string form.
fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
                .collect(),
        ),
    }
}

/// Human readable name of a YAML value's type.
pub fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}
