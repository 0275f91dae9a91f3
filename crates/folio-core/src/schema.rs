//! Declarative frontmatter schemas.
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Each field runs its checks
//! in a fixed order (presence, type, coercion, constraint) and stops at the
//! first failure. Failures across fields are either collected or cut short
//! depending on [`ValidationMode`].

use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::debug;

use crate::{
    error::{FieldError, FieldErrorKind},
    frontmatter::{RawFrontmatter, value_type},
};

/// File extensions accepted for image references.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "gif", "svg", "avif", "tiff", "tif",
];

/// How failures across fields are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Check every field and report all failures.
    #[default]
    CollectAll,
    /// Stop at the first failing field.
    FailFast,
}

/// The type a field's value is checked and coerced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A string, optionally with a minimum length.
    String { min_len: usize },
    /// A date coerced from a string or millisecond timestamp.
    Date,
    /// One of a fixed set of string literals.
    Enum { variants: &'static [&'static str] },
    /// A sequence of strings. May be empty.
    StringList,
    /// A string that parses as an absolute URL.
    Url,
    /// A path to an image file, relative to the entry.
    Image,
}

impl FieldKind {
    fn expected(&self) -> &'static str {
        match self {
            Self::String { .. } | Self::Enum { .. } | Self::Url | Self::Image => "string",
            Self::Date => "date",
            Self::StringList => "array",
        }
    }
}

/// What happens when a field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Absent fields take this value.
    Default(&'static str),
}

/// A single named field validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
        }
    }

    pub const fn with_default(name: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Default(default),
        }
    }

    /// Run this field's checks against the raw frontmatter.
    ///
    /// `Ok(None)` means an optional field was absent.
    pub fn check(
        &self,
        raw: &RawFrontmatter,
        entry_dir: &Path,
    ) -> Result<Option<FieldValue>, FieldError> {
        let Some(value) = raw.get(self.name) else {
            return match self.presence {
                Presence::Required => Err(FieldError::new(self.name, FieldErrorKind::Missing)),
                Presence::Optional => Ok(None),
                Presence::Default(default) => Ok(Some(FieldValue::String(default.to_string()))),
            };
        };

        self.coerce(value, entry_dir).map(Some)
    }

    fn coerce(&self, value: &Value, entry_dir: &Path) -> Result<FieldValue, FieldError> {
        let fail = |kind| FieldError::new(self.name, kind);
        let type_error = || {
            fail(FieldErrorKind::InvalidType {
                expected: self.kind.expected(),
                received: value_type(value),
            })
        };

        match self.kind {
            FieldKind::String { min_len } => {
                let s = value.as_str().ok_or_else(type_error)?;
                if s.chars().count() < min_len {
                    return Err(fail(FieldErrorKind::TooShort { min: min_len }));
                }
                Ok(FieldValue::String(s.to_string()))
            }
            FieldKind::Date => match value {
                Value::String(s) => parse_date(s).map(FieldValue::Date).ok_or_else(|| {
                    fail(FieldErrorKind::InvalidDate { value: s.clone() })
                }),
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                    .and_then(DateTime::from_timestamp_millis)
                    .map(FieldValue::Date)
                    .ok_or_else(|| {
                        fail(FieldErrorKind::InvalidDate {
                            value: n.to_string(),
                        })
                    }),
                _ => Err(type_error()),
            },
            FieldKind::Enum { variants } => {
                let s = value.as_str().ok_or_else(type_error)?;
                if variants.contains(&s) {
                    Ok(FieldValue::String(s.to_string()))
                } else {
                    Err(fail(FieldErrorKind::InvalidEnum {
                        value: s.to_string(),
                        allowed: variants,
                    }))
                }
            }
            FieldKind::StringList => {
                let items = value.as_sequence().ok_or_else(type_error)?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            FieldError::new(
                                format!("{}[{i}]", self.name),
                                FieldErrorKind::InvalidType {
                                    expected: "string",
                                    received: value_type(item),
                                },
                            )
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::List)
            }
            FieldKind::Url => {
                let s = value.as_str().ok_or_else(type_error)?;
                url::Url::parse(s).map_err(|e| {
                    fail(FieldErrorKind::InvalidUrl {
                        value: s.to_string(),
                        reason: e.to_string(),
                    })
                })?;
                Ok(FieldValue::Url(s.to_string()))
            }
            FieldKind::Image => {
                let src = value.as_str().ok_or_else(type_error)?;
                resolve_image(src, entry_dir)
                    .map(FieldValue::Image)
                    .map_err(fail)
            }
        }
    }
}

/// Coerce a date token into an instant.
///
/// Dates without a time resolve to midnight UTC. Date-times without an
/// offset are read as UTC so the result never depends on the host zone.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }

    // "Jul 08 2022", "July 8, 2022", "8 July 2022", "2022/07/08"
    for format in [
        "%b %d %Y",
        "%b %d, %Y",
        "%d %b %Y",
        "%B %d %Y",
        "%B %d, %Y",
        "%d %B %Y",
        "%Y/%m/%d",
    ] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// A validated reference to a local image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    /// The value as written in the frontmatter.
    pub src: String,
    /// The file it resolved to.
    pub path: PathBuf,
}

fn resolve_image(src: &str, entry_dir: &Path) -> Result<ImageRef, FieldErrorKind> {
    let relative = Path::new(src)
        .components()
        .all(|c| !matches!(c, Component::RootDir | Component::Prefix(_)));
    if !relative {
        return Err(FieldErrorKind::AbsoluteImage {
            src: src.to_string(),
        });
    }

    let supported = Path::new(src)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    if !supported {
        return Err(FieldErrorKind::UnsupportedImage {
            src: src.to_string(),
        });
    }

    let resolved = entry_dir.join(src.strip_prefix("./").unwrap_or(src));
    if !resolved.is_file() {
        return Err(FieldErrorKind::ImageNotFound {
            src: src.to_string(),
            resolved,
        });
    }

    Ok(ImageRef {
        src: src.to_string(),
        path: resolved,
    })
}

/// A successfully coerced field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    Date(DateTime<Utc>),
    List(Vec<String>),
    Url(String),
    Image(ImageRef),
}

/// The validated fields of one entry, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: BTreeMap<&'static str, FieldValue>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take an optional string (plain, enum or url) field.
    pub fn take_string(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name)? {
            FieldValue::String(s) | FieldValue::Url(s) => Some(s),
            _ => None,
        }
    }

    pub fn take_date(&mut self, name: &str) -> Option<DateTime<Utc>> {
        match self.values.remove(name)? {
            FieldValue::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn take_list(&mut self, name: &str) -> Option<Vec<String>> {
        match self.values.remove(name)? {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn take_image(&mut self, name: &str) -> Option<ImageRef> {
        match self.values.remove(name)? {
            FieldValue::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Take a field the schema marks as required.
    pub fn require<T>(
        &mut self,
        name: &'static str,
        take: impl FnOnce(&mut Self, &str) -> Option<T>,
    ) -> Result<T, FieldError> {
        take(self, name).ok_or_else(|| FieldError::new(name, FieldErrorKind::Missing))
    }
}

/// Where and how an entry is being validated.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// The content file the frontmatter came from.
    pub path: &'a Path,
    pub mode: ValidationMode,
}

impl<'a> ValidationContext<'a> {
    pub fn new(path: &'a Path, mode: ValidationMode) -> Self {
        Self { path, mode }
    }

    /// Directory image references are resolved against.
    pub fn entry_dir(&self) -> &'a Path {
        self.path.parent().unwrap_or(Path::new(""))
    }
}

/// An ordered set of field validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate raw frontmatter, producing every declared field or the
    /// failures. Keys the schema does not declare are dropped.
    pub fn validate(
        &self,
        raw: &RawFrontmatter,
        ctx: &ValidationContext<'_>,
    ) -> Result<Record, Vec<FieldError>> {
        let entry_dir = ctx.entry_dir();
        let mut record = Record::default();
        let mut errors = Vec::new();

        for field in self.fields {
            match field.check(raw, entry_dir) {
                Ok(Some(value)) => {
                    record.values.insert(field.name, value);
                }
                Ok(None) => {}
                Err(e) => {
                    errors.push(e);
                    if ctx.mode == ValidationMode::FailFast {
                        break;
                    }
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        for key in raw.keys().filter(|key| self.field(key).is_none()) {
            debug!(path = %ctx.path.display(), key, "dropping undeclared frontmatter key");
        }

        Ok(record)
    }
}
