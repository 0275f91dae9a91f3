//! Error types for the folio core library.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for folio.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Frontmatter block could not be parsed.
    #[error("Frontmatter error in {path}: {message}")]
    Frontmatter { path: PathBuf, message: String },

    /// Invalid loader glob pattern.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// A collection failed to load or validate.
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new frontmatter error.
    pub fn frontmatter(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Frontmatter {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new glob pattern error.
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

/// A single field that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {kind}")]
pub struct FieldError {
    /// Frontmatter key of the offending field.
    pub field: String,
    /// What went wrong.
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// Reasons a field can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required field absent from the frontmatter.
    Missing,
    /// Value has the wrong YAML type.
    InvalidType {
        expected: &'static str,
        received: &'static str,
    },
    /// Value could not be coerced to a date.
    InvalidDate { value: String },
    /// Value is not one of the allowed literals.
    InvalidEnum {
        value: String,
        allowed: &'static [&'static str],
    },
    /// Value is not an absolute URL.
    InvalidUrl { value: String, reason: String },
    /// String shorter than the allowed minimum.
    TooShort { min: usize },
    /// Image reference does not point at an existing file.
    ImageNotFound { src: String, resolved: PathBuf },
    /// Image reference points at a file that is not an image.
    UnsupportedImage { src: String },
    /// Image reference is an absolute path instead of relative to the entry.
    AbsoluteImage { src: String },
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "required field is missing"),
            Self::InvalidType { expected, received } => {
                write!(f, "expected {expected}, received {received}")
            }
            Self::InvalidDate { value } => write!(f, "invalid date '{value}'"),
            Self::InvalidEnum { value, allowed } => write!(
                f,
                "invalid value '{value}', expected one of: {}",
                allowed.join(", ")
            ),
            Self::InvalidUrl { value, reason } => write!(f, "invalid url '{value}': {reason}"),
            Self::TooShort { min } => write!(f, "must contain at least {min} character(s)"),
            Self::ImageNotFound { src, resolved } => write!(
                f,
                "image '{src}' not found (resolved to {})",
                resolved.display()
            ),
            Self::UnsupportedImage { src } => write!(f, "'{src}' is not a supported image"),
            Self::AbsoluteImage { src } => {
                write!(f, "image '{src}' must be relative to the entry")
            }
        }
    }
}

/// Why a single content file was rejected.
#[derive(Error, Debug)]
pub enum FileError {
    /// The file could not be read.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The frontmatter block is malformed.
    #[error("{0}")]
    Frontmatter(String),

    /// One or more fields failed validation.
    #[error("{}", join_fields(.0))]
    Fields(Vec<FieldError>),

    /// Neither the file name nor a `slug` yields a usable id.
    #[error("cannot derive an entry id from the file name; set a `slug`")]
    EmptyId,
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures raised while loading a collection.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// One or more files failed validation. No entries are emitted.
    #[error("collection '{collection}' has {} invalid file(s)", .failures.len())]
    Invalid {
        collection: &'static str,
        failures: Vec<(PathBuf, FileError)>,
    },

    /// Two files resolved to the same entry id.
    #[error("collection '{collection}' has duplicate id '{id}': {} and {}", .first.display(), .second.display())]
    DuplicateId {
        collection: &'static str,
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The collection base directory could not be traversed.
    #[error("collection '{collection}' could not be discovered: {message}")]
    Discover {
        collection: &'static str,
        message: String,
    },
}
