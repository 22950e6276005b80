/// Crate-level error types for doclink diagnostics.
use std::path::PathBuf;

use crate::types::BuildVariant;

/// Errors only come from the ambient surface: catalog and config files,
/// the summary feed, and the file watcher. Malformed version strings,
/// unknown sections, and a release that never arrives are not errors.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Catalog parsed as TOML but violates the catalog shape.
    #[error("catalog invalid: {}: {reason}", origin.display())]
    CatalogInvalid {
        /// File (or built-in marker) the catalog came from.
        origin: PathBuf,
        /// Description of the violation.
        reason: String,
    },

    /// The catalog path named in `.doclink.toml` does not exist on disk.
    #[error("catalog not found: {}", path.display())]
    CatalogNotFound {
        /// Path to the missing catalog file.
        path: PathBuf,
    },

    /// A feed line is neither `null` nor a summary object.
    #[error("feed line {line} malformed: {reason}")]
    FeedMalformed {
        /// One-based line number in the feed.
        line: usize,
        /// Parser message for the offending line.
        reason: String,
    },

    /// Underlying I/O error from the filesystem or stdin.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A URL template references a name that is neither `version` nor a var.
    #[error("unknown placeholder `{{{placeholder}}}` in section `{section}` ({variant})")]
    UnknownPlaceholder {
        /// Placeholder name without braces.
        placeholder: String,
        /// Section (or `vars.<name>`) whose template uses it.
        section: String,
        /// Catalog table containing the template.
        variant: BuildVariant,
    },

    /// The catalog has no table for the active build variant.
    #[error("catalog has no `{variant}` table")]
    UnknownVariant {
        /// The active build variant.
        variant: BuildVariant,
    },

    /// The filesystem watcher could not be created or attached.
    #[error("watch: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
