use std::path::{Path, PathBuf};

use crate::catalog::DocLinkCatalog;
use crate::error::Error;
use crate::types::BuildVariant;

/// Deployment configuration loaded from `.doclink.toml`.
/// Pins the build variant and optionally replaces the built-in catalog.
pub struct Config {
    /// Catalog file, resolved against the config's directory.
    catalog: Option<PathBuf>,
    /// Variant pinned by the deployment, if any.
    variant: Option<BuildVariant>,
}

/// Raw TOML structure for `.doclink.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DoclinkTomlConfig {
    /// Path to a catalog document replacing the built-in one.
    #[serde(default)]
    catalog: Option<PathBuf>,
    /// Build variant override.
    #[serde(default)]
    variant: Option<BuildVariant>,
}

impl Config {
    /// Load config from `.doclink.toml` in the given root directory.
    /// Returns the build defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; never silently
    /// falls back to defaults when the operator wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".doclink.toml");
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::build_defaults()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        let raw: DoclinkTomlConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), variant = ?raw.variant, "loaded config");
        return Ok(Self {
            catalog: raw.catalog.map(|c| return root.join(c)),
            variant: raw.variant,
        });
    }

    /// Config that uses the compiled-in variant and catalog.
    const fn build_defaults() -> Self {
        return Self {
            catalog: None,
            variant: None,
        };
    }

    /// The catalog this deployment uses: the configured file, or the
    /// built-in one.
    ///
    /// # Errors
    ///
    /// Returns errors from [`DocLinkCatalog::load`] or
    /// [`DocLinkCatalog::builtin`].
    pub fn catalog(&self) -> Result<DocLinkCatalog, Error> {
        return match &self.catalog {
            None => DocLinkCatalog::builtin(),
            Some(path) => DocLinkCatalog::load(path),
        };
    }

    /// The active build variant: the pinned one, or the compiled-in default.
    pub fn variant(&self) -> BuildVariant {
        return self.variant.unwrap_or_else(BuildVariant::build_default);
    }
}
