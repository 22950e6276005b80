//! Documentation catalog: per-variant URL templates loaded from TOML.
//!
//! Templates are checked and flattened at load time, so lookups never fail:
//! a section is either present and expands to a URL, or absent.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;
use crate::types::BuildVariant;

/// `{name}` placeholders in URL templates.
#[allow(clippy::expect_used, reason = "hardcoded pattern, checked by unit tests")]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"\{([^{}]*)\}").expect("valid regex"));

/// Catalog compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../catalog/default.toml");

/// Origin reported in diagnostics for the built-in catalog.
const BUILTIN_ORIGIN: &str = "<built-in catalog>";

/// The one placeholder left in flattened templates.
const VERSION_PLACEHOLDER: &str = "{version}";

/// Raw TOML shape of one variant table.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    /// Release used when a caller has none.
    default_release: String,
    /// Section key to URL template.
    sections: BTreeMap<String, String>,
    /// Named URL prefixes usable as `{name}` in section templates.
    #[serde(default)]
    vars: BTreeMap<String, String>,
    /// Release code name to doc-site version segment.
    #[serde(default)]
    version_overrides: BTreeMap<String, String>,
}

/// One variant's documentation links, ready for lookups.
#[derive(Debug)]
pub struct CatalogTable {
    /// Release used when a caller has none.
    default_release: String,
    /// Section key to template containing only literals and `{version}`.
    sections: BTreeMap<String, String>,
    /// Release code name to doc-site version segment.
    version_overrides: BTreeMap<String, String>,
}

impl CatalogTable {
    /// Release used when a caller has none.
    pub fn default_release(&self) -> &str {
        return &self.default_release;
    }

    /// Section keys, sorted.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        return self.sections.keys().map(String::as_str);
    }

    /// Expand the URL for `section` under `release`, or `None` for an
    /// unknown section.
    pub fn url_for(&self, section: &str, release: &str) -> Option<String> {
        let template = self.sections.get(section)?;
        return Some(template.replace(VERSION_PLACEHOLDER, self.version_segment(release)));
    }

    /// Doc-site version segment for a release; unmapped releases are used
    /// verbatim.
    pub fn version_segment<'a>(&'a self, release: &'a str) -> &'a str {
        return self.version_overrides.get(release).map_or(release, String::as_str);
    }

    /// Inline vars into section templates and reject unknown placeholders.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownPlaceholder` if a var uses anything but
    /// `{version}`, or a section uses a name that is neither `version` nor a
    /// var. Returns `Error::CatalogInvalid` for a blank default release.
    fn compile(variant: BuildVariant, origin: &Path, raw: RawTable) -> Result<Self, Error> {
        if raw.default_release.trim().is_empty() {
            return Err(Error::CatalogInvalid {
                origin: origin.to_path_buf(),
                reason: format!("`{variant}.default_release` is empty"),
            });
        }

        for (name, template) in &raw.vars {
            if let Some(placeholder) = unknown_placeholder(template, |p| return p == "version") {
                return Err(Error::UnknownPlaceholder {
                    placeholder,
                    section: format!("vars.{name}"),
                    variant,
                });
            }
        }

        let mut sections = BTreeMap::new();
        for (section, template) in raw.sections {
            let known = |p: &str| return p == "version" || raw.vars.contains_key(p);
            if let Some(placeholder) = unknown_placeholder(&template, known) {
                return Err(Error::UnknownPlaceholder { placeholder, section, variant });
            }
            let flattened = inline_vars(&template, &raw.vars);
            sections.insert(section, flattened);
        }

        tracing::debug!(%variant, sections = sections.len(), "catalog table compiled");
        return Ok(Self {
            default_release: raw.default_release.trim().to_lowercase(),
            sections,
            version_overrides: raw.version_overrides,
        });
    }
}

/// All variant tables of one catalog document.
#[derive(Debug)]
pub struct DocLinkCatalog {
    /// Compiled tables by variant. Shared with resolvers.
    tables: BTreeMap<BuildVariant, Rc<CatalogTable>>,
}

impl DocLinkCatalog {
    /// The catalog embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`DocLinkCatalog::parse`]; the built-in
    /// document is covered by unit tests.
    pub fn builtin() -> Result<Self, Error> {
        return Self::parse(BUILTIN_CATALOG, Path::new(BUILTIN_ORIGIN));
    }

    /// Read a catalog file from disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::CatalogNotFound` if the file is missing, `Error::Io`
    /// for other read failures, or any error from [`DocLinkCatalog::parse`].
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::CatalogNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content, path);
    }

    /// Parse and compile a catalog document. `origin` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` for invalid TOML or an unexpected shape,
    /// `Error::CatalogInvalid` if the document has no tables, or
    /// `Error::UnknownPlaceholder` for templates naming unknown vars.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, Error> {
        let raw: BTreeMap<BuildVariant, RawTable> = toml::from_str(content)?;
        if raw.is_empty() {
            return Err(Error::CatalogInvalid {
                origin: origin.to_path_buf(),
                reason: "no variant tables".to_string(),
            });
        }

        let mut tables = BTreeMap::new();
        for (variant, table) in raw {
            let compiled = CatalogTable::compile(variant, origin, table)?;
            tables.insert(variant, Rc::new(compiled));
        }
        return Ok(Self { tables });
    }

    /// The table for `variant`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVariant` if the catalog has no such table.
    pub fn table(&self, variant: BuildVariant) -> Result<Rc<CatalogTable>, Error> {
        return self
            .tables
            .get(&variant)
            .map(Rc::clone)
            .ok_or(Error::UnknownVariant { variant });
    }
}

/// Replace `{var}` references with their values; `{version}` stays.
fn inline_vars(template: &str, vars: &BTreeMap<String, String>) -> String {
    return PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let name = caps.get(1).map_or("", |m| return m.as_str());
            return vars.get(name).cloned().unwrap_or_else(|| return VERSION_PLACEHOLDER.to_string());
        })
        .into_owned();
}

/// First placeholder in `template` that `known` rejects.
fn unknown_placeholder(template: &str, known: impl Fn(&str) -> bool) -> Option<String> {
    return PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| return caps.get(1))
        .map(|m| return m.as_str())
        .find(|name| return !known(name))
        .map(str::to_string);
}
