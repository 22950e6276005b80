/// Core domain types for doclink releases, variants, and cluster summaries.
use std::fmt;

/// Which documentation catalog table is active. Fixed for the life of the
/// process: picked at build time (`enterprise` feature) unless the deployment
/// pins it in `.doclink.toml`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    /// Upstream project documentation.
    Community,
    /// Vendor product documentation.
    Enterprise,
}

impl BuildVariant {
    /// Variant compiled into this binary.
    pub const fn build_default() -> Self {
        if cfg!(feature = "enterprise") {
            return Self::Enterprise;
        }
        return Self::Community;
    }

    /// Lowercase name, as used for catalog table keys.
    pub const fn as_str(self) -> &'static str {
        return match self {
            Self::Community => "community",
            Self::Enterprise => "enterprise",
        };
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(self.as_str());
    }
}

/// Output of the version string parser. Both fields are empty when the raw
/// string is not a product version string; callers treat empty as unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParsedVersion {
    /// Release code name, e.g. `squid`.
    pub release: String,
    /// Version text to the left of the release separator, e.g. `19.2.0`.
    pub version: String,
}

/// Canonical lower-case release code name. Newtype keeps raw version strings
/// from being passed where a resolved release is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseIdentifier(
    /// Trimmed, lower-case, non-empty code name.
    String,
);

impl ReleaseIdentifier {
    /// Normalize a code name. Returns `None` for blank input.
    pub fn new(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        return Some(Self(trimmed.to_lowercase()));
    }

    /// The code name as a string slice.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for ReleaseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.0);
    }
}

/// One emission of the cluster summary feed. Only the fields doclink reads
/// are modelled; anything else in the JSON object is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Summary {
    /// Address the manager daemon serves the console on, if reported.
    #[serde(default)]
    pub mgr_host: Option<String>,
    /// Raw version string reported by the cluster.
    #[serde(default)]
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_identifier_is_trimmed_and_lowercased() {
        let id = ReleaseIdentifier::new("  Squid ").unwrap();
        assert_eq!(id.as_str(), "squid", "identifier should be normalized");
    }

    #[test]
    fn blank_release_identifier_is_rejected() {
        assert!(ReleaseIdentifier::new("   ").is_none(), "blank name must not produce an identifier");
    }

    #[test]
    fn summary_ignores_unknown_fields() {
        let summary: Summary = serde_json::from_str(
            r#"{"version": "ceph version 19.2.0 release squid", "health_status": "HEALTH_OK"}"#,
        )
        .unwrap();
        assert_eq!(summary.version, "ceph version 19.2.0 release squid", "version kept");
        assert_eq!(summary.mgr_host, None, "missing host defaults to none");
    }
}
