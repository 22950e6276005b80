//! Version, release, and host shown in the console's about dialog.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::Summary;
use crate::version::parse_version;

/// Leading `scheme:` and `//` of a URL.
#[allow(clippy::expect_used, reason = "hardcoded pattern, checked by unit tests")]
static URL_SCHEME: LazyLock<Regex> = LazyLock::new(|| return Regex::new(r"^(\w+:)?//").expect("valid regex"));

/// What the about dialog displays for the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AboutInfo {
    /// Manager address without scheme or trailing slash; empty if unreported.
    pub host: String,
    /// Release code name; empty if the version string has none.
    pub release: String,
    /// Bare version number, without build suffixes in parentheses.
    pub version: String,
}

impl AboutInfo {
    /// Derive the about fields from a feed summary.
    pub fn from_summary(summary: &Summary) -> Self {
        let parsed = parse_version(&summary.version);
        let version = parsed.version.split_whitespace().next().unwrap_or("").to_string();
        let host = summary.mgr_host.as_deref().map(display_host).unwrap_or_default();
        return Self {
            host,
            release: parsed.release,
            version,
        };
    }
}

/// Strip the scheme and one trailing slash from a manager URL.
fn display_host(mgr_host: &str) -> String {
    let without_scheme = URL_SCHEME.replace(mgr_host, "");
    return without_scheme.strip_suffix('/').unwrap_or(&without_scheme).to_string();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(version: &str, host: Option<&str>) -> Summary {
        return Summary {
            mgr_host: host.map(str::to_string),
            version: version.to_string(),
        };
    }

    #[test]
    fn strips_scheme_and_trailing_slash() {
        let about = AboutInfo::from_summary(&summary(
            "ceph version 19.2.0 release squid",
            Some("https://mgr-a.example:8443/"),
        ));
        assert_eq!(about.host, "mgr-a.example:8443", "host cleaned");
        assert_eq!(about.version, "19.2.0", "version");
        assert_eq!(about.release, "squid", "release");
    }

    #[test]
    fn protocol_relative_and_bare_hosts() {
        assert_eq!(display_host("//mgr-b:8080/"), "mgr-b:8080", "protocol relative");
        assert_eq!(display_host("mgr-c"), "mgr-c", "bare host untouched");
    }

    #[test]
    fn version_keeps_first_token_only() {
        let about = AboutInfo::from_summary(&summary("ceph version 18.2.4 (abc123) reef (stable)", None));
        assert_eq!(about.version, "18.2.4", "build suffix dropped");
        assert_eq!(about.release, "", "classic form has no release part");
        assert_eq!(about.host, "", "no host reported");
    }

    #[test]
    fn unrecognized_version_is_blank() {
        let about = AboutInfo::from_summary(&summary("unknown", None));
        assert_eq!(about.version, "", "empty version");
        assert_eq!(about.release, "", "empty release");
    }
}
