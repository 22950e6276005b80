//! Split raw cluster version strings into version and release parts.

use crate::types::ParsedVersion;

/// Prefix every product version string starts with.
pub const VERSION_MARKER: &str = "ceph version";

/// Separator between the version and the release name.
const RELEASE_SEPARATOR: &str = " release ";

/// Parse `"ceph version <version> release <name>"` into its parts.
///
/// Input without the marker yields two empty fields. Input with the marker
/// but no release separator keeps the version and leaves the release empty.
/// A repeated separator ends the release at its second occurrence.
pub fn parse_version(raw: &str) -> ParsedVersion {
    let Some(rest) = raw.strip_prefix(VERSION_MARKER) else {
        return ParsedVersion::default();
    };
    let rest = rest.trim();

    // Only the segment after the first separator is the release; anything
    // after a second separator is dropped.
    let mut parts = rest.split(RELEASE_SEPARATOR);
    let version = parts.next().unwrap_or_default().trim().to_string();
    let release = parts.next().unwrap_or_default().trim().to_string();
    return ParsedVersion { release, version };
}
