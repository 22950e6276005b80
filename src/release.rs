//! Map raw cluster version strings to canonical release identifiers.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::ReleaseIdentifier;
use crate::version::parse_version;

/// Classic long form: `ceph version <v> (<sha1>) <name> (<stage>)`.
#[allow(clippy::expect_used, reason = "hardcoded pattern, checked by unit tests")]
static CLASSIC_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"^ceph version\s+\S+\s+\(.+\)\s+(\S+)\s+\((.+)\)").expect("valid regex");
});

/// Release that development builds read the documentation of.
const DEVELOPMENT_RELEASE: &str = "main";

/// Turns a raw version string into a release identifier. `None` means the
/// string could not be named and the emission carrying it is ignored.
pub trait ReleaseNameResolver {
    /// Resolve `raw_version` to a canonical code name.
    fn release_name(&self, raw_version: &str) -> Option<ReleaseIdentifier>;
}

/// Default resolver understanding both version string layouts the cluster
/// reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeNameResolver;

impl ReleaseNameResolver for CodeNameResolver {
    fn release_name(&self, raw_version: &str) -> Option<ReleaseIdentifier> {
        let parsed = parse_version(raw_version);
        if !parsed.release.is_empty() {
            return ReleaseIdentifier::new(&parsed.release);
        }

        let caps = CLASSIC_VERSION.captures(raw_version.trim())?;
        let stage = caps.get(2).map_or("", |m| return m.as_str());
        if stage == "dev" {
            return ReleaseIdentifier::new(DEVELOPMENT_RELEASE);
        }
        return caps.get(1).and_then(|m| return ReleaseIdentifier::new(m.as_str()));
    }
}
