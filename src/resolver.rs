//! Documentation link resolution against the cluster's current release.

use std::rc::Rc;

use crate::cache::ReleaseCache;
use crate::catalog::{CatalogTable, DocLinkCatalog};
use crate::error::Error;
use crate::types::{BuildVariant, ReleaseIdentifier};

/// Answers "which URL documents section X for the release this cluster runs".
///
/// The catalog table is picked once at construction. The release cache must
/// be the same instance the feed tracker writes to; it may still be empty
/// when `resolve_url` is first called.
pub struct DocLinkResolver {
    /// Shared with the feed tracker, which is its only writer.
    cache: Rc<ReleaseCache<ReleaseIdentifier>>,
    /// Active catalog table.
    table: Rc<CatalogTable>,
    /// Variant the table was selected for.
    variant: BuildVariant,
}

impl DocLinkResolver {
    /// Select `variant`'s table from `catalog` and read releases from `cache`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVariant` if the catalog has no table for `variant`.
    pub fn new(
        catalog: &DocLinkCatalog,
        variant: BuildVariant,
        cache: Rc<ReleaseCache<ReleaseIdentifier>>,
    ) -> Result<Self, Error> {
        let table = catalog.table(variant)?;
        return Ok(Self { cache, table, variant });
    }

    /// Release used when the caller has none.
    pub fn default_release(&self) -> &str {
        return self.table.default_release();
    }

    /// Call `on_ready` exactly once with the URL for `section`, as soon as the
    /// cluster's release is known. Receives `None` if the section has no link.
    ///
    /// Waits indefinitely: if the feed never yields a release, `on_ready`
    /// never runs and is dropped with the cache.
    pub fn resolve_url(&self, section: &str, on_ready: impl FnOnce(Option<String>) + 'static) {
        let table = Rc::clone(&self.table);
        let section = section.to_string();
        tracing::debug!(%section, variant = %self.variant, "awaiting release for doc link");
        self.cache.subscribe_once(move |release: &ReleaseIdentifier| {
            let url = table.url_for(&section, release.as_str());
            if url.is_none() {
                tracing::debug!(%section, %release, "no doc link for section");
            }
            on_ready(url);
        });
    }

    /// Section keys of the active table, sorted.
    pub fn sections(&self) -> Vec<String> {
        return self.table.sections().map(str::to_string).collect();
    }

    /// Synchronous lookup for callers that already hold a release.
    pub fn url_generator(&self, section: &str, release: &str) -> Option<String> {
        return self.table.url_for(section, release);
    }

    /// Variant the resolver was built for.
    pub const fn variant(&self) -> BuildVariant {
        return self.variant;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn resolver(variant: BuildVariant) -> (DocLinkResolver, Rc<ReleaseCache<ReleaseIdentifier>>) {
        let cache = Rc::new(ReleaseCache::new());
        let catalog = DocLinkCatalog::builtin().unwrap();
        let resolver = DocLinkResolver::new(&catalog, variant, Rc::clone(&cache)).unwrap();
        return (resolver, cache);
    }

    fn release(name: &str) -> ReleaseIdentifier {
        return ReleaseIdentifier::new(name).unwrap();
    }

    #[test]
    fn url_generator_unknown_section() {
        for variant in [BuildVariant::Community, BuildVariant::Enterprise] {
            let (resolver, _cache) = resolver(variant);
            assert_eq!(resolver.url_generator("unknown-section", "squid"), None, "{variant}");
        }
    }

    #[test]
    fn url_generator_orch_in_both_variants() {
        for variant in [BuildVariant::Community, BuildVariant::Enterprise] {
            let (resolver, _cache) = resolver(variant);
            let url = resolver.url_generator("orch", "squid").unwrap_or_default();
            assert!(!url.is_empty(), "{variant} has an orch link");
        }
    }

    #[test]
    fn resolve_url_waits_for_release() {
        let (resolver, cache) = resolver(BuildVariant::Community);
        let got: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&got);
        resolver.resolve_url("dashboard", move |url| sink.borrow_mut().push(url));
        assert!(got.borrow().is_empty(), "no release yet");

        cache.update(release("squid"));
        cache.update(release("tentacle"));

        assert_eq!(
            *got.borrow(),
            vec![Some("https://docs.ceph.com/en/squid/mgr/dashboard".to_string())],
            "fires once with the first release"
        );
    }

    #[test]
    fn resolve_url_fires_immediately_once_known() {
        let (resolver, cache) = resolver(BuildVariant::Enterprise);
        cache.update(release("reef"));

        let got: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&got);
        resolver.resolve_url("dashboard", move |url| sink.borrow_mut().push(url));

        assert_eq!(
            *got.borrow(),
            vec![Some("https://access.redhat.com/documentation/en-us/red_hat_ceph_storage/7/html/dashboard_guide/".to_string())],
            "reef maps to doc set 7"
        );
    }

    #[test]
    fn resolve_url_unknown_section_reports_none() {
        let (resolver, cache) = resolver(BuildVariant::Community);
        let got: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&got);
        resolver.resolve_url("no-such-topic", move |url| sink.borrow_mut().push(url));

        cache.update(release("squid"));

        assert_eq!(*got.borrow(), vec![None], "callback still fires exactly once");
    }

    #[test]
    fn default_release_follows_variant() {
        assert_eq!(resolver(BuildVariant::Community).0.default_release(), "main", "community");
        assert_eq!(resolver(BuildVariant::Enterprise).0.default_release(), "pacific", "enterprise");
    }
}
