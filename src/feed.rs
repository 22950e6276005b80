//! Summary feed plumbing: decode JSON-lines summaries and push resolved
//! releases into the release cache.

use std::io::BufRead;
use std::rc::Rc;

use crate::cache::ReleaseCache;
use crate::error::Error;
use crate::release::ReleaseNameResolver;
use crate::types::{ReleaseIdentifier, Summary};

/// Decodes a newline-delimited JSON feed. Each non-blank line is `null` (no
/// summary yet) or a summary object. Keeps the line count across calls so a
/// followed file reports absolute line numbers.
#[derive(Debug, Default)]
pub struct FeedDecoder {
    /// Lines consumed so far.
    line: usize,
}

impl FeedDecoder {
    /// Decode one non-blank line.
    ///
    /// # Errors
    ///
    /// Returns `Error::FeedMalformed` if the line is neither `null` nor a
    /// summary object.
    fn decode_line(&self, text: &str) -> Result<Option<Summary>, Error> {
        return serde_json::from_str::<Option<Summary>>(text.trim()).map_err(|e| {
            return Error::FeedMalformed {
                line: self.line,
                reason: e.to_string(),
            };
        });
    }

    /// Decode every line of `reader`, handing each emission to `sink` in
    /// order. Blank lines are skipped; `null` lines are delivered as `None`.
    /// Returns the number of emissions delivered.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails, or `Error::FeedMalformed` for the
    /// first undecodable line (emissions before it were already delivered).
    pub fn pump(&mut self, reader: impl BufRead, mut sink: impl FnMut(Option<&Summary>)) -> Result<usize, Error> {
        let mut delivered = 0_usize;
        for line in reader.lines() {
            let line = line?;
            self.line = self.line.saturating_add(1);
            if line.trim().is_empty() {
                continue;
            }
            let summary = self.decode_line(&line)?;
            sink(summary.as_ref());
            delivered = delivered.saturating_add(1);
        }
        return Ok(delivered);
    }
}

/// The single writer of the release cache: names each feed emission's
/// version and stores the result.
pub struct ReleaseTracker<R> {
    /// Cache shared with the doc link resolver.
    cache: Rc<ReleaseCache<ReleaseIdentifier>>,
    /// Maps raw version strings to code names.
    resolver: R,
}

impl<R: ReleaseNameResolver> ReleaseTracker<R> {
    /// Track releases into `cache` using `resolver`.
    pub fn new(cache: Rc<ReleaseCache<ReleaseIdentifier>>, resolver: R) -> Self {
        return Self { cache, resolver };
    }

    /// Handle one feed emission. Absent summaries, blank versions, and
    /// versions the resolver cannot name leave the cache untouched.
    /// Returns whether the cache was updated.
    pub fn observe(&self, summary: Option<&Summary>) -> bool {
        let Some(summary) = summary else {
            tracing::debug!("feed emitted no summary, ignoring");
            return false;
        };
        if summary.version.trim().is_empty() {
            tracing::debug!("summary has no version, ignoring");
            return false;
        }
        let Some(release) = self.resolver.release_name(&summary.version) else {
            tracing::debug!(version = %summary.version, "could not name release, ignoring");
            return false;
        };

        tracing::debug!(%release, waiting = self.cache.pending(), "release resolved");
        self.cache.update(release);
        return true;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Cursor;

    use super::*;
    use crate::catalog::DocLinkCatalog;
    use crate::release::CodeNameResolver;
    use crate::resolver::DocLinkResolver;
    use crate::types::BuildVariant;

    fn summary(version: &str) -> Summary {
        return Summary {
            mgr_host: None,
            version: version.to_string(),
        };
    }

    #[test]
    fn absent_and_unnamed_summaries_are_ignored() {
        let cache = Rc::new(ReleaseCache::new());
        let tracker = ReleaseTracker::new(Rc::clone(&cache), CodeNameResolver);

        assert!(!tracker.observe(None), "null emission");
        assert!(!tracker.observe(Some(&summary(""))), "blank version");
        assert!(!tracker.observe(Some(&summary("not a version"))), "unnamed version");
        assert_eq!(cache.current(), None, "cache stays unset");

        assert!(tracker.observe(Some(&summary("ceph version 18.2.4 release reef"))), "named version");
        assert_eq!(cache.current().map(|r| r.to_string()).as_deref(), Some("reef"), "cache set");
    }

    #[test]
    fn later_emissions_supersede_earlier_ones() {
        let cache = Rc::new(ReleaseCache::new());
        let tracker = ReleaseTracker::new(Rc::clone(&cache), CodeNameResolver);
        tracker.observe(Some(&summary("ceph version 18.2.4 release reef")));
        tracker.observe(None);
        tracker.observe(Some(&summary("ceph version 19.2.0 release squid")));
        assert_eq!(cache.current().map(|r| r.to_string()).as_deref(), Some("squid"), "latest wins");
    }

    #[test]
    fn decoder_reports_line_numbers() {
        let feed = "null\n\n{\"version\": \"ceph version 19.2.0 release squid\"}\n[1, 2]\n";
        let mut decoder = FeedDecoder::default();
        let mut seen = Vec::new();
        let err = decoder
            .pump(Cursor::new(feed), |s| seen.push(s.map(|s| s.version.clone())))
            .unwrap_err();

        assert_eq!(seen, vec![None, Some("ceph version 19.2.0 release squid".to_string())], "emissions before the bad line");
        assert!(matches!(err, Error::FeedMalformed { line: 4, .. }), "got {err}");
    }

    #[test]
    fn null_then_summary_resolves_pending_link() {
        let cache = Rc::new(ReleaseCache::new());
        let tracker = ReleaseTracker::new(Rc::clone(&cache), CodeNameResolver);
        let catalog = DocLinkCatalog::builtin().unwrap();
        let resolver = DocLinkResolver::new(&catalog, BuildVariant::Community, Rc::clone(&cache)).unwrap();

        let got: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&got);
        resolver.resolve_url("dashboard", move |url| sink.borrow_mut().push(url));

        let mut decoder = FeedDecoder::default();
        decoder
            .pump(Cursor::new("null\n"), |s| {
                tracker.observe(s);
            })
            .unwrap();
        assert!(got.borrow().is_empty(), "null emission must not fire the callback");

        decoder
            .pump(Cursor::new("{\"version\": \"ceph version 19.2.0 release squid\"}\n"), |s| {
                tracker.observe(s);
            })
            .unwrap();
        assert_eq!(
            *got.borrow(),
            vec![Some("https://docs.ceph.com/en/squid/mgr/dashboard".to_string())],
            "fires after the real summary"
        );
    }
}
