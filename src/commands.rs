//! Core CLI commands for doclink: parse, url, sections, resolve, about, notify.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use crate::about::AboutInfo;
use crate::cache::ReleaseCache;
use crate::config;
use crate::error;
use crate::feed::{FeedDecoder, ReleaseTracker};
use crate::notification::{Application, Notification, NotificationConfig, NotificationType};
use crate::release::{CodeNameResolver, ReleaseNameResolver as _};
use crate::resolver::DocLinkResolver;
use crate::types::{ReleaseIdentifier, Summary};
use crate::version::parse_version;

/// Exit code when the feed ended before any release was known.
const EXIT_PENDING: u8 = 2;

/// Exit code when at least one requested section has no link.
const EXIT_NO_LINK: u8 = 1;

/// The release cache wired between one feed tracker and one resolver.
/// Constructed before any feed data is read, so sections may be requested
/// while the cache is still empty.
pub struct LinkSession {
    /// Shared release cache; the tracker writes, the resolver reads.
    cache: Rc<ReleaseCache<ReleaseIdentifier>>,
    /// One entry per fired callback, in firing order: whether it had a link.
    fired: Rc<RefCell<Vec<bool>>>,
    /// Active resolver.
    resolver: DocLinkResolver,
    /// Single writer of the cache.
    tracker: ReleaseTracker<CodeNameResolver>,
}

impl LinkSession {
    /// Load config and catalog from `root` and wire an empty cache.
    ///
    /// # Errors
    ///
    /// Returns errors from config or catalog loading, or
    /// `Error::UnknownVariant` if the catalog lacks the active variant.
    pub fn open(root: &Path) -> Result<Self, error::Error> {
        let config = config::Config::load(root)?;
        let catalog = config.catalog()?;
        let cache = Rc::new(ReleaseCache::new());
        let resolver = DocLinkResolver::new(&catalog, config.variant(), Rc::clone(&cache))?;
        let tracker = ReleaseTracker::new(Rc::clone(&cache), CodeNameResolver);
        return Ok(Self {
            cache,
            fired: Rc::new(RefCell::new(Vec::new())),
            resolver,
            tracker,
        });
    }

    /// Print each section's link as soon as the release is known.
    pub fn request(&self, sections: &[String]) {
        for section in sections {
            let fired = Rc::clone(&self.fired);
            let name = section.clone();
            self.resolver.resolve_url(section, move |url| {
                match &url {
                    None => println!("NOLINK  {name}"),
                    Some(link) => println!("LINK    {name} {link}"),
                }
                fired.borrow_mut().push(url.is_some());
            });
        }
    }

    /// Push one feed emission through the tracker. Returns whether the
    /// cached release changed.
    pub fn observe(&self, summary: Option<&Summary>) -> bool {
        return self.tracker.observe(summary);
    }

    /// Whether requested sections are still waiting for a release.
    pub fn waiting(&self) -> bool {
        return self.cache.pending() > 0;
    }

    /// Report sections still pending and choose the exit code:
    /// pending (2) > no link (1) > all linked (0).
    pub fn finish(&self, sections: &[String]) -> ExitCode {
        let fired = self.fired.borrow();
        // Callbacks fire in registration order, so the unfired ones are the tail.
        let pending: Vec<&String> = sections.iter().skip(fired.len()).collect();
        for section in &pending {
            println!("PENDING {section}");
        }
        let unlinked = fired.iter().filter(|linked| return !**linked).count();

        if !pending.is_empty() {
            println!();
            println!("{} pending, the feed reported no release", pending.len());
            return ExitCode::from(EXIT_PENDING);
        } else if unlinked > 0 {
            println!();
            println!("{unlinked} without link");
            return ExitCode::from(EXIT_NO_LINK);
        } else {
            let total = fired.len();
            println!("All {total} links resolved");
            return ExitCode::SUCCESS;
        }
    }
}

/// Print the about dialog fields for the last summary in the feed.
///
/// # Errors
///
/// Returns errors from reading or decoding the feed.
pub fn about(feed: Option<&Path>, json: bool) -> Result<ExitCode, error::Error> {
    let mut last: Option<Summary> = None;
    pump_feed(feed, |summary| {
        if let Some(s) = summary {
            last = Some(s.clone());
        }
    })?;

    let Some(summary) = last else {
        eprintln!("no summary in feed");
        return Ok(ExitCode::from(EXIT_PENDING));
    };

    let info = AboutInfo::from_summary(&summary);
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("version: {}", info.version);
        println!("release: {}", info.release);
        println!("host:    {}", info.host);
    }
    return Ok(ExitCode::SUCCESS);
}

/// Print a styled notification as JSON.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn notify(
    kind: NotificationType,
    title: &str,
    message: Option<&str>,
    application: Application,
) -> Result<ExitCode, error::Error> {
    let notification = Notification::new(NotificationConfig {
        application,
        is_finished_task: false,
        kind,
        message: message.map(str::to_string),
        title: title.to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&notification)?);
    return Ok(ExitCode::SUCCESS);
}

/// Print the version and release parts of a raw version string, plus the
/// release name the tracker would cache for it.
///
/// # Errors
///
/// Returns `Error::Json` if JSON output fails to serialize.
pub fn parse(raw: &str, json: bool) -> Result<ExitCode, error::Error> {
    let parsed = parse_version(raw);
    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(ExitCode::SUCCESS);
    }

    let name = CodeNameResolver
        .release_name(raw)
        .map_or_else(|| return "(unknown)".to_string(), |r| return r.to_string());
    println!("version: {}", parsed.version);
    println!("release: {}", parsed.release);
    println!("name:    {name}");
    return Ok(ExitCode::SUCCESS);
}

/// Feed `sink` every emission of the feed file, or of stdin when no path
/// is given.
///
/// # Errors
///
/// Returns `Error::Io` if the feed cannot be opened or read, or
/// `Error::FeedMalformed` for an undecodable line.
fn pump_feed(feed: Option<&Path>, sink: impl FnMut(Option<&Summary>)) -> Result<usize, error::Error> {
    let mut decoder = FeedDecoder::default();
    let reader: Box<dyn BufRead> = match feed {
        None => Box::new(std::io::stdin().lock()),
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
    };
    return decoder.pump(reader, sink);
}

/// Register every section, pump the whole feed, then report.
///
/// # Errors
///
/// Returns errors from config, catalog, or feed handling.
pub fn resolve(sections: &[String], feed: Option<&Path>) -> Result<ExitCode, error::Error> {
    let session = LinkSession::open(Path::new("."))?;
    session.request(sections);

    let mut updates = 0_usize;
    let emissions = pump_feed(feed, |summary| {
        if session.observe(summary) {
            updates = updates.saturating_add(1);
        }
    })?;
    tracing::debug!(emissions, updates, "feed exhausted");

    return Ok(session.finish(sections));
}

/// List the section keys of the active catalog table.
///
/// # Errors
///
/// Returns errors from config or catalog loading.
pub fn sections() -> Result<ExitCode, error::Error> {
    let session = LinkSession::open(Path::new("."))?;
    for section in session.resolver.sections() {
        println!("{section}");
    }
    return Ok(ExitCode::SUCCESS);
}

/// Print the URL for `section` under `release` (or the catalog's default
/// release) without waiting for a feed.
///
/// # Errors
///
/// Returns errors from config or catalog loading.
pub fn url(section: &str, release: Option<&str>) -> Result<ExitCode, error::Error> {
    let session = LinkSession::open(Path::new("."))?;
    let resolver = &session.resolver;
    let release = release.map_or_else(|| return resolver.default_release().to_string(), str::to_lowercase);

    return match resolver.url_generator(section, &release) {
        None => {
            eprintln!("no documentation link for `{section}` ({})", resolver.variant());
            Ok(ExitCode::from(EXIT_NO_LINK))
        },
        Some(link) => {
            println!("{link}");
            Ok(ExitCode::SUCCESS)
        },
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(version: &str) -> Summary {
        return Summary {
            mgr_host: None,
            version: version.to_string(),
        };
    }

    #[test]
    fn observe_reports_cache_updates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".doclink.toml"), "variant = \"community\"\n").unwrap();
        let session = LinkSession::open(dir.path()).unwrap();
        session.request(&["dashboard".to_string()]);

        assert!(!session.observe(None), "absent summary");
        assert!(!session.observe(Some(&summary("ceph version 17.2.6"))), "unnamed release");
        assert!(session.waiting(), "still waiting after ignored emissions");

        assert!(session.observe(Some(&summary("ceph version 19.2.0 release squid"))), "named release");
        assert!(!session.waiting(), "request answered");
        assert_eq!(*session.fired.borrow(), vec![true], "one linked callback");
    }
}
