//! Feed follower: pumps a feed file, then keeps reading what gets appended
//! until every requested section has its link.

use std::fs::File;
use std::io::{Cursor, Read as _, Seek as _, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands::LinkSession;
use crate::error;
use crate::feed::FeedDecoder;

/// Debounce delay between filesystem events and re-reading the feed.
const DEBOUNCE_MS: u64 = 100;

/// Reads a growing feed file incrementally. Only complete lines are
/// consumed; a partial last line waits for the next read.
struct FeedFollower {
    /// Decoder keeping absolute line numbers across reads.
    decoder: FeedDecoder,
    /// Byte offset of the first unconsumed byte.
    offset: u64,
    /// The feed file.
    path: PathBuf,
}

impl FeedFollower {
    /// Follow `path` from its beginning.
    fn new(path: &Path) -> Self {
        return Self {
            decoder: FeedDecoder::default(),
            offset: 0,
            path: path.to_path_buf(),
        };
    }

    /// Push every complete line appended since the last call into `session`.
    /// A missing file reads as empty; a truncated file is re-read from the top.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` for read failures other than not-found, or
    /// `Error::FeedMalformed` for an undecodable line.
    fn drain(&mut self, session: &LinkSession) -> Result<(), error::Error> {
        let mut file = match File::open(&self.path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(error::Error::Io(e)),
            Ok(f) => f,
        };

        let len = file.metadata()?.len();
        if len < self.offset {
            tracing::warn!(path = %self.path.display(), "feed truncated, reading from the start");
            self.offset = 0;
            self.decoder = FeedDecoder::default();
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut appended = Vec::new();
        file.read_to_end(&mut appended)?;

        // Bytes, not text: the unfinished tail may end inside a UTF-8 sequence.
        let Some(end) = appended.iter().rposition(|b| return *b == b'\n') else {
            return Ok(());
        };
        let complete = appended.get(..=end).unwrap_or_default();
        let consumed: u64 = complete.len().try_into().unwrap_or(u64::MAX);
        self.offset = self.offset.saturating_add(consumed);

        self.decoder.pump(Cursor::new(complete), |summary| {
            if session.observe(summary) {
                tracing::debug!(path = %self.path.display(), "release updated from appended line");
            }
        })?;
        return Ok(());
    }
}

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Entry point for the watch command.
///
/// Reads the feed once, then watches its directory and re-reads on changes
/// until no requested section is waiting. Filesystem events only wake this
/// thread; all cache updates happen here.
///
/// # Errors
///
/// Returns errors from config or catalog loading, feed reading, or watcher setup.
pub fn run(sections: &[String], feed: &Path) -> Result<ExitCode, error::Error> {
    let session = LinkSession::open(Path::new("."))?;
    session.request(sections);

    let mut follower = FeedFollower::new(feed);
    follower.drain(&session)?;
    if !session.waiting() {
        return Ok(session.finish(sections));
    }

    let dir = feed
        .parent()
        .filter(|p| return !p.as_os_str().is_empty())
        .unwrap_or_else(|| return Path::new("."));

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher.watch(dir, RecursiveMode::NonRecursive).map_err(|e| {
        return error::Error::Watch {
            reason: format!("cannot watch {}: {e}", dir.display()),
        };
    })?;
    // Lines appended before the watch was registered raised no event.
    follower.drain(&session)?;

    eprintln!("watch: waiting for a release in {}, press Ctrl+C to stop", feed.display());

    while session.waiting() && rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        tracing::debug!(path = %feed.display(), "feed changed, re-reading");
        follower.drain(&session)?;
    }

    return Ok(session.finish(sections));
}
