mod about;
mod cache;
mod catalog;
mod commands;
mod config;
mod diagnostics;
mod error;
mod feed;
mod notification;
mod release;
mod resolver;
mod types;
mod version;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::notification::{Application, NotificationType};

#[derive(Parser)]
#[command(name = "doclink", version, about = "Release-aware documentation links for storage cluster consoles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter for stderr output (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the about dialog fields for the last summary in a feed
    About {
        /// Feed file (JSON lines); reads stdin when omitted
        #[arg(long)]
        feed: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a notification with its style classes as JSON
    Notify {
        /// Notification type
        #[arg(value_enum)]
        kind: NotificationType,
        /// Headline
        title: String,
        /// Additional detail
        #[arg(long)]
        message: Option<String>,
        /// Originating application
        #[arg(long, value_enum, default_value_t = Application::Ceph)]
        application: Application,
    },
    /// Split a raw cluster version string into version and release
    Parse {
        /// Raw version string, e.g. "ceph version 19.2.0 release squid"
        raw: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print doc links once the feed reports the cluster's release
    Resolve {
        /// Section keys to resolve
        #[arg(required = true)]
        sections: Vec<String>,
        /// Feed file (JSON lines); reads stdin when omitted
        #[arg(long)]
        feed: Option<PathBuf>,
    },
    /// List the section keys of the active catalog
    Sections,
    /// Print the doc link for a section and release without a feed
    Url {
        /// Section key
        section: String,
        /// Release code name; defaults to the catalog's default release
        #[arg(long)]
        release: Option<String>,
    },
    /// Follow a feed file until every section has its link
    Watch {
        /// Section keys to resolve
        #[arg(required = true)]
        sections: Vec<String>,
        /// Feed file (JSON lines) to follow
        #[arg(long)]
        feed: PathBuf,
    },
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--log-level`.
fn initialize_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| return EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    let result = match &cli.command {
        Commands::About { feed, json } => commands::about(feed.as_deref(), *json),
        Commands::Notify {
            kind,
            title,
            message,
            application,
        } => commands::notify(*kind, title, message.as_deref(), *application),
        Commands::Parse { raw, json } => commands::parse(raw, *json),
        Commands::Resolve { sections, feed } => commands::resolve(sections, feed.as_deref()),
        Commands::Sections => commands::sections(),
        Commands::Url { section, release } => commands::url(section, release.as_deref()),
        Commands::Watch { sections, feed } => watch::run(sections, feed),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(3_u8)
        },
    };
}
