//! Notification styling: presentation classes derived from the notification
//! type and originating application.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Kind of notification. Every style lookup below is an exhaustive match, so
/// a new kind cannot ship without its classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Failed operation.
    Error,
    /// Neutral information.
    Info,
    /// Completed operation.
    Success,
}

impl NotificationType {
    /// Icon class of the default theme.
    pub const fn icon_class(self) -> &'static str {
        return match self {
            Self::Error => "fa fa-exclamation-triangle",
            Self::Info => "fa fa-info",
            Self::Success => "fa fa-check",
        };
    }

    /// Icon class when the override theme is active.
    pub const fn override_icon_class(self) -> &'static str {
        return match self {
            Self::Error => "fas fa-exclamation-circle",
            Self::Info => "fas fa-info-circle",
            Self::Success => "fas fa-check-circle",
        };
    }

    /// Text class when the override theme is active.
    pub const fn override_text_class(self) -> &'static str {
        return match self {
            Self::Error => "pf-m-danger",
            Self::Info => "pf-m-info",
            Self::Success => "pf-m-success",
        };
    }

    /// Text class of the default theme.
    pub const fn text_class(self) -> &'static str {
        return match self {
            Self::Error => "text-danger",
            Self::Info => "text-info",
            Self::Success => "text-success",
        };
    }
}

/// Application a notification originates from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum Application {
    /// The storage cluster itself.
    #[default]
    Ceph,
    /// The alerting stack.
    Prometheus,
}

impl Application {
    /// Badge class shown next to the notification.
    pub const fn class(self) -> &'static str {
        return match self {
            Self::Ceph => "ceph-icon",
            Self::Prometheus => "prometheus-icon",
        };
    }
}

/// What a caller supplies to raise a notification.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Originating application.
    pub application: Application,
    /// Whether the notification reports a finished background task.
    pub is_finished_task: bool,
    /// Kind of notification.
    pub kind: NotificationType,
    /// Additional detail, shown under the title.
    pub message: Option<String>,
    /// Headline.
    pub title: String,
}

/// A notification with all presentation classes resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Originating application.
    pub application: Application,
    /// Badge class for the application.
    pub application_class: &'static str,
    /// Icon class of the default theme.
    pub icon_class: &'static str,
    /// Whether the notification reports a finished background task.
    pub is_finished_task: bool,
    /// Kind of notification.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Additional detail, shown under the title.
    pub message: Option<String>,
    /// Icon class when the override theme is active.
    pub override_icon_class: &'static str,
    /// Text class when the override theme is active.
    pub override_text_class: &'static str,
    /// Text class of the default theme.
    pub text_class: &'static str,
    /// Creation time, RFC 3339 with milliseconds, so stored notifications
    /// compare as strings.
    pub timestamp: String,
    /// Headline.
    pub title: String,
}

impl Notification {
    /// Resolve presentation classes for `config`, stamped with the current time.
    pub fn new(config: NotificationConfig) -> Self {
        return Self::at(config, Utc::now());
    }

    /// Resolve presentation classes for `config`, stamped with `at`.
    pub fn at(config: NotificationConfig, at: DateTime<Utc>) -> Self {
        let kind = config.kind;
        return Self {
            application: config.application,
            application_class: config.application.class(),
            icon_class: kind.icon_class(),
            is_finished_task: config.is_finished_task,
            kind,
            message: config.message,
            override_icon_class: kind.override_icon_class(),
            override_text_class: kind.override_text_class(),
            text_class: kind.text_class(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            title: config.title,
        };
    }
}
