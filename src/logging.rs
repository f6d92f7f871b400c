use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, Env};

/// init
///
/// Installs the global tracing subscriber. The log level is taken from the
/// RUST_LOG environment variable, falling back to sensible defaults for local
/// development. The output format is selected by the runtime environment:
/// pretty-printed for humans in local mode, JSON for log aggregators in
/// production.
pub fn init(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "places_portal=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }
}

/// Channel names for the logical log streams of the application.
///
/// A channel groups related events (account activity, place mutations, review
/// mutations, request handling) so they can be filtered or routed independently
/// by the log pipeline. Every event emitted through a `ChannelLogger` carries
/// its channel as a structured `channel` field.
pub mod channels {
    pub const SYSTEM: &str = "system";
    pub const ACCOUNT: &str = "account";
    pub const PLACES: &str = "places";
    pub const REVIEWS: &str = "reviews";
    pub const HTTP: &str = "http";
}

/// ChannelLogger
///
/// A lightweight handle that emits tracing events tagged with a fixed channel.
/// The channel is selected once at construction and the handle is passed to the
/// component that needs it, so there is no global channel registry or lookup.
#[derive(Debug, Clone, Copy)]
pub struct ChannelLogger {
    channel: &'static str,
}

impl ChannelLogger {
    pub const fn new(channel: &'static str) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &'static str {
        self.channel
    }

    pub fn error(&self, message: &str) {
        tracing::error!(channel = self.channel, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(channel = self.channel, "{}", message);
    }

    pub fn info(&self, message: &str) {
        tracing::info!(channel = self.channel, "{}", message);
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(channel = self.channel, "{}", message);
    }
}
