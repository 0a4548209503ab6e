//! Sentry and tracing setup.

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tienda_client::ClientConfig;

const DEFAULT_FILTER: &str =
    "warn,tienda_cli=info,tienda_client=info,tienda_storefront=info,tienda_admin=info";

/// Start the Sentry client when a DSN is configured.
///
/// The returned guard flushes queued events on drop, so it has to outlive
/// every command.
pub fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let options = sentry::ClientOptions {
        dsn: config.sentry_dsn.as_deref().and_then(|dsn| dsn.parse().ok()),
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Into::into),
        attach_stacktrace: true,
        ..Default::default()
    };
    options.dsn.is_some().then(|| sentry::init(options))
}

/// Controller failures become Sentry events; info lines ride along as
/// breadcrumbs. Debug output stays local.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the global subscriber. Logs go to stderr; stdout carries command output.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}
