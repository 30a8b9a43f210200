use tracing::subscriber::set_global_default;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::Subscriber;
use tracing_bunyan_formatter::BunyanFormattingLayer;
use tracing_bunyan_formatter::JsonStorageLayer;
use tracing_log::log_tracer::SetLoggerError;
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

/// 'subscriber' here is the `tracing` trait, not a Mailchimp subscriber!
///
/// `RUST_LOG` takes precedence over `filter_level`. Output is bunyan-style
/// JSON, one object per line, written to `sink` (e.g. `std::io::stdout`; must
/// be the function, not its return value).
pub fn get_subscriber<Sink>(
    name: &str,
    filter_level: &str,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_level));
    let fmt_layer = BunyanFormattingLayer::new(name.to_string(), sink);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(fmt_layer)
}

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("could not redirect `log` records to `tracing`")]
    LogTracer(#[from] SetLoggerError),
    #[error("a global tracing subscriber was already set")]
    GlobalDefault(#[from] SetGlobalDefaultError),
}

/// Install `subscriber` globally. Should be called once, before the server is
/// built; `log` records (e.g. from actix-web) are captured too.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), TelemetryError> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
