//! Logging setup for hosts and tools embedding the framework
//!
//! Console output follows `RUST_LOG`, e.g. `RUST_LOG=dockpanel::listview=trace`
//! to watch reconciliation and selection notifications. Host plugins also
//! get a daily-rotated `dockpanel.log` under the config directory's `logs/`
//! at debug level, since their stderr usually goes nowhere.
//!
//! Both entry points leave an already installed subscriber alone; the host
//! process may have set one up first.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Console plus rolling file logging, for code running inside a host
pub fn init() {
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => Some(
            fmt::layer()
                .with_writer(tracing_appender::rolling::daily(logs_dir, "dockpanel.log"))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(EnvFilter::new("debug")),
        ),
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {:#}", e);
            None
        }
    };

    let _ = tracing_subscriber::registry()
        .with(console_layer("warn"))
        .with(file_layer)
        .try_init();
}

/// Console-only logging for command line tools; `verbose` lowers the
/// default level to debug
pub fn init_cli(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(console_layer(default))
        .try_init();
}

/// stderr layer honoring `RUST_LOG`, `default` when it is unset or invalid
fn console_layer<S>(default: &str) -> impl Layer<S>
where
    S: ::tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter)
}
