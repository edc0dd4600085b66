use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes logging for the command line front end.
///
/// Console output goes to stderr so it does not mix with the review prompts.
/// When the data directory is available a JSON file log, rotated daily, is
/// written next to the settings database.
///
/// Default level is "info" with service at debug, override with RUST_LOG:
/// - RUST_LOG=debug swipely review ~/Pictures
/// - RUST_LOG=service=trace,photo_catalog=debug swipely review ~/Pictures
///
/// Returns a guard that must be kept alive for the duration of the program.
pub fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let (file_layer, guard) = match file_system::get_log_dir() {
        Ok(log_dir) => {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "swipely.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("Warning: no log directory available ({}), logging to console only", e);
            (None, None)
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,service=debug,photo_catalog=info,database=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}
