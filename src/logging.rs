use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "deckwise=info,tower_http=info";

const LOG_FILE_PREFIX: &str = "deckwise.log";

/// Runs `f` under a plain stdout subscriber
///
/// Used for work that happens before [`init_tracing`] can be called, such as
/// loading the configuration it depends on.
pub fn with_startup_logging<T>(f: impl FnOnce() -> T) -> T {
    tracing::subscriber::with_default(startup_subscriber(std::io::stdout), f)
}

fn startup_subscriber<W>(writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with_writer(writer)
        .finish()
}

/// Installs the global tracing subscriber
///
/// Events go to stdout in the configured format. When `log_dir` is set they
/// are also written as JSON to a daily rolling file; the returned guard must
/// be held until shutdown so buffered lines are flushed.
///
/// ### Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let stdout_layer = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{self, CliArgs};
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_startup_logging_reports_bad_config_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "fingerprint_scope = \"per-deck\"").unwrap();
        let captured = Captured::default();
        let writer = captured.clone();

        let config = tracing::subscriber::with_default(startup_subscriber(move || writer.clone()), || {
            config::get_config_in(Some(dir.path().to_path_buf()), CliArgs::default())
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Ignoring config file"), "output was: {output}");
        assert_eq!(config.fingerprint_scope, Default::default());
    }

    #[test]
    fn test_with_startup_logging_returns_value() {
        assert_eq!(with_startup_logging(|| 42), 42);
    }
}
