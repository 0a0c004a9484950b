use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_DIR: &str = "logs";
const LOG_PREFIX: &str = "pcreg_step";

// `None` when another subscriber already owned the global slot.
static LOG_GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Installs console and rolling-file logging. `RUST_LOG` overrides `base_level`.
///
/// Only the first call does any work, so tests can call it freely.
pub fn setup_logging(base_level: &str) -> anyhow::Result<()> {
    let mut result = Ok(());
    LOG_GUARD.get_or_init(|| match install(base_level) {
        Ok(guard) => guard,
        Err(err) => {
            result = Err(err);
            None
        }
    });
    result
}

fn install(base_level: &str) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(base_level))?;

    std::fs::create_dir_all(LOG_DIR)?;

    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .max_log_files(5)
        .build(LOG_DIR)?;

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_writer);

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    Ok(installed.then_some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_runs_once() -> anyhow::Result<()> {
        setup_logging("debug")?;
        assert!(LOG_GUARD.get().is_some());

        setup_logging("trace")?;
        assert!(LOG_GUARD.get().is_some());

        Ok(())
    }
}
