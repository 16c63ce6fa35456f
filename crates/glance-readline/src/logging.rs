use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GLANCE_LOG";

/// Installs the global subscriber writing to a daily file under `logs_dir`.
///
/// The returned guard flushes pending lines on drop and must live until exit.
pub fn init_logging(logs_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;

    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        let default_level = "debug,hyper_util=info,hyper=info,reqwest=info,rustyline=warn";
        #[cfg(not(debug_assertions))]
        let default_level = "info";

        EnvFilter::new(default_level)
    });

    let appender = tracing_appender::rolling::daily(logs_dir, "glance.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Log system initialization failed: {err}"))?;

    Ok(guard)
}
