//! Logging setup utilities for the Kaiwa chat relay.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Both the library crate and the binary get the same level.
pub fn default_filter(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={}",
        crate_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
/// When `log_file` is given, every event is mirrored to that file without ANSI
/// colors. The returned guard must be held for the lifetime of the process,
/// otherwise buffered file output is lost.
///
/// # Arguments
///
/// * `crate_name` - The library crate whose events should be shown (e.g., "kaiwa-server")
/// * `binary_name` - The name of the binary (e.g., "kaiwa-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
/// * `log_file` - Optional path of a file that receives a copy of the log
///
/// # Examples
///
/// ```no_run
/// use kaiwa_shared::logger::setup_logger;
///
/// let _guard = setup_logger("kaiwa-server", "kaiwa-server", "debug", None);
/// ```
pub fn setup_logger(
    crate_name: &str,
    binary_name: &str,
    default_log_level: &str,
    log_file: Option<&Path>,
) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(crate_name, binary_name, default_log_level).into());

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map_or_else(|| "kaiwa.log".into(), |name| name.to_os_string());
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_snake_case_targets() {
        // テスト項目: クレート名とバイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let crate_name = "kaiwa-server";

        // when (操作):
        let filter = default_filter(crate_name, "kaiwa-server", "info");

        // then (期待する結果):
        assert_eq!(filter, "kaiwa_server=info,kaiwa_server=info");
    }

    #[test]
    fn test_default_filter_keeps_distinct_binary_target() {
        // テスト項目: バイナリ名がクレート名と異なる場合、両方のターゲットが含まれる
        // when (操作):
        let filter = default_filter("kaiwa-server", "relay", "debug");

        // then (期待する結果):
        assert_eq!(filter, "kaiwa_server=debug,relay=debug");
    }
}
