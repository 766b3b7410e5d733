//! Log-and-continue wrapper for best-effort operations
//!
//! Losing saved preferences must never take the host application down, so
//! every storage failure is reported to the injected logger as a warning
//! and then dropped.

use std::fmt::Display;

use log::{Level, Log, Metadata, Record};

use crate::error::Result;

/// Run `operation`, turning any error into a single warning record.
///
/// The record reads `"{message} '{arg}': {error}"`. Returns `None` when the
/// operation failed.
pub fn execute_noncritical<T, F>(
    logger: &dyn Log,
    message: &str,
    arg: &dyn Display,
    operation: F,
) -> Option<T>
where
    F: FnOnce() -> Result<T>,
{
    match operation() {
        Ok(value) => Some(value),
        Err(err) => {
            logger.log(
                &Record::builder()
                    .level(Level::Warn)
                    .target(module_path!())
                    .module_path_static(Some(module_path!()))
                    .file_static(Some(file!()))
                    .line(Some(line!()))
                    .args(format_args!("{message} '{arg}': {err}"))
                    .build(),
            );
            None
        }
    }
}

/// Forwards to whatever logger is installed through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record) {
        log::logger().log(record)
    }

    fn flush(&self) {
        log::logger().flush()
    }
}
