// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

static LOGGER: StderrLogger = StderrLogger;
static MAX_LEVEL: AtomicUsize = AtomicUsize::new(LevelFilter::Info as usize);

/// Diagnostic channel for search progress and failures. Host applications that
/// already install a `log` backend do not need this.
struct StderrLogger;

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  MAX_LEVEL.store(level as usize, Ordering::Relaxed);
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

fn level_tag(level: Level) -> (&'static str, &'static str) {
  match level {
    Level::Error => ("🔴", "error"),
    Level::Warn => ("🟠", "warn"),
    Level::Info => ("🔵", "info"),
    Level::Debug => ("⚪", "debug"),
    Level::Trace => ("▫️", "trace"),
  }
}

/// Format: "🔴 [error] symcell::physics::analysis::search: message"
pub fn format_record(level: Level, target: &str, message: &str) -> String {
  let (icon, tag) = level_tag(level);
  format!("{}  [{}] {}: {}", icon, tag, target, message)
}

impl log::Log for StderrLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    (metadata.level() as usize) <= MAX_LEVEL.load(Ordering::Relaxed)
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let msg = format_record(record.level(), record.target(), &record.args().to_string());
      let stderr = std::io::stderr();
      let mut handle = stderr.lock();
      let _ = writeln!(handle, "{}", msg);
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_record_tags_level() {
    let line = format_record(Level::Error, "symcell", "capacity exceeded");
    assert!(line.contains("[error]"));
    assert!(line.ends_with("symcell: capacity exceeded"));

    let line = format_record(Level::Debug, "symcell::kmesh", "folding");
    assert!(line.contains("[debug]"));
  }
}
