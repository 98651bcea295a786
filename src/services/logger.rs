use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Appends log records to a file; the terminal itself is owned by the UI.
struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            &Local::now(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub fn init(path: &str, level: LevelFilter) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    log::set_boxed_logger(Box::new(FileLogger {
        file: Mutex::new(file),
        level,
    }))
    .map_err(|e| anyhow!("logger already initialised: {}", e))?;
    log::set_max_level(level);

    Ok(())
}

fn format_line(now: &DateTime<Local>, level: Level, category: &str, message: &str) -> String {
    format!(
        "[{}] {} - {}: {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        level,
        category,
        message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_timestamp_level_and_category() {
        let now = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let line = format_line(&now, Level::Info, "Dashboard", "Switched to meme");
        assert_eq!(line, "[2026-01-02 03:04:05] INFO - Dashboard: Switched to meme");
    }
}
