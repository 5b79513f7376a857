//! Per-session SCPI command log.
//!
//! One text file per session, named `<device>_<ddmmYYYYHHMM>.txt`, opened in
//! append mode. The first line records the creation time; every transmitted
//! command then adds one line:
//!
//! ```text
//! [2026-10-16 14:03:27] SCPI: :OUTP1 ON | Duration : 1.73 ms | Response: 1
//! ```
//!
//! Write failures are reported through `tracing` and never fail the command
//! that produced the entry.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::AwgResult;

/// Append-only command log.
#[derive(Debug)]
pub struct CommandLog {
    path: Option<PathBuf>,
    file: Option<File>,
    last_line: Option<String>,
}

impl CommandLog {
    /// Create `<directory>/<device>_<ddmmYYYYHHMM>.txt` and write the header line.
    pub fn create(directory: impl AsRef<Path>, device: &str) -> AwgResult<Self> {
        let now = Local::now();
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory)?;

        let path = directory.join(file_name(device, now));
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(
            file,
            "Log file created for {} at {} ",
            device.to_uppercase(),
            now.format("%Y-%m-%d %H:%M:%S%.6f")
        )?;
        tracing::debug!(path = %path.display(), "command log created");

        Ok(Self {
            path: Some(path),
            file: Some(file),
            last_line: None,
        })
    }

    /// A log that formats lines but persists nothing.
    pub fn disabled() -> Self {
        Self {
            path: None,
            file: None,
            last_line: None,
        }
    }

    /// Location of the log file, if one was created.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Most recent line, without the trailing newline.
    pub fn last_line(&self) -> Option<&str> {
        self.last_line.as_deref()
    }

    /// Append one entry and return the formatted line (without newline).
    pub fn record(&mut self, command: &str, duration: Duration, response: &str) -> String {
        let line = format_line(Local::now(), command, duration, response);
        if let Some(file) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "{line}") {
                tracing::warn!(error = %e, command, "failed to append to command log");
            }
        }
        self.last_line = Some(line.clone());
        line
    }
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Log file name for `device` created at `at`.
pub fn file_name(device: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.txt", device, at.format("%d%m%Y%H%M"))
}

/// Format a single log line.
pub fn format_line(at: DateTime<Local>, command: &str, duration: Duration, response: &str) -> String {
    format!(
        "[{}] SCPI: {} | Duration : {:.2} ms | Response: {}",
        at.format("%Y-%m-%d %H:%M:%S"),
        command,
        duration.as_secs_f64() * 1000.0,
        response
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 9, 7, 5, 42).unwrap()
    }

    #[test]
    fn line_format() {
        let line = format_line(
            fixed_time(),
            ":OUTP1 ON",
            Duration::from_micros(1_734),
            "1",
        );
        assert_eq!(
            line,
            "[2026-03-09 07:05:42] SCPI: :OUTP1 ON | Duration : 1.73 ms | Response: 1"
        );
    }

    #[test]
    fn file_name_uses_day_month_year_order() {
        assert_eq!(
            file_name("awg_10.0.0.7", fixed_time()),
            "awg_10.0.0.7_090320260705.txt"
        );
    }

    #[test]
    fn create_writes_header_and_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = CommandLog::create(dir.path(), "awg_10.0.0.7").unwrap();
        let path = log.path().unwrap().to_path_buf();

        let line = log.record("*IDN?", Duration::from_millis(2), "Keysight,M8195A,1,2");
        assert!(line.ends_with("| Response: Keysight,M8195A,1,2"));
        assert_eq!(log.last_line(), Some(line.as_str()));

        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Log file created for AWG_10.0.0.7 at "));
        assert!(lines[1].contains("SCPI: *IDN? | Duration : 2.00 ms"));
    }

    #[test]
    fn disabled_log_still_formats() {
        let mut log = CommandLog::disabled();
        let line = log.record("*RST", Duration::ZERO, "OK");
        assert!(line.ends_with("SCPI: *RST | Duration : 0.00 ms | Response: OK"));
        assert!(log.path().is_none());
    }
}
