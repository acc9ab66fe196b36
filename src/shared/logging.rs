use chrono::{SecondsFormat, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Append-only JSON-lines log with size based rotation
/// (`agent.log` -> `agent.log.1` -> ... -> `agent.log.N`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentLog {
    path: PathBuf,
    max_bytes: u64,
    backup_count: u32,
}

impl AgentLog {
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64, backup_count: u32) -> Self {
        Self {
            path: path.into(),
            max_bytes,
            backup_count,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write failures are swallowed; logging never fails a workflow run.
    pub fn append(&self, level: LogLevel, event: &str, run_id: &str, message: &str) {
        let payload = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": level.as_str(),
            "event": event,
            "run_id": run_id,
            "message": message,
        });
        let Ok(line) = serde_json::to_string(&payload) else {
            return;
        };
        let _ = self.write_line(&line);
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.rotate_if_needed(line.len() as u64 + 1)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }

    fn rotate_if_needed(&self, incoming: u64) -> std::io::Result<()> {
        if self.max_bytes == 0 {
            return Ok(());
        }
        let current = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };
        if current == 0 || current + incoming <= self.max_bytes {
            return Ok(());
        }

        if self.backup_count == 0 {
            return fs::write(&self.path, b"");
        }
        for index in (1..self.backup_count).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }

    pub fn backup_path(&self, index: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }
}
