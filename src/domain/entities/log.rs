use chrono::DateTime;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Other(String),
}

impl LogLevel {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warning" | "warn" => LogLevel::Warning,
            "info" => LogLevel::Info,
            _ => LogLevel::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Other(raw) => raw,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            LogLevel::Error => "#ef4444",
            LogLevel::Warning => "#eab308",
            LogLevel::Info => "#3b82f6",
            LogLevel::Other(_) => "#6b7280",
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(LogLevel::parse(&raw))
    }
}

/// One line of the server's processing log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
}

impl LogEntry {
    pub fn display_line(&self) -> String {
        format!(
            "{} [{}] {}",
            self.timestamp,
            self.level.as_str().to_uppercase(),
            self.message
        )
    }

    /// `HH:MM:SS` for RFC 3339 timestamps, the raw text otherwise.
    pub fn short_time(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|ts| ts.format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

/// Message substrings that mark a processing stage, checked in order.
pub const PROGRESS_TRIGGERS: [(&str, u8); 5] = [
    ("Starting OCR processing", 10),
    ("Processing file", 30),
    ("Compiling Voter Record Data", 50),
    ("Matching petition signatures", 70),
    ("OCR processing completed", 100),
];

pub fn progress_for_message(message: &str) -> Option<u8> {
    PROGRESS_TRIGGERS
        .iter()
        .find(|(trigger, _)| message.contains(trigger))
        .map(|(_, percent)| *percent)
}
