use serde::{Deserialize, Serialize};

/// Alarm severity, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown alarm severity code: {0}")]
pub struct UnknownSeverity(pub i64);

impl Severity {
    /// Decode the integer severity code carried by alarm events.
    pub fn from_code(code: i64) -> Result<Self, UnknownSeverity> {
        match code {
            0 => Ok(Severity::Info),
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Error),
            3 => Ok(Severity::Fatal),
            other => Err(UnknownSeverity(other)),
        }
    }

    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Severity::Info => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
            Severity::Fatal => 3,
        }
    }
}

/// One alarm raised by a blade during the run. Ordering is not significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    /// Epoch milliseconds.
    pub date: i64,
    pub severity: Severity,
    pub message: String,
}

impl Alarm {
    #[must_use]
    pub fn new(date: i64, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            date,
            severity,
            message: message.into(),
        }
    }
}
