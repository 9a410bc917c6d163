use crate::config::Pairing;
use crate::timestamp::Timestamp;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StateKind {
    On,
    Off,
}

/// A state change seen in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub kind: StateKind,
    pub at: Timestamp,
}

/// Final outcome of one pass over a log file.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Raw timestamp text of every ERR line, in log order
    pub errors: Vec<String>,
    pub on_events: Vec<Timestamp>,
    pub off_events: Vec<Timestamp>,
    pub pairing: Pairing,
    /// Rendered total, e.g. `0:00:02`
    pub uptime: String,
    pub uptime_ms: i64,
    pub skipped_lines: usize,
}
