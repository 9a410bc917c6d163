use crate::timestamp::TIMESTAMP_WIDTH;

/// A single record read from the device log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    /// Fixed-width timestamp field, as written in the log
    pub timestamp: &'a str,
    /// Everything after the timestamp field
    pub message: &'a str,
    /// Full line as read
    pub raw: &'a str,
}

impl<'a> LogLine<'a> {
    /// Splits off the first [`TIMESTAMP_WIDTH`] characters. Shorter lines
    /// keep the whole text as their timestamp field.
    pub fn new(raw: &'a str) -> Self {
        let split = raw
            .char_indices()
            .nth(TIMESTAMP_WIDTH)
            .map_or(raw.len(), |(idx, _)| idx);
        let (timestamp, message) = raw.split_at(split);
        Self {
            timestamp,
            message,
            raw,
        }
    }
}
