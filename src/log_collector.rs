use crate::classifier::Classifier;
use crate::config::{Config, OutputFormat, Pairing, ParseErrorPolicy};
use crate::error::ReportError;
use crate::log_entry::LogLine;
use crate::timestamp::{format_duration, Timestamp};
use crate::types::{EventRecord, Report, StateKind};
use crate::uptime::{compute_uptime, DeviceState, UptimeTracker};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Opens `path` and writes its report to `out`.
pub fn run<W: Write>(
    path: &Path,
    config: &Config,
    format: OutputFormat,
    out: &mut W,
) -> Result<Report, ReportError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ReportError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ReportError::IoError(e),
    })?;

    info!("Reading log file: {}", path.display());

    // The file is closed when the reader drops, on every return path.
    process(BufReader::new(file), config, format, out)
}

/// Single pass over `reader`. In text mode ERR lines are written as they
/// are found; the summary (or the whole JSON report) is written last.
pub fn process<R: BufRead, W: Write>(
    reader: R,
    config: &Config,
    format: OutputFormat,
    out: &mut W,
) -> Result<Report, ReportError> {
    let mut collector = EventCollector::new(config);

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(raw) = collector.feed(idx + 1, &line)? {
            if format == OutputFormat::Text {
                writeln!(out, "ERROR at timestamp: {}", raw)?;
            }
        }
    }

    let report = collector.finish();

    match format {
        OutputFormat::Text => writeln!(out, "The device was ON for: {}", report.uptime)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }

    Ok(report)
}

/// Accumulates events and error reports line by line.
pub struct EventCollector {
    classifier: Classifier,
    policy: ParseErrorPolicy,
    pairing: Pairing,
    errors: Vec<String>,
    on_events: Vec<Timestamp>,
    off_events: Vec<Timestamp>,
    tracker: UptimeTracker,
    skipped_lines: usize,
}

impl EventCollector {
    pub fn new(config: &Config) -> Self {
        Self {
            classifier: Classifier::new(config.markers.clone()),
            policy: config.on_parse_error,
            pairing: config.pairing,
            errors: Vec::new(),
            on_events: Vec::new(),
            off_events: Vec::new(),
            tracker: UptimeTracker::new(),
            skipped_lines: 0,
        }
    }

    /// Processes one line. Returns the raw timestamp text when the line
    /// carries the error marker.
    pub fn feed(&mut self, line_number: usize, line: &str) -> Result<Option<String>, ReportError> {
        let entry = LogLine::new(line);
        let class = self.classifier.classify(entry.raw);

        if !class.error && class.state.is_none() {
            return Ok(None);
        }

        let parsed = match entry.timestamp.parse::<Timestamp>() {
            Ok(at) => Some(at),
            Err(source) => match self.policy {
                ParseErrorPolicy::Abort => {
                    return Err(ReportError::TimestampFormat {
                        line: line_number,
                        raw: entry.timestamp.to_string(),
                        source,
                    });
                }
                ParseErrorPolicy::Skip => {
                    warn!(
                        "Skipping line {}: invalid timestamp {:?}: {}",
                        line_number, entry.timestamp, source
                    );
                    self.skipped_lines += 1;
                    None
                }
            },
        };

        if let (Some(kind), Some(at)) = (class.state, parsed) {
            debug!("Line {}: {:?} at {}:{}", line_number, kind, at, entry.message);
            match kind {
                StateKind::On => self.on_events.push(at),
                StateKind::Off => self.off_events.push(at),
            }
            self.tracker.observe(EventRecord { kind, at });
        }

        if class.error {
            self.errors.push(entry.timestamp.to_string());
            return Ok(Some(entry.timestamp.to_string()));
        }

        Ok(None)
    }

    pub fn finish(self) -> Report {
        if self.on_events.is_empty() && self.off_events.is_empty() {
            warn!("No ON or OFF events in log file");
        }

        let total = match self.pairing {
            Pairing::Positional => compute_uptime(&self.on_events, &self.off_events),
            Pairing::Transitions => {
                if let DeviceState::On(since) = self.tracker.state() {
                    info!("Device still ON since {} at end of log, not counted", since);
                }
                if self.tracker.rejected() > 0 {
                    warn!(
                        "Ignored {} out-of-order state events",
                        self.tracker.rejected()
                    );
                }
                self.tracker.total()
            }
        };

        info!(
            "Processed {} ON, {} OFF and {} ERR events",
            self.on_events.len(),
            self.off_events.len(),
            self.errors.len()
        );

        Report {
            errors: self.errors,
            on_events: self.on_events,
            off_events: self.off_events,
            pairing: self.pairing,
            uptime: format_duration(total),
            uptime_ms: total.num_milliseconds(),
            skipped_lines: self.skipped_lines,
        }
    }
}
