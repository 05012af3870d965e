//! Lifecycle event dispatching
//!
//! Events arrive as JSON lines, one object per line, tagged by `type`:
//!
//! ```text
//! {"type":"begin"}
//! {"type":"testEnd","test":{...},"result":{...}}
//! {"type":"error","error":{"message":"..."}}
//! {"type":"end"}
//! ```

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, ErrorKind};

use super::{Reporter, TestCase, TestError, TestResult};

/// A test run lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RunEvent {
    Begin,
    TestEnd { test: TestCase, result: TestResult },
    End,
    Error { error: TestError },
}

/// Route one event to the matching hook
pub fn dispatch(event: &RunEvent, reporter: &dyn Reporter) {
    match event {
        RunEvent::Begin => reporter.on_begin(),
        RunEvent::TestEnd { test, result } => reporter.on_test_end(test, result),
        RunEvent::End => reporter.on_end(),
        RunEvent::Error { error } => reporter.on_error(error),
    }
}

/// Counters for a processed event stream
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub events: usize,
    pub skipped: usize,
    /// The stream closed before an `end` event arrived
    pub implicit_end: bool,
}

/// Feed every event from `reader` to `reporter`.
///
/// Undecodable lines (including non-UTF-8 ones) and events after `end` are
/// skipped. When the stream stops without an `end` event, `on_end` is called
/// once so that collected failures are still delivered; this also happens
/// before an I/O error is returned.
pub fn run_stream<R: BufRead>(reader: R, reporter: &dyn Reporter) -> Result<StreamSummary> {
    let mut summary = StreamSummary::default();
    let mut ended = false;

    for (index, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                log::warn!("Skipping undecodable event on line {}: {}", index + 1, e);
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                if !ended {
                    log::warn!("Event stream failed on line {}, ending run", index + 1);
                    reporter.on_end();
                }
                return Err(e).context("Failed to read event stream");
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event: RunEvent = match serde_json::from_str(trimmed) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Skipping undecodable event on line {}: {}", index + 1, e);
                summary.skipped += 1;
                continue;
            }
        };

        if ended {
            log::warn!("Ignoring {} event received after end of run", event_name(&event));
            summary.skipped += 1;
            continue;
        }

        dispatch(&event, reporter);
        summary.events += 1;
        ended = event == RunEvent::End;
    }

    if !ended {
        log::warn!("Event stream closed without an end event");
        reporter.on_end();
        summary.implicit_end = true;
    }

    Ok(summary)
}

fn event_name(event: &RunEvent) -> &'static str {
    match event {
        RunEvent::Begin => "begin",
        RunEvent::TestEnd { .. } => "testEnd",
        RunEvent::End => "end",
        RunEvent::Error { .. } => "error",
    }
}
