//! Observe a test run from its lifecycle event stream

use eyre::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::logger::Logger;
use crate::reporter::{FailedTestsReporter, run_stream};
use crate::transport::HttpTransport;

pub fn run(input: Option<&Path>, config: &Config) -> Result<()> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => {
            let file = File::open(path).context(format!("Failed to open event stream {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let reporter = FailedTestsReporter::new(
        config.endpoint().map(str::to_string),
        Arc::new(HttpTransport),
        Logger::stdout(&config.tag),
    );

    log::info!(
        "Listening for events from {}",
        input.map(|p| p.display().to_string()).unwrap_or_else(|| "stdin".to_string())
    );

    let summary = run_stream(reader, &reporter)?;

    log::info!(
        "Run finished: {} events, {} skipped, {} failure record(s){}",
        summary.events,
        summary.skipped,
        reporter.records().len(),
        if summary.implicit_end { " (no end event, run closed at end of input)" } else { "" }
    );

    Ok(())
}
