//! Delivery of failure records to the reporting endpoint

use eyre::{Context, Result};

use crate::reporter::FailureRecord;

/// Sends a single record and returns the response status code
pub trait Transport: Send + Sync {
    fn post(&self, url: &str, record: &FailureRecord) -> Result<u16>;
}

/// JSON over HTTP POST
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn post(&self, url: &str, record: &FailureRecord) -> Result<u16> {
        let body = serde_json::to_string(record).context("Failed to serialize failure record")?;

        log::debug!("POST {} ({} bytes)", url, body.len());

        let response = ureq::post(url)
            .header("Content-Type", "application/json")
            .send(body.as_bytes())
            .context("HTTP request failed")?;

        Ok(response.status().as_u16())
    }
}

/// Transport double recording every call
#[cfg(test)]
pub mod recording {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingTransport {
        calls: Mutex<Vec<(String, FailureRecord)>>,
        failing: Vec<String>,
    }

    impl RecordingTransport {
        /// Deliveries for these test case titles fail
        pub fn failing_for(titles: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: titles.iter().map(|t| t.to_string()).collect(),
            }
        }

        pub fn calls(&self) -> Vec<(String, FailureRecord)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for RecordingTransport {
        fn post(&self, url: &str, record: &FailureRecord) -> Result<u16> {
            self.calls.lock().unwrap().push((url.to_string(), record.clone()));
            if self.failing.contains(&record.testcase) {
                eyre::bail!("connection refused");
            }
            Ok(201)
        }
    }
}
