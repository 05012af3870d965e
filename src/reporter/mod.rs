//! Test run lifecycle handling
//!
//! The test framework reports a run as a sequence of lifecycle events. A
//! [`Reporter`] receives those events; [`FailedTestsReporter`] is the one that
//! collects failures and relays them to the reporting endpoint.

use serde::{Deserialize, Serialize};

pub mod dispatch;
pub mod record;

pub use dispatch::run_stream;
pub use failed_tests::FailedTestsReporter;
pub use record::FailureRecord;

/// Annotation type carrying the organization id
pub const ORG_ID_ANNOTATION: &str = "orgId";

/// A key/description pair attached to a test case
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where a test is declared
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// Identity and metadata of a test
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestCase {
    pub title: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl TestCase {
    /// First annotation of the given type
    pub fn annotation(&self, kind: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.kind == kind)
    }
}

/// Final status of a test, as decided by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    Passed,
    Failed,
    #[serde(alias = "timedout")]
    TimedOut,
    Skipped,
    Interrupted,
}

/// An error reported by the runner, either for a test or for the whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Outcome of a single test
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestResult {
    pub status: TestStatus,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default)]
    pub errors: Vec<TestError>,
}

impl TestResult {
    pub fn first_error(&self) -> Option<&TestError> {
        self.errors.first()
    }
}

/// Receives test run lifecycle events.
///
/// Hooks are failure boundaries: implementations handle their own errors and
/// never hand them back to the caller.
pub trait Reporter: Send + Sync {
    fn on_begin(&self);
    fn on_test_end(&self, test: &TestCase, result: &TestResult);
    fn on_end(&self);
    fn on_error(&self, error: &TestError);
}
