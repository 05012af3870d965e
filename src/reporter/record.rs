//! Failure record extraction

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};

use super::{ORG_ID_ANNOTATION, TestCase, TestResult};

/// Payload describing one failed test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    pub organization_id: i64,
    pub testcase: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

/// How the organization id was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgId {
    Found(i64),
    /// No `orgId` annotation on the test
    Missing,
    /// Annotation present but its description is absent or not an integer
    Invalid(Option<String>),
}

impl OrgId {
    pub fn resolve(test: &TestCase) -> Self {
        let Some(annotation) = test.annotation(ORG_ID_ANNOTATION) else {
            return OrgId::Missing;
        };

        match annotation.description.as_deref().map(str::trim) {
            Some(text) => match text.parse::<i64>() {
                Ok(id) => OrgId::Found(id),
                Err(_) => OrgId::Invalid(Some(text.to_string())),
            },
            None => OrgId::Invalid(None),
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            OrgId::Found(id) => *id,
            OrgId::Missing | OrgId::Invalid(_) => 0,
        }
    }
}

impl FailureRecord {
    /// Build a record from a failed test.
    ///
    /// Errors when the result carries no error entries.
    pub fn extract(organization_id: i64, test: &TestCase, result: &TestResult) -> Result<Self> {
        let first = result
            .first_error()
            .ok_or_else(|| eyre!("Failed test '{}' has no reported errors", test.title))?;

        Ok(Self {
            organization_id,
            testcase: test.title.clone(),
            line: test.location.line,
            error: first.message.clone(),
            stacktrace: first.stack.clone(),
        })
    }
}
