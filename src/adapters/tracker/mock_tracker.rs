//! Mock issue tracker for testing.
//!
//! Hands out sequential readable ids (`{PREFIX}-1`, `{PREFIX}-2`, ...) and
//! records every issue it was asked to create.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{CreatedIssue, IssueTracker, NewIssue, TrackerError};

/// Mock tracker with scriptable failures.
#[derive(Debug, Clone)]
pub struct MockIssueTracker {
    prefix: String,
    created: Arc<Mutex<Vec<NewIssue>>>,
    failures: Arc<Mutex<VecDeque<TrackerError>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockIssueTracker {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            created: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Fail the next create call with `error`.
    pub fn with_failure(self, error: TrackerError) -> Self {
        lock(&self.failures).push_back(error);
        self
    }

    /// Issues successfully created so far.
    pub fn created(&self) -> Vec<NewIssue> {
        lock(&self.created).clone()
    }
}

impl Default for MockIssueTracker {
    fn default() -> Self {
        Self::new("TEST")
    }
}

#[async_trait]
impl IssueTracker for MockIssueTracker {
    async fn create_issue(&self, issue: NewIssue) -> Result<CreatedIssue, TrackerError> {
        if let Some(error) = lock(&self.failures).pop_front() {
            return Err(error);
        }

        let mut created = lock(&self.created);
        let number = created.len() + 1;
        let result = CreatedIssue {
            id: format!("2-{}", number),
            id_readable: format!("{}-{}", self.prefix, number),
            summary: issue.summary.clone(),
        };
        created.push(issue);
        Ok(result)
    }
}
