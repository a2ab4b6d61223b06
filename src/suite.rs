// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Test case loading and filtering seam.
//!
//! The real conformance suite lives in an external engine; the harness
//! only needs an ordered list of cases for a query string. [`StaticSuite`]
//! is the in-process implementation used by the built-in smoke cases and
//! the tests: cases are matched by exact query, or by prefix when the
//! query ends with `*` (e.g. `webgpu:api,operation,*`).

use crate::protocol::TestStatus;
use crate::recorder::CaseRecorder;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// One conformance test case.
#[async_trait]
pub trait TestCase: Send + Sync {
    /// Structured query string identifying this case,
    /// e.g. `webgpu:api,operation,command_buffer:empty:`.
    fn query(&self) -> &str;

    /// Execute the case, reporting through `recorder`, and return the
    /// final status. Failures surface as a failing status, never as a
    /// panic or error the driver must handle.
    async fn run(&self, recorder: &mut dyn CaseRecorder, use_worker: bool) -> TestStatus;
}

/// An ordered source of test cases.
pub trait TestSuite: Send + Sync {
    /// Return the cases matching `query`, in suite order.
    fn load(&self, query: &str) -> Vec<Arc<dyn TestCase>>;
}

/// Whether `case_query` is selected by `filter`.
///
/// A trailing `*` matches any remainder; otherwise the match is exact.
pub fn query_matches(filter: &str, case_query: &str) -> bool {
    match filter.strip_suffix('*') {
        Some(prefix) => case_query.starts_with(prefix),
        None => case_query == filter,
    }
}

/// In-process test suite: a registry of cases filtered by query.
#[derive(Default)]
pub struct StaticSuite {
    cases: Vec<Arc<dyn TestCase>>,
}

impl StaticSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a case; registration order is execution order.
    pub fn register(&mut self, case: Arc<dyn TestCase>) {
        self.cases.push(case);
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl TestSuite for StaticSuite {
    fn load(&self, query: &str) -> Vec<Arc<dyn TestCase>> {
        let matched: Vec<Arc<dyn TestCase>> = self
            .cases
            .iter()
            .filter(|case| query_matches(query, case.query()))
            .cloned()
            .collect();
        debug!(query, matched = matched.len(), total = self.cases.len(), "loaded cases");
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedCase(&'static str);

    #[async_trait]
    impl TestCase for NamedCase {
        fn query(&self) -> &str {
            self.0
        }

        async fn run(&self, _recorder: &mut dyn CaseRecorder, _use_worker: bool) -> TestStatus {
            TestStatus::Pass
        }
    }

    fn sample_suite() -> StaticSuite {
        let mut suite = StaticSuite::new();
        suite.register(Arc::new(NamedCase("webgpu:api,operation,command_buffer:empty:")));
        suite.register(Arc::new(NamedCase("webgpu:api,operation,render_pass:clear:")));
        suite.register(Arc::new(NamedCase("webgpu:api,validation,buffer:size:")));
        suite
    }

    #[test]
    fn exact_query_matches_one_case() {
        let suite = sample_suite();
        let cases = suite.load("webgpu:api,validation,buffer:size:");
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].query(), "webgpu:api,validation,buffer:size:");
    }

    #[test]
    fn wildcard_query_matches_in_registration_order() {
        let suite = sample_suite();
        let cases = suite.load("webgpu:api,operation,*");
        let names: Vec<&str> = cases.iter().map(|case| case.query()).collect();
        assert_eq!(
            names,
            vec![
                "webgpu:api,operation,command_buffer:empty:",
                "webgpu:api,operation,render_pass:clear:",
            ]
        );
    }

    #[test]
    fn bare_star_matches_everything() {
        let suite = sample_suite();
        assert_eq!(suite.load("*").len(), 3);
    }

    #[test]
    fn unmatched_query_loads_nothing() {
        let suite = sample_suite();
        assert!(suite.load("webgpu:shader,*").is_empty());
        assert!(suite.load("webgpu:api,operation").is_empty());
    }
}
