//! Resolvers that fabricate a diagnosis without contacting a backend.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::DiagnosisResolver;
use crate::dispatch::KeywordRuleSet;
use crate::domain::{DiagnosisRequest, DiagnosisResult, Result};
use crate::fixtures;

/// Keyword dispatch over canned diagnoses, after a simulated network delay.
#[derive(Debug, Clone)]
pub struct MockResolver {
    rules: KeywordRuleSet,
    delay: Duration,
}

impl MockResolver {
    /// Standard rule table with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self::with_rules(KeywordRuleSet::standard(), delay)
    }

    pub fn with_rules(rules: KeywordRuleSet, delay: Duration) -> Self {
        Self { rules, delay }
    }
}

#[async_trait]
impl DiagnosisResolver for MockResolver {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn resolve(&self, request: &DiagnosisRequest) -> Result<DiagnosisResult> {
        tokio::time::sleep(self.delay).await;
        let result = self.rules.dispatch(&request.symptoms);
        debug!(issue = %result.issue_title, "mock dispatch");
        Ok(result.clone())
    }
}

/// Answers every request with the same diagnosis.
#[derive(Debug, Clone)]
pub struct FixedResolver {
    result: DiagnosisResult,
    delay: Duration,
}

impl FixedResolver {
    pub fn new(result: DiagnosisResult, delay: Duration) -> Self {
        Self { result, delay }
    }

    /// Always "Worn Brake Pads", regardless of the symptoms.
    pub fn brake_pads(delay: Duration) -> Self {
        Self::new(fixtures::worn_brake_pads(), delay)
    }
}

#[async_trait]
impl DiagnosisResolver for FixedResolver {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn resolve(&self, _request: &DiagnosisRequest) -> Result<DiagnosisResult> {
        tokio::time::sleep(self.delay).await;
        Ok(self.result.clone())
    }
}
