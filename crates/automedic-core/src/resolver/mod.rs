//! Diagnosis resolvers.
//!
//! Every strategy implements [`DiagnosisResolver`]:
//! - [`MockResolver`]: keyword dispatch over canned answers after an artificial delay
//! - [`FixedResolver`]: always the same answer after the same delay
//! - [`RemoteResolver`]: one JSON `POST /api/diagnose` against a remote service

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ResolverConfig, Strategy};
use crate::domain::{DiagnosisRequest, DiagnosisResult, Result};

pub mod mock;
pub mod remote;

pub use mock::{FixedResolver, MockResolver};
pub use remote::{RemoteResolver, DIAGNOSE_PATH, HEALTH_PATH};

/// Produces a diagnosis for a request.
#[async_trait]
pub trait DiagnosisResolver: Send + Sync {
    /// Short strategy name used in logs.
    fn name(&self) -> &'static str;

    /// Resolve one request. Implementations never return partial results.
    async fn resolve(&self, request: &DiagnosisRequest) -> Result<DiagnosisResult>;
}

/// Build the resolver selected by `config`.
pub fn build_resolver(config: &ResolverConfig) -> Result<Arc<dyn DiagnosisResolver>> {
    let resolver: Arc<dyn DiagnosisResolver> = match config.strategy {
        Strategy::Mock => Arc::new(MockResolver::new(config.mock_delay)),
        Strategy::Fixed => Arc::new(FixedResolver::brake_pads(config.mock_delay)),
        Strategy::Remote => Arc::new(RemoteResolver::new(&config.endpoint, config.timeout)?),
    };
    Ok(resolver)
}
