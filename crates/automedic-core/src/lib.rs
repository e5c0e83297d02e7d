//! AutoMedic Core Library
//!
//! Vehicle diagnosis request handling: the request/result contract, the
//! resolver strategies behind it (mock keyword dispatch, fixed answer, remote
//! HTTP endpoint) and the submission session that drives them.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod fixtures;
pub mod obs;
pub mod resolver;
pub mod session;
pub mod telemetry;

pub use config::{ResolverConfig, Strategy};
pub use dispatch::{KeywordRule, KeywordRuleSet};
pub use domain::{
    parse_leading_int, DiagnosisError, DiagnosisRequest, DiagnosisResult, FormInput, Result,
    GENERIC_FAILURE_MESSAGE,
};
pub use resolver::{
    build_resolver, DiagnosisResolver, FixedResolver, MockResolver, RemoteResolver,
    DIAGNOSE_PATH, HEALTH_PATH,
};
pub use session::{DiagnosisSession, OverlapPolicy, SessionEvent, SessionState};
pub use telemetry::init_tracing;
