//! Domain model for vehicle diagnosis.
//!
//! - `DiagnosisRequest`: vehicle + symptom description sent for diagnosis
//! - `FormInput`: the raw text form a request is built from
//! - `DiagnosisResult`: the structured answer
//! - `DiagnosisError`: everything that can go wrong while resolving

pub mod error;
pub mod request;
pub mod result;

pub use error::{DiagnosisError, Result, GENERIC_FAILURE_MESSAGE};
pub use request::{parse_leading_int, DiagnosisRequest, FormInput};
pub use result::DiagnosisResult;
