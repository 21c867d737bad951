//! Optional remote Ishihara diagnosis.
//!
//! The service is consulted after a session completes. Whatever happens on
//! the network, the caller ends up with a classification: the remote one when
//! it arrives in time and validates, the local one otherwise.

pub mod client;
pub mod config;
pub mod error;
pub mod pending;
pub mod resolve;

pub use client::{
    parse_remote_payload, request_remote_diagnosis, HttpDiagnosisClient, RemoteDiagnosis,
};
pub use config::DiagnosisConfig;
pub use error::DiagnosisError;
pub use pending::PendingDiagnosis;
pub use resolve::{resolve, DiagnosisOutcome, Resolution};

/// Request body: stringified item id to the user's answer, `null` when the
/// trial timed out.
pub type Answers = std::collections::BTreeMap<String, Option<String>>;
