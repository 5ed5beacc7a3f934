//! Independent checks of solver output

pub mod correctness;

pub use self::correctness::{verify_max_flow, FlowCertificate, VerificationError};
