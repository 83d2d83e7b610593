pub mod config;
pub mod context;
pub mod runner;

pub use config::VerifierConfig;
pub use context::{VerificationContext, VerificationRequest};
pub use runner::Verifier;
