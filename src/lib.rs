//! A purely mathematical Diffie-Hellman key exchange demonstrator.
//!
//! It is *EXCLUSIVELY* for demonstration and educational purposes. Nothing here is fit for
//! real cryptographic use.

pub mod cs;
pub mod error;
pub mod math;

pub use cs::security::{
    run_exchange, CandidateParameters, ExchangeResult, GeneratorCheck, ParameterCorrector,
    ParameterId, PromptCorrector, ProtocolParameters, ValidatorConfig, Violation,
};
pub use error::{Error, Result};
