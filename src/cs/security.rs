pub mod diffie_hellman;
pub mod prompt;

// Re-export Diffie-Hellman functionality
pub use diffie_hellman::{
    run_exchange, CandidateParameters, ExchangeResult, GeneratorCheck, KeyPair,
    ParameterCorrector, ParameterId, ProtocolParameters, ValidatorConfig, Violation,
};

// Re-export the interactive corrector
pub use prompt::{parse_decimal, PromptCorrector};
