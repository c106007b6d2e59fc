use thiserror::Error;

use crate::cs::security::diffie_hellman::ParameterId;

/// Errors that abort an exchange run.
///
/// An invalid parameter is not listed here: it is a [`Violation`] and is handled by the
/// validator through its corrector. Only failures the run cannot recover from surface.
///
/// [`Violation`]: crate::cs::security::diffie_hellman::Violation
#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required parameter(s): {}", join_missing(.0))]
    MissingParameters(Vec<ParameterId>),

    #[error("gave up after {0} corrections without a valid parameter set")]
    TooManyCorrections(usize),

    #[error("input ended before a corrected value was entered")]
    CorrectionAborted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_missing(missing: &[ParameterId]) -> String {
    missing
        .iter()
        .map(|id| format!("{} ({})", id.description(), id.flag()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
