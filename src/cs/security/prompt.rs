//! Line-oriented operator prompts for correcting invalid exchange parameters.

use std::io::{self, BufRead, StdinLock, StdoutLock, Write};

use log::debug;
use num_bigint::BigUint;

use super::diffie_hellman::{ParameterCorrector, Violation};
use crate::error::{Error, Result};

/// Asks the operator for each corrected value on `output` and reads it from `input`.
///
/// Input that is not a plain decimal number, including bytes that are not UTF-8, is rejected
/// and the prompt repeated. End of input
/// aborts the run with [`Error::CorrectionAborted`].
pub struct PromptCorrector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptCorrector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl PromptCorrector<StdinLock<'static>, StdoutLock<'static>> {
    /// Prompts on the process' stdout and reads answers from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout().lock())
    }
}

/// Parses a plain run of ASCII digits. Signs, separators and whitespace are rejected.
pub fn parse_decimal(line: &str) -> Option<BigUint> {
    if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(line.as_bytes(), 10)
}

impl<R: BufRead, W: Write> ParameterCorrector for PromptCorrector<R, W> {
    fn correct(&mut self, violation: &Violation) -> Result<BigUint> {
        write!(self.output, "\n   {}: ", violation)?;
        loop {
            self.output.flush()?;

            let mut raw = Vec::new();
            if self.input.read_until(b'\n', &mut raw)? == 0 {
                return Err(Error::CorrectionAborted);
            }
            let line = String::from_utf8_lossy(&raw);
            let answer = line.trim();
            if let Some(value) = parse_decimal(answer) {
                return Ok(value);
            }

            debug!("rejected correction input {:?}", answer);
            write!(
                self.output,
                "   '{}' is not a non-negative integer, enter a new choice for {}: ",
                answer,
                violation.parameter()
            )?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::security::diffie_hellman::ParameterId;
    use std::io::Cursor;

    fn prompt(input: &str) -> PromptCorrector<Cursor<Vec<u8>>, Vec<u8>> {
        PromptCorrector::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn not_prime() -> Violation {
        Violation::NotPrime {
            prime: BigUint::from(21u32),
        }
    }

    #[test]
    fn test_reads_corrected_value() {
        let mut corrector = prompt("23\n");
        let value = corrector.correct(&not_prime()).unwrap();
        assert_eq!(value, BigUint::from(23u32));

        let (_, output) = corrector.into_inner();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "\n   21 is not a prime number, enter a new choice for -p which is prime: "
        );
    }

    #[test]
    fn test_reprompts_on_garbage() {
        let mut corrector = prompt("abc\n-5\n\n  29  \n");
        let violation = Violation::OutOfRange {
            parameter: ParameterId::SecretB,
            value: BigUint::from(40u32),
            prime: BigUint::from(23u32),
        };
        assert_eq!(corrector.correct(&violation).unwrap(), BigUint::from(29u32));

        let (_, output) = corrector.into_inner();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("'abc' is not a non-negative integer"));
        assert!(text.contains("'-5' is not a non-negative integer"));
        assert_eq!(text.matches("enter a new choice for Bob's secret").count(), 4);
    }

    #[test]
    fn test_reprompts_on_invalid_utf8() {
        let mut corrector =
            PromptCorrector::new(Cursor::new(b"\xff\xfe\n23\n".to_vec()), Vec::new());
        assert_eq!(corrector.correct(&not_prime()).unwrap(), BigUint::from(23u32));

        let (_, output) = corrector.into_inner();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("is not a non-negative integer, enter a new choice for prime"));
    }

    #[test]
    fn test_end_of_input_aborts() {
        let mut corrector = prompt("");
        assert!(matches!(
            corrector.correct(&not_prime()),
            Err(Error::CorrectionAborted)
        ));

        let mut corrector = prompt("x\n");
        assert!(matches!(
            corrector.correct(&not_prime()),
            Err(Error::CorrectionAborted)
        ));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0"), Some(BigUint::from(0u32)));
        assert_eq!(parse_decimal("0023"), Some(BigUint::from(23u32)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("+5"), None);
        assert_eq!(parse_decimal("1_000"), None);
        assert_eq!(parse_decimal(" 7"), None);
    }

    #[test]
    fn test_large_values_parse() {
        let mut corrector = prompt("340282366920938463463374607431768211507\n");
        let value = corrector.correct(&not_prime()).unwrap();
        assert_eq!(value.to_string(), "340282366920938463463374607431768211507");
    }
}
