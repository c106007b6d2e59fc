use std::collections::BTreeMap;
use std::io::Write;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, ValueEnum};
use dhello::cs::security::parse_decimal;
use dhello::{
    run_exchange, CandidateParameters, Error, GeneratorCheck, ParameterId, PromptCorrector,
    ValidatorConfig,
};
use num_bigint::BigUint;
use tracing_subscriber::EnvFilter;

const ABOUT: &str = "\
This is a purely mathematical Diffie-Hellman key exchange demonstrator!
It is not valid for serious encryption applications!";

const AFTER_HELP: &str = "\
1. prime is a prime number
2. base is a primitive root modulo p and such that g < p
3. Alice's secret is a number < p
4. Bob's secret is a number < p

Invalid values are corrected interactively. Set RUST_LOG=debug to trace validation.";

#[derive(Parser, Debug)]
#[command(name = "dhello", version, about = ABOUT, after_help = AFTER_HELP)]
struct Cli {
    #[arg(short = 'p', value_name = "PRIME", value_parser = parse_value, help = "Prime modulus")]
    prime: Option<BigUint>,
    #[arg(short = 'g', value_name = "BASE", value_parser = parse_value, help = "Generator, a primitive root modulo p")]
    generator: Option<BigUint>,
    #[arg(short = 'a', value_name = "SECRET", value_parser = parse_value, help = "Alice's secret")]
    secret_a: Option<BigUint>,
    #[arg(short = 'b', value_name = "SECRET", value_parser = parse_value, help = "Bob's secret")]
    secret_b: Option<BigUint>,
    #[arg(long, value_enum, default_value_t = CheckArg::Euler, help = "How the generator is verified")]
    generator_check: CheckArg,
    #[arg(long, help = "Corrections accepted before giving up (unlimited when omitted)")]
    max_corrections: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CheckArg {
    /// g^((p-1)/2) ≡ -1 (mod p)
    Euler,
    /// g has order p - 1
    FullOrder,
}

impl From<CheckArg> for GeneratorCheck {
    fn from(arg: CheckArg) -> Self {
        match arg {
            CheckArg::Euler => GeneratorCheck::Euler,
            CheckArg::FullOrder => GeneratorCheck::FullOrder,
        }
    }
}

fn parse_value(s: &str) -> Result<BigUint, String> {
    parse_decimal(s).ok_or_else(|| format!("'{}' is not a non-negative integer", s))
}

impl Cli {
    fn parameters(&self) -> BTreeMap<ParameterId, BigUint> {
        [
            (ParameterId::Prime, &self.prime),
            (ParameterId::Generator, &self.generator),
            (ParameterId::SecretA, &self.secret_a),
            (ParameterId::SecretB, &self.secret_b),
        ]
        .into_iter()
        .filter_map(|(id, value)| value.clone().map(|v| (id, v)))
        .collect()
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage<W: Write>(out: &mut W) -> dhello::Result<()> {
    Cli::command().write_long_help(out)?;
    Ok(())
}

fn main() -> ExitCode {
    if std::env::args_os().len() == 1 {
        return match print_usage(&mut std::io::stdout().lock()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("\n   {}", err);
                ExitCode::FAILURE
            }
        };
    }

    let cli = Cli::parse();
    init_logging();

    let config = ValidatorConfig {
        generator_check: cli.generator_check.into(),
        max_corrections: cli.max_corrections,
    };
    let outcome = CandidateParameters::from_map(cli.parameters()).and_then(|candidate| {
        let mut corrector = PromptCorrector::stdio();
        run_exchange(candidate, &mut corrector, &config)
    });

    match outcome {
        Ok(result) => {
            println!("\n{}", result);
            ExitCode::SUCCESS
        }
        Err(Error::MissingParameters(missing)) => {
            eprintln!();
            for id in missing {
                eprintln!("   You forgot to define {}", id);
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("\n   {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_usage_lists_items_flush_left() {
        let mut out = Vec::new();
        print_usage(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        for item in [
            "\n1. prime is a prime number",
            "\n2. base is a primitive root",
            "\n3. Alice's secret",
            "\n4. Bob's secret",
        ] {
            assert!(text.contains(item), "missing {:?} in {}", item, text);
        }
    }

    #[test]
    fn test_usage_write_failure_is_reported() {
        assert!(matches!(print_usage(&mut ClosedPipe), Err(Error::Io(_))));
    }

    #[test]
    fn test_max_corrections_unlimited_when_omitted() {
        let cli = Cli::try_parse_from(["dhello", "-p", "23", "-g", "5", "-a", "6", "-b", "15"])
            .unwrap();
        assert_eq!(cli.max_corrections, None);
        assert_eq!(cli.parameters().len(), 4);

        let cli = Cli::try_parse_from(["dhello", "-p", "23", "--max-corrections", "3"]).unwrap();
        assert_eq!(cli.max_corrections, Some(3));
    }
}
