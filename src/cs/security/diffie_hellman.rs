//! DISCLAIMER: This library is a toy example of Diffie-Hellman Key Exchange in pure Rust.
//! It is *EXCLUSIVELY* for demonstration and educational purposes.
//! Absolutely DO NOT use it for real cryptographic or security-sensitive operations.
//! It has no secure randomness, no safe-prime requirements and no timing-attack resistance.
//!
//! If you need Diffie-Hellman or any cryptographic operations in production, please use a
//! vetted, well-reviewed cryptography library.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info};
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::math::number_theory::{is_generator, is_prime, is_primitive_root, mod_pow};

/// The four parameters every exchange needs, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterId {
    Prime,
    Generator,
    SecretA,
    SecretB,
}

impl ParameterId {
    pub const ALL: [ParameterId; 4] = [
        ParameterId::Prime,
        ParameterId::Generator,
        ParameterId::SecretA,
        ParameterId::SecretB,
    ];

    /// Command-line flag naming this parameter.
    pub fn flag(&self) -> &'static str {
        match self {
            ParameterId::Prime => "-p",
            ParameterId::Generator => "-g",
            ParameterId::SecretA => "-a",
            ParameterId::SecretB => "-b",
        }
    }

    /// Human-readable name used in prompts and error messages.
    pub fn description(&self) -> &'static str {
        match self {
            ParameterId::Prime => "prime",
            ParameterId::Generator => "base",
            ParameterId::SecretA => "Alice's secret",
            ParameterId::SecretB => "Bob's secret",
        }
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Which test a generator has to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorCheck {
    /// `g^((p-1)/2) ≡ -1 (mod p)`. Accepts every quadratic non-residue.
    #[default]
    Euler,
    /// `g` has multiplicative order exactly `p - 1`.
    FullOrder,
}

impl GeneratorCheck {
    pub fn accepts(&self, g: &BigUint, p: &BigUint) -> bool {
        match self {
            GeneratorCheck::Euler => is_primitive_root(g, p),
            GeneratorCheck::FullOrder => is_generator(g, p),
        }
    }
}

/// Configuration for validating a candidate parameter set.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Predicate the generator must satisfy.
    pub generator_check: GeneratorCheck,
    /// How many corrected values a single run accepts before giving up. `None` keeps asking
    /// until the set is valid.
    pub max_corrections: Option<usize>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            generator_check: GeneratorCheck::default(),
            max_corrections: None,
        }
    }
}

/// A failed precondition on one parameter. The validator hands it to a
/// [`ParameterCorrector`] and never returns it to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    NotPrime {
        prime: BigUint,
    },
    NotPrimitiveRoot {
        generator: BigUint,
        prime: BigUint,
    },
    OutOfRange {
        parameter: ParameterId,
        value: BigUint,
        prime: BigUint,
    },
}

impl Violation {
    /// The parameter whose value has to be replaced.
    pub fn parameter(&self) -> ParameterId {
        match self {
            Violation::NotPrime { .. } => ParameterId::Prime,
            Violation::NotPrimitiveRoot { .. } => ParameterId::Generator,
            Violation::OutOfRange { parameter, .. } => *parameter,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NotPrime { prime } => write!(
                f,
                "{} is not a prime number, enter a new choice for -p which is prime",
                prime
            ),
            Violation::NotPrimitiveRoot { generator, prime } => write!(
                f,
                "{} is not a primitive root of {}, enter a new choice for -g",
                generator, prime
            ),
            Violation::OutOfRange {
                parameter,
                value,
                prime,
            } => write!(
                f,
                "{} should be smaller than {}, enter a new choice for {}",
                value, prime, parameter
            ),
        }
    }
}

/// Supplies a replacement value when a parameter fails validation.
///
/// The interactive implementation is [`PromptCorrector`](super::PromptCorrector); tests
/// supply canned values.
pub trait ParameterCorrector {
    /// Returns the value to substitute for `violation.parameter()`.
    fn correct(&mut self, violation: &Violation) -> Result<BigUint>;
}

impl<F> ParameterCorrector for F
where
    F: FnMut(&Violation) -> Result<BigUint>,
{
    fn correct(&mut self, violation: &Violation) -> Result<BigUint> {
        self(violation)
    }
}

/// A complete but not yet validated parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateParameters {
    pub prime: BigUint,
    pub generator: BigUint,
    pub secret_a: BigUint,
    pub secret_b: BigUint,
}

impl CandidateParameters {
    pub fn new(prime: BigUint, generator: BigUint, secret_a: BigUint, secret_b: BigUint) -> Self {
        Self {
            prime,
            generator,
            secret_a,
            secret_b,
        }
    }

    /// Builds a candidate from parsed arguments.
    ///
    /// # Errors
    /// [`Error::MissingParameters`] listing every absent identifier in `-p -g -a -b` order.
    pub fn from_map(mut values: BTreeMap<ParameterId, BigUint>) -> Result<Self> {
        let missing: Vec<ParameterId> = ParameterId::ALL
            .into_iter()
            .filter(|id| !values.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingParameters(missing));
        }

        let mut take = |id: ParameterId| values.remove(&id).unwrap_or_default();
        Ok(Self {
            prime: take(ParameterId::Prime),
            generator: take(ParameterId::Generator),
            secret_a: take(ParameterId::SecretA),
            secret_b: take(ParameterId::SecretB),
        })
    }

    pub fn get(&self, id: ParameterId) -> &BigUint {
        match id {
            ParameterId::Prime => &self.prime,
            ParameterId::Generator => &self.generator,
            ParameterId::SecretA => &self.secret_a,
            ParameterId::SecretB => &self.secret_b,
        }
    }

    fn set(&mut self, id: ParameterId, value: BigUint) {
        match id {
            ParameterId::Prime => self.prime = value,
            ParameterId::Generator => self.generator = value,
            ParameterId::SecretA => self.secret_a = value,
            ParameterId::SecretB => self.secret_b = value,
        }
    }

    /// First failed precondition, checked in protocol order.
    pub fn first_violation(&self, check: GeneratorCheck) -> Option<Violation> {
        debug!("checking primality of {}", self.prime);
        if !is_prime(&self.prime) {
            return Some(Violation::NotPrime {
                prime: self.prime.clone(),
            });
        }

        debug!("checking generator {} against {}", self.generator, self.prime);
        if !check.accepts(&self.generator, &self.prime) {
            return Some(Violation::NotPrimitiveRoot {
                generator: self.generator.clone(),
                prime: self.prime.clone(),
            });
        }

        // Both generator checks already reject g >= p, so only the secrets remain
        for id in [ParameterId::SecretA, ParameterId::SecretB] {
            let value = self.get(id);
            if *value >= self.prime {
                return Some(Violation::OutOfRange {
                    parameter: id,
                    value: value.clone(),
                    prime: self.prime.clone(),
                });
            }
        }
        None
    }

    /// Runs the validation state machine.
    ///
    /// On each violation the corrector is asked for a replacement, which is substituted and
    /// the whole set checked again from the primality step.
    ///
    /// # Errors
    /// - [`Error::TooManyCorrections`] once a configured `config.max_corrections` limit of
    ///   replacements was applied and the set is still invalid.
    /// - Any error the corrector returns.
    pub fn validate(
        mut self,
        corrector: &mut dyn ParameterCorrector,
        config: &ValidatorConfig,
    ) -> Result<ProtocolParameters> {
        let mut corrections = 0;
        while let Some(violation) = self.first_violation(config.generator_check) {
            if config.max_corrections == Some(corrections) {
                return Err(Error::TooManyCorrections(corrections));
            }
            debug!("{}", violation);
            let parameter = violation.parameter();
            let value = corrector.correct(&violation)?;
            info!("{} corrected to {}", parameter, value);
            self.set(parameter, value);
            corrections += 1;
        }

        Ok(ProtocolParameters {
            p: self.prime,
            g: self.generator,
            secret_a: self.secret_a,
            secret_b: self.secret_b,
        })
    }
}

/// A validated parameter set: `p` is prime, `g` passed the generator check and
/// `g`, `secret_a`, `secret_b` are all below `p`.
///
/// Only [`CandidateParameters::validate`] creates one.
///
/// *This is for demonstration only. DO NOT use in real systems.*
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolParameters {
    p: BigUint,
    g: BigUint,
    secret_a: BigUint,
    secret_b: BigUint,
}

/// One party's keys:
/// - `private_key`: the secret exponent.
/// - `public_key`: `g^private_key mod p`.
///
/// *This is for demonstration only. DO NOT use in real systems.*
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// The prime modulus, same as in `ProtocolParameters`.
    pub p: BigUint,
    /// The private key exponent.
    pub private_key: BigUint,
    /// The corresponding public value.
    pub public_key: BigUint,
}

impl ProtocolParameters {
    pub fn prime(&self) -> &BigUint {
        &self.p
    }

    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    pub fn secret_a(&self) -> &BigUint {
        &self.secret_a
    }

    pub fn secret_b(&self) -> &BigUint {
        &self.secret_b
    }

    /// Key pair for a party holding `secret`.
    pub fn keypair(&self, secret: &BigUint) -> KeyPair {
        KeyPair {
            p: self.p.clone(),
            private_key: secret.clone(),
            public_key: mod_pow(&self.g, secret, &self.p),
        }
    }

    /// Both sides of the exchange.
    pub fn exchange(&self) -> ExchangeResult {
        let alice = self.keypair(&self.secret_a);
        let bob = self.keypair(&self.secret_b);
        debug!("Alice's public key {}", alice.public_key);
        debug!("Bob's public key {}", bob.public_key);

        let shared_secret_a = alice.compute_shared_secret(&bob.public_key);
        let shared_secret_b = bob.compute_shared_secret(&alice.public_key);
        let agree = shared_secret_a == shared_secret_b;
        info!("exchange over p = {} complete, secrets agree: {}", self.p, agree);

        ExchangeResult {
            public_a: alice.public_key,
            public_b: bob.public_key,
            shared_secret_a,
            shared_secret_b,
            agree,
        }
    }
}

impl KeyPair {
    /// Given another party's public key `other_pub`, compute the shared secret:
    ///   `S = other_pub^private_key mod p`.
    pub fn compute_shared_secret(&self, other_pub: &BigUint) -> BigUint {
        mod_pow(other_pub, &self.private_key, &self.p)
    }
}

/// Outcome of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeResult {
    pub public_a: BigUint,
    pub public_b: BigUint,
    pub shared_secret_a: BigUint,
    pub shared_secret_b: BigUint,
    pub agree: bool,
}

impl fmt::Display for ExchangeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alice's public key is {},", self.public_a)?;
        writeln!(f, "Bob's public key is {},", self.public_b)?;
        write!(f, "shared secrets are equal: {}", self.agree)
    }
}

/// Validates `candidate` (asking `corrector` for replacements) and runs the exchange.
pub fn run_exchange(
    candidate: CandidateParameters,
    corrector: &mut dyn ParameterCorrector,
    config: &ValidatorConfig,
) -> Result<ExchangeResult> {
    let params = candidate.validate(corrector, config)?;
    Ok(params.exchange())
}
