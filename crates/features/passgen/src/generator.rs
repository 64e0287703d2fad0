use crate::error::PassgenError;
use lockbox_domain::config::GeneratorKind;
use lockbox_domain::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use rand::Rng;
use rand::rngs::OsRng;
use std::fmt::Debug;

pub const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
pub const SPECIAL: &[u8] = b"!@#$%^&*()-_=+";

/// A password-generation strategy.
pub trait PasswordGenerator: Send + Sync + Debug {
    /// Returns `length` random characters from the strategy's charset.
    fn generate(&self, length: usize) -> String;

    fn kind(&self) -> GeneratorKind;
}

/// Letters and digits only.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlphanumericGenerator;

/// Letters, digits and `!@#$%^&*()-_=+`.
#[derive(Debug, Clone)]
pub struct SpecialCharGenerator {
    charset: Vec<u8>,
}

impl Default for SpecialCharGenerator {
    fn default() -> Self {
        Self { charset: [ALPHANUMERIC, SPECIAL].concat() }
    }
}

impl PasswordGenerator for AlphanumericGenerator {
    fn generate(&self, length: usize) -> String {
        sample(ALPHANUMERIC, length)
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Alphanumeric
    }
}

impl PasswordGenerator for SpecialCharGenerator {
    fn generate(&self, length: usize) -> String {
        sample(&self.charset, length)
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Special
    }
}

fn sample(charset: &[u8], length: usize) -> String {
    let mut rng = OsRng;
    (0..length).map(|_| char::from(charset[rng.gen_range(0..charset.len())])).collect()
}

#[must_use]
pub fn create_generator(kind: GeneratorKind) -> Box<dyn PasswordGenerator> {
    match kind {
        GeneratorKind::Alphanumeric => Box::new(AlphanumericGenerator),
        GeneratorKind::Special => Box::new(SpecialCharGenerator::default()),
    }
}

/// Parses a generator name, ignoring case.
///
/// # Errors
/// Returns [`PassgenError::UnknownGenerator`] for anything other than
/// `alphanumeric` or `special`.
pub fn parse_kind(name: &str) -> Result<GeneratorKind, PassgenError> {
    name.parse::<GeneratorKind>()
        .map_err(|_| PassgenError::UnknownGenerator { name: name.to_owned(), context: None })
}

/// Generates a password of `length` characters with the strategy `kind`.
///
/// # Errors
/// * [`PassgenError::TooShort`] when `length` is below [`MIN_PASSWORD_LENGTH`].
/// * [`PassgenError::TooLong`] when `length` exceeds [`MAX_PASSWORD_LENGTH`].
pub fn generate_password(kind: GeneratorKind, length: u32) -> Result<String, PassgenError> {
    if length < MIN_PASSWORD_LENGTH {
        return Err(PassgenError::TooShort { length, minimum: MIN_PASSWORD_LENGTH, context: None });
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(PassgenError::TooLong { length, maximum: MAX_PASSWORD_LENGTH, context: None });
    }
    tracing::debug!(%kind, length, "Generating password");
    Ok(create_generator(kind).generate(length as usize))
}
