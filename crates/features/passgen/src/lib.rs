//! Password generation feature slice.
//!
//! Strategies implement [`PasswordGenerator`]; [`create_generator`] picks one by
//! [`GeneratorKind`]. Characters are drawn uniformly from the strategy's charset using
//! the operating system's random source.
//!
//! ```rust
//! use lockbox_passgen::{GeneratorKind, create_generator};
//!
//! let generator = create_generator(GeneratorKind::Special);
//! assert_eq!(generator.generate(16).chars().count(), 16);
//! ```
mod error;
mod generator;

pub use crate::error::{PassgenError, PassgenErrorExt};
pub use crate::generator::{
    ALPHANUMERIC, AlphanumericGenerator, PasswordGenerator, SPECIAL, SpecialCharGenerator,
    create_generator, generate_password, parse_kind,
};
pub use lockbox_domain::config::GeneratorKind;
