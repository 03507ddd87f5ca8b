//! Constrained password generation.
//!
//! A [`RuleSet`] names character classes and the minimum number of characters
//! each must contribute; [`generate`] produces a password of a requested
//! length meeting every minimum, with all remaining positions distributed
//! uniformly across the classes. Every random choice goes through
//! [`UnbiasedRandom`], a rejection-sampling wrapper over a cryptographically
//! secure byte source, so no selection carries modulo bias. The result comes
//! back in a [`SecretBuffer`] that zeroizes its storage on drop.

mod generator;
mod random;
mod rules;
mod secret;

pub use generator::{generate, GenerateError};
pub use random::{RandomError, UnbiasedRandom};
pub use rules::{CharacterClass, Requirement, RuleError, RuleSet};
pub use secret::SecretBuffer;
