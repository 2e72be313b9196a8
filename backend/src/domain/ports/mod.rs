//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Handlers never touch a random number generator or a signing key directly;
//! they go through these traits so tests can substitute deterministic
//! doubles.

mod randomness;
mod token_service;

pub use randomness::{FixedRandomness, Randomness};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::TokenService;
