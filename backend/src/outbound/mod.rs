//! Outbound adapters implementing domain ports.
//!
//! - **randomness**: thread-local RNG behind the `Randomness` port
//! - **jwt**: HS256 signing behind the `TokenService` port
//!
//! Adapters translate between domain types and library representations and
//! carry no endpoint rules of their own.

pub mod jwt;
pub mod randomness;

pub use jwt::JwtTokenService;
pub use randomness::ThreadRandomness;
