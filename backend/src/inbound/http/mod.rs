//! HTTP inbound adapter exposing the mock REST endpoints.

pub mod auth;
pub mod delay;
pub mod envelope;
pub mod error;
pub mod faults;
pub mod health;
pub mod payload;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
