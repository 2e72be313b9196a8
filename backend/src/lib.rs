//! Stateless mock REST API used as a target for load-testing exercises.
//!
//! Handlers return canned or randomised JSON, sleep on request, and inject
//! failures at fixed probabilities. Nothing is persisted between requests.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use domain::TraceId;
pub use middleware::Trace;
