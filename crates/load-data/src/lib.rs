//! Random test data and request header helpers for load-testing scenarios.
//!
//! Scenario journeys need fresh-looking payloads on every iteration: user
//! names, e-mail addresses, passwords and the occasional opaque string. This
//! crate produces them from any [`rand::Rng`], so callers choose between a
//! thread-local generator for real runs and a seeded one for reproducible
//! tests.
//!
//! # Overview
//!
//! - [`random_string`], [`random_email`] and [`random_user`] draw single values
//! - [`generate_users`] produces a deterministic batch from a named seed
//! - [`auth_headers`] and [`json_headers`] build the header sets journeys send
//!
//! # Example
//!
//! ```
//! use load_data::{auth_headers, generate_users};
//!
//! let users = generate_users(42, 3);
//! assert_eq!(users.len(), 3);
//! assert_eq!(users, generate_users(42, 3));
//!
//! let headers = auth_headers("abc.def.ghi").expect("token is valid");
//! assert_eq!(headers.get("Authorization"), Some("Bearer abc.def.ghi"));
//! ```

mod error;
mod generator;
mod headers;

pub use error::HeaderError;
pub use generator::{
    EMAIL_DOMAIN, PASSWORD_LEN, TestUser, generate_users, random_email, random_string,
    random_user,
};
pub use headers::{
    AUTHORIZATION, CONTENT_TYPE, JSON_CONTENT_TYPE, RequestHeaders, auth_headers, json_headers,
};
