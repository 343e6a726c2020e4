// Portfolio backend - API Core
//
// This crate provides the backend for the portfolio site: phone verification
// via one-time passcodes, the rate-limited contact form relay and the unique
// visitor counter. Everything else on the site is static.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
