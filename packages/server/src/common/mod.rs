// Common types and utilities shared across the application

pub mod client_info;
pub mod utils;

pub use client_info::ClientInfo;
pub use utils::*;
