pub mod otp_entry;

pub use otp_entry::*;
