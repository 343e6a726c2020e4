// HTTP routes
pub mod contact;
pub mod health;
pub mod otp;
pub mod visitors;

pub use contact::*;
pub use health::*;
pub use otp::*;
pub use visitors::*;
