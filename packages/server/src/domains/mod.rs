// Business domains
pub mod contact;
pub mod otp;
pub mod visitors;
