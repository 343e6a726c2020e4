//! Contact domain actions

mod submit_contact;

pub use submit_contact::submit_contact;
