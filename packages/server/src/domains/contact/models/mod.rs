pub mod contact_submission;

pub use contact_submission::*;
