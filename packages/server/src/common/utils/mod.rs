pub mod content_hash;
pub mod html;
pub mod json;

pub use content_hash::*;
pub use html::*;
pub use json::*;
