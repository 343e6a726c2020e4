//! Kernel module - server infrastructure and dependencies.

pub mod clock;
pub mod deps;
pub mod stores;
pub mod test_dependencies;
pub mod timeout;
pub mod traits;

pub use clock::SystemClock;
pub use deps::{ConsoleEmailService, ConsoleSmsService, ResendAdapter, ServerDeps, TwilioAdapter};
pub use stores::*;
pub use test_dependencies::TestDependencies;
pub use timeout::with_timeout;
pub use traits::*;
