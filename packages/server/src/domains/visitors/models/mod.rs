pub mod site_visitor;

pub use site_visitor::*;
