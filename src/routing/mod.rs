//! Routing module
//!
//! Maps request paths onto wiki operations and validates page titles.

pub mod route;
pub mod title;

pub use route::{Route, STATIC_PREFIX};
pub use title::Title;
