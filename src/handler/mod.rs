//! Request handling module
//!
//! - `router`: HTTP entry point, body/form extraction and response mapping
//! - `dispatch`: page operations over the store and renderer
//! - `static_files`: assets under `/public/`

pub mod dispatch;
pub mod router;
pub mod static_files;

pub use dispatch::{Dispatcher, Outcome};
pub use router::handle_request;
