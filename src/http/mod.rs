//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from page logic.

pub mod cache;
pub mod form;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_400_response, build_404_response, build_413_response,
    build_415_response, build_500_response, build_html_response, build_redirect_response,
};
