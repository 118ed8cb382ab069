//! Page rendering
//!
//! Handlers hand a view name plus data to a `Renderer`; the built-in
//! `HtmlRenderer` is constructed once at startup and shared read-only.

mod html;

pub use html::HtmlRenderer;

use crate::store::Page;
use std::fmt;
use thiserror::Error;

/// Named views the wiki renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Index,
    Create,
    View,
    Edit,
}

impl View {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Create => "create",
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Data passed to a view
#[derive(Debug, Clone, Copy)]
pub enum ViewData<'a> {
    None,
    Page(&'a Page),
    Pages(&'a [Page]),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("view '{view}' cannot render {data} data")]
    DataMismatch { view: View, data: &'static str },
}

/// Rendering capability consumed by the dispatcher
pub trait Renderer: Send + Sync {
    fn render(&self, view: View, data: ViewData<'_>) -> Result<String, RenderError>;
}

impl ViewData<'_> {
    const fn kind(&self) -> &'static str {
        match self {
            Self::None => "no",
            Self::Page(_) => "page",
            Self::Pages(_) => "page list",
        }
    }
}
