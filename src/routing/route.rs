//! Path classification
//!
//! `Route::parse` is total: every path maps to exactly one variant, and any
//! path outside the fixed grammar is `Route::NotFound`.

use super::title::Title;

/// URL prefix for static assets
pub const STATIC_PREFIX: &str = "/public/";

/// Classified request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/create`
    CreateForm,
    /// `/store` (title comes from the form, not the path)
    StoreNew,
    View(Title),
    Edit(Title),
    Save(Title),
    Delete(Title),
    /// `/public/{rest}`, handed to the static file server
    Static(String),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        match path {
            "/" => return Self::List,
            "/create" => return Self::CreateForm,
            "/store" => return Self::StoreNew,
            _ => {}
        }

        if let Some(rest) = path.strip_prefix(STATIC_PREFIX) {
            return Self::Static(rest.to_string());
        }

        let Some((op, raw_title)) = path
            .strip_prefix('/')
            .and_then(|rest| rest.split_once('/'))
        else {
            return Self::NotFound;
        };

        // Decoded slashes and dots are rejected by the title grammar below
        let Ok(decoded) = urlencoding::decode(raw_title) else {
            return Self::NotFound;
        };
        let Ok(title) = Title::parse(&decoded) else {
            return Self::NotFound;
        };

        match op {
            "view" => Self::View(title),
            "edit" => Self::Edit(title),
            "save" => Self::Save(title),
            "delete" => Self::Delete(title),
            _ => Self::NotFound,
        }
    }

    /// Short operation name used in logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::CreateForm => "create",
            Self::StoreNew => "store",
            Self::View(_) => "view",
            Self::Edit(_) => "edit",
            Self::Save(_) => "save",
            Self::Delete(_) => "delete",
            Self::Static(_) => "static",
            Self::NotFound => "not_found",
        }
    }

    /// Whether the operation overwrites a page from form fields
    pub const fn writes_page(&self) -> bool {
        matches!(self, Self::StoreNew | Self::Save(_))
    }
}
