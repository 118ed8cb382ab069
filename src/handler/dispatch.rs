//! Route dispatch
//!
//! Composes a classified `Route` with `PageStore` calls and a
//! render-or-redirect decision. Runs synchronously; the HTTP layer moves it
//! onto a blocking thread.

use crate::http::form::Form;
use crate::render::{Renderer, View, ViewData};
use crate::routing::{Route, Title};
use crate::store::{Page, PageStore};

/// Result of dispatching one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 200 with a rendered view
    Render { view: View, html: String },
    /// 302 to the given location
    Redirect(String),
    /// 404
    NotFound,
    /// 500; the message is for the error log, not the client
    InternalError(String),
}

pub struct Dispatcher {
    store: PageStore,
    renderer: Box<dyn Renderer>,
}

impl Dispatcher {
    pub fn new(store: PageStore, renderer: Box<dyn Renderer>) -> Self {
        Self { store, renderer }
    }

    pub const fn store(&self) -> &PageStore {
        &self.store
    }

    pub fn dispatch(&self, route: &Route, form: &Form) -> Outcome {
        match route {
            Route::List => self.list(),
            Route::CreateForm => self.render(View::Create, ViewData::None),
            Route::StoreNew => self.store_new(form),
            Route::View(title) => self.view(title),
            Route::Edit(title) => self.edit(title),
            Route::Save(title) => self.write(title.clone(), form),
            Route::Delete(title) => self.delete(title),
            // Static assets never reach the dispatcher
            Route::Static(_) | Route::NotFound => Outcome::NotFound,
        }
    }

    fn list(&self) -> Outcome {
        match self.store.list_all() {
            Ok(pages) => self.render(View::Index, ViewData::Pages(&pages)),
            Err(e) => Outcome::InternalError(format!("failed to list pages: {e}")),
        }
    }

    fn store_new(&self, form: &Form) -> Outcome {
        // An invalid title surfaces as not-found, same as a bad path
        let Ok(title) = Title::parse(form.get_str("title").unwrap_or_default()) else {
            return Outcome::NotFound;
        };
        self.write(title, form)
    }

    fn view(&self, title: &Title) -> Outcome {
        match self.store.load(title) {
            Ok(page) => self.render(View::View, ViewData::Page(&page)),
            Err(e) if e.is_not_found() => Outcome::Redirect(edit_location(title)),
            Err(e) => Outcome::InternalError(e.to_string()),
        }
    }

    fn edit(&self, title: &Title) -> Outcome {
        let page = match self.store.load(title) {
            Ok(page) => page,
            Err(e) if e.is_not_found() => Page::empty(title.clone()),
            Err(e) => return Outcome::InternalError(e.to_string()),
        };
        self.render(View::Edit, ViewData::Page(&page))
    }

    fn delete(&self, title: &Title) -> Outcome {
        // Load first so deleting a missing page is reported, not ignored
        if let Err(e) = self.store.load(title) {
            return Outcome::InternalError(e.to_string());
        }
        match self.store.delete(title) {
            Ok(()) => Outcome::Redirect("/".to_string()),
            Err(e) => Outcome::InternalError(e.to_string()),
        }
    }

    fn write(&self, title: Title, form: &Form) -> Outcome {
        let body = form.get("body").map(<[u8]>::to_vec).unwrap_or_default();
        let page = Page::new(title, body);
        match self.store.save(&page) {
            Ok(()) => Outcome::Redirect(view_location(&page.title)),
            Err(e) => Outcome::InternalError(e.to_string()),
        }
    }

    fn render(&self, view: View, data: ViewData<'_>) -> Outcome {
        match self.renderer.render(view, data) {
            Ok(html) => Outcome::Render { view, html },
            Err(e) => Outcome::InternalError(e.to_string()),
        }
    }
}

pub fn view_location(title: &Title) -> String {
    format!("/view/{}", title.url_encoded())
}

pub fn edit_location(title: &Title) -> String {
    format!("/edit/{}", title.url_encoded())
}
