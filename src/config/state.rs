// Application state module
// Immutable per-process state shared by every request

use std::path::PathBuf;

use super::types::Config;
use crate::handler::Dispatcher;
use crate::render::HtmlRenderer;
use crate::store::PageStore;

/// Application state, built once at startup and never mutated
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let store = PageStore::new(&config.storage.data_dir, config.storage.placeholder.clone());
        let renderer = HtmlRenderer::new(config.http.server_name.clone());

        Self {
            config: config.clone(),
            dispatcher: Dispatcher::new(store, Box::new(renderer)),
            public_dir: PathBuf::from(&config.assets.public_dir),
        }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
