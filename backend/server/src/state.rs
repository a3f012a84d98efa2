use std::sync::Arc;

use catalog::CatalogStore;

use super::{
    config::Config,
    notify::Dispatcher,
    session::{ConfigCredentials, SessionStore},
};

pub struct AppState {
    pub config: Config,
    pub store: CatalogStore,
    pub dispatcher: Dispatcher,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();
        let store = CatalogStore::from_path(&config.data_path).expect("Dataset misconfigured!");

        Self::from_parts(config, store)
    }

    /// Assembly from already-loaded parts, used directly by the tests.
    pub fn from_parts(config: Config, store: CatalogStore) -> Arc<Self> {
        let dispatcher = Dispatcher::new(config.email.clone(), config.whatsapp.clone());
        let sessions = SessionStore::new(Box::new(ConfigCredentials::new(&config.admin)));

        Arc::new(Self {
            config,
            store,
            dispatcher,
            sessions,
        })
    }
}
