use std::sync::Arc;

use super::{
    config::Config,
    database::{ContactStore, SupabaseStore},
};

pub struct State {
    pub config: Config,
    pub store: Arc<dyn ContactStore>,
}

impl State {
    pub fn new() -> Arc<Self> {
        let config = Config::load();
        let store = Arc::new(SupabaseStore::new(&config.supabase_url, &config.service_key));

        Arc::new(Self { config, store })
    }

    pub fn with_store(config: Config, store: Arc<dyn ContactStore>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
