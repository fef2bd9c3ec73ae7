use std::sync::Arc;

use tracing::info;

use crate::{
    config::Config,
    profile::ProfileStore,
    suggest::{OpenAiGenerator, TextGenerator},
    users::{InMemoryUserStore, NewUser, UserStore},
};

pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub profiles: ProfileStore,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();
        let generator = Arc::new(OpenAiGenerator::new(&config));

        Self::with_parts(config, generator).await
    }

    /// Assembles state around an injected generator so the pipeline can be
    /// exercised without the live provider.
    pub async fn with_parts(config: Config, generator: Arc<dyn TextGenerator>) -> Arc<Self> {
        let users = InMemoryUserStore::new();

        // Demo account used by the hosted frontend.
        users
            .create(NewUser {
                email: "test@example.com".to_string(),
                password: "password123".to_string(),
                full_name: None,
                plan: None,
            })
            .await
            .expect("Seeding demo account failed");

        info!("State initialized");

        Arc::new(Self {
            config,
            users: Arc::new(users),
            profiles: ProfileStore::new(),
            generator,
        })
    }
}
