use hashgate_core::{Config, StreamResolver};

/// Shared application state
pub struct AppState {
    config: Config,
    resolver: StreamResolver,
}

impl AppState {
    pub fn new(config: Config, resolver: StreamResolver) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &StreamResolver {
        &self.resolver
    }
}
