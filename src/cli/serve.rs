//! Serve command implementation

use clap::Args;
use std::sync::Arc;

use crate::api::{ApiServer, AppState};
use crate::config::Config;
use crate::store::MemoryStore;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the configured port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut server_config = config.server.clone();
        if let Some(port) = self.port {
            server_config.port = port;
        }

        // Store handle is built once here and injected; services never
        // reach for a global connection.
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(
            store.clone(),
            store.clone(),
            store,
            &config.limits,
        ));

        ApiServer::new(state, server_config).run().await
    }
}
