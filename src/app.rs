use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use ticketgate_api::AppState;
use ticketgate_core::{AppConfig, RuleTable};
use ticketgate_pipeline::{
    ActivityService, AutomationRegistry, IncidentService, RemoteTicketStore, ResolutionService,
    StubMailer, TicketStore,
};
use ticketgate_remote::{HttpTransport, TableClient};

/// Wires the transport, pipeline services and HTTP state together from one
/// loaded configuration.
pub struct Application {
    config: AppConfig,
    state: AppState,
}

impl Application {
    pub fn new(config: AppConfig) -> Result<Self> {
        let rules = match config.rules_path.as_deref() {
            Some(path) => {
                info!(path, "loading classification rules from file");
                RuleTable::from_toml_file(path).context("failed to load classification rules")?
            }
            None => RuleTable::with_defaults(),
        };
        let rules = Arc::new(rules);

        let transport = Arc::new(HttpTransport::new(&config.remote));
        let client = TableClient::new(transport, config.retry.clone());
        let store: Arc<dyn TicketStore> = Arc::new(RemoteTicketStore::new(
            client,
            config.remote.incident_table.clone(),
        ));

        let mailer = Arc::new(StubMailer);
        let automations = AutomationRegistry::with_defaults(store.clone(), mailer);

        let state = AppState {
            incidents: Arc::new(IncidentService::new(
                store.clone(),
                rules,
                automations,
            )),
            resolution: Arc::new(ResolutionService::new(
                store.clone(),
                config.resolution.clone(),
            )),
            activity: Arc::new(ActivityService::new(store)),
        };

        Ok(Self { config, state })
    }

    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        info!(
            bind = %self.config.server.bind_address,
            remote = %self.config.remote.base_url,
            "gateway configured"
        );
        ticketgate_api::serve(&self.config.server.bind_address, self.state, shutdown)
            .await
            .context("API server failed")
    }
}
