use std::sync::Arc;

use axum::Router;
use roboadvisor_core::audit::{AuditSink, TracingAuditSink};
use roboadvisor_core::config::{AppConfig, ConfigError, LoadOptions};
use roboadvisor_core::TurnDispatcher;
use thiserror::Error;
use tracing::info;

use crate::{fulfillment, health};

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: Arc<TurnDispatcher>,
    pub audit_sink: Arc<dyn AuditSink>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no intent handlers are registered")]
    NoIntentHandlers,
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let dispatcher = TurnDispatcher::from_config(&config.dialog);
    if dispatcher.supported_intents().is_empty() {
        return Err(BootstrapError::NoIntentHandlers);
    }
    info!(
        event_name = "system.bootstrap.dispatcher_ready",
        correlation_id = "bootstrap",
        intents = ?dispatcher.supported_intents(),
        "turn dispatcher initialized"
    );

    Ok(Application {
        config,
        dispatcher: Arc::new(dispatcher),
        audit_sink: Arc::new(TracingAuditSink),
    })
}

impl Application {
    pub fn router(&self) -> Router {
        Router::new()
            .merge(health::router(self.dispatcher.clone()))
            .merge(fulfillment::router(self.dispatcher.clone(), self.audit_sink.clone()))
    }
}
