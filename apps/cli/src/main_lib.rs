use std::sync::Arc;

use sayho_connect::{ApiClient, SessionContext, SessionManager};
use sayho_core::events::{SessionEvent, SessionEventSink};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::Config, secrets::build_token_store};

pub struct AppState {
    pub client: Arc<ApiClient>,
    pub session: SessionManager,
}

/// Tells the user to sign in again once the backend rejects the token.
pub struct TerminalSessionSink;

impl SessionEventSink for TerminalSessionSink {
    fn emit(&self, event: SessionEvent) {
        match event {
            SessionEvent::Expired { user_id } => {
                tracing::warn!(?user_id, "Session expired");
                eprintln!("Your session has expired. Run `sayho login` to sign in again.");
            }
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("SAYHO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let store = Arc::new(build_token_store(config.token_path.clone()));
    tracing::debug!("Token file in use: {}", config.token_path.display());

    let context = Arc::new(SessionContext::new(store));
    context.register_listener(Arc::new(TerminalSessionSink));

    let client = Arc::new(ApiClient::new(&config.client_config(), context.clone())?);
    let session = SessionManager::new(client.clone(), context);

    Ok(AppState { client, session })
}
