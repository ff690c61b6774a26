use std::{path::PathBuf, time::Duration};

use sayho_connect::{ApiClientConfig, DEFAULT_API_URL};

pub struct Config {
    pub api_url: String,
    pub token_path: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_url = std::env::var("SAYHO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let token_path = std::env::var("SAYHO_TOKEN_PATH")
            .unwrap_or_else(|_| "./.sayho/session.json".into())
            .into();
        let timeout_ms: u64 = std::env::var("SAYHO_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        Self {
            api_url,
            token_path,
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api_url.clone(),
            timeout: self.request_timeout,
        }
    }
}
