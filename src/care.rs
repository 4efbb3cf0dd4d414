//! Caregiver notification client
//!
//! Fires a notification to the caregiver service when a CARE intent is
//! classified. Delivery is best-effort: any failure is logged and reported
//! as not-delivered, never propagated.

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::CareConfig;
use crate::domain::TaskContext;

/// Client for the caregiver notification service
pub struct CareClient {
    server_url: String,
    http: Client,
}

impl CareClient {
    /// Create a client from configuration
    ///
    /// Returns None (with a warning) if the HTTP client cannot be built;
    /// caregiver notification then degrades to not-configured.
    pub fn from_config(config: &CareConfig) -> Option<Self> {
        debug!(url = %config.url, "CareClient::from_config: called");
        match Client::builder().timeout(config.timeout()).build() {
            Ok(http) => Some(Self {
                server_url: config.url.trim_end_matches('/').to_string(),
                http,
            }),
            Err(e) => {
                warn!(error = %e, "Failed to build caregiver HTTP client, notifications disabled");
                None
            }
        }
    }

    /// Notify the caregiver service about a CARE classification
    ///
    /// Returns true only on a 2xx reply.
    pub async fn notify(&self, user_input: &str, context: Option<&TaskContext>) -> bool {
        let url = format!("{}/caregiver/notify", self.server_url);
        debug!(%url, "notify: called");

        let body = serde_json::json!({
            "input": user_input,
            "task": context.map(|ctx| ctx.task.clone()),
        });

        match self.http.post(&url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                info!("notify: caregiver notified");
                true
            }
            Ok(response) => {
                warn!(status = response.status().as_u16(), "notify: caregiver service rejected notification");
                false
            }
            Err(e) => {
                warn!(error = %e, "notify: failed to reach caregiver service");
                false
            }
        }
    }
}
