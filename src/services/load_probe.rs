//! Load probe: detects page loads that will fail.
//!
//! The platform webviews report load completion but not failure, so every
//! top-level http(s) navigation is checked with a `HEAD` request in the
//! background. Any HTTP response, whatever its status, means the server is
//! reachable and the engine will render something. Only transport errors
//! (DNS, refused connection, TLS, timeout) count as a failed load.

use std::time::Duration;

use crate::services::url_resolver;
use crate::types::errors::ProbeError;

/// Shared, cheaply cloneable probe client.
#[derive(Debug, Clone)]
pub struct LoadProbe {
    client: reqwest::Client,
}

impl LoadProbe {
    pub fn new(
        timeout: Duration,
        accept_invalid_certs: bool,
        user_agent: &str,
    ) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(accept_invalid_certs)
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Checks that `url` answers. Returns the HTTP status on success.
    pub async fn probe(&self, url: &str) -> Result<u16, ProbeError> {
        if !url_resolver::is_network_url(url) {
            return Err(ProbeError::Unsupported(url.to_string()));
        }
        match self.client.head(url).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) => Err(ProbeError::Unreachable(describe(&e))),
        }
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
