use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::RecipeError;

/// GET-and-decode helper shared by the provider clients.
pub(crate) struct JsonFetcher {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl JsonFetcher {
    pub(crate) fn new(base_url: &str, timeout_secs: u64) -> Result<Self, RecipeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// Fetch `path` and decode the body as `T`. `what` names the upstream in
    /// decode errors.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, RecipeError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{what} returned HTTP {status} for {path}");
            return Err(RecipeError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body)
            .map_err(|e| RecipeError::Malformed(format!("Unexpected {what} API response: {e}")))
    }

    fn classify(&self, e: reqwest::Error) -> RecipeError {
        if e.is_timeout() {
            RecipeError::Timeout(self.timeout_secs)
        } else {
            RecipeError::Http(e)
        }
    }
}
