//! Calling a running specialist server: read its card, then send it a message.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use stockdesk_models::{A2aErrorBody, A2aReply, AgentCard};
use tracing::debug;

use crate::error::A2aError;

pub struct A2aClient {
    http: Client,
    base_url: String,
}

impl A2aClient {
    /// `base_url` is the server root, e.g. `http://localhost:5005`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, A2aError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| A2aError::Request {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn discover(&self) -> Result<AgentCard, A2aError> {
        let url = format!("{}/.well-known/agent.json", self.base_url);
        let response = self.http.get(&url).send().await;
        self.decode(url, response).await
    }

    /// Send `text` as a single-part user message and return the reply.
    pub async fn send(&self, text: &str) -> Result<A2aReply, A2aError> {
        let url = format!("{}/a2a", self.base_url);
        let body = json!({
            "message": { "role": "user", "parts": [{ "text": text }] }
        });
        let response = self.http.post(&url).json(&body).send().await;
        self.decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        url: String,
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, A2aError> {
        let response = match response {
            Ok(r) => r,
            Err(source) => return Err(A2aError::Request { url, source }),
        };
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "A2A response");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<A2aErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(A2aError::Remote {
                url,
                status: status.as_u16(),
                message,
            });
        }

        match response.json::<T>().await {
            Ok(value) => Ok(value),
            Err(source) => Err(A2aError::Request { url, source }),
        }
    }
}
