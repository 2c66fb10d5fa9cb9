//! Delivery of validated contact submissions to the REST data store.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::{
    error::{ApiErrorBody, SubmitFailure},
    protocol::{ContactInsertRequest, API_KEY_HEADER, CONTACTS_PATH, PREFER_HEADER, PREFER_MINIMAL},
};
use tracing::{debug, info};

use crate::validation::ContactSubmission;

#[async_trait]
pub trait ContactTransport: Send + Sync {
    /// Sends one submission. `Ok` means the store answered with a 2xx status.
    async fn submit(
        &self,
        submission: &ContactSubmission,
        user_agent: &str,
    ) -> Result<(), SubmitFailure>;
}

#[derive(Debug, Clone)]
pub struct SubmitEndpoint {
    pub base_url: String,
    pub api_key: String,
}

impl SubmitEndpoint {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn contacts_url(&self) -> String {
        format!("{}{CONTACTS_PATH}", self.base_url)
    }
}

pub struct RestContactTransport {
    http: Client,
    endpoint: SubmitEndpoint,
}

impl RestContactTransport {
    pub fn new(endpoint: SubmitEndpoint) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: SubmitEndpoint) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &SubmitEndpoint {
        &self.endpoint
    }
}

fn insert_request(submission: &ContactSubmission, user_agent: &str) -> ContactInsertRequest {
    ContactInsertRequest {
        nome: submission.nome().to_string(),
        cognome: submission.cognome().to_string(),
        telefono: submission.telefono().to_string(),
        email: submission.email().to_string(),
        privacy_accepted: submission.privacy(),
        user_agent: user_agent.to_string(),
    }
}

#[async_trait]
impl ContactTransport for RestContactTransport {
    async fn submit(
        &self,
        submission: &ContactSubmission,
        user_agent: &str,
    ) -> Result<(), SubmitFailure> {
        let body = serde_json::to_vec(&insert_request(submission, user_agent))
            .map_err(|e| SubmitFailure::ParseFailure(e.to_string()))?;
        let url = self.endpoint.contacts_url();

        debug!(url = %url, "posting contact submission");
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.endpoint.api_key)
            .bearer_auth(&self.endpoint.api_key)
            .header(PREFER_HEADER, PREFER_MINIMAL)
            .body(body)
            .send()
            .await
            .map_err(|e| SubmitFailure::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "contact submission stored");
            return Ok(());
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        Err(SubmitFailure::http_status(status.as_u16(), message))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
