//! The transport seam between a session and the backend.

use async_trait::async_trait;
use url::Url;

use crate::configuration::Configuration;
use crate::configuration::Credentials;
use crate::error::TransportError;
use crate::graphql::Request;
use crate::graphql::Response;

/// One round trip to the backend: a [`Request`] in, a decoded [`Response`] out.
///
/// The core depends only on this seam, never on the transport mechanics behind
/// it, so tests substitute their own implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

/// The production transport: an HTTP POST of the request envelope to the
/// configured endpoint, under the configured credential pair and timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    pub fn new(configuration: &Configuration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(configuration.timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: configuration.endpoint.clone(),
            credentials: configuration.credentials.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<Response, TransportError> {
        tracing::debug!(endpoint = %self.endpoint, "submitting query");
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }
        let http_response = builder.send().await?.error_for_status()?;
        http_response
            .json::<Response>()
            .await
            .map_err(|err| TransportError::MalformedResponse {
                reason: err.to_string(),
            })
    }
}
