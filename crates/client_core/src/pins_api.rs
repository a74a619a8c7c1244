//! Client for the pin persistence backend.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::Pin,
    error::{ApiError, ApiException},
    protocol::{pins_route, NewPinRequest},
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PinsApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for PinsApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PinsApiError::Decode(err.to_string())
        } else {
            PinsApiError::Transport(err.to_string())
        }
    }
}

#[async_trait]
pub trait PinsApi: Send + Sync {
    async fn list_pins(&self) -> Result<Vec<Pin>, PinsApiError>;
    async fn create_pin(&self, request: &NewPinRequest) -> Result<Pin, PinsApiError>;
}

pub struct HttpPinsApi {
    http: Client,
    server_url: String,
}

impl HttpPinsApi {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    fn pins_url(&self) -> String {
        format!("{}{}", self.server_url, pins_route())
    }
}

#[async_trait]
impl PinsApi for HttpPinsApi {
    async fn list_pins(&self) -> Result<Vec<Pin>, PinsApiError> {
        let url = self.pins_url();
        debug!(%url, "pins_api: GET");
        let res = self.http.get(url).send().await?;
        decode_json(res).await
    }

    async fn create_pin(&self, request: &NewPinRequest) -> Result<Pin, PinsApiError> {
        let url = self.pins_url();
        debug!(%url, title = request.title.as_str(), "pins_api: POST");
        let res = self.http.post(url).json(request).send().await?;
        decode_json(res).await
    }
}

async fn decode_json<T: DeserializeOwned>(res: Response) -> Result<T, PinsApiError> {
    let status = res.status();
    let body = res.bytes().await?;

    if !status.is_success() {
        let message = match serde_json::from_slice::<ApiError>(&body) {
            Ok(api_error) => ApiException::from(api_error).to_string(),
            Err(_) => String::from_utf8_lossy(&body).trim().to_string(),
        };
        return Err(PinsApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|err| PinsApiError::Decode(err.to_string()))
}

#[cfg(test)]
#[path = "tests/pins_api_tests.rs"]
mod tests;
