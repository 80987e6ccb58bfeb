use super::{Credential, Transport};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: Url,
    pub bearer: Option<Credential>,
}

impl ApiRequest {
    /// Request without an Authorization header.
    pub fn anonymous(url: Url) -> Self {
        Self { url, bearer: None }
    }

    pub fn authorized(url: Url, credential: &Credential) -> Self {
        Self {
            url,
            bearer: Some(credential.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Turn a non-success status into `AppError::Fetch`.
    pub fn error_for_status(self, context: &str) -> Result<Self> {
        if self.status.is_success() {
            return Ok(self);
        }

        Err(AppError::Fetch {
            context: context.to_string(),
            status: self.status,
            body: String::from_utf8_lossy(&self.body).into_owned(),
        })
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: ApiRequest) -> Result<ApiResponse> {
        debug!(url = %redacted(&request.url), "GET");

        let mut builder = self.client.get(request.url);
        if let Some(credential) = &request.bearer {
            builder = builder.bearer_auth(credential.secret());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse { status, body })
    }
}

/// URL with the `key` query parameter masked for logging.
fn redacted(url: &Url) -> Url {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| match k.as_ref() {
            "key" => (k.into_owned(), "***".to_string()),
            _ => (k.into_owned(), v.into_owned()),
        })
        .collect();

    if pairs.is_empty() {
        return masked;
    }

    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked
}
