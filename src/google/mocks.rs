use super::{ApiRequest, ApiResponse, Credential, IdentityProvider, Transport};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Canned outcome for one transport call.
pub(crate) enum Reply {
    Json(u16, Value),
    Raw(u16, &'static str),
    Fail(&'static str),
}

/// Records every request and answers from a queue of replies.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    pub requests: Arc<Mutex<Vec<ApiRequest>>>,
    replies: Arc<Mutex<VecDeque<Reply>>>,
}

impl MockTransport {
    pub(crate) fn with_replies(replies: Vec<Reply>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(Mutex::new(replies.into())),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn request(&self, index: usize) -> ApiRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected transport call");

        match reply {
            Reply::Json(status, body) => Ok(ApiResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: serde_json::to_vec(&body).unwrap(),
            }),
            Reply::Raw(status, body) => Ok(ApiResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.as_bytes().to_vec(),
            }),
            Reply::Fail(message) => Err(AppError::Other(anyhow::anyhow!(message))),
        }
    }
}

/// Identity provider that issues a fixed token or a fixed provider error.
#[derive(Clone)]
pub(crate) struct MockIdentityProvider {
    pub token: std::result::Result<&'static str, &'static str>,
    pub revoke_fails: bool,
    pub token_requests: Arc<Mutex<usize>>,
    pub revoked: Arc<Mutex<Vec<String>>>,
}

impl MockIdentityProvider {
    pub(crate) fn issuing(token: &'static str) -> Self {
        Self {
            token: Ok(token),
            revoke_fails: false,
            token_requests: Arc::new(Mutex::new(0)),
            revoked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn rejecting(error: &'static str) -> Self {
        Self {
            token: Err(error),
            ..Self::issuing("")
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn request_access_token(&self) -> Result<Credential> {
        *self.token_requests.lock().unwrap() += 1;
        // Let concurrent callers observe the Authenticating state
        tokio::task::yield_now().await;

        match self.token {
            Ok(token) => Ok(Credential::new(token.to_string())),
            Err(error) => Err(AppError::Auth(error.to_string())),
        }
    }

    async fn revoke(&self, credential: &Credential) -> Result<()> {
        self.revoked.lock().unwrap().push(credential.secret().clone());
        match self.revoke_fails {
            true => Err(AppError::Auth("revocation rejected".to_string())),
            false => Ok(()),
        }
    }
}

/// A session that already holds `token`.
pub(crate) fn signed_in_session(token: &str) -> super::Session {
    let session = super::Session::new();
    session
        .begin_sign_in()
        .unwrap()
        .complete(Credential::new(token.to_string()));
    session
}
