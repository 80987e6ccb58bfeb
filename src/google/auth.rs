use super::{ApiRequest, Credential, DISCOVERY_URL, IdentityProvider, Transport};
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use google_drive3::api::Scope as DriveScope;
use oauth2::{
    AuthUrl, AuthorizationCode, Client, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, PkceCodeChallenge, RedirectUrl, RevocationUrl, Scope, StandardRevocableToken,
    TokenResponse, TokenUrl,
    basic::{
        BasicClient, BasicErrorResponse, BasicRevocationErrorResponse,
        BasicTokenIntrospectionResponse, BasicTokenResponse,
    },
};
use reqwest::redirect::Policy;
use serde::Deserialize;
use tiny_http::{Response, Server, StatusCode};
use tracing::{debug, instrument};
use url::Url;

const USERINFO_EMAIL_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";
const USERINFO_PROFILE_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.profile";
const CALLBACK_PATH: &str = "/callback";

/// Endpoints advertised by Google's OpenID configuration.
#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    authorization_endpoint: String,
    token_endpoint: String,
    revocation_endpoint: String,
}

// Type alias for the client when Auth, Token and Revocation URLs are set
type ConfiguredClient = Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,    // HasAuthUrl
    EndpointNotSet, // HasDeviceAuthUrl
    EndpointNotSet, // HasIntrospectionUrl
    EndpointSet,    // HasRevocationUrl
    EndpointSet,    // HasTokenUrl
>;

/// Google's consent flow: authorization code with PKCE, redirected to a
/// loopback listener.
pub struct GoogleIdentity {
    client: ConfiguredClient,
    http_client: reqwest::Client,
    callback_port: u16,
}

impl GoogleIdentity {
    /// Load the provider's discovery document and build the OAuth client.
    ///
    /// Each call performs its own load and returns an independent provider.
    #[instrument(name = "Initializing Google identity", skip_all)]
    pub async fn initialize<T: Transport>(config: &GoogleConfig, transport: &T) -> Result<Self> {
        config.require_client()?;

        let url = Url::parse(DISCOVERY_URL)
            .map_err(|e| AppError::Auth(format!("Invalid discovery URL: {}", e)))?;
        let discovery: DiscoveryDocument = transport
            .get(ApiRequest::anonymous(url))
            .await?
            .error_for_status("Failed to load identity provider configuration")?
            .json()?;
        debug!(?discovery, "Loaded identity provider configuration");

        Self::from_discovery(config, discovery)
    }

    fn from_discovery(config: &GoogleConfig, discovery: DiscoveryDocument) -> Result<Self> {
        let auth_url = AuthUrl::new(discovery.authorization_endpoint)
            .map_err(|e| AppError::Auth(format!("Invalid auth URL: {}", e)))?;
        let token_url = TokenUrl::new(discovery.token_endpoint)
            .map_err(|e| AppError::Auth(format!("Invalid token URL: {}", e)))?;
        let revocation_url = RevocationUrl::new(discovery.revocation_endpoint)
            .map_err(|e| AppError::Auth(format!("Invalid revocation URL: {}", e)))?;

        let redirect_url = format!("http://127.0.0.1:{}{}", config.callback_port, CALLBACK_PATH);
        let mut client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_revocation_url(revocation_url)
            .set_redirect_uri(
                RedirectUrl::new(redirect_url)
                    .map_err(|e| AppError::Auth(format!("Invalid redirect URL: {}", e)))?,
            );
        if let Some(secret) = config.client_secret() {
            client = client.set_client_secret(ClientSecret::new(secret.to_string()));
        }

        let http_client = reqwest::ClientBuilder::new()
            .redirect(Policy::none())
            .build()
            .map_err(|e| AppError::Auth(format!("Failed to build reqwest client: {}", e)))?;

        Ok(Self {
            client,
            http_client,
            callback_port: config.callback_port,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentity {
    async fn request_access_token(&self) -> Result<Credential> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_token) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes())
            .set_pkce_challenge(pkce_challenge)
            .url();

        // Start a local server to receive the callback
        let bind_addr = format!("127.0.0.1:{}", self.callback_port);
        let server = Server::http(&bind_addr)
            .map_err(|e| AppError::Auth(format!("Failed to bind to {}: {}", bind_addr, e)))?;

        println!("Open this URL in your browser:\n{}", auth_url);
        println!();
        println!("Waiting for authorization...");

        let port = self.callback_port;
        let code = tokio::task::spawn_blocking(move || await_callback(&server, port, &csrf_token))
            .await
            .map_err(|e| AppError::Other(e.into()))??;

        let token_result = self
            .client
            .exchange_code(code)
            .set_pkce_verifier(pkce_verifier)
            .request_async(&self.http_client)
            .await
            .map_err(|e| AppError::Auth(format!("Failed to exchange code: {}", e)))?;

        Ok(token_result.access_token().clone())
    }

    async fn revoke(&self, credential: &Credential) -> Result<()> {
        self.client
            .revoke_token(StandardRevocableToken::AccessToken(credential.clone()))
            .map_err(|e| AppError::Auth(format!("Invalid revocation endpoint: {}", e)))?
            .request_async(&self.http_client)
            .await
            .map_err(|e| AppError::Auth(format!("Failed to revoke token: {}", e)))
    }
}

fn scopes() -> Vec<Scope> {
    [
        DriveScope::Readonly.as_ref(),
        USERINFO_EMAIL_SCOPE,
        USERINFO_PROFILE_SCOPE,
    ]
    .iter()
    .map(|s| Scope::new(s.to_string()))
    .collect()
}

/// Block until the browser hits the callback path, answer it, and return the
/// authorization code.
fn await_callback(server: &Server, port: u16, csrf_token: &CsrfToken) -> Result<AuthorizationCode> {
    loop {
        let request = server
            .recv()
            .map_err(|e| AppError::Auth(format!("Failed to receive request: {}", e)))?;

        // Browsers also ask for /favicon.ico and the like
        if !request.url().starts_with(CALLBACK_PATH) {
            let _ = request.respond(Response::empty(StatusCode(404)));
            continue;
        }

        let outcome = parse_callback(port, request.url(), csrf_token);
        let message = match &outcome {
            Ok(_) => "Authentication successful! You can close this window.".to_string(),
            Err(e) => format!("Authentication failed: {}", e),
        };
        request
            .respond(Response::from_string(message))
            .map_err(|e| AppError::Auth(format!("Failed to send response: {}", e)))?;

        return outcome;
    }
}

/// Extract the code from a callback request path. A provider-reported
/// `error` takes precedence and is returned as the auth error message.
fn parse_callback(port: u16, path: &str, csrf_token: &CsrfToken) -> Result<AuthorizationCode> {
    let callback_url = format!("http://localhost:{}{}", port, path);
    let url = Url::parse(&callback_url)
        .map_err(|e| AppError::Auth(format!("Failed to parse callback URL: {}", e)))?;

    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if let Some(error) = param("error") {
        return Err(AppError::Auth(match param("error_description") {
            Some(description) => format!("{}: {}", error, description),
            None => error,
        }));
    }

    let state = param("state").ok_or_else(|| AppError::Auth("No state in callback".to_string()))?;
    if state != *csrf_token.secret() {
        return Err(AppError::Auth("CSRF token mismatch".to_string()));
    }

    let code = param("code").ok_or_else(|| AppError::Auth("No code in callback".to_string()))?;

    Ok(AuthorizationCode::new(code))
}
