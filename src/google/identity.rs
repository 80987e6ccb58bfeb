use super::{ApiRequest, IdentityProvider, Session, Transport, USERINFO_URL};
use crate::error::{AppError, Result};
use crate::models::UserProfile;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Sign-in and sign-out on top of an identity provider.
///
/// The credential itself lives in the [`Session`] handed to each call, so one
/// `IdentitySession` can serve several isolated sessions.
pub struct IdentitySession<P, T> {
    provider: P,
    transport: T,
}

impl<P, T> IdentitySession<P, T>
where
    P: IdentityProvider,
    T: Transport,
{
    pub fn new(provider: P, transport: T) -> Self {
        Self {
            provider,
            transport,
        }
    }

    /// Run the consent flow, store the credential and fetch the profile.
    ///
    /// A provider error leaves the session unauthenticated. If the token was
    /// issued but the profile fetch fails, the session stays signed in and the
    /// fetch error is returned.
    #[instrument(name = "Signing in to Google", skip_all)]
    pub async fn sign_in(&self, session: &Session) -> Result<UserProfile> {
        let guard = session.begin_sign_in()?;

        let credential = self.provider.request_access_token().await?;
        guard.complete(credential.clone());
        debug!("Access token issued");

        let url = Url::parse(USERINFO_URL)
            .map_err(|e| AppError::Auth(format!("Invalid userinfo URL: {}", e)))?;
        let profile: UserProfile = self
            .transport
            .get(ApiRequest::authorized(url, &credential))
            .await?
            .error_for_status("Failed to fetch user info")?
            .json()?;

        info!(email = %profile.email, "Signed in");

        Ok(profile)
    }

    /// Clear the session, then revoke the token. Revocation failures are
    /// logged and never returned.
    #[instrument(name = "Signing out of Google", skip_all)]
    pub async fn sign_out(&self, session: &Session) {
        let Some(credential) = session.clear() else {
            debug!("No active session to sign out of");
            return;
        };

        match self.provider.revoke(&credential).await {
            Ok(()) => debug!("Access token revoked"),
            Err(e) => warn!("Failed to revoke access token: {}", e),
        }
    }
}
