mod auth;
mod drive;
mod identity;
mod public;
mod session;
mod sheets;
mod transport;

#[cfg(test)]
pub(crate) mod mocks;

pub use auth::GoogleIdentity;
pub use drive::FileLister;
pub use identity::IdentitySession;
pub use public::PublicSheetFetcher;
pub use session::{Credential, Session, SessionStatus};
pub use sheets::SheetReader;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport};

use crate::error::Result;
use async_trait::async_trait;

pub(crate) const DISCOVERY_URL: &str = "https://accounts.google.com/.well-known/openid-configuration";
pub(crate) const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
pub(crate) const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
pub(crate) const SHEETS_SPREADSHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// Columns A and B, all rows
pub(crate) const VALUES_RANGE: &str = "A:B";

/// Issues GET requests against the Google APIs.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Interactive token issuance and revocation.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn request_access_token(&self) -> Result<Credential>;

    async fn revoke(&self, credential: &Credential) -> Result<()>;
}
