use crate::config::GoogleConfig;
use crate::error::Result;
use crate::google::{
    FileLister, GoogleIdentity, IdentitySession, ReqwestTransport, Session, SheetReader,
};
use crate::models::UserProfile;
use tracing::info;

/// A signed-in session for the lifetime of one command. Nothing outlives the
/// process, so every command signs in and out again.
struct SignedIn {
    identity: IdentitySession<GoogleIdentity, ReqwestTransport>,
    session: Session,
    transport: ReqwestTransport,
    profile: UserProfile,
}

impl SignedIn {
    async fn start(config: &GoogleConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(reqwest::Client::new());
        let provider = GoogleIdentity::initialize(config, &transport).await?;
        let identity = IdentitySession::new(provider, transport.clone());
        let session = Session::new();

        let profile = match identity.sign_in(&session).await {
            Ok(profile) => profile,
            Err(e) => {
                identity.sign_out(&session).await;
                return Err(e);
            }
        };

        Ok(Self {
            identity,
            session,
            transport,
            profile,
        })
    }

    async fn finish(self) {
        self.identity.sign_out(&self.session).await;
    }
}

pub async fn whoami(config: &GoogleConfig) -> Result<()> {
    let signed_in = SignedIn::start(config).await?;

    let profile = &signed_in.profile;
    info!(
        authenticated = signed_in.session.is_authenticated(),
        email = %profile.email,
        name = %profile.name,
        picture = %profile.picture,
        "Profile"
    );

    signed_in.finish().await;
    Ok(())
}

pub async fn list_files(config: &GoogleConfig) -> Result<()> {
    let signed_in = SignedIn::start(config).await?;

    let lister = FileLister::new(signed_in.transport.clone());
    let result = lister.list_files(&signed_in.session).await;
    signed_in.finish().await;

    let files = result?;
    for file in &files {
        info!(id = %file.id, name = %file.name, kind = ?file.kind(), "File");
    }
    info!(count = files.len(), "Files listed");

    Ok(())
}

pub async fn read_sheet(config: &GoogleConfig, file_id: &str) -> Result<()> {
    let signed_in = SignedIn::start(config).await?;

    let reader = SheetReader::new(signed_in.transport.clone());
    let result = reader.read_sheet(&signed_in.session, file_id).await;
    signed_in.finish().await;

    let rows = result?;
    for row in &rows {
        info!(title = %row.title, image_url = %row.image_url, "Row");
    }
    info!(count = rows.len(), "Sheet read");

    Ok(())
}
