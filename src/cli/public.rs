use crate::config::GoogleConfig;
use crate::error::Result;
use crate::google::{PublicSheetFetcher, ReqwestTransport};
use tracing::info;

pub async fn fetch_public_sheet(config: &GoogleConfig) -> Result<()> {
    let transport = ReqwestTransport::new(reqwest::Client::new());
    let fetcher = PublicSheetFetcher::from_config(transport, config)?;

    let rows = fetcher.fetch_public_sheet().await;
    for row in &rows {
        info!(title = %row.title, image_url = %row.image_url, "Row");
    }
    info!(count = rows.len(), "Public sheet read");

    Ok(())
}
