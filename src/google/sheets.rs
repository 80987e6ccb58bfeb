use super::{
    ApiRequest, Credential, DRIVE_FILES_URL, SHEETS_SPREADSHEETS_URL, Session, Transport,
    VALUES_RANGE,
};
use crate::error::{AppError, Result};
use crate::models::{FileKind, FromSheetRows, SheetRow};
use google_drive3::api::File;
use google_sheets4::api::ValueRange;
use tracing::{debug, instrument};
use url::Url;

/// Reads gallery rows from a file in the user's Drive.
pub struct SheetReader<T> {
    transport: T,
}

impl<T: Transport> SheetReader<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Resolve the file's type, then read columns A:B of a native sheet.
    /// Uploaded workbooks and other types fail with `UnsupportedFormat`.
    #[instrument(name = "Reading sheet", skip(self, session))]
    pub async fn read_sheet(&self, session: &Session, file_id: &str) -> Result<Vec<SheetRow>> {
        let credential = session.credential()?;

        let mime_type = self.fetch_mime_type(&credential, file_id).await?;
        debug!(mime_type = %mime_type, "Resolved file type");

        match FileKind::from_mime_type(&mime_type) {
            FileKind::NativeSpreadsheet => self.fetch_values(&credential, file_id).await,
            FileKind::UploadedWorkbook | FileKind::Other => {
                Err(AppError::UnsupportedFormat { mime_type })
            }
        }
    }

    async fn fetch_mime_type(&self, credential: &Credential, file_id: &str) -> Result<String> {
        let mut url = endpoint(DRIVE_FILES_URL, &[file_id])?;
        url.query_pairs_mut().append_pair("fields", "mimeType");

        let file: File = self
            .transport
            .get(ApiRequest::authorized(url, credential))
            .await?
            .error_for_status("Failed to fetch file metadata")?
            .json()?;

        Ok(file.mime_type.unwrap_or_default())
    }

    async fn fetch_values(&self, credential: &Credential, file_id: &str) -> Result<Vec<SheetRow>> {
        let url = values_url(file_id)?;

        let range: ValueRange = self
            .transport
            .get(ApiRequest::authorized(url, credential))
            .await?
            .error_for_status("Failed to fetch sheet data")?
            .json()?;

        // Empty ranges come back without `values`
        SheetRow::from_sheet_rows(&range.values.unwrap_or_default())
    }
}

/// `{spreadsheets}/{id}/values/A:B`
pub(super) fn values_url(spreadsheet_id: &str) -> Result<Url> {
    endpoint(
        SHEETS_SPREADSHEETS_URL,
        &[spreadsheet_id, "values", VALUES_RANGE],
    )
}

/// Append percent-encoded path segments to a base URL.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url =
        Url::parse(base).map_err(|e| AppError::Config(format!("Invalid API URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Config(format!("API URL cannot be a base: {}", base)))?
        .extend(segments);
    Ok(url)
}
