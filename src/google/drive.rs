use super::{ApiRequest, DRIVE_FILES_URL, Session, Transport};
use crate::error::{AppError, Result};
use crate::models::FileDescriptor;
use crate::models::file::{NATIVE_SPREADSHEET_MIME, UPLOADED_WORKBOOK_MIME};
use google_drive3::api::FileList;
use tracing::{debug, instrument};
use url::Url;

const LIST_FIELDS: &str = "files(id,name,mimeType)";

/// Lists the user's spreadsheets in Google Drive.
pub struct FileLister<T> {
    transport: T,
}

impl<T: Transport> FileLister<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Return the first page of native and uploaded spreadsheets, in the order
    /// Drive returns them.
    #[instrument(name = "Listing spreadsheet files", skip_all)]
    pub async fn list_files(&self, session: &Session) -> Result<Vec<FileDescriptor>> {
        let credential = session.credential()?;

        let query = format!(
            "mimeType='{}' or mimeType='{}'",
            UPLOADED_WORKBOOK_MIME, NATIVE_SPREADSHEET_MIME
        );
        let url = Url::parse_with_params(
            DRIVE_FILES_URL,
            &[("q", query.as_str()), ("fields", LIST_FIELDS)],
        )
        .map_err(|e| AppError::Config(format!("Invalid Drive URL: {}", e)))?;

        let file_list: FileList = self
            .transport
            .get(ApiRequest::authorized(url, &credential))
            .await?
            .error_for_status("Failed to fetch files")?
            .json()?;

        let files: Vec<FileDescriptor> = file_list
            .files
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();
        debug!(count = files.len(), "Listed files");

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::mocks::{MockTransport, Reply, signed_in_session};
    use crate::models::FileKind;
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_files_requires_credential() {
        let transport = MockTransport::default();
        let lister = FileLister::new(transport.clone());

        let result = lister.list_files(&Session::new()).await;

        assert!(matches!(result, Err(AppError::NotAuthenticated)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_files() {
        let transport = MockTransport::with_replies(vec![Reply::Json(
            200,
            json!({
                "files": [
                    {"id": "a", "name": "Gallery", "mimeType": NATIVE_SPREADSHEET_MIME},
                    {"id": "b", "name": "Upload.xlsx", "mimeType": UPLOADED_WORKBOOK_MIME}
                ]
            }),
        )]);
        let lister = FileLister::new(transport.clone());

        let files = lister.list_files(&signed_in_session("tok")).await.unwrap();

        assert_eq!(
            files,
            vec![
                FileDescriptor {
                    id: "a".to_string(),
                    name: "Gallery".to_string(),
                    mime_type: NATIVE_SPREADSHEET_MIME.to_string(),
                },
                FileDescriptor {
                    id: "b".to_string(),
                    name: "Upload.xlsx".to_string(),
                    mime_type: UPLOADED_WORKBOOK_MIME.to_string(),
                },
            ]
        );
        assert_eq!(files[1].kind(), FileKind::UploadedWorkbook);
    }

    #[tokio::test]
    async fn test_list_files_request_shape() {
        let transport = MockTransport::with_replies(vec![Reply::Json(200, json!({"files": []}))]);
        let lister = FileLister::new(transport.clone());

        lister.list_files(&signed_in_session("tok")).await.unwrap();

        assert_eq!(transport.call_count(), 1);
        let request = transport.request(0);
        assert_eq!(request.bearer.unwrap().secret(), "tok");
        assert_eq!(
            request.url.path(),
            "/drive/v3/files",
            "should hit the files collection"
        );

        let params: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        assert_eq!(
            params,
            vec![
                (
                    "q".to_string(),
                    "mimeType='application/vnd.openxmlformats-officedocument.spreadsheetml.sheet' \
                     or mimeType='application/vnd.google-apps.spreadsheet'"
                        .to_string()
                ),
                ("fields".to_string(), "files(id,name,mimeType)".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_files_without_files_field() {
        let transport = MockTransport::with_replies(vec![Reply::Json(200, json!({}))]);
        let lister = FileLister::new(transport);

        let files = lister.list_files(&signed_in_session("tok")).await.unwrap();

        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_list_files_http_error() {
        let transport = MockTransport::with_replies(vec![Reply::Raw(401, "unauthorized")]);
        let lister = FileLister::new(transport);

        let result = lister.list_files(&signed_in_session("tok")).await;

        match result {
            Err(AppError::Fetch { status, .. }) => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }
}
