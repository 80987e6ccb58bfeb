use super::sheets::values_url;
use super::{ApiRequest, Transport};
use crate::config::GoogleConfig;
use crate::error::Result;
use crate::models::{FromSheetRows, SheetRow};
use google_sheets4::api::ValueRange;
use tracing::{error, instrument};

/// Reads the pre-configured public sheet with an API key, no sign-in needed.
pub struct PublicSheetFetcher<T> {
    transport: T,
    api_key: String,
    sheet_id: String,
}

impl<T: Transport> PublicSheetFetcher<T> {
    pub fn new(transport: T, api_key: impl Into<String>, sheet_id: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            sheet_id: sheet_id.into(),
        }
    }

    pub fn from_config(transport: T, config: &GoogleConfig) -> Result<Self> {
        config.require_public_sheet()?;
        Ok(Self::new(
            transport,
            config.api_key.clone(),
            config.public_sheet_id.clone(),
        ))
    }

    /// Rows of the public sheet. Never fails: any error is logged and an
    /// empty list is returned, so callers cannot tell "no rows" from a failed
    /// fetch.
    #[instrument(name = "Fetching public sheet", skip(self), fields(sheet_id = %self.sheet_id))]
    pub async fn fetch_public_sheet(&self) -> Vec<SheetRow> {
        match self.try_fetch().await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Error fetching sheet data: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<SheetRow>> {
        let mut url = values_url(&self.sheet_id)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let range: ValueRange = self
            .transport
            .get(ApiRequest::anonymous(url))
            .await?
            .error_for_status("Failed to fetch sheet data")?
            .json()?;

        SheetRow::from_sheet_rows(&range.values.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::google::mocks::{MockTransport, Reply};
    use crate::models::row::test_helpers::gallery_range;
    use serde_json::json;

    fn fetcher(transport: &MockTransport) -> PublicSheetFetcher<MockTransport> {
        PublicSheetFetcher::new(transport.clone(), "api_key_1", "public_sheet")
    }

    #[tokio::test]
    async fn test_fetch_public_sheet() {
        let transport =
            MockTransport::with_replies(vec![Reply::Json(200, json!({ "values": gallery_range() }))]);

        let rows = fetcher(&transport).fetch_public_sheet().await;

        assert_eq!(
            rows,
            vec![
                SheetRow {
                    title: "Cat".to_string(),
                    image_url: "cat.png".to_string(),
                },
                SheetRow {
                    title: "Dog".to_string(),
                    image_url: "dog.png".to_string(),
                },
            ]
        );

        let request = transport.request(0);
        assert_eq!(
            request.url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/public_sheet/values/A:B?key=api_key_1"
        );
        assert!(request.bearer.is_none(), "public path sends no credential");
    }

    #[tokio::test]
    async fn test_transport_failure_yields_empty() {
        let transport = MockTransport::with_replies(vec![Reply::Fail("connection reset")]);

        let rows = fetcher(&transport).fetch_public_sheet().await;

        assert!(rows.is_empty());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_http_error_yields_empty() {
        let transport = MockTransport::with_replies(vec![Reply::Raw(403, "API key not valid")]);

        let rows = fetcher(&transport).fetch_public_sheet().await;

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_yields_empty() {
        let transport = MockTransport::with_replies(vec![Reply::Raw(200, "not json")]);

        let rows = fetcher(&transport).fetch_public_sheet().await;

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_short_rows_default_to_empty() {
        let transport = MockTransport::with_replies(vec![Reply::Json(
            200,
            json!({ "values": [["Title", "Image"], ["Lonely"]] }),
        )]);

        let rows = fetcher(&transport).fetch_public_sheet().await;

        assert_eq!(
            rows,
            vec![SheetRow {
                title: "Lonely".to_string(),
                image_url: String::new(),
            }]
        );
    }

    #[test]
    fn test_from_config_requires_key_and_sheet() {
        let config = GoogleConfig {
            api_key: "key".to_string(),
            ..Default::default()
        };

        let result = PublicSheetFetcher::from_config(MockTransport::default(), &config);

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
