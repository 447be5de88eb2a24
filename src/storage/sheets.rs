//! Google Sheets feedback sink (`spreadsheets.values.append`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FeedbackSink, StorageError};
use crate::config::SheetsConfig;
use crate::diary::FeedbackRow;

#[derive(Debug, Serialize)]
struct AppendBody<'a> {
    values: Vec<[&'a str; 2]>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    #[serde(default)]
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    #[serde(default)]
    updated_rows: Option<usize>,
}

/// Appends `[text, label]` rows to a spreadsheet range
pub struct SheetsFeedbackSink {
    client: Client,
    api_url: String,
    spreadsheet_id: String,
    range: String,
    access_token: String,
}

impl std::fmt::Debug for SheetsFeedbackSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsFeedbackSink")
            .field("api_url", &self.api_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl SheetsFeedbackSink {
    pub fn new(
        client: Client,
        api_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
            access_token: access_token.into(),
        }
    }

    pub fn from_config(config: &SheetsConfig, timeout: Duration) -> Result<Self, StorageError> {
        let spreadsheet_id = config
            .spreadsheet_id
            .clone()
            .ok_or_else(|| StorageError::NotConfigured("sheets.spreadsheet_id".to_string()))?;
        let access_token = config
            .access_token
            .clone()
            .ok_or_else(|| StorageError::NotConfigured("sheets.access_token".to_string()))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self::new(
            client,
            config.api_url.clone(),
            spreadsheet_id,
            config.range.clone(),
            access_token,
        ))
    }

    fn append_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append",
            self.api_url, self.spreadsheet_id, self.range
        )
    }
}

#[async_trait]
impl FeedbackSink for SheetsFeedbackSink {
    async fn append(&self, rows: &[FeedbackRow]) -> Result<usize, StorageError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let body = AppendBody {
            values: rows.iter().map(|r| [r.text.as_str(), r.label.as_str()]).collect(),
        };

        let response = self
            .client
            .post(self.append_url())
            .bearer_auth(&self.access_token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AppendResponse = response.json().await.unwrap_or_default();
        let written = parsed
            .updates
            .and_then(|u| u.updated_rows)
            .unwrap_or(rows.len());

        info!(rows = written, range = %self.range, "Feedback appended to spreadsheet");
        Ok(written)
    }

    fn name(&self) -> &'static str {
        "sheets"
    }
}
