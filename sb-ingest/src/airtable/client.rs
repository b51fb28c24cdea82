//! Paginated record fetcher for the tabular API
//!
//! Pulls every record from a named table by following the offset cursor
//! until a response omits it. Authentication is a bearer token sent as a
//! default header on every request.
//!
//! Any non-success status aborts the whole fetch for that table. The
//! caller is an offline batch job, so a truncated dataset that looks
//! complete is worse than no output at all.

use reqwest::{header, Client};
use sb_common::types::RawRecord;
use sb_common::{config::ApiCredentials, Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Tabular API base URL
const API_BASE_URL: &str = "https://api.airtable.com/v0";

/// Default timeout for API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Records requested per page (API maximum)
const PAGE_SIZE: &str = "100";

/// Client for the remote tabular source.
pub struct AirtableClient {
    /// HTTP client with bearer auth preconfigured
    http_client: Client,
    /// Base identifier all table paths hang off
    base_id: String,
}

impl AirtableClient {
    /// Create a client with bearer auth and a request timeout.
    pub fn new(credentials: &ApiCredentials) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let bearer = format!("Bearer {}", credentials.api_key);
        let mut auth_value = header::HeaderValue::from_str(&bearer)
            .map_err(|_| Error::Config("API key contains invalid header characters".to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_id: credentials.base_id.clone(),
        })
    }

    /// Fetch the full ordered record list for one table.
    ///
    /// # Errors
    /// Fatal on the first non-success status or transport failure; the
    /// partial accumulation is discarded.
    pub async fn fetch_all(&self, table: &str) -> Result<Vec<RawRecord>> {
        let url = format!("{}/{}/{}", API_BASE_URL, self.base_id, table);
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut request = self.http_client.get(&url).query(&[("pageSize", PAGE_SIZE)]);
            if let Some(cursor) = &offset {
                request = request.query(&[("offset", cursor.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Api(format!(
                    "Table '{}' fetch returned {}: {}",
                    table, status, body
                )));
            }

            let page: RecordPage = response.json().await?;
            pages += 1;
            debug!(
                table = %table,
                page = pages,
                records = page.records.len(),
                "Fetched record page"
            );
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        info!(table = %table, records = records.len(), pages, "Table fetch complete");
        Ok(records)
    }
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecordPage {
    records: Vec<RawRecord>,
    /// Continuation cursor; absent on the last page
    offset: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_rejects_invalid_header_key() {
        let credentials = ApiCredentials {
            api_key: "key\nwith-newline".to_string(),
            base_id: "appTest".to_string(),
        };
        let result = AirtableClient::new(&credentials);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_record_page_parses_with_and_without_offset() {
        let with: RecordPage = serde_json::from_str(
            r#"{"records":[{"id":"rec1","fields":{},"createdTime":"2024-01-01T00:00:00.000Z"}],"offset":"itrNext"}"#,
        )
        .unwrap();
        assert_eq!(with.records.len(), 1);
        assert_eq!(with.offset.as_deref(), Some("itrNext"));

        let last: RecordPage = serde_json::from_str(r#"{"records":[]}"#).unwrap();
        assert!(last.offset.is_none());
    }
}
