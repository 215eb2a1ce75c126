//! HTTP client for the petition backend.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::domain::entities::dataset::{Dataset, PageQuery, Row};
use crate::infra::http::sse::SseDecoder;
use crate::usecase::ports::remote::{PetitionProcessor, RecordSource, SourceError, UploadKind};

#[derive(Debug, Deserialize)]
struct RowsResponse {
    rows: Vec<Row>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    data: Vec<Row>,
}

fn http_error(err: reqwest::Error) -> SourceError {
    SourceError::Http(err.to_string())
}

fn decode_error(err: reqwest::Error) -> SourceError {
    SourceError::Decode(err.to_string())
}

async fn ensure_success(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Status {
        status: status.as_u16(),
        body,
    })
}

pub struct ApiClient {
    client: Client,
    stream_client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to create HTTP client")?;
        // The log stream stays open for the whole run, so it gets no timeout.
        let stream_client = Client::builder()
            .build()
            .context("failed to create streaming HTTP client")?;

        Ok(Self {
            client,
            stream_client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Opens the server-sent log stream of the OCR pipeline.
    pub async fn open_log_stream(&self) -> Result<LogStream, SourceError> {
        let response = self
            .stream_client
            .get(self.url("ocr/logs"))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(http_error)?;
        let response = ensure_success(response).await?;

        Ok(LogStream {
            response,
            decoder: SseDecoder::new(),
        })
    }
}

#[async_trait]
impl RecordSource for ApiClient {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Dataset, SourceError> {
        let response = self
            .client
            .get(self.url("voter_record"))
            .query(&[
                ("__page", query.page.to_string()),
                ("__page_size", query.page_size.to_string()),
                ("__order", query.order.clone()),
            ])
            .send()
            .await
            .map_err(http_error)?;

        let body: RowsResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;
        Ok(Dataset::from_rows(body.rows))
    }

    async fn fetch_count(&self) -> Result<u64, SourceError> {
        let response = self
            .client
            .get(self.url("voter_record/count"))
            .send()
            .await
            .map_err(http_error)?;

        let body: CountResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;
        Ok(body.count)
    }
}

#[async_trait]
impl PetitionProcessor for ApiClient {
    async fn upload(&self, kind: UploadKind, path: &Path) -> Result<(), SourceError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            SourceError::InvalidFile(format!("failed to read {}: {err}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.url(&format!("upload/{}", kind.path_segment())))
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn clear_files(&self) -> Result<(), SourceError> {
        let response = self
            .client
            .delete(self.url("clear"))
            .send()
            .await
            .map_err(http_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn run_ocr(&self) -> Result<Dataset, SourceError> {
        // OCR runs synchronously on the server and can take minutes.
        let response = self
            .stream_client
            .post(self.url("ocr"))
            .send()
            .await
            .map_err(http_error)?;

        let body: OcrResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;
        Ok(Dataset::from_rows(body.data))
    }
}

/// An open `text/event-stream` response.
pub struct LogStream {
    response: Response,
    decoder: SseDecoder,
}

impl LogStream {
    /// Next event payload, or `None` once the server closes the stream.
    pub async fn next_event(&mut self) -> Result<Option<String>, SourceError> {
        loop {
            if let Some(event) = self.decoder.next_event() {
                return Ok(Some(event));
            }
            match self.response.chunk().await.map_err(http_error)? {
                Some(chunk) => self.decoder.feed(&chunk),
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_decode_into_rows() {
        let rows: RowsResponse =
            serde_json::from_str(r#"{"rows": [{"id": 1, "First_Name": "Ann"}]}"#)
                .expect("rows response");
        assert_eq!(rows.rows.len(), 1);

        let count: CountResponse = serde_json::from_str(r#"{"count": 32}"#).expect("count");
        assert_eq!(count.count, 32);

        let ocr: OcrResponse =
            serde_json::from_str(r#"{"data": [{"Valid": true}], "stats": {}}"#).expect("ocr");
        assert_eq!(ocr.data.len(), 1);
    }

    #[tokio::test]
    async fn upload_of_missing_file_fails_before_any_request() {
        let config = AppConfig {
            backend_url: "http://127.0.0.1:9/api".to_string(),
            ..AppConfig::default()
        };
        let client = ApiClient::new(&config).expect("client");
        let missing = std::env::temp_dir().join("petition-viewer-missing-upload.pdf");

        let err = client
            .upload(UploadKind::PetitionSignatures, &missing)
            .await
            .expect_err("missing file should fail");

        assert!(matches!(err, SourceError::InvalidFile(_)), "{err:?}");
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let config = AppConfig {
            backend_url: "http://localhost:8000/api/".to_string(),
            ..AppConfig::default()
        };

        let client = ApiClient::new(&config).expect("client");

        assert_eq!(
            client.url("voter_record/count"),
            "http://localhost:8000/api/voter_record/count"
        );
    }
}
