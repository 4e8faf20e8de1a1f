use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::{ApiError, FailureKind};
use deck_logging::deck_debug;
use scrapedeck_core::protocol::{
    BulkSearchRequest, DeleteRequest, DeleteResponse, FoldersResponse, JobStatus, MoveRequest,
    MoveResponse, StatusResponse, SubmitResponse,
};

/// Header that marks a request as programmatic rather than a navigation.
pub const REQUESTED_WITH: &str = "x-requested-with";
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

pub const SUBMIT_PATH: &str = "/perform-bulk-search";
pub const STATUS_PATH: &str = "/api/scraping_status";
pub const LOG_STREAM_PATH: &str = "/api/scraping_logs/stream";
pub const LOG_CLEAR_PATH: &str = "/api/scraping_logs/clear";
pub const LOG_DOWNLOAD_PATH: &str = "/api/scraping_logs/download";
pub const FOLDERS_PATH: &str = "/api/folders";
pub const MOVE_PATH: &str = "/api/move-images";
pub const DELETE_PATH: &str = "/api/delete-images";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to every request except the log stream, which stays open.
    pub request_timeout: Duration,
    /// Pause before the log stream reconnects after it drops.
    pub stream_retry: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            stream_retry: Duration::from_secs(3),
        }
    }
}

/// Body of `GET /api/scraping_logs/download`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDownload {
    /// File name suggested by the server, reduced to a bare name.
    pub filename: Option<String>,
    pub bytes: Bytes,
}

pub type ByteStream = BoxStream<'static, Result<Bytes, ApiError>>;

#[async_trait::async_trait]
pub trait ScrapeApi: Send + Sync {
    async fn job_status(&self) -> Result<JobStatus, ApiError>;

    async fn submit_bulk_search(
        &self,
        request: &BulkSearchRequest,
    ) -> Result<SubmitResponse, ApiError>;

    /// Opens the push stream and returns its raw body.
    async fn log_stream(&self) -> Result<ByteStream, ApiError>;

    async fn clear_logs(&self) -> Result<StatusResponse, ApiError>;

    async fn download_logs(&self) -> Result<LogDownload, ApiError>;

    async fn folders(&self, current: &str) -> Result<FoldersResponse, ApiError>;

    async fn move_images(&self, request: &MoveRequest) -> Result<MoveResponse, ApiError>;

    async fn delete_images(&self, request: &DeleteRequest) -> Result<DeleteResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        // Endpoints are joined relative to the base, so keep any path prefix.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        // No client-wide timeout: the log stream must be allowed to stay open.
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, ApiError> {
        deck_debug!("GET {}", url);
        self.client
            .get(url)
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path)?;
        deck_debug!("POST {}", url);
        let mut request = self
            .client
            .post(url)
            .timeout(self.settings.request_timeout)
            .header(REQUESTED_WITH, HeaderValue::from_static(XML_HTTP_REQUEST));
        if let Some(body) = body {
            let payload = serde_json::to_vec(body)
                .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(payload);
        }
        request.send().await.map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl ScrapeApi for ReqwestApi {
    async fn job_status(&self) -> Result<JobStatus, ApiError> {
        let response = self.get(self.endpoint(STATUS_PATH)?).await?;
        read_json(response, StatusPolicy::Lenient).await
    }

    async fn submit_bulk_search(
        &self,
        request: &BulkSearchRequest,
    ) -> Result<SubmitResponse, ApiError> {
        let response = self.post(SUBMIT_PATH, Some(request)).await?;
        read_json(response, StatusPolicy::Strict).await
    }

    async fn log_stream(&self) -> Result<ByteStream, ApiError> {
        let url = self.endpoint(LOG_STREAM_PATH)?;
        deck_debug!("Opening log stream {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error))
            .boxed())
    }

    async fn clear_logs(&self) -> Result<StatusResponse, ApiError> {
        let response = self.post::<()>(LOG_CLEAR_PATH, None).await?;
        read_json(response, StatusPolicy::Lenient).await
    }

    async fn download_logs(&self) -> Result<LogDownload, ApiError> {
        let response = self.get(self.endpoint(LOG_DOWNLOAD_PATH)?).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(disposition_filename);
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(LogDownload { filename, bytes })
    }

    async fn folders(&self, current: &str) -> Result<FoldersResponse, ApiError> {
        let mut url = self.endpoint(FOLDERS_PATH)?;
        url.query_pairs_mut().append_pair("current", current);
        let response = self.get(url).await?;
        read_json(response, StatusPolicy::Lenient).await
    }

    async fn move_images(&self, request: &MoveRequest) -> Result<MoveResponse, ApiError> {
        let response = self.post(MOVE_PATH, Some(request)).await?;
        read_json(response, StatusPolicy::Lenient).await
    }

    async fn delete_images(&self, request: &DeleteRequest) -> Result<DeleteResponse, ApiError> {
        let response = self.post(DELETE_PATH, Some(request)).await?;
        read_json(response, StatusPolicy::Lenient).await
    }
}

/// How a non-2xx reply is treated before its body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusPolicy {
    /// Any non-2xx is an error, whatever the body says.
    Strict,
    /// Use the JSON body if it decodes; the backend reports logical
    /// failures in `status`/`message`.
    Lenient,
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    policy: StatusPolicy,
) -> Result<T, ApiError> {
    let status = response.status();
    if policy == StatusPolicy::Strict && !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    match serde_json::from_slice(&body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        )),
        Err(err) => Err(ApiError::new(FailureKind::Decode, err.to_string())),
    }
}

/// Extracts `filename=` from a Content-Disposition value, dropping any
/// directory part.
pub fn disposition_filename(value: &str) -> Option<String> {
    let raw = value.split(';').map(str::trim).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| value.trim().trim_matches('"'))
    })?;
    let name = Path::new(raw).file_name()?.to_str()?;
    (!name.is_empty()).then(|| name.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
