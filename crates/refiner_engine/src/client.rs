use std::time::Duration;

use bytes::BytesMut;
use futures_util::StreamExt;
use refiner_logging::{refiner_debug, refiner_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    ApiError, DownloadKind, DownloadedArtifact, EngineError, FailureKind, InterviewQaRequest,
    InterviewQaResponse, Operation, RefineSubmission, RefinementResponse,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` leaves the whole-request timeout to the transport.
    pub request_timeout: Option<Duration>,
    /// Extra attempts after a transient failure. Zero disables retrying.
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_retries: 0,
            retry_backoff: Duration::from_millis(500),
            max_download_bytes: 20 * 1024 * 1024,
        }
    }
}

/// The three backend operations. Each is a single request; callers surface errors.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn refine_resume(
        &self,
        submission: &RefineSubmission,
    ) -> Result<RefinementResponse, ApiError>;

    async fn generate_interview_qa(
        &self,
        request: &InterviewQaRequest,
    ) -> Result<InterviewQaResponse, ApiError>;

    async fn download_artifact(
        &self,
        kind: DownloadKind,
        text: &str,
        file_type: &str,
    ) -> Result<DownloadedArtifact, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let base = parse_base_url(&settings.base_url)?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, operation: Operation, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(operation, FailureKind::InvalidUrl, err.to_string()))
    }

    /// Sends the request built by `build`, retrying transient failures up to
    /// `max_retries` times. Non-2xx responses become `HttpStatus` errors.
    async fn send<F>(&self, operation: Operation, build: F) -> Result<reqwest::Response, ApiError>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let mut attempt = 0u32;
        loop {
            let err = match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    ApiError::new(
                        operation,
                        FailureKind::HttpStatus(status.as_u16()),
                        status.to_string(),
                    )
                }
                Err(err) => map_reqwest_error(operation, err),
            };

            if attempt >= self.settings.max_retries || !err.kind.is_transient() {
                return Err(err);
            }
            attempt += 1;
            refiner_warn!(
                "{} attempt {} failed: {}; retrying in {:?}",
                operation,
                attempt,
                err,
                self.settings.retry_backoff
            );
            tokio::time::sleep(self.settings.retry_backoff).await;
        }
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn refine_resume(
        &self,
        submission: &RefineSubmission,
    ) -> Result<RefinementResponse, ApiError> {
        let operation = Operation::Refinement;
        let url = self.endpoint(operation, "refine-resume")?;
        refiner_debug!(
            "POST {} file={} bytes={} url_mode={} cover_letter={}",
            url,
            submission.file_name,
            submission.file_bytes.len(),
            !submission.job_description_url.is_empty(),
            submission.generate_cover_letter
        );

        let response = self
            .send(operation, || {
                self.client
                    .post(url.clone())
                    .multipart(refine_form(submission))
            })
            .await?;
        decode_json(operation, response).await
    }

    async fn generate_interview_qa(
        &self,
        request: &InterviewQaRequest,
    ) -> Result<InterviewQaResponse, ApiError> {
        let operation = Operation::Generation;
        let url = self.endpoint(operation, "generate-interview-qa")?;
        refiner_debug!(
            "POST {} company={} role={} with_resume={}",
            url,
            request.company_name,
            request.role_title,
            request.resume_text.is_some()
        );

        let response = self
            .send(operation, || self.client.post(url.clone()).json(request))
            .await?;
        decode_json(operation, response).await
    }

    async fn download_artifact(
        &self,
        kind: DownloadKind,
        text: &str,
        file_type: &str,
    ) -> Result<DownloadedArtifact, ApiError> {
        let operation = Operation::Download;
        let url = download_url(&self.base, file_type, text)
            .map_err(|err| ApiError::new(operation, FailureKind::InvalidUrl, err.to_string()))?;
        refiner_debug!("GET download {} as {} ({} chars)", kind, file_type, text.len());

        let response = self
            .send(operation, || self.client.get(url.clone()))
            .await?;

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    operation,
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(operation, err))?;
            let next_len = buffer.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    operation,
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(DownloadedArtifact {
            kind,
            bytes: buffer.freeze(),
            content_type,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, EngineError> {
    let trimmed = raw.trim();
    // `Url::join` replaces the last path segment unless the base ends with '/'.
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let base = Url::parse(&with_slash).map_err(|err| EngineError::BaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
        return Err(EngineError::BaseUrl {
            url: raw.to_string(),
            reason: "expected an http(s) url".to_string(),
        });
    }
    Ok(base)
}

/// `{base}/download-refined-resume/{file_type}?refined_text=<percent-encoded text>`.
fn download_url(base: &Url, file_type: &str, text: &str) -> Result<Url, url::ParseError> {
    let mut url = base.join(&format!(
        "download-refined-resume/{}",
        urlencoding::encode(file_type)
    ))?;
    url.set_query(Some(&format!("refined_text={}", urlencoding::encode(text))));
    Ok(url)
}

fn refine_form(submission: &RefineSubmission) -> Form {
    let file = Part::stream_with_length(
        submission.file_bytes.clone(),
        submission.file_bytes.len() as u64,
    )
    .file_name(submission.file_name.clone());

    Form::new()
        .part("file", file)
        .text("job_description", submission.job_description.clone())
        .text("job_description_url", submission.job_description_url.clone())
        .text(
            "generate_cover_letter",
            submission.generate_cover_letter.to_string(),
        )
}

async fn decode_json<T: DeserializeOwned>(
    operation: Operation,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let body = response
        .bytes()
        .await
        .map_err(|err| map_reqwest_error(operation, err))?;
    serde_json::from_slice(&body)
        .map_err(|err| ApiError::new(operation, FailureKind::InvalidBody, err.to_string()))
}

fn map_reqwest_error(operation: Operation, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(operation, FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(operation, FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(operation, FailureKind::Network, err.to_string())
}
