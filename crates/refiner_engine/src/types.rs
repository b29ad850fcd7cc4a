use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub type RequestId = u64;

/// Form fields of `POST /refine-resume`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineSubmission {
    pub file_name: String,
    pub file_bytes: Bytes,
    /// Empty when the URL is sent instead.
    pub job_description: String,
    /// Empty when pasted text is sent instead.
    pub job_description_url: String,
    pub generate_cover_letter: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RefinementResponse {
    pub refined_resume: String,
    pub match_percentage: f64,
    #[serde(default)]
    pub matched_requirements: Vec<String>,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub file_type: String,
}

/// Body of `POST /generate-interview-qa`. `resume_text` serializes as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewQaRequest {
    pub company_name: String,
    pub role_title: String,
    pub resume_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterviewQaResponse {
    pub questions: Vec<QaPair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    Resume,
    CoverLetter,
}

impl fmt::Display for DownloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadKind::Resume => write!(f, "resume"),
            DownloadKind::CoverLetter => write!(f, "cover letter"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub kind: DownloadKind,
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    RefineCompleted {
        request_id: RequestId,
        result: Result<RefinementResponse, ApiError>,
    },
    InterviewCompleted {
        request_id: RequestId,
        result: Result<InterviewQaResponse, ApiError>,
    },
    DownloadCompleted {
        request_id: RequestId,
        result: Result<DownloadedArtifact, ApiError>,
    },
}

/// Which backend operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refinement,
    Generation,
    Download,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Refinement => write!(f, "resume refinement"),
            Operation::Generation => write!(f, "interview generation"),
            Operation::Download => write!(f, "artifact download"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {kind} ({message})")]
pub struct ApiError {
    pub operation: Operation,
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(operation: Operation, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidBody,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl FailureKind {
    /// Failures worth another attempt when retries are configured.
    pub fn is_transient(&self) -> bool {
        match self {
            FailureKind::Network | FailureKind::Timeout => true,
            FailureKind::HttpStatus(code) => *code >= 500,
            FailureKind::InvalidUrl | FailureKind::InvalidBody | FailureKind::TooLarge { .. } => {
                false
            }
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidBody => write!(f, "invalid response body"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}

/// Failures setting up the engine itself, before any request is made.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
