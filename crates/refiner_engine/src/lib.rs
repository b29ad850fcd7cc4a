//! Resume refiner engine: backend API client and effect execution.
mod client;
mod engine;
mod persist;
mod types;

pub use client::{ApiClient, ClientSettings, ReqwestApiClient, DEFAULT_BASE_URL};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    ApiError, DownloadKind, DownloadedArtifact, EngineError, EngineEvent, FailureKind,
    InterviewQaRequest, InterviewQaResponse, Operation, QaPair, RefineSubmission,
    RefinementResponse, RequestId,
};
