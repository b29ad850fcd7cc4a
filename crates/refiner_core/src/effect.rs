use crate::{DownloadRequest, InterviewRequest, RefineRequest, RequestId};

/// Network work requested by `update`; the caller runs it and reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RefineResume {
        request_id: RequestId,
        request: RefineRequest,
    },
    GenerateInterviewQa {
        request_id: RequestId,
        request: InterviewRequest,
    },
    DownloadArtifact {
        request_id: RequestId,
        request: DownloadRequest,
    },
}
