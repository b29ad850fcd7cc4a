use crate::{
    ArtifactKind, InputMethod, Page, QuestionAnswer, RefinementResult, RequestFailure, RequestId,
    SelectedFile,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User switched page; the entered page starts with fresh sessions.
    NavigateTo(Page),
    /// User picked a resume file, or dismissed the picker (`None`).
    FileSelected(Option<SelectedFile>),
    InputMethodChanged(InputMethod),
    JobDescriptionChanged(String),
    JobDescriptionUrlChanged(String),
    CoverLetterToggled(bool),
    /// User clicked "Refine Resume".
    RefineSubmitted,
    /// Engine completion for a refine call.
    RefineCompleted {
        request_id: RequestId,
        result: Result<RefinementResult, RequestFailure>,
    },
    /// User asked for an artifact download in Review.
    DownloadClicked(ArtifactKind),
    /// Download finished; `Ok` carries where the file was saved.
    DownloadCompleted {
        request_id: RequestId,
        result: Result<String, RequestFailure>,
    },
    /// User clicked "Start New Refinement".
    RestartClicked,
    CompanyNameChanged(String),
    RoleTitleChanged(String),
    IncludeResumeToggled(bool),
    ResumeTextChanged(String),
    /// User clicked "Generate Questions".
    InterviewSubmitted,
    /// Engine completion for an interview Q&A call.
    InterviewCompleted {
        request_id: RequestId,
        result: Result<Vec<QuestionAnswer>, RequestFailure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for unrecognised input.
    NoOp,
}
