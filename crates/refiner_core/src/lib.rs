//! Resume refiner core: pure workflow state machines and view-model helpers.
mod effect;
mod interview;
mod msg;
mod refine;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use interview::{InterviewRequest, InterviewSession, GENERATION_ERROR_MESSAGE};
pub use msg::Msg;
pub use refine::{
    DownloadRequest, JobDescriptionSource, PendingDownload, RefineRequest, RefineStage,
    RefinementSession, DOWNLOAD_ERROR_MESSAGE, REFINEMENT_ERROR_MESSAGE,
};
pub use state::{
    artifact_filename, AppState, ArtifactKind, FileFormat, InputMethod, Page, QuestionAnswer,
    RefinementResult, RequestFailure, RequestId, SelectedFile, StageKind,
};
pub use update::update;
pub use view_model::{
    AppViewModel, InterviewView, QuestionRowView, RefineView, ReviewView, STEP_LABELS,
};
