use std::fmt;

use crate::interview::InterviewSession;
use crate::refine::RefinementSession;
use crate::view_model::AppViewModel;

/// Identifies one network effect; completions echo it back.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Refine,
    Interview,
}

/// A resume file chosen by the user, held in memory until submitted.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMethod {
    #[default]
    Text,
    Url,
}

/// Document format the backend renders downloads in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    #[default]
    Pdf,
    Docx,
}

impl FileFormat {
    /// Maps the backend's `file_type`: `docx` is Docx, anything else is Pdf.
    pub fn from_file_type(file_type: &str) -> Self {
        if file_type.trim().eq_ignore_ascii_case("docx") {
            FileFormat::Docx
        } else {
            FileFormat::Pdf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Pdf => "pdf",
            FileFormat::Docx => "docx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Resume,
    CoverLetter,
}

impl ArtifactKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            ArtifactKind::Resume => "refined_resume",
            ArtifactKind::CoverLetter => "cover_letter",
        }
    }
}

/// Download filename: `refined_resume.<ext>` or `cover_letter.<ext>`.
pub fn artifact_filename(kind: ArtifactKind, format: FileFormat) -> String {
    format!("{}.{}", kind.file_stem(), format.as_str())
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefinementResult {
    pub refined_resume_text: String,
    pub match_percentage: f64,
    pub matched_requirements: Vec<String>,
    pub change_descriptions: Vec<String>,
    pub cover_letter_text: Option<String>,
    pub source_file_format: FileFormat,
}

impl RefinementResult {
    /// Clamps the match score into `[0, 100]` and treats a blank cover letter as absent.
    pub fn normalized(mut self) -> Self {
        self.match_percentage = if self.match_percentage.is_nan() {
            0.0
        } else {
            self.match_percentage.clamp(0.0, 100.0)
        };
        if self
            .cover_letter_text
            .as_deref()
            .is_some_and(|text| text.trim().is_empty())
        {
            self.cover_letter_text = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// Why a network effect failed. The detail is for logs; users see a fixed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    Transport(String),
    HttpStatus(u16),
    InvalidResponse(String),
    /// The response arrived but could not be saved locally.
    Storage(String),
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Transport(detail) => write!(f, "transport error: {detail}"),
            RequestFailure::HttpStatus(code) => write!(f, "http status {code}"),
            RequestFailure::InvalidResponse(detail) => write!(f, "invalid response: {detail}"),
            RequestFailure::Storage(detail) => write!(f, "could not save file: {detail}"),
        }
    }
}

/// Position in the three-step refinement workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Upload,
    Describe,
    Review,
}

impl StageKind {
    pub fn index(self) -> usize {
        match self {
            StageKind::Upload => 0,
            StageKind::Describe => 1,
            StageKind::Review => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    page: Page,
    refine: RefinementSession,
    interview: InterviewSession,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn refine(&self) -> &RefinementSession {
        &self.refine
    }

    pub fn interview(&self) -> &InterviewSession {
        &self.interview
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self.page, &self.refine, &self.interview, self.dirty)
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn refine_mut(&mut self) -> &mut RefinementSession {
        &mut self.refine
    }

    pub(crate) fn interview_mut(&mut self) -> &mut InterviewSession {
        &mut self.interview
    }

    /// Ids are never reused, so a completion from a discarded session cannot
    /// match a request of its replacement.
    pub(crate) fn issue_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    /// Switches page, giving the entered page fresh sessions. Re-entering the
    /// current page keeps its state.
    pub(crate) fn navigate(&mut self, page: Page) -> bool {
        if self.page == page {
            return false;
        }
        self.page = page;
        self.refine = RefinementSession::default();
        self.interview = InterviewSession::default();
        true
    }
}
