use crate::{
    artifact_filename, ArtifactKind, InputMethod, InterviewSession, Page, RefinementSession,
    StageKind,
};

/// Labels of the refinement stepper, indexed by `StageKind::index`.
pub const STEP_LABELS: [&str; 3] = ["Upload Resume", "Enter Job Description", "Review Results"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub page: Page,
    /// Present only on the refine page.
    pub refine: Option<RefineView>,
    /// Present only on the interview page.
    pub interview: Option<InterviewView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefineView {
    pub stage: StageKind,
    pub active_step: usize,
    pub file_name: Option<String>,
    pub input_method: InputMethod,
    pub job_description: String,
    pub job_description_url: String,
    pub wants_cover_letter: bool,
    pub submit_enabled: bool,
    pub submitting: bool,
    pub error: Option<String>,
    pub review: Option<ReviewView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewView {
    pub match_percentage: f64,
    /// e.g. `82% match with job requirements`.
    pub match_label: String,
    pub matched_requirements: Vec<String>,
    pub changes: Vec<String>,
    pub refined_resume: String,
    pub cover_letter: Option<String>,
    pub resume_filename: String,
    /// Only offered when a cover letter was generated.
    pub cover_letter_filename: Option<String>,
    pub downloading: Option<ArtifactKind>,
    pub last_saved: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewView {
    pub company_name: String,
    pub role_title: String,
    pub include_resume: bool,
    pub resume_text: String,
    pub submit_enabled: bool,
    pub submitting: bool,
    pub error: Option<String>,
    pub questions: Vec<QuestionRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRowView {
    /// `Q<n>: <question>`, numbered from 1.
    pub label: String,
    pub answer: String,
}

impl AppViewModel {
    pub(crate) fn build(
        page: Page,
        refine: &RefinementSession,
        interview: &InterviewSession,
        dirty: bool,
    ) -> Self {
        Self {
            page,
            refine: (page == Page::Refine).then(|| RefineView::from_session(refine)),
            interview: (page == Page::Interview).then(|| InterviewView::from_session(interview)),
            dirty,
        }
    }
}

impl RefineView {
    fn from_session(session: &RefinementSession) -> Self {
        let stage = session.stage_kind();
        let review = session.result().map(|result| {
            let format = result.source_file_format;
            ReviewView {
                match_percentage: result.match_percentage,
                match_label: format!(
                    "{}% match with job requirements",
                    result.match_percentage.round() as u32
                ),
                matched_requirements: result.matched_requirements.clone(),
                changes: result.change_descriptions.clone(),
                refined_resume: result.refined_resume_text.clone(),
                cover_letter: result.cover_letter_text.clone(),
                resume_filename: artifact_filename(ArtifactKind::Resume, format),
                cover_letter_filename: result
                    .cover_letter_text
                    .as_ref()
                    .map(|_| artifact_filename(ArtifactKind::CoverLetter, format)),
                downloading: session.pending_download().map(|pending| pending.kind),
                last_saved: session.last_saved().map(ToOwned::to_owned),
            }
        });

        Self {
            stage,
            active_step: stage.index(),
            file_name: session.selected_file().map(|file| file.name.clone()),
            input_method: session.input_method(),
            job_description: session.job_description().to_string(),
            job_description_url: session.job_description_url().to_string(),
            wants_cover_letter: session.wants_cover_letter(),
            submit_enabled: session.can_submit(),
            submitting: session.is_submitting(),
            error: session.error().map(ToOwned::to_owned),
            review,
        }
    }
}

impl InterviewView {
    fn from_session(session: &InterviewSession) -> Self {
        Self {
            company_name: session.company_name().to_string(),
            role_title: session.role_title().to_string(),
            include_resume: session.include_resume(),
            resume_text: session.resume_text().to_string(),
            submit_enabled: session.can_submit(),
            submitting: session.is_submitting(),
            error: session.error().map(ToOwned::to_owned),
            questions: session
                .questions()
                .iter()
                .enumerate()
                .map(|(index, qa)| QuestionRowView {
                    label: format!("Q{}: {}", index + 1, qa.question),
                    answer: qa.answer.clone(),
                })
                .collect(),
        }
    }
}
