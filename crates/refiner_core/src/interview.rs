use crate::state::{QuestionAnswer, RequestFailure, RequestId};

pub const GENERATION_ERROR_MESSAGE: &str =
    "Failed to generate interview questions. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewRequest {
    pub company_name: String,
    pub role_title: String,
    /// `None` unless the user opted to include their resume.
    pub resume_text: Option<String>,
}

/// Single-stage interview preparation form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterviewSession {
    company_name: String,
    role_title: String,
    include_resume: bool,
    resume_text: String,
    questions: Vec<QuestionAnswer>,
    pending: Option<RequestId>,
    error: Option<String>,
}

impl InterviewSession {
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn role_title(&self) -> &str {
        &self.role_title
    }

    pub fn include_resume(&self) -> bool {
        self.include_resume
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn questions(&self) -> &[QuestionAnswer] {
        &self.questions
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.company_name.is_empty() && !self.role_title.is_empty() && self.pending.is_none()
    }

    pub(crate) fn set_company_name(&mut self, name: String) -> bool {
        replace_if_changed(&mut self.company_name, name)
    }

    pub(crate) fn set_role_title(&mut self, title: String) -> bool {
        replace_if_changed(&mut self.role_title, title)
    }

    pub(crate) fn set_include_resume(&mut self, include: bool) -> bool {
        if self.include_resume == include {
            return false;
        }
        self.include_resume = include;
        true
    }

    /// The text is kept while the checkbox is off; it is only left out of requests.
    pub(crate) fn set_resume_text(&mut self, text: String) -> bool {
        replace_if_changed(&mut self.resume_text, text)
    }

    pub(crate) fn begin_submit(&mut self, request_id: RequestId) -> Option<InterviewRequest> {
        if !self.can_submit() {
            return None;
        }
        self.pending = Some(request_id);
        self.error = None;
        Some(InterviewRequest {
            company_name: self.company_name.clone(),
            role_title: self.role_title.clone(),
            resume_text: self.include_resume.then(|| self.resume_text.clone()),
        })
    }

    /// On failure the previous question list stays visible.
    pub(crate) fn complete_submit(
        &mut self,
        request_id: RequestId,
        outcome: Result<Vec<QuestionAnswer>, RequestFailure>,
    ) -> bool {
        if self.pending != Some(request_id) {
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(questions) => self.questions = questions,
            Err(_) => self.error = Some(GENERATION_ERROR_MESSAGE.to_string()),
        }
        true
    }
}

fn replace_if_changed(slot: &mut String, value: String) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
