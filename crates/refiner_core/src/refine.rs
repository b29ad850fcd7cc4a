//! Refinement workflow: Upload -> Describe -> Review, with restart back to Upload.

use crate::state::{
    artifact_filename, ArtifactKind, FileFormat, InputMethod, RefinementResult, RequestFailure,
    RequestId, SelectedFile, StageKind,
};

pub const REFINEMENT_ERROR_MESSAGE: &str = "Failed to refine resume. Please try again later.";
pub const DOWNLOAD_ERROR_MESSAGE: &str = "Failed to download file. Please try again.";

/// Stage of the workflow together with the data only valid in that stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RefineStage {
    #[default]
    Upload,
    Describe {
        file: SelectedFile,
        /// Set while the refine call is in flight.
        pending: Option<RequestId>,
    },
    Review {
        file: SelectedFile,
        result: RefinementResult,
        download: Option<PendingDownload>,
        last_saved: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDownload {
    pub request_id: RequestId,
    pub kind: ArtifactKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobDescriptionSource {
    Text(String),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineRequest {
    pub file: SelectedFile,
    pub job_description: JobDescriptionSource,
    pub generate_cover_letter: bool,
}

impl RefineRequest {
    /// Value of the `job_description` form field; empty when a URL is sent.
    pub fn job_description_text(&self) -> &str {
        match &self.job_description {
            JobDescriptionSource::Text(text) => text,
            JobDescriptionSource::Url(_) => "",
        }
    }

    /// Value of the `job_description_url` form field; empty when text is sent.
    pub fn job_description_url(&self) -> &str {
        match &self.job_description {
            JobDescriptionSource::Text(_) => "",
            JobDescriptionSource::Url(url) => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub kind: ArtifactKind,
    pub text: String,
    pub format: FileFormat,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefinementSession {
    stage: RefineStage,
    input_method: InputMethod,
    job_description: String,
    job_description_url: String,
    wants_cover_letter: bool,
    error: Option<String>,
}

impl RefinementSession {
    pub fn stage(&self) -> &RefineStage {
        &self.stage
    }

    pub fn stage_kind(&self) -> StageKind {
        match self.stage {
            RefineStage::Upload => StageKind::Upload,
            RefineStage::Describe { .. } => StageKind::Describe,
            RefineStage::Review { .. } => StageKind::Review,
        }
    }

    pub fn input_method(&self) -> InputMethod {
        self.input_method
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn job_description_url(&self) -> &str {
        &self.job_description_url
    }

    pub fn wants_cover_letter(&self) -> bool {
        self.wants_cover_letter
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        match &self.stage {
            RefineStage::Upload => None,
            RefineStage::Describe { file, .. } | RefineStage::Review { file, .. } => Some(file),
        }
    }

    pub fn result(&self) -> Option<&RefinementResult> {
        match &self.stage {
            RefineStage::Review { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(
            self.stage,
            RefineStage::Describe {
                pending: Some(_),
                ..
            }
        )
    }

    pub fn pending_download(&self) -> Option<PendingDownload> {
        match self.stage {
            RefineStage::Review { download, .. } => download,
            _ => None,
        }
    }

    pub fn last_saved(&self) -> Option<&str> {
        match &self.stage {
            RefineStage::Review { last_saved, .. } => last_saved.as_deref(),
            _ => None,
        }
    }

    /// The job description to send: the active method's field when filled,
    /// otherwise the other field when filled.
    pub fn job_description_source(&self) -> Option<JobDescriptionSource> {
        let text = (!self.job_description.is_empty())
            .then(|| JobDescriptionSource::Text(self.job_description.clone()));
        let url = (!self.job_description_url.is_empty())
            .then(|| JobDescriptionSource::Url(self.job_description_url.clone()));
        match self.input_method {
            InputMethod::Text => text.or(url),
            InputMethod::Url => url.or(text),
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.stage, RefineStage::Describe { pending: None, .. })
            && self.job_description_source().is_some()
    }

    /// Review is showing, nothing is downloading, and the artifact exists.
    pub fn can_download(&self, kind: ArtifactKind) -> bool {
        match &self.stage {
            RefineStage::Review {
                result,
                download: None,
                ..
            } => match kind {
                ArtifactKind::Resume => true,
                ArtifactKind::CoverLetter => result.cover_letter_text.is_some(),
            },
            _ => false,
        }
    }

    /// Accepts a selection while uploading. `None` (dialog dismissed) keeps the stage.
    pub(crate) fn select_file(&mut self, file: Option<SelectedFile>) -> bool {
        match (&self.stage, file) {
            (RefineStage::Upload, Some(file)) => {
                self.stage = RefineStage::Describe {
                    file,
                    pending: None,
                };
                self.error = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_input_method(&mut self, method: InputMethod) -> bool {
        if !self.is_describing() || self.input_method == method {
            return false;
        }
        self.input_method = method;
        true
    }

    pub(crate) fn set_job_description(&mut self, text: String) -> bool {
        if !self.is_describing() || self.job_description == text {
            return false;
        }
        self.job_description = text;
        true
    }

    pub(crate) fn set_job_description_url(&mut self, url: String) -> bool {
        if !self.is_describing() || self.job_description_url == url {
            return false;
        }
        self.job_description_url = url;
        true
    }

    pub(crate) fn set_wants_cover_letter(&mut self, wanted: bool) -> bool {
        if !self.is_describing() || self.wants_cover_letter == wanted {
            return false;
        }
        self.wants_cover_letter = wanted;
        true
    }

    pub(crate) fn begin_submit(&mut self, request_id: RequestId) -> Option<RefineRequest> {
        if !self.can_submit() {
            return None;
        }
        let job_description = self.job_description_source()?;
        let generate_cover_letter = self.wants_cover_letter;
        match &mut self.stage {
            RefineStage::Describe { file, pending } => {
                *pending = Some(request_id);
                self.error = None;
                Some(RefineRequest {
                    file: file.clone(),
                    job_description,
                    generate_cover_letter,
                })
            }
            _ => None,
        }
    }

    /// Applies the refine call's outcome if it belongs to the in-flight request.
    pub(crate) fn complete_submit(
        &mut self,
        request_id: RequestId,
        outcome: Result<RefinementResult, RequestFailure>,
    ) -> bool {
        let RefineStage::Describe { pending, .. } = &mut self.stage else {
            return false;
        };
        if *pending != Some(request_id) {
            return false;
        }
        *pending = None;

        match outcome {
            Ok(result) => {
                if let RefineStage::Describe { file, .. } = std::mem::take(&mut self.stage) {
                    self.stage = RefineStage::Review {
                        file,
                        result: result.normalized(),
                        download: None,
                        last_saved: None,
                    };
                }
                self.error = None;
            }
            Err(_) => {
                self.error = Some(REFINEMENT_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    /// Starts a download unless one is already in flight or the artifact is absent.
    pub(crate) fn begin_download(
        &mut self,
        kind: ArtifactKind,
        request_id: RequestId,
    ) -> Option<DownloadRequest> {
        let RefineStage::Review {
            result, download, ..
        } = &mut self.stage
        else {
            return None;
        };
        if download.is_some() {
            return None;
        }
        let text = match kind {
            ArtifactKind::Resume => result.refined_resume_text.clone(),
            ArtifactKind::CoverLetter => result.cover_letter_text.clone()?,
        };
        let format = result.source_file_format;
        *download = Some(PendingDownload { request_id, kind });
        self.error = None;
        Some(DownloadRequest {
            kind,
            text,
            format,
            filename: artifact_filename(kind, format),
        })
    }

    /// `saved` is where the artifact ended up; failures never leave Review.
    pub(crate) fn complete_download(
        &mut self,
        request_id: RequestId,
        outcome: Result<String, RequestFailure>,
    ) -> bool {
        let RefineStage::Review {
            download,
            last_saved,
            ..
        } = &mut self.stage
        else {
            return false;
        };
        if download.map(|pending| pending.request_id) != Some(request_id) {
            return false;
        }
        *download = None;
        match outcome {
            Ok(saved) => *last_saved = Some(saved),
            Err(_) => self.error = Some(DOWNLOAD_ERROR_MESSAGE.to_string()),
        }
        true
    }

    pub(crate) fn restart(&mut self) -> bool {
        *self = Self::default();
        true
    }

    fn is_describing(&self) -> bool {
        matches!(self.stage, RefineStage::Describe { .. })
    }
}
