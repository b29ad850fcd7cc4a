use std::collections::HashMap;
use std::sync::{mpsc, Arc};

use bytes::Bytes;
use refiner_core::{
    AppState, ArtifactKind, Effect, FileFormat, InterviewRequest, Msg, QuestionAnswer,
    RefineRequest, RefinementResult, RequestFailure, RequestId,
};
use refiner_engine::{
    ApiError, AtomicFileWriter, DownloadKind, DownloadedArtifact, EngineError, EngineEvent,
    EngineHandle, EventSink, FailureKind, InterviewQaRequest, InterviewQaResponse,
    RefineSubmission, RefinementResponse,
};
use refiner_logging::{refiner_error, refiner_info, refiner_warn};

use super::app::LoopEvent;
use super::config::AppConfig;

/// Turns core effects into engine commands.
pub struct EffectRunner {
    engine: EngineHandle,
    downloads: DownloadSaver,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, tx: mpsc::Sender<LoopEvent>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config.client_settings(), Arc::new(MsgSink { tx }))?;
        let downloads = DownloadSaver::new(AtomicFileWriter::new(config.download_dir.clone()));
        Ok(Self { engine, downloads })
    }

    /// Saves a finished download if `state` still waits for it.
    pub fn finish_download(
        &mut self,
        state: &AppState,
        request_id: RequestId,
        result: Result<DownloadedArtifact, ApiError>,
    ) -> Option<Msg> {
        self.downloads.complete(state, request_id, result)
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RefineResume {
                    request_id,
                    request,
                } => {
                    refiner_info!(
                        "RefineResume request_id={} file={} bytes={} cover_letter={}",
                        request_id,
                        request.file.name,
                        request.file.bytes.len(),
                        request.generate_cover_letter
                    );
                    self.engine.refine(request_id, to_submission(request));
                }
                Effect::GenerateInterviewQa {
                    request_id,
                    request,
                } => {
                    refiner_info!(
                        "GenerateInterviewQa request_id={} with_resume={}",
                        request_id,
                        request.resume_text.is_some()
                    );
                    self.engine
                        .generate_interview_qa(request_id, to_interview_request(request));
                }
                Effect::DownloadArtifact {
                    request_id,
                    request,
                } => {
                    refiner_info!(
                        "DownloadArtifact request_id={} file={}",
                        request_id,
                        request.filename
                    );
                    self.downloads.expect(request_id, request.filename);
                    self.engine.download(
                        request_id,
                        to_download_kind(request.kind),
                        request.text,
                        request.format.as_str(),
                    );
                }
            }
        }
    }
}

/// Maps engine completions onto the message loop. Downloads travel as raw
/// artifacts; only the loop knows whether their session is still current.
struct MsgSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl MsgSink {
    fn to_event(&self, event: EngineEvent) -> LoopEvent {
        match event {
            EngineEvent::RefineCompleted { request_id, result } => {
                LoopEvent::Msg(Msg::RefineCompleted {
                    request_id,
                    result: result
                        .map(to_refinement_result)
                        .map_err(|err| to_failure(request_id, err)),
                })
            }
            EngineEvent::InterviewCompleted { request_id, result } => {
                LoopEvent::Msg(Msg::InterviewCompleted {
                    request_id,
                    result: result
                        .map(to_questions)
                        .map_err(|err| to_failure(request_id, err)),
                })
            }
            EngineEvent::DownloadCompleted { request_id, result } => {
                LoopEvent::Download { request_id, result }
            }
        }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(self.to_event(event));
    }
}

/// Writes downloads into the download directory under the name core chose.
struct DownloadSaver {
    writer: AtomicFileWriter,
    names: HashMap<RequestId, String>,
}

impl DownloadSaver {
    fn new(writer: AtomicFileWriter) -> Self {
        Self {
            writer,
            names: HashMap::new(),
        }
    }

    fn expect(&mut self, request_id: RequestId, filename: String) {
        self.names.insert(request_id, filename);
    }

    /// Returns `None`, writing nothing, when the download is no longer pending.
    fn complete(
        &mut self,
        state: &AppState,
        request_id: RequestId,
        result: Result<DownloadedArtifact, ApiError>,
    ) -> Option<Msg> {
        let filename = self.names.remove(&request_id);
        let current = state
            .refine()
            .pending_download()
            .is_some_and(|pending| pending.request_id == request_id);
        let Some(filename) = filename.filter(|_| current) else {
            refiner_info!("Discarding download {} from an abandoned session", request_id);
            return None;
        };

        let result = match result {
            Ok(artifact) => self.save(&filename, &artifact),
            Err(err) => Err(to_failure(request_id, err)),
        };
        Some(Msg::DownloadCompleted { request_id, result })
    }

    fn save(
        &self,
        filename: &str,
        artifact: &DownloadedArtifact,
    ) -> Result<String, RequestFailure> {
        match self.writer.write(filename, &artifact.bytes) {
            Ok(path) => {
                refiner_info!(
                    "Saved {} ({} bytes, {}) to {:?}",
                    artifact.kind,
                    artifact.bytes.len(),
                    artifact.content_type.as_deref().unwrap_or("unknown type"),
                    path
                );
                Ok(path.display().to_string())
            }
            Err(err) => {
                refiner_error!(
                    "Failed to save {} into {:?}: {}",
                    filename,
                    self.writer.dir(),
                    err
                );
                Err(RequestFailure::Storage(err.to_string()))
            }
        }
    }
}

fn to_submission(request: RefineRequest) -> RefineSubmission {
    let job_description = request.job_description_text().to_string();
    let job_description_url = request.job_description_url().to_string();
    RefineSubmission {
        file_name: request.file.name,
        file_bytes: Bytes::from(request.file.bytes),
        job_description,
        job_description_url,
        generate_cover_letter: request.generate_cover_letter,
    }
}

fn to_interview_request(request: InterviewRequest) -> InterviewQaRequest {
    InterviewQaRequest {
        company_name: request.company_name,
        role_title: request.role_title,
        resume_text: request.resume_text,
    }
}

fn to_download_kind(kind: ArtifactKind) -> DownloadKind {
    match kind {
        ArtifactKind::Resume => DownloadKind::Resume,
        ArtifactKind::CoverLetter => DownloadKind::CoverLetter,
    }
}

fn to_refinement_result(response: RefinementResponse) -> RefinementResult {
    RefinementResult {
        source_file_format: FileFormat::from_file_type(&response.file_type),
        refined_resume_text: response.refined_resume,
        match_percentage: response.match_percentage,
        matched_requirements: response.matched_requirements,
        change_descriptions: response.changes,
        cover_letter_text: response.cover_letter,
    }
}

fn to_questions(response: InterviewQaResponse) -> Vec<QuestionAnswer> {
    response
        .questions
        .into_iter()
        .map(|pair| QuestionAnswer {
            question: pair.question,
            answer: pair.answer,
        })
        .collect()
}

/// Users see a fixed message; the details only go to the log.
fn to_failure(request_id: RequestId, err: ApiError) -> RequestFailure {
    refiner_warn!("Request {} failed: {}", request_id, err);
    match err.kind {
        FailureKind::HttpStatus(code) => RequestFailure::HttpStatus(code),
        FailureKind::InvalidBody | FailureKind::TooLarge { .. } => {
            RequestFailure::InvalidResponse(err.to_string())
        }
        FailureKind::InvalidUrl | FailureKind::Timeout | FailureKind::Network => {
            RequestFailure::Transport(err.to_string())
        }
    }
}
