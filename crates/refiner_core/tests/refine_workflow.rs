use std::sync::Once;

use pretty_assertions::assert_eq;
use refiner_core::{
    update, AppState, ArtifactKind, DownloadRequest, Effect, FileFormat, InputMethod,
    JobDescriptionSource, Msg, Page, RefineRequest, RefinementResult, RequestFailure, RequestId,
    SelectedFile, StageKind, DOWNLOAD_ERROR_MESSAGE, REFINEMENT_ERROR_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(refiner_logging::initialize_for_tests);
}

fn resume() -> SelectedFile {
    SelectedFile::new("resume.pdf", b"%PDF-1.7 resume".to_vec())
}

fn on_refine_page() -> AppState {
    let (state, _) = update(AppState::new(), Msg::NavigateTo(Page::Refine));
    state
}

fn describing() -> AppState {
    let (state, _) = update(on_refine_page(), Msg::FileSelected(Some(resume())));
    state
}

fn apply(state: AppState, msgs: Vec<Msg>) -> AppState {
    msgs.into_iter()
        .fold(state, |state, msg| update(state, msg).0)
}

fn submit(state: AppState) -> (AppState, RequestId) {
    let (state, effects) = update(state, Msg::RefineSubmitted);
    match effects.as_slice() {
        [Effect::RefineResume { request_id, .. }] => (state, *request_id),
        other => panic!("expected one refine effect, got {other:?}"),
    }
}

fn backend_result() -> RefinementResult {
    RefinementResult {
        refined_resume_text: "...".to_string(),
        match_percentage: 82.0,
        matched_requirements: vec!["backend".to_string()],
        change_descriptions: vec!["Added keyword: backend".to_string()],
        cover_letter_text: None,
        source_file_format: FileFormat::Pdf,
    }
}

fn reviewing(result: RefinementResult) -> AppState {
    let state = apply(
        describing(),
        vec![Msg::JobDescriptionChanged("Role".to_string())],
    );
    let (state, request_id) = submit(state);
    let (state, _) = update(
        state,
        Msg::RefineCompleted {
            request_id,
            result: Ok(result),
        },
    );
    state
}

#[test]
fn upload_without_file_stays_in_upload() {
    init_logging();
    let mut state = on_refine_page();
    assert!(state.consume_dirty());
    let (mut state, effects) = update(state, Msg::FileSelected(None));

    assert!(effects.is_empty());
    assert_eq!(state.refine().stage_kind(), StageKind::Upload);
    assert!(!state.consume_dirty());
}

#[test]
fn file_selection_advances_to_describe() {
    init_logging();
    let state = describing();
    let view = state.view().refine.expect("refine view");

    assert_eq!(view.stage, StageKind::Describe);
    assert_eq!(view.active_step, 1);
    assert_eq!(view.file_name.as_deref(), Some("resume.pdf"));
    assert!(!view.submit_enabled);
}

#[test]
fn submit_is_impossible_without_job_description() {
    init_logging();
    let state = apply(
        describing(),
        vec![
            Msg::CoverLetterToggled(true),
            Msg::InputMethodChanged(InputMethod::Url),
            Msg::InputMethodChanged(InputMethod::Text),
        ],
    );
    assert!(!state.view().refine.unwrap().submit_enabled);

    let (state, effects) = update(state, Msg::RefineSubmitted);
    assert!(effects.is_empty());
    assert!(!state.refine().is_submitting());
    assert_eq!(state.refine().stage_kind(), StageKind::Describe);
}

#[test]
fn submit_sends_file_text_and_cover_letter_flag() {
    init_logging();
    let state = apply(
        describing(),
        vec![
            Msg::JobDescriptionChanged("Seeking a backend engineer".to_string()),
            Msg::CoverLetterToggled(true),
        ],
    );

    let (state, effects) = update(state, Msg::RefineSubmitted);
    assert_eq!(
        effects,
        vec![Effect::RefineResume {
            request_id: 1,
            request: RefineRequest {
                file: resume(),
                job_description: JobDescriptionSource::Text(
                    "Seeking a backend engineer".to_string()
                ),
                generate_cover_letter: true,
            },
        }]
    );
    let view = state.view().refine.unwrap();
    assert!(view.submitting);
    assert!(!view.submit_enabled);
}

#[test]
fn url_method_sends_url_only() {
    init_logging();
    let state = apply(
        describing(),
        vec![
            Msg::InputMethodChanged(InputMethod::Url),
            Msg::JobDescriptionUrlChanged("https://jobs.example.com/42".to_string()),
        ],
    );

    let (_state, effects) = update(state, Msg::RefineSubmitted);
    let Some(Effect::RefineResume { request, .. }) = effects.first() else {
        panic!("expected refine effect");
    };
    assert_eq!(request.job_description_text(), "");
    assert_eq!(request.job_description_url(), "https://jobs.example.com/42");
}

#[test]
fn second_submit_while_in_flight_is_ignored() {
    init_logging();
    let state = apply(
        describing(),
        vec![Msg::JobDescriptionChanged("Role".to_string())],
    );
    let (state, _) = submit(state);

    let (state, effects) = update(state, Msg::RefineSubmitted);
    assert!(effects.is_empty());
    assert!(state.refine().is_submitting());
}

#[test]
fn success_moves_to_review_with_full_result() {
    init_logging();
    let state = apply(
        describing(),
        vec![Msg::JobDescriptionChanged(
            "Seeking a backend engineer".to_string(),
        )],
    );
    let (state, request_id) = submit(state);

    let (mut state, effects) = update(
        state,
        Msg::RefineCompleted {
            request_id,
            result: Ok(backend_result()),
        },
    );
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(state.refine().stage_kind(), StageKind::Review);
    assert_eq!(state.refine().result(), Some(&backend_result()));
    assert!(!state.refine().is_submitting());

    let view = state.view().refine.unwrap();
    assert_eq!(view.active_step, 2);
    let review = view.review.expect("review view");
    assert!(review.match_label.starts_with("82% match"));
    assert_eq!(review.changes, vec!["Added keyword: backend".to_string()]);
    assert_eq!(review.cover_letter, None);
    assert_eq!(review.cover_letter_filename, None);
    assert_eq!(review.resume_filename, "refined_resume.pdf");

    // A duplicate completion does not transition again.
    let (mut state, _) = update(
        state,
        Msg::RefineCompleted {
            request_id,
            result: Ok(RefinementResult::default()),
        },
    );
    assert!(!state.consume_dirty());
    assert_eq!(state.refine().result(), Some(&backend_result()));
}

#[test]
fn failure_stays_in_describe_with_error() {
    init_logging();
    let state = apply(
        describing(),
        vec![Msg::JobDescriptionChanged("Role".to_string())],
    );
    let (state, request_id) = submit(state);

    let (state, _) = update(
        state,
        Msg::RefineCompleted {
            request_id,
            result: Err(RequestFailure::HttpStatus(500)),
        },
    );
    let view = state.view().refine.unwrap();
    assert_eq!(view.stage, StageKind::Describe);
    assert!(!view.submitting);
    assert!(view.submit_enabled);
    assert_eq!(view.error.as_deref(), Some(REFINEMENT_ERROR_MESSAGE));
    assert_eq!(view.job_description, "Role");

    // Resubmitting clears the error.
    let (state, _) = submit(state);
    assert_eq!(state.refine().error(), None);
}

#[test]
fn completion_for_unknown_request_is_ignored() {
    init_logging();
    let state = apply(
        describing(),
        vec![Msg::JobDescriptionChanged("Role".to_string())],
    );
    let (mut state, request_id) = submit(state);
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::RefineCompleted {
            request_id: request_id + 10,
            result: Ok(backend_result()),
        },
    );
    assert!(!state.consume_dirty());
    assert!(state.refine().is_submitting());
}

#[test]
fn restart_resets_every_field() {
    init_logging();
    let state = reviewing(RefinementResult {
        cover_letter_text: Some("Dear Acme".to_string()),
        ..backend_result()
    });
    let state = apply(state, vec![Msg::DownloadClicked(ArtifactKind::Resume)]);

    let (mut state, effects) = update(state, Msg::RestartClicked);
    assert!(effects.is_empty());
    assert!(state.consume_dirty());

    let session = state.refine();
    assert_eq!(session, &refiner_core::RefinementSession::default());
    assert_eq!(session.stage_kind(), StageKind::Upload);
    assert!(session.selected_file().is_none());
    assert!(session.result().is_none());
    assert_eq!(session.job_description(), "");
    assert_eq!(session.job_description_url(), "");
    assert_eq!(session.input_method(), InputMethod::Text);
    assert!(!session.wants_cover_letter());
    assert_eq!(session.error(), None);
}

#[test]
fn restart_discards_in_flight_submission() {
    init_logging();
    let state = apply(
        describing(),
        vec![Msg::JobDescriptionChanged("Role".to_string())],
    );
    let (state, request_id) = submit(state);
    let (mut state, _) = update(state, Msg::RestartClicked);
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::RefineCompleted {
            request_id,
            result: Ok(backend_result()),
        },
    );
    assert!(!state.consume_dirty());
    assert_eq!(state.refine().stage_kind(), StageKind::Upload);
}

#[test]
fn resume_download_uses_result_format() {
    init_logging();
    let state = reviewing(RefinementResult {
        source_file_format: FileFormat::Docx,
        ..backend_result()
    });

    let (state, effects) = update(state, Msg::DownloadClicked(ArtifactKind::Resume));
    let request_id = match effects.as_slice() {
        [Effect::DownloadArtifact {
            request_id,
            request,
        }] => {
            assert_eq!(
                request,
                &DownloadRequest {
                    kind: ArtifactKind::Resume,
                    text: "...".to_string(),
                    format: FileFormat::Docx,
                    filename: "refined_resume.docx".to_string(),
                }
            );
            *request_id
        }
        other => panic!("expected download effect, got {other:?}"),
    };

    // Only one download at a time.
    let (state, effects) = update(state, Msg::DownloadClicked(ArtifactKind::Resume));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().refine.unwrap().review.unwrap().downloading,
        Some(ArtifactKind::Resume)
    );

    let (state, _) = update(
        state,
        Msg::DownloadCompleted {
            request_id,
            result: Ok("downloads/refined_resume.docx".to_string()),
        },
    );
    let review = state.view().refine.unwrap().review.unwrap();
    assert_eq!(review.downloading, None);
    assert_eq!(
        review.last_saved.as_deref(),
        Some("downloads/refined_resume.docx")
    );
}

#[test]
fn cover_letter_download_only_when_present() {
    init_logging();
    let state = reviewing(backend_result());
    let (state, effects) = update(state, Msg::DownloadClicked(ArtifactKind::CoverLetter));
    assert!(effects.is_empty());
    assert_eq!(state.refine().pending_download(), None);

    let state = reviewing(RefinementResult {
        cover_letter_text: Some("Dear Acme".to_string()),
        ..backend_result()
    });
    let review = state.view().refine.unwrap().review.unwrap();
    assert_eq!(
        review.cover_letter_filename.as_deref(),
        Some("cover_letter.pdf")
    );

    let (_state, effects) = update(state, Msg::DownloadClicked(ArtifactKind::CoverLetter));
    assert!(matches!(
        effects.as_slice(),
        [Effect::DownloadArtifact { request, .. }]
            if request.text == "Dear Acme" && request.filename == "cover_letter.pdf"
    ));
}

#[test]
fn declined_downloads_do_not_consume_request_ids() {
    init_logging();
    // Refine submit took id 1.
    let state = reviewing(backend_result());
    assert!(!state.refine().can_download(ArtifactKind::CoverLetter));
    assert!(state.refine().can_download(ArtifactKind::Resume));

    let (state, effects) = update(state, Msg::DownloadClicked(ArtifactKind::CoverLetter));
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::DownloadClicked(ArtifactKind::Resume));
    assert!(matches!(
        effects.as_slice(),
        [Effect::DownloadArtifact { request_id: 2, .. }]
    ));
    assert!(!state.refine().can_download(ArtifactKind::Resume));

    let (state, effects) = update(state, Msg::DownloadClicked(ArtifactKind::Resume));
    assert!(effects.is_empty());
    let (state, _) = update(
        state,
        Msg::DownloadCompleted {
            request_id: 2,
            result: Ok("downloads/refined_resume.pdf".to_string()),
        },
    );

    let (_state, effects) = update(state, Msg::DownloadClicked(ArtifactKind::Resume));
    assert!(matches!(
        effects.as_slice(),
        [Effect::DownloadArtifact { request_id: 3, .. }]
    ));
}

#[test]
fn download_failure_keeps_review_content() {
    init_logging();
    let state = reviewing(backend_result());
    let (state, effects) = update(state, Msg::DownloadClicked(ArtifactKind::Resume));
    let Some(Effect::DownloadArtifact { request_id, .. }) = effects.first() else {
        panic!("expected download effect");
    };

    let (state, _) = update(
        state,
        Msg::DownloadCompleted {
            request_id: *request_id,
            result: Err(RequestFailure::Transport("connection refused".to_string())),
        },
    );
    let view = state.view().refine.unwrap();
    assert_eq!(view.stage, StageKind::Review);
    assert_eq!(view.error.as_deref(), Some(DOWNLOAD_ERROR_MESSAGE));
    assert_eq!(state.refine().result(), Some(&backend_result()));
}

#[test]
fn refine_messages_are_ignored_off_page() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::FileSelected(Some(resume())),
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert!(state.view().refine.is_none());
    assert_eq!(state.refine().stage_kind(), StageKind::Upload);
}
