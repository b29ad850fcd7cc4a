use crate::{AppState, Effect, InterviewSession, Msg, Page, RefinementSession};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::NavigateTo(page) => {
            if state.navigate(page) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FileSelected(file) => {
            on_refine(&mut state, |session| session.select_file(file));
            Vec::new()
        }
        Msg::InputMethodChanged(method) => {
            on_refine(&mut state, |session| session.set_input_method(method));
            Vec::new()
        }
        Msg::JobDescriptionChanged(text) => {
            on_refine(&mut state, |session| session.set_job_description(text));
            Vec::new()
        }
        Msg::JobDescriptionUrlChanged(url) => {
            on_refine(&mut state, |session| session.set_job_description_url(url));
            Vec::new()
        }
        Msg::CoverLetterToggled(wanted) => {
            on_refine(&mut state, |session| session.set_wants_cover_letter(wanted));
            Vec::new()
        }
        Msg::RefineSubmitted => {
            // A disabled submit never reaches the network and never burns an id.
            if state.page() != Page::Refine || !state.refine().can_submit() {
                return (state, Vec::new());
            }
            let request_id = state.issue_request_id();
            match state.refine_mut().begin_submit(request_id) {
                Some(request) => {
                    state.mark_dirty();
                    vec![Effect::RefineResume {
                        request_id,
                        request,
                    }]
                }
                None => Vec::new(),
            }
        }
        Msg::RefineCompleted { request_id, result } => {
            if state.refine_mut().complete_submit(request_id, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DownloadClicked(kind) => {
            if state.page() != Page::Refine || !state.refine().can_download(kind) {
                return (state, Vec::new());
            }
            let request_id = state.issue_request_id();
            match state.refine_mut().begin_download(kind, request_id) {
                Some(request) => {
                    state.mark_dirty();
                    vec![Effect::DownloadArtifact {
                        request_id,
                        request,
                    }]
                }
                None => Vec::new(),
            }
        }
        Msg::DownloadCompleted { request_id, result } => {
            if state.refine_mut().complete_download(request_id, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RestartClicked => {
            on_refine(&mut state, RefinementSession::restart);
            Vec::new()
        }
        Msg::CompanyNameChanged(name) => {
            on_interview(&mut state, |session| session.set_company_name(name));
            Vec::new()
        }
        Msg::RoleTitleChanged(title) => {
            on_interview(&mut state, |session| session.set_role_title(title));
            Vec::new()
        }
        Msg::IncludeResumeToggled(include) => {
            on_interview(&mut state, |session| session.set_include_resume(include));
            Vec::new()
        }
        Msg::ResumeTextChanged(text) => {
            on_interview(&mut state, |session| session.set_resume_text(text));
            Vec::new()
        }
        Msg::InterviewSubmitted => {
            if state.page() != Page::Interview || !state.interview().can_submit() {
                return (state, Vec::new());
            }
            let request_id = state.issue_request_id();
            match state.interview_mut().begin_submit(request_id) {
                Some(request) => {
                    state.mark_dirty();
                    vec![Effect::GenerateInterviewQa {
                        request_id,
                        request,
                    }]
                }
                None => Vec::new(),
            }
        }
        Msg::InterviewCompleted { request_id, result } => {
            if state.interview_mut().complete_submit(request_id, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Applies a refinement transition when the refine page is showing.
fn on_refine(state: &mut AppState, apply: impl FnOnce(&mut RefinementSession) -> bool) {
    if state.page() == Page::Refine && apply(state.refine_mut()) {
        state.mark_dirty();
    }
}

fn on_interview(state: &mut AppState, apply: impl FnOnce(&mut InterviewSession) -> bool) {
    if state.page() == Page::Interview && apply(state.interview_mut()) {
        state.mark_dirty();
    }
}
