use pretty_assertions::assert_eq;
use refiner_core::{
    update, AppState, Effect, InterviewRequest, Msg, Page, QuestionAnswer, RequestFailure,
    GENERATION_ERROR_MESSAGE,
};

fn init_logging() {
    refiner_logging::initialize_for_tests();
}

fn interview_page(msgs: Vec<Msg>) -> AppState {
    let (state, _) = update(AppState::new(), Msg::NavigateTo(Page::Interview));
    msgs.into_iter()
        .fold(state, |state, msg| update(state, msg).0)
}

fn filled() -> AppState {
    interview_page(vec![
        Msg::CompanyNameChanged("Acme".to_string()),
        Msg::RoleTitleChanged("Engineer".to_string()),
    ])
}

fn qa(question: &str, answer: &str) -> QuestionAnswer {
    QuestionAnswer {
        question: question.to_string(),
        answer: answer.to_string(),
    }
}

#[test]
fn submit_disabled_until_company_and_role_are_set() {
    init_logging();
    let cases = [
        ("", ""),
        ("Acme", ""),
        ("", "Engineer"),
    ];
    for (company, role) in cases {
        let state = interview_page(vec![
            Msg::CompanyNameChanged(company.to_string()),
            Msg::RoleTitleChanged(role.to_string()),
        ]);
        assert!(!state.view().interview.unwrap().submit_enabled);
        let (_state, effects) = update(state, Msg::InterviewSubmitted);
        assert!(effects.is_empty(), "company={company:?} role={role:?}");
    }

    assert!(filled().view().interview.unwrap().submit_enabled);
}

#[test]
fn resume_is_omitted_unless_included() {
    init_logging();
    let state = interview_page(vec![
        Msg::CompanyNameChanged("Acme".to_string()),
        Msg::RoleTitleChanged("Engineer".to_string()),
        Msg::IncludeResumeToggled(true),
        Msg::ResumeTextChanged("Ten years of Rust".to_string()),
        Msg::IncludeResumeToggled(false),
    ]);
    assert_eq!(state.interview().resume_text(), "Ten years of Rust");

    let (_state, effects) = update(state, Msg::InterviewSubmitted);
    assert_eq!(
        effects,
        vec![Effect::GenerateInterviewQa {
            request_id: 1,
            request: InterviewRequest {
                company_name: "Acme".to_string(),
                role_title: "Engineer".to_string(),
                resume_text: None,
            },
        }]
    );
}

#[test]
fn resume_is_sent_when_included() {
    init_logging();
    let state = interview_page(vec![
        Msg::CompanyNameChanged("Acme".to_string()),
        Msg::RoleTitleChanged("Engineer".to_string()),
        Msg::IncludeResumeToggled(true),
        Msg::ResumeTextChanged("Ten years of Rust".to_string()),
    ]);

    let (_state, effects) = update(state, Msg::InterviewSubmitted);
    let Some(Effect::GenerateInterviewQa { request, .. }) = effects.first() else {
        panic!("expected interview effect");
    };
    assert_eq!(request.resume_text.as_deref(), Some("Ten years of Rust"));
}

#[test]
fn acme_scenario_renders_one_labeled_entry() {
    init_logging();
    let (state, effects) = update(filled(), Msg::InterviewSubmitted);
    let view = state.view().interview.unwrap();
    assert!(view.submitting);
    assert!(!view.submit_enabled);
    assert!(view.questions.is_empty());

    let Some(Effect::GenerateInterviewQa { request_id, .. }) = effects.first() else {
        panic!("expected interview effect");
    };
    let (state, _) = update(
        state,
        Msg::InterviewCompleted {
            request_id: *request_id,
            result: Ok(vec![qa("Why Acme?", "...")]),
        },
    );

    let view = state.view().interview.unwrap();
    assert!(!view.submitting);
    assert_eq!(view.questions.len(), 1);
    assert_eq!(view.questions[0].label, "Q1: Why Acme?");
    assert_eq!(view.questions[0].answer, "...");
}

#[test]
fn new_questions_replace_previous_list() {
    init_logging();
    let (state, _) = update(filled(), Msg::InterviewSubmitted);
    let (state, _) = update(
        state,
        Msg::InterviewCompleted {
            request_id: 1,
            result: Ok(vec![qa("A?", "a"), qa("B?", "b")]),
        },
    );
    let (state, _) = update(state, Msg::InterviewSubmitted);
    let (state, _) = update(
        state,
        Msg::InterviewCompleted {
            request_id: 2,
            result: Ok(vec![qa("C?", "c")]),
        },
    );

    assert_eq!(state.interview().questions(), &[qa("C?", "c")]);
    assert_eq!(state.view().interview.unwrap().questions[0].label, "Q1: C?");
}

#[test]
fn failure_sets_error_and_keeps_prior_questions() {
    init_logging();
    let (state, _) = update(filled(), Msg::InterviewSubmitted);
    let (state, _) = update(
        state,
        Msg::InterviewCompleted {
            request_id: 1,
            result: Ok(vec![qa("Why Acme?", "...")]),
        },
    );
    let (state, _) = update(state, Msg::InterviewSubmitted);
    let (state, _) = update(
        state,
        Msg::InterviewCompleted {
            request_id: 2,
            result: Err(RequestFailure::HttpStatus(503)),
        },
    );

    let view = state.view().interview.unwrap();
    assert_eq!(view.error.as_deref(), Some(GENERATION_ERROR_MESSAGE));
    assert!(!view.submitting);
    assert!(view.submit_enabled);
    assert_eq!(view.questions.len(), 1);

    // The next submission clears the error.
    let (state, _) = update(state, Msg::InterviewSubmitted);
    assert_eq!(state.interview().error(), None);
}

#[test]
fn duplicate_submit_while_loading_is_ignored() {
    init_logging();
    let (state, effects) = update(filled(), Msg::InterviewSubmitted);
    assert_eq!(effects.len(), 1);
    let (state, effects) = update(state, Msg::InterviewSubmitted);
    assert!(effects.is_empty());
    assert!(state.interview().is_submitting());
}
