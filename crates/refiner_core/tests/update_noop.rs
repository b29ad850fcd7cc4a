use refiner_core::{update, AppState, Msg, Page};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn tick_leaves_state_clean() {
    let (mut state, _) = update(AppState::new(), Msg::NavigateTo(Page::Refine));
    assert!(state.consume_dirty());

    let (mut next, effects) = update(state, Msg::Tick);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
