use buildboard::executer::PassOutcome;
use buildboard::state::DashboardState;
use buildboard::tui::render_dashboard;
use buildboard::types::StatusClass;

fn state_with(count: usize) -> DashboardState {
    let names = (0..count).map(|i| format!("project-{i:02}"));
    DashboardState::with_projects(names).expect("state")
}

#[test]
fn render_dashboard_zero_width_zero_height() {
    let frame = render_dashboard(
        &state_with(0),
        "down",
        0,
        &PassOutcome::default(),
        0,
        0,
    );
    assert!(frame.is_empty());
}

#[test]
fn render_dashboard_width_1_height_1() {
    let frame = render_dashboard(
        &state_with(1),
        "down",
        1,
        &PassOutcome::default(),
        1,
        1,
    );
    assert!(!frame.is_empty());
}

#[test]
fn render_dashboard_many_projects_small_viewport() {
    let frame = render_dashboard(
        &state_with(50),
        "down",
        1,
        &PassOutcome::default(),
        120,
        10,
    );
    assert!(frame.contains("project-00"));
    assert!(!frame.contains("project-49"));
}

#[test]
fn render_dashboard_shows_every_status_class() {
    let mut state = state_with(4);
    state.panel_mut("project-00").expect("p0").bar_class = StatusClass::Passed;
    state.panel_mut("project-01").expect("p1").bar_class = StatusClass::Failed;
    state.panel_mut("project-02").expect("p2").bar_class = StatusClass::Building;
    state.panel_mut("project-03").expect("p3").bar_class = StatusClass::Queued;

    let frame = render_dashboard(&state, "down", 9, &PassOutcome::default(), 120, 30);
    for class in ["passed", "failed", "building", "queued"] {
        assert!(frame.contains(class), "missing class {class}");
    }
    assert!(frame.contains("seq=9"));
}
