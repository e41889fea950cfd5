use crate::errors::BoardError;
use crate::executer::{PassOutcome, PollPass, StatusExecuter};
use crate::links::LinkBuilder;
use crate::payload::{ProjectStatus, StatusPayload};
use crate::state::DashboardState;
use crate::types::bar_element_id;

pub fn render_record(
    state: &mut DashboardState,
    record: &ProjectStatus,
    link_builder: &dyn LinkBuilder,
) -> Result<(), BoardError> {
    let href = link_builder.detail_link(record);
    let panel = state
        .panel_mut(&record.project_name)
        .ok_or_else(|| BoardError::MissingElement(bar_element_id(&record.project_name)))?;

    // Class renewal is assignment, never addition: a panel carries exactly
    // one class from the status family after every render.
    panel.bar_class = record.dashboard_class();
    panel.last_status_class = record.last_status_class();
    // Layout refresh after the class change; consumed by the next view sync.
    panel.needs_redraw = true;
    panel.link_href = Some(href);
    Ok(())
}

pub struct BarExecuter {
    link_builder: Box<dyn LinkBuilder>,
}

impl BarExecuter {
    pub fn new(link_builder: Box<dyn LinkBuilder>) -> Self {
        Self { link_builder }
    }
}

impl StatusExecuter for BarExecuter {
    fn execute(
        &mut self,
        state: &mut DashboardState,
        pass: &PollPass,
    ) -> Result<PassOutcome, BoardError> {
        let mut outcome = PassOutcome::default();
        let StatusPayload::Projects(records) = &pass.payload else {
            return Ok(outcome);
        };

        // Gap accounting belongs to the reconciler; this leaf only renders.
        for record in records.iter().flatten() {
            render_record(state, record, self.link_builder.as_ref())?;
            outcome.bars_rendered += 1;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{render_record, BarExecuter};
    use crate::errors::BoardError;
    use crate::executer::{PollPass, StatusExecuter};
    use crate::links::DashboardLinkBuilder;
    use crate::payload::{ProjectStatus, StatusPayload};
    use crate::state::DashboardState;
    use crate::types::StatusClass;

    fn record(project: &str, bar: &str, last: &str) -> ProjectStatus {
        ProjectStatus {
            project_name: project.to_string(),
            css_class_name_for_dashboard: bar.to_string(),
            css_class_name_considering_last_status: last.to_string(),
        }
    }

    fn builder() -> DashboardLinkBuilder {
        DashboardLinkBuilder::new("http://cc.example/dashboard")
    }

    #[test]
    fn render_assigns_exactly_one_class_per_element() {
        let mut state = DashboardState::with_projects(["cc"]).expect("state");
        render_record(&mut state, &record("cc", "failed", "building_failed"), &builder())
            .expect("render");

        let panel = state.panel("cc").expect("panel");
        assert_eq!(panel.bar_class, StatusClass::Failed);
        assert_eq!(panel.last_status_class, StatusClass::BuildingFailed);
        assert!(panel.needs_redraw);
        assert_eq!(
            panel.link_href.as_deref(),
            Some("http://cc.example/dashboard/tab/build/detail/cc")
        );

        // A later status replaces the class rather than accumulating.
        render_record(&mut state, &record("cc", "passed", "passed"), &builder())
            .expect("render");
        let panel = state.panel("cc").expect("panel");
        assert_eq!(panel.bar_class, StatusClass::Passed);
        assert_eq!(panel.last_status_class, StatusClass::Passed);
    }

    #[test]
    fn render_is_idempotent() {
        let mut state = DashboardState::with_projects(["cc"]).expect("state");
        let status = record("cc", "building", "building_passed");

        render_record(&mut state, &status, &builder()).expect("first");
        let once = state.clone();
        render_record(&mut state, &status, &builder()).expect("second");
        assert_eq!(state, once);
    }

    #[test]
    fn unregistered_projects_fail_with_the_bar_element_id() {
        let mut state = DashboardState::with_projects(["cc"]).expect("state");
        let err = render_record(&mut state, &record("ghost", "passed", "passed"), &builder())
            .expect_err("missing element");
        assert!(matches!(err, BoardError::MissingElement(id) if id == "ghost_bar"));
    }

    #[test]
    fn executer_renders_present_records_and_counts_gaps() {
        let mut state = DashboardState::with_projects(["a", "b"]).expect("state");
        let mut executer = BarExecuter::new(Box::new(builder()));
        let pass = PollPass {
            seq: 1,
            payload: StatusPayload::Projects(vec![
                None,
                Some(record("a", "passed", "passed")),
                Some(record("b", "queued", "failed")),
            ]),
        };

        let outcome = executer.execute(&mut state, &pass).expect("execute");
        assert_eq!(outcome.bars_rendered, 2);
        assert_eq!(outcome.records_skipped, 0);
        assert_eq!(state.panel("b").expect("b").bar_class, StatusClass::Queued);

        let error_pass = PollPass {
            seq: 2,
            payload: StatusPayload::Error,
        };
        let outcome = executer.execute(&mut state, &error_pass).expect("execute");
        assert_eq!(outcome.bars_rendered, 0);
    }
}
