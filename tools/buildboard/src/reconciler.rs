use crate::dispatch::ForceBuildHandler;
use crate::errors::BoardError;
use crate::executer::{PassOutcome, PollPass, StatusExecuter};
use crate::payload::{ProjectStatus, StatusPayload};
use crate::state::{DashboardState, ForceBuildBinding};
use crate::types::{force_build_element_id, project_from_profile_id, BannerState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilerStats {
    pub degraded_episodes: u64,
    pub recoveries: u64,
}

#[derive(Debug, Default)]
pub struct StatusReconciler {
    pub stats: ReconcilerStats,
}

impl StatusReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    fn enter_degraded(
        &mut self,
        state: &mut DashboardState,
    ) -> Result<PassOutcome, BoardError> {
        let mut outcome = PassOutcome::default();
        if state.banner() == BannerState::Hidden {
            outcome.banner_shown = true;
            self.stats.degraded_episodes += 1;
        }
        state.show_banner();

        // Status is unknown now; anything mid-build loses its elapsed display.
        for profile_id in state.building_profile_ids() {
            let Some(project) = project_from_profile_id(&profile_id) else {
                continue;
            };
            let Some(panel) = state.panel_mut(project) else {
                continue;
            };
            panel.timer.reset_unknown();
            panel.needs_redraw = true;
            outcome.timers_reset += 1;
        }

        outcome.handlers_detached = state.detach_all_force_build();
        Ok(outcome)
    }

    fn reconcile_projects(
        &mut self,
        state: &mut DashboardState,
        records: &[Option<ProjectStatus>],
    ) -> Result<PassOutcome, BoardError> {
        let mut outcome = PassOutcome::default();
        if state.banner() == BannerState::Shown {
            state.hide_banner();
            outcome.banner_hidden = true;
            self.stats.recoveries += 1;
        }
        if records.is_empty() {
            return Ok(outcome);
        }

        // Re-arming is idempotent and runs every non-error cycle.
        for record in records {
            let Some(record) = record else {
                outcome.records_skipped += 1;
                continue;
            };
            let control_id = force_build_element_id(&record.project_name);
            let handler = ForceBuildHandler::for_control(&control_id)
                .ok_or_else(|| BoardError::MissingElement(control_id.clone()))?;
            let panel = state
                .panel_mut(&record.project_name)
                .ok_or_else(|| BoardError::MissingElement(control_id))?;
            panel.force_build = ForceBuildBinding::Armed(handler);
            outcome.handlers_armed += 1;
        }
        Ok(outcome)
    }
}

impl StatusExecuter for StatusReconciler {
    fn execute(
        &mut self,
        state: &mut DashboardState,
        pass: &PollPass,
    ) -> Result<PassOutcome, BoardError> {
        match &pass.payload {
            StatusPayload::Error => self.enter_degraded(state),
            StatusPayload::Projects(records) => self.reconcile_projects(state, records),
        }
    }
}
