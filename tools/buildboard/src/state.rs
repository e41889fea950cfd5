use crate::dispatch::ForceBuildHandler;
use crate::errors::BoardError;
use crate::types::{profile_element_id, BannerState, StatusClass};
use std::collections::BTreeMap;

pub const TIMER_STATUS_BUILDING: &str = "building";
pub const TIMER_STATUS_NOT_BUILDING: &str = "anystatusbutbuilding";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTimer {
    pub status: &'static str,
    pub elapsed_seconds: u64,
    pub remaining_seconds: u64,
}

impl Default for BuildTimer {
    fn default() -> Self {
        Self {
            status: TIMER_STATUS_NOT_BUILDING,
            elapsed_seconds: 0,
            remaining_seconds: 0,
        }
    }
}

impl BuildTimer {
    pub fn reset_unknown(&mut self) {
        self.status = TIMER_STATUS_NOT_BUILDING;
        self.elapsed_seconds = 0;
        self.remaining_seconds = 0;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ForceBuildBinding {
    #[default]
    Detached,
    Armed(ForceBuildHandler),
}

impl ForceBuildBinding {
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPanel {
    pub bar_class: StatusClass,
    pub last_status_class: StatusClass,
    pub link_href: Option<String>,
    pub timer: BuildTimer,
    pub force_build: ForceBuildBinding,
    pub needs_redraw: bool,
}

impl Default for ProjectPanel {
    fn default() -> Self {
        Self {
            bar_class: StatusClass::Inactive,
            last_status_class: StatusClass::Inactive,
            link_href: None,
            timer: BuildTimer::default(),
            force_build: ForceBuildBinding::Detached,
            needs_redraw: false,
        }
    }
}

impl ProjectPanel {
    pub fn is_building(&self) -> bool {
        self.bar_class.is_building() || self.last_status_class.is_building()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    banner: BannerState,
    panels: BTreeMap<String, ProjectPanel>,
}

impl DashboardState {
    pub fn with_projects<I, S>(projects: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self::default();
        for project in projects {
            state.register_project(project.into())?;
        }
        Ok(state)
    }

    pub fn register_project(&mut self, project: String) -> Result<(), BoardError> {
        if self.panels.contains_key(&project) {
            return Err(BoardError::InvalidConfig(format!(
                "project registered twice: {project}"
            )));
        }
        self.panels.insert(project, ProjectPanel::default());
        Ok(())
    }

    pub fn banner(&self) -> BannerState {
        self.banner
    }

    pub fn show_banner(&mut self) {
        self.banner = BannerState::Shown;
    }

    pub fn hide_banner(&mut self) {
        self.banner = BannerState::Hidden;
    }

    pub fn panel(&self, project: &str) -> Option<&ProjectPanel> {
        self.panels.get(project)
    }

    pub fn panel_mut(&mut self, project: &str) -> Option<&mut ProjectPanel> {
        self.panels.get_mut(project)
    }

    pub fn panels(&self) -> impl Iterator<Item = (&str, &ProjectPanel)> {
        self.panels.iter().map(|(name, panel)| (name.as_str(), panel))
    }

    pub fn project_count(&self) -> usize {
        self.panels.len()
    }

    // Ids of the profile containers currently flagged as building; degraded
    // mode sweeps these to reset their timers.
    pub fn building_profile_ids(&self) -> Vec<String> {
        self.panels
            .iter()
            .filter(|(_, panel)| panel.is_building())
            .map(|(name, _)| profile_element_id(name))
            .collect()
    }

    pub fn detach_all_force_build(&mut self) -> usize {
        let mut detached = 0;
        for panel in self.panels.values_mut() {
            if panel.force_build.is_armed() {
                detached += 1;
            }
            panel.force_build = ForceBuildBinding::Detached;
        }
        detached
    }

    pub fn redraw_pending(&self) -> bool {
        self.panels.values().any(|panel| panel.needs_redraw)
    }

    pub fn clear_redraw_flags(&mut self) {
        for panel in self.panels.values_mut() {
            panel.needs_redraw = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DashboardState, ForceBuildBinding, TIMER_STATUS_NOT_BUILDING};
    use crate::dispatch::ForceBuildHandler;
    use crate::errors::BoardError;
    use crate::types::{BannerState, StatusClass};

    #[test]
    fn duplicate_registration_is_rejected() {
        let err = DashboardState::with_projects(["cc", "cc"]).expect_err("must reject");
        assert!(matches!(err, BoardError::InvalidConfig(message) if message.contains("cc")));
    }

    #[test]
    fn panels_start_inactive_detached_and_hidden() {
        let state = DashboardState::with_projects(["cc"]).expect("state");
        assert_eq!(state.banner(), BannerState::Hidden);
        let panel = state.panel("cc").expect("panel");
        assert_eq!(panel.bar_class, StatusClass::Inactive);
        assert!(!panel.force_build.is_armed());
        assert_eq!(panel.timer.status, TIMER_STATUS_NOT_BUILDING);
        assert!(state.panel("ghost").is_none());
    }

    #[test]
    fn building_profile_ids_cover_bar_and_last_status_classes() {
        let mut state = DashboardState::with_projects(["a", "b", "c"]).expect("state");
        state.panel_mut("a").expect("a").bar_class = StatusClass::Building;
        state.panel_mut("b").expect("b").last_status_class = StatusClass::BuildingFailed;

        assert_eq!(state.building_profile_ids(), vec!["a_profile", "b_profile"]);
    }

    #[test]
    fn detach_counts_only_previously_armed_panels() {
        let mut state = DashboardState::with_projects(["a", "b"]).expect("state");
        state.panel_mut("a").expect("a").force_build =
            ForceBuildBinding::Armed(ForceBuildHandler {
                project_name: "a".to_string(),
            });

        assert_eq!(state.detach_all_force_build(), 1);
        assert!(!state.panel("a").expect("a").force_build.is_armed());
        assert_eq!(state.detach_all_force_build(), 0);
    }

    #[test]
    fn redraw_flags_clear_in_one_sweep() {
        let mut state = DashboardState::with_projects(["a", "b"]).expect("state");
        state.panel_mut("b").expect("b").needs_redraw = true;
        assert!(state.redraw_pending());
        state.clear_redraw_flags();
        assert!(!state.redraw_pending());
    }
}
