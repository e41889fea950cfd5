use crate::errors::BoardError;
use crate::state::{DashboardState, ForceBuildBinding};
use crate::types::{force_build_element_id, project_from_force_build_id};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub const FORCE_BUILD_PARAM_KEY: &str = "projectName";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub element_id: String,
}

impl ClickEvent {
    pub fn on(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceBuildRequest {
    pub param_key: String,
    pub project_name: String,
    pub source_element_id: String,
}

pub trait ForceBuildDispatcher: Send + Sync {
    fn force_build(
        &self,
        param_key: &str,
        project_name: &str,
        event: &ClickEvent,
    ) -> Result<(), BoardError>;
}

// Explicit handler object; the project name is a field, not a closure
// capture re-derived from element identity at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceBuildHandler {
    pub project_name: String,
}

impl ForceBuildHandler {
    pub fn for_control(element_id: &str) -> Option<Self> {
        project_from_force_build_id(element_id).map(|project| Self {
            project_name: project.to_string(),
        })
    }

    pub fn fire(
        &self,
        dispatcher: &dyn ForceBuildDispatcher,
        event: &ClickEvent,
    ) -> Result<(), BoardError> {
        dispatcher.force_build(FORCE_BUILD_PARAM_KEY, &self.project_name, event)
    }
}

// Returns true when an armed handler dispatched, false when the control is
// detached (degraded mode swallows clicks).
pub fn route_click(
    state: &DashboardState,
    dispatcher: &dyn ForceBuildDispatcher,
    event: &ClickEvent,
) -> Result<bool, BoardError> {
    let project = project_from_force_build_id(&event.element_id).ok_or_else(|| {
        BoardError::Dispatch(format!(
            "not a force-build control: {}",
            event.element_id
        ))
    })?;
    let panel = state
        .panel(project)
        .ok_or_else(|| BoardError::MissingElement(force_build_element_id(project)))?;

    match &panel.force_build {
        ForceBuildBinding::Detached => Ok(false),
        ForceBuildBinding::Armed(handler) => {
            handler.fire(dispatcher, event)?;
            Ok(true)
        }
    }
}

pub struct ChannelDispatcher {
    sender: UnboundedSender<ForceBuildRequest>,
}

impl ChannelDispatcher {
    pub fn channel() -> (Self, UnboundedReceiver<ForceBuildRequest>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ForceBuildDispatcher for ChannelDispatcher {
    fn force_build(
        &self,
        param_key: &str,
        project_name: &str,
        event: &ClickEvent,
    ) -> Result<(), BoardError> {
        self.sender
            .send(ForceBuildRequest {
                param_key: param_key.to_string(),
                project_name: project_name.to_string(),
                source_element_id: event.element_id.clone(),
            })
            .map_err(|err| BoardError::Dispatch(err.to_string()))
    }
}

#[derive(Default, Clone)]
pub struct FakeDispatcher {
    calls: Arc<Mutex<Vec<ForceBuildRequest>>>,
}

impl FakeDispatcher {
    pub fn calls(&self) -> Vec<ForceBuildRequest> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl ForceBuildDispatcher for FakeDispatcher {
    fn force_build(
        &self,
        param_key: &str,
        project_name: &str,
        event: &ClickEvent,
    ) -> Result<(), BoardError> {
        self.calls.lock().expect("calls lock").push(ForceBuildRequest {
            param_key: param_key.to_string(),
            project_name: project_name.to_string(),
            source_element_id: event.element_id.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        route_click, ChannelDispatcher, ClickEvent, FakeDispatcher, ForceBuildHandler,
        FORCE_BUILD_PARAM_KEY,
    };
    use crate::errors::BoardError;
    use crate::state::{DashboardState, ForceBuildBinding};

    #[test]
    fn handler_derives_project_from_control_id() {
        let handler = ForceBuildHandler::for_control("connectfour_forcebuild").expect("handler");
        assert_eq!(handler.project_name, "connectfour");
        assert!(ForceBuildHandler::for_control("connectfour_bar").is_none());
    }

    #[test]
    fn armed_click_dispatches_with_the_fixed_param_key() {
        let mut state = DashboardState::with_projects(["cc"]).expect("state");
        state.panel_mut("cc").expect("cc").force_build =
            ForceBuildBinding::Armed(ForceBuildHandler {
                project_name: "cc".to_string(),
            });

        let dispatcher = FakeDispatcher::default();
        let fired = route_click(&state, &dispatcher, &ClickEvent::on("cc_forcebuild"))
            .expect("route");
        assert!(fired);

        let calls = dispatcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].param_key, FORCE_BUILD_PARAM_KEY);
        assert_eq!(calls[0].project_name, "cc");
        assert_eq!(calls[0].source_element_id, "cc_forcebuild");
    }

    #[test]
    fn detached_click_produces_no_dispatch() {
        let state = DashboardState::with_projects(["cc"]).expect("state");
        let dispatcher = FakeDispatcher::default();
        let fired = route_click(&state, &dispatcher, &ClickEvent::on("cc_forcebuild"))
            .expect("route");
        assert!(!fired);
        assert!(dispatcher.calls().is_empty());
    }

    #[test]
    fn clicks_on_unknown_controls_fail_loudly() {
        let state = DashboardState::with_projects(["cc"]).expect("state");
        let dispatcher = FakeDispatcher::default();

        let err = route_click(&state, &dispatcher, &ClickEvent::on("ghost_forcebuild"))
            .expect_err("missing element");
        assert!(matches!(err, BoardError::MissingElement(id) if id == "ghost_forcebuild"));

        let err = route_click(&state, &dispatcher, &ClickEvent::on("cc_bar"))
            .expect_err("not a control");
        assert!(matches!(err, BoardError::Dispatch(_)));
    }

    #[test]
    fn channel_dispatcher_is_fire_and_forget() {
        let (dispatcher, mut receiver) = ChannelDispatcher::channel();
        let handler = ForceBuildHandler {
            project_name: "cc".to_string(),
        };
        handler
            .fire(&dispatcher, &ClickEvent::on("cc_forcebuild"))
            .expect("fire");

        let request = receiver.try_recv().expect("queued request");
        assert_eq!(request.project_name, "cc");
        assert_eq!(request.param_key, FORCE_BUILD_PARAM_KEY);
    }
}
