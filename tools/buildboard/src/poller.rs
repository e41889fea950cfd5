use crate::bar::BarExecuter;
use crate::config::AppConfig;
use crate::dispatch::{route_click, ClickEvent, ForceBuildDispatcher};
use crate::errors::BoardError;
use crate::executer::{run_executers, PassOutcome, PollPass, StatusExecuter};
use crate::links::DashboardLinkBuilder;
use crate::logging::{structured_fallback_line, JsonlLogger, LogEvent};
use crate::payload::{parse_payload, parse_payload_lines};
use crate::reconciler::StatusReconciler;
use crate::runtime::{Clock, Terminal};
use crate::state::DashboardState;
use crate::tui::render_dashboard;
use crate::types::BannerState;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const FRAME_WIDTH: u16 = 120;
pub const FRAME_HEIGHT: u16 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub seq: u64,
    pub stale: bool,
    pub banner: BannerState,
    pub outcome: PassOutcome,
    pub malformed_records: usize,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub passes: u64,
    pub stale_dropped: u64,
    pub malformed_records: u64,
}

pub struct PollDriver {
    state: DashboardState,
    executers: Vec<Box<dyn StatusExecuter>>,
    banner_message: String,
    logger: Option<JsonlLogger>,
    drop_stale: bool,
    last_applied_seq: u64,
}

impl PollDriver {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, BoardError> {
        let state = DashboardState::with_projects(cfg.dashboard.projects.iter().cloned())?;
        let link_builder = DashboardLinkBuilder::new(cfg.dashboard.link_base.clone());
        let executers: Vec<Box<dyn StatusExecuter>> = vec![
            Box::new(StatusReconciler::new()),
            Box::new(BarExecuter::new(Box::new(link_builder))),
        ];
        Ok(Self {
            state,
            executers,
            banner_message: cfg.banner.message.clone(),
            logger: cfg.logging.pass_log.as_ref().map(JsonlLogger::new),
            drop_stale: cfg.poller.drop_stale,
            last_applied_seq: 0,
        })
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn click(
        &self,
        dispatcher: &dyn ForceBuildDispatcher,
        event: &ClickEvent,
    ) -> Result<bool, BoardError> {
        route_click(&self.state, dispatcher, event)
    }

    pub fn run_pass(
        &mut self,
        terminal: &dyn Terminal,
        seq: u64,
        raw: &Value,
    ) -> Result<PassSummary, BoardError> {
        if self.drop_stale && seq <= self.last_applied_seq {
            let summary = PassSummary {
                seq,
                stale: true,
                banner: self.state.banner(),
                outcome: PassOutcome::default(),
                malformed_records: 0,
                diagnostics: vec![format!(
                    "stale payload dropped: seq {seq} <= {}",
                    self.last_applied_seq
                )],
            };
            self.log_pass(&summary)?;
            return Ok(summary);
        }

        let parsed = parse_payload(raw)?;
        let pass = PollPass {
            seq,
            payload: parsed.payload,
        };
        let outcome = run_executers(&mut self.executers, &mut self.state, &pass)?;
        self.last_applied_seq = seq;

        let summary = PassSummary {
            seq,
            stale: false,
            banner: self.state.banner(),
            outcome,
            malformed_records: parsed.malformed_records,
            diagnostics: parsed.diagnostics,
        };
        self.log_pass(&summary)?;
        self.sync_view(terminal, &summary)?;
        Ok(summary)
    }

    pub fn run_stream(
        &mut self,
        terminal: &dyn Terminal,
        clock: &dyn Clock,
        interval: Option<Duration>,
        input: &str,
    ) -> Result<StreamSummary, BoardError> {
        let payloads = parse_payload_lines(input)?;
        let mut summary = StreamSummary::default();
        for (index, raw) in payloads.iter().enumerate() {
            if index > 0 {
                if let Some(interval) = interval {
                    clock.sleep_until(clock.now() + interval)?;
                }
            }
            let pass = self.run_pass(terminal, (index as u64) + 1, raw)?;
            summary.passes += 1;
            if pass.stale {
                summary.stale_dropped += 1;
            }
            summary.malformed_records += pass.malformed_records as u64;
        }
        Ok(summary)
    }

    fn log_pass(&self, summary: &PassSummary) -> Result<(), BoardError> {
        let Some(logger) = &self.logger else {
            return Ok(());
        };
        let payload =
            serde_json::to_value(summary).map_err(|e| BoardError::Io(e.to_string()))?;
        logger.append(&LogEvent {
            level: "info",
            event_type: "pass",
            payload,
        })
    }

    // One explicit render step from state to view; the state is never read
    // back out of the terminal.
    fn sync_view(
        &mut self,
        terminal: &dyn Terminal,
        summary: &PassSummary,
    ) -> Result<(), BoardError> {
        if terminal.stdin_is_tty() {
            let frame = render_dashboard(
                &self.state,
                &self.banner_message,
                summary.seq,
                &summary.outcome,
                FRAME_WIDTH,
                FRAME_HEIGHT,
            );
            terminal.draw(&frame)?;
        } else {
            for (project, panel) in self.state.panels() {
                terminal.write_line(&structured_fallback_line(
                    project,
                    panel.bar_class.as_css(),
                    &format!(
                        "last={} armed={}",
                        panel.last_status_class.as_css(),
                        panel.force_build.is_armed()
                    ),
                ))?;
            }
        }
        self.state.clear_redraw_flags();
        Ok(())
    }
}
