use crate::errors::BoardError;
use crate::payload::StatusPayload;
use crate::state::DashboardState;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPass {
    pub seq: u64,
    pub payload: StatusPayload,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassOutcome {
    pub bars_rendered: usize,
    pub handlers_armed: usize,
    pub handlers_detached: usize,
    pub timers_reset: usize,
    pub records_skipped: usize,
    pub banner_shown: bool,
    pub banner_hidden: bool,
}

impl PassOutcome {
    pub fn merge(&mut self, other: PassOutcome) {
        self.bars_rendered += other.bars_rendered;
        self.handlers_armed += other.handlers_armed;
        self.handlers_detached += other.handlers_detached;
        self.timers_reset += other.timers_reset;
        self.records_skipped += other.records_skipped;
        self.banner_shown |= other.banner_shown;
        self.banner_hidden |= other.banner_hidden;
    }
}

// One payload-rendering strategy. The dashboard runs an ordered list of
// executers over every delivered payload; they cooperate only through the
// shared DashboardState.
pub trait StatusExecuter {
    fn execute(
        &mut self,
        state: &mut DashboardState,
        pass: &PollPass,
    ) -> Result<PassOutcome, BoardError>;
}

pub fn run_executers(
    executers: &mut [Box<dyn StatusExecuter>],
    state: &mut DashboardState,
    pass: &PollPass,
) -> Result<PassOutcome, BoardError> {
    let mut outcome = PassOutcome::default();
    for executer in executers {
        outcome.merge(executer.execute(state, pass)?);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::{run_executers, PassOutcome, PollPass, StatusExecuter};
    use crate::errors::BoardError;
    use crate::payload::StatusPayload;
    use crate::state::DashboardState;

    struct CountingExecuter {
        rendered: usize,
    }

    impl StatusExecuter for CountingExecuter {
        fn execute(
            &mut self,
            _state: &mut DashboardState,
            _pass: &PollPass,
        ) -> Result<PassOutcome, BoardError> {
            Ok(PassOutcome {
                bars_rendered: self.rendered,
                ..PassOutcome::default()
            })
        }
    }

    #[test]
    fn outcomes_merge_across_the_executer_list() {
        let mut executers: Vec<Box<dyn StatusExecuter>> = vec![
            Box::new(CountingExecuter { rendered: 2 }),
            Box::new(CountingExecuter { rendered: 3 }),
        ];
        let mut state = DashboardState::default();
        let pass = PollPass {
            seq: 1,
            payload: StatusPayload::Projects(vec![]),
        };

        let outcome = run_executers(&mut executers, &mut state, &pass).expect("run");
        assert_eq!(outcome.bars_rendered, 5);
    }
}
