use crate::executer::PassOutcome;
use crate::state::{DashboardState, ForceBuildBinding, ProjectPanel};
use crate::types::{BannerState, StatusClass};
use ratatui::backend::TestBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Terminal;

pub fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Passed => Color::Green,
        StatusClass::Failed => Color::Red,
        StatusClass::Building | StatusClass::BuildingPassed | StatusClass::BuildingFailed => {
            Color::Yellow
        }
        StatusClass::Inactive => Color::DarkGray,
        StatusClass::Queued => Color::Blue,
        StatusClass::Paused => Color::Magenta,
        StatusClass::Unknown => Color::Gray,
    }
}

fn panel_item<'a>(project: &'a str, panel: &'a ProjectPanel) -> ListItem<'a> {
    let force_build = match panel.force_build {
        ForceBuildBinding::Armed(_) => "force-build",
        ForceBuildBinding::Detached => "disabled",
    };
    ListItem::new(Line::from(vec![
        Span::styled(project.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(
            panel.bar_class.as_css(),
            Style::default().fg(status_color(panel.bar_class)),
        ),
        Span::raw(format!(
            " last={} timer={}:{}s [{}] {}",
            panel.last_status_class.as_css(),
            panel.timer.status,
            panel.timer.elapsed_seconds,
            force_build,
            panel.link_href.as_deref().unwrap_or("-"),
        )),
    ]))
}

pub fn render_dashboard(
    state: &DashboardState,
    banner_message: &str,
    seq: u64,
    outcome: &PassOutcome,
    width: u16,
    height: u16,
) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal
        .draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(3)])
                .split(frame.area());

            let banner = match state.banner() {
                BannerState::Shown => Paragraph::new(banner_message.to_string())
                    .style(Style::default().fg(Color::Red)),
                BannerState::Hidden => Paragraph::new("build server reachable")
                    .style(Style::default().fg(Color::DarkGray)),
            };
            frame.render_widget(
                banner.block(Block::default().borders(Borders::ALL).title("Status")),
                chunks[0],
            );

            let items = state
                .panels()
                .map(|(project, panel)| panel_item(project, panel))
                .collect::<Vec<_>>();
            frame.render_widget(
                List::new(items).block(Block::default().borders(Borders::ALL).title("Projects")),
                chunks[1],
            );

            let footer = Paragraph::new(format!(
                "seq={} rendered={} armed={} detached={} timers_reset={} skipped={}",
                seq,
                outcome.bars_rendered,
                outcome.handlers_armed,
                outcome.handlers_detached,
                outcome.timers_reset,
                outcome.records_skipped,
            ));
            frame.render_widget(
                footer.block(Block::default().borders(Borders::ALL).title("Pass")),
                chunks[2],
            );
        })
        .expect("draw");

    let mut out = String::new();
    let buffer = terminal.backend().buffer().clone();
    for y in 0..height {
        for x in 0..width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
