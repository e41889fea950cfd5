pub mod bar;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod executer;
pub mod links;
pub mod logging;
pub mod payload;
pub mod poller;
pub mod reconciler;
pub mod runtime;
pub mod state;
pub mod tui;
pub mod types;

use clap::{error::ErrorKind, CommandFactory, Parser};
use config::{load_config, CliOverrides};
use errors::BoardError;
use poller::PollDriver;
use runtime::BoardRuntime;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "buildboard")]
#[command(about = "Build-status dashboard reconciler")]
pub struct Cli {
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,
    #[arg(long = "payload-file")]
    pub payload_file: Option<std::path::PathBuf>,
    #[arg(long)]
    pub interval: Option<u64>,
    #[arg(long = "link-base")]
    pub link_base: Option<String>,
    #[arg(long, default_value_t = false)]
    pub once: bool,
}

pub fn run() -> Result<i32, BoardError> {
    let args = std::env::args_os().collect::<Vec<_>>();
    let runtime = BoardRuntime::new();
    run_with_runtime(&args, &runtime)
}

pub fn run_with_runtime(
    args: &[std::ffi::OsString],
    runtime: &BoardRuntime,
) -> Result<i32, BoardError> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => return Err(BoardError::Cli(error.to_string())),
        },
    };

    let overrides = CliOverrides {
        config_path: cli.config.clone(),
        payload_file: cli.payload_file.clone(),
        interval_seconds: cli.interval,
        link_base: cli.link_base.clone(),
        once: cli.once,
    };

    let cfg = load_config(&overrides, runtime.file_system.as_ref())?;
    let mut driver = PollDriver::from_config(&cfg)?;

    let Some(payload_file) = &overrides.payload_file else {
        runtime.terminal.write_line(&format!(
            "buildboard initialized: projects={} interval={}s",
            driver.state().project_count(),
            cfg.poller.interval_seconds
        ))?;
        return Ok(0);
    };

    let input = runtime.file_system.read_to_string(payload_file)?;
    let interval = if overrides.once {
        None
    } else {
        Some(Duration::from_secs(cfg.poller.interval_seconds))
    };
    let summary = driver.run_stream(
        runtime.terminal.as_ref(),
        runtime.clock.as_ref(),
        interval,
        &input,
    )?;

    runtime.terminal.write_line(&format!(
        "replay complete: passes={} stale_dropped={} malformed={}",
        summary.passes, summary.stale_dropped, summary.malformed_records
    ))?;
    Ok(0)
}

pub fn render_help() -> String {
    let mut cmd = Cli::command();
    let mut buffer = Vec::new();
    cmd.write_long_help(&mut buffer).expect("write help to vec");
    String::from_utf8(buffer).expect("utf8")
}
