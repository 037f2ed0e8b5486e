use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use serde_json::json;
use studydesk_core::{
    format_clock, Config, Event, SessionController, SessionDriver, SessionMode, SessionStats,
};
use tracing::{debug, info};

#[derive(Subcommand)]
pub enum TimerAction {
    /// List modes with their configured durations
    Modes,
    /// Run a live countdown on the wall clock
    Run {
        /// Mode to start in (focus, short, long)
        #[arg(long, default_value = "focus")]
        mode: SessionMode,
        /// Number of phases to run before exiting
        #[arg(long, default_value_t = 1)]
        phases: u32,
        /// Override the tick period in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
        /// Emit every event as a JSON line
        #[arg(long)]
        json: bool,
    },
    /// Step the controller a number of ticks without a clock
    Simulate {
        /// Ticks to deliver
        #[arg(long)]
        ticks: u64,
        /// Mode to start in (focus, short, long)
        #[arg(long, default_value = "focus")]
        mode: SessionMode,
        /// Start the next phase automatically after each completion
        #[arg(long)]
        auto_start: bool,
    },
}

pub fn run(action: TimerAction) -> anyhow::Result<()> {
    let config = Config::load()?;

    match action {
        TimerAction::Modes => {
            let durations = config.durations()?;
            let modes: Vec<_> = SessionMode::ALL
                .iter()
                .map(|mode| {
                    json!({
                        "mode": mode,
                        "label": mode.label(),
                        "emoji": mode.emoji(),
                        "color": mode.accent_color(),
                        "duration": format_clock(durations.duration(*mode)),
                        "duration_secs": durations.duration(*mode),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&modes)?);
        }
        TimerAction::Run {
            mode,
            phases,
            tick_ms,
            json,
        } => {
            let period = tick_ms
                .map(|ms| Duration::from_millis(ms.max(1)))
                .unwrap_or_else(|| config.tick_period());
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_live(&config, mode, phases, period, json))?;
        }
        TimerAction::Simulate {
            ticks,
            mode,
            auto_start,
        } => {
            let controller = simulate(config.controller()?, mode, ticks, auto_start);
            print_summary(&controller, &config)?;
        }
    }
    Ok(())
}

async fn run_live(
    config: &Config,
    mode: SessionMode,
    phases: u32,
    period: Duration,
    json: bool,
) -> anyhow::Result<()> {
    let mut driver = SessionDriver::new(config.controller()?, period);
    if mode != SessionMode::Focus {
        driver.switch_mode(mode);
    }
    info!(?mode, phases, period_ms = period.as_millis() as u64, "timer run");

    let mut done = 0;
    if phases > 0 {
        emit(&driver.toggle_running(), json)?;
    }
    while done < phases {
        let Some(event) = driver.next_event().await else {
            break;
        };
        emit(&event, json)?;
        if let Event::PhaseCompleted { .. } = event {
            done += 1;
            if done < phases {
                // The controller never auto-starts; the host does.
                emit(&driver.toggle_running(), json)?;
            }
        }
    }

    if !json {
        println!();
    }
    print_summary(driver.controller(), config)
}

fn simulate(
    mut controller: SessionController,
    mode: SessionMode,
    ticks: u64,
    auto_start: bool,
) -> SessionController {
    if mode != SessionMode::Focus {
        controller.switch_mode(mode);
    }
    controller.toggle_running();
    for _ in 0..ticks {
        if controller.tick().is_some() && auto_start {
            controller.toggle_running();
        }
    }
    controller
}

fn emit(event: &Event, json: bool) -> anyhow::Result<()> {
    debug!(kind = event.kind(), "event");
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    let mut out = std::io::stdout().lock();
    match event {
        Event::Tick {
            mode,
            remaining_secs,
            ..
        }
        | Event::TimerStarted {
            mode,
            remaining_secs,
            ..
        } => {
            write!(out, "\r{} {}  {}", mode.emoji(), mode.label(), format_clock(*remaining_secs))?;
        }
        Event::PhaseCompleted { from, to, .. } => {
            writeln!(out, "\r{} finished, next up: {}", from.label(), to.label())?;
        }
        _ => {}
    }
    out.flush()?;
    Ok(())
}

fn print_summary(controller: &SessionController, config: &Config) -> anyhow::Result<()> {
    let stats = SessionStats::compute(controller.state(), &config.durations()?);
    let summary = json!({
        "state": controller.state(),
        "progress": controller.progress_fraction(),
        "stats": stats,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
