use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use motionbar::{
    clock::{Clock, SystemClock},
    progress::{
        display::{LogRenderer, ProgressRenderer},
        terminal::TerminalRenderer,
    },
    runner::{
        config::{RunnerConfig, DEFAULT_POLL_INTERVAL},
        MotionRunner,
    },
    scenario::Scenario,
    terminal::EchoGuard,
};

#[derive(Parser, Debug)]
#[command(name = "motionbar", about = "Simulated axis motions with live progress bars")]
struct Args {
    /// Built-in scenario to run
    #[arg(default_value = "demo1")]
    scenario: String,

    /// Load the scenario from a JSON file instead
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(long)]
    poll_ms: Option<u64>,

    /// Log progress lines instead of drawing bars
    #[arg(long)]
    plain: bool,

    #[arg(short, long)]
    verbose: bool,

    /// List built-in scenarios and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else if args.plain {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if args.list {
        for name in Scenario::builtin_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let scenario = match &args.file {
        Some(path) => Scenario::load(path).await?,
        None => Scenario::builtin(&args.scenario)
            .ok_or_else(|| anyhow!("Unknown scenario: {} (see --list)", args.scenario))?,
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let moves = scenario.build(clock.clone())?;
    let poll_interval = args
        .poll_ms
        .map(Duration::from_millis)
        .or_else(|| scenario.poll_interval())
        .unwrap_or(DEFAULT_POLL_INTERVAL);

    let renderer: Arc<dyn ProgressRenderer> = if args.plain {
        Arc::new(LogRenderer)
    } else {
        Arc::new(TerminalRenderer::new()?)
    };
    let runner = MotionRunner::new(
        RunnerConfig::default().with_poll_interval(poll_interval),
        clock,
        renderer,
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
            ctrl_c.cancel();
        }
    });

    info!(
        "Running scenario {} with {} axis(es), polling every {:?}",
        scenario.label(),
        moves.len(),
        poll_interval
    );

    let report = {
        let _echo = EchoGuard::stdin().unwrap_or_else(|e| {
            warn!("Could not disable terminal echo: {}", e);
            None
        });
        runner.run(&moves, &cancel).await?
    };

    if report.is_aborted() {
        println!("Motion aborted!");
    } else {
        println!("Everything was fine!");
    }
    for (mv, status) in moves.iter().zip(&report.final_statuses) {
        println!("  {}={:.3}{}", status.name, status.position, mv.axis.unit());
    }

    Ok(())
}
