//! BandBrain CLI - feed adapter and tactical display
//!
//! Reads newline-delimited JSON reception reports on stdin, feeds them to
//! the brain service, and prints the refreshed tactical assessment for
//! the selected target until interrupted.

mod error;
mod feed;

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use bandbrain::logging::{default_log_dir, default_log_file, init_logging};
use bandbrain::model::{Callsign, Grid, TargetContext};
use bandbrain::service::{Assessment, BandBrainService, BrainConfig, RefreshDaemon};

use error::CliError;
use feed::SpotRecord;

#[derive(Parser)]
#[command(name = "bandbrain")]
#[command(about = "Tactical band awareness for FT8 operators", long_about = None)]
struct Args {
    /// Your callsign
    #[arg(long)]
    my_call: String,

    /// Your Maidenhead grid locator
    #[arg(long)]
    grid: Option<String>,

    /// Target callsign to analyze
    #[arg(long)]
    target: Option<String>,

    /// Target Maidenhead grid locator
    #[arg(long, requires = "target")]
    target_grid: Option<String>,

    /// Dial frequency in Hz, for reducing absolute feed frequencies to
    /// audio offsets
    #[arg(long, default_value = "14074000")]
    dial_hz: u64,

    /// Seconds between tactical refreshes
    #[arg(long, default_value = "3")]
    refresh_secs: u64,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        e.exit();
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let log_dir = args.log_dir.as_deref().unwrap_or(default_log_dir());
    let _logging_guard = init_logging(log_dir, default_log_file())
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    info!(version = bandbrain::VERSION, "bandbrain starting");

    let mut config = BrainConfig::new(&args.my_call)?
        .with_refresh_interval(Duration::from_secs(args.refresh_secs.max(1)));
    if let Some(grid) = args.grid.as_deref().and_then(Grid::parse) {
        config = config.with_my_grid(grid);
    }

    let service = Arc::new(BandBrainService::new(config)?);

    if let Some(target) = args.target.as_deref() {
        service.set_target(TargetContext::new(
            Callsign::new(target),
            args.target_grid.as_deref().and_then(Grid::parse),
        ));
    }

    let shutdown = CancellationToken::new();

    let (refresh, mut assessments) = RefreshDaemon::new(Arc::clone(&service));
    let prune = service.prune_daemon();
    let refresh_handle = tokio::spawn(refresh.run(shutdown.clone()));
    let prune_handle = tokio::spawn(prune.run(shutdown.clone()));

    // Feed reader: stdin lines into the cache, stamped at receipt.
    let feed_service = Arc::clone(&service);
    let feed_shutdown = shutdown.clone();
    let dial_hz = args.dial_hz;
    let feed_handle = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                biased;

                _ = feed_shutdown.cancelled() => break,

                line = lines.next_line() => match line {
                    Ok(Some(line)) => ingest_line(&feed_service, &line, dial_hz),
                    Ok(None) => {
                        info!("feed input closed");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "feed read failed");
                        break;
                    }
                },
            }
        }
    });

    // Display: print each refreshed assessment until interrupted.
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }

            changed = assessments.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(assessment) = assessments.borrow_and_update().clone() {
                    print_assessment(&assessment);
                }
            }
        }
    }

    shutdown.cancel();
    let _ = refresh_handle.await;
    let _ = prune_handle.await;
    let _ = feed_handle.await;

    Ok(())
}

fn ingest_line(service: &BandBrainService, line: &str, dial_hz: u64) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match SpotRecord::parse(line) {
        Ok(record) => {
            if let Some(spot) = record.into_spot(dial_hz, Instant::now()) {
                service.ingest_spot(spot);
            }
        }
        Err(e) => warn!(error = %e, "unparseable feed line skipped"),
    }
}

fn print_assessment(assessment: &Assessment) {
    println!(
        "[{}] path: {:?} | competition: {} callers ({:?}) | tx: {} Hz (score {:.0}{})",
        assessment.target.call,
        assessment.path,
        assessment.competition.count,
        assessment.competition.level,
        assessment.recommendation.offset_hz,
        assessment.recommendation.score,
        if assessment.recommendation.is_proven {
            ", proven"
        } else {
            ""
        },
    );
}
