use std::fmt::Display;
use std::process::ExitCode;

use reelcast::Config;
use reelcast::constants::STATUS_ARTIFACT_PATH;
use reelcast::domain::PublishOutcome;
use reelcast::runner;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let report = match runner::run(&config).await {
        Ok(report) => report,
        Err(e) => {
            debug!(error = ?e, "publish run failed");
            eprintln!("{}", fatal_line(&e));
            return ExitCode::FAILURE;
        }
    };

    match report.outcome {
        PublishOutcome::Published {
            media_id, polls, ..
        } => {
            println!("🎉 Reel published! media_id={}", media_id);
            info!(polls, "see {} for the result of the last cycle", STATUS_ARTIFACT_PATH);
            ExitCode::SUCCESS
        }
        PublishOutcome::NotReady {
            creation_id,
            status,
            polls,
        } => {
            debug!(%creation_id, %status, polls, "container not publishable");
            eprintln!(
                "{}",
                fatal_line(format_args!(
                    "container {} ended with status {}; not published",
                    creation_id, status
                ))
            );
            ExitCode::FAILURE
        }
    }
}

/// The single line printed for any fatal condition.
fn fatal_line(reason: impl Display) -> String {
    format!("❌ {reason}")
}
