//! One publish run, start to finish.

use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::domain::{AccountBinding, HostedMedia, PublishOutcome, resolve_account};
use crate::error::Result;
use crate::services::cloudinary::CloudinaryClient;
use crate::services::graph::GraphClient;
use crate::services::poll::{Clock, TokioClock};
use crate::services::publish::ReelPublisher;
use crate::services::video::VideoSpec;

const VIDEO_FILE_NAME: &str = "reel_10s.mp4";

#[derive(Debug, Clone)]
pub struct RunReport {
    pub account: AccountBinding,
    pub hosted: HostedMedia,
    pub outcome: PublishOutcome,
}

pub async fn run(config: &Config) -> Result<RunReport> {
    run_with_clock(config, TokioClock).await
}

/// Resolve the account, produce and host the video, then publish it.
pub async fn run_with_clock<C: Clock>(config: &Config, clock: C) -> Result<RunReport> {
    let graph = GraphClient::from_config(config)?;
    let account = resolve_account(
        &graph,
        config.page_id()?,
        config.instagram_id.as_deref(),
    )
    .await?;

    let hosted = match &config.video_path {
        Some(path) => {
            info!(path = %path.display(), "using existing video, skipping generation");
            upload(config, path).await?
        }
        None => {
            // Removed on drop, once the upload is done.
            let workdir = tempfile::tempdir()?;
            let asset = VideoSpec::default()
                .synthesize(&workdir.path().join(VIDEO_FILE_NAME))
                .await?;
            upload(config, &asset.path).await?
        }
    };

    let publisher = ReelPublisher::with_clock(&graph, &account, config.poll, clock);
    let outcome = publisher
        .publish_reel(&hosted.secure_url, &config.caption)
        .await?;

    Ok(RunReport {
        account,
        hosted,
        outcome,
    })
}

async fn upload(config: &Config, path: &Path) -> Result<HostedMedia> {
    CloudinaryClient::from_config(&config.cloudinary)?
        .upload_video(path)
        .await
}
