//! Reels publishing handshake: create a container, wait for it to finish
//! processing, then publish it.

use tracing::{info, warn};

use crate::domain::{AccountBinding, ContainerStatus, PublishOutcome};
use crate::error::{Result, require_str};
use crate::services::graph::GraphClient;
use crate::services::poll::{Clock, PollOutcome, PollSettings, TokioClock, poll_until};

pub struct ReelPublisher<'a, C = TokioClock> {
    graph: &'a GraphClient,
    account: &'a AccountBinding,
    poll: PollSettings,
    clock: C,
}

impl<'a> ReelPublisher<'a, TokioClock> {
    pub fn new(graph: &'a GraphClient, account: &'a AccountBinding, poll: PollSettings) -> Self {
        Self::with_clock(graph, account, poll, TokioClock)
    }
}

impl<'a, C: Clock> ReelPublisher<'a, C> {
    pub fn with_clock(
        graph: &'a GraphClient,
        account: &'a AccountBinding,
        poll: PollSettings,
        clock: C,
    ) -> Self {
        Self {
            graph,
            account,
            poll,
            clock,
        }
    }

    /// Create a REELS container for a hosted video. Returns the creation id.
    pub async fn create_container(&self, video_url: &str, caption: &str) -> Result<String> {
        let path = format!("{}/media", self.account.ig_id);
        let body = self
            .graph
            .post(
                &path,
                &[
                    ("media_type", "REELS"),
                    ("video_url", video_url),
                    ("caption", caption),
                    ("share_to_feed", "true"),
                ],
            )
            .await?;

        let creation_id = require_str(&body, "id", "create container")?;
        info!(%creation_id, "container created");
        Ok(creation_id)
    }

    /// Current `status_code` of a container.
    pub async fn container_status(&self, creation_id: &str) -> Result<ContainerStatus> {
        let body = self
            .graph
            .get(creation_id, &[("fields", "status_code")])
            .await?;

        let status = ContainerStatus::from_code(body.get("status_code").and_then(|v| v.as_str()));
        info!(%creation_id, status_code = %status, "container status");
        Ok(status)
    }

    /// Poll until the container reaches a terminal status.
    ///
    /// Running out of budget is not an error: the result is
    /// [`ContainerStatus::Timeout`]. Also returns the number of status requests made.
    pub async fn wait_until_finished(&self, creation_id: &str) -> Result<(ContainerStatus, u32)> {
        let outcome = poll_until(
            &self.clock,
            self.poll,
            || self.container_status(creation_id),
            ContainerStatus::is_terminal,
        )
        .await?;

        Ok(match outcome {
            PollOutcome::Done { value, attempts } => (value, attempts),
            PollOutcome::TimedOut { last, attempts } => {
                warn!(
                    %creation_id,
                    last = %last.map(|s| s.to_string()).unwrap_or_default(),
                    timeout_secs = self.poll.timeout.as_secs(),
                    "container did not settle in time"
                );
                (ContainerStatus::Timeout, attempts)
            }
        })
    }

    /// Publish a finished container. Returns the media id.
    pub async fn publish_container(&self, creation_id: &str) -> Result<String> {
        let path = format!("{}/media_publish", self.account.ig_id);
        let body = self
            .graph
            .post(&path, &[("creation_id", creation_id)])
            .await?;

        let media_id = require_str(&body, "id", "publish")?;
        info!(%media_id, "Reel published");
        Ok(media_id)
    }

    /// Run the whole handshake for one hosted video.
    ///
    /// Only a `FINISHED` container is published. Any other terminal status is
    /// handed back as [`PublishOutcome::NotReady`] for the caller to act on.
    pub async fn publish_reel(&self, video_url: &str, caption: &str) -> Result<PublishOutcome> {
        let creation_id = self.create_container(video_url, caption).await?;
        let (status, polls) = self.wait_until_finished(&creation_id).await?;

        if !status.is_publishable() {
            return Ok(PublishOutcome::NotReady {
                creation_id,
                status,
                polls,
            });
        }

        let media_id = self.publish_container(&creation_id).await?;
        Ok(PublishOutcome::Published {
            creation_id,
            media_id,
            polls,
        })
    }
}
