use std::path::PathBuf;

use super::status::ContainerStatus;

/// A video file on local disk plus the parameters it was encoded with.
#[derive(Debug, Clone)]
pub struct VideoAsset {
    pub path: PathBuf,
    pub duration_secs: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub video_codec: &'static str,
    pub audio_codec: &'static str,
}

/// A video reachable over HTTPS on the media host.
#[derive(Debug, Clone)]
pub struct HostedMedia {
    pub secure_url: String,
    pub public_id: Option<String>,
}

/// Result of driving a container through create, poll and publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published {
        creation_id: String,
        media_id: String,
        polls: u32,
    },
    /// The container settled on something other than `FINISHED`; nothing was
    /// published and the container is left as is.
    NotReady {
        creation_id: String,
        status: ContainerStatus,
        polls: u32,
    },
}

impl PublishOutcome {
    pub fn media_id(&self) -> Option<&str> {
        match self {
            PublishOutcome::Published { media_id, .. } => Some(media_id),
            PublishOutcome::NotReady { .. } => None,
        }
    }
}
