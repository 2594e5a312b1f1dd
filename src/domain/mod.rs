//! Reel domain - the entities that flow through a publish run and the
//! Graph API lookups that produce them

pub mod account;
pub mod media;
pub mod status;

pub use account::{AccountBinding, resolve_account};
pub use media::{HostedMedia, PublishOutcome, VideoAsset};
pub use status::ContainerStatus;
