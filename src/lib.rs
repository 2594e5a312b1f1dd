//! Publish a generated vertical video as an Instagram Reel.
//!
//! The flow resolves the Instagram account behind a Facebook page, renders a
//! placeholder clip with ffmpeg, hosts it on Cloudinary, then drives the Graph
//! API container handshake (create, poll, publish).

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod runner;
pub mod services;

pub use config::Config;
pub use error::{PublishError, Result};
