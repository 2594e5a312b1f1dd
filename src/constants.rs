//! Application constants

/// Graph API host used when `GRAPH_BASE_URL` is not set
pub const GRAPH_BASE_URL: &str = "https://graph.facebook.com";

/// Graph API version used when `API_VERSION` is not set
pub const DEFAULT_API_VERSION: &str = "v23.0";

/// Cloudinary API host used when `CLOUDINARY_BASE_URL` is not set
pub const CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";

/// Deadline for every outbound HTTP request (2 minutes)
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Interval between container status checks
pub const POLL_INTERVAL_SECS: u64 = 5;

/// Budget for a container to reach a terminal status (3 minutes)
pub const POLL_TIMEOUT_SECS: u64 = 180;

/// Caption used when `REEL_CAPTION` is not set
pub const DEFAULT_CAPTION: &str = "Automated Reels publishing test";

/// Status report produced by the surrounding runner
pub const STATUS_ARTIFACT_PATH: &str = "out/status.html";
