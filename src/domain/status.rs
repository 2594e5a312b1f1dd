use std::fmt;

/// Readiness of a media container as reported by `status_code`.
///
/// `Timeout` never comes from the platform; it marks a container that did
/// not settle within the local polling budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerStatus {
    InProgress,
    Finished,
    Published,
    Expired,
    Error,
    Timeout,
    /// Missing or unrecognized `status_code`.
    Unknown(Option<String>),
}

impl ContainerStatus {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("IN_PROGRESS") => ContainerStatus::InProgress,
            Some("FINISHED") => ContainerStatus::Finished,
            Some("PUBLISHED") => ContainerStatus::Published,
            Some("EXPIRED") => ContainerStatus::Expired,
            Some("ERROR") => ContainerStatus::Error,
            other => ContainerStatus::Unknown(other.map(str::to_string)),
        }
    }

    /// Statuses that end the polling loop.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ContainerStatus::Finished
                | ContainerStatus::Expired
                | ContainerStatus::Error
                | ContainerStatus::Timeout
        )
    }

    /// Only a finished container may be published.
    pub fn is_publishable(&self) -> bool {
        matches!(self, ContainerStatus::Finished)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContainerStatus::InProgress => "IN_PROGRESS",
            ContainerStatus::Finished => "FINISHED",
            ContainerStatus::Published => "PUBLISHED",
            ContainerStatus::Expired => "EXPIRED",
            ContainerStatus::Error => "ERROR",
            ContainerStatus::Timeout => "TIMEOUT",
            ContainerStatus::Unknown(Some(code)) => code,
            ContainerStatus::Unknown(None) => "None",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
