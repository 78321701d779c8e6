use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    pub fn is_privileged(self) -> bool {
        matches!(self, MemberStatus::Creator | MemberStatus::Administrator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    /// No permissions, no expiry.
    Mute,
    /// Restore the member's permissions immediately.
    Lift,
}

#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub path: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Telegram API error: {0}")]
    Request(#[from] teloxide::RequestError),
    #[error("File download failed: {0}")]
    Download(#[from] teloxide::DownloadError),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Other(String),
}
