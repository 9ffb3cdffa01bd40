use serde::{Deserialize, Serialize};

/// Normalized record for one photo after extraction from the raw listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoDescriptor {
    pub source_id: i64,
    pub file_name: String,
    pub size_label: String,
    pub source_url: String,
    pub like_count: i64,
    pub timestamp: i64,
}

/// One line of the output manifest, derived 1:1 from a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file_name: String,
    pub size: String,
}

impl From<&PhotoDescriptor> for ManifestEntry {
    fn from(photo: &PhotoDescriptor) -> Self {
        Self {
            file_name: photo.file_name.clone(),
            size: photo.size_label.clone(),
        }
    }
}

/// Outcome of the idempotent container create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    AlreadyExists,
    Failed(u16),
}

/// Outcome of a single item transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferStatus {
    Succeeded,
    Failed(TransferFailure),
}

/// Which step of a transfer went wrong. Per-item failures never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferFailure {
    LinkRequest(u16),
    NoUploadLink,
    SourceDownload(u16),
    Upload(u16),
    Transport(String),
}

impl std::fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferFailure::LinkRequest(status) => {
                write!(f, "upload link request failed with status {}", status)
            }
            TransferFailure::NoUploadLink => write!(f, "no upload link in response"),
            TransferFailure::SourceDownload(status) => {
                write!(f, "source download failed with status {}", status)
            }
            TransferFailure::Upload(status) => write!(f, "upload failed with status {}", status),
            TransferFailure::Transport(message) => write!(f, "transport error: {}", message),
        }
    }
}

/// Summary of the transfer phase, one run.
#[derive(Debug, Clone, Default)]
pub struct TransferReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<(String, TransferFailure)>,
}
