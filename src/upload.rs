// src/upload.rs
//! Resume capture and validation ahead of any network call.
//!
//! A candidate file is inspected against the upload policy and either
//! accepted (bytes loaded, MIME resolved) or rejected with a specific
//! reason. Single mode holds one file in a slot; batch mode appends each
//! accepted file to an ordered queue.

use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::config::{AppConfig, ALLOWED_EXTENSIONS};

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub allowed_extensions: Vec<String>,
    pub max_size: u64,
}

impl UploadPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            max_size: config.max_file_size,
        }
    }
}

/// A validated resume ready for multipart submission.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Outcome of inspecting one candidate file.
#[derive(Debug)]
pub enum UploadOutcome {
    Accepted(ResumeFile),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Error)]
pub enum RejectReason {
    #[error(
        "File is too large: {size_mb:.1}MB (maximum size is {limit_mb}MB)",
        size_mb = *.size as f64 / 1024.0 / 1024.0,
        limit_mb = .limit / 1024 / 1024
    )]
    TooLarge { size: u64, limit: u64 },

    #[error("Invalid file type '.{extension}'. Please upload a supported format.")]
    InvalidType { extension: String },

    #[error("File is empty. Please upload a valid resume.")]
    Empty,

    #[error("File upload failed: {0}. Please try again.")]
    Unreadable(String),
}

/// Inspect a candidate resume: extension against the policy, size against
/// the limit, then content. Accepting reads the full file into memory.
pub async fn inspect_file(path: &Path, policy: &UploadPolicy) -> UploadOutcome {
    let file_name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => {
            return UploadOutcome::Rejected(RejectReason::Unreadable(
                "path has no file name".to_string(),
            ))
        }
    };

    let extension = match file_extension(&file_name) {
        Some(ext) => ext,
        None => {
            warn!("Rejected {}: no file extension", file_name);
            return UploadOutcome::Rejected(RejectReason::InvalidType {
                extension: String::new(),
            });
        }
    };

    if !policy.allowed_extensions.iter().any(|a| a == &extension) {
        warn!("Rejected {}: unsupported extension .{}", file_name, extension);
        return UploadOutcome::Rejected(RejectReason::InvalidType { extension });
    }

    let metadata = match fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) => return UploadOutcome::Rejected(RejectReason::Unreadable(e.to_string())),
    };

    if metadata.len() > policy.max_size {
        warn!(
            "Rejected {}: {} bytes exceeds limit of {}",
            file_name,
            metadata.len(),
            policy.max_size
        );
        return UploadOutcome::Rejected(RejectReason::TooLarge {
            size: metadata.len(),
            limit: policy.max_size,
        });
    }

    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => return UploadOutcome::Rejected(RejectReason::Unreadable(e.to_string())),
    };

    if bytes.is_empty() {
        return UploadOutcome::Rejected(RejectReason::Empty);
    }

    if !header_matches(&extension, &bytes) {
        warn!("Rejected {}: content does not match .{}", file_name, extension);
        return UploadOutcome::Rejected(RejectReason::InvalidType { extension });
    }

    let content_type = content_type_for(&extension);
    info!("Accepted resume {} ({} bytes)", file_name, bytes.len());

    UploadOutcome::Accepted(ResumeFile {
        file_name,
        content_type,
        bytes,
    })
}

fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Magic-header check for the formats with a stable signature. Word and
/// plain-text files pass through on extension alone.
fn header_matches(extension: &str, bytes: &[u8]) -> bool {
    const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

    match extension {
        "pdf" => bytes.starts_with(b"%PDF"),
        "png" => bytes.starts_with(PNG_SIGNATURE),
        "jpg" | "jpeg" => bytes.starts_with(JPEG_SIGNATURE),
        _ => true,
    }
}

// ===== Capture containers =====

/// Single-mode holder: one resume at a time. Removing re-arms the slot.
#[derive(Debug, Default)]
pub struct UploadSlot {
    held: Option<ResumeFile>,
}

impl UploadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, file: ResumeFile) {
        self.held = Some(file);
    }

    pub fn remove(&mut self) -> Option<ResumeFile> {
        self.held.take()
    }

    pub fn file(&self) -> Option<&ResumeFile> {
        self.held.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_none()
    }
}

/// Batch-mode ordered list. One file is appended per capture; removal is
/// addressed by index and name so a stale index cannot drop the wrong file.
#[derive(Debug, Default)]
pub struct UploadQueue {
    files: Vec<ResumeFile>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: ResumeFile) {
        self.files.push(file);
    }

    pub fn remove(&mut self, index: usize, file_name: &str) -> Option<ResumeFile> {
        match self.files.get(index) {
            Some(file) if file.file_name == file_name => Some(self.files.remove(index)),
            _ => None,
        }
    }

    pub fn files(&self) -> &[ResumeFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
