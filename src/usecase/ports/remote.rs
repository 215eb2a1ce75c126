use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::dataset::{Dataset, PageQuery};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    InvalidFile(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    VoterRecords,
    PetitionSignatures,
}

impl UploadKind {
    pub fn path_segment(self) -> &'static str {
        match self {
            UploadKind::VoterRecords => "voter_records",
            UploadKind::PetitionSignatures => "petition_signatures",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            UploadKind::VoterRecords => "csv",
            UploadKind::PetitionSignatures => "pdf",
        }
    }

    pub fn filter_label(self) -> &'static str {
        match self {
            UploadKind::VoterRecords => "Voter records (.csv)",
            UploadKind::PetitionSignatures => "Petition signatures (.pdf)",
        }
    }

    pub fn validate(self, path: &Path) -> Result<(), SourceError> {
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()));
        if matches {
            Ok(())
        } else {
            Err(SourceError::InvalidFile(format!(
                "invalid file type: {} (only .{} files are allowed)",
                path.display(),
                self.extension()
            )))
        }
    }
}

/// Paged voter-record listing.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// One page of rows. The returned total is the row count of the page
    /// itself; the overall total comes from `fetch_count`.
    async fn fetch_page(&self, query: &PageQuery) -> Result<Dataset, SourceError>;
    async fn fetch_count(&self) -> Result<u64, SourceError>;
}

/// Upload and OCR processing collaborator.
#[async_trait]
pub trait PetitionProcessor: Send + Sync {
    async fn upload(&self, kind: UploadKind, path: &Path) -> Result<(), SourceError>;
    async fn clear_files(&self) -> Result<(), SourceError>;
    /// Runs OCR on the uploaded signatures and returns every matched row.
    async fn run_ocr(&self) -> Result<Dataset, SourceError>;
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn upload_kind_checks_extension() {
        assert!(UploadKind::PetitionSignatures
            .validate(&PathBuf::from("scan/ballot.PDF"))
            .is_ok());
        assert!(UploadKind::VoterRecords
            .validate(&PathBuf::from("voters.csv"))
            .is_ok());

        let err = UploadKind::PetitionSignatures
            .validate(&PathBuf::from("voters.csv"))
            .expect_err("csv is not a petition file");
        assert!(matches!(err, SourceError::InvalidFile(_)));
        assert!(UploadKind::VoterRecords
            .validate(&PathBuf::from("no_extension"))
            .is_err());
    }
}
