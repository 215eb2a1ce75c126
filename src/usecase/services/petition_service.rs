use std::path::Path;
use std::sync::Arc;

use crate::domain::entities::dataset::Dataset;
use crate::usecase::ports::remote::{PetitionProcessor, SourceError, UploadKind};

pub struct PetitionService {
    processor: Arc<dyn PetitionProcessor>,
}

impl PetitionService {
    pub fn new(processor: Arc<dyn PetitionProcessor>) -> Self {
        Self { processor }
    }

    /// Uploads a file after checking it matches the picker's filter.
    pub async fn upload(&self, kind: UploadKind, path: &Path) -> Result<(), SourceError> {
        kind.validate(path)?;
        tracing::info!(kind = kind.path_segment(), path = %path.display(), "uploading file");
        self.processor.upload(kind, path).await
    }

    pub async fn process(&self) -> Result<Dataset, SourceError> {
        let result = self.processor.run_ocr().await;
        match &result {
            Ok(dataset) => tracing::info!(rows = dataset.rows.len(), "ocr processing finished"),
            Err(err) => tracing::error!(error = %err, "ocr processing failed"),
        }
        result
    }

    pub async fn start_over(&self) -> Result<(), SourceError> {
        self.processor.clear_files().await
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct RecordingProcessor {
        uploads: Mutex<Vec<(UploadKind, PathBuf)>>,
    }

    #[async_trait]
    impl PetitionProcessor for RecordingProcessor {
        async fn upload(&self, kind: UploadKind, path: &Path) -> Result<(), SourceError> {
            self.uploads
                .lock()
                .expect("lock")
                .push((kind, path.to_path_buf()));
            Ok(())
        }

        async fn clear_files(&self) -> Result<(), SourceError> {
            Ok(())
        }

        async fn run_ocr(&self) -> Result<Dataset, SourceError> {
            Ok(Dataset::default())
        }
    }

    #[tokio::test]
    async fn wrong_extension_never_reaches_the_server() {
        let processor = Arc::new(RecordingProcessor::default());
        let service = PetitionService::new(processor.clone());

        let result = service
            .upload(UploadKind::PetitionSignatures, Path::new("voters.csv"))
            .await;

        assert!(matches!(result, Err(SourceError::InvalidFile(_))));
        assert!(processor.uploads.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn valid_upload_is_forwarded() {
        let processor = Arc::new(RecordingProcessor::default());
        let service = PetitionService::new(processor.clone());

        service
            .upload(UploadKind::VoterRecords, Path::new("voters.csv"))
            .await
            .expect("upload should succeed");

        let uploads = processor.uploads.lock().expect("lock");
        assert_eq!(
            uploads.as_slice(),
            &[(UploadKind::VoterRecords, PathBuf::from("voters.csv"))]
        );
    }
}
