use crate::management::utils::annotated_image::AnnotatedImage;
use crate::management::utils::stored_result::StoredResult;
use crate::management::utils::upload_error::UploadError;
use crate::management::utils::uploaded_image::UploadedImage;
use crate::utils::logging::*;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ResultRepository {
    root: PathBuf,
}

impl ResultRepository {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
        }
    }

    pub async fn initialize(&self) -> Result<(), String> {
        fs::create_dir_all(&self.root).await
            .map_err(|err| IOEntry::CreateDirectoryError(self.root.display(), err).into())
    }

    pub async fn persist(&self, upload: &UploadedImage, annotated: &AnnotatedImage, keep_original: bool) -> Result<StoredResult, UploadError> {
        let uuid = Uuid::new_v4();
        let directory = format!("upload_{}_{}", Local::now().format("%Y%m%d_%H%M%S"), uuid);
        let directory_path = self.root.join(&directory);
        fs::create_dir_all(&directory_path).await
            .map_err(|err| UploadError::Persistence(IOEntry::CreateDirectoryError(directory_path.display(), err).into()))?;

        let filename = format!("processed_{}.{}", uuid, annotated.format.extension());
        let filepath = directory_path.join(&filename);
        if let Err(err) = Self::write_artifacts(&directory_path, &filepath, upload, annotated, keep_original).await {
            // A failed upload must not leave a half-written directory behind.
            let _ = fs::remove_dir_all(&directory_path).await;
            return Err(err);
        }

        Ok(StoredResult {
            directory,
            filename,
            filepath,
        })
    }

    async fn write_artifacts(directory_path: &Path, filepath: &Path, upload: &UploadedImage, annotated: &AnnotatedImage, keep_original: bool) -> Result<(), UploadError> {
        if keep_original {
            let original_path = directory_path.join(&upload.filename);
            fs::write(&original_path, &upload.data).await
                .map_err(|err| UploadError::Persistence(IOEntry::WriteFileError(original_path.display(), err).into()))?;
        }
        fs::write(filepath, &annotated.data).await
            .map_err(|err| UploadError::Persistence(IOEntry::WriteFileError(filepath.display(), err).into()))?;
        if !fs::try_exists(filepath).await.unwrap_or(false) {
            return Err(UploadError::ProcessedImageNotFound(filepath.display().to_string()));
        }
        Ok(())
    }

    pub async fn resolve(&self, relative_path: &str) -> Option<PathBuf> {
        let relative_path = Path::new(relative_path);
        let is_plain = relative_path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if relative_path.as_os_str().is_empty() || !is_plain {
            return None;
        }
        let root = fs::canonicalize(&self.root).await.ok()?;
        let candidate = fs::canonicalize(root.join(relative_path)).await.ok()?;
        if !candidate.starts_with(&root) {
            return None;
        }
        let metadata = fs::metadata(&candidate).await.ok()?;
        if metadata.is_file() { Some(candidate) } else { None }
    }

    pub fn inline(annotated: &AnnotatedImage) -> String {
        STANDARD.encode(&annotated.data)
    }
}
