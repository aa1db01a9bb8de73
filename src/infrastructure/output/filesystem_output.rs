//! Filesystem-based output service implementation

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::generation::{GenerationError, OutputService};

/// Output service that writes artifacts to the filesystem
pub struct FileSystemOutputService;

impl FileSystemOutputService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemOutputService {
    fn default() -> Self {
        Self::new()
    }
}

fn write_error(path: &Path, source: std::io::Error) -> GenerationError {
    GenerationError::FileWriteError {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl OutputService for FileSystemOutputService {
    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_file(&self, path: &Path) -> Result<Option<String>, GenerationError> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GenerationError::IoError(e)),
        }
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<(), GenerationError> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| write_error(parent, e))?;
        }

        let mut file = fs::File::create(path)
            .await
            .map_err(|e| write_error(path, e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| write_error(path, e))?;
        file.flush().await.map_err(|e| write_error(path, e))?;

        Ok(())
    }

    async fn ensure_directory(&self, path: &Path) -> Result<(), GenerationError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| write_error(path, e))
    }
}
