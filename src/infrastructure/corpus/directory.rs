use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::{ports::DocumentSource, Document, DocumentMetadata, DomainError};
use crate::infrastructure::config::CorpusConfig;

/// Text files under a directory, visited in file-name order.
#[derive(Debug, Clone)]
pub struct DirectoryDocumentSource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryDocumentSource {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.into_iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &CorpusConfig) -> Self {
        Self::new(config.docs_path.clone(), config.extensions.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// Accepted files as `(path, name relative to root, size)`.
    fn scan(&self) -> Result<Vec<(PathBuf, String, u64)>, DomainError> {
        if !self.root.is_dir() {
            return Err(DomainError::corpus(format!(
                "Documents directory not found: {}",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| DomainError::corpus(e.to_string()))?;
            if !entry.file_type().is_file() || !self.accepts(entry.path()) {
                continue;
            }
            let size = entry
                .metadata()
                .map_err(|e| DomainError::corpus(e.to_string()))?
                .len();
            let name = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            files.push((entry.path().to_path_buf(), name, size));
        }
        Ok(files)
    }

    fn load_blocking(&self) -> Result<Vec<Document>, DomainError> {
        let mut documents = Vec::new();
        for (path, name, size) in self.scan()? {
            let bytes = std::fs::read(&path)
                .map_err(|e| DomainError::corpus(format!("{}: {e}", path.display())))?;
            match String::from_utf8(bytes) {
                Ok(text) => documents.push(
                    Document::new(name.clone(), text)
                        .with_metadata(DocumentMetadata::for_file(&name, size)),
                ),
                Err(_) => tracing::warn!(file = %name, "skipping non UTF-8 document"),
            }
        }
        Ok(documents)
    }
}

#[async_trait]
impl DocumentSource for DirectoryDocumentSource {
    async fn load(&self) -> Result<Vec<Document>, DomainError> {
        let source = self.clone();
        let documents = tokio::task::spawn_blocking(move || source.load_blocking())
            .await
            .map_err(|e| DomainError::internal(e.to_string()))??;

        tracing::info!(count = documents.len(), root = %self.root.display(), "documents loaded");
        Ok(documents)
    }

    async fn list(&self) -> Result<Vec<DocumentMetadata>, DomainError> {
        let source = self.clone();
        let files = tokio::task::spawn_blocking(move || source.scan())
            .await
            .map_err(|e| DomainError::internal(e.to_string()))??;

        Ok(files
            .into_iter()
            .map(|(_, name, size)| DocumentMetadata::for_file(&name, size))
            .collect())
    }
}
