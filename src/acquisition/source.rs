//! File sources handed over by a drop surface or file picker

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// A candidate file: a name, a known size and content that can be read once
#[async_trait]
pub trait FileSource: Send + Sync {
    /// File name including its extension
    fn name(&self) -> &str;

    /// Size in bytes as reported before reading
    fn size(&self) -> u64;

    /// Read the whole content
    async fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

/// A file on disk
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
    size: u64,
}

impl PathSource {
    /// Stat `path` and build a source for it
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path,
            name,
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// A file already held in memory (e.g. delivered by a browser drop event)
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    content: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[async_trait]
impl FileSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.content.len() as u64
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.content.clone())
    }
}
