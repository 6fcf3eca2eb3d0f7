//! Output sink for generated sources.
//!
//! The file is opened only once the text is complete. Any failure after the
//! file was created removes it again, so a failed run never leaves a partial
//! artifact behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::diagnostic::CompilerError;

pub struct OutputSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl OutputSink {
    /// Opens `path` for writing, creating parent directories.
    ///
    /// Fails with [`CompilerError::OutputExists`] if the file exists and
    /// `overwrite` is off.
    pub async fn create(path: &Path, overwrite: bool) -> Result<Self, CompilerError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CompilerError::sink(parent, e.to_string()))?;
        }

        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let file = options.open(path).await.map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => CompilerError::OutputExists {
                path: path.to_path_buf(),
            },
            _ => CompilerError::sink(path, e.to_string()),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write_all(&mut self, text: &str) -> Result<(), CompilerError> {
        self.writer
            .write_all(text.as_bytes())
            .await
            .map_err(|e| CompilerError::sink(&self.path, e.to_string()))
    }

    /// Flushes and syncs the file, then releases it.
    pub async fn close(mut self) -> Result<PathBuf, CompilerError> {
        self.writer
            .flush()
            .await
            .map_err(|e| CompilerError::sink(&self.path, e.to_string()))?;
        self.writer
            .get_mut()
            .sync_all()
            .await
            .map_err(|e| CompilerError::sink(&self.path, e.to_string()))?;
        Ok(self.path)
    }

    /// Releases the file and deletes it.
    pub async fn discard(self) {
        let Self { path, writer } = self;
        drop(writer);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output");
        }
    }
}

/// Writes `text` to `path` through an [`OutputSink`].
pub async fn write_output(path: &Path, text: &str, overwrite: bool) -> Result<PathBuf, CompilerError> {
    let mut sink = OutputSink::create(path, overwrite).await?;

    if let Err(e) = sink.write_all(text).await {
        sink.discard().await;
        return Err(e);
    }

    let path = sink.path().to_path_buf();
    match sink.close().await {
        Ok(path) => Ok(path),
        Err(e) => {
            if let Err(remove) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %remove, "failed to remove partial output");
            }
            Err(e)
        }
    }
}
