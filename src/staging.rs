use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use uuid::Uuid;

/// An uploaded image parked on disk for the duration of one request.
///
/// The file lives as long as this value: dropping it (error, panic or
/// disconnect) removes the file, and [`StagedUpload::close`] removes it while
/// reporting any removal error.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    declared_name: Option<String>,
}

impl StagedUpload {
    /// Creates an empty, uniquely named file in `dir`.
    ///
    /// The declared filename only contributes its extension, and only when it looks like one.
    pub fn create_in(dir: &Path, declared_name: Option<String>) -> std::io::Result<Self> {
        let prefix = format!("upload-{}-", Uuid::new_v4());
        let suffix = declared_name
            .as_deref()
            .and_then(safe_extension)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let file = Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(dir)?;

        Ok(Self {
            file,
            declared_name,
        })
    }

    pub fn write_chunk(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.file.write_all(data)
    }

    /// Flushes buffered data so the decoder sees the whole upload.
    pub fn finish(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn declared_name(&self) -> Option<&str> {
        self.declared_name.as_deref()
    }

    pub fn close(self) -> std::io::Result<()> {
        self.file.close()
    }
}

fn safe_extension(name: &str) -> Option<&str> {
    let ext = Path::new(name).extension()?.to_str()?;
    let valid = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(ext)
}

/// Resolves the directory uploads are staged in, creating it when missing.
pub fn prepare_upload_dir(dir: Option<PathBuf>) -> std::io::Result<PathBuf> {
    let dir = dir.unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
