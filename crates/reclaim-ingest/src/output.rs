//! Writing recovery artifacts.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{IngestError, Result};

/// Serializes `value` as pretty JSON to `path`, replacing any prior file.
///
/// The document is written to a sibling temporary file first and renamed
/// over `path`, so a failed write never leaves a partial artifact behind.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    stage_json(path, value)?.commit()
}

/// Serializes `value` to the staging file for `path` without touching `path`.
///
/// Call [`StagedFile::commit`] to move it into place. Dropping the returned
/// file uncommitted removes the staging file, so several artifacts can be
/// staged first and committed only once all of them were written.
pub fn stage_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<StagedFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let staged = StagedFile {
        staging: staging_path(path),
        target: path.to_path_buf(),
        committed: false,
    };
    let write_err = |source| IngestError::FileWrite {
        path: staged.staging.clone(),
        source,
    };

    let file = File::create(&staged.staging).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(write_err)?;
    drop(writer);
    Ok(staged)
}

/// An artifact written to its staging file and waiting to replace its target.
#[derive(Debug)]
pub struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renames the staging file over the target.
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.staging, &self.target).map_err(|source| IngestError::FileWrite {
            path: self.target.clone(),
            source,
        })?;
        self.committed = true;
        tracing::debug!(path = %self.target.display(), "wrote artifact");
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.staging);
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
