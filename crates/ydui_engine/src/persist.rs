use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory unusable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` if needed and checks that files can be created in it.
pub fn ensure_state_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(PersistError::StateDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
        }
        Err(err) => return Err(PersistError::StateDir(err.to_string())),
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    Ok(())
}

/// Writes whole files under one directory so a reader never observes a
/// half-written settings file.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_state_dir(&self.dir)?;

        let target = self.path_of(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }

    /// Contents of `filename`, or `None` if it does not exist yet.
    pub fn read(&self, filename: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_of(filename)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
