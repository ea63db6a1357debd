use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::PadnextError;

/// Per-run working directory.
///
/// Either a fresh unique directory that is removed on drop, or a
/// caller-supplied directory that is emptied at the start of the run and
/// again when the run fails.
#[derive(Debug)]
pub(crate) enum Scratch {
    Owned(TempDir),
    Borrowed(PathBuf),
}

impl Scratch {
    pub(crate) fn fresh(root: Option<&Path>) -> Result<Self, PadnextError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("padnext-");
        let dir = match root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(Scratch::Owned(dir))
    }

    pub(crate) fn reuse(dir: &Path) -> Result<Self, PadnextError> {
        fs::create_dir_all(dir)?;
        clear_dir(dir)?;
        Ok(Scratch::Borrowed(dir.to_path_buf()))
    }

    pub(crate) fn path(&self) -> &Path {
        match self {
            Scratch::Owned(dir) => dir.path(),
            Scratch::Borrowed(dir) => dir,
        }
    }

    /// Throw away everything the run produced.
    pub(crate) fn discard(self) {
        let result = match &self {
            Scratch::Owned(_) => Ok(()),
            Scratch::Borrowed(dir) => clear_dir(dir),
        };
        if let Err(e) = result {
            tracing::warn!(dir = %self.path().display(), error = %e, "scratch directory not fully cleared");
        }
    }
}

fn clear_dir(dir: &Path) -> Result<(), PadnextError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
