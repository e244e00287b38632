//! Local delivery of a fetched artifact.
//!
//! A payload is first staged in a uniquely named `.part` file inside the
//! destination directory, then committed under the final name. The staged file
//! is owned by a [`StagedArtifact`]; dropping it deletes the file, so every exit
//! path of a save releases it, including a failed or panicking commit.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::filename::sanitize_filename_for_linux;

/// Suffix of staged files.
pub const TEMP_SUFFIX: &str = ".part";

const TEMP_PREFIX: &str = ".reeldl-";

/// Receiver of the "save file" action.
pub trait SaveTarget: Send + Sync {
    /// Saves `payload` under (a filesystem-safe form of) `filename`, or under
    /// `fallback` when nothing of `filename` survives sanitization. Returns
    /// where the file landed.
    fn save(&self, filename: &str, fallback: &str, payload: &[u8]) -> io::Result<PathBuf>;
}

/// A payload written to a transient file. Dropping it removes the file unless
/// it was committed.
#[derive(Debug)]
pub struct StagedArtifact {
    file: NamedTempFile,
}

/// Result of a no-clobber commit.
#[derive(Debug)]
pub enum Commit {
    Done,
    /// The destination already exists; the staged file is handed back untouched.
    Taken(StagedArtifact),
}

impl StagedArtifact {
    /// Writes `payload` to a fresh uniquely named file in `dir` and syncs it.
    pub fn stage_in(dir: &Path, payload: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        file.write_all(payload)?;
        file.as_file().sync_all()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Moves the staged file to `final_path`, replacing whatever is there.
    pub fn commit(self, final_path: &Path) -> io::Result<()> {
        self.file.persist(final_path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Moves the staged file to `final_path` only if nothing exists there yet.
    pub fn commit_new(self, final_path: &Path) -> io::Result<Commit> {
        match self.file.persist_noclobber(final_path) {
            Ok(_) => Ok(Commit::Done),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                Ok(Commit::Taken(StagedArtifact { file: e.file }))
            }
            Err(e) => Err(e.error),
        }
    }
}

/// Saves into a directory, the way a browser drops files into its download folder.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    /// Replace an existing file of the same name instead of picking `name (n).ext`.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&self, filename: &str, fallback: &str, payload: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let name = safe_name(filename, fallback);
        let mut staged = StagedArtifact::stage_in(&self.dir, payload)?;
        tracing::debug!("staged {} bytes at {}", payload.len(), staged.path().display());

        if self.overwrite {
            let final_path = self.dir.join(&name);
            staged.commit(&final_path)?;
            return Ok(final_path);
        }

        let (stem, ext) = split_extension(&name);
        let mut final_path = self.dir.join(&name);
        let mut n = 0u32;
        loop {
            match staged.commit_new(&final_path)? {
                Commit::Done => return Ok(final_path),
                Commit::Taken(back) => staged = back,
            }
            n += 1;
            final_path = self.dir.join(format!("{} ({}){}", stem, n, ext));
        }
    }
}

fn safe_name(filename: &str, fallback: &str) -> String {
    let safe = sanitize_filename_for_linux(filename);
    if safe.is_empty() {
        sanitize_filename_for_linux(fallback)
    } else {
        safe
    }
}

/// Splits `clip.mp3` into (`clip`, `.mp3`); dotfiles and extensionless names keep an empty extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}
