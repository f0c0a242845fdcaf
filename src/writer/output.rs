use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::error::{Result, SoError};

enum Target {
    Direct(BufWriter<File>),
    Staged(BufWriter<NamedTempFile>),
}

/// Destination file that is either written in place or staged in a
/// temporary file next to it and renamed on [`OutputFile::commit`].
///
/// Dropping a staged file without committing removes the temporary file
/// and leaves the destination untouched.
pub(crate) struct OutputFile {
    path: PathBuf,
    target: Target,
}

impl OutputFile {
    pub(crate) fn create(path: &Path, atomic: bool) -> Result<Self> {
        let target = if atomic {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            Target::Staged(BufWriter::new(NamedTempFile::new_in(dir)?))
        } else {
            Target::Direct(BufWriter::new(File::create(path)?))
        };
        Ok(Self {
            path: path.to_path_buf(),
            target,
        })
    }

    pub(crate) fn commit(self) -> Result<()> {
        match self.target {
            Target::Direct(mut writer) => writer.flush()?,
            Target::Staged(writer) => {
                let temp = writer.into_inner().map_err(|e| SoError::Io(e.into_error()))?;
                temp.as_file().sync_all()?;
                temp.persist(&self.path)?;
                debug!("Renamed staged output into {}", self.path.display());
            }
        }
        Ok(())
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.target {
            Target::Direct(w) => w.write(buf),
            Target::Staged(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.target {
            Target::Direct(w) => w.flush(),
            Target::Staged(w) => w.flush(),
        }
    }
}
