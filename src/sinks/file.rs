//! File sink implementation

use super::Sink;
use crate::core::{LoggerError, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends records to a file.
///
/// Records are written unbuffered, one `write_all` per record, so a crash
/// loses at most the record being written. With the `file` feature each write
/// also holds an advisory exclusive lock, keeping lines whole when several
/// processes share one file.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
    name: String,
}

impl FileSink {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}' for append", path.display()),
                    e,
                )
            })?;
        let name = path.display().to_string();

        Ok(Self {
            path,
            file: Mutex::new(file),
            name,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(feature = "file")]
    fn locked_write(&self, file: &mut File, buf: &[u8]) -> Result<()> {
        use fs2::FileExt;

        FileExt::lock_exclusive(&*file)
            .map_err(|_| LoggerError::file_lock(self.path.display().to_string()))?;
        let written = file.write_all(buf);
        let unlocked = FileExt::unlock(&*file);
        written?;
        unlocked?;
        Ok(())
    }

    #[cfg(not(feature = "file"))]
    fn locked_write(&self, file: &mut File, buf: &[u8]) -> Result<()> {
        file.write_all(buf)?;
        Ok(())
    }
}

impl Sink for FileSink {
    fn write_all(&self, buf: &[u8]) -> Result<()> {
        let mut file = self.file.lock();
        self.locked_write(&mut file, buf)
    }

    fn sync(&self) -> Result<()> {
        self.file.lock().sync_data()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
