//! Sample source adapter over the external counter resource.
//!
//! The adapter is the only piece that touches the counter file. The external
//! producer rewrites the value in place, so the latest reading always starts
//! at offset 0; `probe` rewinds before every read instead of reopening.

use crate::error::{MeterError, Result};
use fs_err as fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Yields the latest raw counter text on demand.
///
/// Implemented by [`FileSampleSource`] in production; tests script probes
/// with an in-memory fake.
pub trait SampleSource: Send {
    fn probe(&mut self) -> Result<String>;
}

/// File-backed sample source.
///
/// The handle is opened once at component construction and held for the
/// component's entire lifetime; the resource is provisioned by system
/// configuration, so failure to open is fatal rather than retried.
#[derive(Debug)]
pub struct FileSampleSource {
    file: fs::File,
}

impl FileSampleSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|source| MeterError::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { file })
    }
}

impl SampleSource for FileSampleSource {
    fn probe(&mut self) -> Result<String> {
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(|source| MeterError::Probe { source })?;
        let mut raw = String::new();
        self.file
            .read_to_string(&mut raw)
            .map_err(|source| MeterError::Probe { source })?;
        Ok(raw)
    }
}
