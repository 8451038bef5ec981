//! Temporary directories for file-based tests.

use std::fs;
use std::path::{Path, PathBuf};

use pcmwav::{PcmFormat, Sample, WavWriter};
use tempfile::TempDir;

/// A scratch directory that disappears with the fixture.
pub struct TempAudioDir {
    pub root: TempDir,
}

impl TempAudioDir {
    /// Create a new empty directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the directory path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Path of `name` inside the directory. The file is not created.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Write raw bytes to `name`.
    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.file(name);
        fs::write(&path, bytes).expect("Failed to write fixture file");
        path
    }

    /// Write `samples` to `name` through a [`WavWriter`] and close it.
    ///
    /// # Arguments
    /// * `name` - File name; a `.pcm` extension produces a raw stream
    /// * `format` - Stream parameters
    /// * `samples` - Interleaved samples
    pub fn write_samples<T: Sample>(&self, name: &str, format: PcmFormat, samples: &[T]) -> PathBuf {
        let path = self.file(name);
        let mut writer = WavWriter::create(&path, format).expect("Failed to create writer");
        writer.write(samples).expect("Failed to write samples");
        writer.close().expect("Failed to close writer");
        path
    }

    /// Read the whole file back as bytes.
    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        fs::read(self.file(name)).expect("Failed to read fixture file")
    }
}

impl Default for TempAudioDir {
    fn default() -> Self {
        Self::new()
    }
}
