//! WAV and raw PCM writer.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::buffer::ScratchBuffer;
use crate::error::{WavError, WavResult};
use crate::format::{Framing, PcmFormat};
use crate::header::{WavHeader, RIFF_OVERHEAD};
use crate::sample::{Encoding, Sample};

/// Largest payload a RIFF header can describe.
const MAX_RIFF_DATA: u64 = (u32::MAX - RIFF_OVERHEAD) as u64;

/// Writes samples to a WAV file or a raw PCM stream.
///
/// In RIFF framing a provisional header is written at construction and
/// rewritten with the real lengths when the writer is closed or dropped.
/// Prefer [`WavWriter::close`], which reports finalization errors; `Drop`
/// can only log them.
pub struct WavWriter<W: Write + Seek> {
    inner: W,
    format: PcmFormat,
    encoding: Encoding,
    framing: Framing,
    /// Where the header was written, for the in-place rewrite.
    header_start: u64,
    bytes_written: u64,
    finalized: bool,
    scratch: ScratchBuffer,
}

impl WavWriter<BufWriter<File>> {
    /// Creates (or truncates) a file for writing.
    ///
    /// A `.pcm` extension (any case) produces a bare payload with no header;
    /// anything else produces a WAV file.
    ///
    /// # Arguments
    /// * `path` - Output file
    /// * `format` - Stream parameters; also selects the on-disk encoding
    pub fn create<P: AsRef<Path>>(path: P, format: PcmFormat) -> WavResult<Self> {
        let path = path.as_ref();
        Self::create_with(path, format, Framing::for_writing(path))
    }

    /// Creates a file with explicit framing, regardless of extension.
    pub fn create_with<P: AsRef<Path>>(
        path: P,
        format: PcmFormat,
        framing: Framing,
    ) -> WavResult<Self> {
        let path = path.as_ref();
        format.validate()?;
        let file = File::create(path)?;
        tracing::debug!(path = %path.display(), ?framing, "creating writer");
        Self::from_handle(BufWriter::new(file), format, framing)
    }
}

impl<W: Write + Seek> WavWriter<W> {
    /// Wraps an open stream. Output starts at its current position.
    ///
    /// Pass `&mut handle` to keep ownership; the writer flushes but never
    /// closes a borrowed handle.
    pub fn from_handle(mut handle: W, format: PcmFormat, framing: Framing) -> WavResult<Self> {
        format.validate()?;
        let encoding = format.encoding().ok_or_else(|| {
            WavError::invalid_argument(
                "bits_per_sample",
                format!("{} bit samples are not supported", format.bits_per_sample),
            )
        })?;

        let header_start = handle.stream_position()?;
        if framing == Framing::Riff {
            WavHeader::canonical(&format, 0).write_to(&mut handle)?;
        }

        Ok(Self {
            inner: handle,
            format,
            encoding,
            framing,
            header_start,
            bytes_written: 0,
            finalized: false,
            scratch: ScratchBuffer::new(),
        })
    }

    /// Converts `samples` to the on-disk encoding and appends them.
    ///
    /// Integer targets saturate, so out-of-range floats clamp to the nearest
    /// bound. A failed write is not retried.
    pub fn write<T: Sample>(&mut self, samples: &[T]) -> WavResult<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let width = self.encoding.width();
        let len = samples
            .len()
            .checked_mul(width)
            .ok_or(WavError::OutOfMemory {
                requested: usize::MAX,
            })?;
        if self.framing == Framing::Riff && self.bytes_written + len as u64 > MAX_RIFF_DATA {
            return Err(WavError::invalid_argument(
                "samples",
                format!(
                    "data section would exceed {} bytes, the RIFF limit",
                    MAX_RIFF_DATA
                ),
            ));
        }

        let bytes = self.scratch.acquire(len)?;
        let produced = self.encoding.encode(samples, bytes);
        self.inner.write_all(&bytes[..produced])?;
        self.bytes_written += produced as u64;
        Ok(())
    }

    /// Payload bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Whole frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.bytes_written / self.format.block_align() as u64
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Finalizes the header and flushes.
    pub fn close(mut self) -> WavResult<()> {
        self.finalize()
    }

    fn finalize(&mut self) -> WavResult<()> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;

        if self.framing == Framing::Riff {
            // Bounded by MAX_RIFF_DATA in write().
            let data_len = u32::try_from(self.bytes_written)
                .map_err(|_| WavError::format("data section exceeds the RIFF limit"))?;
            let end = self.inner.stream_position()?;
            self.inner.seek(SeekFrom::Start(self.header_start))?;
            WavHeader::canonical(&self.format, data_len).write_to(&mut self.inner)?;
            self.inner.seek(SeekFrom::Start(end))?;
        }
        self.inner.flush()?;

        tracing::debug!(
            bytes = self.bytes_written,
            framing = ?self.framing,
            "finalized writer"
        );
        Ok(())
    }
}

impl<W: Write + Seek> Drop for WavWriter<W> {
    fn drop(&mut self) {
        if let Err(err) = self.finalize() {
            tracing::error!(error = %err, code = err.code(), "failed to finalize WAV writer");
        }
    }
}

impl<W: Write + Seek> std::fmt::Debug for WavWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavWriter")
            .field("format", &self.format)
            .field("framing", &self.framing)
            .field("header_start", &self.header_start)
            .field("bytes_written", &self.bytes_written)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}
