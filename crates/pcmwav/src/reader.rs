//! WAV and raw PCM reader.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::buffer::ScratchBuffer;
use crate::error::{WavError, WavResult};
use crate::format::{Framing, PcmFormat};
use crate::header::{WavHeader, RIFF_TAG};
use crate::sample::{Encoding, Sample};

/// Reads samples from a WAV file or a raw PCM stream.
///
/// The header is parsed (or synthesized for raw PCM) once at construction.
/// All positions are relative to the first payload byte, so seeks land on
/// the same frame no matter how many chunks precede the data.
#[derive(Debug)]
pub struct WavReader<R> {
    inner: R,
    header: WavHeader,
    format: PcmFormat,
    encoding: Encoding,
    framing: Framing,
    /// Absolute offset of the first payload byte.
    data_start: u64,
    /// Payload length in bytes, clamped to what the stream holds.
    data_len: u64,
    num_frames: u64,
    /// Payload bytes consumed since `data_start`.
    data_read: u64,
    /// Set when the stream ended before `data_len` was reached.
    exhausted: bool,
    scratch: ScratchBuffer,
}

impl WavReader<BufReader<File>> {
    /// Opens a file for reading.
    ///
    /// A `.wav` extension (any case) selects header mode and `raw` is
    /// ignored. Any other extension selects raw PCM mode, which requires
    /// `raw` to describe the payload.
    ///
    /// # Arguments
    /// * `path` - File to open
    /// * `raw` - Stream parameters for raw PCM mode
    pub fn open<P: AsRef<Path>>(path: P, raw: Option<PcmFormat>) -> WavResult<Self> {
        let path = path.as_ref();
        let framing = Framing::for_reading(path);
        if framing == Framing::Raw {
            check_raw(raw)?;
        }
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), ?framing, "opening reader");
        Self::with_framing(BufReader::new(file), framing, raw)
    }
}

impl<R: Read + Seek> WavReader<R> {
    /// Wraps an open stream.
    ///
    /// The stream's current position is taken as its origin. If the four
    /// bytes there are `RIFF` the header is decoded, otherwise the stream is
    /// treated as raw PCM described by `raw`. Pass `&mut handle` to keep
    /// ownership of a handle; the reader then never closes it but does move
    /// its cursor.
    pub fn from_handle(mut handle: R, raw: Option<PcmFormat>) -> WavResult<Self> {
        let origin = handle.stream_position()?;
        let mut tag = [0u8; 4];
        let peeked = read_fully(&mut handle, &mut tag)?;
        handle.seek(SeekFrom::Start(origin))?;

        let framing = if peeked == tag.len() && tag == RIFF_TAG {
            Framing::Riff
        } else {
            Framing::Raw
        };
        tracing::debug!(origin, ?framing, "opening reader from handle");
        Self::with_framing(handle, framing, raw)
    }

    fn with_framing(mut inner: R, framing: Framing, raw: Option<PcmFormat>) -> WavResult<Self> {
        let origin = inner.stream_position()?;
        let stream_end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(origin))?;

        let (header, data_start, format, declared) = match framing {
            Framing::Riff => {
                let decoded = WavHeader::decode(&mut inner)?;
                let declared = decoded.header.data.data_len as u64;
                (decoded.header, decoded.data_start, decoded.format, declared)
            }
            Framing::Raw => {
                let format = check_raw(raw)?;
                let available = stream_end.saturating_sub(origin);
                let header = WavHeader::synthesize_raw(&format, available);
                (header, origin, format, available)
            }
        };

        let encoding = format.encoding().ok_or_else(|| {
            WavError::format(format!(
                "unsupported sample width: {} bits",
                format.bits_per_sample
            ))
        })?;

        let available = stream_end.saturating_sub(data_start);
        let data_len = if declared > available {
            tracing::warn!(
                declared,
                available,
                "data chunk length exceeds stream, clamping"
            );
            available
        } else {
            declared
        };

        Ok(Self {
            inner,
            header,
            format,
            encoding,
            framing,
            data_start,
            data_len,
            num_frames: data_len / format.block_align() as u64,
            data_read: 0,
            exhausted: false,
            scratch: ScratchBuffer::new(),
        })
    }

    /// Moves back to the first frame.
    pub fn rewind(&mut self) -> WavResult<()> {
        self.inner.seek(SeekFrom::Start(self.data_start))?;
        self.data_read = 0;
        self.exhausted = false;
        Ok(())
    }

    /// Moves to `frame_index`, counted from the first payload byte.
    ///
    /// Seeking to `num_frames()` is allowed and leaves the reader at the end.
    /// A negative index or one past the end is rejected and leaves the
    /// position unchanged.
    pub fn seek(&mut self, frame_index: i64) -> WavResult<()> {
        let offset = u64::try_from(frame_index)
            .map_err(|_| {
                WavError::invalid_argument(
                    "frame_index",
                    format!("negative frame index {}", frame_index),
                )
            })?
            .checked_mul(self.format.block_align() as u64)
            .filter(|&offset| offset <= self.data_len)
            .ok_or_else(|| {
                WavError::invalid_argument(
                    "frame_index",
                    format!(
                        "frame {} is past the end of the stream ({} frames)",
                        frame_index, self.num_frames
                    ),
                )
            })?;

        self.inner.seek(SeekFrom::Start(self.data_start + offset))?;
        self.data_read = offset;
        self.exhausted = false;
        Ok(())
    }

    /// Reads up to `buf.len()` samples, converting to `T`.
    ///
    /// Returns fewer samples only when the data section runs out, and 0 once
    /// it has. Interleaved channel order is preserved.
    pub fn read<T: Sample>(&mut self, buf: &mut [T]) -> WavResult<usize> {
        let width = self.encoding.width();
        let remaining = self.data_len.saturating_sub(self.data_read) / width as u64;
        let wanted = remaining.min(buf.len() as u64) as usize;
        if wanted == 0 {
            return Ok(0);
        }

        let len = wanted * width;
        let bytes = self.scratch.acquire(len)?;
        let got = read_fully(&mut self.inner, &mut bytes[..len])?;
        if got < len {
            self.exhausted = true;
        }

        let whole = got - got % width;
        self.data_read += whole as u64;
        Ok(self.encoding.decode(&bytes[..whole], buf))
    }

    /// Reads the frames between two playback times.
    ///
    /// Times are converted with `round(ms * sample_rate / 1000)`. Reads at
    /// most `buf.len()` samples.
    pub fn read_time_range<T: Sample>(
        &mut self,
        buf: &mut [T],
        start_ms: u64,
        end_ms: u64,
    ) -> WavResult<usize> {
        if end_ms < start_ms {
            return Err(WavError::invalid_argument(
                "end_ms",
                format!("end {} ms is before start {} ms", end_ms, start_ms),
            ));
        }
        let start = self.ms_to_frame(start_ms)?;
        let end = self.ms_to_frame(end_ms)?;
        self.read_frame_range(buf, start, end)
    }

    /// Reads the frames in `start_frame..end_frame`.
    ///
    /// Reads at most `buf.len()` samples, i.e. `(end - start) * channels`
    /// when the buffer is large enough.
    pub fn read_frame_range<T: Sample>(
        &mut self,
        buf: &mut [T],
        start_frame: i64,
        end_frame: i64,
    ) -> WavResult<usize> {
        if end_frame < start_frame {
            return Err(WavError::invalid_argument(
                "end_frame",
                format!("end {} is before start {}", end_frame, start_frame),
            ));
        }
        self.seek(start_frame)?;

        // Both bounds are non-negative once the seek succeeded.
        let frames = (end_frame - start_frame) as u64;
        let count = frames
            .saturating_mul(self.format.channels as u64)
            .min(buf.len() as u64) as usize;
        self.read(&mut buf[..count])
    }

    fn ms_to_frame(&self, ms: u64) -> WavResult<i64> {
        let frame = (ms as u128 * self.format.sample_rate as u128 + 500) / 1000;
        i64::try_from(frame).map_err(|_| {
            WavError::invalid_argument("time_ms", format!("{} ms is out of range", ms))
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.format.bits_per_sample
    }

    pub fn channels(&self) -> u16 {
        self.format.channels
    }

    /// Bytes per sample of one channel.
    pub fn bytes_per_sample(&self) -> u16 {
        self.format.bytes_per_sample()
    }

    pub fn bytes_per_frame(&self) -> u16 {
        self.format.block_align()
    }

    /// Payload length in bytes after clamping to the stream.
    pub fn data_len(&self) -> u64 {
        self.data_len
    }

    /// Whole frames in the payload.
    pub fn num_frames(&self) -> u64 {
        self.num_frames
    }

    /// Playback time of the current position.
    pub fn elapsed_ms(&self) -> u64 {
        self.bytes_to_ms(self.data_read)
    }

    /// Playback time of the whole payload.
    pub fn length_ms(&self) -> u64 {
        self.bytes_to_ms(self.data_len)
    }

    fn bytes_to_ms(&self, bytes: u64) -> u64 {
        let byte_rate = self.format.byte_rate() as u128;
        (bytes as u128 * 1000 / byte_rate) as u64
    }

    /// True once the payload is consumed or the stream ended early.
    pub fn at_end(&self) -> bool {
        self.exhausted
            || self.data_len.saturating_sub(self.data_read) < self.encoding.width() as u64
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// The parsed header, or the synthesized one in raw mode.
    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn data_start(&self) -> u64 {
        self.data_start
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

fn check_raw(raw: Option<PcmFormat>) -> WavResult<PcmFormat> {
    let format = raw.ok_or_else(|| {
        WavError::invalid_argument(
            "raw",
            "sample rate, bit depth and channel count are required for raw PCM",
        )
    })?;
    format.validate()?;
    Ok(format)
}

/// Fills `buf` until it is full or the stream ends.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
