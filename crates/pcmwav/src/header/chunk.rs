//! RIFF/WAVE chunk layouts.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{WavError, WavResult};
use crate::format::{PcmFormat, SampleFormat};

/// RIFF container tag.
pub const RIFF_TAG: [u8; 4] = *b"RIFF";
/// WAVE form type.
pub const WAVE_TAG: [u8; 4] = *b"WAVE";
/// Format chunk tag.
pub const FMT_TAG: [u8; 4] = *b"fmt ";
/// Fact chunk tag.
pub const FACT_TAG: [u8; 4] = *b"fact";
/// Data chunk tag.
pub const DATA_TAG: [u8; 4] = *b"data";

/// Length of the format chunk body this crate writes.
pub const FMT_LEN: u32 = 16;

/// Tag and length that prefix every sub-chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
}

impl ChunkHeader {
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut id = [0u8; 4];
        reader.read_exact(&mut id)?;
        let size = reader.read_u32::<LittleEndian>()?;
        Ok(Self { id, size })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.id)?;
        writer.write_u32::<LittleEndian>(self.size)
    }

    /// Odd-sized bodies may be followed by a zero pad byte.
    pub fn may_be_padded(&self) -> bool {
        self.size & 1 == 1
    }

    /// Printable form of the tag for diagnostics.
    pub fn tag(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }
}

/// The outer `RIFF....WAVE` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffChunk {
    /// Size of everything after this field.
    pub package_len: u32,
}

/// The `fmt ` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChunk {
    /// Declared body length (16, or 18 with two bytes of extra info).
    pub format_len: u32,
    /// 1 = integer PCM, 3 = IEEE float.
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    /// Bytes per second.
    pub byte_rate: u32,
    /// Bytes per frame, all channels.
    pub block_align: u16,
    /// Bits per sample, per channel.
    pub bits_per_sample: u16,
}

impl FormatChunk {
    pub fn from_format(format: &PcmFormat) -> Self {
        Self {
            format_len: FMT_LEN,
            format_tag: format.sample_format.format_tag(),
            channels: format.channels,
            sample_rate: format.sample_rate,
            byte_rate: format.byte_rate(),
            block_align: format.block_align(),
            bits_per_sample: format.bits_per_sample,
        }
    }

    /// Reads the 16 fixed bytes of the body. Surplus bytes are left unread.
    pub(crate) fn read_fields<R: Read>(reader: &mut R, format_len: u32) -> io::Result<Self> {
        Ok(Self {
            format_len,
            format_tag: reader.read_u16::<LittleEndian>()?,
            channels: reader.read_u16::<LittleEndian>()?,
            sample_rate: reader.read_u32::<LittleEndian>()?,
            byte_rate: reader.read_u32::<LittleEndian>()?,
            block_align: reader.read_u16::<LittleEndian>()?,
            bits_per_sample: reader.read_u16::<LittleEndian>()?,
        })
    }

    /// Writes the chunk with a 16-byte body.
    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        ChunkHeader {
            id: FMT_TAG,
            size: FMT_LEN,
        }
        .write(writer)?;
        writer.write_u16::<LittleEndian>(self.format_tag)?;
        writer.write_u16::<LittleEndian>(self.channels)?;
        writer.write_u32::<LittleEndian>(self.sample_rate)?;
        writer.write_u32::<LittleEndian>(self.byte_rate)?;
        writer.write_u16::<LittleEndian>(self.block_align)?;
        writer.write_u16::<LittleEndian>(self.bits_per_sample)
    }

    /// Validates the fields and converts them to stream parameters.
    pub fn pcm_format(&self) -> WavResult<PcmFormat> {
        let sample_format = SampleFormat::from_format_tag(self.format_tag).ok_or_else(|| {
            WavError::format(format!(
                "unsupported format code {:#06x} (only PCM and IEEE float)",
                self.format_tag
            ))
        })?;

        let format = PcmFormat {
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            channels: self.channels,
            sample_format,
        };

        if format.channels == 0 {
            return Err(WavError::format("channel count is zero"));
        }
        if format.sample_rate == 0 {
            return Err(WavError::format("sample rate is zero"));
        }
        if format.encoding().is_none() {
            return Err(WavError::format(format!(
                "unsupported sample width: {} bit {:?}",
                format.bits_per_sample, sample_format
            )));
        }
        if format.checked_byte_rate().is_none() {
            return Err(WavError::format(format!(
                "{} channels at {} Hz do not fit the header fields",
                format.channels, format.sample_rate
            )));
        }
        if self.block_align != format.block_align() {
            return Err(WavError::format(format!(
                "block align mismatch: expected {}, got {}",
                format.block_align(),
                self.block_align
            )));
        }
        if self.byte_rate != format.byte_rate() {
            tracing::warn!(
                declared = self.byte_rate,
                expected = format.byte_rate(),
                "fmt chunk byte rate does not match sample rate and block align"
            );
        }

        Ok(format)
    }
}

/// The optional `fact` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactChunk {
    pub fact_len: u32,
    /// Frames per channel, as declared by the producer.
    pub sample_len: u32,
}

/// The `data` section header. The payload follows it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChunk {
    /// Payload length in bytes.
    pub data_len: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_chunk() -> FormatChunk {
        FormatChunk::from_format(&PcmFormat::stereo(44100))
    }

    #[test]
    fn test_may_be_padded() {
        let even = ChunkHeader { id: *b"LIST", size: 10 };
        let odd = ChunkHeader { id: *b"LIST", size: 11 };
        assert!(!even.may_be_padded());
        assert!(odd.may_be_padded());
    }

    #[test]
    fn test_format_chunk_write_layout() {
        let mut bytes = Vec::new();
        stereo_chunk().write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[0..4], b"fmt ");
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 16);
        assert_eq!(u16::from_le_bytes([bytes[10], bytes[11]]), 2);
        assert_eq!(u16::from_le_bytes([bytes[20], bytes[21]]), 4);
    }

    #[test]
    fn test_pcm_format_rejects_extensible() {
        let mut chunk = stereo_chunk();
        chunk.format_tag = 0xFFFE;
        let err = chunk.pcm_format().unwrap_err();
        assert!(err.to_string().contains("0xfffe"));
    }

    #[test]
    fn test_pcm_format_rejects_block_align_mismatch() {
        let mut chunk = stereo_chunk();
        chunk.block_align = 3;
        assert!(matches!(chunk.pcm_format(), Err(WavError::Format { .. })));
    }

    #[test]
    fn test_pcm_format_tolerates_byte_rate_mismatch() {
        let mut chunk = stereo_chunk();
        chunk.byte_rate = 0;
        assert_eq!(chunk.pcm_format().unwrap(), PcmFormat::stereo(44100));
    }

    #[test]
    fn test_pcm_format_rejects_overflowing_frame() {
        let mut chunk = stereo_chunk();
        chunk.channels = u16::MAX;
        chunk.block_align = u16::MAX;
        assert!(matches!(chunk.pcm_format(), Err(WavError::Format { .. })));
    }

    #[test]
    fn test_tag_lossy() {
        let header = ChunkHeader { id: *b"PEAK", size: 0 };
        assert_eq!(header.tag(), "PEAK");
    }
}
