//! PCM stream parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WavError, WavResult};
use crate::sample::Encoding;

/// Format code for linear integer PCM.
pub const FORMAT_PCM: u16 = 1;

/// Format code for IEEE float samples.
pub const FORMAT_IEEE_FLOAT: u16 = 3;

/// How sample values are represented on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleFormat {
    /// Linear integer PCM (unsigned for 8 bit, signed otherwise).
    #[default]
    Int,
    /// IEEE 754 floating point.
    Float,
}

impl SampleFormat {
    /// Format code written into the fmt chunk.
    pub fn format_tag(self) -> u16 {
        match self {
            SampleFormat::Int => FORMAT_PCM,
            SampleFormat::Float => FORMAT_IEEE_FLOAT,
        }
    }

    /// Maps a fmt chunk format code, if supported.
    pub fn from_format_tag(tag: u16) -> Option<Self> {
        match tag {
            FORMAT_PCM => Some(SampleFormat::Int),
            FORMAT_IEEE_FLOAT => Some(SampleFormat::Float),
            _ => None,
        }
    }
}

/// Whether a stream carries a RIFF/WAVE header around its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// Canonical RIFF header followed by the payload.
    #[default]
    Riff,
    /// Payload only, parameters supplied out of band.
    Raw,
}

impl Framing {
    /// Framing a reader assumes for `path`: header mode for `.wav`, raw otherwise.
    pub fn for_reading(path: &Path) -> Self {
        if has_extension(path, "wav") {
            Framing::Riff
        } else {
            Framing::Raw
        }
    }

    /// Framing a writer uses for `path`: raw for `.pcm`, header mode otherwise.
    pub fn for_writing(path: &Path) -> Self {
        if has_extension(path, "pcm") {
            Framing::Raw
        } else {
            Framing::Riff
        }
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// PCM stream parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample, per channel.
    pub bits_per_sample: u16,
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Integer or float samples.
    #[serde(default)]
    pub sample_format: SampleFormat,
}

impl PcmFormat {
    /// Creates an integer PCM format.
    pub fn new(sample_rate: u32, bits_per_sample: u16, channels: u16) -> Self {
        Self {
            sample_rate,
            bits_per_sample,
            channels,
            sample_format: SampleFormat::Int,
        }
    }

    /// Creates a 32-bit IEEE float format.
    pub fn float(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            bits_per_sample: 32,
            channels,
            sample_format: SampleFormat::Float,
        }
    }

    /// Creates a 16-bit mono format.
    pub fn mono(sample_rate: u32) -> Self {
        Self::new(sample_rate, 16, 1)
    }

    /// Creates a 16-bit stereo format.
    pub fn stereo(sample_rate: u32) -> Self {
        Self::new(sample_rate, 16, 2)
    }

    /// Bytes per sample (per channel).
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per frame (all channels). Saturates; see [`PcmFormat::validate`].
    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(self.bytes_per_sample())
    }

    /// Bytes per second. Saturates; see [`PcmFormat::validate`].
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(self.block_align() as u32)
    }

    /// Byte rate, or `None` if the frame size or byte rate overflows its
    /// header field.
    pub fn checked_byte_rate(&self) -> Option<u32> {
        self.channels
            .checked_mul(self.bytes_per_sample())
            .and_then(|align| self.sample_rate.checked_mul(align as u32))
    }

    /// On-disk encoding, if this combination is supported.
    pub fn encoding(&self) -> Option<Encoding> {
        Encoding::from_parts(self.sample_format, self.bits_per_sample)
    }

    /// Checks that the parameters describe a stream this crate can handle.
    pub fn validate(&self) -> WavResult<()> {
        if self.sample_rate == 0 {
            return Err(WavError::invalid_argument(
                "sample_rate",
                "must be greater than zero",
            ));
        }
        if self.channels == 0 {
            return Err(WavError::invalid_argument(
                "channels",
                "must be greater than zero",
            ));
        }
        if self.encoding().is_none() {
            return Err(WavError::invalid_argument(
                "bits_per_sample",
                format!(
                    "{} bit {:?} samples are not supported",
                    self.bits_per_sample, self.sample_format
                ),
            ));
        }
        if self.checked_byte_rate().is_none() {
            return Err(WavError::invalid_argument(
                "channels",
                "frame size or byte rate does not fit the header fields",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_derived_sizes() {
        let format = PcmFormat::stereo(44100);
        assert_eq!(format.bytes_per_sample(), 2);
        assert_eq!(format.block_align(), 4);
        assert_eq!(format.byte_rate(), 176400);
        assert_eq!(format.encoding(), Some(Encoding::I16));
    }

    #[test]
    fn test_float_format() {
        let format = PcmFormat::float(48000, 1);
        assert_eq!(format.sample_format.format_tag(), FORMAT_IEEE_FLOAT);
        assert_eq!(format.block_align(), 4);
        assert_eq!(format.encoding(), Some(Encoding::F32));
    }

    #[test]
    fn test_validate_rejects_zero_fields() {
        assert!(PcmFormat::new(0, 16, 1).validate().is_err());
        assert!(PcmFormat::new(8000, 16, 0).validate().is_err());
        assert!(PcmFormat::new(8000, 12, 1).validate().is_err());
        assert!(PcmFormat::new(8000, 24, 2).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_overflowing_sizes() {
        let wide = PcmFormat::new(8000, 32, u16::MAX);
        assert_eq!(wide.block_align(), u16::MAX);
        assert!(wide.validate().is_err());

        let fast = PcmFormat::new(u32::MAX, 16, 2);
        assert_eq!(fast.byte_rate(), u32::MAX);
        assert!(fast.validate().is_err());
    }

    #[test]
    fn test_float_requires_32_or_64_bits() {
        let mut format = PcmFormat::float(8000, 1);
        format.bits_per_sample = 16;
        assert!(format.validate().is_err());
        format.bits_per_sample = 64;
        assert!(format.validate().is_ok());
    }

    #[test]
    fn test_format_tag_mapping() {
        assert_eq!(SampleFormat::from_format_tag(1), Some(SampleFormat::Int));
        assert_eq!(SampleFormat::from_format_tag(3), Some(SampleFormat::Float));
        assert_eq!(SampleFormat::from_format_tag(0xFFFE), None);
    }

    #[test]
    fn test_framing_from_extension() {
        assert_eq!(Framing::for_reading(Path::new("take.wav")), Framing::Riff);
        assert_eq!(Framing::for_reading(Path::new("TAKE.WAV")), Framing::Riff);
        assert_eq!(Framing::for_reading(Path::new("take.pcm")), Framing::Raw);
        assert_eq!(Framing::for_reading(Path::new("take")), Framing::Raw);
        assert_eq!(Framing::for_writing(Path::new("take.Pcm")), Framing::Raw);
        assert_eq!(Framing::for_writing(Path::new("take.wav")), Framing::Riff);
        assert_eq!(Framing::for_writing(Path::new("take")), Framing::Riff);
    }

    #[test]
    fn test_serde_defaults_to_int() {
        let format: PcmFormat =
            serde_json::from_str(r#"{"sample_rate":22050,"bits_per_sample":8,"channels":1}"#)
                .unwrap();
        assert_eq!(format, PcmFormat::new(22050, 8, 1));
    }
}
