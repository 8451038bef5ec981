//! WAV (RIFF/WAVE) and raw PCM reading and writing.
//!
//! # Overview
//!
//! [`WavReader`] parses a WAV header (or takes the stream parameters from the
//! caller for raw PCM) and hands out samples as `u8`, `i16`, `f32` or `f64`,
//! whatever the on-disk encoding. It supports seeking by frame index and
//! reading by frame or time range.
//!
//! [`WavWriter`] accepts the same sample types, converts them to the
//! configured on-disk encoding with saturation, and patches the header
//! lengths when it is closed.
//!
//! Supported on-disk encodings are 8-bit unsigned, 16/24/32-bit signed
//! integer PCM and 32/64-bit IEEE float. Compressed codecs are rejected.
//!
//! # Example
//!
//! ```no_run
//! use pcmwav::{PcmFormat, WavReader, WavWriter};
//!
//! # fn main() -> pcmwav::WavResult<()> {
//! let mut writer = WavWriter::create("tone.wav", PcmFormat::stereo(44100))?;
//! writer.write(&[0.25f32, -0.25, 0.5, -0.5])?;
//! writer.close()?;
//!
//! let mut reader = WavReader::open("tone.wav", None)?;
//! let mut samples = [0i16; 4];
//! let n = reader.read(&mut samples)?;
//! assert_eq!(n, 4);
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Structure
//!
//! - [`reader`] - Sequential and random-access reading
//! - [`writer`] - Writing with deferred header finalization
//! - [`header`] - RIFF/WAVE chunk layouts and header codec
//! - [`sample`] - Sample types and encoding conversion
//! - [`format`] - Stream parameters and framing
//! - [`session`] - Audio session and recording engine boundaries

pub mod buffer;
pub mod error;
pub mod format;
pub mod header;
pub mod reader;
pub mod sample;
pub mod session;
pub mod writer;

// Re-export main types at crate root
pub use buffer::ScratchBuffer;
pub use error::{WavError, WavResult};
pub use format::{Framing, PcmFormat, SampleFormat};
pub use header::{DecodedHeader, WavHeader, HEADER_LEN};
pub use reader::WavReader;
pub use sample::{Encoding, Sample};
pub use session::{AudioSession, CompletionCallback, RecordSettings, RecordingEngine};
pub use writer::WavWriter;
