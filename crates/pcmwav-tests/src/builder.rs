//! Byte-level WAV builder for layouts `WavWriter` never produces.
//!
//! Other tools emit 18-byte fmt chunks, `fact` chunks, `LIST` metadata and
//! placeholder lengths. The builder assembles such files chunk by chunk so
//! the reader can be tested against them.

use pcmwav::PcmFormat;

/// Assembles a RIFF/WAVE file from individual chunks.
#[derive(Debug, Clone)]
pub struct LegacyWavBuilder {
    chunks: Vec<u8>,
    riff_tag: [u8; 4],
    package_len: Option<u32>,
}

impl LegacyWavBuilder {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            riff_tag: *b"RIFF",
            package_len: None,
        }
    }

    /// Replaces the leading `RIFF` tag.
    pub fn riff_tag(mut self, tag: &[u8; 4]) -> Self {
        self.riff_tag = *tag;
        self
    }

    /// Writes a fixed package length instead of the computed one.
    pub fn package_len(mut self, len: u32) -> Self {
        self.package_len = Some(len);
        self
    }

    /// Appends an arbitrary chunk, padded to an even length.
    pub fn chunk(mut self, id: &[u8; 4], body: &[u8]) -> Self {
        self.chunks.extend_from_slice(id);
        self.chunks
            .extend_from_slice(&(body.len() as u32).to_le_bytes());
        self.chunks.extend_from_slice(body);
        if body.len() % 2 == 1 {
            self.chunks.push(0);
        }
        self
    }

    /// Appends a 16-byte fmt chunk for `format`.
    pub fn fmt(self, format: &PcmFormat) -> Self {
        let body = fmt_body(format);
        self.chunk(b"fmt ", &body)
    }

    /// Appends an 18-byte fmt chunk (`cbSize` = 0).
    pub fn fmt_extended(self, format: &PcmFormat) -> Self {
        let mut body = fmt_body(format);
        body.extend_from_slice(&0u16.to_le_bytes());
        self.chunk(b"fmt ", &body)
    }

    /// Appends a fact chunk holding `frames`.
    pub fn fact(self, frames: u32) -> Self {
        self.chunk(b"fact", &frames.to_le_bytes())
    }

    /// Appends a LIST/INFO chunk with a software tag.
    pub fn list_info(self, software: &str) -> Self {
        let mut text = software.as_bytes().to_vec();
        text.push(0);
        let mut body = Vec::new();
        body.extend_from_slice(b"INFO");
        body.extend_from_slice(b"ISFT");
        body.extend_from_slice(&(text.len() as u32).to_le_bytes());
        body.extend_from_slice(&text);
        if text.len() % 2 == 1 {
            body.push(0);
        }
        self.chunk(b"LIST", &body)
    }

    /// Appends the data chunk with its true length.
    pub fn data(self, payload: &[u8]) -> Self {
        let len = payload.len() as u32;
        self.data_with_len(payload, len)
    }

    /// Appends the data chunk with a declared length that may be wrong.
    pub fn data_with_len(mut self, payload: &[u8], declared: u32) -> Self {
        self.chunks.extend_from_slice(b"data");
        self.chunks.extend_from_slice(&declared.to_le_bytes());
        self.chunks.extend_from_slice(payload);
        self
    }

    /// Produces the file bytes.
    pub fn build(self) -> Vec<u8> {
        let package_len = self
            .package_len
            .unwrap_or(4 + self.chunks.len() as u32);
        let mut bytes = Vec::with_capacity(12 + self.chunks.len());
        bytes.extend_from_slice(&self.riff_tag);
        bytes.extend_from_slice(&package_len.to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(&self.chunks);
        bytes
    }
}

impl Default for LegacyWavBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn fmt_body(format: &PcmFormat) -> Vec<u8> {
    let mut body = Vec::with_capacity(18);
    body.extend_from_slice(&format.sample_format.format_tag().to_le_bytes());
    body.extend_from_slice(&format.channels.to_le_bytes());
    body.extend_from_slice(&format.sample_rate.to_le_bytes());
    body.extend_from_slice(&format.byte_rate().to_le_bytes());
    body.extend_from_slice(&format.block_align().to_le_bytes());
    body.extend_from_slice(&format.bits_per_sample.to_le_bytes());
    body
}

/// Little-endian bytes of 16-bit samples.
pub fn i16_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Little-endian bytes of 32-bit float samples.
pub fn f32_bytes(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}
