//! Header decoding and canonical encoding.

use std::io::{self, Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::chunk::{
    ChunkHeader, DataChunk, FactChunk, FormatChunk, RiffChunk, DATA_TAG, FACT_TAG, FMT_LEN,
    FMT_TAG, RIFF_TAG, WAVE_TAG,
};
use crate::error::{WavError, WavResult};
use crate::format::PcmFormat;

/// Size of the canonical header in bytes.
pub const HEADER_LEN: u64 = 44;

/// `package_len - data_len` for the canonical layout.
pub const RIFF_OVERHEAD: u32 = 36;

/// Parsed or synthesized WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff: RiffChunk,
    pub format: FormatChunk,
    pub fact: Option<FactChunk>,
    pub data: DataChunk,
}

/// A decoded header together with where its payload starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedHeader {
    pub header: WavHeader,
    /// Absolute stream offset of the first payload byte.
    pub data_start: u64,
    /// Validated stream parameters.
    pub format: PcmFormat,
}

impl WavHeader {
    /// Header a writer emits: 16-byte fmt chunk, no fact chunk.
    pub fn canonical(format: &PcmFormat, data_len: u32) -> Self {
        Self {
            riff: RiffChunk {
                package_len: data_len.saturating_add(RIFF_OVERHEAD),
            },
            format: FormatChunk::from_format(format),
            fact: None,
            data: DataChunk { data_len },
        }
    }

    /// In-memory header for a raw PCM stream that carries none on disk.
    pub fn synthesize_raw(format: &PcmFormat, data_len: u64) -> Self {
        Self::canonical(format, u32::try_from(data_len).unwrap_or(u32::MAX))
    }

    /// Parses a header starting at the reader's current position.
    ///
    /// Sub-chunks are scanned by tag until `data`. `fmt ` and `fact` are
    /// parsed; anything else, including tags with non-ASCII bytes, is skipped
    /// by its declared length. After an odd-sized body a following zero byte
    /// is consumed as padding; any other byte is left for the next chunk
    /// header. On success the reader is positioned at the first payload byte.
    pub fn decode<R: Read + Seek>(reader: &mut R) -> WavResult<DecodedHeader> {
        let riff = read_riff(reader)?;

        let mut format: Option<(FormatChunk, PcmFormat)> = None;
        let mut fact = None;

        loop {
            let chunk = ChunkHeader::read(reader)
                .map_err(|e| WavError::from_header_io(e, "searching for data chunk"))?;

            match chunk.id {
                FMT_TAG => {
                    let fmt = read_format(reader, &chunk)?;
                    let pcm = fmt.pcm_format()?;
                    format = Some((fmt, pcm));
                }
                FACT_TAG => {
                    fact = Some(read_fact(reader, &chunk)?);
                }
                DATA_TAG => {
                    let (fmt, pcm) = format
                        .ok_or_else(|| WavError::format("data chunk found before fmt chunk"))?;
                    let data_start = reader.stream_position()?;
                    return Ok(DecodedHeader {
                        header: WavHeader {
                            riff,
                            format: fmt,
                            fact,
                            data: DataChunk {
                                data_len: chunk.size,
                            },
                        },
                        data_start,
                        format: pcm,
                    });
                }
                _ => {
                    tracing::debug!(tag = %chunk.tag(), size = chunk.size, "skipping chunk");
                    skip_body(reader, &chunk, chunk.size)?;
                }
            }
        }
    }

    /// Serializes the canonical 44-byte layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN as usize);
        self.write_to(&mut bytes).expect("writing to a Vec cannot fail");
        bytes
    }

    /// Writes the canonical layout. `fmt ` is always 16 bytes and `fact` is
    /// never written; `package_len` is written as stored.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&RIFF_TAG)?;
        writer.write_u32::<LittleEndian>(self.riff.package_len)?;
        writer.write_all(&WAVE_TAG)?;
        self.format.write(writer)?;
        ChunkHeader {
            id: DATA_TAG,
            size: self.data.data_len,
        }
        .write(writer)
    }

    /// Whole frames in the declared data section.
    pub fn num_frames(&self) -> u64 {
        match self.format.block_align {
            0 => 0,
            align => self.data.data_len as u64 / align as u64,
        }
    }
}

fn read_riff<R: Read>(reader: &mut R) -> WavResult<RiffChunk> {
    let header =
        ChunkHeader::read(reader).map_err(|e| WavError::from_header_io(e, "reading RIFF chunk"))?;
    if header.id != RIFF_TAG {
        return Err(WavError::format(format!(
            "expected 'RIFF', found {:?}",
            header.tag()
        )));
    }

    let mut wave = [0u8; 4];
    reader
        .read_exact(&mut wave)
        .map_err(|e| WavError::from_header_io(e, "reading WAVE tag"))?;
    if wave != WAVE_TAG {
        return Err(WavError::format(format!(
            "expected 'WAVE', found {:?}",
            String::from_utf8_lossy(&wave)
        )));
    }

    Ok(RiffChunk {
        package_len: header.size,
    })
}

fn read_format<R: Read + Seek>(reader: &mut R, chunk: &ChunkHeader) -> WavResult<FormatChunk> {
    if chunk.size < FMT_LEN {
        return Err(WavError::format(format!(
            "fmt chunk too small: {} bytes",
            chunk.size
        )));
    }
    let format = FormatChunk::read_fields(reader, chunk.size)
        .map_err(|e| WavError::from_header_io(e, "reading fmt chunk"))?;
    // An 18-byte chunk carries a cbSize field; larger ones carry extension data.
    skip_body(reader, chunk, chunk.size - FMT_LEN)?;
    Ok(format)
}

fn read_fact<R: Read + Seek>(reader: &mut R, chunk: &ChunkHeader) -> WavResult<FactChunk> {
    if chunk.size < 4 {
        skip_body(reader, chunk, chunk.size)?;
        return Ok(FactChunk {
            fact_len: chunk.size,
            sample_len: 0,
        });
    }
    let sample_len = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| WavError::from_header_io(e, "reading fact chunk"))?;
    skip_body(reader, chunk, chunk.size - 4)?;
    Ok(FactChunk {
        fact_len: chunk.size,
        sample_len,
    })
}

/// Skips `remaining` body bytes of `chunk`, then its pad byte if one is present.
fn skip_body<R: Read + Seek>(
    reader: &mut R,
    chunk: &ChunkHeader,
    remaining: u32,
) -> WavResult<()> {
    if remaining > 0 {
        reader.seek(SeekFrom::Current(remaining as i64))?;
    }
    if chunk.may_be_padded() {
        let mut pad = [0u8; 1];
        let got = read_pad(reader, &mut pad)?;
        if got == 1 && pad[0] != 0 {
            tracing::debug!(tag = %chunk.tag(), "odd-sized chunk without pad byte");
            reader.seek(SeekFrom::Current(-1))?;
        }
    }
    Ok(())
}

fn read_pad<R: Read>(reader: &mut R, pad: &mut [u8; 1]) -> io::Result<usize> {
    loop {
        match reader.read(pad) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
