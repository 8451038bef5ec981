//! RIFF/WAVE header codec.
//!
//! Readers accept the legacy variants seen in the wild (18-byte fmt chunks,
//! `fact` chunks, vendor chunks before `data`). Writers always produce the
//! minimal 44-byte layout.

mod chunk;
mod codec;


pub use chunk::{
    ChunkHeader, DataChunk, FactChunk, FormatChunk, RiffChunk, DATA_TAG, FACT_TAG, FMT_LEN,
    FMT_TAG, RIFF_TAG, WAVE_TAG,
};
pub use codec::{DecodedHeader, WavHeader, HEADER_LEN, RIFF_OVERHEAD};
