//! Sample types and conversion between on-disk encodings.
//!
//! Integer widths are converted by shifting so the most significant bits line
//! up, which keeps relative loudness across bit depths. Integer to float
//! scales full range onto `[-1, 1)`. Float to integer scales back and
//! saturates at the integer bounds instead of wrapping.

use byteorder::{ByteOrder, LittleEndian};

use crate::format::SampleFormat;

const I24_MIN: i32 = -(1 << 23);
const I24_MAX: i32 = (1 << 23) - 1;

/// On-disk sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// 8-bit unsigned, 128 is silence.
    U8,
    /// 16-bit signed.
    I16,
    /// 24-bit signed, packed in three bytes.
    I24,
    /// 32-bit signed.
    I32,
    /// 32-bit IEEE float.
    F32,
    /// 64-bit IEEE float.
    F64,
}

impl Encoding {
    /// Resolves the encoding for a sample format and bit depth.
    pub fn from_parts(format: SampleFormat, bits_per_sample: u16) -> Option<Self> {
        match (format, bits_per_sample) {
            (SampleFormat::Int, 8) => Some(Encoding::U8),
            (SampleFormat::Int, 16) => Some(Encoding::I16),
            (SampleFormat::Int, 24) => Some(Encoding::I24),
            (SampleFormat::Int, 32) => Some(Encoding::I32),
            (SampleFormat::Float, 32) => Some(Encoding::F32),
            (SampleFormat::Float, 64) => Some(Encoding::F64),
            _ => None,
        }
    }

    /// Width of one sample in bytes.
    pub fn width(self) -> usize {
        match self {
            Encoding::U8 => 1,
            Encoding::I16 => 2,
            Encoding::I24 => 3,
            Encoding::I32 | Encoding::F32 => 4,
            Encoding::F64 => 8,
        }
    }

    /// Decodes little-endian samples from `src` into `dst`.
    ///
    /// Converts `min(src.len() / width, dst.len())` samples and returns that
    /// count.
    pub fn decode<T: Sample>(self, src: &[u8], dst: &mut [T]) -> usize {
        let mut count = 0;
        for (bytes, out) in src.chunks_exact(self.width()).zip(dst.iter_mut()) {
            *out = match self {
                Encoding::U8 => T::from_u8(bytes[0]),
                Encoding::I16 => T::from_i16(LittleEndian::read_i16(bytes)),
                Encoding::I24 => T::from_i24(LittleEndian::read_i24(bytes)),
                Encoding::I32 => T::from_i32(LittleEndian::read_i32(bytes)),
                Encoding::F32 => T::from_f32(LittleEndian::read_f32(bytes)),
                Encoding::F64 => T::from_f64(LittleEndian::read_f64(bytes)),
            };
            count += 1;
        }
        count
    }

    /// Encodes `src` as little-endian samples into `dst`.
    ///
    /// `dst` must hold at least `src.len() * width` bytes. Returns the number
    /// of bytes produced.
    pub fn encode<T: Sample>(self, src: &[T], dst: &mut [u8]) -> usize {
        let width = self.width();
        for (sample, bytes) in src.iter().zip(dst.chunks_exact_mut(width)) {
            match self {
                Encoding::U8 => bytes[0] = sample.to_u8(),
                Encoding::I16 => LittleEndian::write_i16(bytes, sample.to_i16()),
                Encoding::I24 => LittleEndian::write_i24(bytes, sample.to_i24()),
                Encoding::I32 => LittleEndian::write_i32(bytes, sample.to_i32()),
                Encoding::F32 => LittleEndian::write_f32(bytes, sample.to_f32()),
                Encoding::F64 => LittleEndian::write_f64(bytes, sample.to_f64()),
            }
        }
        src.len().min(dst.len() / width) * width
    }
}

/// In-memory sample type a reader can produce and a writer can consume.
///
/// `i24` values travel as `i32` in the range `[-2^23, 2^23)`.
pub trait Sample: Copy + Default {
    fn from_u8(v: u8) -> Self;
    fn from_i16(v: i16) -> Self;
    fn from_i24(v: i32) -> Self;
    fn from_i32(v: i32) -> Self;
    fn from_f32(v: f32) -> Self;
    fn from_f64(v: f64) -> Self;

    fn to_u8(self) -> u8;
    fn to_i16(self) -> i16;
    fn to_i24(self) -> i32;
    fn to_i32(self) -> i32;
    fn to_f32(self) -> f32;
    fn to_f64(self) -> f64;
}

/// Scales a float sample to an integer range and saturates.
#[inline]
fn quantize(v: f64, full_scale: f64, min: f64, max: f64) -> f64 {
    (v * full_scale).round().clamp(min, max)
}

#[inline]
fn float_to_u8(v: f64) -> u8 {
    (v * 128.0 + 128.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
fn float_to_i16(v: f64) -> i16 {
    quantize(v, 32768.0, i16::MIN as f64, i16::MAX as f64) as i16
}

#[inline]
fn float_to_i24(v: f64) -> i32 {
    quantize(v, 8_388_608.0, I24_MIN as f64, I24_MAX as f64) as i32
}

#[inline]
fn float_to_i32(v: f64) -> i32 {
    quantize(v, 2_147_483_648.0, i32::MIN as f64, i32::MAX as f64) as i32
}

impl Sample for u8 {
    fn from_u8(v: u8) -> Self {
        v
    }
    fn from_i16(v: i16) -> Self {
        ((v >> 8) + 128) as u8
    }
    fn from_i24(v: i32) -> Self {
        ((v >> 16) + 128) as u8
    }
    fn from_i32(v: i32) -> Self {
        ((v >> 24) + 128) as u8
    }
    fn from_f32(v: f32) -> Self {
        float_to_u8(v as f64)
    }
    fn from_f64(v: f64) -> Self {
        float_to_u8(v)
    }

    fn to_u8(self) -> u8 {
        self
    }
    fn to_i16(self) -> i16 {
        (self as i16 - 128) << 8
    }
    fn to_i24(self) -> i32 {
        (self as i32 - 128) << 16
    }
    fn to_i32(self) -> i32 {
        (self as i32 - 128) << 24
    }
    fn to_f32(self) -> f32 {
        (self as f32 - 128.0) / 128.0
    }
    fn to_f64(self) -> f64 {
        (self as f64 - 128.0) / 128.0
    }
}

impl Sample for i16 {
    fn from_u8(v: u8) -> Self {
        (v as i16 - 128) << 8
    }
    fn from_i16(v: i16) -> Self {
        v
    }
    fn from_i24(v: i32) -> Self {
        (v >> 8) as i16
    }
    fn from_i32(v: i32) -> Self {
        (v >> 16) as i16
    }
    fn from_f32(v: f32) -> Self {
        float_to_i16(v as f64)
    }
    fn from_f64(v: f64) -> Self {
        float_to_i16(v)
    }

    fn to_u8(self) -> u8 {
        ((self >> 8) + 128) as u8
    }
    fn to_i16(self) -> i16 {
        self
    }
    fn to_i24(self) -> i32 {
        (self as i32) << 8
    }
    fn to_i32(self) -> i32 {
        (self as i32) << 16
    }
    fn to_f32(self) -> f32 {
        self as f32 / 32768.0
    }
    fn to_f64(self) -> f64 {
        self as f64 / 32768.0
    }
}

impl Sample for f32 {
    fn from_u8(v: u8) -> Self {
        (v as f32 - 128.0) / 128.0
    }
    fn from_i16(v: i16) -> Self {
        v as f32 / 32768.0
    }
    fn from_i24(v: i32) -> Self {
        v as f32 / 8_388_608.0
    }
    fn from_i32(v: i32) -> Self {
        (v as f64 / 2_147_483_648.0) as f32
    }
    fn from_f32(v: f32) -> Self {
        v
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    fn to_u8(self) -> u8 {
        float_to_u8(self as f64)
    }
    fn to_i16(self) -> i16 {
        float_to_i16(self as f64)
    }
    fn to_i24(self) -> i32 {
        float_to_i24(self as f64)
    }
    fn to_i32(self) -> i32 {
        float_to_i32(self as f64)
    }
    fn to_f32(self) -> f32 {
        self
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    fn from_u8(v: u8) -> Self {
        (v as f64 - 128.0) / 128.0
    }
    fn from_i16(v: i16) -> Self {
        v as f64 / 32768.0
    }
    fn from_i24(v: i32) -> Self {
        v as f64 / 8_388_608.0
    }
    fn from_i32(v: i32) -> Self {
        v as f64 / 2_147_483_648.0
    }
    fn from_f32(v: f32) -> Self {
        v as f64
    }
    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_u8(self) -> u8 {
        float_to_u8(self)
    }
    fn to_i16(self) -> i16 {
        float_to_i16(self)
    }
    fn to_i24(self) -> i32 {
        float_to_i24(self)
    }
    fn to_i32(self) -> i32 {
        float_to_i32(self)
    }
    fn to_f32(self) -> f32 {
        self as f32
    }
    fn to_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_to_i16_aligns_msb() {
        assert_eq!(i16::from_u8(128), 0);
        assert_eq!(i16::from_u8(0), -32768);
        assert_eq!(i16::from_u8(255), 32512);
    }

    #[test]
    fn test_i16_to_u8_keeps_top_byte() {
        assert_eq!(u8::from_i16(0), 128);
        assert_eq!(u8::from_i16(i16::MIN), 0);
        assert_eq!(u8::from_i16(i16::MAX), 255);
        // Low byte is dropped, not wrapped.
        assert_eq!(u8::from_i16(0x01FF), 129);
    }

    #[test]
    fn test_wide_ints_to_i16() {
        assert_eq!(i16::from_i24(0x12_3456), 0x1234);
        assert_eq!(i16::from_i24(I24_MIN), i16::MIN);
        assert_eq!(i16::from_i32(0x1234_5678), 0x1234);
        assert_eq!(i16::from_i32(i32::MIN), i16::MIN);
    }

    #[test]
    fn test_ints_to_float_range() {
        assert_eq!(f32::from_i16(i16::MIN), -1.0);
        assert!(f32::from_i16(i16::MAX) < 1.0);
        assert_eq!(f32::from_u8(0), -1.0);
        assert_eq!(f32::from_u8(128), 0.0);
        assert_eq!(f64::from_i24(I24_MIN), -1.0);
        assert_eq!(f64::from_i32(i32::MIN), -1.0);
    }

    #[test]
    fn test_float_saturates() {
        assert_eq!(2.5f32.to_i16(), i16::MAX);
        assert_eq!((-2.5f32).to_i16(), i16::MIN);
        assert_eq!(1.0f64.to_i16(), i16::MAX);
        assert_eq!(3.0f64.to_u8(), 255);
        assert_eq!((-3.0f64).to_u8(), 0);
        assert_eq!(9.0f32.to_i24(), I24_MAX);
        assert_eq!(9.0f64.to_i32(), i32::MAX);
        assert_eq!((-9.0f64).to_i32(), i32::MIN);
    }

    #[test]
    fn test_float_to_int_round_trip_exact() {
        for v in [i16::MIN, -12345, -1, 0, 1, 12345, i16::MAX] {
            assert_eq!(v.to_f32().to_i16(), v);
            assert_eq!(v.to_f64().to_i16(), v);
        }
        for v in [0u8, 1, 127, 128, 200, 255] {
            assert_eq!(v.to_f32().to_u8(), v);
        }
    }

    #[test]
    fn test_encoding_from_parts() {
        assert_eq!(Encoding::from_parts(SampleFormat::Int, 24), Some(Encoding::I24));
        assert_eq!(Encoding::from_parts(SampleFormat::Float, 64), Some(Encoding::F64));
        assert_eq!(Encoding::from_parts(SampleFormat::Float, 16), None);
        assert_eq!(Encoding::from_parts(SampleFormat::Int, 20), None);
    }

    #[test]
    fn test_decode_i24() {
        let bytes = [0x56, 0x34, 0x12, 0x00, 0x00, 0x80];
        let mut out = [0i16; 2];
        assert_eq!(Encoding::I24.decode(&bytes, &mut out), 2);
        assert_eq!(out, [0x1234, i16::MIN]);
    }

    #[test]
    fn test_decode_stops_at_shorter_side() {
        let bytes = [1u8, 2, 3, 4, 5];
        let mut out = [0u8; 3];
        assert_eq!(Encoding::U8.decode(&bytes, &mut out), 3);
        assert_eq!(out, [1, 2, 3]);

        let mut wide = [0i16; 8];
        assert_eq!(Encoding::I16.decode(&bytes, &mut wide), 2);
    }

    #[test]
    fn test_encode_i16_to_u8_file() {
        let mut out = [0u8; 3];
        let written = Encoding::U8.encode(&[i16::MIN, 0, i16::MAX], &mut out);
        assert_eq!(written, 3);
        assert_eq!(out, [0, 128, 255]);
    }

    #[test]
    fn test_encode_float_file_passes_through() {
        let mut out = [0u8; 8];
        Encoding::F32.encode(&[1.5f32, -0.25], &mut out);
        assert_eq!(LittleEndian::read_f32(&out[0..4]), 1.5);
        assert_eq!(LittleEndian::read_f32(&out[4..8]), -0.25);
    }
}
