//! Cross-checks against `hound`, an independent WAV implementation.
//!
//! Limited to 8 and 16 bit integer PCM with up to two channels, where hound
//! reads and writes the plain `WAVE_FORMAT_PCM` layout.

use pretty_assertions::assert_eq;

use pcmwav::{PcmFormat, WavReader};
use pcmwav_tests::signals::{noise_i16, noise_u8};
use pcmwav_tests::TempAudioDir;

#[test]
fn hound_reads_our_16_bit_stereo() {
    let dir = TempAudioDir::new();
    let samples = noise_i16(31, 2 * 1000);
    let path = dir.write_samples("ours.wav", PcmFormat::stereo(44100), &samples);

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.duration(), 1000);

    let theirs: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(theirs, samples);
}

#[test]
fn hound_reads_our_8_bit_mono() {
    let dir = TempAudioDir::new();
    let samples = noise_u8(32, 500);
    let path = dir.write_samples("ours8.wav", PcmFormat::new(8000, 8, 1), &samples);

    let mut reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 8);

    // hound exposes 8-bit samples as signed, offset by 128.
    let theirs: Vec<i8> = reader.samples::<i8>().map(|s| s.unwrap()).collect();
    let expected: Vec<i8> = samples.iter().map(|&s| (s as i16 - 128) as i8).collect();
    assert_eq!(theirs, expected);
}

#[test]
fn we_read_hound_16_bit_mono() {
    let dir = TempAudioDir::new();
    let path = dir.file("theirs.wav");
    let samples = noise_i16(33, 700);

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for &s in &samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();

    let mut reader = WavReader::open(&path, None).unwrap();
    assert_eq!(reader.format(), PcmFormat::mono(22050));
    assert_eq!(reader.num_frames(), 700);
    let mut ours = vec![0i16; 700];
    assert_eq!(reader.read(&mut ours).unwrap(), 700);
    assert_eq!(ours, samples);
}

#[test]
fn we_read_hound_8_bit_stereo_as_float() {
    let dir = TempAudioDir::new();
    let path = dir.file("theirs8.wav");

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for s in [-128i8, 0, 64, 127] {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();

    let mut reader = WavReader::open(&path, None).unwrap();
    let mut out = [0f32; 4];
    assert_eq!(reader.read(&mut out).unwrap(), 4);
    assert_eq!(out, [-1.0, 0.0, 0.5, 127.0 / 128.0]);
}
