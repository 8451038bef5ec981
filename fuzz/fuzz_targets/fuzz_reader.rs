#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use pcmwav::{PcmFormat, WavReader};

fuzz_target!(|data: &[u8]| {
    let raw = Some(PcmFormat::stereo(44100));
    let Ok(mut reader) = WavReader::from_handle(Cursor::new(data), raw) else {
        return;
    };

    let mut out = [0f32; 256];
    while reader.read(&mut out).map_or(false, |n| n > 0) {}
    assert!(reader.at_end());

    let frames = reader.num_frames() as i64;
    let _ = reader.seek(frames / 2);
    let _ = reader.read_frame_range(&mut out, 0, frames);
    assert!(reader.seek(frames + 1).is_err());
});
