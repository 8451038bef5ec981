#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use pcmwav::WavHeader;

fuzz_target!(|data: &[u8]| {
    let mut cursor = Cursor::new(data);
    if let Ok(decoded) = WavHeader::decode(&mut cursor) {
        // A decoded header always re-encodes to the canonical layout.
        assert_eq!(decoded.header.encode().len(), pcmwav::HEADER_LEN as usize);
        assert!(decoded.data_start <= data.len() as u64);
    }
});
