//! Boundaries to the audio session and recording engine.
//!
//! Route detection, session categories and the capture engine live in
//! platform code. This module only describes what the reader and writer need
//! from them: the settings a capture should be written with, and a way to
//! start and stop capture.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WavError, WavResult};
use crate::format::{PcmFormat, SampleFormat};
use crate::writer::WavWriter;

/// Callback invoked once per completed capture.
pub type CompletionCallback = Box<dyn FnMut() + Send>;

/// Audio session configuration and route queries.
pub trait AudioSession {
    /// True when wired headphones are the active output route.
    fn is_headphone_connected(&self) -> bool;

    /// True when a Bluetooth device is the active output route.
    fn is_bluetooth_connected(&self) -> bool;

    /// Switches the session to playback.
    fn set_play_mode(&mut self) -> WavResult<()>;

    /// Switches the session to recording with input processing enabled.
    fn set_processing_mode(&mut self) -> WavResult<()>;

    /// Enables or disables measurement mode (input processing bypassed).
    fn set_use_measurement(&mut self, enabled: bool) -> WavResult<()>;

    /// Parameters captures should be written with.
    fn record_settings(&self) -> RecordSettings;
}

/// Starts and stops capture.
pub trait RecordingEngine {
    fn start(&mut self) -> WavResult<()>;

    fn stop(&mut self) -> WavResult<()>;

    /// Registers the callback run when a capture completes.
    fn set_completion(&mut self, callback: CompletionCallback);
}

/// Capture parameters reported by an [`AudioSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSettings {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
    #[serde(default)]
    pub sample_format: SampleFormat,
}

impl RecordSettings {
    /// Parses settings from JSON.
    pub fn from_json(json: &str) -> WavResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| WavError::invalid_argument("settings", e.to_string()))
    }

    /// Converts to a validated stream format.
    pub fn to_format(&self) -> WavResult<PcmFormat> {
        let format = PcmFormat {
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            channels: self.channels,
            sample_format: self.sample_format,
        };
        format.validate()?;
        Ok(format)
    }

    /// Creates a writer for `path` with these settings.
    pub fn create_writer<P: AsRef<Path>>(&self, path: P) -> WavResult<WavWriter<BufWriter<File>>> {
        WavWriter::create(path, self.to_format()?)
    }
}

impl From<PcmFormat> for RecordSettings {
    fn from(format: PcmFormat) -> Self {
        Self {
            sample_rate: format.sample_rate,
            bits_per_sample: format.bits_per_sample,
            channels: format.channels,
            sample_format: format.sample_format,
        }
    }
}

/// Puts the session into recording mode and opens a writer for the capture.
pub fn prepare_capture<S, P>(session: &mut S, path: P) -> WavResult<WavWriter<BufWriter<File>>>
where
    S: AudioSession + ?Sized,
    P: AsRef<Path>,
{
    session.set_processing_mode()?;
    let settings = session.record_settings();
    tracing::debug!(
        sample_rate = settings.sample_rate,
        bits = settings.bits_per_sample,
        channels = settings.channels,
        headphones = session.is_headphone_connected(),
        bluetooth = session.is_bluetooth_connected(),
        "preparing capture"
    );
    settings.create_writer(path)
}
