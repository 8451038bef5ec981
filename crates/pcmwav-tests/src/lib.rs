//! pcmwav Integration Test Infrastructure
//!
//! This crate holds the cross-module tests for `pcmwav`:
//!
//! - **Round trips**: write then read at every supported encoding
//! - **Header compatibility**: legacy layouts produced by other writers
//! - **Random access**: seek and range reads against sequential reads
//! - **Raw PCM**: headerless streams and `.pcm` files
//! - **Interop**: files checked against `hound`
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pcmwav-tests
//! ```

pub mod builder;
pub mod fixtures;
pub mod signals;

pub use builder::LegacyWavBuilder;
pub use fixtures::TempAudioDir;
