pub mod audio; // Audio capability and the software mixer behind it
pub mod catalog;
pub mod config;
pub mod dsp;
pub mod engine; // Tone voices, scheduling and teardown
pub mod error;
pub mod render; // Drawing surface + staff renderer
pub mod staff; // Note -> staff coordinate math

pub use audio::{AudioHost, AudioOutput, MixerHost, SharedMixer};
pub use catalog::{NoteDescriptor, NOTES};
pub use config::{EngineConfig, FeedbackCue, StaffStyle};
pub use engine::ToneEngine;
pub use error::AudioError;
pub use render::{DisplayList, DrawingSurface, StaffRenderer};
pub use staff::StaffGeometry;

pub const MAX_BLOCK_SIZE: usize = 2048;
