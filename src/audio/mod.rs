//! The audio output capability and its software implementation.

pub mod mixer;
pub mod output;

pub use mixer::{Mixer, MixerHost, MixerOutput, SharedMixer};
pub use output::{AudioHost, AudioOutput, GainHandle, OscillatorHandle};
