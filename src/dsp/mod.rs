//! Low-level signal primitives used by the mixer.
//!
//! These stay focused on the math: the oscillator produces a raw waveform and
//! the automation timeline answers "what is the gain at time t". Voice
//! lifecycle and scheduling live a layer up in `engine`.

/// Scheduled set/linear/exponential gain changes with cancellation.
pub mod automation;
/// Phase-accumulating tone oscillator.
pub mod oscillator;

pub use automation::{AutomationEvent, GainAutomation};
pub use oscillator::{Oscillator, Waveform};
