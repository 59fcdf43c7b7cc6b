use crate::{
    dsp::{AutomationEvent, Waveform},
    error::AudioError,
};

/// Opaque id of an oscillator created by an [`AudioOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OscillatorHandle(pub u32);

/// Opaque id of a gain stage created by an [`AudioOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GainHandle(pub u32);

/// The audio capability the tone engine drives.
///
/// Everything is declarative: the engine schedules starts, stops and gain
/// ramps against the output's own clock and never blocks waiting for them.
/// Implementations must treat operations on unknown or already released
/// handles as no-ops.
pub trait AudioOutput {
    /// Seconds on the output clock. Does not advance while suspended.
    fn current_time(&self) -> f64;

    fn create_oscillator(&mut self, waveform: Waveform, frequency: f32) -> OscillatorHandle;

    fn create_gain(&mut self, initial: f32) -> GainHandle;

    /// Route `osc` through `gain` to the output.
    fn connect(&mut self, osc: OscillatorHandle, gain: GainHandle);

    fn start(&mut self, osc: OscillatorHandle, at: f64);

    fn stop(&mut self, osc: OscillatorHandle, at: f64);

    fn schedule_gain(&mut self, gain: GainHandle, event: AutomationEvent);

    /// Drop gain events scheduled at or after `from`.
    fn cancel_gain(&mut self, gain: GainHandle, from: f64);

    /// Gain value at the current time.
    fn gain_value(&self, gain: GainHandle) -> f32;

    /// Disconnect and free both units.
    fn release(&mut self, osc: OscillatorHandle, gain: GainHandle);

    /// Silence everything without touching scheduled state.
    fn suspend(&mut self);

    fn resume(&mut self);

    fn is_suspended(&self) -> bool;

    /// Run `f` so that the render side sees either none or all of its
    /// calls. Outputs shared with a device callback override this to hold
    /// their lock for the whole closure.
    fn transaction<R>(&mut self, f: impl FnOnce(&mut dyn AudioOutput) -> R) -> R
    where
        Self: Sized,
    {
        f(self)
    }
}

/// Acquires an [`AudioOutput`] (opens a device, spawns a stream, ...).
pub trait AudioHost {
    type Output: AudioOutput;

    fn open(&mut self) -> Result<Self::Output, AudioError>;
}

/// Any `FnMut() -> Result<O, AudioError>` can act as a host.
impl<F, O> AudioHost for F
where
    F: FnMut() -> Result<O, AudioError>,
    O: AudioOutput,
{
    type Output = O;

    fn open(&mut self) -> Result<O, AudioError> {
        self()
    }
}
