//! In-process implementation of the audio capability.
//!
//! `Mixer` owns oscillators and gain timelines and renders them sample by
//! sample. Its clock is the number of frames rendered, so scheduled events
//! land with sample accuracy and the clock stands still while suspended.
//!
//! The tone engine and the audio callback live on different threads, so the
//! mixer is shared behind a mutex the same way the runtime shares its track
//! state with the cpal callback: [`SharedMixer`] is the render side,
//! [`MixerOutput`] is the control side handed to the engine.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    audio::output::{AudioHost, AudioOutput, GainHandle, OscillatorHandle},
    dsp::{AutomationEvent, GainAutomation, Oscillator, Waveform},
    error::AudioError,
    MAX_BLOCK_SIZE,
};

struct OscEntry {
    handle: OscillatorHandle,
    osc: Oscillator,
    gain: Option<GainHandle>,
    start_at: Option<f64>,
    stop_at: Option<f64>,
}

impl OscEntry {
    fn is_playing(&self, time: f64) -> bool {
        let started = self.start_at.is_some_and(|at| at <= time);
        let stopped = self.stop_at.is_some_and(|at| at <= time);
        started && !stopped
    }
}

struct GainEntry {
    handle: GainHandle,
    automation: GainAutomation,
}

pub struct Mixer {
    sample_rate: f32,
    frames: u64,
    suspended: bool,
    next_id: u32,
    oscillators: Vec<OscEntry>,
    gains: Vec<GainEntry>,
    scratch: Vec<f32>,
}

impl Mixer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frames: 0,
            suspended: false,
            next_id: 0,
            oscillators: Vec::new(),
            gains: Vec::new(),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn current_time(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    /// Number of oscillators that have not been released.
    pub fn allocated_oscillators(&self) -> usize {
        self.oscillators.len()
    }

    /// Number of oscillators audible right now (started, not yet stopped).
    pub fn sounding_oscillators(&self) -> usize {
        let now = self.current_time();
        self.oscillators.iter().filter(|o| o.is_playing(now)).count()
    }

    pub fn oscillator_frequencies(&self) -> Vec<f32> {
        self.oscillators.iter().map(|o| o.osc.frequency()).collect()
    }

    pub fn gain_events(&self, gain: GainHandle) -> Option<&[AutomationEvent]> {
        self.gain(gain).map(|g| g.automation.events())
    }

    /// Render mono output, advancing the clock by `out.len()` frames.
    ///
    /// While suspended the output is silent and the clock does not move.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        if self.suspended {
            return;
        }

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_block(chunk);
        }
    }

    /// Advance the clock by `seconds` of rendered (and discarded) audio.
    pub fn advance(&mut self, seconds: f64) {
        let mut remaining = (seconds * self.sample_rate as f64).round() as usize;
        let mut block = std::mem::take(&mut self.scratch);
        while remaining > 0 && !self.suspended {
            let n = remaining.min(MAX_BLOCK_SIZE);
            block[..n].fill(0.0);
            self.render_block(&mut block[..n]);
            remaining -= n;
        }
        self.scratch = block;
    }

    fn render_block(&mut self, out: &mut [f32]) {
        let sample_rate = self.sample_rate;
        let dt = 1.0 / sample_rate as f64;
        let block_start = self.current_time();

        for entry in &mut self.oscillators {
            // Unrouted oscillators are inaudible
            let Some(gain_handle) = entry.gain else {
                continue;
            };
            let Some(gain) = self.gains.iter().find(|g| g.handle == gain_handle) else {
                continue;
            };

            for (i, sample) in out.iter_mut().enumerate() {
                let t = block_start + i as f64 * dt;
                if entry.is_playing(t) {
                    *sample += entry.osc.next_sample(sample_rate) * gain.automation.value_at(t);
                }
            }
        }

        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }

        for gain in &mut self.gains {
            gain.automation.prune_before(block_start);
        }
        self.frames += out.len() as u64;
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn osc_mut(&mut self, handle: OscillatorHandle) -> Option<&mut OscEntry> {
        self.oscillators.iter_mut().find(|o| o.handle == handle)
    }

    fn gain(&self, handle: GainHandle) -> Option<&GainEntry> {
        self.gains.iter().find(|g| g.handle == handle)
    }

    fn gain_mut(&mut self, handle: GainHandle) -> Option<&mut GainEntry> {
        self.gains.iter_mut().find(|g| g.handle == handle)
    }
}

impl AudioOutput for Mixer {
    fn current_time(&self) -> f64 {
        Mixer::current_time(self)
    }

    fn create_oscillator(&mut self, waveform: Waveform, frequency: f32) -> OscillatorHandle {
        let handle = OscillatorHandle(self.next_id());
        self.oscillators.push(OscEntry {
            handle,
            osc: Oscillator::new(waveform, frequency),
            gain: None,
            start_at: None,
            stop_at: None,
        });
        handle
    }

    fn create_gain(&mut self, initial: f32) -> GainHandle {
        let handle = GainHandle(self.next_id());
        self.gains.push(GainEntry {
            handle,
            automation: GainAutomation::new(initial),
        });
        handle
    }

    fn connect(&mut self, osc: OscillatorHandle, gain: GainHandle) {
        if let Some(entry) = self.osc_mut(osc) {
            entry.gain = Some(gain);
        }
    }

    fn start(&mut self, osc: OscillatorHandle, at: f64) {
        if let Some(entry) = self.osc_mut(osc) {
            entry.start_at = Some(at);
        }
    }

    fn stop(&mut self, osc: OscillatorHandle, at: f64) {
        if let Some(entry) = self.osc_mut(osc) {
            entry.stop_at = Some(at);
        }
    }

    fn schedule_gain(&mut self, gain: GainHandle, event: AutomationEvent) {
        if let Some(entry) = self.gain_mut(gain) {
            entry.automation.schedule(event);
        }
    }

    fn cancel_gain(&mut self, gain: GainHandle, from: f64) {
        if let Some(entry) = self.gain_mut(gain) {
            entry.automation.cancel_from(from);
        }
    }

    fn gain_value(&self, gain: GainHandle) -> f32 {
        let now = self.current_time();
        self.gain(gain)
            .map(|g| g.automation.value_at(now))
            .unwrap_or(0.0)
    }

    fn release(&mut self, osc: OscillatorHandle, gain: GainHandle) {
        self.oscillators.retain(|o| o.handle != osc);
        self.gains.retain(|g| g.handle != gain);
    }

    fn suspend(&mut self) {
        self.suspended = true;
    }

    fn resume(&mut self) {
        self.suspended = false;
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }
}

/// A [`Mixer`] shared between the audio callback and the engine.
#[derive(Clone)]
pub struct SharedMixer {
    inner: Arc<Mutex<Mixer>>,
}

impl SharedMixer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Mixer::new(sample_rate))),
        }
    }

    /// Lock the mixer. A poisoned lock is recovered: the mixer holds no
    /// invariants a panicking renderer could break halfway.
    pub fn lock(&self) -> MutexGuard<'_, Mixer> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn render(&self, out: &mut [f32]) {
        self.lock().render(out);
    }

    /// Control side for the engine.
    pub fn output(&self) -> MixerOutput {
        self.output_with(())
    }

    /// Control side that also keeps `keepalive` (e.g. a device stream)
    /// alive for as long as the engine holds the output.
    pub fn output_with<K>(&self, keepalive: K) -> MixerOutput<K> {
        MixerOutput {
            mixer: self.clone(),
            _keepalive: keepalive,
        }
    }
}

/// Engine-facing handle onto a [`SharedMixer`].
pub struct MixerOutput<K = ()> {
    mixer: SharedMixer,
    _keepalive: K,
}

impl<K> MixerOutput<K> {
    pub fn mixer(&self) -> &SharedMixer {
        &self.mixer
    }
}

impl<K> AudioOutput for MixerOutput<K> {
    fn current_time(&self) -> f64 {
        self.mixer.lock().current_time()
    }

    fn create_oscillator(&mut self, waveform: Waveform, frequency: f32) -> OscillatorHandle {
        self.mixer.lock().create_oscillator(waveform, frequency)
    }

    fn create_gain(&mut self, initial: f32) -> GainHandle {
        self.mixer.lock().create_gain(initial)
    }

    fn connect(&mut self, osc: OscillatorHandle, gain: GainHandle) {
        self.mixer.lock().connect(osc, gain)
    }

    fn start(&mut self, osc: OscillatorHandle, at: f64) {
        self.mixer.lock().start(osc, at)
    }

    fn stop(&mut self, osc: OscillatorHandle, at: f64) {
        self.mixer.lock().stop(osc, at)
    }

    fn schedule_gain(&mut self, gain: GainHandle, event: AutomationEvent) {
        self.mixer.lock().schedule_gain(gain, event)
    }

    fn cancel_gain(&mut self, gain: GainHandle, from: f64) {
        self.mixer.lock().cancel_gain(gain, from)
    }

    fn gain_value(&self, gain: GainHandle) -> f32 {
        self.mixer.lock().gain_value(gain)
    }

    fn release(&mut self, osc: OscillatorHandle, gain: GainHandle) {
        self.mixer.lock().release(osc, gain)
    }

    fn suspend(&mut self) {
        self.mixer.lock().suspend()
    }

    fn resume(&mut self) {
        self.mixer.lock().resume()
    }

    fn is_suspended(&self) -> bool {
        self.mixer.lock().is_suspended()
    }

    fn transaction<R>(&mut self, f: impl FnOnce(&mut dyn AudioOutput) -> R) -> R {
        let mut mixer = self.mixer.lock();
        f(&mut *mixer)
    }
}

/// Host that hands out a fresh software mixer with no device behind it.
/// Drive it by calling [`SharedMixer::render`] or [`Mixer::advance`].
pub struct MixerHost {
    mixer: SharedMixer,
}

impl MixerHost {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            mixer: SharedMixer::new(sample_rate),
        }
    }

    /// Render side of the mixer this host opens.
    pub fn mixer(&self) -> SharedMixer {
        self.mixer.clone()
    }
}

impl AudioHost for MixerHost {
    type Output = MixerOutput;

    fn open(&mut self) -> Result<MixerOutput, AudioError> {
        Ok(self.mixer.output())
    }
}
