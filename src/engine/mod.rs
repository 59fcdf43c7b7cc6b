//! Tone voice engine: starts, stops and tears down voices keyed by pitch.
//!
//! Every sounding frequency has at most one held voice. Starting a pitch
//! that is already held first releases the old voice; stopping a pitch
//! removes it from the table at once and lets the fade and teardown run on
//! the audio clock. Deferred work goes through [`Scheduler`] and is run by
//! [`ToneEngine::tick`], which the owner calls from its event loop.
//!
//! ```ignore
//! let mut engine = ToneEngine::new(MixerHost::new(48_000.0), EngineConfig::default());
//! engine.initialize();
//! engine.play_tone(440.0);
//! // ... later, from the UI loop
//! engine.tick();
//! engine.stop_tone(440.0);
//! ```

pub mod scheduler;
pub mod voice;

use crate::{
    audio::output::{AudioHost, AudioOutput},
    config::{EngineConfig, FeedbackCue},
};

pub use scheduler::{Deferred, Scheduler};
pub use voice::{ToneVoice, VoiceId, VoicePhase, VoiceTable};

pub struct ToneEngine<H: AudioHost> {
    host: H,
    output: Option<H::Output>,
    acquire_attempted: bool,
    config: EngineConfig,
    voices: VoiceTable,
    /// Voices fading out, kept until their teardown runs
    releasing: Vec<ToneVoice>,
    scheduler: Scheduler,
    muted: bool,
    next_voice: u64,
}

impl<H: AudioHost> ToneEngine<H> {
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            output: None,
            acquire_attempted: false,
            config,
            voices: VoiceTable::new(),
            releasing: Vec::new(),
            scheduler: Scheduler::new(),
            muted: false,
            next_voice: 0,
        }
    }

    /// Acquire the audio output. Only the first call does anything; if the
    /// host fails the engine stays silent for good.
    pub fn initialize(&mut self) {
        if self.acquire_attempted {
            return;
        }
        self.acquire_attempted = true;

        match self.host.open() {
            Ok(output) => {
                log::debug!("audio output acquired");
                self.output = Some(output);
            }
            Err(err) => {
                log::warn!("audio unavailable, tones disabled: {}", err);
            }
        }
    }

    /// Start a tone at `frequency_hz`, replacing any voice already there.
    pub fn play_tone(&mut self, frequency_hz: f32) {
        self.start_voice(frequency_hz);
    }

    /// Start a tone and stop it `hold` seconds later.
    pub fn play_tone_for(&mut self, frequency_hz: f32, hold: f64) {
        let Some(voice) = self.start_voice(frequency_hz) else {
            return;
        };
        let Some(output) = self.output.as_ref() else {
            return;
        };
        let stop_at = output.current_time() + hold;
        self.scheduler.enqueue(
            stop_at,
            Deferred::Stop {
                frequency: frequency_hz,
                voice,
            },
        );
    }

    /// Release the voice at `frequency_hz`. No-op if nothing is playing there.
    pub fn stop_tone(&mut self, frequency_hz: f32) {
        if self.output.is_none() {
            return;
        }
        if let Some(voice) = self.voices.remove(frequency_hz) {
            self.begin_release(voice);
        }
    }

    /// A5 then roughly C#6 100 ms later, both cut 300 ms after the call.
    pub fn play_success_sound(&mut self) {
        self.play_cue(FeedbackCue::SUCCESS);
    }

    /// A 200 Hz buzz for 200 ms.
    pub fn play_error_sound(&mut self) {
        self.play_cue(FeedbackCue::ERROR);
    }

    pub fn play_cue(&mut self, cue: FeedbackCue) {
        if self.muted {
            return;
        }
        let Some(output) = self.output.as_ref() else {
            return;
        };
        let now = output.current_time();

        for tone in cue.tones {
            if tone.offset <= 0.0 {
                self.play_tone_for(tone.frequency_hz, tone.stop_after);
            } else {
                self.scheduler.enqueue(
                    now + tone.offset,
                    Deferred::PlayHeld {
                        frequency: tone.frequency_hz,
                        stop_at: now + tone.stop_after,
                    },
                );
            }
        }
    }

    /// Flip the mute flag, suspending or resuming the output. Returns the
    /// new state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if let Some(output) = self.output.as_mut() {
            if self.muted {
                output.suspend();
            } else {
                output.resume();
            }
        }
        log::debug!("muted: {}", self.muted);
        self.muted
    }

    /// Run every deferred action that is due on the output clock. Returns
    /// how many ran.
    pub fn tick(&mut self) -> usize {
        let Some(now) = self.output.as_ref().map(|o| o.current_time()) else {
            return 0;
        };

        let mut ran = 0;
        while let Some(action) = self.scheduler.pop_due(now) {
            self.run(action);
            ran += 1;
        }
        ran
    }

    /// Tear everything down immediately and drop the output. The engine is
    /// silent afterwards.
    pub fn shutdown(&mut self) {
        if self.output.is_none() {
            return;
        }

        // Teardowns already queued run now instead of at their due time
        for id in self.scheduler.drain_disposals() {
            self.dispose(id);
        }

        let Some(mut output) = self.output.take() else {
            return;
        };
        for mut voice in self.voices.drain().chain(self.releasing.drain(..)) {
            voice.dispose(&mut output);
        }
        log::debug!("tone engine shut down");
    }

    pub fn is_initialized(&self) -> bool {
        self.output.is_some()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn output(&self) -> Option<&H::Output> {
        self.output.as_ref()
    }

    pub fn output_mut(&mut self) -> Option<&mut H::Output> {
        self.output.as_mut()
    }

    /// Voices currently held (one per frequency).
    pub fn active_voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Voices fading out and not yet torn down.
    pub fn releasing_voice_count(&self) -> usize {
        self.releasing.len()
    }

    pub fn active_frequencies(&self) -> Vec<f32> {
        self.voices.iter().map(ToneVoice::frequency_hz).collect()
    }

    pub fn voice_phase(&self, frequency_hz: f32) -> Option<VoicePhase> {
        let now = self.output.as_ref()?.current_time();
        self.voices.get(frequency_hz).map(|v| v.phase(now))
    }

    pub fn pending_actions(&self) -> usize {
        self.scheduler.len()
    }

    /// Due time of the next deferred action on the output clock.
    pub fn next_due(&self) -> Option<f64> {
        self.scheduler.next_due()
    }

    fn start_voice(&mut self, frequency_hz: f32) -> Option<VoiceId> {
        if self.muted {
            return None;
        }
        let output = self.output.as_mut()?;
        if output.is_suspended() {
            output.resume();
        }

        // Release before recreating: never two oscillators on one pitch
        self.stop_tone(frequency_hz);

        let id = VoiceId(self.next_voice);
        self.next_voice += 1;

        let output = self.output.as_mut()?;
        let voice = ToneVoice::start(output, id, frequency_hz, &self.config);
        log::debug!("voice {:?} start {:.2} Hz", id, frequency_hz);

        if let Some(displaced) = self.voices.insert(voice) {
            self.begin_release(displaced);
        }
        Some(id)
    }

    fn begin_release(&mut self, mut voice: ToneVoice) {
        let Some(output) = self.output.as_mut() else {
            return;
        };

        self.scheduler.cancel_voice(voice.id());
        if !voice.release(output, &self.config) {
            return;
        }

        let teardown_at = output.current_time() + self.config.teardown_delay();
        self.scheduler
            .enqueue(teardown_at, Deferred::Dispose { voice: voice.id() });
        log::debug!(
            "voice {:?} release {:.2} Hz",
            voice.id(),
            voice.frequency_hz()
        );
        self.releasing.push(voice);
    }

    fn run(&mut self, action: Deferred) {
        match action {
            Deferred::PlayHeld { frequency, stop_at } => {
                if let Some(voice) = self.start_voice(frequency) {
                    self.scheduler
                        .enqueue(stop_at, Deferred::Stop { frequency, voice });
                }
            }
            Deferred::Stop { frequency, voice } => {
                // Only if the voice still owns the pitch; a newer voice there
                // belongs to someone else
                if self.voices.get(frequency).map(ToneVoice::id) == Some(voice) {
                    self.stop_tone(frequency);
                }
            }
            Deferred::Dispose { voice } => self.dispose(voice),
        }
    }

    fn dispose(&mut self, id: VoiceId) {
        let Some(idx) = self.releasing.iter().position(|v| v.id() == id) else {
            return;
        };
        let mut voice = self.releasing.swap_remove(idx);
        if let Some(output) = self.output.as_mut() {
            voice.dispose(output);
            log::debug!("voice {:?} disposed", id);
        }
    }
}

impl<H: AudioHost> Drop for ToneEngine<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::mixer::Mixer, error::AudioError};

    type TestEngine = ToneEngine<fn() -> Result<Mixer, AudioError>>;

    fn open_mixer() -> Result<Mixer, AudioError> {
        Ok(Mixer::new(1_000.0))
    }

    fn no_audio() -> Result<Mixer, AudioError> {
        Err(AudioError::NoOutputDevice)
    }

    fn engine_with(host: fn() -> Result<Mixer, AudioError>) -> TestEngine {
        ToneEngine::new(host, EngineConfig::default())
    }

    fn engine() -> TestEngine {
        let mut engine = engine_with(open_mixer);
        engine.initialize();
        engine
    }

    fn advance(engine: &mut TestEngine, seconds: f64) {
        engine.output_mut().expect("initialized").advance(seconds);
        engine.tick();
    }

    #[test]
    fn nothing_plays_before_initialize() {
        let mut engine = engine_with(open_mixer);
        engine.play_tone(440.0);
        engine.stop_tone(440.0);
        engine.play_success_sound();
        assert_eq!(engine.active_voice_count(), 0);
        assert_eq!(engine.pending_actions(), 0);
        assert_eq!(engine.tick(), 0);
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut engine = engine();
        engine.play_tone(440.0);
        engine.initialize();
        assert!(engine.is_initialized());
        assert_eq!(engine.active_voice_count(), 1);
    }

    #[test]
    fn missing_audio_degrades_to_silence() {
        let mut engine = engine_with(no_audio);
        engine.initialize();
        assert!(!engine.is_initialized());

        engine.play_tone(440.0);
        engine.play_error_sound();
        engine.stop_tone(440.0);
        assert!(engine.toggle_mute());
        assert_eq!(engine.active_voice_count(), 0);
    }

    #[test]
    fn replaying_a_pitch_keeps_one_voice() {
        let mut engine = engine();
        engine.play_tone(440.0);
        advance(&mut engine, 0.1);
        engine.play_tone(440.0);

        assert_eq!(engine.active_voice_count(), 1);
        assert_eq!(engine.releasing_voice_count(), 1);
        assert_eq!(engine.voice_phase(440.0), Some(VoicePhase::Attacking));

        let mixer = engine.output().expect("initialized");
        // Old voice still fading, new voice attacking
        assert_eq!(mixer.sounding_oscillators(), 2);
    }

    #[test]
    fn stop_is_idempotent_and_teardown_runs_once() {
        let mut engine = engine();
        engine.stop_tone(523.25);

        engine.play_tone(523.25);
        engine.stop_tone(523.25);
        engine.stop_tone(523.25);
        assert_eq!(engine.active_voice_count(), 0);
        assert_eq!(engine.releasing_voice_count(), 1);
        assert_eq!(engine.pending_actions(), 1);

        advance(&mut engine, 0.41);
        assert_eq!(engine.releasing_voice_count(), 0);
        assert_eq!(engine.output().map(Mixer::allocated_oscillators), Some(0));
        assert_eq!(engine.tick(), 0);
    }

    #[test]
    fn stopped_pitch_can_restart_during_its_tail() {
        let mut engine = engine();
        engine.play_tone(440.0);
        engine.stop_tone(440.0);
        engine.play_tone(440.0);

        assert_eq!(engine.active_voice_count(), 1);
        assert_eq!(engine.releasing_voice_count(), 1);

        advance(&mut engine, 0.5);
        assert_eq!(engine.releasing_voice_count(), 0);
        assert_eq!(engine.voice_phase(440.0), Some(VoicePhase::Sustaining));
    }

    #[test]
    fn muted_engine_ignores_play_and_suspends_output() {
        let mut engine = engine();
        assert!(engine.toggle_mute());
        engine.play_tone(440.0);
        engine.play_success_sound();

        assert_eq!(engine.active_voice_count(), 0);
        assert_eq!(engine.output().map(Mixer::is_suspended), Some(true));

        assert!(!engine.toggle_mute());
        assert_eq!(engine.output().map(Mixer::is_suspended), Some(false));
    }

    #[test]
    fn play_resumes_a_suspended_output() {
        let mut engine = engine();
        engine.output_mut().expect("initialized").suspend();
        engine.play_tone(440.0);
        assert_eq!(engine.output().map(Mixer::is_suspended), Some(false));
    }

    #[test]
    fn timed_tone_stops_itself() {
        let mut engine = engine();
        engine.play_tone_for(440.0, 0.2);
        advance(&mut engine, 0.19);
        assert_eq!(engine.active_voice_count(), 1);
        advance(&mut engine, 0.02);
        assert_eq!(engine.active_voice_count(), 0);
    }

    #[test]
    fn stale_cue_stop_spares_a_newer_voice() {
        let mut engine = engine();
        engine.play_success_sound();
        advance(&mut engine, 0.05);

        // Player presses A5 while the cue's A5 is still held
        engine.play_tone(880.0);
        advance(&mut engine, 0.3);

        assert!(engine.active_frequencies().contains(&880.0));
        assert!(!engine.active_frequencies().contains(&1108.0));
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut engine = engine();
        engine.play_tone(440.0);
        engine.play_tone(880.0);
        engine.stop_tone(880.0);
        engine.shutdown();

        assert!(!engine.is_initialized());
        assert_eq!(engine.active_voice_count(), 0);
        assert_eq!(engine.releasing_voice_count(), 0);
        assert_eq!(engine.pending_actions(), 0);
    }

    #[test]
    fn shutdown_runs_queued_teardowns() {
        let host = crate::audio::mixer::MixerHost::new(1_000.0);
        let mixer = host.mixer();
        let mut engine = ToneEngine::new(host, EngineConfig::default());
        engine.initialize();

        engine.play_tone(440.0);
        engine.stop_tone(440.0);
        engine.play_tone(880.0);
        assert_eq!(engine.releasing_voice_count(), 1);
        assert_eq!(engine.pending_actions(), 1);

        engine.shutdown();

        assert_eq!(engine.releasing_voice_count(), 0);
        assert_eq!(engine.pending_actions(), 0);
        assert_eq!(mixer.lock().allocated_oscillators(), 0);
    }
}
