use ear_trainer::{
    audio::{AudioOutput, GainHandle, MixerHost, MixerOutput, OscillatorHandle},
    dsp::{AutomationEvent, Waveform},
    engine::VoicePhase,
    AudioError, EngineConfig, SharedMixer, ToneEngine,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn engine() -> (ToneEngine<MixerHost>, SharedMixer) {
    let host = MixerHost::new(SAMPLE_RATE);
    let mixer = host.mixer();
    let mut engine = ToneEngine::new(host, EngineConfig::default());
    engine.initialize();
    (engine, mixer)
}

/// Let `seconds` of audio play, then run whatever fell due.
fn advance(engine: &mut ToneEngine<MixerHost>, seconds: f64) {
    if let Some(output) = engine.output_mut() {
        output.mixer().lock().advance(seconds);
    }
    engine.tick();
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

#[test]
fn replaying_a_pitch_supersedes_the_old_voice() {
    let (mut engine, mixer) = engine();

    engine.play_tone_for(440.0, 0.2);
    advance(&mut engine, 0.1);
    engine.play_tone(440.0);

    assert_eq!(engine.active_voice_count(), 1);
    assert_eq!(engine.active_frequencies(), vec![440.0]);
    // First voice fading; its timed stop is gone, only its teardown is queued
    assert_eq!(engine.releasing_voice_count(), 1);
    assert_eq!(engine.pending_actions(), 1);
    assert_eq!(mixer.lock().oscillator_frequencies(), vec![440.0, 440.0]);

    // Well past the old timed stop: the new voice is untouched
    advance(&mut engine, 0.45);
    assert_eq!(engine.voice_phase(440.0), Some(VoicePhase::Sustaining));
    assert_eq!(engine.releasing_voice_count(), 0);
    assert_eq!(mixer.lock().oscillator_frequencies(), vec![440.0]);
}

#[test]
fn success_cue_staggers_two_notes_and_stops_both() {
    let (mut engine, _mixer) = engine();

    engine.play_success_sound();
    assert_eq!(engine.active_frequencies(), vec![880.0]);

    advance(&mut engine, 0.05);
    assert_eq!(engine.active_frequencies(), vec![880.0]);

    advance(&mut engine, 0.06);
    let mut playing = engine.active_frequencies();
    playing.sort_by(f32::total_cmp);
    assert_eq!(playing, vec![880.0, 1108.0]);

    advance(&mut engine, 0.2);
    assert_eq!(engine.active_voice_count(), 0);
    assert_eq!(engine.releasing_voice_count(), 2);

    // Fade plus grace, then everything is freed
    advance(&mut engine, 0.41);
    assert_eq!(engine.releasing_voice_count(), 0);
    assert_eq!(engine.pending_actions(), 0);
}

#[test]
fn error_cue_is_a_short_low_buzz() {
    let (mut engine, _mixer) = engine();

    engine.play_error_sound();
    assert_eq!(engine.active_frequencies(), vec![200.0]);

    advance(&mut engine, 0.21);
    assert_eq!(engine.active_voice_count(), 0);
}

#[test]
fn released_voice_fades_to_silence_and_is_freed() {
    let (mut engine, mixer) = engine();
    let mut block = vec![0.0f32; 4_800];

    engine.play_tone(523.25);
    mixer.render(&mut block);
    assert!(peak(&block) > 0.05, "attack should be audible");

    engine.stop_tone(523.25);
    assert_eq!(engine.voice_phase(523.25), None);

    // 0.3 s fade, 0.1 s grace
    for _ in 0..4 {
        mixer.render(&mut block);
        engine.tick();
    }
    mixer.render(&mut block);
    engine.tick();

    assert_eq!(peak(&block), 0.0);
    assert_eq!(mixer.lock().allocated_oscillators(), 0);
    assert_eq!(engine.releasing_voice_count(), 0);
}

#[test]
fn release_starts_from_the_current_level() {
    let (mut engine, mixer) = engine();

    engine.play_tone(440.0);
    // Halfway up the attack ramp, gain is about 0.15
    advance(&mut engine, 0.025);
    assert_eq!(engine.output().map(|o| o.current_time()), Some(0.025));

    engine.stop_tone(440.0);
    let mut block = vec![0.0f32; 48];
    mixer.render(&mut block);
    // Never jumps back up to the sustain or peak level
    assert!(peak(&block) <= 0.16, "peak {}", peak(&block));
    assert!(peak(&block) > 0.0);
}

#[test]
fn mute_suspends_and_freezes_the_clock() {
    let (mut engine, mixer) = engine();

    engine.play_tone(440.0);
    advance(&mut engine, 0.1);
    assert!(engine.toggle_mute());
    assert_eq!(engine.output().map(|o| o.is_suspended()), Some(true));

    let before = mixer.lock().current_time();
    let mut block = vec![1.0f32; 512];
    mixer.render(&mut block);
    assert_eq!(peak(&block), 0.0);
    assert_eq!(mixer.lock().current_time(), before);

    engine.play_tone(880.0);
    assert_eq!(engine.active_frequencies(), vec![440.0]);

    // Stopping while muted queues the teardown, which waits for the clock
    engine.stop_tone(440.0);
    assert_eq!(engine.active_voice_count(), 0);
    assert_eq!(engine.releasing_voice_count(), 1);
    advance(&mut engine, 0.41);
    assert_eq!(engine.releasing_voice_count(), 1);
    assert_eq!(engine.pending_actions(), 1);

    assert!(!engine.toggle_mute());
    mixer.render(&mut block);
    assert!(peak(&block) > 0.0, "fade plays out after unmuting");

    advance(&mut engine, 0.41);
    assert_eq!(engine.releasing_voice_count(), 0);
    assert_eq!(mixer.lock().allocated_oscillators(), 0);
}

#[test]
fn unavailable_audio_keeps_every_operation_silent() {
    let mut engine = ToneEngine::new(
        || -> Result<MixerHostOutput, AudioError> { Err(AudioError::NoOutputDevice) },
        EngineConfig::default(),
    );
    engine.initialize();
    engine.initialize();

    engine.play_tone(440.0);
    engine.play_tone_for(440.0, 0.1);
    engine.play_success_sound();
    engine.play_error_sound();
    engine.stop_tone(440.0);
    engine.toggle_mute();

    assert!(!engine.is_initialized());
    assert_eq!(engine.active_voice_count(), 0);
    assert_eq!(engine.pending_actions(), 0);
    assert_eq!(engine.tick(), 0);
}

type MixerHostOutput = <MixerHost as ear_trainer::AudioHost>::Output;

#[test]
fn shutdown_frees_everything_immediately() {
    let (mut engine, mixer) = engine();

    engine.play_tone(440.0);
    engine.play_success_sound();
    engine.stop_tone(440.0);
    engine.shutdown();

    assert!(!engine.is_initialized());
    assert_eq!(mixer.lock().allocated_oscillators(), 0);

    // Later calls are harmless no-ops
    engine.play_tone(440.0);
    engine.stop_tone(440.0);
    assert_eq!(engine.tick(), 0);
}

/// Mixer output whose device callback gets to render a block between any
/// two scheduling calls made outside a transaction.
struct InterleavedOutput {
    inner: MixerOutput,
    render_side: SharedMixer,
    interleaved_peaks: Vec<f32>,
}

impl InterleavedOutput {
    fn render_block(&mut self) {
        let mut block = vec![0.0f32; 240];
        self.render_side.render(&mut block);
        self.interleaved_peaks.push(peak(&block));
    }
}

impl AudioOutput for InterleavedOutput {
    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    fn create_oscillator(&mut self, waveform: Waveform, frequency: f32) -> OscillatorHandle {
        self.inner.create_oscillator(waveform, frequency)
    }

    fn create_gain(&mut self, initial: f32) -> GainHandle {
        self.inner.create_gain(initial)
    }

    fn connect(&mut self, osc: OscillatorHandle, gain: GainHandle) {
        self.inner.connect(osc, gain)
    }

    fn start(&mut self, osc: OscillatorHandle, at: f64) {
        self.inner.start(osc, at)
    }

    fn stop(&mut self, osc: OscillatorHandle, at: f64) {
        self.inner.stop(osc, at)
    }

    fn schedule_gain(&mut self, gain: GainHandle, event: AutomationEvent) {
        self.inner.schedule_gain(gain, event)
    }

    fn cancel_gain(&mut self, gain: GainHandle, from: f64) {
        self.inner.cancel_gain(gain, from);
        self.render_block();
    }

    fn gain_value(&self, gain: GainHandle) -> f32 {
        self.inner.gain_value(gain)
    }

    fn release(&mut self, osc: OscillatorHandle, gain: GainHandle) {
        self.inner.release(osc, gain)
    }

    fn suspend(&mut self) {
        self.inner.suspend()
    }

    fn resume(&mut self) {
        self.inner.resume()
    }

    fn is_suspended(&self) -> bool {
        self.inner.is_suspended()
    }

    fn transaction<R>(&mut self, f: impl FnOnce(&mut dyn AudioOutput) -> R) -> R {
        self.inner.transaction(f)
    }
}

#[test]
fn device_never_renders_a_half_scheduled_release() {
    let mixer = SharedMixer::new(SAMPLE_RATE);
    let host_side = mixer.clone();
    let host = move || -> Result<InterleavedOutput, AudioError> {
        Ok(InterleavedOutput {
            inner: host_side.output(),
            render_side: host_side.clone(),
            interleaved_peaks: Vec::new(),
        })
    };
    let mut engine = ToneEngine::new(host, EngineConfig::default());
    engine.initialize();

    engine.play_tone(440.0);
    mixer.lock().advance(0.025);
    engine.stop_tone(440.0);

    let interleaved = engine
        .output()
        .map(|o| o.interleaved_peaks.clone())
        .unwrap_or_default();
    assert!(
        interleaved.iter().all(|&p| p > 0.1),
        "dropout mid-release: {interleaved:?}"
    );

    let mut block = vec![0.0f32; 240];
    mixer.render(&mut block);
    assert!(peak(&block) > 0.1 && peak(&block) <= 0.16, "peak {}", peak(&block));
}
