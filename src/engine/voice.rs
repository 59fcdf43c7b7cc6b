use crate::{
    audio::output::{AudioOutput, GainHandle, OscillatorHandle},
    config::EngineConfig,
    dsp::AutomationEvent,
};

/// Unique id of a voice for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

/// Where a voice is in its life.
///
/// ```text
/// Idle ──start──→ Attacking ──(decay ends)──→ Sustaining
///                     │                           │
///                     └────────release────────────┤
///                                                 ↓
///                 Disposed ←──(teardown)──── Releasing
/// ```
///
/// Attack and decay are a fire-and-forget gain schedule, so the split
/// between `Attacking` and `Sustaining` is read off the clock rather than
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoicePhase {
    Idle,
    Attacking,
    Sustaining,
    Releasing,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Held,
    Releasing,
    Disposed,
}

/// One sounding pitch: an oscillator routed through its own gain stage.
#[derive(Debug)]
pub struct ToneVoice {
    id: VoiceId,
    frequency_hz: f32,
    oscillator: OscillatorHandle,
    gain: GainHandle,
    stage: Stage,
    started_at: f64,
    sustain_at: f64,
}

impl ToneVoice {
    /// Create the units for a new voice and schedule its attack and decay.
    /// The whole setup lands in one output transaction.
    pub fn start<O: AudioOutput>(
        output: &mut O,
        id: VoiceId,
        frequency_hz: f32,
        config: &EngineConfig,
    ) -> Self {
        output.transaction(|output| {
            let now = output.current_time();
            let oscillator = output.create_oscillator(config.waveform, frequency_hz);
            let gain = output.create_gain(0.0);

            output.schedule_gain(gain, AutomationEvent::Set { time: now, value: 0.0 });
            output.schedule_gain(
                gain,
                AutomationEvent::Linear {
                    end: now + config.attack,
                    value: config.peak_gain,
                },
            );
            output.schedule_gain(
                gain,
                AutomationEvent::Linear {
                    end: now + config.decay_end,
                    value: config.sustain_gain,
                },
            );

            output.connect(oscillator, gain);
            output.start(oscillator, now);

            Self {
                id,
                frequency_hz,
                oscillator,
                gain,
                stage: Stage::Held,
                started_at: now,
                sustain_at: now + config.decay_end,
            }
        })
    }

    /// Fade out from whatever level the voice is at and stop the oscillator
    /// when the fade ends. Returns false if the voice was already released.
    ///
    /// Cancel and pin run in one output transaction, so no block is ever
    /// rendered with the ramp dropped and the held level not yet set.
    pub fn release<O: AudioOutput>(&mut self, output: &mut O, config: &EngineConfig) -> bool {
        if self.stage != Stage::Held {
            return false;
        }

        let (oscillator, gain) = (self.oscillator, self.gain);
        output.transaction(|output| {
            let now = output.current_time();
            let end = now + config.fade_out;

            // Read before cancelling: cancelling drops the ramp in progress
            let held = output.gain_value(gain);
            output.cancel_gain(gain, now);
            output.schedule_gain(gain, AutomationEvent::Set { time: now, value: held });
            output.schedule_gain(
                gain,
                AutomationEvent::Exponential {
                    end,
                    value: config.release_floor,
                },
            );
            output.stop(oscillator, end);
        });

        self.stage = Stage::Releasing;
        true
    }

    /// Free the oscillator and gain. Safe to call any number of times.
    pub fn dispose<O: AudioOutput>(&mut self, output: &mut O) -> bool {
        if self.stage == Stage::Disposed {
            return false;
        }
        output.release(self.oscillator, self.gain);
        self.stage = Stage::Disposed;
        true
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn frequency_hz(&self) -> f32 {
        self.frequency_hz
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn oscillator(&self) -> OscillatorHandle {
        self.oscillator
    }

    pub fn gain(&self) -> GainHandle {
        self.gain
    }

    pub fn phase(&self, now: f64) -> VoicePhase {
        match self.stage {
            Stage::Held if now < self.sustain_at => VoicePhase::Attacking,
            Stage::Held => VoicePhase::Sustaining,
            Stage::Releasing => VoicePhase::Releasing,
            Stage::Disposed => VoicePhase::Disposed,
        }
    }
}

/// Key equal for exactly equal frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FrequencyKey(u32);

impl From<f32> for FrequencyKey {
    fn from(hz: f32) -> Self {
        FrequencyKey(hz.to_bits())
    }
}

/// Held voices keyed by frequency, at most one per frequency.
#[derive(Debug, Default)]
pub struct VoiceTable {
    voices: Vec<(FrequencyKey, ToneVoice)>,
}

impl VoiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, frequency_hz: f32) -> Option<&ToneVoice> {
        let key = FrequencyKey::from(frequency_hz);
        self.voices.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, frequency_hz: f32) -> bool {
        self.get(frequency_hz).is_some()
    }

    /// Insert `voice` under its frequency, handing back the voice it
    /// displaced. The caller must release whatever comes back.
    #[must_use = "a displaced voice must be released"]
    pub fn insert(&mut self, voice: ToneVoice) -> Option<ToneVoice> {
        let key = FrequencyKey::from(voice.frequency_hz());
        match self.voices.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, voice)),
            None => {
                self.voices.push((key, voice));
                None
            }
        }
    }

    pub fn remove(&mut self, frequency_hz: f32) -> Option<ToneVoice> {
        let key = FrequencyKey::from(frequency_hz);
        let idx = self.voices.iter().position(|(k, _)| *k == key)?;
        Some(self.voices.swap_remove(idx).1)
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ToneVoice> + '_ {
        self.voices.drain(..).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToneVoice> {
        self.voices.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
