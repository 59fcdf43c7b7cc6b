//! Mixer and gain automation benchmarks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ear_trainer::{
    catalog::NOTES,
    dsp::GainAutomation,
    EngineConfig, MixerHost, ToneEngine,
};

use crate::BLOCK_SIZES;

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("audio/mixer");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // One held note, the common case while a key is down
        let host = MixerHost::new(48_000.0);
        let mixer = host.mixer();
        let mut engine = ToneEngine::new(host, EngineConfig::default());
        engine.initialize();
        engine.play_tone(NOTES[9].frequency_hz);

        group.bench_with_input(BenchmarkId::new("one_voice", size), &size, |b, _| {
            b.iter(|| mixer.render(black_box(&mut buffer)))
        });

        // A chord mashed across the keyboard plus a feedback cue on top
        let host = MixerHost::new(48_000.0);
        let mixer = host.mixer();
        let mut engine = ToneEngine::new(host, EngineConfig::default());
        engine.initialize();
        for note in NOTES.iter().step_by(3) {
            engine.play_tone(note.frequency_hz);
        }
        engine.play_success_sound();

        group.bench_with_input(BenchmarkId::new("nine_voices", size), &size, |b, _| {
            b.iter(|| mixer.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("audio/automation");

    // Attack, decay, then a release cut in halfway through the decay
    let mut gain = GainAutomation::new(0.0);
    gain.set(0.0, 0.0);
    gain.linear(0.05, 0.3);
    gain.linear(0.3, 0.2);
    gain.cancel_from(0.2);
    gain.set(0.2, 0.24);
    gain.exponential(0.5, 0.001);

    group.bench_function("value_at", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t = (t + 1.0 / 48_000.0) % 0.6;
            black_box(gain.value_at(black_box(t)))
        })
    });

    group.finish();
}
