use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Tone Oscillator
===============

A phase-accumulating oscillator. Phase runs 0.0 → 1.0 once per cycle and
the waveform maps phase to a sample in -1.0 ..= 1.0.

  Triangle   ╱╲  ╱╲     soft, only odd harmonics falling as 1/n²
            ╱  ╲╱  ╲    (the default voice: smooth enough for ear training)

  Sine      pure fundamental
  Square    hollow, odd harmonics falling as 1/n
  Saw       bright, all harmonics

The oscillator holds no gain; loudness comes entirely from the gain
automation that the mixer multiplies in.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Saw,
}

impl Waveform {
    /// Sample the waveform at `phase` (0.0 ..< 1.0).
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            // Starts at 0, peaks at phase 0.25, troughs at 0.75
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * phase - 1.0,
        }
    }
}

pub struct Oscillator {
    waveform: Waveform,
    frequency: f32,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency,
            phase: 0.0,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce one sample and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let out = self.waveform.sample(self.phase);
        self.phase += self.frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        out
    }
}
