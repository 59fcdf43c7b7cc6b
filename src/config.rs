//! Tunable constants for the tone engine and the staff renderer.
//!
//! Both structs follow the builder style: start from `default()` and chain
//! setters, e.g. `EngineConfig::default().fade_out(0.5)`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::oscillator::Waveform, render::surface::Color};

/// Voice envelope and teardown timing. Times are seconds on the audio clock.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub waveform: Waveform,
    /// Time from voice start to peak gain
    pub attack: f64,
    pub peak_gain: f32,
    /// Time from voice start to the end of the decay (sustain reached)
    pub decay_end: f64,
    pub sustain_gain: f32,
    /// Exponential release duration
    pub fade_out: f64,
    /// Release target; exponential ramps cannot reach zero
    pub release_floor: f32,
    /// Extra wait after the fade before oscillator and gain are released
    pub teardown_grace: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Triangle,
            attack: 0.05,
            peak_gain: 0.3,
            decay_end: 0.3,
            sustain_gain: 0.2,
            fade_out: 0.3,
            release_floor: 0.001,
            teardown_grace: 0.1,
        }
    }
}

impl EngineConfig {
    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Set attack time and peak gain.
    pub fn attack(mut self, seconds: f64, peak_gain: f32) -> Self {
        self.attack = seconds.max(0.0);
        self.peak_gain = peak_gain.clamp(0.0, 1.0);
        self
    }

    /// Set when the decay ends (measured from voice start) and the sustain gain.
    pub fn decay(mut self, end_seconds: f64, sustain_gain: f32) -> Self {
        self.decay_end = end_seconds.max(self.attack);
        self.sustain_gain = sustain_gain.clamp(0.0, 1.0);
        self
    }

    pub fn fade_out(mut self, seconds: f64) -> Self {
        self.fade_out = seconds.max(0.0);
        self
    }

    pub fn teardown_grace(mut self, seconds: f64) -> Self {
        self.teardown_grace = seconds.max(0.0);
        self
    }

    /// Delay between a stop request and the physical release of the voice.
    pub fn teardown_delay(&self) -> f64 {
        self.fade_out + self.teardown_grace
    }
}

/// Short answer-feedback jingles made of timed tones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackCue {
    pub tones: &'static [CueTone],
}

/// One tone of a cue: starts `offset` seconds after the cue and is stopped
/// `stop_after` seconds after the cue began.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueTone {
    pub frequency_hz: f32,
    pub offset: f64,
    pub stop_after: f64,
}

impl FeedbackCue {
    /// A5 followed by roughly C#6, both cut at 300 ms.
    pub const SUCCESS: FeedbackCue = FeedbackCue {
        tones: &[
            CueTone {
                frequency_hz: 880.0,
                offset: 0.0,
                stop_after: 0.3,
            },
            CueTone {
                frequency_hz: 1108.0,
                offset: 0.1,
                stop_after: 0.3,
            },
        ],
    };

    /// A low 200 Hz buzz held for 200 ms.
    pub const ERROR: FeedbackCue = FeedbackCue {
        tones: &[CueTone {
            frequency_hz: 200.0,
            offset: 0.0,
            stop_after: 0.2,
        }],
    };
}

/// Proportions and colours of the staff drawing. Lengths are either pixels
/// or multiples of the line spacing, as noted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffStyle {
    /// Smallest line spacing in pixels, however short the surface
    pub min_line_spacing: f32,
    /// Line spacing is surface height divided by this
    pub spacing_divisor: f32,
    /// Note head radius as a multiple of line spacing
    pub note_radius_factor: f32,
    /// Horizontal inset of the staff lines from each side (px)
    pub staff_margin: f32,
    pub staff_line_width: f32,
    /// Left edge of the clef glyph (px)
    pub clef_x: f32,
    /// Clef font size, multiple of line spacing
    pub clef_size: f32,
    /// Played notes sit this far right of the target (px)
    pub played_offset: f32,
    /// Stem length, multiple of line spacing
    pub stem_length: f32,
    /// Half width of a ledger line (px)
    pub ledger_half_width: f32,
    /// Sharp sign font size, multiple of line spacing
    pub sharp_size: f32,
    pub target_color: Color,
    pub played_color: Color,
    pub staff_color: Color,
}

impl Default for StaffStyle {
    fn default() -> Self {
        Self {
            min_line_spacing: 14.0,
            spacing_divisor: 15.0,
            note_radius_factor: 0.45,
            staff_margin: 20.0,
            staff_line_width: 1.5,
            clef_x: 30.0,
            clef_size: 4.0,
            played_offset: 40.0,
            stem_length: 3.5,
            ledger_half_width: 14.0,
            sharp_size: 1.5,
            target_color: Color::BLACK,
            played_color: Color::rgb(0x3b, 0x82, 0xf6),
            staff_color: Color::BLACK,
        }
    }
}

impl StaffStyle {
    pub fn played_color(mut self, color: Color) -> Self {
        self.played_color = color;
        self
    }

    pub fn min_line_spacing(mut self, pixels: f32) -> Self {
        self.min_line_spacing = pixels.max(1.0);
        self
    }
}
