//! cpal-backed audio host.
//!
//! The device callback renders the shared software mixer in mono, copies it
//! to every channel and pushes the mono block into a ring buffer for the
//! waveform scope. The stream itself rides inside the engine's output so
//! it lives exactly as long as the engine holds audio.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Producer;

use ear_trainer::{
    audio::{AudioHost, MixerOutput, SharedMixer},
    AudioError, MAX_BLOCK_SIZE,
};

pub struct CpalHost {
    scope: Option<Producer<f32>>,
}

impl CpalHost {
    pub fn new(scope: Producer<f32>) -> Self {
        Self { scope: Some(scope) }
    }
}

impl AudioHost for CpalHost {
    type Output = MixerOutput<cpal::Stream>;

    fn open(&mut self) -> Result<Self::Output, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let config = device
            .default_output_config()
            .map_err(|err| AudioError::UnsupportedConfig(err.to_string()))?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        log::info!("output: {} Hz, {} channels", sample_rate, channels);

        let mixer = SharedMixer::new(sample_rate);
        let render_side = mixer.clone();
        let mut scope = self.scope.take();
        let mut block = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                        let frames = chunk.len() / channels;
                        let mono = &mut block[..frames];
                        render_side.render(mono);

                        // Mono to all channels
                        for (frame, &sample) in chunk.chunks_mut(channels).zip(mono.iter()) {
                            frame.fill(sample);
                        }

                        // Scope drops samples when the UI falls behind
                        if let Some(scope) = scope.as_mut() {
                            for &sample in mono.iter() {
                                if scope.push(sample).is_err() {
                                    break;
                                }
                            }
                        }
                    }
                },
                |err| log::error!("audio stream error: {}", err),
                None,
            )
            .map_err(|err| AudioError::Stream(err.to_string()))?;

        stream
            .play()
            .map_err(|err| AudioError::Stream(err.to_string()))?;

        Ok(mixer.output_with(stream))
    }
}
