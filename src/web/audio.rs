//! Web Audio implementation of [`AudioService`].
//!
//! The `AudioContext` is created lazily on first use; browsers refuse to start
//! one before a user gesture, and some refuse outright. Every failure is
//! logged and swallowed so the game plays on silently.

use wasm_bindgen::JsValue;
use web_sys::{
    AudioBuffer, AudioBufferSourceNode, AudioContext, AudioContextState, AudioNode,
    BiquadFilterNode, BiquadFilterType, GainNode, OscillatorNode, OscillatorType,
};

use crate::audio::{
    Ambience, AudioService, CLICK, DrawCue, FilterKind, Voice, Waveform,
};
use crate::error::{Error, Result};

// Length of the looped noise buffer, in seconds.
const NOISE_SECONDS: f32 = 0.5;

fn audio_err(e: JsValue) -> Error {
    Error::Audio(format!("{e:?}"))
}

fn oscillator_type(w: Waveform) -> OscillatorType {
    match w {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Triangle => OscillatorType::Triangle,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
    }
}

struct DrawChain {
    source: AudioBufferSourceNode,
    filter: BiquadFilterNode,
    gain: GainNode,
}

#[derive(Default)]
pub(super) struct WebAudio {
    ctx: Option<AudioContext>,
    ambience_oscillators: Vec<OscillatorNode>,
    ambience_nodes: Vec<AudioNode>,
    ambience_gain: Option<GainNode>,
    draw: Option<DrawChain>,
    noise: Option<AudioBuffer>,
}

impl WebAudio {
    pub(super) fn new() -> Self {
        Self::default()
    }

    fn context(&mut self) -> Option<AudioContext> {
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    log::warn!("Web Audio API not supported: {e:?}");
                    return None;
                }
            }
        }
        self.ctx.clone()
    }

    fn try_play_ambience(&mut self, ambience: Ambience) -> Result<()> {
        self.stop_ambience();
        let Some(ctx) = self.context() else {
            return Ok(());
        };
        let spec = ambience.spec();
        let gain = ctx.create_gain().map_err(audio_err)?;
        gain.gain()
            .set_value_at_time(spec.gain, ctx.current_time())
            .map_err(audio_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(audio_err)?;
        // Stored before the voices so a half-built bed is still torn down.
        self.ambience_gain = Some(gain.clone());
        for voice in spec.voices {
            self.add_voice(&ctx, &gain, voice)?;
        }
        log::debug!("ambience {ambience:?} playing");
        Ok(())
    }

    fn add_voice(&mut self, ctx: &AudioContext, out: &GainNode, voice: &Voice) -> Result<()> {
        let osc = ctx.create_oscillator().map_err(audio_err)?;
        osc.set_type(oscillator_type(voice.waveform));
        osc.frequency().set_value(voice.frequency_hz);
        osc.connect_with_audio_node(out).map_err(audio_err)?;
        if let Some(lfo) = voice.lfo {
            let wobble = ctx.create_oscillator().map_err(audio_err)?;
            wobble.frequency().set_value(lfo.rate_hz);
            let depth = ctx.create_gain().map_err(audio_err)?;
            depth.gain().set_value(lfo.depth_hz);
            wobble.connect_with_audio_node(&depth).map_err(audio_err)?;
            depth
                .connect_with_audio_param(&osc.frequency())
                .map_err(audio_err)?;
            wobble.start().map_err(audio_err)?;
            self.ambience_oscillators.push(wobble);
            self.ambience_nodes.push(AudioNode::from(depth));
        }
        osc.start().map_err(audio_err)?;
        self.ambience_oscillators.push(osc);
        Ok(())
    }

    fn noise_buffer(&mut self, ctx: &AudioContext) -> Result<AudioBuffer> {
        if let Some(buffer) = &self.noise {
            return Ok(buffer.clone());
        }
        let rate = ctx.sample_rate();
        let len = (rate * NOISE_SECONDS) as usize;
        let buffer = ctx
            .create_buffer(1, len as u32, rate)
            .map_err(audio_err)?;
        let mut samples = white_noise(len);
        buffer
            .copy_to_channel(&mut samples, 0)
            .map_err(audio_err)?;
        self.noise = Some(buffer.clone());
        Ok(buffer)
    }

    fn try_start_draw_cue(&mut self, cue: DrawCue) -> Result<()> {
        if self.draw.is_some() {
            return Ok(());
        }
        let Some(ctx) = self.context() else {
            return Ok(());
        };
        let buffer = self.noise_buffer(&ctx)?;
        let source = ctx.create_buffer_source().map_err(audio_err)?;
        source.set_buffer(Some(&buffer));
        source.set_loop(true);

        let filter = ctx.create_biquad_filter().map_err(audio_err)?;
        filter.set_type(match cue.filter {
            FilterKind::LowPass => BiquadFilterType::Lowpass,
            FilterKind::HighPass => BiquadFilterType::Highpass,
        });
        filter.frequency().set_value(cue.cutoff_hz);

        let gain = ctx.create_gain().map_err(audio_err)?;
        gain.gain().set_value(cue.gain);

        source.connect_with_audio_node(&filter).map_err(audio_err)?;
        filter.connect_with_audio_node(&gain).map_err(audio_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(audio_err)?;
        source.start().map_err(audio_err)?;
        self.draw = Some(DrawChain {
            source,
            filter,
            gain,
        });
        Ok(())
    }

    fn try_play_click(&mut self) -> Result<()> {
        let Some(ctx) = self.context() else {
            return Ok(());
        };
        self.resume();
        let t = ctx.current_time();
        let osc = ctx.create_oscillator().map_err(audio_err)?;
        let gain = ctx.create_gain().map_err(audio_err)?;
        osc.set_type(OscillatorType::Sine);
        osc.frequency()
            .set_value_at_time(CLICK.start_hz, t)
            .map_err(audio_err)?;
        osc.frequency()
            .exponential_ramp_to_value_at_time(CLICK.end_hz, t + CLICK.duration_s)
            .map_err(audio_err)?;
        gain.gain()
            .set_value_at_time(CLICK.gain, t)
            .map_err(audio_err)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + CLICK.duration_s)
            .map_err(audio_err)?;
        osc.connect_with_audio_node(&gain).map_err(audio_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(audio_err)?;
        osc.start().map_err(audio_err)?;
        osc.stop_with_when(t + CLICK.duration_s)
            .map_err(audio_err)?;
        Ok(())
    }
}

impl AudioService for WebAudio {
    fn resume(&mut self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    fn play_ambience(&mut self, ambience: Ambience) {
        if let Err(e) = self.try_play_ambience(ambience) {
            log::warn!("ambience {ambience:?} failed: {e}");
            self.stop_ambience();
        }
    }

    fn stop_ambience(&mut self) {
        for osc in self.ambience_oscillators.drain(..) {
            let _ = osc.stop();
            let _ = osc.disconnect();
        }
        for node in self.ambience_nodes.drain(..) {
            let _ = node.disconnect();
        }
        if let Some(gain) = self.ambience_gain.take() {
            let _ = gain.disconnect();
        }
    }

    fn start_draw_cue(&mut self, cue: DrawCue) {
        if let Err(e) = self.try_start_draw_cue(cue) {
            log::warn!("draw cue failed: {e}");
        }
    }

    fn stop_draw_cue(&mut self) {
        if let Some(chain) = self.draw.take() {
            let _ = chain.source.stop();
            let _ = chain.source.disconnect();
            let _ = chain.filter.disconnect();
            let _ = chain.gain.disconnect();
        }
    }

    fn play_click(&mut self) {
        if let Err(e) = self.try_play_click() {
            log::debug!("click failed: {e}");
        }
    }
}

impl Drop for WebAudio {
    fn drop(&mut self) {
        self.stop_draw_cue();
        self.stop_ambience();
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
        }
    }
}

/// Uniform noise in [-1, 1]. Falls back to silence if the RNG is unavailable.
fn white_noise(len: usize) -> Vec<f32> {
    let mut bytes = vec![0u8; len * 2];
    if let Err(e) = getrandom::getrandom(&mut bytes) {
        log::warn!("no randomness for noise buffer: {e}");
        return vec![0.0; len];
    }
    bytes
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]) as f32 / (u16::MAX as f32 / 2.0) - 1.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_noise_range() {
        let noise = white_noise(4096);
        assert_eq!(noise.len(), 4096);
        assert!(noise.iter().all(|s| (-1.0..=1.0).contains(s)));
        // Not all silence.
        assert!(noise.iter().any(|s| s.abs() > 0.01));
    }
}
