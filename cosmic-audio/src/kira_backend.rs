use std::collections::HashMap;
use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use kira::effect::filter::{FilterBuilder, FilterHandle};
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings};
use kira::track::{TrackBuilder, TrackHandle};
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Frame, PlaybackRate, Tween};
use log::{debug, error, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::backend::{AudioBackend, LayerKey, SoundCue};
use crate::theory;
use crate::track::{LayerKind, LayerSpec};

const SAMPLE_RATE: u32 = 44_100;
/// 声部循环缓冲的时长 (秒)
const LOOP_SECS: f32 = 2.0;
const FILTER_BASE_HZ: f64 = 8000.0;
const FILTER_RANGE_HZ: f64 = 6000.0;

fn amplitude_to_db(amplitude: f32) -> Decibels {
    if amplitude <= 0.001 {
        Decibels::SILENCE
    } else {
        Decibels(20.0 * amplitude.log10())
    }
}

fn tween(secs: f32) -> Tween {
    if secs > 0.0 {
        Tween { duration: Duration::from_secs_f32(secs), ..Default::default() }
    } else {
        Tween::default()
    }
}

/// 基于 kira 的实时合成后端
pub struct KiraBackend {
    // 持有即保持音频线程存活
    _manager: AudioManager<DefaultBackend>,
    music_track: TrackHandle,
    sfx_track: TrackHandle,
    filter: FilterHandle,

    layers: HashMap<LayerKey, StaticSoundHandle>,
    cue_cache: HashMap<SoundCue, StaticSoundData>,
    rng: SmallRng,
}

impl KiraBackend {
    pub fn new() -> Result<Self> {
        let mut manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| anyhow!("Failed to initialize audio manager: {}", e))?;

        let mut music_builder = TrackBuilder::new();
        let filter = music_builder.add_effect(FilterBuilder::new().cutoff(FILTER_BASE_HZ));
        let music_track = manager
            .add_sub_track(music_builder)
            .map_err(|e| anyhow!("Failed to create music track: {}", e))?;
        let sfx_track = manager
            .add_sub_track(TrackBuilder::new())
            .map_err(|e| anyhow!("Failed to create sfx track: {}", e))?;

        info!("Kira audio backend ready ({} Hz)", SAMPLE_RATE);
        Ok(Self {
            _manager: manager,
            music_track,
            sfx_track,
            filter,
            layers: HashMap::new(),
            cue_cache: HashMap::new(),
            rng: SmallRng::from_entropy(),
        })
    }

    fn render_layer(&mut self, spec: &LayerSpec) -> StaticSoundData {
        let len = (SAMPLE_RATE as f32 * LOOP_SECS) as usize;
        let detune = theory::cents_ratio(spec.detune);
        // 取整到 1/LOOP_SECS Hz，保证循环首尾相接
        let freqs: Vec<f32> = spec
            .frequencies
            .iter()
            .map(|f| (f * detune * LOOP_SECS).round() / LOOP_SECS)
            .collect();
        let partial_gain = if freqs.is_empty() { 0.0 } else { 1.0 / freqs.len() as f32 };
        let pulse = spec.kind.pulse_rate();
        let noise = spec.kind.is_noise();

        let mut last = 0.0f32;
        let frames: Vec<Frame> = (0..len)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let mut v: f32 = freqs.iter().map(|f| (TAU * f * t).sin() * partial_gain).sum();
                if noise {
                    // 一阶低通后的白噪声
                    let white: f32 = self.rng.gen_range(-1.0..1.0);
                    last += (white - last) * noise_smoothing(spec.kind);
                    v = if freqs.is_empty() { last } else { v * 0.5 + last * 0.5 };
                }
                if let Some(rate) = pulse {
                    let phase = (t * rate).fract();
                    v *= (-phase * 6.0).exp();
                }
                Frame::from_mono(v)
            })
            .collect();

        StaticSoundData {
            sample_rate: SAMPLE_RATE,
            frames: Arc::from(frames),
            settings: StaticSoundSettings::default(),
            slice: None,
        }
    }

    fn render_cue(cue: SoundCue) -> StaticSoundData {
        let (start, end, secs) = cue.envelope();
        let len = (SAMPLE_RATE as f32 * secs) as usize;
        let mut phase = 0.0f32;
        let frames: Vec<Frame> = (0..len)
            .map(|i| {
                let p = i as f32 / len as f32;
                let freq = start * (end / start).powf(p);
                phase = (phase + TAU * freq / SAMPLE_RATE as f32) % TAU;
                // 指数衰减到 0.01
                let env = 0.01f32.powf(p);
                Frame::from_mono(phase.sin() * env)
            })
            .collect();

        StaticSoundData {
            sample_rate: SAMPLE_RATE,
            frames: Arc::from(frames),
            settings: StaticSoundSettings::default(),
            slice: None,
        }
    }
}

fn noise_smoothing(kind: LayerKind) -> f32 {
    match kind {
        LayerKind::ExplosionRumble | LayerKind::MetalStress => 0.02,
        LayerKind::Breath | LayerKind::Breathing | LayerKind::AirFlow => 0.08,
        LayerKind::Static | LayerKind::RadioStatic | LayerKind::CommChatter => 0.6,
        _ => 0.2,
    }
}

impl AudioBackend for KiraBackend {
    fn start_layer(&mut self, key: LayerKey, spec: &LayerSpec, fade_in_secs: f32) {
        if let Some(mut old) = self.layers.remove(&key) {
            old.stop(Tween::default());
        }

        let target_db = amplitude_to_db(spec.gain);
        let data = self.render_layer(spec).loop_region(..);
        let data = if fade_in_secs > 0.0 { data.volume(Decibels::SILENCE) } else { data.volume(target_db) };

        match self.music_track.play(data) {
            Ok(mut handle) => {
                if fade_in_secs > 0.0 {
                    handle.set_volume(target_db, tween(fade_in_secs));
                }
                debug!("Layer playing: {}", key);
                self.layers.insert(key, handle);
            }
            Err(e) => error!("Kira play error: {}", e),
        }
    }

    fn stop_layer(&mut self, key: LayerKey, fade_out_secs: f32) {
        if let Some(mut handle) = self.layers.remove(&key) {
            handle.stop(tween(fade_out_secs));
        }
    }

    fn retune_layer(&mut self, key: LayerKey, semitones: i32) {
        if let Some(handle) = self.layers.get_mut(&key) {
            let rate = theory::semitone_ratio(semitones as f32) as f64;
            handle.set_playback_rate(PlaybackRate(rate), tween(0.5));
        }
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_track.set_volume(amplitude_to_db(volume), tween(0.1));
    }

    fn set_intensity(&mut self, intensity: f32) {
        let cutoff = FILTER_BASE_HZ - intensity.clamp(0.0, 1.0) as f64 * FILTER_RANGE_HZ;
        self.filter.set_cutoff(cutoff, tween(1.0));
    }

    fn play_cue(&mut self, cue: SoundCue, volume: f32) {
        let data = self
            .cue_cache
            .entry(cue)
            .or_insert_with(|| Self::render_cue(cue))
            .clone()
            .volume(amplitude_to_db(volume));
        if let Err(e) = self.sfx_track.play(data) {
            error!("Kira cue error: {}", e);
        }
    }

    fn suspend(&mut self) {
        self.music_track.pause(tween(0.1));
        self.sfx_track.pause(tween(0.1));
    }

    fn resume(&mut self) {
        self.music_track.resume(tween(0.1));
        self.sfx_track.resume(tween(0.1));
    }
}

impl Drop for KiraBackend {
    fn drop(&mut self) {
        for (_, mut handle) in self.layers.drain() {
            handle.stop(Tween::default());
        }
        debug!("Kira backend dropped");
    }
}
