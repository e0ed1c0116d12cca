use std::collections::BTreeMap;
use log::{debug, info};
use serde::Serialize;

use crate::backend::{AudioBackend, LayerKey};
use crate::config::MusicConfig;
use crate::spectrum::Spectrum;
use crate::theory::{self, Mood};
use crate::track::{track_definitions, LayerSpec, TrackId, TrackSpec};

/// 指数淡出的终点增益
const FADE_FLOOR: f32 = 0.001;
/// 累加 dt 的浮点误差容限
const TIME_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    FadingIn { elapsed: f32, duration: f32 },
    Sustain,
    FadingOut { elapsed: f32, duration: f32, from: f32 },
}

#[derive(Debug, Clone)]
struct ActiveLayer {
    spec: LayerSpec,
    phase: Phase,
    gain: f32,
    semitones: i32,
}

impl ActiveLayer {
    fn new(spec: LayerSpec, fade_in: f32) -> Self {
        let phase = if fade_in > 0.0 {
            Phase::FadingIn { elapsed: 0.0, duration: fade_in }
        } else {
            Phase::Sustain
        };
        let gain = if fade_in > 0.0 { 0.0 } else { spec.gain };
        Self { spec, phase, gain, semitones: 0 }
    }

    fn fade_out(&mut self, duration: f32) {
        if matches!(self.phase, Phase::FadingOut { .. }) {
            return;
        }
        self.phase = Phase::FadingOut {
            elapsed: 0.0,
            duration: duration.max(0.0),
            from: self.gain.max(FADE_FLOOR),
        };
    }

    fn is_fading_out(&self) -> bool {
        matches!(self.phase, Phase::FadingOut { .. })
    }

    /// 返回 false 表示淡出结束，应当移除
    fn advance(&mut self, dt: f32) -> bool {
        match &mut self.phase {
            Phase::FadingIn { elapsed, duration } => {
                *elapsed += dt;
                if *elapsed + TIME_EPSILON >= *duration {
                    self.gain = self.spec.gain;
                    self.phase = Phase::Sustain;
                } else {
                    self.gain = self.spec.gain * (*elapsed / *duration);
                }
                true
            }
            Phase::Sustain => true,
            Phase::FadingOut { elapsed, duration, from } => {
                *elapsed += dt;
                if *elapsed + TIME_EPSILON >= *duration {
                    self.gain = 0.0;
                    return false;
                }
                let t = *elapsed / *duration;
                self.gain = *from * (FADE_FLOOR / *from).powf(t);
                true
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingStart {
    track: TrackId,
    remaining: f32,
}

/// 驱动选曲的游戏状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicContext {
    pub health: f32,
    pub in_pod_mode: bool,
    pub at_repair_location: bool,
    pub in_combat: bool,
}

impl Default for MusicContext {
    fn default() -> Self {
        Self { health: 100.0, in_pod_mode: false, at_repair_location: false, in_combat: false }
    }
}

impl MusicContext {
    pub fn target_track(&self) -> TrackId {
        if self.in_pod_mode {
            TrackId::Pod
        } else if self.health < 30.0 {
            TrackId::Danger
        } else if self.at_repair_location {
            TrackId::Station
        } else if self.in_combat {
            TrackId::Combat
        } else {
            TrackId::Exploration
        }
    }

    pub fn intensity(&self) -> f32 {
        (1.0 - self.health / 100.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackInfo {
    pub name: String,
    pub mood: Mood,
    pub is_playing: bool,
    pub active_layers: usize,
}

pub struct MusicEngine {
    config: MusicConfig,
    tracks: BTreeMap<TrackId, TrackSpec>,
    backend: Option<Box<dyn AudioBackend>>,

    layers: BTreeMap<LayerKey, ActiveLayer>,
    current_track: TrackId,
    playing: bool,
    volume: f32,
    intensity: f32,
    suspended: bool,

    pending: Option<PendingStart>,
    // 距上次换和弦的时间；None 表示和弦进行未运行
    chord_clock: Option<f32>,
    chord_index: usize,
}

impl MusicEngine {
    pub fn new(config: MusicConfig, backend: Option<Box<dyn AudioBackend>>) -> Self {
        let tracks = track_definitions().into_iter().map(|t| (t.id, t)).collect();
        let volume = config.initial_volume.clamp(0.0, 1.0);
        let mut engine = Self {
            config,
            tracks,
            backend,
            layers: BTreeMap::new(),
            current_track: TrackId::Exploration,
            playing: false,
            volume,
            intensity: 0.0,
            suspended: false,
            pending: None,
            chord_clock: None,
            chord_index: 0,
        };
        if let Some(backend) = engine.backend.as_mut() {
            backend.set_music_volume(volume);
        }
        engine
    }

    pub fn play(&mut self, track: TrackId) {
        if self.playing && self.current_track == track {
            return;
        }

        if self.suspended {
            self.resume();
        }

        if self.playing {
            self.crossfade_to(track);
        } else {
            self.pending = None;
            self.start_track(track);
        }

        self.playing = true;
        self.current_track = track;
        info!("Music: playing '{}'", track);

        if self.chord_clock.is_none() {
            self.chord_clock = Some(0.0);
        }
    }

    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        let fade = self.config.layer_fade_secs;
        let keys: Vec<LayerKey> = self.layers.keys().copied().collect();
        for key in keys {
            self.fade_layer(key, fade);
        }
        self.pending = None;
        self.chord_clock = None;
        self.playing = false;
        info!("Music: stopped");
    }

    pub fn pause(&mut self) {
        if self.playing && !self.suspended {
            self.suspended = true;
            if let Some(backend) = self.backend.as_mut() {
                backend.suspend();
            }
        }
    }

    pub fn resume(&mut self) {
        if self.suspended {
            self.suspended = false;
            if let Some(backend) = self.backend.as_mut() {
                backend.resume();
            }
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// 推进所有淡入淡出、延迟启动和和弦进行
    pub fn update(&mut self, dt: f32) {
        if self.suspended || dt <= 0.0 {
            return;
        }

        if let Some(mut pending) = self.pending.take() {
            pending.remaining -= dt;
            if pending.remaining <= TIME_EPSILON {
                // 淡化期间又被停止或切走，则放弃
                if self.playing && self.current_track == pending.track {
                    self.start_track(pending.track);
                }
            } else {
                self.pending = Some(pending);
            }
        }

        let mut finished = Vec::new();
        for (key, layer) in self.layers.iter_mut() {
            if !layer.advance(dt) {
                finished.push(*key);
            }
        }
        for key in finished {
            self.layers.remove(&key);
            debug!("Layer {} removed", key);
        }

        let interval = self.config.chord_change_secs;
        if let Some(clock) = self.chord_clock.as_mut() {
            *clock += dt;
            if interval > 0.0 && *clock + TIME_EPSILON >= interval {
                *clock -= interval;
                self.change_chord();
            }
        }
    }

    pub fn set_volume(&mut self, level: f32) {
        self.volume = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        if let Some(backend) = self.backend.as_mut() {
            backend.set_music_volume(self.volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.clamp(0.0, 1.0);
        if let Some(backend) = self.backend.as_mut() {
            backend.set_intensity(self.intensity);
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn update_game_state(&mut self, ctx: &MusicContext) {
        let target = ctx.target_track();
        if self.current_track != target {
            self.play(target);
        }
        self.set_intensity(ctx.intensity());
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_track(&self) -> TrackId {
        self.current_track
    }

    pub fn chord_index(&self) -> usize {
        self.chord_index
    }

    pub fn track(&self, id: TrackId) -> Option<&TrackSpec> {
        self.tracks.get(&id)
    }

    pub fn active_layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn active_layers_of(&self, track: TrackId) -> usize {
        self.layers.keys().filter(|k| k.track == track).count()
    }

    /// 当前增益 (淡入淡出中的瞬时值)
    pub fn layer_gain(&self, key: LayerKey) -> Option<f32> {
        self.layers.get(&key).map(|l| l.gain)
    }

    pub fn layer_semitones(&self, key: LayerKey) -> Option<i32> {
        self.layers.get(&key).map(|l| l.semitones)
    }

    pub fn has_audio_context(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_mut(&mut self) -> Option<&mut (dyn AudioBackend + 'static)> {
        self.backend.as_deref_mut()
    }

    pub fn get_current_track_info(&self) -> TrackInfo {
        let (name, mood) = match self.tracks.get(&self.current_track) {
            Some(t) => (t.name.clone(), t.mood),
            None => ("Unknown".to_string(), Mood::Peaceful),
        };
        TrackInfo {
            name,
            mood,
            is_playing: self.playing,
            active_layers: self.layers.len(),
        }
    }

    /// 128 个频段的字节频谱；没有音频上下文时为 None
    pub fn get_visualization_data(&self) -> Option<Vec<u8>> {
        self.backend.as_ref()?;

        let mut spectrum = Spectrum::new();
        if !self.suspended {
            for layer in self.layers.values() {
                let amplitude = layer.gain * self.volume;
                if layer.spec.kind.is_noise() || layer.spec.frequencies.is_empty() {
                    spectrum.add_noise(amplitude);
                    continue;
                }
                let ratio = theory::semitone_ratio(layer.semitones as f32)
                    * theory::cents_ratio(layer.spec.detune);
                let per_partial = amplitude / layer.spec.frequencies.len() as f32;
                for &freq in &layer.spec.frequencies {
                    spectrum.add_tone(freq * ratio, per_partial);
                }
            }
        }
        Some(spectrum.to_bytes())
    }

    fn start_track(&mut self, track: TrackId) {
        let Some(spec) = self.tracks.get(&track) else { return };
        let layers = spec.layers.clone();
        let fade_in = self.config.layer_fade_secs;
        debug!("Starting track '{}' ({} layers)", track, layers.len());
        for (index, layer) in layers.into_iter().enumerate() {
            self.start_layer(LayerKey::new(track, index), layer, fade_in);
        }
    }

    fn start_layer(&mut self, key: LayerKey, spec: LayerSpec, fade_in: f32) {
        // 同 key 的旧声部立即停止
        if self.layers.remove(&key).is_some() {
            if let Some(backend) = self.backend.as_mut() {
                backend.stop_layer(key, 0.0);
            }
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.start_layer(key, &spec, fade_in);
        }
        self.layers.insert(key, ActiveLayer::new(spec, fade_in));
    }

    fn fade_layer(&mut self, key: LayerKey, duration: f32) {
        let Some(layer) = self.layers.get_mut(&key) else { return };
        if layer.is_fading_out() {
            return;
        }
        layer.fade_out(duration);
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_layer(key, duration);
        }
    }

    fn crossfade_to(&mut self, track: TrackId) {
        let old = self.current_track;
        let duration = self.config.crossfade_secs;
        let keys: Vec<LayerKey> = self.layers.keys().filter(|k| k.track == old).copied().collect();
        for key in keys {
            self.fade_layer(key, duration);
        }
        debug!("Crossfading '{}' -> '{}' over {:.1}s", old, track, duration);
        self.pending = Some(PendingStart { track, remaining: duration * 0.5 });
    }

    fn change_chord(&mut self) {
        let Some(track) = self.tracks.get(&self.current_track) else { return };
        let mood = track.mood;
        let len = theory::progression(mood).len();
        self.chord_index = (self.chord_index + 1) % len;
        let root = theory::chord_root(mood, self.chord_index);

        let current = self.current_track;
        for (key, layer) in self.layers.iter_mut() {
            if key.track != current || layer.is_fading_out() || !layer.spec.kind.follows_chords() {
                continue;
            }
            layer.semitones = root;
            if let Some(backend) = self.backend.as_mut() {
                backend.retune_layer(*key, root);
            }
        }
        debug!("Chord -> {} (root {:+})", self.chord_index, root);
    }
}
