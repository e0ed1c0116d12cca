use std::fmt;
use log::debug;
use crate::track::{LayerSpec, TrackId};

/// 一个正在发声的声部：所属曲目 + 曲目内序号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerKey {
    pub track: TrackId,
    pub index: usize,
}

impl LayerKey {
    pub fn new(track: TrackId, index: usize) -> Self {
        Self { track, index }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.track, self.index)
    }
}

/// 界面音效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    UiClick,
    Navigate,
    Scan,
    Repair,
    Alert,
    Success,
}

impl SoundCue {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ui_click" | "click" => Some(SoundCue::UiClick),
            "navigate" => Some(SoundCue::Navigate),
            "scan" => Some(SoundCue::Scan),
            "repair" => Some(SoundCue::Repair),
            "alert" => Some(SoundCue::Alert),
            "success" => Some(SoundCue::Success),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::UiClick => "ui_click",
            SoundCue::Navigate => "navigate",
            SoundCue::Scan => "scan",
            SoundCue::Repair => "repair",
            SoundCue::Alert => "alert",
            SoundCue::Success => "success",
        }
    }

    /// 乘 sfx 音量之前的基础增益
    pub fn base_gain(&self) -> f32 {
        match self {
            SoundCue::UiClick => 0.1,
            SoundCue::Navigate => 0.5,
            SoundCue::Scan => 0.3,
            SoundCue::Repair => 0.3,
            SoundCue::Alert => 0.3,
            SoundCue::Success => 0.4,
        }
    }

    /// (起始频率, 结束频率, 时长秒)
    pub fn envelope(&self) -> (f32, f32, f32) {
        match self {
            SoundCue::UiClick => (800.0, 600.0, 0.03),
            SoundCue::Navigate => (100.0, 2000.0, 1.0),
            SoundCue::Scan => (1000.0, 2000.0, 0.6),
            SoundCue::Repair => (200.0, 400.0, 0.4),
            SoundCue::Alert => (800.0, 600.0, 0.5),
            SoundCue::Success => (523.25, 783.99, 0.4),
        }
    }
}

/// 实际发声的后端。MusicEngine 只负责调度和增益包络，
/// 后端负责把声部变成声音。
pub trait AudioBackend {
    fn start_layer(&mut self, key: LayerKey, spec: &LayerSpec, fade_in_secs: f32);
    fn stop_layer(&mut self, key: LayerKey, fade_out_secs: f32);
    /// 相对声部原始音高的半音偏移
    fn retune_layer(&mut self, key: LayerKey, semitones: i32);
    fn set_music_volume(&mut self, volume: f32);
    /// 0.0 平静 ~ 1.0 紧张
    fn set_intensity(&mut self, intensity: f32);
    fn play_cue(&mut self, cue: SoundCue, volume: f32);
    fn suspend(&mut self);
    fn resume(&mut self);
}

/// 无输出设备时使用，仅记录调用
#[derive(Debug, Default)]
pub struct SilentBackend {
    pub suspended: bool,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for SilentBackend {
    fn start_layer(&mut self, key: LayerKey, spec: &LayerSpec, fade_in_secs: f32) {
        debug!("[silent] start {} ({:?}) fade {:.2}s", key, spec.kind, fade_in_secs);
    }

    fn stop_layer(&mut self, key: LayerKey, fade_out_secs: f32) {
        debug!("[silent] stop {} fade {:.2}s", key, fade_out_secs);
    }

    fn retune_layer(&mut self, key: LayerKey, semitones: i32) {
        debug!("[silent] retune {} -> {:+}", key, semitones);
    }

    fn set_music_volume(&mut self, volume: f32) {
        debug!("[silent] music volume {:.2}", volume);
    }

    fn set_intensity(&mut self, intensity: f32) {
        debug!("[silent] intensity {:.2}", intensity);
    }

    fn play_cue(&mut self, cue: SoundCue, volume: f32) {
        debug!("[silent] cue {} at {:.2}", cue.as_str(), volume);
    }

    fn suspend(&mut self) {
        self.suspended = true;
    }

    fn resume(&mut self) {
        self.suspended = false;
    }
}
