use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{info, warn};

use crate::backend::{AudioBackend, SoundCue};
use crate::config::{AudioConfig, MusicConfig};
use crate::engine::{MusicContext, MusicEngine, TrackInfo};
use crate::track::TrackId;

/// 区域音乐主题 -> 曲目；未知主题回落到 exploration
pub fn theme_track(theme: &str) -> TrackId {
    match theme {
        "station" | "industrial" => TrackId::Station,
        "danger" | "hostile" => TrackId::Danger,
        "combat" => TrackId::Combat,
        "exploration" | "peaceful" | "mysterious" => TrackId::Exploration,
        _ => TrackId::Exploration,
    }
}

/// 音量总控 + 音效 + 音乐引擎
pub struct AudioManager {
    master_volume: f32,
    music_volume: f32,
    sfx_volume: f32,
    current_music_track: TrackId,

    music: MusicEngine,
    cue_tx: Sender<SoundCue>,
    cue_rx: Receiver<SoundCue>,
}

impl AudioManager {
    pub fn new(audio: AudioConfig, music: MusicConfig, backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            warn!("AudioManager created without an audio backend, running muted");
        }
        let (cue_tx, cue_rx) = unbounded();
        let mut mgr = Self {
            master_volume: audio.master_volume.clamp(0.0, 1.0),
            music_volume: audio.music_volume.clamp(0.0, 1.0),
            sfx_volume: audio.sfx_volume.clamp(0.0, 1.0),
            current_music_track: TrackId::Exploration,
            music: MusicEngine::new(music, backend),
            cue_tx,
            cue_rx,
        };
        mgr.update_volumes();
        mgr
    }

    /// 供控件点击音效使用的发送端
    pub fn cue_sender(&self) -> Sender<SoundCue> {
        self.cue_tx.clone()
    }

    pub fn update(&mut self, dt: f32) {
        while let Ok(cue) = self.cue_rx.try_recv() {
            self.play_cue(cue);
        }
        self.music.update(dt);
    }

    fn update_volumes(&mut self) {
        self.music.set_volume(self.music_volume * self.master_volume);
    }

    pub fn play_music(&mut self, track: TrackId) {
        self.current_music_track = track;
        self.music.play(track);
    }

    pub fn play_music_named(&mut self, name: &str) {
        match name.parse::<TrackId>() {
            Ok(track) => self.play_music(track),
            Err(e) => warn!("{}", e),
        }
    }

    pub fn pause_music(&mut self) {
        self.music.stop();
    }

    pub fn toggle_music(&mut self) {
        if self.music.is_playing() {
            self.pause_music();
        } else {
            self.play_music(self.current_music_track);
        }
    }

    pub fn update_music_for_game_state(&mut self, ctx: &MusicContext) {
        self.music.update_game_state(ctx);
        self.current_music_track = self.music.current_track();
    }

    pub fn change_region_music(&mut self, theme: &str) {
        if theme.is_empty() {
            return;
        }
        let track = theme_track(theme);
        if track != self.current_music_track {
            info!(
                "Changing music from {} to {} (region: {})",
                self.current_music_track, track, theme
            );
            self.current_music_track = track;
            self.music.play(track);
        }
    }

    pub fn play_ui_click(&mut self) {
        self.play_cue(SoundCue::UiClick);
    }

    pub fn play_sound(&mut self, name: &str) {
        match SoundCue::from_name(name) {
            Some(cue) if cue != SoundCue::UiClick => self.play_cue(cue),
            _ => info!("Unknown sound: {}", name),
        }
    }

    fn play_cue(&mut self, cue: SoundCue) {
        let volume = self.sfx_volume * self.master_volume * cue.base_gain();
        if let Some(backend) = self.music.backend_mut() {
            backend.play_cue(cue, volume);
        }
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
        self.update_volumes();
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
        self.update_volumes();
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn sfx_volume(&self) -> f32 {
        self.sfx_volume
    }

    pub fn current_music_track(&self) -> TrackId {
        self.current_music_track
    }

    pub fn is_music_playing(&self) -> bool {
        self.music.is_playing()
    }

    pub fn get_current_track_info(&self) -> TrackInfo {
        self.music.get_current_track_info()
    }

    pub fn get_visualization_data(&self) -> Option<Vec<u8>> {
        self.music.get_visualization_data()
    }

    pub fn music(&self) -> &MusicEngine {
        &self.music
    }

    pub fn music_mut(&mut self) -> &mut MusicEngine {
        &mut self.music
    }
}
