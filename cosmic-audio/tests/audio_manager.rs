use std::cell::RefCell;
use std::rc::Rc;

use cosmic_audio::manager::theme_track;
use cosmic_audio::{
    AudioBackend, AudioConfig, AudioManager, LayerKey, LayerSpec, MusicConfig, SoundCue, TrackId,
};

#[derive(Clone, Default)]
struct CueLog {
    cues: Rc<RefCell<Vec<(SoundCue, f32)>>>,
    volumes: Rc<RefCell<Vec<f32>>>,
}

impl AudioBackend for CueLog {
    fn start_layer(&mut self, _key: LayerKey, _spec: &LayerSpec, _fade_in_secs: f32) {}
    fn stop_layer(&mut self, _key: LayerKey, _fade_out_secs: f32) {}
    fn retune_layer(&mut self, _key: LayerKey, _semitones: i32) {}
    fn set_music_volume(&mut self, volume: f32) {
        self.volumes.borrow_mut().push(volume);
    }
    fn set_intensity(&mut self, _intensity: f32) {}
    fn play_cue(&mut self, cue: SoundCue, volume: f32) {
        self.cues.borrow_mut().push((cue, volume));
    }
    fn suspend(&mut self) {}
    fn resume(&mut self) {}
}

fn manager() -> (AudioManager, CueLog) {
    let log = CueLog::default();
    let audio = AudioConfig { master_volume: 0.5, music_volume: 0.6, sfx_volume: 0.8 };
    let mgr = AudioManager::new(audio, MusicConfig::default(), Some(Box::new(log.clone())));
    (mgr, log)
}

#[test]
fn test_music_volume_is_music_times_master() {
    let (mut mgr, log) = manager();
    assert!((mgr.music().volume() - 0.3).abs() < 1e-6);

    mgr.set_master_volume(1.0);
    assert!((mgr.music().volume() - 0.6).abs() < 1e-6);
    mgr.set_music_volume(2.0);
    assert_eq!(mgr.music_volume(), 1.0);
    assert_eq!(log.volumes.borrow().last().copied(), Some(1.0));
}

#[test]
fn test_ui_click_uses_sfx_volume() {
    let (mut mgr, log) = manager();
    mgr.play_ui_click();
    let (cue, volume) = log.cues.borrow()[0];
    assert_eq!(cue, SoundCue::UiClick);
    assert!((volume - 0.8 * 0.5 * 0.1).abs() < 1e-6);
}

#[test]
fn test_queued_cues_drain_on_update() {
    let (mut mgr, log) = manager();
    let tx = mgr.cue_sender();
    tx.send(SoundCue::UiClick).unwrap();
    tx.send(SoundCue::Scan).unwrap();
    assert!(log.cues.borrow().is_empty());

    mgr.update(0.016);
    let cues: Vec<SoundCue> = log.cues.borrow().iter().map(|(c, _)| *c).collect();
    assert_eq!(cues, vec![SoundCue::UiClick, SoundCue::Scan]);
}

#[test]
fn test_unknown_sound_is_ignored() {
    let (mut mgr, log) = manager();
    mgr.play_sound("kazoo");
    mgr.play_sound("navigate");
    assert_eq!(log.cues.borrow().len(), 1);
    assert_eq!(log.cues.borrow()[0].0, SoundCue::Navigate);
}

#[test]
fn test_theme_map() {
    assert_eq!(theme_track("industrial"), TrackId::Station);
    assert_eq!(theme_track("hostile"), TrackId::Danger);
    assert_eq!(theme_track("mysterious"), TrackId::Exploration);
    assert_eq!(theme_track("combat"), TrackId::Combat);
    assert_eq!(theme_track("nebula"), TrackId::Exploration);
}

#[test]
fn test_region_music_only_switches_on_change() {
    let (mut mgr, _) = manager();
    mgr.play_music(TrackId::Exploration);

    mgr.change_region_music("peaceful");
    assert_eq!(mgr.music().current_track(), TrackId::Exploration);

    mgr.change_region_music("hostile");
    assert_eq!(mgr.current_music_track(), TrackId::Danger);
    assert_eq!(mgr.music().current_track(), TrackId::Danger);
}

#[test]
fn test_toggle_music() {
    let (mut mgr, _) = manager();
    mgr.play_music_named("station");
    assert!(mgr.is_music_playing());
    mgr.toggle_music();
    assert!(!mgr.is_music_playing());
    mgr.toggle_music();
    assert!(mgr.is_music_playing());
    assert_eq!(mgr.get_current_track_info().name, "Station Ambience");

    mgr.play_music_named("polka");
    assert_eq!(mgr.current_music_track(), TrackId::Station);
}
