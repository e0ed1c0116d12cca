use std::cell::RefCell;
use std::rc::Rc;
use serde_json::{json, Value};
use cosmic_audio::{AudioBackend, LayerKey, LayerSpec, SilentBackend, SoundCue, TrackId};
use cosmic_core::controls::*;
use cosmic_core::event::{Augmentation, PlayerStats};
use cosmic_core::modal::CHOICE_MODAL_ID;
use cosmic_core::{CosmicConfig, GameEngine, GameEvent, GameLink, GameState, NoticeKind, ScreenId, VolumeSlider};
use cosmic_ui::input::Key;

#[derive(Clone, Default)]
struct Recorder {
    sent: Rc<RefCell<Vec<(String, Value)>>>,
}

impl GameLink for Recorder {
    fn send_action(&mut self, action: &str, params: Value) {
        self.sent.borrow_mut().push((action.to_string(), params));
    }
}

impl Recorder {
    fn actions(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|(a, _)| a.clone()).collect()
    }
}

/// 只记录音效的后端
#[derive(Clone, Default)]
struct CueLog {
    cues: Rc<RefCell<Vec<SoundCue>>>,
}

impl AudioBackend for CueLog {
    fn start_layer(&mut self, _key: LayerKey, _spec: &LayerSpec, _fade_in_secs: f32) {}
    fn stop_layer(&mut self, _key: LayerKey, _fade_out_secs: f32) {}
    fn retune_layer(&mut self, _key: LayerKey, _semitones: i32) {}
    fn set_music_volume(&mut self, _volume: f32) {}
    fn set_intensity(&mut self, _intensity: f32) {}
    fn play_cue(&mut self, cue: SoundCue, _volume: f32) {
        self.cues.borrow_mut().push(cue);
    }
    fn suspend(&mut self) {}
    fn resume(&mut self) {}
}

impl CueLog {
    fn clicks(&self) -> usize {
        self.cues.borrow().iter().filter(|c| **c == SoundCue::UiClick).count()
    }
}

fn engine_with(cfg: &CosmicConfig) -> (GameEngine, Recorder) {
    let link = Recorder::default();
    let engine = GameEngine::new(cfg, Some(Box::new(SilentBackend::default())), Box::new(link.clone()));
    (engine, link)
}

fn engine() -> (GameEngine, Recorder) {
    engine_with(&CosmicConfig::default())
}

fn frames(engine: &mut GameEngine, n: usize) {
    for _ in 0..n {
        engine.update(0.05);
    }
}

/// 走完加载画面进入主菜单
fn booted() -> (GameEngine, Recorder) {
    let (mut engine, link) = engine();
    engine.update(2.0);
    frames(&mut engine, 2);
    (engine, link)
}

fn in_game() -> (GameEngine, Recorder) {
    let (mut engine, link) = booted();
    engine.click(NEW_GAME_BTN);
    frames(&mut engine, 2);
    (engine, link)
}

fn toast_messages(engine: &GameEngine) -> Vec<String> {
    engine.ui().notices().toasts().iter().map(|t| t.message.clone()).collect()
}

#[test]
fn test_loading_then_main_menu() {
    let (mut engine, _) = engine();
    assert!(engine.is_loading());
    assert_eq!(engine.ui().current_screen(), ScreenId::Loading);

    engine.update(1.5);
    assert_eq!(engine.ui().current_screen(), ScreenId::Loading);

    engine.update(0.5);
    frames(&mut engine, 2);
    assert!(!engine.is_loading());
    assert_eq!(engine.ui().current_screen(), ScreenId::MainMenu);
}

#[test]
fn test_music_starts_on_first_interaction() {
    let (mut engine, _) = booted();
    assert!(!engine.audio().is_music_playing());

    engine.click(SETTINGS_BTN);
    assert!(engine.audio().is_music_playing());
    assert_eq!(engine.audio().current_music_track(), TrackId::Exploration);

    frames(&mut engine, 2);
    assert_eq!(engine.ui().current_screen(), ScreenId::Settings);
}

#[test]
fn test_new_game_flow() {
    let (engine, link) = in_game();
    assert_eq!(engine.ui().current_screen(), ScreenId::Game);
    assert!(engine.ui().has_active_game());
    assert_eq!(link.actions(), vec!["new_game"]);

    let log: Vec<_> = engine.ui().notices().event_log().map(|e| e.message.clone()).collect();
    assert_eq!(log.len(), 1);
    assert!(log[0].starts_with("Welcome to Cosmic Explorer"));
}

#[test]
fn test_continue_without_game_shows_notice() {
    let (mut engine, _) = booted();
    engine.dispatch(cosmic_core::UiCommand::ContinueGame);
    frames(&mut engine, 2);
    assert_eq!(engine.ui().current_screen(), ScreenId::MainMenu);
    assert!(toast_messages(&engine)[0].starts_with("No active game found"));
}

#[test]
fn test_continue_button_after_leaving_game() {
    let (mut engine, _) = in_game();
    engine.handle_game_state(GameState::default());
    engine.key(Key::Escape);
    frames(&mut engine, 2);

    assert_eq!(engine.ui().current_screen(), ScreenId::MainMenu);
    let menu = engine.ui().menu_controls();
    assert!(menu.get(CONTINUE_BTN).unwrap().visible);
    assert!(!menu.get(NEW_GAME_BTN).unwrap().primary);

    engine.click(CONTINUE_BTN);
    frames(&mut engine, 2);
    assert_eq!(engine.ui().current_screen(), ScreenId::Game);
}

#[test]
fn test_event_choice_is_sent_back() {
    let (mut engine, link) = in_game();
    engine.handle_game_event(GameEvent {
        kind: "choice_required".into(),
        message: "A derelict freighter drifts nearby.".into(),
        choices: vec![json!("Board it"), json!("Ignore it")],
    });

    let top = engine.ui().modals().top().unwrap();
    assert_eq!(top.id, CHOICE_MODAL_ID);
    assert_eq!(top.choices.len(), 2);
    assert_eq!(engine.ui().notices().event_log_len(), 2);

    engine.key(Key::Char('2'));
    assert!(engine.ui().modals().top().is_none());
    let sent = link.sent.borrow();
    assert_eq!(sent.last().unwrap(), &("choice".to_string(), json!({ "choice": 2 })));
}

#[test]
fn test_event_choices_skip_blanks_but_keep_server_index() {
    let (mut engine, link) = in_game();
    engine.handle_game_event(GameEvent {
        kind: "choice_required".into(),
        message: "Pirates hail you.".into(),
        choices: vec![json!(null), json!("Attack"), json!("Flee")],
    });
    assert_eq!(engine.ui().modals().top().unwrap().choices, vec!["Attack", "Flee"]);

    engine.select_choice(1);
    let sent = link.sent.borrow();
    assert_eq!(sent.last().unwrap(), &("choice".to_string(), json!({ "choice": 2 })));
}

#[test]
fn test_modal_choice_plays_click_sound() {
    let cues = CueLog::default();
    let mut engine = GameEngine::new(
        &CosmicConfig::default(),
        Some(Box::new(cues.clone())),
        Box::new(Recorder::default()),
    );
    engine.update(2.0);
    frames(&mut engine, 2);
    engine.click(NEW_GAME_BTN);
    frames(&mut engine, 2);
    let before = cues.clicks();

    engine.handle_game_event(GameEvent {
        kind: "choice_required".into(),
        message: "A distress beacon pulses.".into(),
        choices: vec![json!("Answer"), json!("Ignore")],
    });
    engine.select_choice(1);
    engine.update(0.016);
    assert_eq!(cues.clicks(), before + 1);
}

#[test]
fn test_combat_and_invalid_choices_open_no_modal() {
    let (mut engine, _) = in_game();
    for kind in ["combat_start", "combat"] {
        engine.handle_game_event(GameEvent {
            kind: kind.into(),
            message: "Pirates attack!".into(),
            choices: vec![json!("Attack"), json!("Flee")],
        });
    }
    engine.handle_game_event(GameEvent {
        kind: "event".into(),
        message: "Static on the comms.".into(),
        choices: vec![json!(null), json!(""), json!(0), json!(false)],
    });
    assert!(engine.ui().modals().active_modals().is_empty());
}

#[test]
fn test_game_over_offers_new_game() {
    let (mut engine, link) = in_game();
    engine.handle_game_state(GameState { game_over: true, ..Default::default() });

    assert!(!engine.ui().has_active_game());
    assert_eq!(engine.ui().modals().top().unwrap().title, "Game Over");
    let last = engine.ui().notices().event_log().last().unwrap();
    assert_eq!(last.kind, NoticeKind::Danger);

    engine.select_choice(1);
    assert_eq!(link.actions(), vec!["new_game", "new_game"]);
    assert!(engine.ui().has_active_game());
}

#[test]
fn test_victory_return_to_menu() {
    let (mut engine, _) = in_game();
    engine.handle_game_state(GameState { game_over: true, victory: true, ..Default::default() });
    assert_eq!(engine.ui().modals().top().unwrap().title, "Victory!");

    engine.select_choice(2);
    frames(&mut engine, 2);
    assert_eq!(engine.ui().current_screen(), ScreenId::MainMenu);
}

#[test]
fn test_game_state_drives_music() {
    let (mut engine, _) = in_game();
    let hurt = GameState {
        player_stats: PlayerStats { health: 20.0, ..Default::default() },
        ..Default::default()
    };
    engine.handle_game_state(hurt);
    assert_eq!(engine.audio().current_music_track(), TrackId::Danger);
    assert!((engine.audio().music().intensity() - 0.8).abs() < 1e-6);

    engine.handle_game_state(GameState { at_repair_location: true, ..Default::default() });
    assert_eq!(engine.audio().current_music_track(), TrackId::Station);
}

#[test]
fn test_number_keys_send_actions() {
    let (mut engine, link) = in_game();
    engine.key(Key::Char('1'));
    engine.key(Key::Char('2'));
    // 不在维修站时维修不会发出
    engine.key(Key::Char('3'));
    assert_eq!(link.actions(), vec!["new_game", "navigate", "event"]);

    engine.handle_game_state(GameState { at_repair_location: true, ..Default::default() });
    engine.key(Key::Char('3'));
    assert_eq!(link.actions().last().map(String::as_str), Some("repair"));
}

#[test]
fn test_local_only_actions() {
    let (mut engine, link) = in_game();
    engine.key(Key::Char('6'));
    assert!(toast_messages(&engine).contains(&"Star map unavailable!".to_string()));

    engine.key(Key::Char('5'));
    assert!(toast_messages(&engine).contains(&"No active quests".to_string()));

    engine.handle_game_state(GameState { inventory: vec!["Ore".into()], ..Default::default() });
    engine.key(Key::Char('4'));
    assert_eq!(engine.ui().modals().top().unwrap().choices, vec!["Ore", "Close"]);
    assert_eq!(link.actions(), vec!["new_game"]);
}

#[test]
fn test_pod_mods_modal_buys_augmentation() {
    let (mut engine, link) = in_game();
    let state = GameState {
        at_repair_location: true,
        player_stats: PlayerStats {
            has_flight_pod: true,
            pod_augmentations: vec!["shield_boost".into()],
            ..Default::default()
        },
        available_augmentations: vec![
            Augmentation { id: "shield_boost".into(), name: "Shield Boost".into(), cost: 300 },
            Augmentation { id: "scanner_array".into(), name: "Scanner Array".into(), cost: 200 },
        ],
        ..Default::default()
    };
    engine.handle_game_state(state);

    engine.click(POD_MODS_BTN);
    let top = engine.ui().modals().top().unwrap();
    assert_eq!(top.choices, vec!["Scanner Array (200 credits)"]);

    engine.select_choice(1);
    let sent = link.sent.borrow();
    assert_eq!(
        sent.last().unwrap(),
        &("buy_augmentation".to_string(), json!({ "augmentation_id": "scanner_array" }))
    );
}

#[test]
fn test_disabled_pod_mods_shows_hint() {
    let (mut engine, link) = in_game();
    engine.handle_game_state(GameState {
        at_repair_location: true,
        player_stats: PlayerStats { has_flight_pod: true, just_bought_pod: true, ..Default::default() },
        ..Default::default()
    });

    engine.click(POD_MODS_BTN);
    assert!(engine.ui().modals().top().is_none());
    assert_eq!(toast_messages(&engine), vec!["Navigate at least once before installing augmentations"]);
    assert_eq!(link.actions(), vec!["new_game"]);
}

#[test]
fn test_save_load_shortcuts() {
    let (mut engine, link) = in_game();
    engine.key(Key::F(5));
    engine.key(Key::Char('2'));
    assert_eq!(link.sent.borrow().last().unwrap(), &("save_game".to_string(), json!({ "slot": 1 })));

    engine.key(Key::F(9));
    assert!(engine.ui().modals().top().is_some());
    engine.key(Key::Escape);
    assert!(engine.ui().modals().top().is_none());
    assert_eq!(engine.ui().current_screen(), ScreenId::Game);
}

#[test]
fn test_settings_apply_volumes() {
    let (mut engine, _) = booted();
    engine.click(SETTINGS_BTN);
    frames(&mut engine, 2);

    engine.set_volume_slider(VolumeSlider::Master, 1.0);
    engine.set_volume_slider(VolumeSlider::Music, 0.5);
    engine.set_volume_slider(VolumeSlider::Sfx, 3.0);
    // 返回主菜单前不生效
    assert!((engine.audio().master_volume() - 0.7).abs() < 1e-6);

    engine.click(SETTINGS_BACK_BTN);
    frames(&mut engine, 2);
    assert_eq!(engine.ui().current_screen(), ScreenId::MainMenu);
    assert_eq!(engine.audio().master_volume(), 1.0);
    assert_eq!(engine.audio().sfx_volume(), 1.0);
    assert!((engine.audio().music().volume() - 0.5).abs() < 1e-6);
}

#[test]
fn test_credits_toast() {
    let (mut engine, _) = booted();
    engine.click(CREDITS_BTN);
    assert_eq!(engine.ui().notices().toasts().len(), 1);
    frames(&mut engine, 99);
    assert_eq!(engine.ui().notices().toasts().len(), 1);
    frames(&mut engine, 2);
    assert!(engine.ui().notices().toasts().is_empty());
}

#[test]
fn test_bad_ui_config_falls_back_to_main_menu() {
    let mut cfg = CosmicConfig::default();
    cfg.ui.modal_z_step = 0;
    let (mut engine, _) = engine_with(&cfg);

    assert!(!engine.is_loading());
    assert_eq!(engine.ui().current_screen(), ScreenId::MainMenu);
    engine.click(NEW_GAME_BTN);
    frames(&mut engine, 2);
    assert_eq!(engine.ui().current_screen(), ScreenId::Game);
}
