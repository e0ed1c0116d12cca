use log::{debug, error, info};
use cosmic_audio::{AudioBackend, AudioConfig, AudioManager};
use cosmic_ui::input::Key;

use crate::command::{GameAction, SaveLoadMode, UiCommand};
use crate::config::CosmicConfig;
use crate::event::{GameEvent, GameLink, GameState};
use crate::notify::NoticeKind;
use crate::screen::ScreenId;
use crate::shortcuts::{self, Shortcut};
use crate::sounds::UiSounds;
use crate::ui_manager::UiManager;

const WELCOME: &str = "Welcome to Cosmic Explorer! Your journey begins...";
const NO_ACTIVE_GAME: &str = "No active game found. Please start a new game or load a saved game.";
const CREDITS: &str = "Cosmic Explorer: a journey through the stars. Thanks for playing!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeSlider {
    Master,
    Sfx,
    Music,
}

/// 启动阶段
#[derive(Debug, Clone, Copy, PartialEq)]
enum Boot {
    /// 加载画面停留中
    Loading { remaining: f32 },
    /// 已进入主菜单，等待第一次交互再开始播放音乐
    AwaitingInteraction,
    Running,
}

/// 客户端总控：持有界面、音频和服务端链接，统一分发指令
pub struct GameEngine {
    ui: UiManager,
    audio: AudioManager,
    link: Box<dyn GameLink>,
    state: Option<GameState>,
    boot: Boot,
    /// 设置页滑块的值，返回主菜单时才应用
    sliders: AudioConfig,
    quit: bool,
}

impl GameEngine {
    pub fn new(cfg: &CosmicConfig, backend: Option<Box<dyn AudioBackend>>, link: Box<dyn GameLink>) -> Self {
        let audio = AudioManager::new(cfg.audio.clone(), cfg.music.clone(), backend);
        let sounds = UiSounds::new(audio.cue_sender());

        let (ui, boot) = match UiManager::new(&cfg.ui, sounds.clone()) {
            Ok(ui) => (ui, Boot::Loading { remaining: cfg.ui.loading_delay_secs() }),
            Err(e) => {
                error!("Failed to initialize UI manager: {:#}", e);
                (UiManager::fallback(sounds), Boot::AwaitingInteraction)
            }
        };

        info!("Game engine ready, session '{}'", cfg.game.session_id);
        Self {
            ui,
            audio,
            link,
            state: None,
            boot,
            sliders: cfg.audio.clone(),
            quit: false,
        }
    }

    // ========== 帧 ==========

    pub fn update(&mut self, dt: f32) {
        if let Boot::Loading { remaining } = self.boot {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.boot = Boot::AwaitingInteraction;
                self.ui.show(ScreenId::MainMenu);
            } else {
                self.boot = Boot::Loading { remaining };
            }
        }

        self.ui.update(dt);
        self.audio.update(dt);
    }

    // ========== 输入 ==========

    pub fn click(&mut self, id: &str) {
        self.interacted();
        if let Some(cmd) = self.ui.click(id) {
            self.dispatch(cmd);
        }
    }

    pub fn select_choice(&mut self, index: usize) {
        self.interacted();
        if let Some(cmd) = self.ui.select_choice(index) {
            self.dispatch(cmd);
        }
    }

    pub fn key(&mut self, key: Key) {
        self.interacted();
        let modal_open = self.ui.modals().top().is_some();
        let Some(shortcut) = shortcuts::resolve(key, self.ui.current_screen(), modal_open) else {
            return;
        };

        match shortcut {
            Shortcut::Action(action) => self.dispatch(UiCommand::Game(action)),
            Shortcut::Choice(index) => self.select_choice(index),
            Shortcut::CloseTopModal => {
                self.ui.close_top_modal();
            }
            Shortcut::BackToMenu => self.dispatch(UiCommand::ShowScreen(ScreenId::MainMenu)),
            Shortcut::SaveLoad(mode) => self.dispatch(UiCommand::ShowSaveLoad(mode)),
        }
    }

    /// 加载画面结束后的第一次交互启动背景音乐
    fn interacted(&mut self) {
        if self.boot == Boot::AwaitingInteraction {
            self.boot = Boot::Running;
            self.audio.play_music(self.audio.current_music_track());
        }
    }

    pub fn set_volume_slider(&mut self, slider: VolumeSlider, value: f32) {
        let value = value.clamp(0.0, 1.0);
        match slider {
            VolumeSlider::Master => self.sliders.master_volume = value,
            VolumeSlider::Sfx => self.sliders.sfx_volume = value,
            VolumeSlider::Music => self.sliders.music_volume = value,
        }
    }

    pub fn volume_sliders(&self) -> &AudioConfig {
        &self.sliders
    }

    // ========== 指令 ==========

    pub fn dispatch(&mut self, cmd: UiCommand) {
        debug!("Dispatch {:?}", cmd);
        match cmd {
            UiCommand::ShowScreen(screen) => {
                self.ui.show(screen);
            }
            UiCommand::StartNewGame => self.start_new_game(),
            UiCommand::ContinueGame => self.continue_game(),
            UiCommand::LoadGame => self.ui.show_save_load(SaveLoadMode::Load),
            UiCommand::ShowSettings => {
                self.ui.show(ScreenId::Settings);
            }
            UiCommand::ApplySettings => {
                self.ui.show(ScreenId::MainMenu);
                self.audio.set_master_volume(self.sliders.master_volume);
                self.audio.set_sfx_volume(self.sliders.sfx_volume);
                self.audio.set_music_volume(self.sliders.music_volume);
            }
            UiCommand::ShowCredits => self.ui.show_notification(CREDITS, NoticeKind::Info, Some(5000)),
            UiCommand::ToggleMusic => self.audio.toggle_music(),
            UiCommand::ShowSaveLoad(mode) => self.ui.show_save_load(mode),
            UiCommand::Game(action) => self.game_action(action),
            UiCommand::Notify { message, kind, duration_ms } => {
                self.ui.show_notification(&message, kind, duration_ms);
            }
            UiCommand::Quit => {
                info!("Quit requested");
                self.quit = true;
            }
        }
    }

    fn start_new_game(&mut self) {
        self.ui.show(ScreenId::Game);
        self.ui.set_has_active_game(true);
        self.send(&GameAction::NewGame);
        self.audio.play_music(self.audio.current_music_track());
        self.ui.add_event_message(WELCOME, NoticeKind::Info);
    }

    fn continue_game(&mut self) {
        if self.ui.has_active_game() && self.state.is_some() {
            self.ui.show(ScreenId::Game);
            self.audio.play_music(self.audio.current_music_track());
        } else {
            self.ui.show_notification(NO_ACTIVE_GAME, NoticeKind::Info, None);
        }
    }

    fn game_action(&mut self, action: GameAction) {
        match &action {
            GameAction::Navigate => {
                let in_pod = self.state.as_ref().is_some_and(|s| s.player_stats.in_pod_mode);
                self.send(&action);
                self.audio.play_sound(if in_pod { "alert" } else { "navigate" });
            }
            GameAction::Scan => {
                self.send(&action);
                self.audio.play_sound("scan");
            }
            GameAction::Repair => {
                if self.state.as_ref().is_some_and(|s| s.at_repair_location) {
                    self.send(&action);
                } else {
                    debug!("Repair ignored, not at a repair location");
                }
            }
            GameAction::Inventory => self.show_inventory(),
            GameAction::Quests => self.show_quests(),
            GameAction::Map => self.ui.show_notification("Star map unavailable!", NoticeKind::Error, None),
            GameAction::PodMods => self.show_pod_mods(),
            GameAction::LoadGame(slot) => {
                self.ui.clear_notifications();
                self.send(&action);
                self.ui.set_has_active_game(true);
                self.ui.show(ScreenId::Game);
                self.ui.show_notification(&format!("Loading game from slot {}...", slot), NoticeKind::Info, None);
            }
            _ => self.send(&action),
        }
    }

    fn send(&mut self, action: &GameAction) {
        if let Some((name, params)) = action.wire() {
            self.link.send_action(name, params);
        }
    }

    fn show_inventory(&mut self) {
        let items = self.state.as_ref().map(|s| s.inventory.clone()).unwrap_or_default();
        if items.is_empty() {
            self.ui.show_notification("Your cargo hold is empty", NoticeKind::Info, None);
            return;
        }
        let mut choices = items;
        choices.push("Close".into());
        self.ui.show_choice_modal("Inventory", &choices, |_| None);
    }

    fn show_quests(&mut self) {
        let quests = self.state.as_ref().map(|s| s.active_quests.clone()).unwrap_or_default();
        if quests.is_empty() {
            self.ui.show_notification("No active quests", NoticeKind::Info, None);
            return;
        }
        let mut choices = quests;
        choices.push("Close".into());
        self.ui.show_choice_modal("Active Quests", &choices, |_| None);
    }

    fn show_pod_mods(&mut self) {
        let Some(state) = self.state.as_ref().filter(|s| s.player_stats.has_flight_pod) else {
            self.ui.show_notification("You need a pod to install modifications!", NoticeKind::Danger, None);
            return;
        };
        if state.player_stats.in_pod_mode {
            self.ui.show_notification("Cannot modify pod while in pod mode!", NoticeKind::Danger, None);
            return;
        }

        let installed = &state.player_stats.pod_augmentations;
        let offers: Vec<_> = state
            .available_augmentations
            .iter()
            .filter(|a| !installed.contains(&a.id))
            .cloned()
            .collect();
        if offers.is_empty() {
            self.ui.show_notification("No augmentations available", NoticeKind::Info, None);
            return;
        }

        let labels: Vec<String> = offers.iter().map(|a| format!("{} ({} credits)", a.name, a.cost)).collect();
        let ids: Vec<String> = offers.into_iter().map(|a| a.id).collect();
        self.ui.show_choice_modal("Pod Augmentations", &labels, move |choice| {
            let id = ids.get(choice - 1)?.clone();
            Some(UiCommand::Game(GameAction::BuyAugmentation(id)))
        });
    }

    // ========== 服务端推送 ==========

    pub fn handle_game_event(&mut self, event: GameEvent) {
        self.ui.add_event_message(&event.message, NoticeKind::from_event_type(&event.kind));

        if event.wants_choice_modal() {
            self.ui.show_choice_modal_json(&event.message, &event.choices, |choice| {
                Some(UiCommand::Game(GameAction::Choice(choice)))
            });
        }
    }

    pub fn handle_game_state(&mut self, state: GameState) {
        self.audio.update_music_for_game_state(&state.music_context());
        if let Some(theme) = state.region_theme() {
            self.audio.change_region_music(theme);
        }
        self.ui.refresh_action_panel(&state);

        if state.game_over {
            if state.victory {
                self.ui.show_victory("Victory! You have amassed great wealth!");
            } else {
                self.ui.show_game_over("Your journey has ended.");
            }
        }
        self.state = Some(state);
    }

    // ========== 查询 ==========

    pub fn ui(&self) -> &UiManager {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiManager {
        &mut self.ui
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// 同时借出界面和音频，供可视化器按帧绘制
    pub fn parts_mut(&mut self) -> (&mut UiManager, &AudioManager) {
        (&mut self.ui, &self.audio)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.boot, Boot::Loading { .. })
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
