use anyhow::{bail, Result};
use log::warn;
use serde_json::Value;
use cosmic_audio::AudioManager;
use cosmic_ui::{ControlSet, Rect, UiRenderer};

use crate::command::{SaveLoadMode, UiCommand};
use crate::config::UiConfig;
use crate::controls::{self, ActionButtons};
use crate::event::GameState;
use crate::modal::ModalManager;
use crate::notify::{NoticeKind, NotificationManager};
use crate::screen::{ScreenId, ScreenManager, ShowOutcome};
use crate::sounds::UiSounds;
use crate::visualizer::{AudioVisualizer, FrameOutcome};

/// 界面总管：屏幕、弹窗、通知和各面板的控件
pub struct UiManager {
    screens: ScreenManager,
    modals: ModalManager,
    notices: NotificationManager,
    buttons: ActionButtons,
    menu: ControlSet<UiCommand>,
    settings: ControlSet<UiCommand>,
    panel: ControlSet<UiCommand>,
    visualizer: AudioVisualizer,
    has_active_game: bool,
}

impl UiManager {
    pub fn new(cfg: &UiConfig, sounds: UiSounds) -> Result<Self> {
        if cfg.modal_z_step == 0 {
            bail!("ui.modal_z_step must be greater than 0");
        }
        if cfg.save_slots == 0 {
            bail!("ui.save_slots must be greater than 0");
        }
        if cfg.event_log_size == 0 {
            bail!("ui.event_log_size must be greater than 0");
        }
        Ok(Self::build(cfg, sounds))
    }

    /// 启动失败时的兜底：默认配置，直接进入主菜单
    pub fn fallback(sounds: UiSounds) -> Self {
        let mut ui = Self::build(&UiConfig::default(), sounds);
        ui.screens.force(ScreenId::MainMenu);
        ui.screens.update_continue_button_visibility(&mut ui.menu, false);
        ui
    }

    fn build(cfg: &UiConfig, sounds: UiSounds) -> Self {
        Self {
            screens: ScreenManager::new(cfg),
            modals: ModalManager::new(cfg).with_sounds(sounds.clone()),
            notices: NotificationManager::new(cfg),
            menu: controls::main_menu_controls(&sounds),
            settings: controls::settings_controls(&sounds),
            panel: controls::action_panel(&sounds),
            buttons: ActionButtons::new(sounds),
            visualizer: AudioVisualizer::new(),
            has_active_game: false,
        }
    }

    // ========== 屏幕 ==========

    pub fn show_screen(&mut self, name: &str) -> ShowOutcome {
        self.screens.show_screen_named(name, &mut self.modals)
    }

    pub fn show(&mut self, screen: ScreenId) -> ShowOutcome {
        self.screens.show(screen, &mut self.modals)
    }

    pub fn current_screen(&self) -> ScreenId {
        self.screens.get_current_screen()
    }

    pub fn screens(&self) -> &ScreenManager {
        &self.screens
    }

    // ========== 弹窗 ==========

    pub fn show_choice_modal<S: AsRef<str>>(
        &mut self,
        title: &str,
        choices: &[S],
        on_select: impl FnMut(usize) -> Option<UiCommand> + 'static,
    ) -> bool {
        self.modals.show_choice_modal(title, choices, on_select)
    }

    /// 服务端原样传来的选项，回调收到服务端的序号
    pub fn show_choice_modal_json(
        &mut self,
        title: &str,
        choices: &[Value],
        on_select: impl FnMut(usize) -> Option<UiCommand> + 'static,
    ) -> bool {
        self.modals.show_choice_modal_json(title, choices, on_select)
    }

    pub fn show_save_load(&mut self, mode: SaveLoadMode) {
        self.modals.show_save_load(mode);
    }

    pub fn select_choice(&mut self, index: usize) -> Option<UiCommand> {
        self.modals.select_choice(index)
    }

    pub fn close_top_modal(&mut self) -> Option<&'static str> {
        self.modals.close_top_modal()
    }

    pub fn close_all_modals(&mut self) {
        self.modals.close_all_modals();
    }

    pub fn modals(&self) -> &ModalManager {
        &self.modals
    }

    // ========== 通知 ==========

    pub fn show_notification(&mut self, message: &str, kind: NoticeKind, duration_ms: Option<u32>) {
        self.notices.show_notification(message, kind, duration_ms);
    }

    pub fn add_event_message(&mut self, message: &str, kind: NoticeKind) {
        self.notices.add_event_message(message, kind);
    }

    pub fn clear_notifications(&mut self) {
        self.notices.clear_notifications();
    }

    pub fn notices(&self) -> &NotificationManager {
        &self.notices
    }

    // ========== 游戏流程 ==========

    pub fn has_active_game(&self) -> bool {
        self.has_active_game
    }

    pub fn set_has_active_game(&mut self, active: bool) {
        self.has_active_game = active;
        self.screens.update_continue_button_visibility(&mut self.menu, active);
    }

    pub fn show_game_over(&mut self, message: &str) {
        self.add_event_message(message, NoticeKind::Danger);
        self.end_game("Game Over");
    }

    pub fn show_victory(&mut self, message: &str) {
        self.add_event_message(message, NoticeKind::Success);
        self.end_game("Victory!");
    }

    fn end_game(&mut self, title: &str) {
        self.set_has_active_game(false);
        self.modals.show_choice_modal(title, &["Start New Game", "Return to Main Menu"], |choice| {
            Some(match choice {
                1 => UiCommand::StartNewGame,
                _ => UiCommand::ShowScreen(ScreenId::MainMenu),
            })
        });
    }

    pub fn refresh_action_panel(&mut self, state: &GameState) {
        self.buttons.refresh(&mut self.panel, state);
    }

    // ========== 控件 ==========

    /// 只响应当前屏幕上的控件。禁用控件带提示文字时以通知显示提示
    pub fn click(&mut self, id: &str) -> Option<UiCommand> {
        let screen = self.current_screen();
        let set = match screen {
            ScreenId::MainMenu => &mut self.menu,
            ScreenId::Settings => &mut self.settings,
            ScreenId::Game => &mut self.panel,
            ScreenId::Loading => return None,
        };

        let Some(control) = set.get_mut(id) else {
            warn!("Control '{}' is not on screen '{}'", id, screen);
            return None;
        };

        if control.disabled && control.visible {
            if let Some(title) = control.title.clone() {
                self.notices.show_notification(&title, NoticeKind::Info, None);
            }
            return None;
        }
        control.click()
    }

    pub fn menu_controls(&self) -> &ControlSet<UiCommand> {
        &self.menu
    }

    pub fn settings_controls(&self) -> &ControlSet<UiCommand> {
        &self.settings
    }

    pub fn action_panel(&self) -> &ControlSet<UiCommand> {
        &self.panel
    }

    pub fn action_panel_mut(&mut self) -> &mut ControlSet<UiCommand> {
        &mut self.panel
    }

    pub fn action_buttons(&self) -> &ActionButtons {
        &self.buttons
    }

    // ========== 帧 ==========

    /// 推进通知计时与屏幕切换，返回本帧激活的屏幕
    pub fn update(&mut self, dt: f32) -> Option<ScreenId> {
        self.notices.update(dt);
        self.screens.update(dt, &mut self.modals, &mut self.menu, self.has_active_game)
    }

    pub fn render_visualizer(
        &mut self,
        canvas: Option<&mut dyn UiRenderer>,
        area: Rect,
        audio: Option<&AudioManager>,
    ) -> FrameOutcome {
        self.visualizer.render_frame(canvas, area, audio)
    }

    pub fn visualizer(&self) -> &AudioVisualizer {
        &self.visualizer
    }
}
