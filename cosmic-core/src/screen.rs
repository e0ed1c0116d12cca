use std::fmt;
use log::{debug, error, info, warn};
use cosmic_ui::ControlSet;

use crate::command::UiCommand;
use crate::config::UiConfig;
use crate::controls::{CONTINUE_BTN, NEW_GAME_BTN};
use crate::modal::ModalManager;

const TIME_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Loading,
    MainMenu,
    Game,
    Settings,
}

impl ScreenId {
    pub const ALL: [ScreenId; 4] = [ScreenId::Loading, ScreenId::MainMenu, ScreenId::Game, ScreenId::Settings];

    pub fn name(&self) -> &'static str {
        match self {
            ScreenId::Loading => "loading",
            ScreenId::MainMenu => "mainMenu",
            ScreenId::Game => "game",
            ScreenId::Settings => "settings",
        }
    }

    pub fn element_id(&self) -> &'static str {
        match self {
            ScreenId::Loading => "loading-screen",
            ScreenId::MainMenu => "main-menu",
            ScreenId::Game => "game-screen",
            ScreenId::Settings => "settings-screen",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 切换状态机: Idle -> ClosingModals -> Activating -> Idle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    Idle,
    ClosingModals { target: ScreenId },
    Activating { target: ScreenId, remaining: f32 },
}

impl TransitionPhase {
    pub fn target(&self) -> Option<ScreenId> {
        match *self {
            TransitionPhase::Idle => None,
            TransitionPhase::ClosingModals { target } | TransitionPhase::Activating { target, .. } => Some(target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// 立即开始切换
    Started,
    /// 正在切换中，排队等待 (只保留最新一个)
    Queued,
    /// 与正在进行或已排队的目标相同
    Ignored,
    /// 未知屏幕名
    Rejected,
}

pub struct ScreenManager {
    current: ScreenId,
    phase: TransitionPhase,
    queued: Option<ScreenId>,
    delay: f32,
}

impl ScreenManager {
    pub fn new(cfg: &UiConfig) -> Self {
        Self {
            current: ScreenId::Loading,
            phase: TransitionPhase::Idle,
            queued: None,
            delay: cfg.screen_transition_secs(),
        }
    }

    pub fn show_screen_named(&mut self, name: &str, modals: &mut ModalManager) -> ShowOutcome {
        match ScreenId::from_name(name) {
            Some(id) => self.show(id, modals),
            None => {
                error!("Screen {} not found", name);
                ShowOutcome::Rejected
            }
        }
    }

    pub fn show(&mut self, target: ScreenId, modals: &mut ModalManager) -> ShowOutcome {
        if let Some(in_flight) = self.phase.target() {
            if in_flight == target {
                // 最新请求为准：之前排队的目标作废
                self.queued = None;
                debug!("Screen '{}' already in flight, ignored", target);
                return ShowOutcome::Ignored;
            }
            if self.queued == Some(target) {
                return ShowOutcome::Ignored;
            }
            debug!("Screen '{}' queued behind '{}'", target, in_flight);
            self.queued = Some(target);
            return ShowOutcome::Queued;
        }
        self.begin(target, modals);
        ShowOutcome::Started
    }

    fn begin(&mut self, target: ScreenId, modals: &mut ModalManager) {
        modals.close_all_modals();
        self.phase = TransitionPhase::ClosingModals { target };
    }

    /// 推进切换；本帧完成激活时返回新屏幕
    pub fn update(
        &mut self,
        dt: f32,
        modals: &mut ModalManager,
        controls: &mut ControlSet<UiCommand>,
        has_active_game: bool,
    ) -> Option<ScreenId> {
        if let TransitionPhase::ClosingModals { target } = self.phase {
            modals.close_all_modals();
            self.phase = TransitionPhase::Activating { target, remaining: self.delay };
        }

        let TransitionPhase::Activating { target, remaining } = self.phase else {
            return None;
        };

        let remaining = remaining - dt;
        if remaining > TIME_EPSILON {
            self.phase = TransitionPhase::Activating { target, remaining };
            return None;
        }

        // 延迟期间打开的弹窗也不会留到新屏幕
        modals.close_all_modals();
        self.current = target;
        self.phase = TransitionPhase::Idle;
        info!("Screen -> {}", target.element_id());

        if target == ScreenId::MainMenu {
            self.update_continue_button_visibility(controls, has_active_game);
        }

        if let Some(next) = self.queued.take() {
            self.begin(next, modals);
        }
        Some(target)
    }

    pub fn update_continue_button_visibility(&self, controls: &mut ControlSet<UiCommand>, has_active_game: bool) {
        if !controls.contains(CONTINUE_BTN) || !controls.contains(NEW_GAME_BTN) {
            warn!("Main menu buttons missing, continue state not updated");
            return;
        }
        if let Some(btn) = controls.get_mut(CONTINUE_BTN) {
            btn.visible = has_active_game;
        }
        if let Some(btn) = controls.get_mut(NEW_GAME_BTN) {
            btn.primary = !has_active_game;
        }
    }

    /// 跳过状态机直接激活 (启动失败时的兜底路径)
    pub fn force(&mut self, target: ScreenId) {
        self.phase = TransitionPhase::Idle;
        self.queued = None;
        self.current = target;
    }

    pub fn get_current_screen(&self) -> ScreenId {
        self.current
    }

    pub fn is_screen_active(&self, name: &str) -> bool {
        self.current.name() == name
    }

    pub fn active_element_id(&self) -> &'static str {
        self.current.element_id()
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn queued(&self) -> Option<ScreenId> {
        self.queued
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }
}
