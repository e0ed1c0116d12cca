use cosmic_ui::{Control, ControlClass, ControlSet};

use crate::command::{GameAction, UiCommand};
use crate::event::GameState;
use crate::notify::NoticeKind;
use crate::sounds::UiSounds;

pub const NEW_GAME_BTN: &str = "new-game-btn";
pub const CONTINUE_BTN: &str = "continue-btn";
pub const LOAD_GAME_BTN: &str = "load-game-btn";
pub const SETTINGS_BTN: &str = "settings-btn";
pub const CREDITS_BTN: &str = "credits-btn";
pub const SETTINGS_BACK_BTN: &str = "settings-back-btn";
pub const MUSIC_TOGGLE: &str = "music-toggle";

pub const NAVIGATE_BTN: &str = "navigate-btn";
pub const SCAN_BTN: &str = "scan-btn";
pub const REPAIR_BTN: &str = "repair-btn";
pub const INVENTORY_BTN: &str = "inventory-btn";
pub const QUESTS_BTN: &str = "quests-btn";
pub const STAR_MAP_BTN: &str = "star-map-btn";
pub const BUY_POD_BTN: &str = "buy-pod-btn";
pub const BUY_SHIP_BTN: &str = "buy-ship-btn";
pub const POD_MODS_BTN: &str = "pod-mods-btn";

const REPAIR_COST: i64 = 100;
const POD_COST: i64 = 500;
const SHIP_COST: i64 = 400;

fn menu_button(id: &str, label: &str, cmd: UiCommand) -> Control<UiCommand> {
    Control::new(id, label, ControlClass::Menu).on_click(move || Some(cmd.clone()))
}

fn action_button(id: &str, label: &str, action: GameAction) -> Control<UiCommand> {
    Control::new(id, label, ControlClass::Action).on_click(move || Some(UiCommand::Game(action.clone())))
}

pub fn main_menu_controls(sounds: &UiSounds) -> ControlSet<UiCommand> {
    let mut set = ControlSet::new();
    set.insert(menu_button(CONTINUE_BTN, "Continue", UiCommand::ContinueGame)).visible = false;
    set.insert(menu_button(NEW_GAME_BTN, "New Game", UiCommand::StartNewGame)).primary = true;
    set.insert(menu_button(LOAD_GAME_BTN, "Load Game", UiCommand::LoadGame));
    set.insert(menu_button(SETTINGS_BTN, "Settings", UiCommand::ShowSettings));
    set.insert(menu_button(CREDITS_BTN, "Credits", UiCommand::ShowCredits));
    sounds.register_all(&mut set);
    set
}

pub fn settings_controls(sounds: &UiSounds) -> ControlSet<UiCommand> {
    let mut set = ControlSet::new();
    set.insert(menu_button(MUSIC_TOGGLE, "Toggle Music", UiCommand::ToggleMusic));
    set.insert(menu_button(SETTINGS_BACK_BTN, "Back", UiCommand::ApplySettings));
    sounds.register_all(&mut set);
    set
}

/// 游戏内操作栏，星图按钮始终在最后
pub fn action_panel(sounds: &UiSounds) -> ControlSet<UiCommand> {
    let mut set = ControlSet::new();
    set.insert(action_button(NAVIGATE_BTN, "Navigate", GameAction::Navigate));
    set.insert(action_button(SCAN_BTN, "Scan", GameAction::Scan));
    set.insert(action_button(REPAIR_BTN, "Repair", GameAction::Repair));
    set.insert(action_button(INVENTORY_BTN, "Inventory", GameAction::Inventory));
    set.insert(action_button(QUESTS_BTN, "Quests", GameAction::Quests));
    set.insert(action_button(STAR_MAP_BTN, "Star Map", GameAction::Map));
    sounds.register_all(&mut set);
    set
}

/// 操作栏里按状态出现 / 消失的按钮
pub struct ActionButtons {
    sounds: UiSounds,
}

impl ActionButtons {
    pub fn new(sounds: UiSounds) -> Self {
        Self { sounds }
    }

    fn ensure(&self, panel: &mut ControlSet<UiCommand>, id: &str, label: &str, action: GameAction) {
        if !panel.contains(id) {
            let btn = action_button(id, label, action);
            self.sounds.register(panel.insert(btn));
        }
        if let Some(btn) = panel.get_mut(id) {
            btn.visible = true;
        }
    }

    fn hide(panel: &mut ControlSet<UiCommand>, id: &str) {
        if let Some(btn) = panel.get_mut(id) {
            btn.visible = false;
        }
    }

    pub fn show_buy_pod_button(&self, panel: &mut ControlSet<UiCommand>) {
        self.ensure(panel, BUY_POD_BTN, "Buy Pod", GameAction::BuyPod);
    }

    pub fn hide_buy_pod_button(&self, panel: &mut ControlSet<UiCommand>) {
        Self::hide(panel, BUY_POD_BTN);
    }

    pub fn show_buy_ship_button(&self, panel: &mut ControlSet<UiCommand>) {
        self.ensure(panel, BUY_SHIP_BTN, "Buy Ship", GameAction::BuyShip);
    }

    pub fn hide_buy_ship_button(&self, panel: &mut ControlSet<UiCommand>) {
        Self::hide(panel, BUY_SHIP_BTN);
    }

    /// 刚买下逃生舱时需要先航行一次才能改装
    pub fn show_pod_mods_button(&self, panel: &mut ControlSet<UiCommand>, just_bought_pod: bool) {
        if !panel.contains(POD_MODS_BTN) {
            let btn = Control::new(POD_MODS_BTN, "Pod Mods", ControlClass::Action);
            // 插在最后一个按钮 (星图) 之前
            let last = panel.iter().last().map(|c| c.id.clone());
            match last {
                Some(last) => panel.insert_before(&last, btn),
                None => panel.insert(btn),
            };
            log::info!("Pod Mods button added to action panel");
        }

        let Some(btn) = panel.get_mut(POD_MODS_BTN) else { return };
        if just_bought_pod {
            btn.disabled = true;
            btn.label = "Pod Mods (Navigate First)".into();
            btn.title = Some("Navigate at least once before installing augmentations".into());
            btn.set_handler(Box::new(|| {
                Some(UiCommand::Notify {
                    message: "You must navigate at least once after buying a pod before installing augmentations!".into(),
                    kind: NoticeKind::Info,
                    duration_ms: Some(4000),
                })
            }));
        } else {
            btn.disabled = false;
            btn.label = "Pod Mods".into();
            btn.title = Some("Install pod augmentations".into());
            btn.set_handler(Box::new(|| Some(UiCommand::Game(GameAction::PodMods))));
        }
        btn.visible = true;
        self.sounds.register(btn);
    }

    pub fn hide_pod_mods_button(&self, panel: &mut ControlSet<UiCommand>) {
        Self::hide(panel, POD_MODS_BTN);
    }

    /// 按最新状态刷新操作栏的可用性
    pub fn refresh(&self, panel: &mut ControlSet<UiCommand>, state: &GameState) {
        let stats = &state.player_stats;

        if let Some(btn) = panel.get_mut(REPAIR_BTN) {
            btn.disabled = !(state.at_repair_location && stats.wealth >= REPAIR_COST && !stats.in_pod_mode);
        }

        if stats.in_pod_mode {
            for id in [REPAIR_BTN, SCAN_BTN, INVENTORY_BTN, QUESTS_BTN] {
                if let Some(btn) = panel.get_mut(id) {
                    btn.disabled = true;
                }
            }
            if state.at_repair_location && stats.wealth >= SHIP_COST {
                self.show_buy_ship_button(panel);
            } else {
                self.hide_buy_ship_button(panel);
            }
        } else {
            for id in [SCAN_BTN, INVENTORY_BTN, QUESTS_BTN] {
                if let Some(btn) = panel.get_mut(id) {
                    btn.disabled = false;
                }
            }
            self.hide_buy_ship_button(panel);
        }

        if state.at_repair_location && !stats.has_flight_pod && stats.wealth >= POD_COST {
            self.show_buy_pod_button(panel);
        } else {
            self.hide_buy_pod_button(panel);
        }

        if stats.has_flight_pod && state.at_repair_location && !stats.in_pod_mode {
            self.show_pod_mods_button(panel, stats.just_bought_pod);
        } else {
            self.hide_pod_mods_button(panel);
        }
    }
}
