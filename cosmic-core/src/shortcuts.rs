use cosmic_ui::input::Key;

use crate::command::{GameAction, SaveLoadMode};
use crate::screen::ScreenId;

#[derive(Debug, Clone, PartialEq)]
pub enum Shortcut {
    Action(GameAction),
    /// 选择最上层弹窗的第 n 项
    Choice(usize),
    CloseTopModal,
    BackToMenu,
    SaveLoad(SaveLoadMode),
}

/// 游戏内数字键对应的操作
const GAME_KEYS: [GameAction; 6] = [
    GameAction::Navigate,
    GameAction::Scan,
    GameAction::Repair,
    GameAction::Inventory,
    GameAction::Quests,
    GameAction::Map,
];

pub fn resolve(key: Key, screen: ScreenId, modal_open: bool) -> Option<Shortcut> {
    match key {
        Key::F(5) => return Some(Shortcut::SaveLoad(SaveLoadMode::Save)),
        Key::F(9) => return Some(Shortcut::SaveLoad(SaveLoadMode::Load)),
        Key::Escape if modal_open => return Some(Shortcut::CloseTopModal),
        Key::Escape if screen == ScreenId::Game => return Some(Shortcut::BackToMenu),
        _ => {}
    }

    let digit = key.digit()?;
    if modal_open {
        return Some(Shortcut::Choice(digit));
    }
    if screen != ScreenId::Game {
        return None;
    }
    GAME_KEYS.get(digit - 1).cloned().map(Shortcut::Action)
}
