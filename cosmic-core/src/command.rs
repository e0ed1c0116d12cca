use serde_json::{json, Value};
use crate::notify::NoticeKind;
use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveLoadMode {
    Save,
    Load,
}

impl SaveLoadMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveLoadMode::Save => "save",
            SaveLoadMode::Load => "load",
        }
    }
}

/// 玩家在游戏内的操作
#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    Navigate,
    Scan,
    Repair,
    Inventory,
    Quests,
    Map,
    BuyPod,
    BuyShip,
    PodMods,
    BuyAugmentation(String),
    /// 事件选项，从 1 开始
    Choice(usize),
    SaveGame(usize),
    LoadGame(usize),
    NewGame,
}

impl GameAction {
    /// 需要发往服务端的动作及参数；纯界面动作返回 None
    pub fn wire(&self) -> Option<(&'static str, Value)> {
        let msg = match self {
            GameAction::Navigate => ("navigate", json!({})),
            GameAction::Scan => ("event", json!({})),
            GameAction::Repair => ("repair", json!({})),
            GameAction::BuyPod => ("buy_pod", json!({})),
            GameAction::BuyShip => ("buy_ship", json!({})),
            GameAction::BuyAugmentation(id) => ("buy_augmentation", json!({ "augmentation_id": id })),
            GameAction::Choice(choice) => ("choice", json!({ "choice": choice })),
            GameAction::SaveGame(slot) => ("save_game", json!({ "slot": slot })),
            GameAction::LoadGame(slot) => ("load_game", json!({ "slot": slot })),
            GameAction::NewGame => ("new_game", json!({})),
            GameAction::Inventory | GameAction::Quests | GameAction::Map | GameAction::PodMods => {
                return None;
            }
        };
        Some(msg)
    }
}

/// 控件点击、弹窗选择、快捷键产生的指令，由 GameEngine 统一分发
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    ShowScreen(ScreenId),
    StartNewGame,
    ContinueGame,
    LoadGame,
    ShowSettings,
    /// 离开设置页并应用音量
    ApplySettings,
    ShowCredits,
    ToggleMusic,
    ShowSaveLoad(SaveLoadMode),
    Game(GameAction),
    Notify { message: String, kind: NoticeKind, duration_ms: Option<u32> },
    Quit,
}
