use serde::Deserialize;
use serde_json::Value;
use cosmic_audio::MusicContext;

/// 服务端推送的游戏事件
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub choices: Vec<Value>,
}

impl GameEvent {
    pub fn is_combat(&self) -> bool {
        matches!(self.kind.as_str(), "combat_start" | "combat" | "combat_end")
    }

    /// 战斗有自己的界面，不弹选择框
    pub fn wants_choice_modal(&self) -> bool {
        !self.choices.is_empty() && self.kind != "combat_start" && self.kind != "combat"
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub health: f32,
    pub wealth: i64,
    pub in_pod_mode: bool,
    pub has_flight_pod: bool,
    pub just_bought_pod: bool,
    pub pod_augmentations: Vec<String>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: 100.0,
            wealth: 0,
            in_pod_mode: false,
            has_flight_pod: false,
            just_bought_pod: false,
            pod_augmentations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Augmentation {
    pub id: String,
    pub name: String,
    pub cost: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Region {
    pub name: String,
    pub music_theme: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub region: Option<Region>,
}

/// 服务端推送的完整状态，界面只读取其中一部分
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub player_stats: PlayerStats,
    pub at_repair_location: bool,
    pub in_combat: bool,
    pub game_over: bool,
    pub victory: bool,
    pub inventory: Vec<String>,
    pub active_quests: Vec<String>,
    pub available_augmentations: Vec<Augmentation>,
    pub current_location: Option<Location>,
}

impl GameState {
    pub fn music_context(&self) -> MusicContext {
        MusicContext {
            health: self.player_stats.health,
            in_pod_mode: self.player_stats.in_pod_mode,
            at_repair_location: self.at_repair_location,
            in_combat: self.in_combat,
        }
    }

    pub fn region_theme(&self) -> Option<&str> {
        self.current_location
            .as_ref()?
            .region
            .as_ref()?
            .music_theme
            .as_deref()
    }
}

/// 与服务端通信的外部协作者；界面只往里发动作
pub trait GameLink {
    fn send_action(&mut self, action: &str, params: Value);
}

/// 没有服务端时使用，只记录日志
#[derive(Debug, Default)]
pub struct LoggingLink {
    pub sent: Vec<(String, Value)>,
}

impl GameLink for LoggingLink {
    fn send_action(&mut self, action: &str, params: Value) {
        log::info!("-> {} {}", action, params);
        self.sent.push((action.to_string(), params));
    }
}
