use serde::{Deserialize, Serialize};
use cosmic_audio::{AudioConfig, MusicConfig};
use cosmic_shared::config::{self, Table};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub log_path:  String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width:  u32,
    pub height: u32,
    pub fps:    u32,
}

/// 与游戏服务端的会话
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub session_id: String,
    pub api_url:    String,
    pub socket_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualsConfig {
    pub star_count:     usize,
    pub nebula_count:   usize,
    pub particle_count: usize,
    pub trail_length:   usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub size:           f32,
    pub speed:          f32,
    pub rotation_speed: f32,
    pub thrust_power:   f32,
    pub max_velocity:   f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipColors {
    pub healthy:  String,
    pub damaged:  String,
    pub critical: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceColors {
    pub deep:   String,
    pub medium: String,
    pub light:  String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub primary:   String,
    pub secondary: String,
    pub accent:    String,
    pub danger:    String,
    pub success:   String,
    pub ship:      ShipColors,
    pub space:     SpaceColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipSprites {
    pub default:  String,
    pub damaged:  String,
    pub with_pod: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpritesConfig {
    pub ship:      ShipSprites,
    pub planets:   Vec<String>,
    pub stations:  Vec<String>,
    pub asteroids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleAnimation {
    pub duration:  u32,
    pub amplitude: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleAnimation {
    pub particle_count: usize,
    pub particle_speed: f32,
    pub particle_life:  u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanAnimation {
    pub radius:   f32,
    pub duration: u32,
    pub color:    String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationsConfig {
    pub ship_idle:   IdleAnimation,
    pub ship_thrust: ParticleAnimation,
    pub explosion:   ParticleAnimation,
    pub scan:        ScanAnimation,
}

/// 界面时序与层级
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// 关闭弹窗后到切换屏幕的延迟 (毫秒)
    pub screen_transition_ms: u32,
    pub modal_z_base:         u32,
    pub modal_z_step:         u32,
    /// 启动时加载画面停留的时长 (毫秒)
    pub loading_delay_ms:     u32,
    pub toast_ms:             u32,
    pub event_log_size:       usize,
    pub save_slots:           usize,
}

impl UiConfig {
    pub fn screen_transition_secs(&self) -> f32 {
        self.screen_transition_ms as f32 / 1000.0
    }

    pub fn loading_delay_secs(&self) -> f32 {
        self.loading_delay_ms as f32 / 1000.0
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_path:  "logs/".into(),
            log_level: "info".into(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 1280, height: 720, fps: 60 }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: "default".into(),
            api_url:    "http://localhost:5000/api".into(),
            socket_url: "http://localhost:5000".into(),
        }
    }
}

impl Default for VisualsConfig {
    fn default() -> Self {
        Self { star_count: 200, nebula_count: 3, particle_count: 50, trail_length: 10 }
    }
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            size: 40.0,
            speed: 2.0,
            rotation_speed: 0.05,
            thrust_power: 0.1,
            max_velocity: 5.0,
        }
    }
}

impl Default for ShipColors {
    fn default() -> Self {
        Self {
            healthy:  "#33ff33".into(),
            damaged:  "#ffaa33".into(),
            critical: "#ff3333".into(),
        }
    }
}

impl Default for SpaceColors {
    fn default() -> Self {
        Self {
            deep:   "#0a0a0f".into(),
            medium: "#1a1a2e".into(),
            light:  "#16213e".into(),
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            primary:   "#00ffff".into(),
            secondary: "#ff00ff".into(),
            accent:    "#ffff00".into(),
            danger:    "#ff3333".into(),
            success:   "#33ff33".into(),
            ship:      ShipColors::default(),
            space:     SpaceColors::default(),
        }
    }
}

impl Default for ShipSprites {
    fn default() -> Self {
        Self {
            default:  "static/images/ship.png".into(),
            damaged:  "static/images/ship-damaged.png".into(),
            with_pod: "static/images/ship-pod.png".into(),
        }
    }
}

impl Default for SpritesConfig {
    fn default() -> Self {
        Self {
            ship: ShipSprites::default(),
            planets: (1..=3).map(|i| format!("static/images/planet-{i}.png")).collect(),
            stations: (1..=2).map(|i| format!("static/images/station-{i}.png")).collect(),
            asteroids: (1..=2).map(|i| format!("static/images/asteroid-{i}.png")).collect(),
        }
    }
}

impl Default for IdleAnimation {
    fn default() -> Self {
        Self { duration: 2000, amplitude: 5.0 }
    }
}

impl Default for ParticleAnimation {
    fn default() -> Self {
        Self { particle_count: 10, particle_speed: 3.0, particle_life: 30 }
    }
}

impl Default for ScanAnimation {
    fn default() -> Self {
        Self { radius: 200.0, duration: 1000, color: "rgba(0, 255, 255, 0.3)".into() }
    }
}

impl Default for AnimationsConfig {
    fn default() -> Self {
        Self {
            ship_idle: IdleAnimation::default(),
            ship_thrust: ParticleAnimation::default(),
            explosion: ParticleAnimation { particle_count: 30, particle_speed: 5.0, particle_life: 60 },
            scan: ScanAnimation::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            screen_transition_ms: 50,
            modal_z_base: 1000,
            modal_z_step: 10,
            loading_delay_ms: 2000,
            toast_ms: 3000,
            event_log_size: 5,
            save_slots: 5,
        }
    }
}

/// config.toml 的全部分节
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmicConfig {
    pub system:     SystemConfig,
    pub canvas:     CanvasConfig,
    pub game:       SessionConfig,
    pub visuals:    VisualsConfig,
    pub ship:       ShipConfig,
    pub colors:     ColorsConfig,
    pub audio:      AudioConfig,
    pub sprites:    SpritesConfig,
    pub animations: AnimationsConfig,
    pub ui:         UiConfig,
    pub music:      MusicConfig,
}

impl CosmicConfig {
    /// 逐节读取，某一节出错只影响该节
    pub fn from_table(table: &Table) -> Self {
        Self {
            system:     config::section(table, "system"),
            canvas:     config::section(table, "canvas"),
            game:       config::section(table, "game"),
            visuals:    config::section(table, "visuals"),
            ship:       config::section(table, "ship"),
            colors:     config::section(table, "colors"),
            audio:      config::section(table, "audio"),
            sprites:    config::section(table, "sprites"),
            animations: config::section(table, "animations"),
            ui:         config::section(table, "ui"),
            music:      config::section(table, "music"),
        }
    }

    /// 从全局配置读取
    pub fn load() -> Self {
        Self {
            system:     config::get("system"),
            canvas:     config::get("canvas"),
            game:       config::get("game"),
            visuals:    config::get("visuals"),
            ship:       config::get("ship"),
            colors:     config::get("colors"),
            audio:      config::get("audio"),
            sprites:    config::get("sprites"),
            animations: config::get("animations"),
            ui:         config::get("ui"),
            music:      config::get("music"),
        }
    }
}
