use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub master_volume: f32,
    pub sfx_volume:    f32,
    pub music_volume:  f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// 切换曲目时的交叉淡化时长 (秒)
    pub crossfade_secs:    f32,
    /// 单个声部淡入 / 停止时淡出的时长 (秒)
    pub layer_fade_secs:   f32,
    /// 和弦进行的切换间隔 (秒)
    pub chord_change_secs: f32,
    /// 引擎初始音量
    pub initial_volume:    f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: 0.7,
            sfx_volume: 0.8,
            music_volume: 0.6,
        }
    }
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            crossfade_secs: 3.0,
            layer_fade_secs: 2.0,
            chord_change_secs: 8.0,
            initial_volume: 0.5,
        }
    }
}
