use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::theory::Mood;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackId {
    Exploration,
    Station,
    Danger,
    Combat,
    Pod,
}

impl TrackId {
    pub const ALL: [TrackId; 5] = [
        TrackId::Exploration,
        TrackId::Station,
        TrackId::Danger,
        TrackId::Combat,
        TrackId::Pod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackId::Exploration => "exploration",
            TrackId::Station => "station",
            TrackId::Danger => "danger",
            TrackId::Combat => "combat",
            TrackId::Pod => "pod",
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown track '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    // 基础
    Drone,
    Sub,
    Pad,
    Harmonic,
    // 律动
    Arpeggio,
    BassLine,
    Pulse,
    Rhythm,
    Percussion,
    Heartbeat,
    AnxietyPulse,
    // 旋律
    Chime,
    PowerChord,
    BrassStab,
    Lead,
    // 紧张感
    Dissonance,
    Cluster,
    Warning,
    Alarm,
    Siren,
    SystemBeep,
    RadarSweep,
    TensionRiser,
    // 氛围 / 噪声
    Shimmer,
    Whisper,
    Breath,
    Breathing,
    Mechanical,
    Hydraulic,
    CommChatter,
    AirFlow,
    Static,
    RadioStatic,
    MetalStress,
    ExplosionRumble,
}

impl LayerKind {
    /// 随和弦进行移调的声部
    pub fn follows_chords(&self) -> bool {
        matches!(
            self,
            LayerKind::Pad
                | LayerKind::Harmonic
                | LayerKind::Arpeggio
                | LayerKind::BassLine
                | LayerKind::PowerChord
                | LayerKind::BrassStab
                | LayerKind::Lead
        )
    }

    /// 没有明确音高，以噪声为主
    pub fn is_noise(&self) -> bool {
        matches!(
            self,
            LayerKind::Breath
                | LayerKind::Breathing
                | LayerKind::Hydraulic
                | LayerKind::CommChatter
                | LayerKind::AirFlow
                | LayerKind::Static
                | LayerKind::RadioStatic
                | LayerKind::MetalStress
                | LayerKind::ExplosionRumble
                | LayerKind::RadarSweep
                | LayerKind::TensionRiser
                | LayerKind::Percussion
        )
    }

    /// 周期性门控的声部，返回每秒脉冲数
    pub fn pulse_rate(&self) -> Option<f32> {
        match self {
            LayerKind::Pulse | LayerKind::AnxietyPulse => Some(2.0),
            LayerKind::Heartbeat => Some(1.0),
            LayerKind::Rhythm | LayerKind::Percussion => Some(4.0),
            LayerKind::Warning | LayerKind::Alarm | LayerKind::SystemBeep => Some(1.0),
            LayerKind::Breathing | LayerKind::Breath => Some(0.5),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub kind: LayerKind,
    /// 组成该声部的基频 (Hz)，噪声声部为空
    pub frequencies: Vec<f32>,
    /// 音分
    pub detune: f32,
    /// 目标增益
    pub gain: f32,
}

impl LayerSpec {
    pub fn tone(kind: LayerKind, frequencies: &[f32], gain: f32) -> Self {
        Self { kind, frequencies: frequencies.to_vec(), detune: 0.0, gain }
    }

    pub fn noise(kind: LayerKind, gain: f32) -> Self {
        Self { kind, frequencies: Vec::new(), detune: 0.0, gain }
    }

    pub fn detuned(mut self, cents: f32) -> Self {
        self.detune = cents;
        self
    }

    /// 以基频 + 泛音倍数描述的声部
    pub fn harmonics(kind: LayerKind, base: f32, multiples: &[f32], gain: f32) -> Self {
        let freqs: Vec<f32> = multiples.iter().map(|m| base * m).collect();
        Self::tone(kind, &freqs, gain)
    }

    /// 围绕中心频率的音簇
    pub fn cluster(base: f32, spread: f32, gain: f32) -> Self {
        Self::tone(LayerKind::Cluster, &[base - spread, base, base + spread], gain)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackSpec {
    pub id: TrackId,
    pub name: String,
    pub mood: Mood,
    pub layers: Vec<LayerSpec>,
}

pub fn track_definitions() -> Vec<TrackSpec> {
    use LayerKind::*;

    vec![
        TrackSpec {
            id: TrackId::Exploration,
            name: "Deep Space Exploration".into(),
            mood: Mood::Peaceful,
            layers: vec![
                LayerSpec::tone(Drone, &[55.0], 0.12),
                LayerSpec::tone(Drone, &[82.5], 0.08).detuned(-5.0),
                LayerSpec::tone(Sub, &[27.5], 0.15),
                LayerSpec::tone(Pad, &[220.0, 330.0, 440.0, 550.0], 0.04),
                LayerSpec::tone(Pad, &[165.0, 247.5, 330.0], 0.03),
                LayerSpec::harmonics(Harmonic, 110.0, &[1.0, 2.0, 3.0, 5.0, 7.0], 0.02),
                LayerSpec::tone(Arpeggio, &[440.0], 0.02),
                LayerSpec::tone(BassLine, &[55.0], 0.08),
                LayerSpec::tone(Shimmer, &[880.0], 0.025),
                LayerSpec::tone(Whisper, &[1100.0, 1650.0, 2200.0], 0.015),
                LayerSpec::noise(Breath, 0.02),
            ],
        },
        TrackSpec {
            id: TrackId::Station,
            name: "Station Ambience".into(),
            mood: Mood::Peaceful,
            layers: vec![
                LayerSpec::tone(Drone, &[110.0], 0.08),
                LayerSpec::tone(Sub, &[55.0], 0.1),
                LayerSpec::tone(Pad, &[261.63, 329.63, 392.0, 523.25], 0.06),
                LayerSpec::harmonics(Harmonic, 220.0, &[1.0, 2.0, 3.0, 4.0], 0.03),
                LayerSpec::tone(Mechanical, &[60.0], 0.04),
                LayerSpec::tone(Mechanical, &[90.0], 0.02),
                LayerSpec::noise(Hydraulic, 0.03),
                LayerSpec::tone(Chime, &[523.25, 659.25, 783.99, 1046.5], 0.02),
                LayerSpec::tone(Arpeggio, &[261.63], 0.015),
                LayerSpec::noise(CommChatter, 0.01),
                LayerSpec::noise(AirFlow, 0.02),
            ],
        },
        TrackSpec {
            id: TrackId::Danger,
            name: "Imminent Threat".into(),
            mood: Mood::Tense,
            layers: vec![
                LayerSpec::tone(Drone, &[55.0], 0.15).detuned(-10.0),
                LayerSpec::tone(Drone, &[41.25], 0.1).detuned(5.0),
                LayerSpec::tone(Sub, &[27.5], 0.2),
                LayerSpec::tone(Pulse, &[110.0], 0.08),
                LayerSpec::tone(Pulse, &[82.5], 0.05),
                LayerSpec::tone(BassLine, &[55.0], 0.1),
                LayerSpec::tone(Dissonance, &[220.0, 233.08, 246.94], 0.04),
                LayerSpec::tone(Dissonance, &[110.0, 116.54, 123.47], 0.03),
                LayerSpec::cluster(440.0, 50.0, 0.02),
                LayerSpec::tone(Warning, &[440.0], 0.025),
                LayerSpec::noise(RadarSweep, 0.02),
                LayerSpec::noise(TensionRiser, 0.03),
            ],
        },
        TrackSpec {
            id: TrackId::Combat,
            name: "Battle Stations".into(),
            mood: Mood::Epic,
            layers: vec![
                LayerSpec::tone(Drone, &[55.0], 0.2),
                LayerSpec::tone(Drone, &[82.5], 0.15),
                LayerSpec::tone(Sub, &[27.5], 0.25),
                LayerSpec::tone(Sub, &[41.25], 0.15),
                LayerSpec::tone(Pulse, &[110.0], 0.12),
                LayerSpec::tone(Rhythm, &[220.0], 0.08),
                LayerSpec::noise(Percussion, 0.1),
                LayerSpec::tone(BassLine, &[55.0], 0.15),
                LayerSpec::tone(PowerChord, &[110.0, 165.0, 220.0], 0.08),
                LayerSpec::tone(BrassStab, &[220.0, 330.0, 440.0], 0.05),
                LayerSpec::tone(Lead, &[440.0, 550.0, 660.0], 0.04),
                LayerSpec::tone(Arpeggio, &[880.0], 0.03),
                LayerSpec::noise(ExplosionRumble, 0.02),
                LayerSpec::tone(Siren, &[1000.0], 0.015),
            ],
        },
        TrackSpec {
            id: TrackId::Pod,
            name: "Emergency Pod".into(),
            mood: Mood::Tense,
            layers: vec![
                LayerSpec::tone(Drone, &[110.0], 0.08).detuned(-20.0),
                LayerSpec::tone(Drone, &[73.5], 0.06).detuned(10.0),
                LayerSpec::tone(Heartbeat, &[60.0], 0.12),
                LayerSpec::noise(Breathing, 0.05),
                LayerSpec::tone(Alarm, &[880.0], 0.02),
                LayerSpec::tone(Alarm, &[660.0], 0.015),
                LayerSpec::tone(SystemBeep, &[440.0, 880.0, 1320.0], 0.02),
                LayerSpec::noise(Static, 0.025),
                LayerSpec::noise(RadioStatic, 0.02),
                LayerSpec::noise(MetalStress, 0.03),
                LayerSpec::tone(BassLine, &[55.0], 0.05),
                LayerSpec::tone(AnxietyPulse, &[55.0], 0.04),
            ],
        },
    ]
}
