use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Peaceful,
    Mysterious,
    Tense,
    Epic,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Peaceful => "peaceful",
            Mood::Mysterious => "mysterious",
            Mood::Tense => "tense",
            Mood::Epic => "epic",
        }
    }
}

type Chord = [i32; 5];

// 以半音表示，相对于主音
const PEACEFUL: [Chord; 8] = [
    [0, 4, 7, 11, 14],      // Cmaj9
    [5, 9, 12, 16, 19],     // Fmaj9
    [7, 11, 14, 17, 21],    // Gmaj9
    [2, 5, 9, 12, 17],      // Dm11
    [9, 12, 16, 19, 23],    // Am9
    [4, 7, 11, 14, 19],     // Em11
    [5, 9, 12, 16, 20],     // Fmaj7#11
    [0, 4, 7, 11, 14],
];

const MYSTERIOUS: [Chord; 8] = [
    [0, 3, 7, 10, 14],
    [5, 8, 12, 15, 20],
    [7, 10, 14, 17, 22],
    [3, 7, 10, 14, 18],
    [8, 11, 15, 18, 22],
    [1, 5, 8, 11, 15],
    [10, 13, 17, 20, 24],
    [0, 3, 7, 10, 15],
];

const TENSE: [Chord; 8] = [
    [0, 3, 6, 9, 12],
    [2, 5, 8, 11, 13],
    [7, 10, 13, 16, 19],
    [1, 4, 7, 10, 13],
    [8, 11, 14, 17, 20],
    [3, 6, 9, 12, 15],
    [5, 8, 11, 14, 17],
    [0, 3, 6, 9, 11],
];

const EPIC: [Chord; 8] = [
    [0, 7, 12, 16, 19],
    [-2, 5, 10, 14, 17],
    [5, 12, 17, 21, 24],
    [3, 10, 15, 19, 22],
    [7, 14, 19, 23, 26],
    [2, 9, 14, 18, 21],
    [-5, 2, 7, 11, 14],
    [0, 7, 12, 16, 19],
];

pub fn progression(mood: Mood) -> &'static [Chord] {
    match mood {
        Mood::Peaceful => &PEACEFUL,
        Mood::Mysterious => &MYSTERIOUS,
        Mood::Tense => &TENSE,
        Mood::Epic => &EPIC,
    }
}

/// 第 index 个和弦的根音偏移 (半音)
pub fn chord_root(mood: Mood, index: usize) -> i32 {
    let prog = progression(mood);
    prog[index % prog.len()][0]
}

pub fn semitone_ratio(semitones: f32) -> f32 {
    2f32.powf(semitones / 12.0)
}

/// 音分 (cents) 转频率比
pub fn cents_ratio(cents: f32) -> f32 {
    2f32.powf(cents / 1200.0)
}
