//! 可视化用的频谱快照
//!
//! 引擎不从输出设备回读采样，而是根据正在发声的声部 (频率 + 当前增益)
//! 合成一份与 256 点 FFT 分析器相同形状的字节频谱：128 个频段，
//! 以 dB 映射到 0..=255。

pub const FFT_SIZE: usize = 256;
pub const BIN_COUNT: usize = FFT_SIZE / 2;
pub const SAMPLE_RATE: f32 = 44_100.0;

const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

/// 单个频段覆盖的带宽 (Hz)
pub fn bin_width() -> f32 {
    SAMPLE_RATE / FFT_SIZE as f32
}

pub fn bin_of(frequency: f32) -> Option<usize> {
    if frequency <= 0.0 {
        return None;
    }
    let idx = (frequency / bin_width()).round() as usize;
    (idx < BIN_COUNT).then_some(idx)
}

#[derive(Debug, Clone)]
pub struct Spectrum {
    energy: [f32; BIN_COUNT],
}

impl Spectrum {
    pub fn new() -> Self {
        Self { energy: [0.0; BIN_COUNT] }
    }

    /// 正弦分量；相邻频段各漏一半
    pub fn add_tone(&mut self, frequency: f32, amplitude: f32) {
        if amplitude <= 0.0 {
            return;
        }
        let Some(idx) = bin_of(frequency) else { return };
        self.energy[idx] += amplitude;
        if idx > 0 {
            self.energy[idx - 1] += amplitude * 0.5;
        }
        if idx + 1 < BIN_COUNT {
            self.energy[idx + 1] += amplitude * 0.5;
        }
    }

    /// 宽带噪声，高频衰减
    pub fn add_noise(&mut self, amplitude: f32) {
        if amplitude <= 0.0 {
            return;
        }
        for (i, e) in self.energy.iter_mut().enumerate() {
            let tilt = 1.0 / (1.0 + i as f32 / 16.0);
            *e += amplitude * 0.25 * tilt;
        }
    }

    pub fn energy(&self) -> &[f32] {
        &self.energy
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.energy.iter().map(|&e| amplitude_to_byte(e)).collect()
    }
}

impl Default for Spectrum {
    fn default() -> Self {
        Self::new()
    }
}

fn amplitude_to_byte(amplitude: f32) -> u8 {
    if amplitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * amplitude.log10();
    let scaled = (db - MIN_DB) / (MAX_DB - MIN_DB) * 255.0;
    scaled.clamp(0.0, 255.0) as u8
}
