use cosmic_audio::AudioManager;
use cosmic_ui::{Background, Color, GradientDirection, Rect, Style, UiRenderer};

const BAR_SPACING: f32 = 2.0;
const GLYPH_PLAYING: char = '♫';
const GLYPH_STOPPED: char = '♪';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// 画了一帧，值为柱子数量 (无数据时为 0)
    Rendered(usize),
    /// 画布或音频不可用，本帧跳过，下一帧再试
    Rescheduled,
}

/// 频谱柱状图 + 播放按钮 / 曲名同步。只读音频状态。
pub struct AudioVisualizer {
    toggle_glyph: char,
    track_name: String,
    bar_style: Style,
}

impl AudioVisualizer {
    pub fn new() -> Self {
        let stops = vec![
            (0.0, Color::CYAN.with_opacity(0.8)),
            (0.5, Color::MAGENTA.with_opacity(0.8)),
            (1.0, Color::YELLOW.with_opacity(0.8)),
        ];
        Self {
            toggle_glyph: GLYPH_STOPPED,
            track_name: String::new(),
            bar_style: Style {
                background: Background::LinearGradient { dir: GradientDirection::Vertical, stops },
                ..Default::default()
            },
        }
    }

    pub fn render_frame(
        &mut self,
        canvas: Option<&mut dyn UiRenderer>,
        area: Rect,
        audio: Option<&AudioManager>,
    ) -> FrameOutcome {
        let (Some(canvas), Some(audio)) = (canvas, audio) else {
            return FrameOutcome::Rescheduled;
        };

        canvas.draw_rect(area, Color::rgba(0, 0, 0, 204));

        let mut bars = 0;
        if let Some(data) = audio.get_visualization_data().filter(|d| !d.is_empty()) {
            let bar_w = area.w / data.len() as f32 * 2.0;
            // 超出画布的柱子交给渲染器裁剪
            for (i, &value) in data.iter().enumerate().step_by(2) {
                let bar_h = value as f32 / 255.0 * area.h * 0.8;
                let x = area.x + (i / 2) as f32 * (bar_w + BAR_SPACING);
                let y = area.y + area.h - bar_h;
                canvas.draw_style(Rect::new(x, y, bar_w, bar_h), &self.bar_style);
                bars += 1;
            }
        }

        self.toggle_glyph = if audio.is_music_playing() { GLYPH_PLAYING } else { GLYPH_STOPPED };
        self.track_name = audio.get_current_track_info().name;

        FrameOutcome::Rendered(bars)
    }

    pub fn toggle_glyph(&self) -> char {
        self.toggle_glyph
    }

    pub fn track_name(&self) -> &str {
        &self.track_name
    }
}

impl Default for AudioVisualizer {
    fn default() -> Self {
        Self::new()
    }
}
