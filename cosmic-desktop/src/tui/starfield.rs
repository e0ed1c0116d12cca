use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use cosmic_core::config::{ColorsConfig, VisualsConfig};
use cosmic_ui::Color;

use super::canvas::CellCanvas;

struct Star {
    /// 归一化坐标 0~1，窗口大小变化时不用重新生成
    x: f32,
    y: f32,
    phase: f32,
    speed: f32,
    depth: f32,
}

struct Nebula {
    x: f32,
    y: f32,
    radius: f32,
    color: Color,
}

/// 背景星空：闪烁的星星 + 几团星云，随时间缓慢漂移
pub struct Starfield {
    stars: Vec<Star>,
    nebulae: Vec<Nebula>,
    deep: Color,
    clock: f32,
}

pub fn hex_or(hex: &str, fallback: Color) -> Color {
    Color::from_hex(hex).unwrap_or_else(|| {
        log::warn!("Invalid color '{}' in config", hex);
        fallback
    })
}

impl Starfield {
    pub fn new(visuals: &VisualsConfig, colors: &ColorsConfig) -> Self {
        let mut rng = SmallRng::from_entropy();

        let stars = (0..visuals.star_count)
            .map(|_| Star {
                x: rng.r#gen(),
                y: rng.r#gen(),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
                speed: rng.gen_range(0.5..2.0),
                depth: rng.gen_range(0.2..1.0),
            })
            .collect();

        let tints = [
            hex_or(&colors.primary, Color::CYAN),
            hex_or(&colors.secondary, Color::MAGENTA),
            hex_or(&colors.space.light, Color::rgb(0x16, 0x21, 0x3e)),
        ];
        let nebulae = (0..visuals.nebula_count)
            .map(|i| Nebula {
                x: rng.r#gen(),
                y: rng.r#gen(),
                radius: rng.gen_range(0.15..0.35),
                color: tints[i % tints.len()].with_opacity(0.12),
            })
            .collect();

        Self {
            stars,
            nebulae,
            deep: hex_or(&colors.space.deep, Color::rgb(0x0a, 0x0a, 0x0f)),
            clock: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
    }

    pub fn paint(&self, canvas: &mut CellCanvas) {
        canvas.clear(self.deep);
        let (w, h) = cosmic_ui::UiRenderer::size(canvas);
        let (cols, rows) = (w as i32, h as i32);
        if cols == 0 || rows == 0 {
            return;
        }

        for nebula in &self.nebulae {
            let (cx, cy) = (nebula.x * w, nebula.y * h);
            let (rx, ry) = (nebula.radius * w, nebula.radius * h);
            for row in (cy - ry) as i32..=(cy + ry) as i32 {
                for col in (cx - rx) as i32..=(cx + rx) as i32 {
                    let dx = (col as f32 - cx) / rx;
                    let dy = (row as f32 - cy) / ry;
                    if dx * dx + dy * dy <= 1.0 {
                        canvas.tint(col, row, nebula.color);
                    }
                }
            }
        }

        for star in &self.stars {
            // 远处的星星漂得慢
            let x = (star.x + self.clock * 0.004 * star.depth).fract();
            let twinkle = 0.5 + 0.5 * (self.clock * star.speed + star.phase).sin();
            let brightness = (twinkle * star.depth * 255.0) as u8;
            let ch = match brightness {
                0..=60 => continue,
                61..=140 => '.',
                141..=200 => '+',
                _ => '*',
            };
            let col = (x * w) as i32;
            let row = (star.y * h) as i32;
            canvas.put(col, row, ch, Color::rgb(brightness, brightness, brightness.saturating_add(20)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic_core::config::{ColorsConfig, VisualsConfig};

    #[test]
    fn test_stars_are_normalized() {
        let visuals = VisualsConfig { star_count: 64, nebula_count: 4, ..Default::default() };
        let field = Starfield::new(&visuals, &ColorsConfig::default());
        assert_eq!(field.stars.len(), 64);
        assert_eq!(field.nebulae.len(), 4);
        assert!(field.stars.iter().all(|s| (0.0..1.0).contains(&s.x) && (0.0..1.0).contains(&s.y)));
        assert!(field.nebulae.iter().all(|n| (0.0..1.0).contains(&n.x) && (0.0..1.0).contains(&n.y)));
    }

    #[test]
    fn test_bad_color_falls_back() {
        assert_eq!(hex_or("#aé", Color::CYAN), Color::CYAN);
        assert_eq!(hex_or("#ff00ff", Color::CYAN), Color::MAGENTA);
    }

    #[test]
    fn test_paint_any_size() {
        let mut field = Starfield::new(&VisualsConfig::default(), &ColorsConfig::default());
        field.update(12.5);

        let mut canvas = CellCanvas::new(1.0, 1.0);
        field.paint(&mut canvas);
        canvas.resize(3, 2);
        field.paint(&mut canvas);
        canvas.resize(80, 24);
        field.paint(&mut canvas);
    }
}
