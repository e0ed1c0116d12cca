use cosmic_ui::{Alignment, Background, Color, GradientDirection, Rect, Style, UiRenderer};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as Area;
use ratatui::style::Color as TermColor;
use ratatui::widgets::Widget;

/// 从下往上填充的八分之一方块
const LOWER_BLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Clone, Copy)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

/// 以字符格为单位的画布。逻辑坐标按 scale 缩放到格子，
/// 这样同一套 UiRenderer 绘制代码可以画到终端上
pub struct CellCanvas {
    width: u16,
    height: u16,
    scale_x: f32,
    scale_y: f32,
    cells: Vec<Cell>,
}

pub fn term_color(c: Color) -> TermColor {
    TermColor::Rgb(c.r, c.g, c.b)
}

/// 按 alpha 叠加到底色上
fn blend(under: Color, over: Color) -> Color {
    under.lerp(Color::rgb(over.r, over.g, over.b), over.a as f32 / 255.0)
}

impl CellCanvas {
    pub fn new(scale_x: f32, scale_y: f32) -> Self {
        Self { width: 0, height: 0, scale_x, scale_y, cells: Vec::new() }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.cells = vec![Cell { ch: ' ', fg: Color::WHITE, bg: Color::BLACK }; width as usize * height as usize];
        }
    }

    pub fn clear(&mut self, bg: Color) {
        for cell in &mut self.cells {
            *cell = Cell { ch: ' ', fg: Color::WHITE, bg };
        }
    }

    /// 逻辑区域的全尺寸
    pub fn logical_area(&self) -> Rect {
        let (w, h) = self.size();
        Rect::new(0.0, 0.0, w, h)
    }

    pub fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    pub fn tint(&mut self, col: i32, row: i32, color: Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.bg = blend(cell.bg, color);
        }
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        self.cells.get_mut(row as usize * self.width as usize + col as usize)
    }

    /// 逻辑矩形覆盖到的格子范围 [c0, c1) x [r0, r1)
    fn cell_span(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let c0 = (rect.x / self.scale_x).floor() as i32;
        let c1 = ((rect.x + rect.w) / self.scale_x).ceil() as i32;
        let r0 = (rect.y / self.scale_y).floor() as i32;
        let r1 = ((rect.y + rect.h) / self.scale_y).ceil() as i32;
        (c0.max(0), c1.min(self.width as i32), r0.max(0), r1.min(self.height as i32))
    }
}

impl UiRenderer for CellCanvas {
    fn size(&self) -> (f32, f32) {
        (self.width as f32 * self.scale_x, self.height as f32 * self.scale_y)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        let (c0, c1, r0, r1) = self.cell_span(rect);
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.bg = blend(cell.bg, color);
                    cell.fg = blend(cell.fg, color);
                }
            }
        }
    }

    /// 只画背景；柱子的顶部按覆盖比例用八分块表示
    fn draw_style(&mut self, rect: Rect, style: &Style) {
        if rect.is_empty() {
            return;
        }
        let (canvas_w, canvas_h) = self.size();
        let bottom = (rect.y + rect.h) / self.scale_y;
        let top = rect.y / self.scale_y;

        // 每根柱子只占一列，取中心所在的列
        let col = ((rect.x + rect.w / 2.0) / self.scale_x).floor() as i32;
        let (_, _, r0, r1) = self.cell_span(rect);

        for row in r0..r1 {
            let covered = (bottom.min(row as f32 + 1.0) - top.max(row as f32)).clamp(0.0, 1.0);
            let idx = (covered * 8.0).round() as usize;
            if idx == 0 {
                continue;
            }

            let (px, py) = ((col as f32 + 0.5) * self.scale_x, (row as f32 + 0.5) * self.scale_y);
            let t = match &style.background {
                Background::LinearGradient { dir: GradientDirection::Vertical, .. } => 1.0 - py / canvas_h,
                _ => px / canvas_w,
            };
            let Some(color) = style.background.sample(t) else { continue };

            if let Some(cell) = self.cell_mut(col, row) {
                cell.ch = LOWER_BLOCKS[idx.min(8)];
                cell.fg = blend(cell.bg, color);
            }
        }
    }

    fn draw_text(&mut self, text: &str, rect: Rect, color: Color, _size: f32, align: Alignment) {
        let (c0, c1, r0, _) = self.cell_span(rect);
        let len = text.chars().count() as i32;
        let start = match align {
            Alignment::Start => c0,
            Alignment::Center => c0 + ((c1 - c0) - len).max(0) / 2,
            Alignment::End => (c1 - len).max(c0),
        };
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as i32;
            if col >= c1 {
                break;
            }
            self.put(col, r0, ch, color);
        }
    }
}

impl Widget for &CellCanvas {
    fn render(self, area: Area, buf: &mut Buffer) {
        let w = area.width.min(self.width);
        let h = area.height.min(self.height);
        for y in 0..h {
            for x in 0..w {
                let src = self.cells[y as usize * self.width as usize + x as usize];
                if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                    cell.set_char(src.ch).set_fg(term_color(src.fg)).set_bg(term_color(src.bg));
                }
            }
        }
    }
}
